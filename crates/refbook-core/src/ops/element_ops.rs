use super::store::Store;
use super::validation::{validate_code, validate_value};
use crate::errors::{RefBookError, Result};
use crate::model::ReferenceBookElement;

/// Partial update of an element; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementUpdate {
    pub code: Option<String>,
    pub value: Option<String>,
}

fn code_taken(store: &Store, version_id: i64, code: &str, except: Option<i64>) -> bool {
    store
        .elements_of(version_id)
        .any(|e| e.code == code && Some(e.id) != except)
}

/// Add an element to a version
///
/// # Errors
/// * `VersionNotFound` - If the owning version doesn't exist
/// * `InvalidCode` / `InvalidValue` - If code or value fail validation
/// * `DuplicateElementCode` - If the version already has this code
pub fn create_element(store: &mut Store, version_id: i64, code: &str, value: &str) -> Result<i64> {
    store.get_version(version_id)?;
    let code = validate_code(code)?;
    let value = validate_value(value)?;
    if code_taken(store, version_id, &code, None) {
        return Err(RefBookError::DuplicateElementCode { version_id, code });
    }

    let id = store.allocate_id();
    store.insert_element(ReferenceBookElement::new(id, version_id, code, value));
    Ok(id)
}

/// # Errors
/// * `ElementNotFound` - If the element doesn't exist
/// * `InvalidCode` / `DuplicateElementCode` - If the new code is unusable
pub fn update_element(store: &mut Store, id: i64, update: ElementUpdate) -> Result<()> {
    let version_id = store.get_element(id)?.version_id;
    let code = update.code.as_deref().map(validate_code).transpose()?;
    let value = update.value.as_deref().map(validate_value).transpose()?;

    if let Some(ref code) = code {
        if code_taken(store, version_id, code, Some(id)) {
            return Err(RefBookError::DuplicateElementCode {
                version_id,
                code: code.clone(),
            });
        }
    }

    let element = store.get_element_mut(id)?;
    if let Some(code) = code {
        element.code = code;
    }
    if let Some(value) = value {
        element.value = value;
    }
    Ok(())
}

/// # Errors
/// * `ElementNotFound` - If the element doesn't exist
pub fn delete_element(store: &mut Store, id: i64) -> Result<ReferenceBookElement> {
    store
        .remove_element(id)
        .ok_or(RefBookError::ElementNotFound { element_id: id })
}

/// Elements of a version ordered by code, then id
///
/// # Errors
/// * `VersionNotFound` - If the version doesn't exist
pub fn list_elements_for_version(
    store: &Store,
    version_id: i64,
) -> Result<Vec<&ReferenceBookElement>> {
    store.get_version(version_id)?;
    let mut elements: Vec<_> = store.elements_of(version_id).collect();
    elements.sort_by(|a, b| a.code.cmp(&b.code).then(a.id.cmp(&b.id)));
    Ok(elements)
}
