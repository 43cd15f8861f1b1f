use std::collections::BTreeMap;

use super::column::{Column, EMPTY_CURRENT_VERSION};
use crate::errors::{RefBookError, Result};

/// Models that can have an admin view
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModelKind {
    Book,
    Version,
    Element,
}

impl ModelKind {
    /// URL segment used in change links
    pub fn slug(&self) -> &'static str {
        match self {
            ModelKind::Book => "books",
            ModelKind::Version => "versions",
            ModelKind::Element => "elements",
        }
    }

    pub fn verbose_name_plural(&self) -> &'static str {
        match self {
            ModelKind::Book => "Reference books",
            ModelKind::Version => "Reference book versions",
            ModelKind::Element => "Reference book elements",
        }
    }

    /// Path of the change view for one row
    pub fn change_url(&self, pk: i64) -> String {
        format!("/admin/{}/{}/", self.slug(), pk)
    }
}

/// Child rows shown in a table on the parent's change view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineAdmin {
    pub model: ModelKind,
    pub fields: Vec<Column>,
    pub readonly: bool,
    pub can_delete: bool,
    /// Number of blank rows offered for adding children
    pub extra: usize,
    pub show_change_link: bool,
}

/// List and change view configuration for one model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelAdmin {
    pub model: ModelKind,
    pub list_display: Vec<Column>,
    pub inlines: Vec<InlineAdmin>,
    /// Owning rows are fetched in the same query as the list rows
    pub select_related: bool,
}

impl ModelAdmin {
    /// Plain registration: every column shown, id linked, no inlines
    pub fn default_for(model: ModelKind, fields: &[(&'static str, &'static str)]) -> Self {
        let list_display = fields
            .iter()
            .map(|&(field, label)| {
                let column = Column::new(field, label);
                if field == "id" {
                    column.linked()
                } else {
                    column
                }
            })
            .collect();
        Self {
            model,
            list_display,
            inlines: Vec::new(),
            select_related: false,
        }
    }

    pub fn column(&self, field: &str) -> Option<&Column> {
        self.list_display.iter().find(|c| c.field == field)
    }
}

/// Book list: current version columns plus read-only version inline
pub fn book_admin() -> ModelAdmin {
    ModelAdmin {
        model: ModelKind::Book,
        list_display: vec![
            Column::new("id", "ID").linked(),
            Column::new("code", "Code").linked(),
            Column::new("name", "Name").linked(),
            Column::new("current_version", "Current version")
                .with_empty_value(EMPTY_CURRENT_VERSION),
            Column::new("version_date", "Version effective date")
                .with_empty_value(EMPTY_CURRENT_VERSION),
        ],
        inlines: vec![InlineAdmin {
            model: ModelKind::Version,
            fields: vec![
                Column::new("version", "Version"),
                Column::new("date", "Effective date"),
            ],
            readonly: true,
            can_delete: false,
            extra: 0,
            show_change_link: true,
        }],
        select_related: false,
    }
}

/// Version list: owning book code and name, editable element inline
pub fn version_admin() -> ModelAdmin {
    ModelAdmin {
        model: ModelKind::Version,
        list_display: vec![
            Column::new("ref_book_code", "Book code"),
            Column::new("ref_book_name", "Book name"),
            Column::new("version", "Version").linked(),
            Column::new("date", "Effective date").linked(),
        ],
        inlines: vec![InlineAdmin {
            model: ModelKind::Element,
            fields: vec![Column::new("code", "Code"), Column::new("value", "Value")],
            readonly: false,
            can_delete: true,
            extra: 0,
            show_change_link: false,
        }],
        select_related: true,
    }
}

pub fn element_admin() -> ModelAdmin {
    ModelAdmin::default_for(
        ModelKind::Element,
        &[("id", "ID"), ("code", "Code"), ("value", "Value")],
    )
}

/// Registry of admin views, built once during startup
#[derive(Debug, Clone, Default)]
pub struct AdminSite {
    registry: BTreeMap<ModelKind, ModelAdmin>,
}

impl AdminSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Site with the book, version and element views registered
    pub fn with_defaults() -> Self {
        let mut site = Self::new();
        for admin in [element_admin(), book_admin(), version_admin()] {
            // A fresh site cannot already hold these kinds.
            site.registry.insert(admin.model, admin);
        }
        site
    }

    /// # Errors
    ///
    /// Returns `AlreadyRegistered` if the model already has a view.
    pub fn register(&mut self, admin: ModelAdmin) -> Result<()> {
        if self.registry.contains_key(&admin.model) {
            return Err(RefBookError::AlreadyRegistered {
                model: format!("{:?}", admin.model),
            });
        }
        self.registry.insert(admin.model, admin);
        Ok(())
    }

    pub fn get(&self, model: ModelKind) -> Option<&ModelAdmin> {
        self.registry.get(&model)
    }

    pub fn is_registered(&self, model: ModelKind) -> bool {
        self.registry.contains_key(&model)
    }

    /// Registered models in a stable order
    pub fn registered(&self) -> Vec<ModelKind> {
        self.registry.keys().copied().collect()
    }
}
