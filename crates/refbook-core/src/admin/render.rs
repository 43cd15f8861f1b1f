//! Markdown rendering of admin list and change views

use super::column::Column;
use super::rows::AdminRow;
use super::site::{InlineAdmin, ModelAdmin};
use crate::model::{ReferenceBook, ReferenceBookElement, ReferenceBookVersion, VersionWithBook};
use crate::resolver::CurrentVersion;

use super::column::EMPTY_CURRENT_VERSION;

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

fn render_cell<R: AdminRow>(column: &Column, row: &R) -> String {
    let value = row
        .cell(column.field)
        .unwrap_or_else(|| column.empty_value.to_string());
    let value = escape_cell(&value);
    if column.link {
        format!("[{}]({})", value, row.kind().change_url(row.pk()))
    } else {
        value
    }
}

fn render_table<R: AdminRow>(columns: &[Column], rows: &[R], out: &mut String) {
    let header: Vec<&str> = columns.iter().map(|c| c.label).collect();
    out.push_str(&format!("| {} |\n", header.join(" | ")));
    out.push_str(&format!(
        "|{}\n",
        columns.iter().map(|_| "---|").collect::<String>()
    ));
    for row in rows {
        let cells: Vec<String> = columns.iter().map(|c| render_cell(c, row)).collect();
        out.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
}

/// Render a list view as a Markdown table under a heading
pub fn render_list<R: AdminRow>(admin: &ModelAdmin, rows: &[R]) -> String {
    let mut output = format!("# {}\n\n", admin.model.verbose_name_plural());
    if rows.is_empty() {
        output.push_str("_No rows._\n");
        return output;
    }
    render_table(&admin.list_display, rows, &mut output);
    output
}

fn render_inline<R: AdminRow>(inline: &InlineAdmin, rows: &[R], out: &mut String) {
    out.push_str(&format!("## {}\n\n", inline.model.verbose_name_plural()));
    if rows.is_empty() {
        out.push_str("_None._\n");
        return;
    }
    let mut columns = inline.fields.clone();
    if inline.show_change_link {
        if let Some(first) = columns.first_mut() {
            first.link = true;
        }
    }
    render_table(&columns, rows, out);
}

/// Render the change view of a book: fields, current version, version inline
pub fn render_book_detail(
    admin: &ModelAdmin,
    book: &ReferenceBook,
    current: Option<&CurrentVersion>,
    versions: &[ReferenceBookVersion],
) -> String {
    let mut output = format!("# {} ({})\n\n", book.name, book.code);
    output.push_str(&format!("**ID**: {}\n\n", book.id));
    if let Some(ref description) = book.description {
        output.push_str(&format!("**Description**: {}\n\n", description));
    }
    match current {
        Some(cv) => output.push_str(&format!(
            "**Current version**: {} (effective {})\n\n",
            cv.version, cv.date
        )),
        None => output.push_str(&format!("**Current version**: {}\n\n", EMPTY_CURRENT_VERSION)),
    }
    for inline in &admin.inlines {
        render_inline(inline, versions, &mut output);
    }
    output
}

/// Render the change view of a version: owning book, fields, element inline
pub fn render_version_detail(
    admin: &ModelAdmin,
    row: &VersionWithBook,
    elements: &[ReferenceBookElement],
) -> String {
    let mut output = format!(
        "# {} {} (version {})\n\n",
        row.book_code, row.book_name, row.version.version
    );
    output.push_str(&format!("**ID**: {}\n\n", row.version.id));
    output.push_str(&format!("**Effective date**: {}\n\n", row.version.date));
    for inline in &admin.inlines {
        render_inline(inline, elements, &mut output);
    }
    output
}
