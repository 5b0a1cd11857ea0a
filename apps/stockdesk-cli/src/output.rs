//! Output rendering for command results.
//!
//! Every command prints either a comfy-table (the default) or the raw
//! value as pretty JSON (`--format json`) for scripting.

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use serde::Serialize;
use stockdesk_client::Page;

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format
    #[default]
    Table,
    /// JSON format
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Output {
    format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Output { format }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// A page of rows, followed by a `Page x of y` footer.
    pub fn page<T, F>(&self, page: &Page<T>, headers: &[&str], row: F) -> anyhow::Result<()>
    where
        T: Serialize,
        F: Fn(&T) -> Vec<String>,
    {
        if self.is_json() {
            return print_json(page);
        }
        println!("{}", render_table(headers, page.items.iter().map(row).collect()));
        if !page.is_empty() {
            println!("{}", page_footer(page));
        }
        Ok(())
    }

    /// A plain list without paging.
    pub fn list<T, F>(&self, items: &[T], headers: &[&str], row: F) -> anyhow::Result<()>
    where
        T: Serialize,
        F: Fn(&T) -> Vec<String>,
    {
        if self.is_json() {
            return print_json(&items);
        }
        println!("{}", render_table(headers, items.iter().map(row).collect()));
        Ok(())
    }

    /// One record as a two-column field/value table.
    pub fn record<T: Serialize>(&self, value: &T, fields: Vec<(&str, String)>) -> anyhow::Result<()> {
        if self.is_json() {
            return print_json(value);
        }
        println!("{}", render_fields(fields));
        Ok(())
    }

    /// A status line; in JSON mode the value is printed instead.
    pub fn done<T: Serialize>(&self, value: &T, message: &str) -> anyhow::Result<()> {
        if self.is_json() {
            return print_json(value);
        }
        println!("{}", message);
        Ok(())
    }

    pub fn message(&self, message: &str) {
        if !self.is_json() {
            println!("{}", message);
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn render_table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    if rows.is_empty() {
        return "No results".to_string();
    }
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.to_vec());
    for row in rows {
        table.add_row(row);
    }
    table.to_string()
}

pub fn render_fields(fields: Vec<(&str, String)>) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    for (name, value) in fields {
        table.add_row(vec![name.to_string(), value]);
    }
    table.to_string()
}

pub fn page_footer<T>(page: &Page<T>) -> String {
    let mut footer = format!(
        "Page {} of {} ({} total)",
        page.page,
        page.total_pages.max(1),
        page.total
    );
    if page.has_next() {
        footer.push_str(&format!(" - next: --page {}", page.page + 1));
    }
    footer
}

// =============================================================================
// Cell Helpers
// =============================================================================

pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

pub fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}

pub fn date<T: chrono::TimeZone>(value: Option<&chrono::DateTime<T>>) -> String
where
    T::Offset: std::fmt::Display,
{
    value.map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d %H:%M").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_says_no_results() {
        assert_eq!(render_table(&["ID"], Vec::new()), "No results");
    }

    #[test]
    fn test_table_contains_headers_and_cells() {
        let rendered = render_table(
            &["SKU", "Name"],
            vec![vec!["COKE-330".into(), "Coca-Cola".into()]],
        );
        assert!(rendered.contains("SKU"));
        assert!(rendered.contains("COKE-330"));
        assert!(rendered.contains("Coca-Cola"));
    }

    #[test]
    fn test_page_footer() {
        let page = Page {
            items: vec![1, 2],
            total: 12,
            page: 2,
            limit: 2,
            total_pages: 6,
        };
        assert_eq!(page_footer(&page), "Page 2 of 6 (12 total) - next: --page 3");

        let last = Page::from_items(vec![1]);
        assert_eq!(page_footer(&last), "Page 1 of 1 (1 total)");
    }

    #[test]
    fn test_cell_helpers() {
        assert_eq!(or_dash(None::<String>), "-");
        assert_eq!(or_dash(Some(5)), "5");
        assert_eq!(yes_no(true), "yes");
        assert_eq!(date::<chrono::Utc>(None), "-");
    }
}
