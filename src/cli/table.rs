//! List output rendering across formats
//!
//! Every list command builds a header row plus string rows for the tabular
//! formats and hands over the typed slice for JSON/YAML, so machine output
//! keeps full fidelity while the table stays scannable.

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::helpers::escape_csv;
use crate::cli::OutputFormat;

/// A prepared list: display rows alongside the typed records
pub struct ListView<'a, T: Serialize> {
    pub items: &'a [T],
    pub headers: &'a [&'a str],
    pub rows: Vec<Vec<String>>,
    pub ids: Vec<String>,
    /// e.g. "project(s)"
    pub noun: &'a str,
}

impl<'a, T: Serialize> ListView<'a, T> {
    /// Print the list in the requested format. `Auto` renders a table.
    pub fn emit(self, format: OutputFormat, quiet: bool) -> Result<()> {
        match format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(self.items).into_diagnostic()?;
                println!("{}", json);
            }
            OutputFormat::Yaml => {
                let yaml = serde_yml::to_string(&self.items).into_diagnostic()?;
                print!("{}", yaml);
            }
            OutputFormat::Csv => {
                println!("{}", self.headers.join(","));
                for row in &self.rows {
                    let line: Vec<String> = row.iter().map(|c| escape_csv(c)).collect();
                    println!("{}", line.join(","));
                }
            }
            OutputFormat::Id => {
                for id in &self.ids {
                    println!("{}", id);
                }
            }
            OutputFormat::Auto | OutputFormat::Table => {
                if self.rows.is_empty() {
                    if !quiet {
                        println!("No {} found.", self.noun);
                    }
                    return Ok(());
                }

                println!("{}", render_table(self.headers, &self.rows));
                if !quiet {
                    println!(
                        "{} {} found",
                        style(self.rows.len()).cyan(),
                        self.noun
                    );
                }
            }
        }
        Ok(())
    }
}

/// Render rows with a compact psql-style frame
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(|h| h.to_uppercase()));
    for row in rows {
        builder.push_record(row.iter().cloned());
    }

    let mut table = builder.build();
    table.with(Style::psql());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_table_has_headers_and_rows() {
        let rendered = render_table(
            &["id", "name"],
            &[
                vec!["p1".to_string(), "Sky Gardens".to_string()],
                vec!["p2".to_string(), "Harbour View".to_string()],
            ],
        );
        assert!(rendered.contains("ID"));
        assert!(rendered.contains("NAME"));
        assert!(rendered.contains("Sky Gardens"));
        assert!(rendered.contains("Harbour View"));
    }
}
