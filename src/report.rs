// Analysis-mode output

use clap::ValueEnum;
use std::fmt::Write;

use crate::Result;
use crate::analysis::StatementFacts;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

pub fn render(facts: &[StatementFacts], format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => render_text(facts),
        ReportFormat::Json => render_json(facts).map(|json| json + "\n"),
    }
}

/// Plain-text report, one block per statement.
///
/// Multi-statement input gets `Statement N:` headers, with a `---` line ahead of
/// every block but the first.
pub fn render_text(facts: &[StatementFacts]) -> Result<String> {
    let numbered = facts.len() > 1;
    let mut out = String::new();

    for (idx, statement) in facts.iter().enumerate() {
        if numbered {
            if idx > 0 {
                out.push_str("---\n");
            }
            writeln!(out, "Statement {}:", idx + 1)?;
        }
        writeln!(out, "Columns: {}", bracket_list(statement.columns()))?;
        writeln!(out, "Tables: {}", bracket_list(statement.tables()))?;
        writeln!(
            out,
            "Action: {}",
            statement.action().map(|a| a.as_str()).unwrap_or_default()
        )?;
        if !statement.where_filter().is_empty() {
            writeln!(out, "WHERE filter: {}", statement.where_filter())?;
        }
    }
    Ok(out)
}

pub fn render_json(facts: &[StatementFacts]) -> Result<String> {
    Ok(serde_json::to_string_pretty(facts)?)
}

/// `[a b c]`
fn bracket_list(items: &[String]) -> String {
    format!("[{}]", items.join(" "))
}
