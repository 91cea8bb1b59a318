use tracing::info;

use crate::Result;
use crate::analysis::{StatementFacts, extract};
use crate::dump::{DumpLine, DumpPlanGenerator};
use crate::parser::{check_syntax, parse_all};

/// Parse and extract facts for every statement in `sql`.
///
/// A parse error anywhere aborts the whole batch.
pub fn analyze(sql: &str) -> Result<Vec<StatementFacts>> {
    let statements = parse_all(sql)?;
    let facts: Vec<StatementFacts> = statements.iter().map(extract).collect();
    info!("Analyzed {} statement(s)", facts.len());
    Ok(facts)
}

/// Export plan for every statement in `sql`, concatenated in statement order
pub fn dump_plan(sql: &str, generator: &DumpPlanGenerator) -> Result<Vec<DumpLine>> {
    let facts = analyze(sql)?;
    let lines: Vec<DumpLine> = facts.iter().flat_map(|f| generator.plan(f)).collect();
    info!(
        "Planned {} export directive(s) for {} statement(s)",
        lines.iter().filter(|line| line.is_directive()).count(),
        facts.len()
    );
    Ok(lines)
}

pub fn check(sql: &str) -> Result<()> {
    check_syntax(sql)?;
    info!("SQL syntax is valid");
    Ok(())
}
