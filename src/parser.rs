use sqlparser::ast::Statement;
use sqlparser::dialect::MySqlDialect;
use sqlparser::parser::Parser;
use tracing::debug;

use crate::{Result, SqlFactsError};

/// Parse SQL text that may hold several `;`-separated statements.
///
/// A syntax error anywhere fails the whole batch; no statements are returned.
pub fn parse_all(sql: &str) -> Result<Vec<Statement>> {
    let statements = Parser::parse_sql(&MySqlDialect {}, sql)?;
    debug!("Parsed {} statement(s)", statements.len());
    Ok(statements)
}

/// Validate SQL syntax without analyzing the statements.
pub fn check_syntax(sql: &str) -> Result<()> {
    Parser::parse_sql(&MySqlDialect {}, sql).map_err(SqlFactsError::Syntax)?;
    Ok(())
}
