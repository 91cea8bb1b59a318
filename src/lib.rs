pub mod analysis;
pub mod config;
pub mod dump;
pub mod parser;
pub mod pipeline;
pub mod report;

pub use analysis::{StatementAction, StatementFacts, extract};
pub use dump::{ConnectionOptions, DumpLine, DumpPlanGenerator, DumpSettings, filter_where_for_table};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SqlFactsError {
    #[error("parse error: {0}")]
    SqlParse(#[from] sqlparser::parser::ParserError),

    #[error("SQL syntax error: {0}")]
    Syntax(#[source] sqlparser::parser::ParserError),

    #[error("no SQL statement provided")]
    MissingInput,

    #[error("error reading file: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("report formatting error: {0}")]
    Format(#[from] std::fmt::Error),
}

pub type Result<T> = std::result::Result<T, SqlFactsError>;

impl SqlFactsError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            SqlFactsError::SqlParse(_) => 1,
            SqlFactsError::Syntax(_) => 1,
            SqlFactsError::MissingInput => 2, // usage
            SqlFactsError::Io(_) => 1,
            SqlFactsError::Json(_) => 1,
            SqlFactsError::Format(_) => 1,
        }
    }
}
