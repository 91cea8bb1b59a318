// Statement analysis: action, tables, columns and a canonical WHERE filter

mod columns;
mod extractor;
mod join_tree;
mod restore;
mod where_renderer;

pub use extractor::extract;
pub use restore::restore_expr;
pub use where_renderer::{RenderError, WhereRenderer};

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// The kind of statement a set of facts was extracted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatementAction {
    Insert,
    Update,
    Delete,
    Select,
    Alter,
    Create,
    Drop,
    Truncate,
}

impl StatementAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementAction::Insert => "INSERT",
            StatementAction::Update => "UPDATE",
            StatementAction::Delete => "DELETE",
            StatementAction::Select => "SELECT",
            StatementAction::Alter => "ALTER",
            StatementAction::Create => "CREATE",
            StatementAction::Drop => "DROP",
            StatementAction::Truncate => "TRUNCATE",
        }
    }

    /// UPDATE and DELETE have a mutation target
    pub fn is_mutation(&self) -> bool {
        matches!(self, StatementAction::Update | StatementAction::Delete)
    }
}

impl fmt::Display for StatementAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Facts derived from a single statement tree.
///
/// Built once by [`extract`] and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatementFacts {
    action: Option<StatementAction>,
    tables: Vec<String>,
    columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    primary_table: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    where_filter: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    alias_map: BTreeMap<String, String>,
}

impl StatementFacts {
    /// `None` for statements outside the supported set (SHOW, SET, ...)
    pub fn action(&self) -> Option<StatementAction> {
        self.action
    }

    /// Unique table names in first-seen order
    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    /// Column names in traversal order, duplicates kept
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Mutation target of an UPDATE/DELETE
    pub fn primary_table(&self) -> Option<&str> {
        self.primary_table.as_deref()
    }

    /// Canonical WHERE text, empty when there is none
    pub fn where_filter(&self) -> &str {
        &self.where_filter
    }

    pub fn alias_map(&self) -> &BTreeMap<String, String> {
        &self.alias_map
    }

    pub fn is_mutation(&self) -> bool {
        self.action.is_some_and(|action| action.is_mutation())
    }
}

/// Per-statement accumulator, lives for one extraction call only
#[derive(Debug, Default)]
pub(crate) struct FactsBuilder {
    action: Option<StatementAction>,
    tables: Vec<String>,
    columns: Vec<String>,
    primary_table: Option<String>,
    where_filter: String,
    alias_map: BTreeMap<String, String>,
}

impl FactsBuilder {
    pub(crate) fn new(action: StatementAction) -> Self {
        FactsBuilder {
            action: Some(action),
            ..Default::default()
        }
    }

    /// Add a table by canonical name; repeated names are ignored
    pub(crate) fn add_table(&mut self, table: &str) {
        if table.is_empty() || self.tables.iter().any(|t| t == table) {
            return;
        }
        self.tables.push(table.to_string());
    }

    pub(crate) fn register_alias(&mut self, alias: &str, table: &str) {
        if !alias.is_empty() {
            self.alias_map.insert(alias.to_string(), table.to_string());
        }
    }

    pub(crate) fn columns_mut(&mut self) -> &mut Vec<String> {
        &mut self.columns
    }

    pub(crate) fn tables(&self) -> &[String] {
        &self.tables
    }

    pub(crate) fn alias_map(&self) -> &BTreeMap<String, String> {
        &self.alias_map
    }

    /// Mark the first table seen as the mutation target
    pub(crate) fn mark_primary_table(&mut self) {
        self.primary_table = self.tables.first().cloned();
    }

    pub(crate) fn set_where_filter(&mut self, filter: String) {
        self.where_filter = filter;
    }

    pub(crate) fn build(self) -> StatementFacts {
        StatementFacts {
            action: self.action,
            tables: self.tables,
            columns: self.columns,
            primary_table: self.primary_table,
            where_filter: self.where_filter,
            alias_map: self.alias_map,
        }
    }
}
