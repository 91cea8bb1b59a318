use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use sqlparser::ast::Expr;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

use super::restore::restore_expr;

// Charset introducer ahead of a quoted literal, e.g. _UTF8MB4'abc' or _latin1 'abc'
static CHARSET_PREFIX_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b_[A-Za-z][A-Za-z0-9]*\s*('(?:[^']|'')*')").unwrap()
});

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("expression cannot be rendered as a filter: {0}")]
    Unsupported(String),

    #[error("formatting failed")]
    Format(#[from] std::fmt::Error),

    #[error("invalid alias pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Turns a WHERE expression into canonical filter text.
///
/// The restored expression text goes through four passes, always in this order:
/// identifier quotes are stripped, charset introducers are dropped from string
/// literals, `alias.` prefixes become `table.` prefixes, and ` AND ` is lowered
/// to ` and `.
pub struct WhereRenderer<'a> {
    alias_map: &'a BTreeMap<String, String>,
}

impl<'a> WhereRenderer<'a> {
    pub fn new(alias_map: &'a BTreeMap<String, String>) -> Self {
        WhereRenderer { alias_map }
    }

    /// Render an optional WHERE clause; a missing or unrenderable clause yields ""
    pub fn render_or_empty(&self, selection: Option<&Expr>) -> String {
        let Some(expr) = selection else {
            return String::new();
        };

        match self.render(expr) {
            Ok(filter) => filter,
            Err(e) => {
                debug!("Dropping WHERE filter that could not be rendered: {}", e);
                String::new()
            }
        }
    }

    pub fn render(&self, expr: &Expr) -> Result<String, RenderError> {
        let restored = restore_expr(expr)?;
        self.normalize(&restored)
    }

    /// Apply the normalization passes to already-serialized filter text
    pub fn normalize(&self, text: &str) -> Result<String, RenderError> {
        let unquoted = strip_identifier_quotes(text);
        let without_charsets = strip_charset_prefixes(&unquoted);
        let resolved = self.substitute_aliases(&without_charsets)?;
        Ok(lower_conjunctions(&resolved))
    }

    /// Rewrite `alias.` to `table.` at identifier boundaries.
    ///
    /// All aliases are matched in one pass, so a table name written for one
    /// alias is never rewritten again by another.
    pub fn substitute_aliases(&self, text: &str) -> Result<String, RenderError> {
        if self.alias_map.is_empty() {
            return Ok(text.to_string());
        }

        let alternatives: Vec<String> = self.alias_map.keys().map(|alias| regex::escape(alias)).collect();
        let pattern = Regex::new(&format!(
            r"(^|[^A-Za-z0-9_$])({})\.",
            alternatives.join("|")
        ))?;

        let filter = pattern.replace_all(text, |caps: &Captures| {
            let alias = &caps[2];
            let table = self.alias_map.get(alias).map_or(alias, String::as_str);
            format!("{}{}.", &caps[1], table)
        });
        Ok(filter.into_owned())
    }
}

fn strip_identifier_quotes(text: &str) -> String {
    text.replace('`', "")
}

fn strip_charset_prefixes(text: &str) -> String {
    CHARSET_PREFIX_PATTERN.replace_all(text, "$1").into_owned()
}

fn lower_conjunctions(text: &str) -> String {
    text.replace(" AND ", " and ")
}
