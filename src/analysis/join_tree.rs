use sqlparser::ast::{ObjectName, ObjectNamePart, TableFactor, TableWithJoins};
use tracing::debug;

use super::FactsBuilder;

/// Canonical table name: the last, unquoted component of an object name
pub(crate) fn table_name(name: &ObjectName) -> String {
    match name.0.last() {
        Some(ObjectNamePart::Identifier(ident)) => ident.value.clone(),
        None => String::new(),
    }
}

/// Walk FROM items left to right, registering tables and aliases
pub(crate) fn walk_tables(sources: &[TableWithJoins], builder: &mut FactsBuilder) {
    for source in sources {
        walk_table_with_joins(source, builder);
    }
}

pub(crate) fn walk_table_with_joins(source: &TableWithJoins, builder: &mut FactsBuilder) {
    visit_factor(&source.relation, builder);
    for join in &source.joins {
        visit_factor(&join.relation, builder);
    }
}

fn visit_factor(factor: &TableFactor, builder: &mut FactsBuilder) {
    match factor {
        TableFactor::Table { name, alias, .. } => {
            let table = table_name(name);
            if table.is_empty() {
                return;
            }

            // Register before any WHERE rendering happens
            if let Some(alias) = alias {
                builder.register_alias(&alias.name.value, &table);
            }
            builder.add_table(&table);
        }
        TableFactor::NestedJoin { table_with_joins, .. } => {
            walk_table_with_joins(table_with_joins, builder);
        }
        other => {
            debug!("Skipping non-table source in join tree: {}", other);
        }
    }
}
