use tracing::debug;

use super::filter_splitter::{filter_where_for_table, strip_table_prefixes};
use super::{DumpLine, DumpSettings};
use crate::analysis::StatementFacts;

/// Builds the export plan for one statement at a time
#[derive(Debug, Clone, Default)]
pub struct DumpPlanGenerator {
    settings: DumpSettings,
}

impl DumpPlanGenerator {
    pub fn new(settings: DumpSettings) -> Self {
        DumpPlanGenerator { settings }
    }

    /// Produce the ordered plan lines for `facts`.
    ///
    /// UPDATE and DELETE only export their primary table; everything else
    /// exports every referenced table. When a mutation's WHERE clause also
    /// constrains joined tables, a two-step exact-rows recipe is emitted as
    /// notes ahead of the best-effort directive.
    pub fn plan(&self, facts: &StatementFacts) -> Vec<DumpLine> {
        let tables = facts.tables();
        if tables.is_empty() {
            return vec![DumpLine::note("No tables found in SQL statement")];
        }

        let to_export: Vec<&str> = match facts.primary_table() {
            Some(primary) if facts.is_mutation() => vec![primary],
            _ => tables.iter().map(String::as_str).collect(),
        };

        let mut lines = Vec::new();
        for table in to_export {
            let filter = filter_where_for_table(facts.where_filter(), table, tables);

            if facts.is_mutation() && facts.primary_table() == Some(table) && tables.len() > 1 {
                let naive = strip_table_prefixes(facts.where_filter(), tables);
                if naive != filter && !filter.is_empty() {
                    debug!(
                        "Cross-table conditions on {}: '{}' narrows to '{}'",
                        table, naive, filter
                    );
                    lines.extend(self.exact_rows_helper(table, tables, facts.where_filter()));
                }
            }

            lines.push(self.directive(table, &filter));
        }
        lines
    }

    fn directive(&self, table: &str, filter: &str) -> DumpLine {
        let conn = &self.settings.connection;
        let command = if filter.is_empty() {
            format!("mysqldump{} {} {}", conn.render(), conn.database(), table)
        } else {
            format!(
                "mysqldump{} --where=\"{}\" {} {}",
                conn.render(),
                filter,
                conn.database(),
                table
            )
        };
        DumpLine::Directive(command)
    }

    fn exact_rows_helper(&self, table: &str, tables: &[String], where_filter: &str) -> Vec<DumpLine> {
        let conn = &self.settings.connection;
        let key = &self.settings.key_column;
        let ids_file = self.settings.temp_dir.join(format!("{table}_ids.txt"));
        let ids_file = ids_file.display();

        let mut lookup = format!("SELECT {table}.{key} FROM {table}");
        for other in tables.iter().filter(|other| *other != table) {
            lookup.push_str(&format!(" JOIN {other} ON <join_condition>"));
        }
        lookup.push_str(&format!(" WHERE {where_filter}"));

        vec![
            DumpLine::note("To get exact rows matching all JOIN conditions:"),
            DumpLine::note("Step 1: Get matching IDs"),
            DumpLine::note(format!(
                "mysql{} -N -e \"{}\" {} > {}",
                conn.render(),
                lookup,
                conn.database(),
                ids_file
            )),
            DumpLine::note("Step 2: Dump exact rows"),
            DumpLine::note(format!(
                "mysqldump{} --where=\"{} IN ($(cat {} | tr '\\n' ',' | sed 's/,$//'))\" {} {}",
                conn.render(),
                key,
                ids_file,
                conn.database(),
                table
            )),
            DumpLine::note(""),
            DumpLine::note("Or use partial filter (may include extra rows):"),
        ]
    }
}
