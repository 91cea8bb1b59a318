// Textual attribution of canonical WHERE conditions to a single table.
//
// The split is flat: conditions are separated by the lowercase " and " the
// renderer produces. Parentheses, OR, and BETWEEN ... AND ... are not
// understood and may be cut in the wrong place.

const CONDITION_SEPARATOR: &str = " and ";

/// Return the part of `where_filter` that applies to `table`, with its
/// `table.` prefix removed.
///
/// Conditions qualified with another known table are dropped. Unqualified
/// conditions are kept as-is since they may belong to any table.
pub fn filter_where_for_table(where_filter: &str, table: &str, all_tables: &[String]) -> String {
    if where_filter.is_empty() {
        return String::new();
    }

    if all_tables.len() <= 1 {
        return where_filter.to_string();
    }

    let own_prefix = format!("{table}.");
    let relevant: Vec<String> = where_filter
        .split(CONDITION_SEPARATOR)
        .map(str::trim)
        .filter_map(|condition| {
            if condition.contains(&own_prefix) {
                Some(condition.replace(&own_prefix, ""))
            } else if mentions_any_table(condition, all_tables) {
                None
            } else {
                Some(condition.to_string())
            }
        })
        .collect();

    relevant.join(CONDITION_SEPARATOR)
}

/// Remove every `table.` prefix of every listed table
pub fn strip_table_prefixes(where_filter: &str, tables: &[String]) -> String {
    tables.iter().fold(where_filter.to_string(), |filter, table| {
        filter.replace(&format!("{table}."), "")
    })
}

fn mentions_any_table(condition: &str, tables: &[String]) -> bool {
    tables
        .iter()
        .any(|table| condition.contains(&format!("{table}.")))
}
