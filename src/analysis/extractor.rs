use sqlparser::ast::{
    AlterTableOperation, Assignment, ColumnDef, Delete, Expr, FromTable, Ident, Insert,
    ObjectName, ObjectType, OrderByExpr, Query, Select, SetExpr, Statement, TableObject, TableWithJoins,
    UpdateTableFromKind,
};
use tracing::{debug, warn};

use super::columns::ColumnCollector;
use super::join_tree::{table_name, walk_tables, walk_table_with_joins};
use super::where_renderer::WhereRenderer;
use super::{FactsBuilder, StatementAction, StatementFacts};

/// A statement reduced to the fields extraction needs
enum StatementShape<'a> {
    Insert {
        table: Option<&'a ObjectName>,
        columns: &'a [Ident],
        source: Option<&'a Query>,
    },
    Update {
        table: &'a TableWithJoins,
        assignments: &'a [Assignment],
        from: &'a [TableWithJoins],
        selection: Option<&'a Expr>,
    },
    Delete {
        targets: &'a [ObjectName],
        from: &'a [TableWithJoins],
        using: &'a [TableWithJoins],
        selection: Option<&'a Expr>,
        order_by: &'a [OrderByExpr],
        limit: Option<&'a Expr>,
    },
    Select {
        query: &'a Query,
    },
    Alter {
        name: &'a ObjectName,
        operations: &'a [AlterTableOperation],
    },
    Create {
        name: &'a ObjectName,
        columns: &'a [ColumnDef],
    },
    Drop {
        names: &'a [ObjectName],
    },
    Truncate {
        name: Option<&'a ObjectName>,
    },
    Unsupported,
}

impl<'a> StatementShape<'a> {
    fn of(statement: &'a Statement) -> Self {
        match statement {
            Statement::Insert(insert) => Self::of_insert(insert),
            Statement::Update {
                table,
                assignments,
                from,
                selection,
                ..
            } => StatementShape::Update {
                table,
                assignments,
                from: match from {
                    Some(UpdateTableFromKind::BeforeSet(sources))
                    | Some(UpdateTableFromKind::AfterSet(sources)) => sources,
                    None => &[],
                },
                selection: selection.as_ref(),
            },
            Statement::Delete(delete) => Self::of_delete(delete),
            Statement::Query(query) => StatementShape::Select { query },
            Statement::AlterTable {
                name, operations, ..
            } => StatementShape::Alter { name, operations },
            Statement::CreateTable(create) => StatementShape::Create {
                name: &create.name,
                columns: &create.columns,
            },
            Statement::Drop {
                object_type: ObjectType::Table,
                names,
                ..
            } => StatementShape::Drop { names },
            Statement::Truncate { table_names, .. } => StatementShape::Truncate {
                name: table_names.first().map(|target| &target.name),
            },
            _ => StatementShape::Unsupported,
        }
    }

    fn of_insert(insert: &'a Insert) -> Self {
        StatementShape::Insert {
            table: match &insert.table {
                TableObject::TableName(name) => Some(name),
                _ => None,
            },
            columns: &insert.columns,
            source: insert.source.as_deref(),
        }
    }

    fn of_delete(delete: &'a Delete) -> Self {
        let from = match &delete.from {
            FromTable::WithFromKeyword(sources) | FromTable::WithoutKeyword(sources) => sources,
        };
        StatementShape::Delete {
            targets: &delete.tables,
            from,
            using: delete.using.as_deref().unwrap_or(&[]),
            selection: delete.selection.as_ref(),
            order_by: &delete.order_by,
            limit: delete.limit.as_ref(),
        }
    }
}

/// Extract facts from one statement tree.
///
/// Never fails: statements outside the supported set produce facts with no
/// action and empty fields.
pub fn extract(statement: &Statement) -> StatementFacts {
    let facts = match StatementShape::of(statement) {
        StatementShape::Insert {
            table,
            columns,
            source,
        } => extract_insert(table, columns, source),
        StatementShape::Update {
            table,
            assignments,
            from,
            selection,
        } => extract_update(table, assignments, from, selection),
        StatementShape::Delete {
            targets,
            from,
            using,
            selection,
            order_by,
            limit,
        } => extract_delete(targets, from, using, selection, order_by, limit),
        StatementShape::Select { query } => extract_select(query),
        StatementShape::Alter { name, operations } => extract_alter(name, operations),
        StatementShape::Create { name, columns } => extract_create(name, columns),
        StatementShape::Drop { names } => extract_drop(names),
        StatementShape::Truncate { name } => extract_truncate(name),
        StatementShape::Unsupported => {
            debug!("No facts extracted for unsupported statement: {}", statement);
            StatementFacts::default()
        }
    };

    debug!(
        "Extracted {:?}: tables={:?} where={:?}",
        facts.action(),
        facts.tables(),
        facts.where_filter()
    );
    facts
}

fn extract_insert(
    table: Option<&ObjectName>,
    columns: &[Ident],
    source: Option<&Query>,
) -> StatementFacts {
    let mut builder = FactsBuilder::new(StatementAction::Insert);
    if let Some(name) = table {
        builder.add_table(&table_name(name));
    }

    let mut collector = ColumnCollector::new(builder.columns_mut());
    for column in columns {
        collector.push_ident(column);
    }
    if let Some(query) = source {
        collector.collect(query);
    }

    builder.build()
}

fn extract_update(
    table: &TableWithJoins,
    assignments: &[Assignment],
    from: &[TableWithJoins],
    selection: Option<&Expr>,
) -> StatementFacts {
    let mut builder = FactsBuilder::new(StatementAction::Update);
    walk_table_with_joins(table, &mut builder);
    walk_tables(from, &mut builder);
    builder.mark_primary_table();

    let mut collector = ColumnCollector::new(builder.columns_mut());
    collector.collect(table);
    for assignment in assignments {
        collector.collect_assignment(assignment);
    }
    for source in from {
        collector.collect(source);
    }
    if let Some(expr) = selection {
        collector.collect(expr);
    }

    let filter = WhereRenderer::new(builder.alias_map()).render_or_empty(selection);
    builder.set_where_filter(filter);
    builder.build()
}

fn extract_delete(
    targets: &[ObjectName],
    from: &[TableWithJoins],
    using: &[TableWithJoins],
    selection: Option<&Expr>,
    order_by: &[OrderByExpr],
    limit: Option<&Expr>,
) -> StatementFacts {
    let mut builder = FactsBuilder::new(StatementAction::Delete);
    walk_tables(from, &mut builder);
    walk_tables(using, &mut builder);
    builder.mark_primary_table();
    check_delete_target(targets, &builder);

    let mut collector = ColumnCollector::new(builder.columns_mut());
    for source in from.iter().chain(using) {
        collector.collect(source);
    }
    if let Some(expr) = selection {
        collector.collect(expr);
    }
    for item in order_by {
        collector.collect(item);
    }
    if let Some(expr) = limit {
        collector.collect(expr);
    }

    let filter = WhereRenderer::new(builder.alias_map()).render_or_empty(selection);
    builder.set_where_filter(filter);
    builder.build()
}

/// The first table is assumed to be the mutation target; flag explicit
/// `DELETE t FROM ...` targets that disagree.
fn check_delete_target(targets: &[ObjectName], builder: &FactsBuilder) {
    let Some(target) = targets.first() else {
        return;
    };
    let named = table_name(target);
    let resolved = builder
        .alias_map()
        .get(&named)
        .cloned()
        .unwrap_or(named);

    let Some(primary) = builder.tables().first() else {
        return;
    };
    if *primary != resolved {
        warn!(
            "DELETE target '{}' differs from first joined table '{}'; dumping '{}'",
            resolved, primary, primary
        );
    }
}

fn extract_select(query: &Query) -> StatementFacts {
    let mut builder = FactsBuilder::new(StatementAction::Select);

    let mut selects = Vec::new();
    collect_selects(&query.body, &mut selects);
    for select in &selects {
        walk_tables(&select.from, &mut builder);
    }

    ColumnCollector::new(builder.columns_mut()).collect(query);

    let selection = selects.first().and_then(|select| select.selection.as_ref());
    let filter = WhereRenderer::new(builder.alias_map()).render_or_empty(selection);
    builder.set_where_filter(filter);
    builder.build()
}

/// SELECT blocks of a query body, set operations left to right
fn collect_selects<'a>(body: &'a SetExpr, selects: &mut Vec<&'a Select>) {
    match body {
        SetExpr::Select(select) => selects.push(select),
        SetExpr::Query(query) => collect_selects(&query.body, selects),
        SetExpr::SetOperation { left, right, .. } => {
            collect_selects(left, selects);
            collect_selects(right, selects);
        }
        _ => {}
    }
}

fn extract_alter(name: &ObjectName, operations: &[AlterTableOperation]) -> StatementFacts {
    let mut builder = FactsBuilder::new(StatementAction::Alter);
    builder.add_table(&table_name(name));

    let mut collector = ColumnCollector::new(builder.columns_mut());
    for operation in operations {
        collector.collect_alter_operation(operation);
    }
    builder.build()
}

fn extract_create(name: &ObjectName, columns: &[ColumnDef]) -> StatementFacts {
    let mut builder = FactsBuilder::new(StatementAction::Create);
    builder.add_table(&table_name(name));
    ColumnCollector::new(builder.columns_mut()).collect_column_defs(columns);
    builder.build()
}

fn extract_drop(names: &[ObjectName]) -> StatementFacts {
    let mut builder = FactsBuilder::new(StatementAction::Drop);
    for name in names {
        builder.add_table(&table_name(name));
    }
    builder.build()
}

fn extract_truncate(name: Option<&ObjectName>) -> StatementFacts {
    let mut builder = FactsBuilder::new(StatementAction::Truncate);
    if let Some(name) = name {
        builder.add_table(&table_name(name));
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sqlparser::dialect::MySqlDialect;
    use sqlparser::parser::Parser;

    fn extract_sql(sql: &str) -> StatementFacts {
        let statements = Parser::parse_sql(&MySqlDialect {}, sql).unwrap();
        extract(&statements[0])
    }

    #[test]
    fn test_insert() {
        let facts = extract_sql("INSERT INTO users (id, name, email) VALUES (1, 'John', 'john@example.com')");
        assert_eq!(facts.action(), Some(StatementAction::Insert));
        assert_eq!(facts.tables(), ["users"]);
        assert_eq!(facts.columns(), ["id", "name", "email"]);
        assert_eq!(facts.where_filter(), "");
        assert_eq!(facts.primary_table(), None);
    }

    #[test]
    fn test_update_single_table() {
        let facts = extract_sql("UPDATE users SET name = 'Jane', email = 'jane@example.com' WHERE id = 1 AND status = 'active'");
        assert_eq!(facts.action(), Some(StatementAction::Update));
        assert_eq!(facts.tables(), ["users"]);
        assert_eq!(facts.columns(), ["name", "email", "id", "status"]);
        assert_eq!(facts.where_filter(), "id=1 and status='active'");
        assert_eq!(facts.primary_table(), Some("users"));
    }

    #[test]
    fn test_update_with_alias() {
        let facts = extract_sql("UPDATE users u SET u.name = 'Jane' WHERE u.id = 1");
        assert_eq!(facts.tables(), ["users"]);
        assert_eq!(facts.columns(), ["name", "id"]);
        assert_eq!(facts.where_filter(), "users.id=1");
    }

    #[test]
    fn test_update_without_where() {
        let facts = extract_sql("UPDATE users SET last_login = NOW()");
        assert_eq!(facts.columns(), ["last_login"]);
        assert_eq!(facts.where_filter(), "");
    }

    #[test]
    fn test_update_join() {
        let facts = extract_sql(
            "UPDATE Employees e INNER JOIN Departments d ON e.DepartmentID = d.DepartmentID \
             SET e.Salary = e.Salary * 1.10 \
             WHERE d.DepartmentName = 'Sales' AND e.YearsOfService >= 5",
        );
        assert_eq!(facts.action(), Some(StatementAction::Update));
        assert_eq!(facts.tables(), ["Employees", "Departments"]);
        assert_eq!(facts.primary_table(), Some("Employees"));
        assert_eq!(
            facts.columns(),
            ["DepartmentID", "DepartmentID", "Salary", "Salary", "DepartmentName", "YearsOfService"]
        );
        assert_eq!(
            facts.where_filter(),
            "Departments.DepartmentName='Sales' and Employees.YearsOfService>=5"
        );
    }

    #[test]
    fn test_delete() {
        let facts = extract_sql("DELETE FROM users WHERE status = 'inactive' AND last_login < '2023-01-01'");
        assert_eq!(facts.action(), Some(StatementAction::Delete));
        assert_eq!(facts.tables(), ["users"]);
        assert_eq!(facts.columns(), ["status", "last_login"]);
        assert_eq!(facts.where_filter(), "status='inactive' and last_login<'2023-01-01'");
        assert_eq!(facts.primary_table(), Some("users"));
    }

    #[test]
    fn test_delete_join_with_aliases() {
        let facts = extract_sql(
            "DELETE u FROM users u JOIN profiles p ON u.id = p.user_id WHERE u.status = 'inactive' AND p.last_login < '2023-01-01'",
        );
        assert_eq!(facts.tables(), ["users", "profiles"]);
        assert_eq!(facts.columns(), ["id", "user_id", "status", "last_login"]);
        assert_eq!(
            facts.where_filter(),
            "users.status='inactive' and profiles.last_login<'2023-01-01'"
        );
        assert_eq!(facts.primary_table(), Some("users"));
    }

    #[test]
    fn test_select_join_with_aliases() {
        let facts = extract_sql(
            "SELECT u.name, p.title FROM users u JOIN posts p ON u.id = p.user_id WHERE u.active = 1",
        );
        assert_eq!(facts.action(), Some(StatementAction::Select));
        assert_eq!(facts.tables(), ["users", "posts"]);
        assert_eq!(facts.columns(), ["name", "title", "id", "user_id", "active"]);
        assert_eq!(facts.where_filter(), "users.active=1");
        assert_eq!(facts.primary_table(), None);
    }

    #[test]
    fn test_select_union_collects_both_sides() {
        let facts = extract_sql(
            "SELECT id FROM users WHERE id = 1 UNION SELECT id FROM archived_users WHERE id = 2",
        );
        assert_eq!(facts.tables(), ["users", "archived_users"]);
        assert_eq!(facts.where_filter(), "id=1");
    }

    #[test]
    fn test_select_in_list() {
        let facts = extract_sql("SELECT * FROM stat_git_record WHERE id IN ('gitee-22593')");
        assert_eq!(facts.tables(), ["stat_git_record"]);
        assert_eq!(facts.where_filter(), "id IN ('gitee-22593')");
    }

    #[test]
    fn test_alter_add_column() {
        let facts = extract_sql(
            "ALTER TABLE ai_mig_project_space ADD COLUMN manual tinyint(1) DEFAULT 0 COMMENT '是否手动迁移'",
        );
        assert_eq!(facts.action(), Some(StatementAction::Alter));
        assert_eq!(facts.tables(), ["ai_mig_project_space"]);
        assert_eq!(facts.columns(), ["manual"]);
    }

    #[test]
    fn test_delete_order_by_columns_follow_where() {
        let facts = extract_sql("DELETE FROM logs WHERE level = 'info' ORDER BY created_at DESC, id LIMIT 100");
        assert_eq!(facts.columns(), ["level", "created_at", "id"]);
        assert_eq!(facts.where_filter(), "level='info'");
    }

    #[test]
    fn test_alter_column_operations() {
        let cases = [
            ("ALTER TABLE users DROP COLUMN age", vec!["age"]),
            ("ALTER TABLE users RENAME COLUMN name TO full_name", vec!["name", "full_name"]),
            ("ALTER TABLE users CHANGE COLUMN email mail VARCHAR(100)", vec!["email", "mail"]),
            ("ALTER TABLE users MODIFY COLUMN age BIGINT", vec!["age"]),
            ("ALTER TABLE users ADD COLUMN nickname VARCHAR(20), DROP COLUMN legacy", vec!["nickname", "legacy"]),
        ];

        for (sql, columns) in cases {
            let facts = extract_sql(sql);
            assert_eq!(facts.action(), Some(StatementAction::Alter), "{sql}");
            assert_eq!(facts.tables(), ["users"], "{sql}");
            assert_eq!(facts.columns(), columns, "{sql}");
        }
    }

    #[test]
    fn test_swapped_table_aliases() {
        let facts = extract_sql("SELECT * FROM a b JOIN b a ON b.id = a.id WHERE b.x = 1 AND a.y = 2");
        assert_eq!(facts.tables(), ["a", "b"]);
        assert_eq!(facts.where_filter(), "a.x=1 and b.y=2");
    }

    #[test]
    fn test_create_table() {
        let facts = extract_sql("CREATE TABLE users (id INT PRIMARY KEY, name VARCHAR(100))");
        assert_eq!(facts.action(), Some(StatementAction::Create));
        assert_eq!(facts.tables(), ["users"]);
        assert_eq!(facts.columns(), ["id", "name"]);
    }

    #[test]
    fn test_drop_multiple_tables() {
        let facts = extract_sql("DROP TABLE users, orders, products");
        assert_eq!(facts.action(), Some(StatementAction::Drop));
        assert_eq!(facts.tables(), ["users", "orders", "products"]);
        assert!(facts.columns().is_empty());
        assert_eq!(facts.where_filter(), "");
    }

    #[test]
    fn test_truncate() {
        let facts = extract_sql("TRUNCATE TABLE logs");
        assert_eq!(facts.action(), Some(StatementAction::Truncate));
        assert_eq!(facts.tables(), ["logs"]);
        assert!(facts.columns().is_empty());
    }

    #[test]
    fn test_unsupported_statement_has_no_action() {
        let facts = extract_sql("SHOW TABLES");
        assert_eq!(facts.action(), None);
        assert!(facts.tables().is_empty());
    }
}
