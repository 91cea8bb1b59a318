use pretty_assertions::assert_eq;
use sqlfacts::pipeline::dump_plan;
use sqlfacts::{ConnectionOptions, DumpLine, DumpPlanGenerator, DumpSettings};

fn plan(sql: &str, generator: &DumpPlanGenerator) -> Vec<String> {
    dump_plan(sql, generator)
        .unwrap()
        .iter()
        .map(DumpLine::to_string)
        .collect()
}

fn with_connection(connection: ConnectionOptions) -> DumpPlanGenerator {
    DumpPlanGenerator::new(DumpSettings {
        connection,
        ..Default::default()
    })
}

#[test]
fn test_multiple_statements_with_different_tables() {
    let sql = "SELECT u.name, p.title FROM users u JOIN posts p ON u.id = p.user_id WHERE u.active = 1 AND p.published = TRUE;
UPDATE users SET name = 'Jane' WHERE id = 1;
SELECT * FROM stat_git_record WHERE id IN ('gitee-22593-5e0e62e88c01e289be0b602ba553cdaec3fd084c')";

    assert_eq!(
        plan(sql, &DumpPlanGenerator::default()),
        [
            "mysqldump --where=\"active=1\" database_name users",
            "mysqldump --where=\"published=TRUE\" database_name posts",
            "mysqldump --where=\"id=1\" database_name users",
            "mysqldump --where=\"id IN ('gitee-22593-5e0e62e88c01e289be0b602ba553cdaec3fd084c')\" database_name stat_git_record",
        ]
    );
}

#[test]
fn test_two_select_statements_with_joins() {
    let sql = "SELECT * FROM users u JOIN orders o ON u.id = o.user_id WHERE u.status = 'active';
SELECT p.name, c.title FROM products p JOIN categories c ON p.category_id = c.id WHERE c.active = 1";

    assert_eq!(
        plan(sql, &DumpPlanGenerator::default()),
        [
            "mysqldump --where=\"status='active'\" database_name users",
            "mysqldump database_name orders",
            "mysqldump database_name products",
            "mysqldump --where=\"active=1\" database_name categories",
        ]
    );
}

#[test]
fn test_mixed_dml_statements() {
    let sql = "DELETE FROM logs WHERE created_at < '2023-01-01';
UPDATE users SET last_login = NOW() WHERE id = 5;
INSERT INTO audit_log (action, timestamp) VALUES ('cleanup', NOW())";

    assert_eq!(
        plan(sql, &DumpPlanGenerator::default()),
        [
            "mysqldump --where=\"created_at<'2023-01-01'\" database_name logs",
            "mysqldump --where=\"id=5\" database_name users",
            "mysqldump database_name audit_log",
        ]
    );
}

#[test]
fn test_three_way_join() {
    let sql = "SELECT u.name, o.total, p.title FROM users u JOIN orders o ON u.id = o.user_id JOIN products p ON o.product_id = p.id WHERE u.active = 1";

    assert_eq!(
        plan(sql, &DumpPlanGenerator::default()),
        [
            "mysqldump --where=\"active=1\" database_name users",
            "mysqldump database_name orders",
            "mysqldump database_name products",
        ]
    );
}

#[test]
fn test_user_and_host() {
    let generator = with_connection(ConnectionOptions::new().with_user("root").with_host("localhost"));
    let sql = "SELECT * FROM users WHERE id = 1;
SELECT * FROM orders WHERE user_id = 1";

    assert_eq!(
        plan(sql, &generator),
        [
            "mysqldump -h localhost -u root --where=\"id=1\" database_name users",
            "mysqldump -h localhost -u root --where=\"user_id=1\" database_name orders",
        ]
    );
}

#[test]
fn test_ip_user_and_password() {
    let generator = with_connection(
        ConnectionOptions::new()
            .with_user("admin")
            .with_password("secret")
            .with_ip("192.168.1.100"),
    );
    let sql = "UPDATE users SET status = 'active' WHERE id = 5;
DELETE FROM logs WHERE level = 'debug'";

    assert_eq!(
        plan(sql, &generator),
        [
            "mysqldump -h 192.168.1.100 -u admin --password=secret --where=\"id=5\" database_name users",
            "mysqldump -h 192.168.1.100 -u admin --password=secret --where=\"level='debug'\" database_name logs",
        ]
    );
}

#[test]
fn test_join_with_connection_options() {
    let generator = with_connection(
        ConnectionOptions::new()
            .with_user("dbuser")
            .with_host("db.example.com"),
    );
    let sql = "SELECT u.name, p.title FROM users u JOIN posts p ON u.id = p.user_id WHERE u.active = 1";

    assert_eq!(
        plan(sql, &generator),
        [
            "mysqldump -h db.example.com -u dbuser --where=\"active=1\" database_name users",
            "mysqldump -h db.example.com -u dbuser database_name posts",
        ]
    );
}

#[test]
fn test_update_with_join_dumps_primary_table_only() {
    let sql = "UPDATE Employees e
INNER JOIN Departments d ON e.DepartmentID = d.DepartmentID
SET e.Salary = e.Salary * 1.10
WHERE d.DepartmentName = 'Sales' AND e.YearsOfService >= 5";

    let lines = dump_plan(sql, &DumpPlanGenerator::default()).unwrap();
    let directives: Vec<String> = lines
        .iter()
        .filter(|line| line.is_directive())
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        directives,
        ["mysqldump --where=\"YearsOfService>=5\" database_name Employees"]
    );

    let rendered: Vec<String> = lines.iter().map(ToString::to_string).collect();
    assert_eq!(rendered[0], "# To get exact rows matching all JOIN conditions:");
    assert_eq!(
        rendered[2],
        "# mysql -N -e \"SELECT Employees.id FROM Employees JOIN Departments ON <join_condition> WHERE Departments.DepartmentName='Sales' and Employees.YearsOfService>=5\" database_name > /tmp/Employees_ids.txt"
    );
    assert_eq!(rendered[5], "#");
    assert_eq!(rendered[6], "# Or use partial filter (may include extra rows):");
}

#[test]
fn test_statement_without_tables() {
    assert_eq!(
        plan("SHOW DATABASES", &DumpPlanGenerator::default()),
        ["# No tables found in SQL statement"]
    );
}
