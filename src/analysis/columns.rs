use sqlparser::ast::{
    AlterTableOperation, Assignment, AssignmentTarget, ColumnDef, Expr, Ident, ObjectName,
    ObjectNamePart, Visit, Visitor,
};
use std::ops::ControlFlow;

/// Collects column references in tree order, duplicates kept
pub(crate) struct ColumnCollector<'a> {
    columns: &'a mut Vec<String>,
}

impl<'a> ColumnCollector<'a> {
    pub(crate) fn new(columns: &'a mut Vec<String>) -> Self {
        ColumnCollector { columns }
    }

    /// Harvest every column reference reachable from `node`
    pub(crate) fn collect<V: Visit>(&mut self, node: &V) {
        let _ = node.visit(self);
    }

    pub(crate) fn push_ident(&mut self, ident: &Ident) {
        self.columns.push(ident.value.clone());
    }

    /// `SET a.b = ...` targets are names, not expressions
    pub(crate) fn collect_assignment(&mut self, assignment: &Assignment) {
        match &assignment.target {
            AssignmentTarget::ColumnName(name) => self.push_object_name(name),
            AssignmentTarget::Tuple(names) => {
                for name in names {
                    self.push_object_name(name);
                }
            }
        }
        self.collect(&assignment.value);
    }

    pub(crate) fn collect_column_defs(&mut self, defs: &[ColumnDef]) {
        for def in defs {
            self.push_ident(&def.name);
        }
    }

    pub(crate) fn collect_alter_operation(&mut self, operation: &AlterTableOperation) {
        match operation {
            AlterTableOperation::AddColumn { column_def, .. } => self.push_ident(&column_def.name),
            AlterTableOperation::DropColumn { column_name, .. } => self.push_ident(column_name),
            AlterTableOperation::RenameColumn {
                old_column_name,
                new_column_name,
            } => {
                self.push_ident(old_column_name);
                self.push_ident(new_column_name);
            }
            AlterTableOperation::ChangeColumn {
                old_name, new_name, ..
            } => {
                self.push_ident(old_name);
                self.push_ident(new_name);
            }
            AlterTableOperation::ModifyColumn { col_name, .. } => self.push_ident(col_name),
            _ => {}
        }
    }

    fn push_object_name(&mut self, name: &ObjectName) {
        if let Some(ObjectNamePart::Identifier(ident)) = name.0.last() {
            self.push_ident(ident);
        }
    }
}

impl Visitor for ColumnCollector<'_> {
    type Break = ();

    fn pre_visit_expr(&mut self, expr: &Expr) -> ControlFlow<Self::Break> {
        match expr {
            Expr::Identifier(ident) => self.push_ident(ident),
            Expr::CompoundIdentifier(parts) => {
                if let Some(ident) = parts.last() {
                    self.push_ident(ident);
                }
            }
            _ => {}
        }
        ControlFlow::Continue(())
    }
}
