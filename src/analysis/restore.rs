use sqlparser::ast::{BinaryOperator, Expr, UnaryOperator, Value};
use std::fmt::Write;

use super::where_renderer::RenderError;

/// Render an expression in compact MySQL restore form.
///
/// Comparison and arithmetic operators are written without surrounding spaces
/// (`a=1`, `x*1.10`), keyword operators keep theirs (`a AND b`, `c IN (1,2)`),
/// and string literals are always single-quoted. Constructs without a compact
/// form fall back to the parser's own `Display` rendering.
pub fn restore_expr(expr: &Expr) -> Result<String, RenderError> {
    let mut out = String::new();
    restore_into(expr, &mut out)?;
    Ok(out)
}

fn restore_into(expr: &Expr, out: &mut String) -> Result<(), RenderError> {
    match expr {
        Expr::Identifier(ident) => write!(out, "{ident}")?,
        Expr::CompoundIdentifier(parts) => {
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    out.push('.');
                }
                write!(out, "{part}")?;
            }
        }
        Expr::Value(value) => restore_value(&value.value, out)?,
        Expr::Prefixed { prefix, value } => {
            // Introducer touches the literal: _utf8mb4'abc'
            write!(out, "{prefix}")?;
            restore_into(value, out)?;
        }
        Expr::BinaryOp { left, op, right } => {
            restore_into(left, out)?;
            out.push_str(&binary_operator(op));
            restore_into(right, out)?;
        }
        Expr::UnaryOp { op, expr } => {
            match op {
                UnaryOperator::Not => out.push_str("NOT "),
                UnaryOperator::Minus => out.push('-'),
                UnaryOperator::Plus => out.push('+'),
                other => write!(out, "{other}")?,
            }
            restore_into(expr, out)?;
        }
        Expr::Nested(inner) => {
            out.push('(');
            restore_into(inner, out)?;
            out.push(')');
        }
        Expr::IsNull(inner) => {
            restore_into(inner, out)?;
            out.push_str(" IS NULL");
        }
        Expr::IsNotNull(inner) => {
            restore_into(inner, out)?;
            out.push_str(" IS NOT NULL");
        }
        Expr::IsTrue(inner) => {
            restore_into(inner, out)?;
            out.push_str(" IS TRUE");
        }
        Expr::IsFalse(inner) => {
            restore_into(inner, out)?;
            out.push_str(" IS FALSE");
        }
        Expr::InList {
            expr,
            list,
            negated,
        } => {
            restore_into(expr, out)?;
            out.push_str(if *negated { " NOT IN (" } else { " IN (" });
            for (i, item) in list.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                restore_into(item, out)?;
            }
            out.push(')');
        }
        Expr::InSubquery {
            expr,
            subquery,
            negated,
        } => {
            restore_into(expr, out)?;
            out.push_str(if *negated { " NOT IN (" } else { " IN (" });
            write!(out, "{subquery}")?;
            out.push(')');
        }
        Expr::Between {
            expr,
            negated,
            low,
            high,
        } => {
            restore_into(expr, out)?;
            out.push_str(if *negated { " NOT BETWEEN " } else { " BETWEEN " });
            restore_into(low, out)?;
            out.push_str(" AND ");
            restore_into(high, out)?;
        }
        Expr::Like {
            negated,
            expr,
            pattern,
            escape_char: None,
            ..
        } => {
            restore_into(expr, out)?;
            out.push_str(if *negated { " NOT LIKE " } else { " LIKE " });
            restore_into(pattern, out)?;
        }
        Expr::Wildcard(_) | Expr::QualifiedWildcard(..) => {
            return Err(RenderError::Unsupported(expr.to_string()));
        }
        other => write!(out, "{other}")?,
    }
    Ok(())
}

fn restore_value(value: &Value, out: &mut String) -> Result<(), RenderError> {
    match value {
        Value::SingleQuotedString(s)
        | Value::DoubleQuotedString(s)
        | Value::NationalStringLiteral(s) => {
            out.push('\'');
            out.push_str(&s.replace('\'', "''"));
            out.push('\'');
        }
        Value::Boolean(true) => out.push_str("TRUE"),
        Value::Boolean(false) => out.push_str("FALSE"),
        Value::Null => out.push_str("NULL"),
        other => write!(out, "{other}")?,
    }
    Ok(())
}

fn binary_operator(op: &BinaryOperator) -> String {
    match op {
        BinaryOperator::Eq => "=".to_string(),
        BinaryOperator::NotEq => "!=".to_string(),
        BinaryOperator::Lt => "<".to_string(),
        BinaryOperator::LtEq => "<=".to_string(),
        BinaryOperator::Gt => ">".to_string(),
        BinaryOperator::GtEq => ">=".to_string(),
        BinaryOperator::Spaceship => "<=>".to_string(),
        BinaryOperator::Plus => "+".to_string(),
        BinaryOperator::Minus => "-".to_string(),
        BinaryOperator::Multiply => "*".to_string(),
        BinaryOperator::Divide => "/".to_string(),
        BinaryOperator::Modulo => "%".to_string(),
        BinaryOperator::BitwiseAnd => "&".to_string(),
        BinaryOperator::BitwiseOr => "|".to_string(),
        BinaryOperator::BitwiseXor => "^".to_string(),
        BinaryOperator::And => " AND ".to_string(),
        BinaryOperator::Or => " OR ".to_string(),
        BinaryOperator::Xor => " XOR ".to_string(),
        BinaryOperator::MyIntegerDivide => " DIV ".to_string(),
        other => format!(" {other} "),
    }
}
