//! SQL parsing and read-only classification.
//!
//! Uses sqlparser-rs with the dialect matching the connected backend.

use sqlparser::ast::{Query, SetExpr, Statement, TableFactor, TableWithJoins};
use sqlparser::dialect::{Dialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect};
use sqlparser::parser::Parser;

use crate::db::DatabaseBackend;

use super::{Access, StatementType};

/// SQL classifier for one backend's dialect.
#[derive(Debug, Clone, Copy)]
pub struct SqlClassifier {
    backend: DatabaseBackend,
}

impl SqlClassifier {
    /// Creates a classifier that parses with `backend`'s dialect.
    pub fn new(backend: DatabaseBackend) -> Self {
        Self { backend }
    }

    /// Classifies a SQL string.
    pub fn classify(&self, sql: &str) -> Access {
        let dialect: Box<dyn Dialect> = match self.backend {
            DatabaseBackend::Postgres => Box::new(PostgreSqlDialect {}),
            DatabaseBackend::Mysql => Box::new(MySqlDialect {}),
            DatabaseBackend::Sqlite => Box::new(SQLiteDialect {}),
        };

        let statements = match Parser::parse_sql(dialect.as_ref(), sql) {
            Ok(statements) => statements,
            Err(e) => return Access::Unparsed(e.to_string()),
        };

        if statements.is_empty() {
            return Access::Writes(StatementType::Empty);
        }

        statements
            .iter()
            .find_map(|stmt| classify_statement(stmt).err())
            .map(Access::Writes)
            .unwrap_or(Access::ReadOnly)
    }
}

/// Convenience function to classify SQL without keeping a classifier around.
pub fn classify_sql(backend: DatabaseBackend, sql: &str) -> Access {
    SqlClassifier::new(backend).classify(sql)
}

/// `Ok(())` for reads, `Err(kind)` for the first write found.
type Verdict = std::result::Result<(), StatementType>;

fn classify_statement(statement: &Statement) -> Verdict {
    match statement {
        Statement::Query(query) => classify_query(query),
        Statement::Explain {
            analyze, statement, ..
        } => {
            // EXPLAIN ANALYZE runs the inner statement
            if *analyze {
                classify_statement(statement)
            } else {
                Ok(())
            }
        }
        Statement::Insert(_) => Err(StatementType::Insert),
        Statement::Update { .. } => Err(StatementType::Update),
        Statement::Delete(_) => Err(StatementType::Delete),
        Statement::Merge { .. } => Err(StatementType::Merge),
        Statement::Drop { .. } => Err(StatementType::Drop),
        Statement::Truncate { .. } => Err(StatementType::Truncate),
        Statement::AlterTable { .. }
        | Statement::AlterIndex { .. }
        | Statement::AlterView { .. }
        | Statement::AlterRole { .. } => Err(StatementType::Alter),
        Statement::CreateTable { .. }
        | Statement::CreateIndex { .. }
        | Statement::CreateView { .. }
        | Statement::CreateSchema { .. }
        | Statement::CreateDatabase { .. }
        | Statement::CreateFunction { .. }
        | Statement::CreateRole { .. }
        | Statement::CreateSequence { .. } => Err(StatementType::Create),
        Statement::Grant { .. } => Err(StatementType::Grant),
        Statement::Revoke { .. } => Err(StatementType::Revoke),
        _ => Err(StatementType::Other),
    }
}

/// Checks CTEs and the body; data-modifying CTEs count as writes.
fn classify_query(query: &Query) -> Verdict {
    if let Some(with) = &query.with {
        for cte in &with.cte_tables {
            classify_query(&cte.query)?;
        }
    }
    classify_set_expr(&query.body)
}

fn classify_set_expr(set_expr: &SetExpr) -> Verdict {
    match set_expr {
        // SELECT ... INTO creates a table
        SetExpr::Select(select) if select.into.is_some() => Err(StatementType::Create),
        SetExpr::Select(select) => select.from.iter().try_for_each(classify_table_with_joins),
        SetExpr::Query(query) => classify_query(query),
        SetExpr::SetOperation { left, right, .. } => {
            classify_set_expr(left)?;
            classify_set_expr(right)
        }
        SetExpr::Values(_) | SetExpr::Table(_) => Ok(()),
        SetExpr::Insert(stmt) | SetExpr::Update(stmt) => classify_statement(stmt),
        _ => Err(StatementType::Other),
    }
}

fn classify_table_with_joins(twj: &TableWithJoins) -> Verdict {
    classify_table_factor(&twj.relation)?;
    twj.joins
        .iter()
        .try_for_each(|join| classify_table_factor(&join.relation))
}

fn classify_table_factor(factor: &TableFactor) -> Verdict {
    match factor {
        TableFactor::Derived { subquery, .. } => classify_query(subquery),
        TableFactor::NestedJoin {
            table_with_joins, ..
        } => classify_table_with_joins(table_with_joins),
        _ => Ok(()),
    }
}
