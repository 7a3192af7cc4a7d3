//! Composable SELECT statements for identifier-driven lookups.
//!
//! An [`EntityQuery`] starts from a base `SELECT ... FROM table alias` and
//! accumulates named joins and predicates. Joins are deduplicated by name so
//! several identifiers can require the same join without repeating it. Every
//! caller-supplied value becomes a bound `?` parameter; only the static SQL
//! fragments passed as `&'static str` end up in the statement text.

use sqlx::{SqlitePool, sqlite::SqliteRow};

use super::error::DbResult;

/// A named join clause. The name is normally the alias the clause introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Join {
    pub name: &'static str,
    pub clause: &'static str,
}

impl Join {
    pub const fn new(name: &'static str, clause: &'static str) -> Self {
        Self { name, clause }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    Eq {
        column: &'static str,
        value: String,
    },
    In {
        column: &'static str,
        values: Vec<String>,
    },
}

#[derive(Debug, Clone)]
pub struct EntityQuery {
    base: &'static str,
    joins: Vec<Join>,
    predicates: Vec<Predicate>,
    order_by: Vec<&'static str>,
}

impl EntityQuery {
    /// Start from `SELECT <columns> FROM <table> <alias>`.
    pub fn select(base: &'static str) -> Self {
        Self {
            base,
            joins: Vec::new(),
            predicates: Vec::new(),
            order_by: Vec::new(),
        }
    }

    /// Add a join unless one with the same name is already present.
    pub fn join(mut self, join: Join) -> Self {
        if !self.has_join(join.name) {
            self.joins.push(join);
        }
        self
    }

    pub fn has_join(&self, name: &str) -> bool {
        self.joins.iter().any(|j| j.name == name)
    }

    /// Add `column = ?`.
    pub fn filter_eq(mut self, column: &'static str, value: impl Into<String>) -> Self {
        self.predicates.push(Predicate::Eq {
            column,
            value: value.into(),
        });
        self
    }

    /// Add `column IN (?, ...)`. An empty set matches nothing.
    pub fn filter_in<I, V>(mut self, column: &'static str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.predicates.push(Predicate::In {
            column,
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn order_by(mut self, clause: &'static str) -> Self {
        self.order_by.push(clause);
        self
    }

    /// Render the statement and the values to bind, in placeholder order.
    pub fn build(&self) -> (String, Vec<&str>) {
        let mut sql = String::from(self.base);
        let mut binds = Vec::new();

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join.clause);
        }

        for (i, predicate) in self.predicates.iter().enumerate() {
            sql.push_str(if i == 0 { " WHERE " } else { " AND " });
            match predicate {
                Predicate::Eq { column, value } => {
                    sql.push_str(column);
                    sql.push_str(" = ?");
                    binds.push(value.as_str());
                }
                Predicate::In { values, .. } if values.is_empty() => {
                    sql.push_str("1 = 0");
                }
                Predicate::In { column, values } => {
                    let placeholders = values.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
                    sql.push_str(&format!("{column} IN ({placeholders})"));
                    binds.extend(values.iter().map(String::as_str));
                }
            }
        }

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }

        (sql, binds)
    }

    /// Execute against a SQLite pool.
    pub async fn fetch_all(&self, pool: &SqlitePool) -> DbResult<Vec<SqliteRow>> {
        let (sql, binds) = self.build();
        tracing::trace!(sql = %sql, params = binds.len(), "Entity query");

        let mut query = sqlx::query(&sql);
        for value in binds {
            query = query.bind(value);
        }
        Ok(query.fetch_all(pool).await?)
    }
}
