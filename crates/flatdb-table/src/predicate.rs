//! Rows and `where` predicates.
//!
//! Rows cross the API keyed by column name; on disk their values are
//! ordered by the schema.

use std::collections::HashMap;

use flatdb_common::Value;
use flatdb_storage::ColumnDefinition;

use crate::error::{TableError, TableResult};

/// A row keyed by column name.
pub type Row = HashMap<String, Value>;

/// Equality conjunction over column values.
///
/// A record matches if every listed column holds an equal value. The empty
/// predicate matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    terms: HashMap<String, Value>,
}

impl Predicate {
    /// Predicate matching every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// Predicate requiring `column == value`.
    pub fn equals(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and_eq(column, value)
    }

    /// Adds the term `column == value`.
    #[must_use]
    pub fn and_eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.terms.insert(column.into(), value.into());
        self
    }

    /// Returns true if the predicate has no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Fails with `UnknownColumn` if a term names a column outside `columns`.
    pub fn validate(&self, columns: &[ColumnDefinition]) -> TableResult<()> {
        for name in self.terms.keys() {
            if !columns.iter().any(|c| &c.name == name) {
                return Err(TableError::UnknownColumn(name.clone()));
            }
        }
        Ok(())
    }

    /// Evaluates the predicate against values in column order.
    pub fn matches(&self, columns: &[ColumnDefinition], values: &[Value]) -> bool {
        self.terms.iter().all(|(name, expected)| {
            columns
                .iter()
                .position(|c| &c.name == name)
                .and_then(|idx| values.get(idx))
                .is_some_and(|actual| actual == expected)
        })
    }
}

impl From<Row> for Predicate {
    fn from(terms: Row) -> Self {
        Self { terms }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Predicate {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            terms: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Builds a [`Row`] from `(column, value)` pairs.
pub fn row<K, V, I>(pairs: I) -> Row
where
    K: Into<String>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
