use std::future::Future;

use anyhow::Result;
use serde_json::{Map, Value};

use crate::sql::WhereClause;

/// Ordering and limit for [`ReadableDataSet::find`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub order_by: Option<String>,
    pub limit: Option<u64>,
}

impl FindOptions {
    pub fn with_order_by(mut self, order_by: &str) -> Self {
        self.order_by = Some(order_by.to_string());
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Represents a [`dataset`] that may be used to fetch data.
/// The <E> type parameter represents a record type.
///
/// ```
/// let clause = where_clause!("first_name = ?", "First")
///     .and(where_clause!("age > ?", 5));
///
/// let adults = User::table().count(Some(&clause)).await?;
/// ```
///
/// [`dataset`]: super
pub trait ReadableDataSet<E> {
    /// Count records matching `clause`, or all records when `None`.
    fn count(&self, clause: Option<&WhereClause>) -> impl Future<Output = Result<i64>>;

    fn exists(&self, clause: Option<&WhereClause>) -> impl Future<Output = Result<bool>>;

    /// Fetch records matching `clause` as a [`Vec<E>`].
    fn find(
        &self,
        clause: Option<&WhereClause>,
        options: FindOptions,
    ) -> impl Future<Output = Result<Vec<E>>>;

    /// Fetch records whose columns equal every value of `attrs`.
    ///
    /// ```
    /// let users = User::table().find_by(json!({"last_name": "Last"}).as_object().unwrap()).await?;
    /// ```
    fn find_by(&self, attrs: &Map<String, Value>) -> impl Future<Output = Result<Vec<E>>>;

    fn find_by_id(&self, id: i64) -> impl Future<Output = Result<Option<E>>>;

    fn all(&self) -> impl Future<Output = Result<Vec<E>>>;
}
