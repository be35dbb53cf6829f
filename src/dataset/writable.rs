use anyhow::Result;
use std::future::Future;

use crate::sql::WhereClause;

/// Represents a [`dataset`] that may can add or modify records.
/// The <E> type parameter represents a record type.
///
/// ```
/// let id = User::table().insert(&User { first_name: "John".to_string(), ..Default::default() }).await?;
/// User::table().delete(Some(&where_clause!("id = ?", id))).await?;
/// ```
///
/// [`dataset`]: super
pub trait WritableDataSet<E> {
    /// Insert a new record and return its id.
    fn insert(&self, record: &E) -> impl Future<Output = Result<i64>>;

    /// Overwrite columns of record `id`. Returns number of updated rows.
    fn update(&self, id: i64, record: &E) -> impl Future<Output = Result<u64>>;

    /// Delete records matching `clause`. Passing `None` deletes everything.
    fn delete(&self, clause: Option<&WhereClause>) -> impl Future<Output = Result<u64>>;
}
