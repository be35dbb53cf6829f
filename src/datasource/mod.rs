#![allow(async_fn_in_trait)]

use anyhow::Result;
use serde_json::{Map, Value};

use crate::sql::Query;

pub mod sqlite;

pub use sqlite::Sqlite;

pub trait DataSource: Clone + Send + Sync {
    // Provided with an arbitrary query, fetch the results as rows of named values
    async fn query_fetch(&self, query: &Query) -> Result<Vec<Map<String, Value>>>;

    // First column of the first row, e.g. the result of COUNT(*)
    async fn query_one(&self, query: &Query) -> Result<Value>;

    // Execute a query without returning any results (DELETE, UPDATE), returns affected rows
    async fn query_exec(&self, query: &Query) -> Result<u64>;

    // Execute an INSERT query and return id of the new row
    async fn query_insert(&self, query: &Query) -> Result<i64>;
}
