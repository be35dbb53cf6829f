//! ActiveRecord-style records on top of SQLite, built around [`WhereClause`] composition.
//!
//! [`WhereClause`]: sql::WhereClause
pub mod config;
pub mod dataset;
pub mod datasource;
pub mod logging;
pub mod prelude;
pub mod record;
pub mod registry;
pub mod sql;
