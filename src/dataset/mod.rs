//! Datasets are like a Vec<E>, but E are stored remotely and only fetched when needed.
//!
//! There are two traits for Datasets:
//!  - [`ReadableDataSet`]: allows to find and count rows
//!  - [`WritableDataSet`]: allows to insert, update or delete rows
//!
//! Both are implemented by [`Table`], and both take an optional [`WhereClause`] to
//! narrow down the rows they operate on.
//!
//! [`Table`]: crate::record::Table
//! [`WhereClause`]: crate::sql::WhereClause
mod readable;
pub use readable::{FindOptions, ReadableDataSet};

mod writable;
pub use writable::WritableDataSet;
