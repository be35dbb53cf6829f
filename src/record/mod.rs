//! [`Table`] struct and [`Entity`] trait for mapping SQL tables to Rust structs.
//!
//! A table knows its name, id column and the columns it is allowed to write. Reading and
//! writing records goes through [`ReadableDataSet`] and [`WritableDataSet`], with
//! [`WhereClause`] narrowing down the rows:
//!
//! ```
//! let users = Table::<Sqlite, User>::new_with_entity("users", db)
//!     .with_column("first_name")
//!     .with_column("last_name")
//!     .with_column("age");
//!
//! users.insert(&User { first_name: "First".into(), ..Default::default() }).await?;
//! let n = users.count(Some(&where_clause!("first_name = ?", "First"))).await?;
//! ```
//!
//! [`ReadableDataSet`]: crate::dataset::ReadableDataSet
//! [`WritableDataSet`]: crate::dataset::WritableDataSet
//! [`WhereClause`]: crate::sql::WhereClause
mod entity;
mod table;

pub use entity::{EmptyEntity, Entity};
pub use table::Table;
