pub use crate::config::DatabaseConfig;
pub use crate::dataset::{FindOptions, ReadableDataSet, WritableDataSet};
pub use crate::datasource::{DataSource, Sqlite};
pub use crate::record::{EmptyEntity, Entity, Table};
pub use crate::registry::Registry;
pub use crate::sql::{Joiner, Query, QueryType, WhereClause};
pub use crate::where_clause;
