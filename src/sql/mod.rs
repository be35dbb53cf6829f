/// [`Joiner`] enum for the boolean keyword between two conditions
pub mod joiner;

/// [`Query`] struct for building entire SQL statements
pub mod query;

/// [`WhereClause`] struct for composing parameterized conditions
pub mod where_clause;

pub use joiner::Joiner;
pub use query::{Query, QueryType};
pub use where_clause::WhereClause;
