use std::fmt;

use serde::{Deserialize, Serialize};

/// Boolean keyword placed between two [`WhereClause`]s by [`WhereClause::compose`].
///
/// [`WhereClause`]: super::WhereClause
/// [`WhereClause::compose`]: super::WhereClause::compose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Joiner {
    #[default]
    And,
    Or,
}

impl Joiner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Joiner::And => "AND",
            Joiner::Or => "OR",
        }
    }
}

impl fmt::Display for Joiner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
