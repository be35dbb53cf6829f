use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// A row type that can be stored in a [`Table`].
///
/// [`Table`]: super::Table
pub trait Entity:
    Serialize + DeserializeOwned + Default + Clone + Send + Sync + Sized + 'static
{
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct EmptyEntity {}

impl Entity for EmptyEntity {}
