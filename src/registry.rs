use anyhow::Result;

use crate::config::DatabaseConfig;
use crate::datasource::Sqlite;

/// Owns the opened database and hands out its [`Sqlite`] data source.
///
/// ```
/// let registry = Registry::open(&DatabaseConfig::from_env()?).await?;
/// let users = User::table(registry.data_source());
/// // ...
/// registry.close().await;
/// ```
///
/// The pool is also released when the last clone of the data source is dropped, so a
/// registry that goes out of scope early (an error or a failed assertion) still tears down.
#[derive(Debug)]
pub struct Registry {
    data_source: Sqlite,
    url: String,
}

impl Registry {
    pub async fn open(config: &DatabaseConfig) -> Result<Registry> {
        let data_source = Sqlite::connect(config).await?;
        tracing::info!(url = %config.url, "database opened");
        Ok(Registry {
            data_source,
            url: config.url.clone(),
        })
    }

    pub fn data_source(&self) -> Sqlite {
        self.data_source.clone()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn close(self) {
        self.data_source.close().await;
        tracing::info!(url = %self.url, "database closed");
    }
}
