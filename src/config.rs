use clap::Parser;

/// Connection settings, read from the environment (and `.env`, if present).
#[derive(Debug, Clone, Parser)]
#[command(name = "recordkit")]
pub struct DatabaseConfig {
    /// sqlx connection url, e.g. `sqlite://records.db` or `sqlite::memory:`
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite::memory:")]
    pub url: String,

    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Ok(Self::try_parse_from(["recordkit"])?)
    }

    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}
