use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use serde_json::{Map, Value};
use sqlx::sqlite::{SqliteArguments, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row, TypeInfo, ValueRef};

use super::DataSource;
use crate::config::DatabaseConfig;
use crate::sql::where_clause::count_placeholders;
use crate::sql::{Query, QueryType};

type SqliteQuery<'q> = sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>>;

#[derive(Debug, Clone)]
pub struct Sqlite {
    pool: Arc<sqlx::SqlitePool>,
}

impl Sqlite {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let mut options = SqlitePoolOptions::new().max_connections(config.max_connections);

        // every connection to `:memory:` opens its own database
        if config.is_in_memory() {
            options = options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = options
            .connect(&config.url)
            .await
            .with_context(|| format!("Failed to connect to {}", config.url))?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    pub fn pool(&self) -> &sqlx::SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await
    }

    /// Execute a statement without parameters, such as `CREATE TABLE`.
    pub async fn execute_raw(&self, sql: &str) -> Result<u64> {
        tracing::debug!(sql, "executing raw statement");
        let result = sqlx::query(sql)
            .execute(&*self.pool)
            .await
            .with_context(|| format!("Error in statement {}", sql))?;
        Ok(result.rows_affected())
    }

    // Will be possible extended with some advanced types
    fn bind<'q>(&self, mut query: SqliteQuery<'q>, params: Vec<Value>) -> Result<SqliteQuery<'q>> {
        for param in params {
            query = match param {
                Value::Null => query.bind(None::<String>),
                Value::Bool(b) => query.bind(b),
                Value::Number(n) => match n.as_i64() {
                    Some(i) => query.bind(i),
                    // SQLite INTEGER is 64-bit signed, a REAL would silently round
                    None if n.is_u64() => bail!("Integer {} does not fit into SQLite INTEGER", n),
                    None => query.bind(n.as_f64()),
                },
                Value::String(s) => query.bind(s),
                other => query.bind(other.to_string()),
            };
        }
        Ok(query)
    }

    fn render(&self, query: &Query) -> Result<(String, Vec<Value>)> {
        let (sql, params) = query.render();
        let placeholders = count_placeholders(&sql);
        if placeholders != params.len() {
            bail!(
                "Query has {} placeholders but {} parameters: {}",
                placeholders,
                params.len(),
                sql
            );
        }
        tracing::debug!(sql = %sql, params = params.len(), "executing query");
        Ok((sql, params))
    }

    fn row_to_json(row: &SqliteRow) -> Result<Map<String, Value>> {
        let mut map = Map::new();
        for (i, column) in row.columns().iter().enumerate() {
            let raw = row.try_get_raw(i)?;
            let value = if raw.is_null() {
                Value::Null
            } else if column.type_info().name() == "BOOLEAN" {
                // booleans are stored as INTEGER, only the declared type tells them apart
                Value::from(row.try_get::<bool, _>(i)?)
            } else {
                let type_name = raw.type_info().name().to_string();
                match type_name.as_str() {
                    "INTEGER" => Value::from(row.try_get::<i64, _>(i)?),
                    "REAL" => Value::from(row.try_get::<f64, _>(i)?),
                    "TEXT" => Value::from(row.try_get::<String, _>(i)?),
                    _ => {
                        return Err(anyhow!(
                            "Unsupported type: {} for column {}",
                            type_name,
                            column.name()
                        ))
                    }
                }
            };
            map.insert(column.name().to_string(), value);
        }
        Ok(map)
    }
}

/// Sqlite is equal to its clones.
impl PartialEq for Sqlite {
    fn eq(&self, other: &Sqlite) -> bool {
        Arc::ptr_eq(&self.pool, &other.pool)
    }
}

impl DataSource for Sqlite {
    async fn query_fetch(&self, query: &Query) -> Result<Vec<Map<String, Value>>> {
        let (sql, params) = self.render(query)?;
        let rows = self
            .bind(sqlx::query(&sql), params)?
            .fetch_all(&*self.pool)
            .await
            .with_context(|| format!("Error in query {}", query.preview()))?;

        rows.iter().map(Self::row_to_json).collect()
    }

    async fn query_one(&self, query: &Query) -> Result<Value> {
        let rows = self.query_fetch(query).await?;
        let Some(row) = rows.into_iter().next() else {
            return Err(anyhow!("No rows for query_one"));
        };
        let Some((_, value)) = row.into_iter().next() else {
            return Err(anyhow!("No cells in a first row of query_one"));
        };
        Ok(value)
    }

    async fn query_exec(&self, query: &Query) -> Result<u64> {
        let (sql, params) = self.render(query)?;
        let result = self
            .bind(sqlx::query(&sql), params)?
            .execute(&*self.pool)
            .await
            .with_context(|| format!("Error in query {}", query.preview()))?;
        Ok(result.rows_affected())
    }

    async fn query_insert(&self, query: &Query) -> Result<i64> {
        if query.query_type() != QueryType::Insert {
            bail!("query_insert expects an INSERT query");
        }
        let (sql, params) = self.render(query)?;
        let result = self
            .bind(sqlx::query(&sql), params)?
            .execute(&*self.pool)
            .await
            .with_context(|| format!("Error in query {}", query.preview()))?;
        Ok(result.last_insert_rowid())
    }
}
