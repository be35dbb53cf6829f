use std::marker::PhantomData;

use anyhow::{anyhow, Context, Result};
use serde_json::{Map, Value};

use super::{EmptyEntity, Entity};
use crate::dataset::{FindOptions, ReadableDataSet, WritableDataSet};
use crate::datasource::DataSource;
use crate::sql::{Joiner, Query, QueryType, WhereClause};

#[derive(Clone)]
pub struct Table<D: DataSource, E: Entity> {
    data_source: D,
    table_name: String,
    id_column: String,
    columns: Vec<String>,
    _phantom: PhantomData<E>,
}

impl<D: DataSource> Table<D, EmptyEntity> {
    pub fn new(table_name: &str, data_source: D) -> Table<D, EmptyEntity> {
        Table::new_with_entity(table_name, data_source)
    }
}

impl<D: DataSource, E: Entity> Table<D, E> {
    pub fn new_with_entity(table_name: &str, data_source: D) -> Table<D, E> {
        Table {
            data_source,
            table_name: table_name.to_string(),
            id_column: "id".to_string(),
            columns: Vec::new(),
            _phantom: PhantomData,
        }
    }

    pub fn into_entity<E2: Entity>(self) -> Table<D, E2> {
        Table {
            data_source: self.data_source,
            table_name: self.table_name,
            id_column: self.id_column,
            columns: self.columns,
            _phantom: PhantomData,
        }
    }

    pub fn with_id_column(mut self, name: &str) -> Self {
        self.id_column = name.to_string();
        self
    }

    pub fn with_column(mut self, name: &str) -> Self {
        if !self.columns.iter().any(|c| c == name) {
            self.columns.push(name.to_string());
        }
        self
    }

    pub fn data_source(&self) -> &D {
        &self.data_source
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    fn id_clause(&self, id: i64) -> WhereClause {
        WhereClause::new(format!("{} = ?", self.id_column), vec![Value::from(id)])
    }

    pub fn get_select_query(&self) -> Query {
        let mut query = Query::new(&self.table_name);
        if !self.columns.is_empty() {
            query = query.with_column(&self.id_column);
            for column in &self.columns {
                query = query.with_column(column);
            }
        }
        query
    }

    pub fn get_count_query(&self, clause: Option<&WhereClause>) -> Query {
        let query = Query::new(&self.table_name).with_type(QueryType::Count);
        match clause {
            Some(clause) => query.with_condition(clause.clone()),
            None => query,
        }
    }

    /// Declared columns of `record`, without the id column.
    fn record_values(&self, record: &E) -> Result<Map<String, Value>> {
        let Value::Object(mut values) =
            serde_json::to_value(record).context("Failed to serialize record")?
        else {
            return Err(anyhow!("Record must serialize into a struct"));
        };

        let mut result = Map::new();
        for column in &self.columns {
            if *column == self.id_column {
                continue;
            }
            if let Some(value) = values.remove(column) {
                result.insert(column.clone(), value);
            }
        }
        Ok(result)
    }

    pub fn get_insert_query(&self, record: &E) -> Result<Query> {
        let mut query = Query::new(&self.table_name).with_type(QueryType::Insert);
        for (field, value) in self.record_values(record)? {
            query = query.with_set_field(&field, value);
        }
        Ok(query)
    }

    fn rows_into_entities(rows: Vec<Map<String, Value>>) -> Result<Vec<E>> {
        rows.into_iter()
            .map(|row| {
                serde_json::from_value(Value::Object(row)).context("Failed to deserialize record")
            })
            .collect()
    }
}

impl<D: DataSource, E: Entity> ReadableDataSet<E> for Table<D, E> {
    async fn count(&self, clause: Option<&WhereClause>) -> Result<i64> {
        let value = self
            .data_source
            .query_one(&self.get_count_query(clause))
            .await?;
        value
            .as_i64()
            .ok_or_else(|| anyhow!("COUNT(*) returned a non-integer {}", value))
    }

    async fn exists(&self, clause: Option<&WhereClause>) -> Result<bool> {
        Ok(self.count(clause).await? > 0)
    }

    async fn find(&self, clause: Option<&WhereClause>, options: FindOptions) -> Result<Vec<E>> {
        let mut query = self.get_select_query();
        if let Some(clause) = clause {
            query = query.with_condition(clause.clone());
        }
        if let Some(order_by) = &options.order_by {
            query = query.with_order_by(order_by);
        }
        if let Some(limit) = options.limit {
            query = query.with_limit(limit);
        }

        let rows = self.data_source.query_fetch(&query).await?;
        Self::rows_into_entities(rows)
    }

    async fn find_by(&self, attrs: &Map<String, Value>) -> Result<Vec<E>> {
        let clause = WhereClause::from_map(attrs, Joiner::And);
        self.find(clause.as_ref(), FindOptions::default()).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<E>> {
        let clause = self.id_clause(id);
        let found = self
            .find(Some(&clause), FindOptions::default().with_limit(1))
            .await?;
        Ok(found.into_iter().next())
    }

    async fn all(&self) -> Result<Vec<E>> {
        self.find(None, FindOptions::default()).await
    }
}

impl<D: DataSource, E: Entity> WritableDataSet<E> for Table<D, E> {
    async fn insert(&self, record: &E) -> Result<i64> {
        let query = self.get_insert_query(record)?;
        let id = self.data_source.query_insert(&query).await?;
        tracing::debug!(table = %self.table_name, id, "inserted record");
        Ok(id)
    }

    async fn update(&self, id: i64, record: &E) -> Result<u64> {
        let values = self.record_values(record)?;
        if values.is_empty() {
            return Ok(0);
        }

        let mut query = Query::new(&self.table_name).with_type(QueryType::Update);
        for (field, value) in values {
            query = query.with_set_field(&field, value);
        }
        let query = query.with_condition(self.id_clause(id));

        self.data_source.query_exec(&query).await
    }

    async fn delete(&self, clause: Option<&WhereClause>) -> Result<u64> {
        let mut query = Query::new(&self.table_name).with_type(QueryType::Delete);
        if let Some(clause) = clause {
            query = query.with_condition(clause.clone());
        }
        self.data_source.query_exec(&query).await
    }
}
