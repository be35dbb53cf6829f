use indexmap::IndexMap;
use serde_json::Value;

use super::where_clause::preview;
use super::WhereClause;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    Select,
    Count,
    Insert,
    Update,
    Delete,
}

/// A single-table statement with an optional [`WhereClause`].
///
/// ```
/// let query = Query::new("users")
///     .with_type(QueryType::Count)
///     .with_condition(where_clause!("age > ?", 18));
///
/// let (sql, params) = query.render();  // SELECT COUNT(*) FROM users WHERE age > ?
/// ```
#[derive(Debug, Clone)]
pub struct Query {
    table: String,
    query_type: QueryType,
    columns: Vec<String>,
    set_fields: IndexMap<String, Value>,
    condition: Option<WhereClause>,
    order_by: Vec<String>,
    limit: Option<u64>,
}

impl Query {
    pub fn new(table: &str) -> Query {
        Query {
            table: table.to_string(),
            query_type: QueryType::Select,
            columns: Vec::new(),
            set_fields: IndexMap::new(),
            condition: None,
            order_by: Vec::new(),
            limit: None,
        }
    }

    pub fn with_type(mut self, query_type: QueryType) -> Self {
        self.query_type = query_type;
        self
    }

    pub fn with_column(mut self, name: &str) -> Self {
        self.columns.push(name.to_string());
        self
    }

    pub fn with_set_field(mut self, field: &str, value: Value) -> Self {
        self.set_fields.insert(field.to_string(), value);
        self
    }

    /// Adds a condition. A second call joins it to the existing one with `AND`.
    /// Empty clauses are ignored.
    pub fn with_condition(mut self, condition: WhereClause) -> Self {
        if condition.is_empty() {
            return self;
        }
        self.condition = Some(match self.condition.take() {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }

    pub fn with_order_by(mut self, order_by: &str) -> Self {
        self.order_by.push(order_by.to_string());
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn query_type(&self) -> QueryType {
        self.query_type
    }

    pub fn condition(&self) -> Option<&WhereClause> {
        self.condition.as_ref()
    }

    fn render_columns(&self) -> String {
        if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(", ")
        }
    }

    fn render_where(&self, sql: &mut String, params: &mut Vec<Value>) {
        if let Some(condition) = &self.condition {
            sql.push_str(" WHERE ");
            sql.push_str(condition.template());
            params.extend(condition.params().iter().cloned());
        }
    }

    fn render_tail(&self, sql: &mut String) {
        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
    }

    /// Render the statement into SQL with `?` placeholders and the values to bind.
    pub fn render(&self) -> (String, Vec<Value>) {
        let mut params = Vec::new();
        let mut sql = match self.query_type {
            QueryType::Select => format!("SELECT {} FROM {}", self.render_columns(), self.table),
            QueryType::Count => format!("SELECT COUNT(*) FROM {}", self.table),
            QueryType::Insert if self.set_fields.is_empty() => {
                format!("INSERT INTO {} DEFAULT VALUES", self.table)
            }
            QueryType::Insert => {
                let fields = self.set_fields.keys().cloned().collect::<Vec<_>>();
                let placeholders = vec!["?"; fields.len()].join(", ");
                params.extend(self.set_fields.values().cloned());
                format!(
                    "INSERT INTO {} ({}) VALUES ({})",
                    self.table,
                    fields.join(", "),
                    placeholders
                )
            }
            QueryType::Update => {
                let assignments = self
                    .set_fields
                    .keys()
                    .map(|field| format!("{} = ?", field))
                    .collect::<Vec<_>>()
                    .join(", ");
                params.extend(self.set_fields.values().cloned());
                format!("UPDATE {} SET {}", self.table, assignments)
            }
            QueryType::Delete => format!("DELETE FROM {}", self.table),
        };

        if self.query_type != QueryType::Insert {
            self.render_where(&mut sql, &mut params);
        }
        if self.query_type == QueryType::Select {
            self.render_tail(&mut sql);
        }

        (sql, params)
    }

    pub fn preview(&self) -> String {
        let (sql, params) = self.render();
        preview(&sql, &params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::where_clause;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_select() {
        let query = Query::new("users")
            .with_column("id")
            .with_column("first_name")
            .with_condition(where_clause!("age > ?", 18))
            .with_order_by("id DESC")
            .with_limit(5);

        let (sql, params) = query.render();
        assert_eq!(
            sql,
            "SELECT id, first_name FROM users WHERE age > ? ORDER BY id DESC LIMIT 5"
        );
        assert_eq!(params, vec![json!(18)]);
    }

    #[test]
    fn test_select_all_columns() {
        let (sql, params) = Query::new("users").render();
        assert_eq!(sql, "SELECT * FROM users");
        assert!(params.is_empty());
    }

    #[test]
    fn test_count_with_composed_condition() {
        let condition = where_clause!("first_name = ?", "First").and(
            where_clause!("last_name = ?", "Last").or(where_clause!("first_name = ?", "Second")),
        );
        let query = Query::new("users")
            .with_type(QueryType::Count)
            .with_condition(condition);

        let (sql, params) = query.render();
        assert_eq!(
            sql,
            "SELECT COUNT(*) FROM users WHERE (first_name = ?) AND ((last_name = ?) OR (first_name = ?))"
        );
        assert_eq!(params, vec![json!("First"), json!("Last"), json!("Second")]);
    }

    #[test]
    fn test_conditions_accumulate() {
        let query = Query::new("users")
            .with_condition(where_clause!("age > ?", 18))
            .with_condition(WhereClause::empty())
            .with_condition(where_clause!("age < ?", 65));

        assert_eq!(
            query.preview(),
            "SELECT * FROM users WHERE (age > 18) AND (age < 65)"
        );
    }

    #[test]
    fn test_insert() {
        let query = Query::new("users")
            .with_type(QueryType::Insert)
            .with_set_field("first_name", json!("First"))
            .with_set_field("age", json!(10));

        let (sql, params) = query.render();
        assert_eq!(sql, "INSERT INTO users (first_name, age) VALUES (?, ?)");
        assert_eq!(params, vec![json!("First"), json!(10)]);
    }

    #[test]
    fn test_insert_without_fields() {
        let (sql, params) = Query::new("users").with_type(QueryType::Insert).render();
        assert_eq!(sql, "INSERT INTO users DEFAULT VALUES");
        assert!(params.is_empty());
    }

    #[test]
    fn test_update_params_before_condition() {
        let query = Query::new("users")
            .with_type(QueryType::Update)
            .with_set_field("age", json!(11))
            .with_condition(where_clause!("id = ?", 1));

        let (sql, params) = query.render();
        assert_eq!(sql, "UPDATE users SET age = ? WHERE id = ?");
        assert_eq!(params, vec![json!(11), json!(1)]);
    }

    #[test]
    fn test_delete() {
        let query = Query::new("users")
            .with_type(QueryType::Delete)
            .with_condition(where_clause!("first_name = ?", "Second"));

        assert_eq!(
            query.preview(),
            "DELETE FROM users WHERE first_name = 'Second'"
        );
    }
}
