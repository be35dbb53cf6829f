use serde::Serialize;
use serde_json::{Map, Value};

use super::Joiner;

/// Constructs [`WhereClause`] from a template and several parameters by passing those
/// into [`json!`]
///
/// ```
/// let adults = where_clause!("age >= ? AND country = ?", 18, "LV");
/// ```
///
/// [`json!`]: serde_json::json!
#[macro_export]
macro_rules! where_clause {
    ($fmt:expr $(, $arg:expr)*) => {{
        $crate::sql::WhereClause::new(
            $fmt,
            vec![
                $( serde_json::json!($arg), )*
            ]
        )
    }}
}

/// A condition template with positional `?` placeholders and the values bound to them,
/// in placeholder order.
///
/// Clauses are combined with [`compose`], which wraps each side in parentheses so that
/// the grouping chosen by the caller survives any mix of `AND` and `OR`:
///
/// ```
/// let last_or_second = where_clause!("last_name = ?", "Last")
///     .or(where_clause!("first_name = ?", "Second"));
/// let clause = where_clause!("first_name = ?", "First").and(last_or_second);
///
/// // (first_name = ?) AND ((last_name = ?) OR (first_name = ?))
/// ```
///
/// [`compose`]: WhereClause::compose
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhereClause {
    template: String,
    params: Vec<Value>,
}

impl WhereClause {
    pub fn new(template: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            template: template.into(),
            params,
        }
    }

    pub fn empty() -> Self {
        Self {
            template: String::new(),
            params: vec![],
        }
    }

    /// Combine two clauses into `(left) JOINER (right)`. Parameters of `left` come first.
    pub fn compose(left: &WhereClause, right: &WhereClause, joiner: Joiner) -> WhereClause {
        let template = format!("({}) {} ({})", left.template, joiner, right.template);

        let mut params = Vec::with_capacity(left.params.len() + right.params.len());
        params.extend(left.params.iter().cloned());
        params.extend(right.params.iter().cloned());

        WhereClause { template, params }
    }

    pub fn and(self, other: WhereClause) -> WhereClause {
        WhereClause::compose(&self, &other, Joiner::And)
    }

    pub fn or(self, other: WhereClause) -> WhereClause {
        WhereClause::compose(&self, &other, Joiner::Or)
    }

    /// Left-fold [`compose`] over `clauses`, skipping empty ones. Returns `None` if no
    /// clause remains.
    ///
    /// ```
    /// let w = WhereClause::join_multiple(vec![a, WhereClause::empty(), b, c], Joiner::Or);
    /// // ((a) OR (b)) OR (c)
    /// ```
    ///
    /// [`compose`]: WhereClause::compose
    pub fn join_multiple(
        clauses: impl IntoIterator<Item = WhereClause>,
        joiner: Joiner,
    ) -> Option<WhereClause> {
        clauses
            .into_iter()
            .filter(|clause| !clause.is_empty())
            .reduce(|acc, clause| WhereClause::compose(&acc, &clause, joiner))
    }

    /// Builds `(name = ?) AND (other = ?)` out of a column/value map, keeping map order.
    pub fn from_map(attrs: &Map<String, Value>, joiner: Joiner) -> Option<WhereClause> {
        if attrs.is_empty() {
            return None;
        }

        let template = attrs
            .keys()
            .map(|name| format!("({} = ?)", name))
            .collect::<Vec<String>>()
            .join(&format!(" {} ", joiner));

        Some(WhereClause {
            template,
            params: attrs.values().cloned().collect(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.template.trim().is_empty()
    }

    /// Number of `?` placeholders outside of quoted literals, identifiers and comments.
    pub fn placeholder_count(&self) -> usize {
        count_placeholders(&self.template)
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn params(&self) -> &Vec<Value> {
        &self.params
    }

    /// Return template and parameter vec as a tuple
    pub fn split(self) -> (String, Vec<Value>) {
        (self.template, self.params)
    }

    /// Places values into the template and returns a String.
    /// Useful for debugging, but not for SQL execution.
    pub fn preview(&self) -> String {
        preview(&self.template, &self.params)
    }
}

/// Byte offsets of `?` placeholders, skipping quoted literals and identifiers
/// (`'..'`, `".."`, `` `..` ``, `[..]`) and comments (`-- ..`, `/* .. */`).
pub(crate) fn placeholder_offsets(sql: &str) -> Vec<usize> {
    let mut offsets = Vec::new();
    let mut chars = sql.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let closing = match c {
            '?' => {
                offsets.push(i);
                continue;
            }
            '\'' | '"' | '`' => c,
            '[' => ']',
            '-' if matches!(chars.peek(), Some((_, '-'))) => '\n',
            '/' if matches!(chars.peek(), Some((_, '*'))) => {
                chars.next();
                let mut prev = ' ';
                for (_, c) in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
                continue;
            }
            _ => continue,
        };
        // doubled quotes ('it''s') close and reopen, which leaves us inside the literal
        for (_, c) in chars.by_ref() {
            if c == closing {
                break;
            }
        }
    }
    offsets
}

pub(crate) fn count_placeholders(sql: &str) -> usize {
    placeholder_offsets(sql).len()
}

pub(crate) fn preview(sql: &str, params: &[Value]) -> String {
    let mut preview = String::with_capacity(sql.len());
    let mut last = 0;
    for (offset, param) in placeholder_offsets(sql).into_iter().zip(params) {
        preview.push_str(&sql[last..offset]);
        match param {
            Value::String(s) => preview.push_str(&format!("'{}'", s.replace('\'', "''"))),
            other => preview.push_str(&other.to_string()),
        }
        last = offset + 1;
    }
    preview.push_str(&sql[last..]);
    preview
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn first() -> WhereClause {
        where_clause!("first_name = ?", "First")
    }
    fn last() -> WhereClause {
        where_clause!("last_name = ?", "Last")
    }
    fn second() -> WhereClause {
        where_clause!("first_name = ?", "Second")
    }

    #[test]
    fn test_compose() {
        let w = WhereClause::compose(&first(), &last(), Joiner::And);

        assert_eq!(w.template(), "(first_name = ?) AND (last_name = ?)");
        assert_eq!(*w.params(), vec![json!("First"), json!("Last")]);
    }

    #[test]
    fn test_precedence() {
        let last_or_second = WhereClause::compose(&last(), &second(), Joiner::Or);
        assert_eq!(
            last_or_second.template(),
            "(last_name = ?) OR (first_name = ?)"
        );
        assert_eq!(*last_or_second.params(), vec![json!("Last"), json!("Second")]);

        let (sql, params) = WhereClause::compose(&first(), &last_or_second, Joiner::And).split();
        assert_eq!(
            sql,
            "(first_name = ?) AND ((last_name = ?) OR (first_name = ?))"
        );
        assert_eq!(params, vec![json!("First"), json!("Last"), json!("Second")]);
    }

    #[test]
    fn test_nesting_side_matters() {
        let (a, b, c) = (
            where_clause!("a = ?", 1),
            where_clause!("b = ?", 2),
            where_clause!("c = ?", 3),
        );

        let left = WhereClause::compose(&WhereClause::compose(&a, &b, Joiner::Or), &c, Joiner::And);
        let right = WhereClause::compose(&a, &WhereClause::compose(&b, &c, Joiner::And), Joiner::Or);

        assert_eq!(left.template(), "((a = ?) OR (b = ?)) AND (c = ?)");
        assert_eq!(right.template(), "(a = ?) OR ((b = ?) AND (c = ?))");
        assert_eq!(left.params(), right.params());
    }

    #[test]
    fn test_compose_is_repeatable() {
        let a = WhereClause::compose(&first(), &second(), Joiner::Or);
        let b = WhereClause::compose(&first(), &second(), Joiner::Or);
        assert_eq!(a, b);
    }

    #[test]
    fn test_builder_shorthands() {
        let w = first().and(last().or(second()));
        assert_eq!(
            w.template(),
            "(first_name = ?) AND ((last_name = ?) OR (first_name = ?))"
        );
        assert_eq!(w.placeholder_count(), w.params().len());
    }

    #[test]
    fn test_compose_with_empty_is_literal() {
        let w = WhereClause::compose(&WhereClause::empty(), &first(), Joiner::And);
        assert_eq!(w.template(), "() AND (first_name = ?)");
        assert_eq!(*w.params(), vec![json!("First")]);
    }

    #[test]
    fn test_join_multiple() {
        let w = WhereClause::join_multiple(
            vec![first(), WhereClause::empty(), last(), second()],
            Joiner::Or,
        )
        .unwrap();

        assert_eq!(
            w.template(),
            "((first_name = ?) OR (last_name = ?)) OR (first_name = ?)"
        );
        assert_eq!(w.params().len(), 3);

        let single = WhereClause::join_multiple(vec![last()], Joiner::And).unwrap();
        assert_eq!(single, last());

        assert!(WhereClause::join_multiple(vec![WhereClause::empty()], Joiner::And).is_none());
        assert!(WhereClause::join_multiple(vec![], Joiner::And).is_none());
    }

    #[test]
    fn test_from_map() {
        let attrs = json!({"first_name": "First", "age": 10});
        let w = WhereClause::from_map(attrs.as_object().unwrap(), Joiner::And).unwrap();

        assert_eq!(w.template(), "(first_name = ?) AND (age = ?)");
        assert_eq!(*w.params(), vec![json!("First"), json!(10)]);

        assert!(WhereClause::from_map(&Map::new(), Joiner::And).is_none());
    }

    #[test]
    fn test_placeholder_count() {
        let w = where_clause!("name = ? AND note != '?' AND age > ?", "John", 18);
        assert_eq!(w.placeholder_count(), 2);
    }

    #[test]
    fn test_preview() {
        let w = where_clause!("name = ? AND age > ?", "O'Reilly", 18);
        assert_eq!(w.preview(), "name = 'O''Reilly' AND age > 18");
    }

    #[test]
    fn test_placeholders_in_quoted_identifiers_and_comments() {
        let cases = [
            ("\"done?\" = ?", 1),
            ("`done?` = ? AND [why?] = ?", 2),
            ("a = ? -- is it?\nAND b = ?", 2),
            ("a = ? /* maybe? */ AND b = ?", 2),
            ("note = 'it''s ?' AND a = ?", 1),
        ];
        for (template, expected) in cases {
            assert_eq!(
                WhereClause::new(template, vec![]).placeholder_count(),
                expected,
                "{}",
                template
            );
        }
    }

    #[test]
    fn test_preview_does_not_touch_inlined_values() {
        let w = where_clause!("name = ? AND age > ?", "who?", 18);
        assert_eq!(w.preview(), "name = 'who?' AND age > 18");
    }

    #[test]
    fn test_preview_skips_quoted_question_marks() {
        let w = where_clause!("note != '?' AND age > ?", 18);
        assert_eq!(w.preview(), "note != '?' AND age > 18");

        let w = where_clause!("\"done?\" = ?", true);
        assert_eq!(w.preview(), "\"done?\" = true");
    }

    #[test]
    fn test_compose_laws_over_generated_clauses() {
        let clauses = (0..5)
            .map(|n| {
                let template = (0..n)
                    .map(|i| format!("c{} = ?", i))
                    .collect::<Vec<_>>()
                    .join(" OR ");
                let template = if n == 0 { "1 = 1".to_string() } else { template };
                let params = (0..n).map(|i| json!(format!("v{}-{}", n, i))).collect();
                WhereClause::new(template, params)
            })
            .collect::<Vec<_>>();

        for a in &clauses {
            for b in &clauses {
                for joiner in [Joiner::And, Joiner::Or] {
                    let w = WhereClause::compose(a, b, joiner);

                    let expected_params = a
                        .params()
                        .iter()
                        .chain(b.params().iter())
                        .cloned()
                        .collect::<Vec<_>>();
                    assert_eq!(*w.params(), expected_params);
                    assert_eq!(
                        w.template(),
                        format!("({}) {} ({})", a.template(), joiner, b.template())
                    );
                    assert_eq!(w.placeholder_count(), w.params().len());
                }
            }
        }
    }
}
