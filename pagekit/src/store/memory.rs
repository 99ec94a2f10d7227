//! In-memory document collection
//!
//! [`MemoryStore`] keeps JSON documents in insertion order and answers
//! [`Queryable`] calls by scanning them. Identifiers are UUIDv7 values
//! allocated so that identifier order always equals insertion order.
//!
//! # Example
//!
//! ```rust
//! use pagekit::store::MemoryStore;
//! use serde_json::json;
//!
//! # tokio_test_block(async {
//! let store = MemoryStore::new();
//! let first = store.insert(json!({ "name": "Alice", "age": 30 })).await?;
//! let second = store.insert(json!({ "name": "Bob", "age": 25 })).await?;
//! assert!(first < second);
//! assert_eq!(store.len().await, 2);
//! # Ok::<(), pagekit::store::StoreError>(())
//! # }).unwrap();
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::error::{StoreError, StoreOperation};
use super::query::{
    Filter, FilterCondition, FilterOperator, FilterValue, Selection, SortDirection, SortSpec,
    Window,
};
use super::traits::{Queryable, Record, StoreResult};

/// Field name under which a document's identifier is serialized
pub const ID_FIELD: &str = "_id";

/// Time-ordered document identifier (UUIDv7)
///
/// Renders as a hyphenated UUID, which is also its cursor form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Wrap an existing UUID
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for DocumentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A stored JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Identifier assigned on insert
    #[serde(rename = "_id")]
    pub id: DocumentId,
    /// Every other field
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// Look up a top-level field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

impl Record for Document {
    type Id = DocumentId;

    fn id(&self) -> &DocumentId {
        &self.id
    }
}

#[derive(Debug, Default)]
struct Collection {
    documents: Vec<Document>,
    last_id: Option<DocumentId>,
}

impl Collection {
    fn next_id(&mut self) -> DocumentId {
        let candidate = Uuid::now_v7();
        let id = match self.last_id {
            // Same millisecond (or a clock step back): stay strictly increasing.
            Some(last) if candidate <= last.0 => {
                DocumentId(Uuid::from_u128(last.0.as_u128().wrapping_add(1)))
            }
            _ => DocumentId(candidate),
        };
        self.last_id = Some(id);
        id
    }

    fn push(&mut self, value: Value) -> StoreResult<DocumentId> {
        let Value::Object(mut fields) = value else {
            return Err(StoreError::serialization_error(
                StoreOperation::Insert,
                format!("expected a JSON object, got {}", json_type_name(&value)),
            ));
        };
        fields.remove(ID_FIELD);
        let id = self.next_id();
        self.documents.push(Document { id, fields });
        Ok(id)
    }
}

/// In-memory [`Queryable`] document store
#[derive(Debug, Default)]
pub struct MemoryStore {
    collection: RwLock<Collection>,
}

impl MemoryStore {
    /// An empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a JSON array of objects, inserted in array order
    ///
    /// Any `_id` field in the input is discarded; identifiers are always
    /// assigned by the store.
    pub fn from_json(value: Value) -> StoreResult<Self> {
        let Value::Array(items) = value else {
            return Err(StoreError::serialization_error(
                StoreOperation::Insert,
                format!("expected a JSON array, got {}", json_type_name(&value)),
            ));
        };

        let mut collection = Collection::default();
        for item in items {
            collection.push(item)?;
        }
        Ok(Self {
            collection: RwLock::new(collection),
        })
    }

    /// Insert one JSON object, returning its new identifier
    pub async fn insert(&self, value: Value) -> StoreResult<DocumentId> {
        self.collection.write().await.push(value)
    }

    /// Insert several JSON objects in order
    pub async fn insert_many(
        &self,
        values: impl IntoIterator<Item = Value>,
    ) -> StoreResult<Vec<DocumentId>> {
        let mut collection = self.collection.write().await;
        values.into_iter().map(|v| collection.push(v)).collect()
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.collection.read().await.documents.len()
    }

    /// Whether the store holds no documents
    pub async fn is_empty(&self) -> bool {
        self.collection.read().await.documents.is_empty()
    }
}

impl Queryable for MemoryStore {
    type Id = DocumentId;
    type Record = Document;

    async fn count_matching(&self, filter: &Filter) -> StoreResult<u64> {
        let matcher = Matcher::compile(filter, StoreOperation::Count)?;
        let collection = self.collection.read().await;
        let count = collection
            .documents
            .iter()
            .filter(|doc| matcher.matches(doc))
            .count();
        Ok(count as u64)
    }

    async fn find_matching(
        &self,
        selection: Selection<'_, DocumentId>,
        sort: &SortSpec,
        window: Window,
    ) -> StoreResult<Vec<Document>> {
        let matcher = Matcher::compile(selection.filter, StoreOperation::Find)?;
        let collection = self.collection.read().await;

        let mut matched: Vec<&Document> = collection
            .documents
            .iter()
            .filter(|doc| selection.id_before.is_none_or(|bound| doc.id < *bound))
            .filter(|doc| matcher.matches(doc))
            .collect();

        match sort {
            SortSpec::Natural => {}
            SortSpec::IdDescending => matched.sort_by(|a, b| b.id.cmp(&a.id)),
            SortSpec::Field { field, direction } => matched.sort_by(|a, b| {
                let ordering = compare_json(a.get(field), b.get(field));
                match direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            }),
        }

        let skip = usize::try_from(window.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);
        Ok(matched
            .into_iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }
}

/// A filter with its LIKE patterns compiled once per query
struct Matcher<'a> {
    conditions: Vec<(&'a FilterCondition, Option<Regex>)>,
}

impl<'a> Matcher<'a> {
    fn compile(filter: &'a Filter, operation: StoreOperation) -> StoreResult<Self> {
        let conditions = filter
            .conditions()
            .iter()
            .map(|condition| {
                let pattern = match (&condition.operator, &condition.value) {
                    (
                        FilterOperator::Like,
                        FilterValue::String(pattern) | FilterValue::Text(pattern),
                    ) => Some(
                        like_regex(pattern)
                            .map_err(|e| StoreError::query_failed(operation, e.to_string()))?,
                    ),
                    (FilterOperator::Like, other) => {
                        return Err(StoreError::query_failed(
                            operation,
                            format!(
                                "LIKE on `{}` needs a string pattern, got {:?}",
                                condition.field, other
                            ),
                        ))
                    }
                    _ => None,
                };
                Ok((condition, pattern))
            })
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(Self { conditions })
    }

    fn matches(&self, doc: &Document) -> bool {
        self.conditions.iter().all(|(condition, pattern)| {
            let field = doc.get(&condition.field).filter(|v| !v.is_null());
            match condition.operator {
                FilterOperator::IsNull => field.is_none(),
                FilterOperator::IsNotNull => field.is_some(),
                FilterOperator::Equal => compare_filter(field, &condition.value)
                    .is_some_and(Ordering::is_eq),
                FilterOperator::NotEqual => !compare_filter(field, &condition.value)
                    .is_some_and(Ordering::is_eq),
                FilterOperator::GreaterThan => compare_filter(field, &condition.value)
                    .is_some_and(Ordering::is_gt),
                FilterOperator::GreaterThanOrEqual => compare_filter(field, &condition.value)
                    .is_some_and(Ordering::is_ge),
                FilterOperator::LessThan => compare_filter(field, &condition.value)
                    .is_some_and(Ordering::is_lt),
                FilterOperator::LessThanOrEqual => compare_filter(field, &condition.value)
                    .is_some_and(Ordering::is_le),
                FilterOperator::Like => match (field, pattern) {
                    (Some(Value::String(s)), Some(re)) => re.is_match(s),
                    _ => false,
                },
                FilterOperator::In => match (field, &condition.value) {
                    (Some(Value::String(s)), FilterValue::StringList(list)) => {
                        list.iter().any(|item| item == s)
                    }
                    (Some(Value::Number(n)), FilterValue::IntegerList(list)) => {
                        n.as_i64().is_some_and(|n| list.contains(&n))
                    }
                    _ => false,
                },
            }
        })
    }
}

fn like_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let mut expr = String::from("(?s)^");
    for ch in pattern.chars() {
        match ch {
            '%' => expr.push_str(".*"),
            '_' => expr.push('.'),
            c => expr.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    expr.push('$');
    Regex::new(&expr)
}

/// Compare a document value against a filter value of the same JSON type.
///
/// `None` means the two are not comparable (missing field or type mismatch).
/// Untyped text compares literally with strings and is inferred otherwise.
fn compare_filter(field: Option<&Value>, value: &FilterValue) -> Option<Ordering> {
    match (field?, value) {
        (Value::String(s), FilterValue::Text(t)) => Some(s.as_str().cmp(t.as_str())),
        (field, FilterValue::Text(t)) => compare_filter(Some(field), &FilterValue::infer(t)),
        (Value::Number(n), FilterValue::Integer(i)) => match n.as_i64() {
            Some(m) => Some(m.cmp(i)),
            None => n.as_f64()?.partial_cmp(&(*i as f64)),
        },
        (Value::Number(n), FilterValue::Float(f)) => n.as_f64()?.partial_cmp(f),
        (Value::String(s), FilterValue::String(t)) => Some(s.as_str().cmp(t.as_str())),
        (Value::Bool(b), FilterValue::Boolean(c)) => Some(b.cmp(c)),
        _ => None,
    }
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    }
}

/// Total order over optional JSON values used for field sorts.
///
/// Missing and null sort first, then booleans, numbers, strings. Arrays and
/// objects only order by type.
fn compare_json(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
        },
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreErrorKind;
    use serde_json::json;

    async fn people() -> MemoryStore {
        MemoryStore::from_json(json!([
            { "name": "Alice", "age": 30, "email": "alice@example.com", "active": true },
            { "name": "Bob", "age": 25, "email": "bob@example.org", "active": false },
            { "name": "Carol", "age": 35, "email": "carol@example.com", "active": true },
            { "name": "Dave", "age": 28, "email": null, "active": true },
        ]))
        .unwrap()
    }

    fn names(docs: &[Document]) -> Vec<&str> {
        docs.iter()
            .map(|d| d.get("name").and_then(Value::as_str).unwrap())
            .collect()
    }

    async fn find(store: &MemoryStore, filter: &Filter, sort: SortSpec) -> Vec<Document> {
        store
            .find_matching(Selection::new(filter), &sort, Window::first(100))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_ids_follow_insertion_order() {
        let store = MemoryStore::new();
        let mut ids = Vec::new();
        for n in 0..50 {
            ids.push(store.insert(json!({ "n": n })).await.unwrap());
        }
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_insert_rejects_non_objects() {
        let store = MemoryStore::new();
        let err = store.insert(json!([1, 2])).await.unwrap_err();
        assert_eq!(err.operation, StoreOperation::Insert);
        assert_eq!(err.kind, StoreErrorKind::SerializationError);
        assert!(store.is_empty().await);

        let err = MemoryStore::from_json(json!({ "not": "an array" })).unwrap_err();
        assert!(err.message.contains("JSON array"));
    }

    #[tokio::test]
    async fn test_insert_discards_supplied_id() {
        let store = MemoryStore::new();
        let id = store
            .insert(json!({ "_id": "mine", "name": "Eve" }))
            .await
            .unwrap();
        let docs = find(&store, &Filter::new(), SortSpec::Natural).await;
        assert_eq!(docs[0].id, id);
        assert!(docs[0].get(ID_FIELD).is_none());
    }

    #[tokio::test]
    async fn test_insert_many() {
        let store = MemoryStore::new();
        let ids = store
            .insert_many(vec![json!({ "a": 1 }), json!({ "a": 2 })])
            .await
            .unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_count_matching() {
        let store = people().await;
        assert_eq!(store.count_matching(&Filter::new()).await.unwrap(), 4);

        let active = Filter::new().with(FilterCondition::eq("active", true));
        assert_eq!(store.count_matching(&active).await.unwrap(), 3);

        let over_29 = Filter::new().with(FilterCondition::gt("age", 29));
        assert_eq!(store.count_matching(&over_29).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_comparison_operators() {
        let store = people().await;
        let cases = [
            (FilterCondition::eq("name", "Bob"), vec!["Bob"]),
            (FilterCondition::ne("name", "Bob"), vec!["Alice", "Carol", "Dave"]),
            (FilterCondition::gte("age", 30), vec!["Alice", "Carol"]),
            (FilterCondition::lt("age", 28), vec!["Bob"]),
            (FilterCondition::lte("age", 28.0), vec!["Bob", "Dave"]),
        ];
        for (condition, expected) in cases {
            let filter = Filter::new().with(condition.clone());
            let docs = find(&store, &filter, SortSpec::Natural).await;
            assert_eq!(names(&docs), expected, "condition {:?}", condition);
        }
    }

    #[tokio::test]
    async fn test_type_mismatch_never_matches() {
        let store = people().await;
        let filter = Filter::new().with(FilterCondition::eq("age", "30"));
        assert!(find(&store, &filter, SortSpec::Natural).await.is_empty());
    }

    #[tokio::test]
    async fn test_parsed_filters_match_numeric_looking_strings() {
        let store = MemoryStore::from_json(json!([
            { "name": "a", "zip": "02134", "flag": "true" },
            { "name": "b", "zip": "10001", "flag": true },
            { "name": "c", "zip": 10001, "flag": false },
        ]))
        .unwrap();

        let cases = [
            ("zip:02134", vec!["a"]),
            ("zip:10001", vec!["b", "c"]),
            ("flag:true", vec!["a", "b"]),
            ("flag:false", vec!["c"]),
            ("zip:2134", vec![]),
        ];
        for (expression, expected) in cases {
            let filter: Filter = expression.parse().unwrap();
            let docs = find(&store, &filter, SortSpec::Natural).await;
            assert_eq!(names(&docs), expected, "filter {expression}");
            assert_eq!(
                store.count_matching(&filter).await.unwrap(),
                expected.len() as u64
            );
        }
    }

    #[tokio::test]
    async fn test_null_operators() {
        let store = people().await;
        let filter = Filter::new().with(FilterCondition::is_null("email"));
        assert_eq!(names(&find(&store, &filter, SortSpec::Natural).await), ["Dave"]);

        let filter = Filter::new().with(FilterCondition::is_null("nickname"));
        assert_eq!(find(&store, &filter, SortSpec::Natural).await.len(), 4);

        let filter = Filter::new().with(FilterCondition::is_not_null("email"));
        assert_eq!(find(&store, &filter, SortSpec::Natural).await.len(), 3);
    }

    #[tokio::test]
    async fn test_like_and_in() {
        let store = people().await;
        let filter = Filter::new().with(FilterCondition::like("email", "%@example.com"));
        assert_eq!(
            names(&find(&store, &filter, SortSpec::Natural).await),
            ["Alice", "Carol"]
        );

        let filter = Filter::new().with(FilterCondition::like("name", "_o%"));
        assert_eq!(names(&find(&store, &filter, SortSpec::Natural).await), ["Bob"]);

        let filter = Filter::new().with(FilterCondition::like("email", "alice.example.com"));
        assert!(find(&store, &filter, SortSpec::Natural).await.is_empty());

        let filter = Filter::new().with(FilterCondition::in_integers("age", vec![25, 35]));
        assert_eq!(
            names(&find(&store, &filter, SortSpec::Natural).await),
            ["Bob", "Carol"]
        );

        let filter = Filter::new().with(FilterCondition::in_strings(
            "name",
            vec!["Dave".to_string(), "Zed".to_string()],
        ));
        assert_eq!(names(&find(&store, &filter, SortSpec::Natural).await), ["Dave"]);
    }

    #[tokio::test]
    async fn test_like_with_non_string_pattern_fails() {
        let store = people().await;
        let filter = Filter::new().with(FilterCondition::new(
            "name",
            FilterOperator::Like,
            FilterValue::Integer(1),
        ));
        let err = store.count_matching(&filter).await.unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::QueryFailed);
        assert_eq!(err.operation, StoreOperation::Count);
    }

    #[tokio::test]
    async fn test_sorting() {
        let store = people().await;
        let filter = Filter::new();

        let asc = find(&store, &filter, SortSpec::field("age", SortDirection::Ascending)).await;
        assert_eq!(names(&asc), ["Bob", "Dave", "Alice", "Carol"]);

        let desc = find(&store, &filter, SortSpec::field("age", SortDirection::Descending)).await;
        assert_eq!(names(&desc), ["Carol", "Alice", "Dave", "Bob"]);

        let by_id = find(&store, &filter, SortSpec::IdDescending).await;
        assert_eq!(names(&by_id), ["Dave", "Carol", "Bob", "Alice"]);
    }

    #[tokio::test]
    async fn test_sort_ties_keep_insertion_order() {
        let store = MemoryStore::from_json(json!([
            { "name": "a", "rank": 1 },
            { "name": "b" },
            { "name": "c", "rank": 1 },
            { "name": "d", "rank": "x" },
        ]))
        .unwrap();
        let docs = find(
            &store,
            &Filter::new(),
            SortSpec::field("rank", SortDirection::Ascending),
        )
        .await;
        assert_eq!(names(&docs), ["b", "a", "c", "d"]);
    }

    #[tokio::test]
    async fn test_window_and_id_bound() {
        let store = people().await;
        let filter = Filter::new();
        let all = find(&store, &filter, SortSpec::IdDescending).await;

        let window = store
            .find_matching(Selection::new(&filter), &SortSpec::IdDescending, Window::new(1, 2))
            .await
            .unwrap();
        assert_eq!(names(&window), ["Carol", "Bob"]);

        let bound = all[1].id;
        let below = store
            .find_matching(
                Selection::new(&filter).before(Some(&bound)),
                &SortSpec::IdDescending,
                Window::first(10),
            )
            .await
            .unwrap();
        assert_eq!(names(&below), ["Bob", "Alice"]);
    }

    #[test]
    fn test_document_id_round_trip_and_serde() {
        let id = DocumentId::from_uuid(Uuid::now_v7());
        assert_eq!(id.to_string().parse::<DocumentId>().unwrap(), id);
        assert!("not-a-uuid".parse::<DocumentId>().is_err());

        let doc = Document {
            id,
            fields: json!({ "name": "Alice" }).as_object().unwrap().clone(),
        };
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["_id"], json!(id.to_string()));
        assert_eq!(value["name"], json!("Alice"));
    }

    #[test]
    fn test_compare_json_orders_types() {
        assert_eq!(compare_json(None, Some(&json!(false))), Ordering::Less);
        assert_eq!(compare_json(Some(&json!(2)), Some(&json!("1"))), Ordering::Less);
        assert_eq!(compare_json(Some(&json!(2.5)), Some(&json!(2))), Ordering::Greater);
        assert_eq!(compare_json(Some(&json!("b")), Some(&json!("a"))), Ordering::Greater);
    }
}
