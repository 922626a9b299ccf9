//! List querysets and query string handling
//!
//! `QuerySource` is the data contract behind list views: it counts and pages
//! records of a table that match a search text over a set of fields.

use crate::types::{GsearchError, GsearchResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Parameters of one list query
#[derive(Debug, Clone, Default)]
pub struct ListQuery<'a> {
	pub table: &'a str,
	pub search_fields: &'a [String],
	pub search: &'a str,
	pub ordering: &'a [String],
	pub offset: u64,
	pub limit: u64,
}

/// Record storage queried by list views
#[async_trait]
pub trait QuerySource: Send + Sync {
	/// Number of records matching the query, ignoring offset and limit
	async fn count(&self, query: &ListQuery<'_>) -> GsearchResult<u64>;

	/// One page of matching records
	async fn list(&self, query: &ListQuery<'_>) -> GsearchResult<Vec<Value>>;
}

/// In-memory `QuerySource` with admin-style search semantics
///
/// Every whitespace separated term of the search text must be contained,
/// case-insensitively, in at least one search field. A query without search
/// fields or without search text matches every record.
///
/// # Examples
///
/// ```
/// use reinhardt_gsearch::core::query::{InMemorySource, ListQuery, QuerySource};
/// use serde_json::json;
///
/// # tokio_test_block(async {
/// let source = InMemorySource::new();
/// source.insert("post", json!({"id": 1, "title": "Hello world"}));
/// source.insert("post", json!({"id": 2, "title": "Goodbye"}));
///
/// let fields = vec!["title".to_string()];
/// let query = ListQuery { table: "post", search_fields: &fields, search: "hello", ..Default::default() };
/// assert_eq!(source.count(&query).await.unwrap(), 1);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Default)]
pub struct InMemorySource {
	tables: RwLock<HashMap<String, Vec<Value>>>,
}

impl InMemorySource {
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a record (a JSON object) to `table`
	pub fn insert(&self, table: impl Into<String>, record: Value) {
		self.tables
			.write()
			.entry(table.into())
			.or_default()
			.push(record);
	}

	fn matching(&self, query: &ListQuery<'_>) -> GsearchResult<Vec<Value>> {
		let tables = self.tables.read();
		let Some(records) = tables.get(query.table) else {
			return Ok(Vec::new());
		};
		let terms: Vec<String> = query
			.search
			.split_whitespace()
			.map(str::to_lowercase)
			.collect();

		let mut matched = Vec::new();
		for record in records {
			let fields = record.as_object().ok_or_else(|| {
				GsearchError::Query(format!("record in '{}' is not an object", query.table))
			})?;
			let hit = query.search_fields.is_empty()
				|| terms.iter().all(|term| {
					query.search_fields.iter().any(|field| {
						fields
							.get(field)
							.map(|value| value_text(value).to_lowercase().contains(term))
							.unwrap_or(false)
					})
				});
			if hit {
				matched.push(record.clone());
			}
		}

		if let Some(order) = query.ordering.first() {
			let (field, descending) = match order.strip_prefix('-') {
				Some(field) => (field, true),
				None => (order.as_str(), false),
			};
			matched.sort_by(|a, b| {
				let ord = compare_values(a.get(field), b.get(field));
				if descending { ord.reverse() } else { ord }
			});
		}
		Ok(matched)
	}
}

#[async_trait]
impl QuerySource for InMemorySource {
	async fn count(&self, query: &ListQuery<'_>) -> GsearchResult<u64> {
		Ok(self.matching(query)?.len() as u64)
	}

	async fn list(&self, query: &ListQuery<'_>) -> GsearchResult<Vec<Value>> {
		let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);
		let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
		Ok(self
			.matching(query)?
			.into_iter()
			.skip(offset)
			.take(limit)
			.collect())
	}
}

fn value_text(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		Value::Null => String::new(),
		other => other.to_string(),
	}
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
	match (a, b) {
		(Some(Value::Number(x)), Some(Value::Number(y))) => x
			.as_f64()
			.partial_cmp(&y.as_f64())
			.unwrap_or(Ordering::Equal),
		(Some(x), Some(y)) => value_text(x).cmp(&value_text(y)),
		(None, Some(_)) => Ordering::Less,
		(Some(_), None) => Ordering::Greater,
		(None, None) => Ordering::Equal,
	}
}

/// Build a `?key=value` query string from the current parameters
///
/// Keys starting with any `remove` prefix are dropped, then `new_params` are
/// applied (`None` deletes the key). The result is sorted by key. Repeated
/// keys keep their last value.
///
/// # Examples
///
/// ```
/// use reinhardt_gsearch::query_string;
///
/// let current = vec![
///     ("mdl".to_string(), "0".to_string()),
///     ("shr".to_string(), "on".to_string()),
///     ("p".to_string(), "2".to_string()),
/// ];
/// let qs = query_string(&current, &[("_q_", Some("hello world"))], &["mdl", "shr"]);
/// assert_eq!(qs, "?_q_=hello+world&p=2");
/// ```
pub fn query_string(
	current: &[(String, String)],
	new_params: &[(&str, Option<&str>)],
	remove: &[&str],
) -> String {
	let mut params: BTreeMap<&str, &str> = current
		.iter()
		.map(|(k, v)| (k.as_str(), v.as_str()))
		.collect();
	params.retain(|key, _| !remove.iter().any(|prefix| key.starts_with(prefix)));
	for &(key, value) in new_params {
		match value {
			Some(value) => {
				params.insert(key, value);
			}
			None => {
				params.remove(key);
			}
		}
	}
	// Encoding a sequence of string pairs cannot fail
	let encoded = serde_urlencoded::to_string(params.into_iter().collect::<Vec<_>>())
		.unwrap_or_default();
	format!("?{}", encoded)
}
