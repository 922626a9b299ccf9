//! Per-model list view
//!
//! A `ListView` is built per request by [`AdminSite::get_view`](super::site::AdminSite::get_view)
//! from a composed [`SearchOption`]. It answers the questions the global
//! search page asks (permission, default selection, result count) and serves
//! the model's own result list.

use super::options::SearchOption;
use super::query::{ListQuery, QuerySource, query_string};
use crate::types::{GsearchError, GsearchResult, Response, SearchRequest};
use hyper::Method;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Page parameter of the result list (zero-based)
pub const PAGE_VAR: &str = "p";

/// Keyword options passed when constructing a list view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewOptions {
	/// Choice index of the model in the search registry
	pub model_filter_id: Option<usize>,
	/// Search text to query with; read from the query string when `None`
	pub search_text: Option<String>,
}

/// JSON body of a result list page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse {
	pub model: String,
	pub count: u64,
	pub page: u64,
	pub page_size: u64,
	pub total_pages: u64,
	pub search: String,
	pub model_filter_id: Option<usize>,
	pub results: Vec<serde_json::Value>,
}

/// List view for one model, bound to the current request
pub struct ListView {
	option: Arc<SearchOption>,
	model_filter_id: Option<usize>,
	view_permission: bool,
	search_text: String,
	query_params: Vec<(String, String)>,
	source: Arc<dyn QuerySource>,
}

impl ListView {
	pub(crate) fn new(
		option: Arc<SearchOption>,
		source: Arc<dyn QuerySource>,
		request: &SearchRequest,
		search_param: &str,
		options: ViewOptions,
		view_permission: bool,
	) -> Self {
		let search_text = options.search_text.unwrap_or_else(|| {
			request
				.query()
				.get(search_param)
				.unwrap_or_default()
				.trim()
				.to_string()
		});
		Self {
			option,
			model_filter_id: options.model_filter_id,
			view_permission,
			search_text,
			query_params: request.query_params.clone(),
			source,
		}
	}

	pub fn option(&self) -> &Arc<SearchOption> {
		&self.option
	}

	pub fn model_filter_id(&self) -> Option<usize> {
		self.model_filter_id
	}

	pub fn model_filter_active(&self) -> bool {
		self.option.model_filter_active()
	}

	pub fn verbose_name(&self) -> &str {
		self.option.verbose_name()
	}

	pub fn app_model_name(&self) -> String {
		self.option.app_model_name()
	}

	pub fn search_fields(&self) -> &[String] {
		self.option.search_fields()
	}

	pub fn search_text(&self) -> &str {
		&self.search_text
	}

	pub fn has_view_permission(&self) -> bool {
		self.view_permission
	}

	fn query(&self, offset: u64, limit: u64) -> ListQuery<'_> {
		ListQuery {
			table: self.option.table_name(),
			search_fields: self.option.search_fields(),
			search: &self.search_text,
			ordering: self.option.ordering(),
			offset,
			limit,
		}
	}

	/// Number of records the result list shows for the current search text
	pub async fn get_total(&self) -> GsearchResult<u64> {
		self.source.count(&self.query(0, u64::MAX)).await
	}

	/// Query string derived from the request's query parameters
	///
	/// See [`query_string`] for the exact rules.
	pub fn get_query_string(&self, new_params: &[(&str, Option<&str>)], remove: &[&str]) -> String {
		query_string(&self.query_params, new_params, remove)
	}

	/// Handle a request with the view's handler for its verb
	///
	/// # Errors
	///
	/// Returns `GsearchError::MethodNotAllowed` for verbs the list view does not serve.
	pub async fn handle(&self, request: &SearchRequest) -> GsearchResult<Response> {
		match request.method {
			Method::GET => self.get(request).await,
			Method::HEAD => {
				let mut response = self.get(request).await?;
				response.body = bytes::Bytes::new();
				Ok(response)
			}
			Method::POST => self.post(request).await,
			ref other => Err(GsearchError::MethodNotAllowed(other.clone())),
		}
	}

	/// Render one page of results as JSON
	pub async fn get(&self, request: &SearchRequest) -> GsearchResult<Response> {
		let page_size = self.option.list_per_page() as u64;
		let page = request
			.query()
			.get(PAGE_VAR)
			.and_then(|v| v.parse::<u64>().ok())
			.unwrap_or(0);

		let count = self.get_total().await?;
		let results = self
			.source
			.list(&self.query(page.saturating_mul(page_size), page_size))
			.await?;

		let body = ListResponse {
			model: self.app_model_name(),
			count,
			page,
			page_size,
			total_pages: count.div_ceil(page_size).max(1),
			search: self.search_text.clone(),
			model_filter_id: self.model_filter_id,
			results,
		};
		Response::ok()
			.with_json(&body)
			.map_err(|e| GsearchError::Query(e.to_string()))
	}

	/// Same listing as `get`; the list view has no state-changing actions
	pub async fn post(&self, request: &SearchRequest) -> GsearchResult<Response> {
		self.get(request).await
	}
}

impl fmt::Debug for ListView {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ListView")
			.field("model", &self.option.app_model_name())
			.field("model_filter_id", &self.model_filter_id)
			.field("view_permission", &self.view_permission)
			.field("search_text", &self.search_text)
			.finish_non_exhaustive()
	}
}

#[derive(Serialize)]
struct ListViewSummary<'a> {
	app_model_name: String,
	verbose_name: &'a str,
	model_filter_id: Option<usize>,
	model_filter_active: bool,
	search_fields: &'a [String],
	has_view_permission: bool,
}

impl Serialize for ListView {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		ListViewSummary {
			app_model_name: self.app_model_name(),
			verbose_name: self.verbose_name(),
			model_filter_id: self.model_filter_id,
			model_filter_active: self.model_filter_active(),
			search_fields: self.search_fields(),
			has_view_permission: self.view_permission,
		}
		.serialize(serializer)
	}
}
