//! Per-model result list dispatch
//!
//! `GlobalSearchResultView` keeps a fixed table from verb to handler. Every
//! supported verb starts out bound to [`GlobalSearchResultView::search_response`],
//! which forwards the request to the model's list view.

use super::common::CommSearchView;
use crate::core::{AdminSite, SearchRegistry, ViewOptions};
use crate::types::{GsearchError, GsearchResult, Response, SearchRequest};
use async_trait::async_trait;
use hyper::Method;
use std::collections::HashMap;
use std::sync::Arc;

/// Verbs the result view answers
pub const HTTP_METHODS: [Method; 7] = [
	Method::GET,
	Method::POST,
	Method::PUT,
	Method::PATCH,
	Method::DELETE,
	Method::HEAD,
	Method::OPTIONS,
];

/// Request handler bound to one verb
#[async_trait]
pub trait Handler: Send + Sync {
	async fn handle(&self, request: &SearchRequest) -> GsearchResult<Response>;
}

#[async_trait]
impl<T: Handler + ?Sized> Handler for Arc<T> {
	async fn handle(&self, request: &SearchRequest) -> GsearchResult<Response> {
		(**self).handle(request).await
	}
}

/// Shared dispatch routine every verb defaults to
struct SearchResponse {
	common: Arc<CommSearchView>,
}

#[async_trait]
impl Handler for SearchResponse {
	async fn handle(&self, request: &SearchRequest) -> GsearchResult<Response> {
		search_response(&self.common, request).await
	}
}

async fn search_response(
	common: &CommSearchView,
	request: &SearchRequest,
) -> GsearchResult<Response> {
	let app_label = request.path_param("app_label").unwrap_or_default();
	let model_name = request.path_param("model_name").unwrap_or_default();
	let app_model_name = format!("{}.{}", app_label, model_name);

	let model_filter_id = common
		.registry()
		.choice_ids()
		.get(&app_model_name)
		.copied()
		.ok_or_else(|| GsearchError::NotFound(app_model_name.clone()))?;
	let model = common.site().get_model(app_label, model_name)?;
	let admin = common.site().get_registry(&model).map_err(|err| match err {
		GsearchError::NotRegistered(name) => GsearchError::NotFound(name),
		other => other,
	})?;
	let option = common.registry().get_option(&model, admin)?;

	let options = ViewOptions {
		model_filter_id: Some(model_filter_id),
		search_text: None,
	};
	let view = common.get_search_view(option, request, options).await?;
	tracing::debug!(model = %app_model_name, method = %request.method, "forwarding to list view");
	view.handle(request).await
}

/// Dispatches requests for one model's results to its list view
pub struct GlobalSearchResultView {
	common: Arc<CommSearchView>,
	handlers: HashMap<Method, Arc<dyn Handler>>,
}

impl GlobalSearchResultView {
	pub fn new(site: Arc<AdminSite>, registry: Arc<SearchRegistry>) -> Self {
		let common = Arc::new(CommSearchView::new(site, registry));
		let shared: Arc<dyn Handler> = Arc::new(SearchResponse {
			common: Arc::clone(&common),
		});
		let handlers = HTTP_METHODS
			.iter()
			.map(|method| (method.clone(), Arc::clone(&shared)))
			.collect();
		Self { common, handlers }
	}

	/// Bind `method` to `handler`, replacing the shared dispatch
	pub fn with_handler(mut self, method: Method, handler: Arc<dyn Handler>) -> Self {
		self.set_handler(method, handler);
		self
	}

	pub fn set_handler(&mut self, method: Method, handler: Arc<dyn Handler>) {
		self.handlers.insert(method, handler);
	}

	pub fn common(&self) -> &CommSearchView {
		&self.common
	}

	/// Forward `request` to the list view of the model named in its path
	///
	/// # Errors
	///
	/// Returns `GsearchError::NotFound` if the model is not a search choice
	/// or has no model admin, and `GsearchError::PermissionDenied` if the
	/// user may not view it.
	pub async fn search_response(&self, request: &SearchRequest) -> GsearchResult<Response> {
		search_response(&self.common, request).await
	}

	/// Run the handler bound to the request verb
	pub async fn dispatch(&self, request: &SearchRequest) -> GsearchResult<Response> {
		let handler = self
			.handlers
			.get(&request.method)
			.ok_or_else(|| GsearchError::MethodNotAllowed(request.method.clone()))?;
		handler.handle(request).await
	}
}

impl std::fmt::Debug for GlobalSearchResultView {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut methods: Vec<&str> = self.handlers.keys().map(Method::as_str).collect();
		methods.sort_unstable();
		f.debug_struct("GlobalSearchResultView")
			.field("common", &self.common)
			.field("methods", &methods)
			.finish()
	}
}
