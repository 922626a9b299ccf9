//! URL routing for the search endpoints
//!
//! Two routes are mounted under the admin root:
//!
//! - `gsearch`: `<admin_root>/gsearch/`, the global search page (GET, POST)
//! - `search_resultlist`: `<admin_root>/{app_label}/{model_name}/gsearch_result/`,
//!   the per-model result list (every verb)
//!
//! [`UrlReverser`] resolves route names back to paths and matches incoming
//! paths against the route table. [`GsearchRouter`] dispatches matched
//! requests to the views and turns errors into responses.

use crate::core::{AdminSite, SearchRegistry};
use crate::types::{GsearchError, GsearchResult, Response, SearchRequest};
use crate::views::{GlobalSearchResultView, GlobalSearchView};
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use std::collections::HashMap;
use std::sync::Arc;

/// Characters escaped in a reversed path segment
const SEGMENT: &AsciiSet = &CONTROLS
	.add(b' ')
	.add(b'"')
	.add(b'#')
	.add(b'%')
	.add(b'/')
	.add(b'<')
	.add(b'>')
	.add(b'?')
	.add(b'`')
	.add(b'{')
	.add(b'}');

pub const INDEX: &str = "index";
pub const GSEARCH: &str = "gsearch";
pub const SEARCH_RESULTLIST: &str = "search_resultlist";

/// Named route table with `{param}` placeholders
#[derive(Debug, Clone, Default)]
pub struct UrlReverser {
	routes: Vec<(String, String)>,
}

impl UrlReverser {
	pub fn new() -> Self {
		Self::default()
	}

	/// Routes of an admin site mounted at `admin_root` (no trailing slash)
	pub fn for_admin_root(admin_root: &str) -> Self {
		let mut reverser = Self::new();
		reverser.register(INDEX, format!("{}/", admin_root));
		reverser.register(GSEARCH, format!("{}/gsearch/", admin_root));
		reverser.register(
			SEARCH_RESULTLIST,
			format!("{}/{{app_label}}/{{model_name}}/gsearch_result/", admin_root),
		);
		reverser
	}

	/// Add or replace the route called `name`
	pub fn register(&mut self, name: impl Into<String>, pattern: impl Into<String>) {
		let name = name.into();
		let pattern = pattern.into();
		match self.routes.iter_mut().find(|(n, _)| *n == name) {
			Some(route) => route.1 = pattern,
			None => self.routes.push((name, pattern)),
		}
	}

	/// Build the path of route `name`
	///
	/// Parameter values are percent-encoded as path segments.
	///
	/// # Errors
	///
	/// Returns `GsearchError::Reverse` if the route is unknown or a placeholder
	/// has no value.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_gsearch::urls::UrlReverser;
	///
	/// let reverser = UrlReverser::for_admin_root("/admin");
	/// let url = reverser
	///     .reverse("search_resultlist", &[("app_label", "blog"), ("model_name", "post")])
	///     .unwrap();
	/// assert_eq!(url, "/admin/blog/post/gsearch_result/");
	/// ```
	pub fn reverse(&self, name: &str, params: &[(&str, &str)]) -> GsearchResult<String> {
		let pattern = self
			.routes
			.iter()
			.find(|(n, _)| n == name)
			.map(|(_, pattern)| pattern.as_str())
			.ok_or_else(|| GsearchError::Reverse(format!("no route named '{}'", name)))?;

		let mut result = String::with_capacity(pattern.len());
		let mut chars = pattern.chars();
		while let Some(ch) = chars.next() {
			if ch != '{' {
				result.push(ch);
				continue;
			}
			let param: String = chars.by_ref().take_while(|&c| c != '}').collect();
			let value = params
				.iter()
				.find(|(k, _)| *k == param)
				.map(|(_, v)| *v)
				.ok_or_else(|| {
					GsearchError::Reverse(format!("missing param '{}' for route '{}'", param, name))
				})?;
			result.extend(utf8_percent_encode(value, SEGMENT));
		}
		Ok(result)
	}

	/// Find the route matching `path` and extract its parameters
	///
	/// Routes are tried in registration order.
	pub fn resolve(&self, path: &str) -> Option<(&str, HashMap<String, String>)> {
		self.routes.iter().find_map(|(name, pattern)| {
			match_pattern(pattern, path).map(|params| (name.as_str(), params))
		})
	}
}

fn match_pattern(pattern: &str, path: &str) -> Option<HashMap<String, String>> {
	let expected: Vec<&str> = pattern.split('/').collect();
	let actual: Vec<&str> = path.split('/').collect();
	if expected.len() != actual.len() {
		return None;
	}

	let mut params = HashMap::new();
	for (segment, value) in expected.iter().zip(&actual) {
		if let Some(name) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
			if value.is_empty() {
				return None;
			}
			let decoded = percent_decode_str(value).decode_utf8().ok()?;
			params.insert(name.to_string(), decoded.into_owned());
		} else if segment != value {
			return None;
		}
	}
	Some(params)
}

/// Dispatches requests under the admin root to the search views
///
/// # Examples
///
/// ```
/// use reinhardt_gsearch::{AdminSite, GsearchRouter, InMemorySource, SearchRegistry, SearchRequest};
/// use hyper::StatusCode;
/// use std::sync::Arc;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let site = Arc::new(AdminSite::new(Arc::new(InMemorySource::new())));
/// let router = GsearchRouter::new(site, Arc::new(SearchRegistry::new())).unwrap();
///
/// let request = SearchRequest::builder().uri("/admin/missing/").build().unwrap();
/// let response = router.handle(request).await;
/// assert_eq!(response.status, StatusCode::NOT_FOUND);
/// # });
/// ```
pub struct GsearchRouter {
	site: Arc<AdminSite>,
	global: GlobalSearchView,
	result: GlobalSearchResultView,
}

impl GsearchRouter {
	/// Build the router and the two views sharing `site` and `registry`
	///
	/// # Errors
	///
	/// Returns `GsearchError::Template` if the bundled templates fail to parse.
	pub fn new(site: Arc<AdminSite>, registry: Arc<SearchRegistry>) -> GsearchResult<Self> {
		Ok(Self {
			global: GlobalSearchView::new(Arc::clone(&site), Arc::clone(&registry))?,
			result: GlobalSearchResultView::new(Arc::clone(&site), registry),
			site,
		})
	}

	pub fn global_view(&self) -> &GlobalSearchView {
		&self.global
	}

	/// Mutable access to the result list view, e.g. to override a verb handler
	pub fn result_view_mut(&mut self) -> &mut GlobalSearchResultView {
		&mut self.result
	}

	/// Route and handle `request`; errors become responses
	pub async fn handle(&self, request: SearchRequest) -> Response {
		match self.dispatch(request).await {
			Ok(response) => response,
			Err(err) => err.into_response(),
		}
	}

	async fn dispatch(&self, mut request: SearchRequest) -> GsearchResult<Response> {
		let (name, params) = self
			.site
			.reverser()
			.resolve(&request.path)
			.ok_or_else(|| GsearchError::NotFound(request.path.clone()))?;
		tracing::debug!(route = name, path = %request.path, "resolved search route");

		for (key, value) in params {
			request.set_path_param(key, value);
		}
		match name {
			GSEARCH => self.global.dispatch(&request).await,
			SEARCH_RESULTLIST => self.result.dispatch(&request).await,
			_ => Err(GsearchError::NotFound(request.path.clone())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn reverser() -> UrlReverser {
		UrlReverser::for_admin_root("/admin")
	}

	#[rstest]
	#[case(GSEARCH, &[], "/admin/gsearch/")]
	#[case(INDEX, &[], "/admin/")]
	#[case(SEARCH_RESULTLIST, &[("app_label", "my app"), ("model_name", "a/b")], "/admin/my%20app/a%2Fb/gsearch_result/")]
	fn test_reverse(
		reverser: UrlReverser,
		#[case] name: &str,
		#[case] params: &[(&str, &str)],
		#[case] expected: &str,
	) {
		assert_eq!(reverser.reverse(name, params).unwrap(), expected);
	}

	#[rstest]
	fn test_reverse_missing_param(reverser: UrlReverser) {
		let result = reverser.reverse(SEARCH_RESULTLIST, &[("app_label", "blog")]);

		assert!(matches!(result, Err(GsearchError::Reverse(msg)) if msg.contains("model_name")));
	}

	#[rstest]
	fn test_reverse_unknown_route(reverser: UrlReverser) {
		assert!(matches!(reverser.reverse("nope", &[]), Err(GsearchError::Reverse(_))));
	}

	#[rstest]
	fn test_resolve_extracts_params(reverser: UrlReverser) {
		// Act
		let (name, params) = reverser.resolve("/admin/blog/post/gsearch_result/").unwrap();

		// Assert
		assert_eq!(name, SEARCH_RESULTLIST);
		assert_eq!(params["app_label"], "blog");
		assert_eq!(params["model_name"], "post");
	}

	#[rstest]
	#[case("/admin/gsearch/", GSEARCH)]
	#[case("/admin/", INDEX)]
	fn test_resolve_names(reverser: UrlReverser, #[case] path: &str, #[case] expected: &str) {
		assert_eq!(reverser.resolve(path).map(|(name, _)| name), Some(expected));
	}

	#[rstest]
	#[case("/admin/gsearch")]
	#[case("/other/gsearch/")]
	#[case("/admin//post/gsearch_result/")]
	#[case("/admin/blog/post/")]
	fn test_resolve_rejects(reverser: UrlReverser, #[case] path: &str) {
		assert!(reverser.resolve(path).is_none());
	}
}
