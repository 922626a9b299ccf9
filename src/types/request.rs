//! Incoming request representation
//!
//! `SearchRequest` carries what the search views read from the host request:
//! the verb, path, decoded query and form parameters (multi-valued, in order),
//! router path parameters and the authenticated admin user.

use super::errors::{GsearchError, GsearchResult};
use hyper::Method;
use std::collections::{HashMap, HashSet};

/// Authenticated admin user
///
/// Permissions use Django-style codenames such as `"blog.view_post"`.
#[derive(Debug, Clone, Default)]
pub struct AdminUser {
	pub username: String,
	pub is_active: bool,
	pub is_superuser: bool,
	pub permissions: HashSet<String>,
}

impl AdminUser {
	/// Create an active user without permissions
	pub fn new(username: impl Into<String>) -> Self {
		Self {
			username: username.into(),
			is_active: true,
			is_superuser: false,
			permissions: HashSet::new(),
		}
	}

	/// Create an active superuser
	pub fn superuser(username: impl Into<String>) -> Self {
		Self {
			is_superuser: true,
			..Self::new(username)
		}
	}

	/// Grant a permission codename
	pub fn with_permission(mut self, codename: impl Into<String>) -> Self {
		self.permissions.insert(codename.into());
		self
	}

	/// Check a permission codename
	///
	/// Active superusers hold every permission; inactive users hold none.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_gsearch::AdminUser;
	///
	/// let user = AdminUser::new("alice").with_permission("blog.view_post");
	/// assert!(user.has_perm("blog.view_post"));
	/// assert!(!user.has_perm("blog.view_author"));
	/// assert!(AdminUser::superuser("root").has_perm("blog.view_author"));
	/// ```
	pub fn has_perm(&self, codename: &str) -> bool {
		if !self.is_active {
			return false;
		}
		self.is_superuser || self.permissions.contains(codename)
	}
}

/// Request handed to the search views
#[derive(Debug, Clone)]
pub struct SearchRequest {
	pub method: Method,
	pub path: String,
	pub query_params: Vec<(String, String)>,
	pub form_params: Vec<(String, String)>,
	pub path_params: HashMap<String, String>,
	pub user: AdminUser,
}

impl SearchRequest {
	/// Start building a request
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_gsearch::SearchRequest;
	/// use hyper::Method;
	///
	/// let request = SearchRequest::builder()
	///     .method(Method::GET)
	///     .uri("/admin/gsearch/?_q_=hello&mdl=0&mdl=1")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.path, "/admin/gsearch/");
	/// assert_eq!(request.request_params().get_all("mdl"), vec!["0", "1"]);
	/// ```
	pub fn builder() -> SearchRequestBuilder {
		SearchRequestBuilder::default()
	}

	/// Parameters for the current verb: the query string on GET, the form body otherwise
	pub fn request_params(&self) -> RequestParams<'_> {
		if self.method == Method::GET {
			RequestParams(&self.query_params)
		} else {
			RequestParams(&self.form_params)
		}
	}

	/// Query string parameters, whatever the verb
	pub fn query(&self) -> RequestParams<'_> {
		RequestParams(&self.query_params)
	}

	/// Set a path parameter (used by the router for path variable extraction)
	pub fn set_path_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.path_params.insert(key.into(), value.into());
	}

	/// Get a path parameter extracted by the router
	pub fn path_param(&self, key: &str) -> Option<&str> {
		self.path_params.get(key).map(String::as_str)
	}
}

/// Borrowed view over a multi-valued parameter list
#[derive(Debug, Clone, Copy)]
pub struct RequestParams<'a>(&'a [(String, String)]);

impl<'a> RequestParams<'a> {
	/// Last value submitted for `key`
	pub fn get(&self, key: &str) -> Option<&'a str> {
		self.0
			.iter()
			.rev()
			.find(|(k, _)| k == key)
			.map(|(_, v)| v.as_str())
	}

	/// Every value submitted for `key`, in submission order
	pub fn get_all(&self, key: &str) -> Vec<&'a str> {
		self.0
			.iter()
			.filter(|(k, _)| k == key)
			.map(|(_, v)| v.as_str())
			.collect()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

/// Builder for [`SearchRequest`]
#[derive(Debug, Default)]
pub struct SearchRequestBuilder {
	method: Option<Method>,
	uri: Option<String>,
	form: Option<String>,
	user: Option<AdminUser>,
}

impl SearchRequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = Some(method);
		self
	}

	/// Path with an optional `?query` part
	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = Some(uri.into());
		self
	}

	/// `application/x-www-form-urlencoded` body
	pub fn form(mut self, body: impl Into<String>) -> Self {
		self.form = Some(body.into());
		self
	}

	pub fn user(mut self, user: AdminUser) -> Self {
		self.user = Some(user);
		self
	}

	/// Build the request
	///
	/// # Errors
	///
	/// Returns `GsearchError::NotFound` if the uri does not start with `/`.
	pub fn build(self) -> GsearchResult<SearchRequest> {
		let uri = self.uri.unwrap_or_else(|| "/".to_string());
		let (path, query) = match uri.split_once('?') {
			Some((path, query)) => (path.to_string(), Some(query)),
			None => (uri.clone(), None),
		};
		if !path.starts_with('/') {
			return Err(GsearchError::NotFound(uri));
		}

		Ok(SearchRequest {
			method: self.method.unwrap_or(Method::GET),
			path,
			query_params: query.map(parse_urlencoded).unwrap_or_default(),
			form_params: self.form.as_deref().map(parse_urlencoded).unwrap_or_default(),
			path_params: HashMap::new(),
			user: self.user.unwrap_or_default(),
		})
	}
}

/// Decode a urlencoded string, keeping repeated keys
fn parse_urlencoded(input: &str) -> Vec<(String, String)> {
	// serde_urlencoded only fails on non-string targets
	serde_urlencoded::from_str(input).unwrap_or_default()
}
