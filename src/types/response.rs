use bytes::Bytes;
use hyper::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use hyper::{HeaderMap, StatusCode};
use serde::Serialize;

/// HTTP Response representation
#[derive(Debug, Clone)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	/// Create a new Response with the given status code
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_gsearch::Response;
	/// use hyper::StatusCode;
	///
	/// let response = Response::new(StatusCode::OK);
	/// assert_eq!(response.status, StatusCode::OK);
	/// assert!(response.body.is_empty());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	/// Create a Response with HTTP 200 OK status
	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	/// Set a header, ignoring values that are not valid header text
	pub fn with_header(mut self, name: HeaderName, value: &str) -> Self {
		if let Ok(value) = HeaderValue::from_str(value) {
			self.headers.insert(name, value);
		}
		self
	}

	/// Set the body as a plain text document
	pub fn with_text(mut self, text: impl Into<String>) -> Self {
		self.body = Bytes::from(text.into());
		self.headers.insert(
			CONTENT_TYPE,
			HeaderValue::from_static("text/plain; charset=utf-8"),
		);
		self
	}

	/// Set the body as an HTML document
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_gsearch::Response;
	///
	/// let response = Response::ok().with_html("<h1>Results</h1>");
	/// assert_eq!(
	///     response.headers.get("content-type").unwrap(),
	///     "text/html; charset=utf-8"
	/// );
	/// ```
	pub fn with_html(mut self, html: impl Into<String>) -> Self {
		self.body = Bytes::from(html.into());
		self.headers.insert(
			CONTENT_TYPE,
			HeaderValue::from_static("text/html; charset=utf-8"),
		);
		self
	}

	/// Serialize `data` as the JSON body
	///
	/// # Errors
	///
	/// Returns `Err(serde_json::Error)` if the data cannot be serialized to JSON.
	pub fn with_json<T: Serialize>(mut self, data: &T) -> Result<Self, serde_json::Error> {
		self.body = Bytes::from(serde_json::to_vec(data)?);
		self.headers
			.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		Ok(self)
	}

	/// Body decoded as UTF-8, replacing invalid sequences
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}
