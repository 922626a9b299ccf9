//! Error types for the global search plugin

use super::response::Response;
use hyper::{Method, StatusCode};
use thiserror::Error;

/// Global search error type
#[derive(Debug, Error)]
pub enum GsearchError {
	/// Model not registered with the search registry or the admin site
	#[error("Model '{0}' is not registered")]
	NotRegistered(String),

	/// Requested resource does not exist
	#[error("Not found: {0}")]
	NotFound(String),

	/// Current user may not view the model
	#[error("Permission denied: {0}")]
	PermissionDenied(String),

	/// Verb not handled by the target view
	#[error("Method not allowed: {0}")]
	MethodNotAllowed(Method),

	/// Template rendering error
	#[error("Template rendering error: {0}")]
	Template(String),

	/// List queryset error
	#[error("Query error: {0}")]
	Query(String),

	/// URL reversal error
	#[error("Reverse error: {0}")]
	Reverse(String),

	/// Settings could not be loaded
	#[error("Configuration error: {0}")]
	Config(String),
}

/// Result type for global search operations
pub type GsearchResult<T> = Result<T, GsearchError>;

impl GsearchError {
	/// HTTP status the error is surfaced as
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_gsearch::GsearchError;
	/// use hyper::StatusCode;
	///
	/// let err = GsearchError::NotFound("blog.post".to_string());
	/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
	/// ```
	pub fn status_code(&self) -> StatusCode {
		match self {
			GsearchError::NotRegistered(_) | GsearchError::NotFound(_) => StatusCode::NOT_FOUND,
			GsearchError::PermissionDenied(_) => StatusCode::FORBIDDEN,
			GsearchError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
			GsearchError::Template(_)
			| GsearchError::Query(_)
			| GsearchError::Reverse(_)
			| GsearchError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// Convert the error into a plain-text response with the mapped status
	pub fn into_response(self) -> Response {
		let status = self.status_code();
		// Internal details stay in the log, not in the page.
		let body = if status.is_server_error() {
			tracing::error!(error = %self, "global search request failed");
			status
				.canonical_reason()
				.unwrap_or("Internal Server Error")
				.to_string()
		} else {
			self.to_string()
		};
		Response::new(status).with_text(body)
	}
}

impl From<tera::Error> for GsearchError {
	fn from(err: tera::Error) -> Self {
		// Tera keeps the useful part of the message in the source chain
		let mut message = err.to_string();
		let mut source = std::error::Error::source(&err);
		while let Some(inner) = source {
			message.push_str(": ");
			message.push_str(&inner.to_string());
			source = inner.source();
		}
		GsearchError::Template(message)
	}
}
