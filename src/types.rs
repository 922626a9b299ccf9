//! Shared value types for the global search plugin
//!
//! - **errors**: `GsearchError` and its HTTP status mapping
//! - **request**: `SearchRequest` and the user it carries
//! - **response**: `Response` returned by every view
//! - **context**: serializable template context

pub mod context;
pub mod errors;
pub mod request;
pub mod response;

pub use context::{Breadcrumb, GsearchContext, Media, SearchViewEntry};
pub use errors::{GsearchError, GsearchResult};
pub use request::{AdminUser, RequestParams, SearchRequest, SearchRequestBuilder};
pub use response::Response;
