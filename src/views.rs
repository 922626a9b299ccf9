//! Search views
//!
//! - **common**: `CommSearchView`, shared list view construction
//! - **global_search**: `GlobalSearchView`, the cross-model results page
//! - **result**: `GlobalSearchResultView`, dispatch to one model's result list

pub mod common;
pub mod global_search;
pub mod result;

pub use common::CommSearchView;
pub use global_search::{GlobalSearchView, SearchState};
pub use result::{GlobalSearchResultView, HTTP_METHODS, Handler};
