//! # Reinhardt Global Search
//!
//! Cross-model search page for the Reinhardt admin panel.
//!
//! Models are registered with a [`SearchRegistry`], optionally with option
//! fragments that tune how they are searched. The global search page walks
//! the registry, asks each model's list view for its result count and links
//! to each model's own result list.
//!
//! ## Features
//!
//! - **Option composition**: fragments override the search defaults, which
//!   override the model admin configuration
//! - **Model filters**: per-model checkboxes, default-on unless a fragment
//!   turns `model_filter_active` off
//! - **Permissions**: models the user may not view are left out of the page
//! - **Result lists**: `<admin_root>/<app>/<model>/gsearch_result/` forwards
//!   to the model's list view
//!
//! ## Quick Start
//!
//! ```
//! use reinhardt_gsearch::{
//!     AdminSite, AdminUser, GsearchRouter, InMemorySource, ModelAdminConfig, ModelMeta,
//!     SearchRegistry, SearchRequest,
//! };
//! use hyper::StatusCode;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let source = InMemorySource::new();
//! source.insert("post", json!({"id": 1, "title": "Hello world"}));
//!
//! let post = ModelMeta::new("blog", "post");
//! let site = Arc::new(AdminSite::new(Arc::new(source)));
//! site.register(Arc::new(
//!     ModelAdminConfig::builder(post.clone())
//!         .search_fields(vec!["title"])
//!         .build(),
//! ));
//!
//! let registry = Arc::new(SearchRegistry::new());
//! registry.register(post, None);
//!
//! let router = GsearchRouter::new(site, registry).unwrap();
//! let request = SearchRequest::builder()
//!     .uri("/admin/gsearch/?_q_=hello")
//!     .user(AdminUser::superuser("admin"))
//!     .build()
//!     .unwrap();
//!
//! let response = router.handle(request).await;
//! assert_eq!(response.status, StatusCode::OK);
//! # });
//! ```

pub mod conf;
pub mod core;
pub mod forms;
pub mod templates;
pub mod types;
pub mod urls;
pub mod views;

pub use conf::GsearchSettings;
pub use crate::core::{
	AdminSite, InMemorySource, ListResponse, ListView, ModelAdmin, ModelAdminConfig, ModelMeta,
	OptionFragment, QuerySource, SearchOption, SearchOptionFragment, SearchOptsBase,
	SearchRegistry, ViewOptions, query_string,
};
pub use forms::SearchForm;
pub use templates::GsearchTemplates;
pub use types::{
	AdminUser, Breadcrumb, GsearchContext, GsearchError, GsearchResult, Media, Response,
	SearchRequest, SearchViewEntry,
};
pub use urls::{GsearchRouter, UrlReverser};
pub use views::{CommSearchView, GlobalSearchResultView, GlobalSearchView, Handler};
