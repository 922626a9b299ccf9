//! Template context types
//!
//! The templates only rely on the `gsearch` contract:
//! `{url, title, search_param, search_text, count, views: [{view, url, checked, active}]}`.

use crate::core::ListView;
use serde::Serialize;
use std::sync::Arc;

/// One model's row on the results page
#[derive(Debug, Clone, Serialize)]
pub struct SearchViewEntry {
	pub view: Arc<ListView>,
	/// Result list URL carrying the search text
	pub url: String,
	pub checked: bool,
	/// Permission granted, checked and search text present
	pub active: bool,
}

/// The `gsearch` entry of the page context
#[derive(Debug, Clone, Serialize)]
pub struct GsearchContext {
	pub url: String,
	pub title: String,
	pub search_param: String,
	pub search_text: String,
	/// Sum of result counts over active entries
	pub count: u64,
	pub views: Vec<SearchViewEntry>,
}

impl GsearchContext {
	/// Entries whose results are counted
	pub fn active_views(&self) -> impl Iterator<Item = &SearchViewEntry> {
		self.views.iter().filter(|entry| entry.active)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
	pub url: Option<String>,
	pub title: String,
}

/// Extra page assets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Media {
	pub js: Vec<String>,
}

impl Media {
	/// Append scripts, skipping ones already present
	pub fn add_js<I, S>(&mut self, scripts: I)
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		for script in scripts {
			let script = script.into();
			if !self.js.contains(&script) {
				self.js.push(script);
			}
		}
	}

	/// Script URLs resolved against the static root
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_gsearch::Media;
	///
	/// let mut media = Media::default();
	/// media.add_js(["gsearch/js/search.models.js", "https://cdn.example.com/x.js"]);
	/// assert_eq!(
	///     media.js_urls("/static/"),
	///     vec![
	///         "/static/gsearch/js/search.models.js".to_string(),
	///         "https://cdn.example.com/x.js".to_string(),
	///     ]
	/// );
	/// ```
	pub fn js_urls(&self, static_url: &str) -> Vec<String> {
		self.js
			.iter()
			.map(|path| {
				if path.starts_with('/') || path.contains("://") {
					path.clone()
				} else {
					format!("{}/{}", static_url.trim_end_matches('/'), path)
				}
			})
			.collect()
	}
}
