//! Plugin settings
//!
//! Settings are plain serde data so they can live in the project's TOML
//! configuration next to the rest of the admin settings:
//!
//! ```toml
//! admin_root = "/backoffice"
//! search_param = "q"
//! title = "Found"
//! ```

use crate::types::{GsearchError, GsearchResult};
use serde::{Deserialize, Serialize};

/// Global search settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GsearchSettings {
	/// URL prefix the admin site is mounted on
	pub admin_root: String,
	/// Name of the search text parameter
	pub search_param: String,
	/// Title of the results page and its breadcrumb
	pub title: String,
	/// Root template of the results page
	pub template_name: String,
	/// Prefix of relative media paths
	pub static_url: String,
	/// Scripts added to the results page
	pub media_js: Vec<String>,
}

impl Default for GsearchSettings {
	fn default() -> Self {
		Self {
			admin_root: "/admin".to_string(),
			search_param: "_q_".to_string(),
			title: "Search results".to_string(),
			template_name: "gsearch/search.html".to_string(),
			static_url: "/static/".to_string(),
			media_js: vec!["gsearch/js/search.models.js".to_string()],
		}
	}
}

impl GsearchSettings {
	/// Load settings from a TOML document; missing keys keep their defaults
	///
	/// # Errors
	///
	/// Returns `GsearchError::Config` if the document is not valid TOML or a
	/// key has the wrong type.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_gsearch::GsearchSettings;
	///
	/// let settings = GsearchSettings::from_toml_str("admin_root = \"/backoffice/\"").unwrap();
	/// assert_eq!(settings.admin_root(), "/backoffice");
	/// assert_eq!(settings.search_param, "_q_");
	/// ```
	pub fn from_toml_str(input: &str) -> GsearchResult<Self> {
		toml::from_str(input).map_err(|e| GsearchError::Config(e.to_string()))
	}

	/// Admin root without a trailing slash (`""` when mounted at `/`)
	pub fn admin_root(&self) -> &str {
		self.admin_root.trim_end_matches('/')
	}
}
