//! Template engine for the search page
//!
//! The root template and the four navigation blocks are compiled into the
//! binary and registered under their `gsearch/...` names. Projects can
//! replace any of them with [`GsearchTemplates::add_raw_template`].

use crate::types::GsearchResult;
use serde::Serialize;
use tera::{Context, Tera};

pub const SEARCH_TEMPLATE: &str = "gsearch/search.html";
pub const NAV_FORM_TEMPLATE: &str = "gsearch/blocks/search.nav.form.html";
pub const NAV_MENU_TEMPLATE: &str = "gsearch/blocks/search.nav_menu.filters.html";
pub const NAV_BTNS_TEMPLATE: &str = "gsearch/blocks/search.nav_btns.filters.html";
pub const NAV_TOGGLES_TEMPLATE: &str = "gsearch/blocks/search.navmob_toggles.filters.html";

const BUNDLED: [(&str, &str); 5] = [
	(SEARCH_TEMPLATE, include_str!("../templates/gsearch/search.html")),
	(
		NAV_FORM_TEMPLATE,
		include_str!("../templates/gsearch/blocks/search.nav.form.html"),
	),
	(
		NAV_MENU_TEMPLATE,
		include_str!("../templates/gsearch/blocks/search.nav_menu.filters.html"),
	),
	(
		NAV_BTNS_TEMPLATE,
		include_str!("../templates/gsearch/blocks/search.nav_btns.filters.html"),
	),
	(
		NAV_TOGGLES_TEMPLATE,
		include_str!("../templates/gsearch/blocks/search.navmob_toggles.filters.html"),
	),
];

/// Tera instance holding the search templates
#[derive(Debug, Clone)]
pub struct GsearchTemplates {
	tera: Tera,
}

impl GsearchTemplates {
	/// Load the bundled templates
	///
	/// # Errors
	///
	/// Returns `GsearchError::Template` if a bundled template fails to parse.
	pub fn new() -> GsearchResult<Self> {
		let mut tera = Tera::default();
		tera.add_raw_templates(BUNDLED)?;
		Ok(Self { tera })
	}

	/// Register or replace a template
	pub fn add_raw_template(&mut self, name: &str, content: &str) -> GsearchResult<()> {
		self.tera.add_raw_template(name, content)?;
		Ok(())
	}

	pub fn has_template(&self, name: &str) -> bool {
		self.tera.get_template_names().any(|n| n == name)
	}

	/// Render `name` with a serializable context
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_gsearch::templates::{GsearchTemplates, NAV_BTNS_TEMPLATE};
	/// use serde_json::json;
	///
	/// let templates = GsearchTemplates::new().unwrap();
	/// let html = templates.render(NAV_BTNS_TEMPLATE, &json!({})).unwrap();
	/// assert!(html.contains("gsearch-select-all"));
	/// ```
	pub fn render<T: Serialize>(&self, name: &str, context: &T) -> GsearchResult<String> {
		let context = Context::from_serialize(context)?;
		Ok(self.tera.render(name, &context)?)
	}
}
