use crate::core::{AdminSite, ListView, SearchOption, SearchRegistry, ViewOptions};
use crate::types::{GsearchResult, SearchRequest};
use std::sync::Arc;

/// State shared by both search views
#[derive(Debug, Clone)]
pub struct CommSearchView {
	site: Arc<AdminSite>,
	registry: Arc<SearchRegistry>,
}

impl CommSearchView {
	pub fn new(site: Arc<AdminSite>, registry: Arc<SearchRegistry>) -> Self {
		Self { site, registry }
	}

	pub fn site(&self) -> &Arc<AdminSite> {
		&self.site
	}

	pub fn registry(&self) -> &Arc<SearchRegistry> {
		&self.registry
	}

	/// Build the list view of `option`, warning when it has nothing to search
	///
	/// # Errors
	///
	/// Propagates `GsearchError::PermissionDenied` from the site.
	pub async fn get_search_view(
		&self,
		option: Arc<SearchOption>,
		request: &SearchRequest,
		options: ViewOptions,
	) -> GsearchResult<ListView> {
		let view = self.site.get_view(option, request, options).await?;
		if view.search_fields().is_empty() {
			let model = view.app_model_name();
			tracing::warn!(
				model = %model,
				"missing/empty 'search_fields' view attribute for model '{}'",
				model
			);
		}
		Ok(view)
	}

	pub fn get_admin_url(&self, name: &str, params: &[(&str, &str)]) -> GsearchResult<String> {
		self.site.admin_url(name, params)
	}
}
