//! Admin site
//!
//! The admin site holds the model admin registry the search views consult,
//! the record source list views query and the URL table of the admin.

use super::admin::ModelAdmin;
use super::list_view::{ListView, ViewOptions};
use super::model::ModelMeta;
use super::options::SearchOption;
use super::query::QuerySource;
use crate::conf::GsearchSettings;
use crate::types::{Breadcrumb, GsearchError, GsearchResult, SearchRequest};
use crate::urls::{INDEX, UrlReverser};
use parking_lot::RwLock;
use std::sync::Arc;

/// Admin site the search plugin is installed on
pub struct AdminSite {
	settings: GsearchSettings,
	registry: RwLock<Vec<(ModelMeta, Arc<dyn ModelAdmin>)>>,
	source: Arc<dyn QuerySource>,
	reverser: UrlReverser,
}

impl AdminSite {
	/// Create a site with default settings
	pub fn new(source: Arc<dyn QuerySource>) -> Self {
		Self::with_settings(source, GsearchSettings::default())
	}

	pub fn with_settings(source: Arc<dyn QuerySource>, settings: GsearchSettings) -> Self {
		let reverser = UrlReverser::for_admin_root(settings.admin_root());
		Self {
			settings,
			registry: RwLock::new(Vec::new()),
			source,
			reverser,
		}
	}

	pub fn settings(&self) -> &GsearchSettings {
		&self.settings
	}

	pub fn reverser(&self) -> &UrlReverser {
		&self.reverser
	}

	pub fn source(&self) -> &Arc<dyn QuerySource> {
		&self.source
	}

	/// Register a model admin; registering a model again replaces its admin
	pub fn register(&self, admin: Arc<dyn ModelAdmin>) {
		let model = admin.model().clone();
		let mut registry = self.registry.write();
		match registry.iter_mut().find(|(m, _)| *m == model) {
			Some(entry) => {
				tracing::debug!(model = %model, "replacing model admin");
				entry.1 = admin;
			}
			None => {
				tracing::debug!(model = %model, "registering model admin");
				registry.push((model, admin));
			}
		}
	}

	/// The model admin registered for `model`
	///
	/// # Errors
	///
	/// Returns `GsearchError::NotRegistered` if the model has no admin.
	pub fn get_registry(&self, model: &ModelMeta) -> GsearchResult<Arc<dyn ModelAdmin>> {
		self.registry
			.read()
			.iter()
			.find(|(m, _)| m == model)
			.map(|(_, admin)| Arc::clone(admin))
			.ok_or_else(|| GsearchError::NotRegistered(model.namespaced_name()))
	}

	/// Look up a model by app label and model name
	///
	/// # Errors
	///
	/// Returns `GsearchError::NotFound` if the site knows no such model.
	pub fn get_model(&self, app_label: &str, model_name: &str) -> GsearchResult<ModelMeta> {
		self.registry
			.read()
			.iter()
			.map(|(m, _)| m)
			.find(|m| m.app_label() == app_label && m.model_name() == model_name)
			.cloned()
			.ok_or_else(|| GsearchError::NotFound(format!("{}.{}", app_label, model_name)))
	}

	/// Reverse an admin route
	pub fn admin_url(&self, name: &str, params: &[(&str, &str)]) -> GsearchResult<String> {
		self.reverser.reverse(name, params)
	}

	/// Base breadcrumb of every admin page
	pub fn breadcrumbs(&self) -> GsearchResult<Vec<Breadcrumb>> {
		Ok(vec![Breadcrumb {
			url: Some(self.admin_url(INDEX, &[])?),
			title: "Home".to_string(),
		}])
	}

	/// Build the list view of `option` for `request`
	///
	/// # Errors
	///
	/// Returns `GsearchError::PermissionDenied` if the request user may not
	/// view the model.
	pub async fn get_view(
		&self,
		option: Arc<SearchOption>,
		request: &SearchRequest,
		options: ViewOptions,
	) -> GsearchResult<ListView> {
		if !option.has_view_permission(&request.user).await {
			return Err(GsearchError::PermissionDenied(option.app_model_name()));
		}
		Ok(ListView::new(
			option,
			Arc::clone(&self.source),
			request,
			&self.settings.search_param,
			options,
			true,
		))
	}
}

impl std::fmt::Debug for AdminSite {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let models: Vec<String> = self
			.registry
			.read()
			.iter()
			.map(|(m, _)| m.namespaced_name())
			.collect();
		f.debug_struct("AdminSite")
			.field("admin_root", &self.settings.admin_root)
			.field("models", &models)
			.finish_non_exhaustive()
	}
}
