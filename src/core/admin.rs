//! Model admin configuration and trait
//!
//! This is the list-view base capability every composed search option ends
//! with: it supplies querying configuration and the permission predicate.

use super::model::ModelMeta;
use crate::types::AdminUser;
use async_trait::async_trait;

/// Trait for configuring model administration
///
/// Implement this trait to customize how a model is listed and searched in the admin.
#[async_trait]
pub trait ModelAdmin: Send + Sync {
	/// The administered model
	fn model(&self) -> &ModelMeta;

	/// Name used when deriving composed option names
	fn admin_name(&self) -> &str {
		"ModelAdmin"
	}

	/// Get the database table name
	///
	/// By default, returns the model name.
	fn table_name(&self) -> &str {
		self.model().model_name()
	}

	/// Fields to display in list view
	fn list_display(&self) -> Vec<&str> {
		vec!["id"]
	}

	/// Fields that can be searched
	fn search_fields(&self) -> Vec<&str> {
		vec![]
	}

	/// Ordering for list view (prefix with "-" for descending)
	fn ordering(&self) -> Vec<&str> {
		vec!["-id"]
	}

	/// Number of items per page
	fn list_per_page(&self) -> usize {
		100
	}

	/// Check if user has permission to view this model
	///
	/// Default implementation accepts the `view` or `change` codename for the model.
	async fn has_view_permission(&self, user: &AdminUser) -> bool {
		let model = self.model();
		user.has_perm(&model.permission_codename("view"))
			|| user.has_perm(&model.permission_codename("change"))
	}
}

/// Configuration-based model admin implementation
///
/// Provides a simple way to configure model admin without implementing the trait.
///
/// # Examples
///
/// ```
/// use reinhardt_gsearch::{ModelAdmin, ModelAdminConfig, ModelMeta};
///
/// let admin = ModelAdminConfig::builder(ModelMeta::new("blog", "post"))
///     .list_display(vec!["id", "title"])
///     .search_fields(vec!["title", "body"])
///     .build();
///
/// assert_eq!(admin.model().namespaced_name(), "blog.post");
/// assert_eq!(admin.search_fields(), vec!["title", "body"]);
/// ```
#[derive(Debug, Clone)]
pub struct ModelAdminConfig {
	model: ModelMeta,
	admin_name: String,
	table_name: Option<String>,
	list_display: Vec<String>,
	search_fields: Vec<String>,
	ordering: Vec<String>,
	list_per_page: usize,
}

impl ModelAdminConfig {
	/// Create a new model admin configuration with defaults
	pub fn new(model: ModelMeta) -> Self {
		Self::builder(model).build()
	}

	/// Start building a model admin configuration
	pub fn builder(model: ModelMeta) -> ModelAdminConfigBuilder {
		ModelAdminConfigBuilder {
			model,
			admin_name: None,
			table_name: None,
			list_display: None,
			search_fields: None,
			ordering: None,
			list_per_page: None,
		}
	}

	/// Set search fields
	pub fn with_search_fields(mut self, fields: Vec<impl Into<String>>) -> Self {
		self.search_fields = fields.into_iter().map(Into::into).collect();
		self
	}
}

#[async_trait]
impl ModelAdmin for ModelAdminConfig {
	fn model(&self) -> &ModelMeta {
		&self.model
	}

	fn admin_name(&self) -> &str {
		&self.admin_name
	}

	fn table_name(&self) -> &str {
		self.table_name
			.as_deref()
			.unwrap_or(self.model.model_name())
	}

	fn list_display(&self) -> Vec<&str> {
		self.list_display.iter().map(|s| s.as_str()).collect()
	}

	fn search_fields(&self) -> Vec<&str> {
		self.search_fields.iter().map(|s| s.as_str()).collect()
	}

	fn ordering(&self) -> Vec<&str> {
		self.ordering.iter().map(|s| s.as_str()).collect()
	}

	fn list_per_page(&self) -> usize {
		self.list_per_page
	}
}

/// Builder for ModelAdminConfig
#[derive(Debug)]
pub struct ModelAdminConfigBuilder {
	model: ModelMeta,
	admin_name: Option<String>,
	table_name: Option<String>,
	list_display: Option<Vec<String>>,
	search_fields: Option<Vec<String>>,
	ordering: Option<Vec<String>>,
	list_per_page: Option<usize>,
}

impl ModelAdminConfigBuilder {
	/// Set the name used in composed option names
	///
	/// If not set, defaults to "ModelAdminConfig".
	pub fn admin_name(mut self, name: impl Into<String>) -> Self {
		self.admin_name = Some(name.into());
		self
	}

	/// Set the database table name
	///
	/// If not set, defaults to the model name.
	pub fn table_name(mut self, name: impl Into<String>) -> Self {
		self.table_name = Some(name.into());
		self
	}

	/// Set list display fields
	pub fn list_display(mut self, fields: Vec<impl Into<String>>) -> Self {
		self.list_display = Some(fields.into_iter().map(Into::into).collect());
		self
	}

	/// Set search fields
	pub fn search_fields(mut self, fields: Vec<impl Into<String>>) -> Self {
		self.search_fields = Some(fields.into_iter().map(Into::into).collect());
		self
	}

	/// Set ordering
	pub fn ordering(mut self, fields: Vec<impl Into<String>>) -> Self {
		self.ordering = Some(fields.into_iter().map(Into::into).collect());
		self
	}

	/// Set items per page
	pub fn list_per_page(mut self, count: usize) -> Self {
		self.list_per_page = Some(count);
		self
	}

	/// Build the configuration
	pub fn build(self) -> ModelAdminConfig {
		ModelAdminConfig {
			model: self.model,
			admin_name: self
				.admin_name
				.unwrap_or_else(|| "ModelAdminConfig".into()),
			table_name: self.table_name,
			list_display: self.list_display.unwrap_or_else(|| vec!["id".into()]),
			search_fields: self.search_fields.unwrap_or_default(),
			ordering: self.ordering.unwrap_or_else(|| vec!["-id".into()]),
			list_per_page: self.list_per_page.unwrap_or(100).max(1),
		}
	}
}
