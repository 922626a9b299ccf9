//! Search option fragments and their composition
//!
//! A composed [`SearchOption`] merges, in precedence order:
//!
//! 1. the fragments registered for the model, in registration order
//! 2. [`SearchOptsBase`], the search defaults (`model_filter_active = true`)
//! 3. the model's [`ModelAdmin`], the list-view base
//!
//! For every setting the first layer that supplies a value wins, so a
//! fragment always overrides both bases.

use super::admin::ModelAdmin;
use super::model::ModelMeta;
use crate::types::AdminUser;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A partial search configuration contributed for one model
///
/// Every setting defaults to `None`, meaning "defer to the next layer".
pub trait SearchOptionFragment: Send + Sync {
	/// Name used when deriving the composed option name
	fn name(&self) -> &str;

	/// Whether the model is selected by default on a plain page load
	fn model_filter_active(&self) -> Option<bool> {
		None
	}

	fn verbose_name(&self) -> Option<String> {
		None
	}

	fn search_fields(&self) -> Option<Vec<String>> {
		None
	}

	fn list_display(&self) -> Option<Vec<String>> {
		None
	}

	fn ordering(&self) -> Option<Vec<String>> {
		None
	}

	fn list_per_page(&self) -> Option<usize> {
		None
	}
}

/// Search defaults shared by every composed option
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptsBase;

impl SearchOptsBase {
	pub const NAME: &'static str = "SearchOptsView";
	pub const MODEL_FILTER_ACTIVE: bool = true;
}

impl SearchOptionFragment for SearchOptsBase {
	fn name(&self) -> &str {
		Self::NAME
	}

	fn model_filter_active(&self) -> Option<bool> {
		Some(Self::MODEL_FILTER_ACTIVE)
	}
}

/// Configuration-based option fragment
///
/// # Examples
///
/// ```
/// use reinhardt_gsearch::{OptionFragment, SearchOptionFragment};
///
/// let fragment = OptionFragment::builder("PostSearch")
///     .model_filter_active(false)
///     .search_fields(vec!["title", "body"])
///     .build();
///
/// assert_eq!(fragment.name(), "PostSearch");
/// assert_eq!(fragment.model_filter_active(), Some(false));
/// assert_eq!(fragment.ordering(), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OptionFragment {
	name: String,
	model_filter_active: Option<bool>,
	verbose_name: Option<String>,
	search_fields: Option<Vec<String>>,
	list_display: Option<Vec<String>>,
	ordering: Option<Vec<String>>,
	list_per_page: Option<usize>,
}

impl OptionFragment {
	pub fn builder(name: impl Into<String>) -> OptionFragmentBuilder {
		OptionFragmentBuilder {
			fragment: OptionFragment {
				name: name.into(),
				..Default::default()
			},
		}
	}
}

impl SearchOptionFragment for OptionFragment {
	fn name(&self) -> &str {
		&self.name
	}

	fn model_filter_active(&self) -> Option<bool> {
		self.model_filter_active
	}

	fn verbose_name(&self) -> Option<String> {
		self.verbose_name.clone()
	}

	fn search_fields(&self) -> Option<Vec<String>> {
		self.search_fields.clone()
	}

	fn list_display(&self) -> Option<Vec<String>> {
		self.list_display.clone()
	}

	fn ordering(&self) -> Option<Vec<String>> {
		self.ordering.clone()
	}

	fn list_per_page(&self) -> Option<usize> {
		self.list_per_page
	}
}

/// Builder for OptionFragment
#[derive(Debug)]
pub struct OptionFragmentBuilder {
	fragment: OptionFragment,
}

impl OptionFragmentBuilder {
	pub fn model_filter_active(mut self, active: bool) -> Self {
		self.fragment.model_filter_active = Some(active);
		self
	}

	pub fn verbose_name(mut self, name: impl Into<String>) -> Self {
		self.fragment.verbose_name = Some(name.into());
		self
	}

	pub fn search_fields(mut self, fields: Vec<impl Into<String>>) -> Self {
		self.fragment.search_fields = Some(fields.into_iter().map(Into::into).collect());
		self
	}

	pub fn list_display(mut self, fields: Vec<impl Into<String>>) -> Self {
		self.fragment.list_display = Some(fields.into_iter().map(Into::into).collect());
		self
	}

	pub fn ordering(mut self, fields: Vec<impl Into<String>>) -> Self {
		self.fragment.ordering = Some(fields.into_iter().map(Into::into).collect());
		self
	}

	pub fn list_per_page(mut self, count: usize) -> Self {
		self.fragment.list_per_page = Some(count);
		self
	}

	pub fn build(self) -> OptionFragment {
		self.fragment
	}
}

/// Fully resolved search configuration for one model
#[derive(Clone, Serialize)]
pub struct SearchOption {
	name: String,
	#[serde(serialize_with = "serialize_model")]
	model: ModelMeta,
	model_filter_active: bool,
	verbose_name: String,
	search_fields: Vec<String>,
	list_display: Vec<String>,
	ordering: Vec<String>,
	list_per_page: usize,
	#[serde(skip)]
	admin: Arc<dyn ModelAdmin>,
}

fn serialize_model<S: serde::Serializer>(model: &ModelMeta, s: S) -> Result<S::Ok, S::Error> {
	s.serialize_str(&model.namespaced_name())
}

impl SearchOption {
	/// Merge `fragments`, then [`SearchOptsBase`], then `admin`
	pub fn compose(
		model: &ModelMeta,
		fragments: &[Arc<dyn SearchOptionFragment>],
		admin: Arc<dyn ModelAdmin>,
	) -> Self {
		let base: Arc<dyn SearchOptionFragment> = Arc::new(SearchOptsBase);
		let layers: Vec<&Arc<dyn SearchOptionFragment>> =
			fragments.iter().chain(std::iter::once(&base)).collect();

		fn first<T>(
			layers: &[&Arc<dyn SearchOptionFragment>],
			pick: impl Fn(&dyn SearchOptionFragment) -> Option<T>,
		) -> Option<T> {
			layers.iter().find_map(|layer| pick(&***layer))
		}

		let to_owned =
			|fields: Vec<&str>| -> Vec<String> { fields.into_iter().map(String::from).collect() };

		let mut name: String = layers.iter().map(|layer| layer.name()).collect();
		name.push_str(admin.admin_name());
		name.push_str(model.app_label());
		name.push_str(model.model_name());

		Self {
			name,
			model: model.clone(),
			model_filter_active: first(&layers, |l| l.model_filter_active())
				.unwrap_or(SearchOptsBase::MODEL_FILTER_ACTIVE),
			verbose_name: first(&layers, |l| l.verbose_name())
				.unwrap_or_else(|| model.verbose_name().to_string()),
			search_fields: first(&layers, |l| l.search_fields())
				.unwrap_or_else(|| to_owned(admin.search_fields())),
			list_display: first(&layers, |l| l.list_display())
				.unwrap_or_else(|| to_owned(admin.list_display())),
			ordering: first(&layers, |l| l.ordering())
				.unwrap_or_else(|| to_owned(admin.ordering())),
			list_per_page: first(&layers, |l| l.list_per_page())
				.unwrap_or_else(|| admin.list_per_page())
				.max(1),
			admin,
		}
	}

	/// Debug name: fragment names, base names, app label and model name concatenated
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn model(&self) -> &ModelMeta {
		&self.model
	}

	/// `"<app_label>.<model_name>"`
	pub fn app_model_name(&self) -> String {
		self.model.namespaced_name()
	}

	pub fn model_filter_active(&self) -> bool {
		self.model_filter_active
	}

	pub fn verbose_name(&self) -> &str {
		&self.verbose_name
	}

	pub fn search_fields(&self) -> &[String] {
		&self.search_fields
	}

	pub fn list_display(&self) -> &[String] {
		&self.list_display
	}

	pub fn ordering(&self) -> &[String] {
		&self.ordering
	}

	pub fn list_per_page(&self) -> usize {
		self.list_per_page
	}

	pub fn table_name(&self) -> &str {
		self.admin.table_name()
	}

	pub fn admin(&self) -> &Arc<dyn ModelAdmin> {
		&self.admin
	}

	pub async fn has_view_permission(&self, user: &AdminUser) -> bool {
		self.admin.has_view_permission(user).await
	}
}

impl fmt::Debug for SearchOption {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SearchOption")
			.field("name", &self.name)
			.field("model", &self.model)
			.field("model_filter_active", &self.model_filter_active)
			.field("search_fields", &self.search_fields)
			.finish_non_exhaustive()
	}
}
