//! Search registry
//!
//! Maps each searchable model to the option fragments registered for it and
//! memoizes the composed [`SearchOption`] per model. Registration order is
//! significant: it decides choice indices and fragment precedence.

use super::admin::ModelAdmin;
use super::model::ModelMeta;
use super::options::{SearchOption, SearchOptionFragment};
use crate::types::{GsearchError, GsearchResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

type Fragments = Vec<Arc<dyn SearchOptionFragment>>;

/// Registry of searchable models
///
/// Owned by the application's startup code and shared with the views
/// through an `Arc`. Entries are never removed.
///
/// # Examples
///
/// ```
/// use reinhardt_gsearch::{ModelMeta, OptionFragment, SearchRegistry};
/// use std::sync::Arc;
///
/// let registry = SearchRegistry::new();
/// registry.register(ModelMeta::new("blog", "post"), None);
/// registry.register(
///     ModelMeta::new("blog", "author"),
///     Some(Arc::new(OptionFragment::builder("AuthorSearch").build())),
/// );
///
/// assert_eq!(registry.len(), 2);
/// assert_eq!(
///     registry.choices(),
///     vec![(0, "blog.post".to_string()), (1, "blog.author".to_string())]
/// );
/// ```
#[derive(Default)]
pub struct SearchRegistry {
	entries: RwLock<Vec<(ModelMeta, Fragments)>>,
	cache: RwLock<HashMap<ModelMeta, Arc<SearchOption>>>,
}

impl SearchRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Ensure `model` has an entry and append `fragment` when given
	///
	/// Registering a model twice keeps its position; repeated fragments are
	/// appended again, without deduplication.
	pub fn register(&self, model: ModelMeta, fragment: Option<Arc<dyn SearchOptionFragment>>) {
		let mut entries = self.entries.write();
		let position = match entries.iter().position(|(m, _)| *m == model) {
			Some(position) => position,
			None => {
				tracing::debug!(model = %model, "registering searchable model");
				entries.push((model, Vec::new()));
				entries.len() - 1
			}
		};
		if let Some(fragment) = fragment {
			entries[position].1.push(fragment);
		}
	}

	/// Registered models in insertion order
	///
	/// Each call snapshots the current state, so models registered after a
	/// previous iteration show up in the next one.
	pub fn models(&self) -> impl Iterator<Item = ModelMeta> + use<> {
		let snapshot: Vec<ModelMeta> = self
			.entries
			.read()
			.iter()
			.map(|(model, _)| model.clone())
			.collect();
		snapshot.into_iter()
	}

	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}

	pub fn contains(&self, model: &ModelMeta) -> bool {
		self.entries.read().iter().any(|(m, _)| m == model)
	}

	/// `(index, "<app_label>.<model_name>")` pairs in registration order
	///
	/// Indices are positional and recomputed on every call.
	pub fn choices(&self) -> Vec<(usize, String)> {
		self.models()
			.enumerate()
			.map(|(idx, model)| (idx, Self::namespaced_name(&model)))
			.collect()
	}

	/// Inverse of [`choices`](Self::choices): namespaced name to index
	pub fn choice_ids(&self) -> HashMap<String, usize> {
		self.choices()
			.into_iter()
			.map(|(idx, name)| (name, idx))
			.collect()
	}

	/// Number of fragments registered for `model`
	pub fn fragment_count(&self, model: &ModelMeta) -> Option<usize> {
		self.entries
			.read()
			.iter()
			.find(|(m, _)| m == model)
			.map(|(_, fragments)| fragments.len())
	}

	/// Composed option for `model`, built on first use and cached afterwards
	///
	/// The cached value is returned as-is on later calls, whatever `list_view_base`
	/// is passed then.
	///
	/// # Errors
	///
	/// Returns `GsearchError::NotRegistered` if `model` was never registered.
	pub fn get_option(
		&self,
		model: &ModelMeta,
		list_view_base: Arc<dyn ModelAdmin>,
	) -> GsearchResult<Arc<SearchOption>> {
		if let Some(option) = self.cache.read().get(model) {
			return Ok(Arc::clone(option));
		}

		let fragments = self
			.entries
			.read()
			.iter()
			.find(|(m, _)| m == model)
			.map(|(_, fragments)| fragments.clone())
			.ok_or_else(|| GsearchError::NotRegistered(Self::namespaced_name(model)))?;

		let mut cache = self.cache.write();
		// Another request may have composed it while the lock was released
		let option = cache
			.entry(model.clone())
			.or_insert_with(|| {
				let option = SearchOption::compose(model, &fragments, list_view_base);
				tracing::debug!(model = %model, option = option.name(), "composed search option");
				Arc::new(option)
			})
			.clone();
		Ok(option)
	}

	/// `"<app_label>.<model_name>"` for `model`
	pub fn namespaced_name(model: &ModelMeta) -> String {
		model.namespaced_name()
	}
}

impl std::fmt::Debug for SearchRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SearchRegistry")
			.field("models", &self.choices())
			.field("cached", &self.cache.read().len())
			.finish()
	}
}
