//! Searchable entity types

use std::fmt;
use std::hash::{Hash, Hasher};

/// A model known to the admin, identified by `"<app_label>.<model_name>"`
///
/// Equality and hashing only consider the app label and model name; the
/// verbose name is display metadata.
///
/// # Examples
///
/// ```
/// use reinhardt_gsearch::ModelMeta;
///
/// let post = ModelMeta::new("blog", "post").with_verbose_name("blog post");
/// assert_eq!(post.namespaced_name(), "blog.post");
/// assert_eq!(post, ModelMeta::new("blog", "post"));
/// ```
#[derive(Debug, Clone)]
pub struct ModelMeta {
	app_label: String,
	model_name: String,
	verbose_name: Option<String>,
}

impl ModelMeta {
	pub fn new(app_label: impl Into<String>, model_name: impl Into<String>) -> Self {
		Self {
			app_label: app_label.into(),
			model_name: model_name.into(),
			verbose_name: None,
		}
	}

	pub fn with_verbose_name(mut self, verbose_name: impl Into<String>) -> Self {
		self.verbose_name = Some(verbose_name.into());
		self
	}

	pub fn app_label(&self) -> &str {
		&self.app_label
	}

	pub fn model_name(&self) -> &str {
		&self.model_name
	}

	/// Human readable name, defaulting to the model name
	pub fn verbose_name(&self) -> &str {
		self.verbose_name.as_deref().unwrap_or(&self.model_name)
	}

	/// `"<app_label>.<model_name>"`
	pub fn namespaced_name(&self) -> String {
		format!("{}.{}", self.app_label, self.model_name)
	}

	/// Django-style permission codename, e.g. `"blog.view_post"`
	pub fn permission_codename(&self, action: &str) -> String {
		format!("{}.{}_{}", self.app_label, action, self.model_name)
	}
}

impl PartialEq for ModelMeta {
	fn eq(&self, other: &Self) -> bool {
		self.app_label == other.app_label && self.model_name == other.model_name
	}
}

impl Eq for ModelMeta {}

impl Hash for ModelMeta {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.app_label.hash(state);
		self.model_name.hash(state);
	}
}

impl fmt::Display for ModelMeta {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{}", self.app_label, self.model_name)
	}
}
