//! Global search page
//!
//! For every registered model the page lists whether its filter checkbox is
//! checked, whether it is active (permission, checked, search text present)
//! and a link to its own result list. Active models contribute their result
//! counts to the page total.

use super::common::CommSearchView;
use crate::core::{AdminSite, SearchRegistry, ViewOptions};
use crate::forms::{MDL, SHR, SearchForm};
use crate::templates::{
	GsearchTemplates, NAV_BTNS_TEMPLATE, NAV_FORM_TEMPLATE, NAV_MENU_TEMPLATE, NAV_TOGGLES_TEMPLATE,
};
use crate::types::{
	Breadcrumb, GsearchContext, GsearchError, GsearchResult, Media, Response, SearchRequest,
	SearchViewEntry,
};
use crate::urls::{GSEARCH, SEARCH_RESULTLIST};
use hyper::Method;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Per-request state parsed from the request parameters
#[derive(Debug, Clone)]
pub struct SearchState {
	/// Trimmed search text, empty when absent
	pub search_text: String,
	pub form: SearchForm,
}

#[derive(Serialize)]
struct PageContext<'a> {
	gsearch: &'a GsearchContext,
	breadcrumbs: Vec<Breadcrumb>,
	media_js: Vec<String>,
}

/// The cross-model search results page
pub struct GlobalSearchView {
	common: CommSearchView,
	templates: GsearchTemplates,
}

impl GlobalSearchView {
	/// Create the view with the bundled templates
	///
	/// # Errors
	///
	/// Returns `GsearchError::Template` if a bundled template fails to parse.
	pub fn new(site: Arc<AdminSite>, registry: Arc<SearchRegistry>) -> GsearchResult<Self> {
		Ok(Self {
			common: CommSearchView::new(site, registry),
			templates: GsearchTemplates::new()?,
		})
	}

	/// Replace the template set, e.g. with project overrides
	pub fn with_templates(mut self, templates: GsearchTemplates) -> Self {
		self.templates = templates;
		self
	}

	pub fn common(&self) -> &CommSearchView {
		&self.common
	}

	pub fn title(&self) -> &str {
		&self.common.site().settings().title
	}

	fn search_param(&self) -> &str {
		&self.common.site().settings().search_param
	}

	/// Read the search text and bind the search form to the request parameters
	pub fn init_request(&self, request: &SearchRequest) -> SearchState {
		let params = request.request_params();
		let search_text = params
			.get(self.search_param())
			.unwrap_or_default()
			.trim()
			.to_string();
		let form = SearchForm::new(params, &self.common.registry().choices());
		SearchState { search_text, form }
	}

	/// Compute the `gsearch` context entry for `request`
	///
	/// # Errors
	///
	/// Returns `GsearchError::NotRegistered` if a searchable model has no
	/// model admin, which fails the whole page with 404 rather than skipping
	/// that model. Query and URL reversal errors are propagated. Models the
	/// user may not view are skipped.
	pub async fn build_context(&self, request: &SearchRequest) -> GsearchResult<GsearchContext> {
		let state = self.init_request(request);
		let selection = state.form.get_val();
		let plain_read = request.method == Method::GET && !selection.shr;
		let registry = self.common.registry();
		let model_ids = registry.choice_ids();

		let mut views = Vec::new();
		let mut count = 0u64;
		for model in registry.models() {
			let admin = self.common.site().get_registry(&model)?;
			let option = registry.get_option(&model, admin)?;
			let app_model_name = SearchRegistry::namespaced_name(&model);
			let model_filter_id = model_ids.get(&app_model_name).copied();

			let options = ViewOptions {
				model_filter_id,
				search_text: Some(state.search_text.clone()),
			};
			let view = match self.common.get_search_view(option, request, options).await {
				Ok(view) => view,
				Err(GsearchError::PermissionDenied(_)) => {
					tracing::trace!(model = %app_model_name, "no view permission, skipping");
					continue;
				}
				Err(err) => return Err(err),
			};

			let mut checked = view
				.model_filter_id()
				.is_some_and(|id| selection.mdl.contains(&id));
			if plain_read {
				checked &= view.model_filter_active();
			}
			let active = view.has_view_permission() && checked && !state.search_text.is_empty();

			let query_string = view.get_query_string(
				&[(self.search_param(), Some(state.search_text.as_str()))],
				&[MDL, SHR],
			);
			let url = self.common.get_admin_url(
				SEARCH_RESULTLIST,
				&[("app_label", model.app_label()), ("model_name", model.model_name())],
			)? + &query_string;

			if active {
				count += view.get_total().await?;
			}
			tracing::trace!(model = %app_model_name, checked, active, "search view resolved");
			views.push(SearchViewEntry {
				view: Arc::new(view),
				url,
				checked,
				active,
			});
		}

		Ok(GsearchContext {
			url: self.common.get_admin_url(GSEARCH, &[])?,
			title: self.title().to_string(),
			search_param: self.search_param().to_string(),
			search_text: state.search_text,
			count,
			views,
		})
	}

	/// Render the results page
	pub async fn search(&self, request: &SearchRequest) -> GsearchResult<Response> {
		let gsearch = self.build_context(request).await?;
		let html = self.render_page(&gsearch)?;
		Ok(Response::ok().with_html(html))
	}

	pub async fn get(&self, request: &SearchRequest) -> GsearchResult<Response> {
		self.search(request).await
	}

	pub async fn post(&self, request: &SearchRequest) -> GsearchResult<Response> {
		self.search(request).await
	}

	/// Route `request` to the handler of its verb
	///
	/// # Errors
	///
	/// Returns `GsearchError::MethodNotAllowed` for verbs other than GET and POST.
	pub async fn dispatch(&self, request: &SearchRequest) -> GsearchResult<Response> {
		match request.method {
			Method::GET => self.get(request).await,
			Method::POST => self.post(request).await,
			ref other => Err(GsearchError::MethodNotAllowed(other.clone())),
		}
	}

	/// Page media from the configured scripts
	pub fn media(&self) -> Media {
		let mut media = Media::default();
		media.add_js(self.common.site().settings().media_js.iter().cloned());
		media
	}

	/// Site breadcrumb followed by the unlinked page title
	pub fn breadcrumbs(&self) -> GsearchResult<Vec<Breadcrumb>> {
		let mut crumbs = self.common.site().breadcrumbs()?;
		crumbs.push(Breadcrumb {
			url: None,
			title: self.title().to_string(),
		});
		Ok(crumbs)
	}

	pub fn block_nav_form(&self, context: &Value, nodes: &mut Vec<String>) -> GsearchResult<()> {
		nodes.push(self.templates.render(NAV_FORM_TEMPLATE, context)?);
		Ok(())
	}

	pub fn block_nav_menu(&self, context: &Value, nodes: &mut Vec<String>) -> GsearchResult<()> {
		nodes.push(self.templates.render(NAV_MENU_TEMPLATE, context)?);
		Ok(())
	}

	pub fn block_nav_btns(&self, context: &Value, nodes: &mut Vec<String>) -> GsearchResult<()> {
		nodes.push(self.templates.render(NAV_BTNS_TEMPLATE, context)?);
		Ok(())
	}

	pub fn block_nav_toggles(&self, context: &Value, nodes: &mut Vec<String>) -> GsearchResult<()> {
		nodes.push(self.templates.render(NAV_TOGGLES_TEMPLATE, context)?);
		Ok(())
	}

	fn render_page(&self, gsearch: &GsearchContext) -> GsearchResult<String> {
		let settings = self.common.site().settings();
		let page = PageContext {
			gsearch,
			breadcrumbs: self.breadcrumbs()?,
			media_js: self.media().js_urls(&settings.static_url),
		};
		let mut context =
			serde_json::to_value(&page).map_err(|e| GsearchError::Template(e.to_string()))?;

		type Block = fn(&GlobalSearchView, &Value, &mut Vec<String>) -> GsearchResult<()>;
		let blocks: [(&str, Block); 4] = [
			("nav_form", Self::block_nav_form),
			("nav_menu", Self::block_nav_menu),
			("nav_btns", Self::block_nav_btns),
			("nav_toggles", Self::block_nav_toggles),
		];
		let mut rendered = serde_json::Map::new();
		for (name, block) in blocks {
			let mut nodes = Vec::new();
			block(self, &context, &mut nodes)?;
			rendered.insert(name.to_string(), Value::String(nodes.concat()));
		}
		context["blocks"] = Value::Object(rendered);

		self.templates.render(&settings.template_name, &context)
	}
}

impl std::fmt::Debug for GlobalSearchView {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("GlobalSearchView")
			.field("common", &self.common)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::{InMemorySource, ModelAdminConfig, ModelMeta, OptionFragment};
	use crate::types::AdminUser;
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn view() -> GlobalSearchView {
		let source = InMemorySource::new();
		source.insert("post", json!({"id": 1, "title": "hello"}));
		source.insert("author", json!({"id": 1, "name": "hello"}));
		let site = Arc::new(AdminSite::new(Arc::new(source)));
		let registry = Arc::new(SearchRegistry::new());

		let post = ModelMeta::new("blog", "post");
		let author = ModelMeta::new("blog", "author");
		site.register(Arc::new(
			ModelAdminConfig::builder(post.clone())
				.search_fields(vec!["title"])
				.build(),
		));
		site.register(Arc::new(
			ModelAdminConfig::builder(author.clone())
				.search_fields(vec!["name"])
				.build(),
		));
		registry.register(post, None);
		registry.register(
			author,
			Some(Arc::new(
				OptionFragment::builder("AuthorSearch")
					.model_filter_active(false)
					.build(),
			)),
		);
		GlobalSearchView::new(site, registry).unwrap()
	}

	fn get(uri: &str) -> SearchRequest {
		SearchRequest::builder()
			.uri(uri)
			.user(AdminUser::superuser("root"))
			.build()
			.unwrap()
	}

	#[rstest]
	#[tokio::test]
	async fn test_empty_search_fields_warns_without_changing_page() {
		use std::sync::Mutex;
		use tracing_subscriber::layer::SubscriberExt as _;
		use tracing_subscriber::util::SubscriberInitExt as _;

		// Arrange
		struct LogCapture {
			logs: Arc<Mutex<Vec<String>>>,
		}

		impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LogCapture {
			fn on_event(
				&self,
				event: &tracing::Event<'_>,
				_ctx: tracing_subscriber::layer::Context<'_, S>,
			) {
				struct MessageVisitor {
					message: String,
				}

				impl tracing::field::Visit for MessageVisitor {
					fn record_debug(
						&mut self,
						field: &tracing::field::Field,
						value: &dyn std::fmt::Debug,
					) {
						if field.name() == "message" {
							self.message = format!("{:?}", value);
						}
					}
				}

				let mut visitor = MessageVisitor {
					message: String::new(),
				};
				event.record(&mut visitor);
				self.logs.lock().unwrap().push(format!(
					"[{}] {}",
					event.metadata().level(),
					visitor.message
				));
			}
		}

		let logs = Arc::new(Mutex::new(Vec::new()));
		let _guard = tracing_subscriber::registry()
			.with(LogCapture { logs: logs.clone() })
			.set_default();

		let source = InMemorySource::new();
		source.insert("post", json!({"id": 1, "title": "hello"}));
		source.insert("tag", json!({"id": 1, "label": "rust"}));
		let site = Arc::new(AdminSite::new(Arc::new(source)));
		let registry = Arc::new(SearchRegistry::new());
		let post = ModelMeta::new("blog", "post");
		let tag = ModelMeta::new("blog", "tag");
		site.register(Arc::new(
			ModelAdminConfig::builder(post.clone())
				.search_fields(vec!["title"])
				.build(),
		));
		site.register(Arc::new(ModelAdminConfig::builder(tag.clone()).build()));
		registry.register(post, None);
		registry.register(tag, None);
		let view = GlobalSearchView::new(site, registry).unwrap();
		let request = get("/admin/gsearch/?_q_=hello");

		// Act
		let context = view.build_context(&request).await.unwrap();
		let response = view.search(&request).await.unwrap();

		// Assert
		assert_eq!(response.status, hyper::StatusCode::OK);
		let names: Vec<String> = context
			.views
			.iter()
			.map(|entry| entry.view.app_model_name())
			.collect();
		assert_eq!(names, vec!["blog.post", "blog.tag"]);
		assert!(context.views[1].active);
		let captured = logs.lock().unwrap();
		assert!(captured.iter().any(|line| line.starts_with("[WARN]")
			&& line.contains("'search_fields'")
			&& line.contains("blog.tag")));
		assert!(!captured.iter().any(|line| line.starts_with("[WARN]")
			&& line.contains("blog.post")));
	}

	#[rstest]
	fn test_init_request_trims_search_text(view: GlobalSearchView) {
		let state = view.init_request(&get("/admin/gsearch/?_q_=%20hello%20"));

		assert_eq!(state.search_text, "hello");
	}

	#[rstest]
	#[tokio::test]
	async fn test_plain_read_respects_default_active(view: GlobalSearchView) {
		// Act
		let context = view.build_context(&get("/admin/gsearch/?_q_=hello")).await.unwrap();

		// Assert
		let flags: Vec<(bool, bool)> = context.views.iter().map(|e| (e.checked, e.active)).collect();
		assert_eq!(flags, vec![(true, true), (false, false)]);
		assert_eq!(context.count, 1);
	}

	#[rstest]
	#[tokio::test]
	async fn test_explicit_selection_overrides_default_active(view: GlobalSearchView) {
		let context = view
			.build_context(&get("/admin/gsearch/?_q_=hello&mdl=1&shr=on"))
			.await
			.unwrap();

		let flags: Vec<(bool, bool)> = context.views.iter().map(|e| (e.checked, e.active)).collect();
		assert_eq!(flags, vec![(false, false), (true, true)]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_entry_url_drops_selection_params(view: GlobalSearchView) {
		let context = view
			.build_context(&get("/admin/gsearch/?_q_=hello&mdl=0&shr=on&o=title"))
			.await
			.unwrap();

		assert_eq!(
			context.views[0].url,
			"/admin/blog/post/gsearch_result/?_q_=hello&o=title"
		);
		assert_eq!(context.url, "/admin/gsearch/");
	}

	#[rstest]
	fn test_breadcrumbs_end_with_title(view: GlobalSearchView) {
		let crumbs = view.breadcrumbs().unwrap();

		assert_eq!(
			crumbs.last(),
			Some(&Breadcrumb {
				url: None,
				title: "Search results".to_string()
			})
		);
	}

	#[rstest]
	fn test_media_includes_model_script(view: GlobalSearchView) {
		assert_eq!(
			view.media().js_urls("/static/"),
			vec!["/static/gsearch/js/search.models.js"]
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_search_renders_page(view: GlobalSearchView) {
		// Act
		let response = view.search(&get("/admin/gsearch/?_q_=hello")).await.unwrap();

		// Assert
		let html = response.text();
		assert!(html.contains("search.models.js"));
		assert!(html.contains("gsearch-form"));
		assert!(html.contains("data-model=\"blog.post\""));
		assert!(!html.contains("data-model=\"blog.author\""));
	}

	#[rstest]
	#[tokio::test]
	async fn test_dispatch_rejects_put(view: GlobalSearchView) {
		let request = SearchRequest::builder()
			.method(Method::PUT)
			.uri("/admin/gsearch/")
			.build()
			.unwrap();

		let result = view.dispatch(&request).await;

		assert!(matches!(result, Err(GsearchError::MethodNotAllowed(Method::PUT))));
	}
}
