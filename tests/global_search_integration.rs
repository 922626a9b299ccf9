//! Global Search Page Integration Tests
//!
//! Drives the search page through the router with an in-memory record
//! source and two searchable models, `blog.post` and `blog.author`.

use hyper::{Method, StatusCode};
use reinhardt_gsearch::{
	AdminSite, AdminUser, GsearchContext, GsearchRouter, InMemorySource, ModelAdminConfig,
	ModelMeta, SearchRegistry, SearchRequest,
};
use rstest::{fixture, rstest};
use serde_json::json;
use std::sync::Arc;

struct Env {
	site: Arc<AdminSite>,
	registry: Arc<SearchRegistry>,
	router: GsearchRouter,
}

#[fixture]
fn env() -> Env {
	let source = InMemorySource::new();
	source.insert("post", json!({"id": 1, "title": "hello world"}));
	source.insert("post", json!({"id": 2, "title": "Hello again"}));
	source.insert("post", json!({"id": 3, "title": "unrelated"}));
	source.insert("author", json!({"id": 1, "name": "Hello Kitty"}));
	source.insert("author", json!({"id": 2, "name": "someone"}));
	source.insert("tag", json!({"id": 1, "label": "hello"}));

	let site = Arc::new(AdminSite::new(Arc::new(source)));
	let registry = Arc::new(SearchRegistry::new());
	for (model, field) in [
		(ModelMeta::new("blog", "post"), "title"),
		(ModelMeta::new("blog", "author"), "name"),
	] {
		site.register(Arc::new(
			ModelAdminConfig::builder(model.clone())
				.search_fields(vec![field])
				.build(),
		));
		registry.register(model, None);
	}

	let router = GsearchRouter::new(Arc::clone(&site), Arc::clone(&registry)).unwrap();
	Env {
		site,
		registry,
		router,
	}
}

fn request(method: Method, uri: &str, form: Option<&str>, user: AdminUser) -> SearchRequest {
	let mut builder = SearchRequest::builder().method(method).uri(uri).user(user);
	if let Some(body) = form {
		builder = builder.form(body);
	}
	builder.build().unwrap()
}

async fn context(env: &Env, uri: &str, user: AdminUser) -> GsearchContext {
	env.router
		.global_view()
		.build_context(&request(Method::GET, uri, None, user))
		.await
		.unwrap()
}

fn summary(context: &GsearchContext) -> Vec<(String, bool, bool)> {
	context
		.views
		.iter()
		.map(|entry| (entry.view.app_model_name(), entry.checked, entry.active))
		.collect()
}

/// Test intent: a plain read with no selection checks every default-active
/// model and sums the counts of all active models
#[rstest]
#[tokio::test]
async fn test_plain_read_selects_all_models(env: Env) {
	// Act
	let context = context(&env, "/admin/gsearch/?_q_=hello", AdminUser::superuser("root")).await;

	// Assert
	assert_eq!(
		summary(&context),
		vec![
			("blog.post".to_string(), true, true),
			("blog.author".to_string(), true, true),
		]
	);
	assert_eq!(context.count, 3);
	assert_eq!(context.search_text, "hello");
	assert_eq!(context.search_param, "_q_");
	assert_eq!(context.title, "Search results");
}

/// Test intent: an explicit selection only checks the submitted indices
#[rstest]
#[tokio::test]
async fn test_explicit_selection(env: Env) {
	// Act
	let context = context(
		&env,
		"/admin/gsearch/?_q_=x&mdl=0&shr=true",
		AdminUser::superuser("root"),
	)
	.await;

	// Assert
	assert_eq!(
		summary(&context),
		vec![
			("blog.post".to_string(), true, true),
			("blog.author".to_string(), false, false),
		]
	);
	assert_eq!(context.count, 0);
}

/// Test intent: non-digit selection tokens are dropped, leaving only index 1
#[rstest]
#[tokio::test]
async fn test_malformed_selection_tokens(env: Env) {
	let context = context(
		&env,
		"/admin/gsearch/?_q_=hello&mdl=abc,1&shr=on",
		AdminUser::superuser("root"),
	)
	.await;

	let checked: Vec<bool> = context.views.iter().map(|entry| entry.checked).collect();
	assert_eq!(checked, vec![false, true]);
	assert_eq!(context.count, 1);
}

/// Test intent: without search text no model is active and the total is zero
#[rstest]
#[case("/admin/gsearch/")]
#[case("/admin/gsearch/?_q_=%20%20")]
#[case("/admin/gsearch/?_q_=&mdl=0&mdl=1&shr=on")]
#[tokio::test]
async fn test_empty_search_text_is_inactive(env: Env, #[case] uri: &str) {
	let context = context(&env, uri, AdminUser::superuser("root")).await;

	assert!(context.views.iter().all(|entry| !entry.active));
	assert_eq!(context.count, 0);
	assert_eq!(context.active_views().count(), 0);
}

/// Test intent: models the user may not view are left out of the page
#[rstest]
#[tokio::test]
async fn test_permission_denied_models_are_omitted(env: Env) {
	// Arrange
	let user = AdminUser::new("editor").with_permission("blog.view_post");

	// Act
	let context = context(&env, "/admin/gsearch/?_q_=hello", user).await;

	// Assert
	assert_eq!(summary(&context), vec![("blog.post".to_string(), true, true)]);
	assert_eq!(context.count, 2);
}

/// Test intent: selection indices that match no model change nothing
#[rstest]
#[tokio::test]
async fn test_unknown_selection_index_is_noop(env: Env) {
	let context = context(
		&env,
		"/admin/gsearch/?_q_=hello&mdl=0&mdl=9&shr=on",
		AdminUser::superuser("root"),
	)
	.await;

	let checked: Vec<bool> = context.views.iter().map(|entry| entry.checked).collect();
	assert_eq!(checked, vec![true, false]);
}

/// Test intent: POST aggregates the same way as GET, reading the form body
#[rstest]
#[tokio::test]
async fn test_post_reads_form_body(env: Env) {
	// Arrange
	let request = request(
		Method::POST,
		"/admin/gsearch/",
		Some("_q_=hello&mdl=1&shr=on"),
		AdminUser::superuser("root"),
	);

	// Act
	let context = env.router.global_view().build_context(&request).await.unwrap();

	// Assert
	assert_eq!(
		summary(&context),
		vec![
			("blog.post".to_string(), false, false),
			("blog.author".to_string(), true, true),
		]
	);
	assert_eq!(context.count, 1);
}

/// Test intent: entry links point at the result list and carry the search
/// text without the selection parameters
#[rstest]
#[tokio::test]
async fn test_entry_urls(env: Env) {
	let context = context(
		&env,
		"/admin/gsearch/?_q_=hello%20world&mdl=1&shr=on",
		AdminUser::superuser("root"),
	)
	.await;

	let urls: Vec<&str> = context.views.iter().map(|entry| entry.url.as_str()).collect();
	assert_eq!(
		urls,
		vec![
			"/admin/blog/post/gsearch_result/?_q_=hello+world",
			"/admin/blog/author/gsearch_result/?_q_=hello+world",
		]
	);
}

/// Test intent: models registered after a request appear on the next one
/// with the next choice index
#[rstest]
#[tokio::test]
async fn test_late_registration_appends_choice(env: Env) {
	// Arrange
	let before = context(&env, "/admin/gsearch/?_q_=hello", AdminUser::superuser("root")).await;
	let tag = ModelMeta::new("blog", "tag");
	env.site.register(Arc::new(
		ModelAdminConfig::builder(tag.clone())
			.search_fields(vec!["label"])
			.build(),
	));
	env.registry.register(tag, None);

	// Act
	let after = context(&env, "/admin/gsearch/?_q_=hello", AdminUser::superuser("root")).await;

	// Assert
	assert_eq!(before.views.len(), 2);
	assert_eq!(after.views.len(), 3);
	assert_eq!(after.views[2].view.model_filter_id(), Some(2));
	assert_eq!(after.count, 4);
}

/// Test intent: the router renders the page for GET and POST only
#[rstest]
#[case(Method::GET, StatusCode::OK)]
#[case(Method::POST, StatusCode::OK)]
#[case(Method::PUT, StatusCode::METHOD_NOT_ALLOWED)]
#[case(Method::DELETE, StatusCode::METHOD_NOT_ALLOWED)]
#[tokio::test]
async fn test_router_page_verbs(env: Env, #[case] method: Method, #[case] expected: StatusCode) {
	let request = request(
		method,
		"/admin/gsearch/?_q_=hello",
		Some("_q_=hello"),
		AdminUser::superuser("root"),
	);

	let response = env.router.handle(request).await;

	assert_eq!(response.status, expected);
}

/// Test intent: the rendered page embeds the blocks, media and breadcrumb
#[rstest]
#[tokio::test]
async fn test_rendered_page(env: Env) {
	// Arrange
	let request = request(
		Method::GET,
		"/admin/gsearch/?_q_=hello",
		None,
		AdminUser::superuser("root"),
	);

	// Act
	let response = env.router.handle(request).await;

	// Assert
	let html = response.text();
	assert_eq!(
		response.headers.get("content-type").unwrap(),
		"text/html; charset=utf-8"
	);
	// attribute values are HTML-escaped, '/' included
	assert!(html.contains("src=\"&#x2F;static&#x2F;gsearch&#x2F;js&#x2F;search.models.js\""));
	assert!(html.contains("class=\"navbar-form gsearch-form\""));
	assert!(html.contains("gsearch-filters"));
	assert!(html.contains("gsearch-select-all"));
	assert!(html.contains("gsearch-toggle"));
	assert!(html.contains("<a href=\"&#x2F;admin&#x2F;\">Home</a>"));
	assert!(html.contains("<small>(3)</small>"));
}

/// Test intent: a searchable model without a model admin fails the whole
/// page with 404 instead of being skipped
#[rstest]
#[tokio::test]
async fn test_model_without_admin_fails_page(env: Env) {
	// Arrange
	env.registry.register(ModelMeta::new("blog", "tag"), None);

	// Act
	let response = env
		.router
		.handle(request(
			Method::GET,
			"/admin/gsearch/?_q_=hello",
			None,
			AdminUser::superuser("root"),
		))
		.await;

	// Assert
	assert_eq!(response.status, StatusCode::NOT_FOUND);
}
