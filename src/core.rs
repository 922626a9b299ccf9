//! Registry, option composition and the admin contracts the views run on
//!
//! - **model**: `ModelMeta`, the searchable entity type
//! - **admin**: `ModelAdmin` trait and `ModelAdminConfig`
//! - **options**: option fragments and the composed `SearchOption`
//! - **registry**: `SearchRegistry`
//! - **query**: `QuerySource` and the query string builder
//! - **list_view**: the per-model `ListView`
//! - **site**: `AdminSite`

pub mod admin;
pub mod list_view;
pub mod model;
pub mod options;
pub mod query;
pub mod registry;
pub mod site;

pub use admin::{ModelAdmin, ModelAdminConfig, ModelAdminConfigBuilder};
pub use list_view::{ListResponse, ListView, ViewOptions};
pub use model::ModelMeta;
pub use options::{OptionFragment, OptionFragmentBuilder, SearchOption, SearchOptionFragment, SearchOptsBase};
pub use query::{InMemorySource, QuerySource, query_string};
pub use registry::SearchRegistry;
pub use site::AdminSite;
