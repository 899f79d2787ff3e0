//! `bunnycdn_pullzone`: a CDN distribution pointing at an origin.

pub mod impls;
pub mod models;

// Standard library
use std::collections::BTreeMap;
use std::sync::Arc;

// 3rd party crates
use serde_json::json;

// Project imports
use crate::api::BunnyCdn;

// Current module imports
use super::schema::{Attribute, AttributeKind, Schema};

pub use models::{PullzoneHostnameModel, PullzoneResourceModel};

pub const TYPE_NAME: &str = "pullzone";

/// Reconciles pull zones against the API.
#[derive(Debug, Clone)]
pub struct PullzoneResource {
    pub api: Arc<BunnyCdn>,
}

impl PullzoneResource {
    pub fn new(api: Arc<BunnyCdn>) -> Self {
        Self { api }
    }
}

pub fn schema() -> Schema {
    let hostname = BTreeMap::from([
        ("id", AttributeKind::Int64),
        ("value", AttributeKind::String),
        ("force_ssl", AttributeKind::Bool),
        ("has_certificate", AttributeKind::Bool),
    ]);

    Schema::new("Pull zone resource")
        .attribute(
            "name",
            Attribute::required(AttributeKind::String).description("The name of the pull zone."),
        )
        .attribute(
            "origin_type",
            Attribute::with_default(AttributeKind::Int64, json!(0)).description(
                "Sets the origin type of the pull zone (0 = OriginUrl, 2 = StorageZone)",
            ),
        )
        .attribute(
            "storage_zone_id",
            Attribute::optional(AttributeKind::Int64)
                .description("The ID of the storage zone that will be used as the origin"),
        )
        .attribute(
            "origin_url",
            Attribute::optional(AttributeKind::String)
                .description("Sets the origin URL of the pull zone"),
        )
        .attribute(
            "origin_host_header",
            Attribute::optional(AttributeKind::String)
                .description("Sets the host header that will be sent to the origin"),
        )
        .attribute(
            "enable_smart_cache",
            Attribute::with_default(AttributeKind::Bool, json!(true))
                .description("Sets the smart cache"),
        )
        .attribute(
            "disable_cookie",
            Attribute::with_default(AttributeKind::Bool, json!(false))
                .description("Sets disable cookie"),
        )
        .attribute(
            "error_page_enable_custom_code",
            Attribute::with_default(AttributeKind::Bool, json!(false))
                .description("Sets enable custom error page"),
        )
        .attribute(
            "error_page_custom_code",
            Attribute::optional(AttributeKind::String)
                .description("Sets template custom error page"),
        )
        .attribute(
            "hostnames",
            Attribute::computed(AttributeKind::ObjectList(hostname))
                .description("Hostnames linked to the pull zone"),
        )
        .attribute(
            "id",
            Attribute::computed(AttributeKind::Int64)
                .use_state_for_unknown()
                .description("The ID of the pull zone"),
        )
}
