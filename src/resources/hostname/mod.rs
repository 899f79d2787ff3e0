//! `bunnycdn_hostname`: a custom domain bound to a pull zone.
//!
//! The API registers a hostname and configures its SSL in separate calls, so
//! creation is a short sequence. Only the registration is fatal; the SSL
//! steps report warnings and leave the created hostname in state.

pub mod impls;
pub mod models;

// Standard library
use std::sync::Arc;

// 3rd party crates
use serde_json::json;

// Project imports
use crate::api::BunnyCdn;

// Current module imports
use super::schema::{Attribute, AttributeKind, Schema};

pub use models::{HostnameResourceModel, StoredCertificate};

pub const TYPE_NAME: &str = "hostname";

/// Private state key holding the uploaded certificate pair.
pub const CERTIFICATE_KEY: &str = "certificate";

#[derive(Debug, Clone)]
pub struct HostnameResource {
    pub api: Arc<BunnyCdn>,
}

impl HostnameResource {
    pub fn new(api: Arc<BunnyCdn>) -> Self {
        Self { api }
    }
}

pub fn schema() -> Schema {
    Schema::new("Hostname resource")
        .attribute(
            "hostname",
            Attribute::required(AttributeKind::String)
                .requires_replace()
                .description("The name of the hostname."),
        )
        .attribute(
            "pullzone_id",
            Attribute::required(AttributeKind::Int64)
                .requires_replace()
                .description("The ID of the pull zone"),
        )
        .attribute(
            "enable_ssl",
            Attribute::with_default(AttributeKind::Bool, json!(true))
                .description("Sets enable SSL"),
        )
        .attribute(
            "force_ssl",
            Attribute::with_default(AttributeKind::Bool, json!(true))
                .description("Sets force SSL"),
        )
        .attribute(
            "id",
            Attribute::computed(AttributeKind::Int64)
                .use_state_for_unknown()
                .description("The ID of the hostname"),
        )
        .attribute(
            "certificate",
            Attribute::optional(AttributeKind::String)
                .sensitive()
                .description("Hostname custom certificate"),
        )
        .attribute(
            "certificate_key",
            Attribute::optional(AttributeKind::String)
                .sensitive()
                .description("Hostname custom certificate key"),
        )
}
