//! Terraform provider for BunnyCDN pull zones and their hostnames.
//!
//! - [`api`]: typed client for the BunnyCDN REST API
//! - [`resources`]: reconcilers mapping desired state onto API calls
//! - [`provider`]: the provider block and resource registry
//! - [`server`]: the stdio host adapter

pub mod api;
pub mod functions;
pub mod provider;
pub mod resources;
pub mod server;
pub mod settings;
