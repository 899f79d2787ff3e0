//! Host adapter: line-delimited JSON requests on stdin, responses on stdout.

pub mod constants;
pub mod errors;
pub mod functions;
pub mod types;

pub use errors::ServerError;
pub use functions::{handle_request, serve};
pub use types::{Envelope, HostRequest, HostResponse};
