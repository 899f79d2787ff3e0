//! BunnyCDN REST API client.
//!
//! Every call is a single authenticated round trip with no retry. A
//! non-success status becomes a [`BunnyCdnError::Status`] carrying a fixed
//! message; transport failures are surfaced verbatim.

pub mod constants;
pub mod errors;
pub mod hostname;
pub mod impls;
pub mod pullzone;
pub mod types;

pub use errors::{BunnyCdnError, StatusError, StatusSubject};
pub use types::{BunnyCdn, Hostname, OriginType, Pullzone, PullzoneHostname};
