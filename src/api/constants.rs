/// Default base URL of the BunnyCDN API.
pub const BUNNYCDN_API_BASE: &str = "https://api.bunny.net";

/// Header carrying the account API key (`AccessKey`). Header names are
/// case-insensitive and `HeaderName::from_static` only accepts lowercase.
pub const ACCESS_KEY_HEADER: &str = "accesskey";
