/// Environment variable pointing at an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "BUNNYCDN_PROVIDER_CONFIG";

/// Directory under the user's config dir holding `config.toml`.
pub const CONFIG_DIR_NAME: &str = "terraform-provider-bunnycdn";

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Prefix for environment overrides, e.g. `BUNNYCDN_API__API_KEY`.
pub const ENV_PREFIX: &str = "BUNNYCDN";

pub const ENV_SEPARATOR: &str = "__";

pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Example configuration
pub const EXAMPLE_CONFIG: &str = r#"
# Logging configuration
[log]
# Level can be "error", "warn", "info", "debug", or "trace"
level = "info"

# BunnyCDN API access
[api]
base_url = "https://api.bunny.net"
# Used when the provider block does not set api_key
# api_key = "your_api_key"
"#;
