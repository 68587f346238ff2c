//! Centralized constants for endpoints, paths, and exit codes.

/// Google Directions API endpoint.
pub const DEFAULT_DIRECTIONS_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/directions/json";

/// Google Static Maps API endpoint.
pub const DEFAULT_STATIC_MAP_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/staticmap";

/// Travel mode requested from the directions API.
pub const DEFAULT_TRAVEL_MODE: &str = "driving";

/// Unit system for the human-readable distance text.
pub const DEFAULT_UNITS: &str = "metric";

/// Static map size in pixels (before scale).
pub const DEFAULT_MAP_SIZE: &str = "640x400";

/// Static map pixel density multiplier.
pub const DEFAULT_MAP_SCALE: u8 = 2;

/// Static map base layer.
pub const DEFAULT_MAP_TYPE: &str = "roadmap";

/// Currency used for the per-kilometre estimate when none is configured.
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Environment variable pointing at the configuration file.
pub const CONFIG_ENV: &str = "ROUTE_REPORT_CONFIG";

/// Environment variable holding an `EnvFilter` directive for logging.
pub const LOG_ENV: &str = "ROUTE_REPORT_LOG";

/// Directory (under the platform config dir) holding `config.toml`.
pub const CONFIG_DIR_NAME: &str = "route-report";

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Keeper Commander executable.
pub const DEFAULT_KEEPER_PROGRAM: &str = "keeper";

/// Keeper Commander session file, relative to the home directory.
pub const KEEPER_CONFIG_RELATIVE: &str = ".keeper/config.json";

/// macOS keychain CLI.
pub const MACOS_KEYCHAIN_PROGRAM: &str = "security";

/// libsecret CLI used on other unix desktops.
pub const SECRET_TOOL_PROGRAM: &str = "secret-tool";

/// Exit status of `security find-generic-password` when no item matches.
pub const SECURITY_ITEM_NOT_FOUND_STATUS: i32 = 44;

/// Process exit code: argument or configuration failure.
pub const EXIT_ARGUMENT: u8 = 2;

/// Process exit code: credential resolution failure.
pub const EXIT_CREDENTIAL: u8 = 3;

/// Process exit code: route fetch failure.
pub const EXIT_ROUTE: u8 = 4;

/// Process exit code: render failure.
pub const EXIT_RENDER: u8 = 5;

/// Permission mode for the written PDF.
pub const PDF_FILE_MODE: u32 = 0o644;
