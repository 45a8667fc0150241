//! Default values for flowscope configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// Server Defaults
// ============================================================================

/// Default NiFi server URL.
pub const DEFAULT_SERVER_URL: &str = "https://localhost:8443";

/// Path prefix of the NiFi REST API.
pub const DEFAULT_API_PREFIX: &str = "/nifi-api";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Traversal Defaults
// ============================================================================

/// Deepest snapshot nesting accepted before a response is rejected.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Kinds listed when no filter is given: everything but connections.
pub const DEFAULT_KINDS: &[&str] = &[
    "processgroup",
    "remoteprocessgroup",
    "processor",
    "inputport",
    "outputport",
    "unknown",
];

// ============================================================================
// Config Files
// ============================================================================

/// Project-local config file name.
pub const LOCAL_CONFIG_FILE: &str = "flowscope.toml";

/// Directory under the user config dir.
pub const USER_CONFIG_DIR: &str = "flowscope";

/// File name inside the user config dir.
pub const USER_CONFIG_FILE: &str = "config.toml";
