//! Environment variable names shared by the launcher and the relay.
//!
//! The launcher persists its configuration under these same keys and injects
//! them into the relay process, so both sides must agree on the spelling.

/// esa.io personal access token, sent as a bearer token.
pub const API_KEY: &str = "ESA_API_KEY";

/// esa.io team name (the `{team}` part of `https://{team}.esa.io`).
pub const TEAM_NAME: &str = "ESA_TEAM_NAME";

/// Port the relay listens on.
pub const PORT: &str = "PORT";

/// Overrides the esa.io API base URL (mainly for tests and proxies).
pub const API_BASE_URL: &str = "ESA_API_BASE_URL";

pub const DEFAULT_PORT: u16 = 3000;
