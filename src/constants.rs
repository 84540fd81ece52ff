use std::time::Duration;

pub const CATALOG_KEY: &str = "portfolio-projects";
pub const ADMIN_FLAG_KEY: &str = "portfolio-admin";
pub const ADMIN_TIMESTAMP_KEY: &str = "portfolio-admin-timestamp";
pub const LANGUAGE_KEY: &str = "portfolio-language";

pub const ADMIN_FLAG_VALUE: &str = "true";

/// Shorter secrets are rejected before any digest is computed.
pub const MIN_SECRET_LENGTH: usize = 4;

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// `createdAt` display format, e.g. `Oct 2025`.
pub const CREATED_AT_FORMAT: &str = "%b %Y";
