//! Discord adapter constants.

/// Discord REST API base URL.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Maximum message size accepted by Discord `Create Message`.
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Header carrying the ingress shared secret.
pub const INGRESS_SECRET_HEADER: &str = "x-warden-ingress-token";

/// Route used when the configured ingress path is blank.
pub const DEFAULT_INGRESS_PATH: &str = "/discord/ingress";

/// Characters of an error response body kept in error messages.
pub const ERROR_BODY_PREVIEW_CHARS: usize = 256;

/// Posted to callers outside the moderator allow-list.
pub const PERMISSION_DENIED_MESSAGE: &str = "You don't have permission to use this command!";
