// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across Planforge

// Server
pub const PORT: &str = "PORT";
pub const PLANFORGE_HOST: &str = "PLANFORGE_HOST";
pub const CORS_ORIGIN: &str = "CORS_ORIGIN";

// Database
pub const PLANFORGE_DATABASE_URL: &str = "PLANFORGE_DATABASE_URL";
pub const PLANFORGE_DB_MAX_CONNECTIONS: &str = "PLANFORGE_DB_MAX_CONNECTIONS";

// Completion service (plan generation)
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const OPENAI_MODEL: &str = "OPENAI_MODEL";
pub const OPENAI_MAX_TOKENS: &str = "OPENAI_MAX_TOKENS";

// Research service
pub const PERPLEXITY_API_KEY: &str = "PERPLEXITY_API_KEY";
pub const PERPLEXITY_BASE_URL: &str = "PERPLEXITY_BASE_URL";
pub const PERPLEXITY_MODEL: &str = "PERPLEXITY_MODEL";

// Outbound HTTP and request deadlines
pub const PLANFORGE_HTTP_TIMEOUT_SECS: &str = "PLANFORGE_HTTP_TIMEOUT_SECS";
pub const PLANFORGE_HTTP_CONNECT_TIMEOUT_SECS: &str = "PLANFORGE_HTTP_CONNECT_TIMEOUT_SECS";
pub const PLANFORGE_REQUEST_DEADLINE_SECS: &str = "PLANFORGE_REQUEST_DEADLINE_SECS";

// Sessions
pub const PLANFORGE_DEV_USER: &str = "PLANFORGE_DEV_USER";
pub const PLANFORGE_SESSION_TTL_HOURS: &str = "PLANFORGE_SESSION_TTL_HOURS";
