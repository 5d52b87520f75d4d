use std::env;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const PORT: &str = "PORT";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    pub const JWT_SECRET: &str = "JWT_SECRET";
    /// Comma-separated list of allowed CORS origins.
    pub const CORS_ORIGIN: &str = "CORS_ORIGIN";
    pub const SUMMARIZATION_MODEL: &str = "HUGGINGFACE_SUMMARIZATION_MODEL";
    pub const SUMMARIZATION_API_KEY: &str = "HUGGINGFACE_API_KEY";
    /// Set to "1" or "true" to disable static frontend serving (separate dev server).
    pub const DISABLE_FRONTEND: &str = "DISABLE_FRONTEND";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 5000;
    pub const DATABASE_URL: &str = "./.db/mnemo.db";
    pub const JWT_SECRET: &str = "dev";
    pub const SUMMARIZATION_MODEL: &str = "facebook/bart-large-cnn";
    pub const CORS_ORIGINS: &[&str] = &["http://localhost:5173", "http://localhost:5175"];
}

/// HTTP listen port
pub fn port() -> u16 {
    env::var(env_vars::PORT)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults::PORT)
}

/// Path to the SQLite database file
pub fn database_url() -> String {
    env::var(env_vars::DATABASE_URL).unwrap_or_else(|_| defaults::DATABASE_URL.to_string())
}

/// Secret used to sign session tokens.
pub fn jwt_secret() -> String {
    match env::var(env_vars::JWT_SECRET) {
        Ok(secret) if !secret.is_empty() => secret,
        _ => {
            log::warn!(
                "{} not set - using the development signing secret",
                env_vars::JWT_SECRET
            );
            defaults::JWT_SECRET.to_string()
        }
    }
}

/// Explicitly allowed CORS origins. Any `http://localhost:<port>` origin is
/// additionally allowed at the CORS layer regardless of this list.
pub fn allowed_origins() -> Vec<String> {
    let from_env: Vec<String> = env::var(env_vars::CORS_ORIGIN)
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if from_env.is_empty() {
        defaults::CORS_ORIGINS.iter().map(|s| s.to_string()).collect()
    } else {
        from_env
    }
}

/// Hosted summarization model name
pub fn summarization_model() -> String {
    env::var(env_vars::SUMMARIZATION_MODEL)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| defaults::SUMMARIZATION_MODEL.to_string())
}

/// API key for the summarization endpoint (the call is attempted without one)
pub fn summarization_api_key() -> Option<String> {
    env::var(env_vars::SUMMARIZATION_API_KEY)
        .ok()
        .filter(|v| !v.is_empty())
}

/// Directory to serve the frontend bundle from, if serving is enabled and a
/// built bundle exists in one of the expected locations.
pub fn frontend_dist() -> Option<String> {
    let disabled = env::var(env_vars::DISABLE_FRONTEND)
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false);
    if disabled {
        log::info!("Frontend serving disabled via {} env var", env_vars::DISABLE_FRONTEND);
        return None;
    }

    for candidate in ["./mnemo-frontend/dist", "../mnemo-frontend/dist"] {
        if std::path::Path::new(candidate).exists() {
            return Some(candidate.to_string());
        }
    }

    log::warn!(
        "Frontend dist not found in ./mnemo-frontend/dist or ../mnemo-frontend/dist - static file serving disabled"
    );
    None
}
