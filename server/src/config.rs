use anyhow::{Context, Result, anyhow};
use platform_authn::AuthConfig;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub auth: AuthConfig,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// A missing or short `JWT_SECRET` is fatal at startup: the gateway must
    /// never fall back to verifying tokens against a guessable default.
    pub fn load() -> Result<Self> {
        let jwt_secret = std::env::var("JWT_SECRET").context("JWT_SECRET missing")?;
        if jwt_secret.len() < 32 {
            return Err(anyhow!("JWT_SECRET must be at least 32 bytes"));
        }

        let token_ttl_minutes = match std::env::var("TOKEN_TTL_MINUTES") {
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .context("invalid TOKEN_TTL_MINUTES")?,
            Err(_) => 60,
        };
        if token_ttl_minutes <= 0 {
            return Err(anyhow!("TOKEN_TTL_MINUTES must be positive"));
        }

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .filter_map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect::<Vec<_>>();

        Ok(Self {
            auth: AuthConfig {
                jwt_secret,
                token_ttl_minutes,
            },
            cors_allowed_origins,
        })
    }
}
