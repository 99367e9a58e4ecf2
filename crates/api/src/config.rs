use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the secrets have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Payment-processor settings.
    pub billing: BillingSettings,
}

/// Payment-processor configuration.
#[derive(Debug, Clone)]
pub struct BillingSettings {
    /// Processor API secret key.
    pub stripe_secret_key: String,
    /// Webhook signing secret. `None` disables signature verification,
    /// which is acceptable ONLY for local development; startup logs a loud
    /// warning when it is missing.
    pub webhook_secret: Option<String>,
    /// Front-end base URL used to build default success/cancel redirects.
    pub frontend_base_url: String,
    /// Club name shown on the hosted checkout page.
    pub club_name: String,
    /// Flat monthly membership price in the smallest currency unit.
    pub membership_price_cents: i64,
    /// ISO currency code, lowercase.
    pub membership_currency: String,
    /// When `true` (the default), settlement deduplicates replayed webhook
    /// events and materializes at most one player per registration. When
    /// `false`, replays re-run the full activation path and duplicate the
    /// roster record, reproducing the legacy behavior.
    pub settlement_dedupe: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Required | Default                 |
    /// |--------------------------|----------|-------------------------|
    /// | `HOST`                   | no       | `0.0.0.0`               |
    /// | `PORT`                   | no       | `3000`                  |
    /// | `CORS_ORIGINS`           | no       | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`   | no       | `30`                    |
    /// | `JWT_SECRET`             | **yes**  | --                      |
    /// | `STRIPE_SECRET_KEY`      | **yes**  | --                      |
    /// | `STRIPE_WEBHOOK_SECRET`  | no       | unset (verification off)|
    /// | `FRONTEND_BASE_URL`      | no       | `http://localhost:5173` |
    /// | `CLUB_NAME`              | no       | `Harborview FC`         |
    /// | `MEMBERSHIP_PRICE_CENTS` | no       | `5000`                  |
    /// | `MEMBERSHIP_CURRENCY`    | no       | `usd`                   |
    /// | `SETTLEMENT_DEDUPE`      | no       | `true`                  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            billing: BillingSettings::from_env(),
        }
    }
}

impl BillingSettings {
    pub fn from_env() -> Self {
        let stripe_secret_key = std::env::var("STRIPE_SECRET_KEY")
            .expect("STRIPE_SECRET_KEY must be set in the environment");

        let webhook_secret = std::env::var("STRIPE_WEBHOOK_SECRET")
            .ok()
            .filter(|s| !s.is_empty());

        let frontend_base_url = std::env::var("FRONTEND_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5173".into());

        let club_name = std::env::var("CLUB_NAME").unwrap_or_else(|_| "Harborview FC".into());

        let membership_price_cents: i64 = std::env::var("MEMBERSHIP_PRICE_CENTS")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("MEMBERSHIP_PRICE_CENTS must be a valid i64");

        let membership_currency = std::env::var("MEMBERSHIP_CURRENCY")
            .unwrap_or_else(|_| "usd".into())
            .to_lowercase();

        let settlement_dedupe: bool = std::env::var("SETTLEMENT_DEDUPE")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("SETTLEMENT_DEDUPE must be true or false");

        Self {
            stripe_secret_key,
            webhook_secret,
            frontend_base_url,
            club_name,
            membership_price_cents,
            membership_currency,
            settlement_dedupe,
        }
    }

    /// Default URL the browser lands on after a successful checkout.
    pub fn default_success_url(&self) -> String {
        format!("{}/dashboard?success=true", self.frontend_base_url)
    }

    /// URL the browser lands on when the checkout is cancelled.
    pub fn cancel_url(&self) -> String {
        format!("{}/register?canceled=true", self.frontend_base_url)
    }
}
