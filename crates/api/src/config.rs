use std::fmt;

use wardwatch_core::thresholds::{Band, ThresholdTable};

use crate::auth::jwt::JwtConfig;

/// Default minimum password length for resets.
const DEFAULT_MIN_PASSWORD_LENGTH: usize = 8;

/// Server configuration loaded from environment variables.
///
/// Every field except the JWT secret has a default suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Minimum accepted password length on reset (default: `8`).
    pub min_password_length: usize,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Normal bands used to decide whether a reading escalates a patient.
    pub thresholds: ThresholdTable,
    /// Staff account created at startup when no user with that name exists.
    pub admin: Option<AdminAccount>,
}

/// Initial staff account, read from `ADMIN_USERNAME` / `ADMIN_EMAIL` /
/// `ADMIN_PASSWORD`.
#[derive(Clone)]
pub struct AdminAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for AdminAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminAccount")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                 |
    /// |-------------------------------|-------------------------|
    /// | `HOST`                        | `0.0.0.0`               |
    /// | `PORT`                        | `3000`                  |
    /// | `CORS_ORIGINS`                | `http://localhost:8081` |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                    |
    /// | `MIN_PASSWORD_LENGTH`         | `8`                     |
    /// | `THRESHOLD_SYSTOLIC`          | `90..180`               |
    /// | `THRESHOLD_DIASTOLIC`         | `60..120`               |
    /// | `THRESHOLD_RESPIRATORY_RATE`  | `12..20`                |
    /// | `THRESHOLD_HEARTBEAT_RATE`    | `60..100`               |
    /// | `THRESHOLD_BLOOD_OXYGEN`      | `90..`                  |
    /// | `ADMIN_USERNAME`              | unset (no bootstrap)    |
    /// | `ADMIN_EMAIL`                 | unset (no bootstrap)    |
    /// | `ADMIN_PASSWORD`              | unset (no bootstrap)    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:8081".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let min_password_length: usize = std::env::var("MIN_PASSWORD_LENGTH")
            .unwrap_or_else(|_| DEFAULT_MIN_PASSWORD_LENGTH.to_string())
            .parse()
            .expect("MIN_PASSWORD_LENGTH must be a valid usize");

        let jwt = JwtConfig::from_env();
        let thresholds = thresholds_from_env();
        let admin = admin_account(
            std::env::var("ADMIN_USERNAME").ok(),
            std::env::var("ADMIN_EMAIL").ok(),
            std::env::var("ADMIN_PASSWORD").ok(),
        );

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            min_password_length,
            jwt,
            thresholds,
            admin,
        }
    }
}

/// Combine the `ADMIN_*` variables. All three must be set, or none.
///
/// # Panics
///
/// Panics if only some of the variables are set.
fn admin_account(
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Option<AdminAccount> {
    match (username, email, password) {
        (None, None, None) => None,
        (Some(username), Some(email), Some(password)) => Some(AdminAccount {
            username,
            email,
            password,
        }),
        _ => panic!("ADMIN_USERNAME, ADMIN_EMAIL and ADMIN_PASSWORD must be set together"),
    }
}

/// Build the threshold table, overriding defaults with any `THRESHOLD_*` vars.
///
/// # Panics
///
/// Panics if a variable is set but does not parse as a `low..high` band.
fn thresholds_from_env() -> ThresholdTable {
    let defaults = ThresholdTable::default();
    ThresholdTable {
        systolic: band_from_env("THRESHOLD_SYSTOLIC", defaults.systolic),
        diastolic: band_from_env("THRESHOLD_DIASTOLIC", defaults.diastolic),
        respiratory_rate: band_from_env("THRESHOLD_RESPIRATORY_RATE", defaults.respiratory_rate),
        heart_beat_rate: band_from_env("THRESHOLD_HEARTBEAT_RATE", defaults.heart_beat_rate),
        blood_oxygen_level: band_from_env("THRESHOLD_BLOOD_OXYGEN", defaults.blood_oxygen_level),
    }
}

fn band_from_env(var: &str, default: Band) -> Band {
    match std::env::var(var) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{var} is not a valid band: {e}")),
        Err(_) => default,
    }
}
