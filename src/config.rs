// src/config.rs

use std::env;
use std::str::FromStr;

use dotenvy::dotenv;

/// Questions served per day on the free plan.
pub const FREE_QUESTIONS_PER_DAY: i64 = 2;
/// Size of the bank window the free plan cycles through.
pub const FREE_BANK_SIZE: i64 = 100;
/// Questions served per day on the pro plan.
pub const PRO_QUESTIONS_PER_DAY: i64 = 10;
/// Size of the bank window the pro plan cycles through.
pub const PRO_BANK_SIZE: i64 = 1000;

/// Number of daily results returned by the progress endpoint.
pub const HISTORY_LIMIT: i64 = 10;

/// Allocation parameters of a single subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierLimits {
    pub questions_per_day: i64,
    pub bank_size: i64,
    /// When set, the tier may complete at most one daily set per calendar day.
    pub daily_gate: bool,
}

/// Limits for both tiers. Injected through `AppState` so tests can shrink the bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanLimits {
    pub free: TierLimits,
    pub pro: TierLimits,
}

impl Default for PlanLimits {
    fn default() -> Self {
        Self {
            free: TierLimits {
                questions_per_day: FREE_QUESTIONS_PER_DAY,
                bank_size: FREE_BANK_SIZE,
                daily_gate: true,
            },
            pro: TierLimits {
                questions_per_day: PRO_QUESTIONS_PER_DAY,
                bank_size: PRO_BANK_SIZE,
                daily_gate: false,
            },
        }
    }
}

impl PlanLimits {
    /// Reads overrides from the environment, falling back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            free: TierLimits {
                questions_per_day: env_or("FREE_QUESTIONS_PER_DAY", defaults.free.questions_per_day),
                bank_size: env_or("FREE_BANK_SIZE", defaults.free.bank_size),
                daily_gate: defaults.free.daily_gate,
            },
            pro: TierLimits {
                questions_per_day: env_or("PRO_QUESTIONS_PER_DAY", defaults.pro.questions_per_day),
                bank_size: env_or("PRO_BANK_SIZE", defaults.pro.bank_size),
                daily_gate: env_or("PRO_DAILY_GATE", defaults.pro.daily_gate),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub rust_log: String,
    pub bind_addr: String,
    /// Optional JSON file used to seed an empty question bank on startup.
    pub question_seed_path: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let question_seed_path = env::var("QUESTION_SEED_PATH").ok();

        Self {
            database_url,
            jwt_secret,
            rust_log,
            bind_addr,
            question_seed_path,
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring unparsable value for {}: {:?}", key, raw);
            default
        }),
        Err(_) => default,
    }
}
