use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackStrategy {
    /// Size the back stake with the same fractional-Kelly rule as lays.
    Stake,
    /// Signal the value but recommend exiting instead of staking fresh money.
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelConfig {
    pub extended_stats: bool,
    pub market_feedback: bool,
    pub back_strategy: BackStrategy,
    pub kelly_fraction: f64,
    pub zero_inflation: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            extended_stats: true,
            market_feedback: false,
            back_strategy: BackStrategy::Stake,
            kelly_fraction: 0.05,
            zero_inflation: 0.06,
        }
    }
}

impl ModelConfig {
    /// Model flags with no extension steps enabled.
    pub fn minimal() -> Self {
        Self {
            extended_stats: false,
            market_feedback: false,
            ..Self::default()
        }
    }

    pub fn from_env() -> Self {
        let d = Self::default();
        let back_strategy = match env::var("MODEL_BACK_STRATEGY")
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "exit" => BackStrategy::Exit,
            "stake" => BackStrategy::Stake,
            _ => d.back_strategy,
        };
        Self {
            extended_stats: env_bool("MODEL_EXTENDED_STATS", d.extended_stats),
            market_feedback: env_bool("MODEL_MARKET_FEEDBACK", d.market_feedback),
            back_strategy,
            kelly_fraction: env_f64("MODEL_KELLY_FRACTION", d.kelly_fraction).clamp(0.0, 1.0),
            zero_inflation: env_f64("MODEL_ZERO_INFLATION", d.zero_inflation).clamp(0.0, 0.5),
        }
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => matches!(
            raw.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

fn env_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .unwrap_or(default)
}
