use std::env;

const CURRENCY_SYMBOL_VAR: &str = "SPLITLEDGER_CURRENCY_SYMBOL";
const STRICT_VAR: &str = "SPLITLEDGER_STRICT";
const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// Interpreter settings, read from the environment and an optional `.env` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub currency_symbol: String,
    /// Exit with an error when the final report has integrity warnings.
    pub strict: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let currency_symbol = lookup(CURRENCY_SYMBOL_VAR)
            .filter(|symbol| !symbol.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY_SYMBOL.to_string());
        let strict = lookup(STRICT_VAR).is_some_and(|value| is_truthy(&value));

        Self {
            currency_symbol,
            strict,
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
