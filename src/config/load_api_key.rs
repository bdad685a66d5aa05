use anyhow::{bail, Result};
use std::env;

pub(crate) const API_KEY_ENV_VAR: &str = "COINGECKO_API";

/// Loads the CoinGecko API key from the environment.
///
/// The key is sent as `x-cg-demo-api-key`. There is no interactive fallback:
/// without a key the session cannot fetch anything.
pub(crate) fn load_api_key() -> Result<String> {
    api_key_from(env::var(API_KEY_ENV_VAR).ok())
}

fn api_key_from(value: Option<String>) -> Result<String> {
    match value {
        Some(api_key) if !api_key.trim().is_empty() => Ok(api_key.trim().to_string()),
        _ => bail!(
            "{API_KEY_ENV_VAR} environment variable not set. \
             Please set {API_KEY_ENV_VAR} environment variable with your API key."
        ),
    }
}
