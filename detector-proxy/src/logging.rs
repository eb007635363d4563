//! Tracing setup and log helpers.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Number of leading key characters that may appear in logs.
const VISIBLE_KEY_CHARS: usize = 10;

/// Initialize tracing from `RUST_LOG`, defaulting to `info`.
pub fn init() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Shorten a credential to a prefix safe to print.
pub fn mask_key(key: &str) -> String {
    let prefix: String = key.chars().take(VISIBLE_KEY_CHARS).collect();
    format!("{}...", prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_key_keeps_prefix() {
        assert_eq!(mask_key("abcdefghijklmnop"), "abcdefghij...");
    }

    #[test]
    fn test_mask_key_short() {
        assert_eq!(mask_key("abc"), "abc...");
    }
}
