use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MOBILE_UA_PATTERN: &str = "Android|iPhone|iPad";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Case-insensitive regex; matching user agents get the open-in-tab delivery.
    pub mobile_ua_pattern: String,
    /// Per-file limit for uploaded template and spreadsheet.
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            mobile_ua_pattern: DEFAULT_MOBILE_UA_PATTERN.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl AppConfig {
    /// Reads `PORT`, `MOBILE_UA_PATTERN` and `MAX_UPLOAD_BYTES`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            port: parse_or(&lookup, "PORT", defaults.port),
            mobile_ua_pattern: lookup("MOBILE_UA_PATTERN")
                .filter(|p| !p.trim().is_empty())
                .unwrap_or(defaults.mobile_ua_pattern),
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
        }
    }
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}, using {}", key, raw, default);
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.mobile_ua_pattern, "Android|iPhone|iPad");
        assert_eq!(cfg.max_upload_bytes, 20 * 1024 * 1024);
    }

    #[test]
    fn reads_overrides_and_ignores_garbage() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("PORT", "9000"),
            ("MOBILE_UA_PATTERN", "Mobile"),
            ("MAX_UPLOAD_BYTES", "lots"),
        ]));
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.mobile_ua_pattern, "Mobile");
        assert_eq!(cfg.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }
}
