//! Centralized configuration (environment variables + defaults).

/// Default on-disk database, created on first use.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://pet_shelter.db?mode=rwc";

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

pub const DEFAULT_LOG_FILTER: &str = "pet_shelter=info,api_server=info";

/// Loads `.env` (if present) into the process environment.
pub fn load_env() {
    dotenv::dotenv().ok();
}

/// Database URL (`DATABASE_URL`), defaults to a local SQLite file.
pub fn database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Listen address for the HTTP API (`BIND_ADDR`).
pub fn bind_addr() -> String {
    std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
}

/// Whether startup wipes and recreates the schema (`CLEAR_DB`, default `true`).
///
/// Set `CLEAR_DB=false` to keep existing data between launches.
pub fn clear_db() -> bool {
    parse_flag(std::env::var("CLEAR_DB").ok().as_deref(), true)
}

/// Tracing filter directives (`RUST_LOG`), defaults to info for this crate
/// and the API binary.
pub fn log_filter() -> String {
    filter_or_default(std::env::var("RUST_LOG").ok())
}

fn filter_or_default(raw: Option<String>) -> String {
    raw.filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

fn parse_flag(raw: Option<&str>, default: bool) -> bool {
    match raw.map(|v| v.trim().to_lowercase()) {
        Some(v) if v == "true" || v == "1" || v == "yes" => true,
        Some(v) if v == "false" || v == "0" || v == "no" => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::{filter_or_default, parse_flag, DEFAULT_LOG_FILTER};

    #[test]
    fn flag_parsing_falls_back_to_default() {
        assert!(parse_flag(None, true));
        assert!(!parse_flag(Some("false"), true));
        assert!(parse_flag(Some(" TRUE "), false));
        assert!(!parse_flag(Some("maybe"), false));
    }

    #[test]
    fn blank_log_filter_uses_the_default() {
        assert_eq!(filter_or_default(None), DEFAULT_LOG_FILTER);
        assert_eq!(filter_or_default(Some("  ".into())), DEFAULT_LOG_FILTER);
        assert_eq!(filter_or_default(Some("debug".into())), "debug");
    }
}
