use super::Config;

pub const LRCLIB_BASE_URL: &str = "https://lrclib.net/api";
pub const USER_AGENT: &str = "luma-lyrics/0.1.0 (https://github.com/luma)";

/// Config written on first run.
pub fn defaults() -> Config {
    Config::default()
}
