use super::constants::DEFAULT_MODEL_URL;
use std::str::FromStr;

/// Runtime settings read from the host page (canvas `data-*` attributes).
#[derive(Clone, Debug, PartialEq)]
pub struct ViewerConfig {
    pub model_url: String,
    pub log_level: log::Level,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            model_url: DEFAULT_MODEL_URL.to_string(),
            log_level: log::Level::Info,
        }
    }
}

impl ViewerConfig {
    /// Missing or blank attributes keep their defaults; an unknown log level
    /// falls back to `info`.
    pub fn from_attributes(model_url: Option<&str>, log_level: Option<&str>) -> Self {
        let mut config = Self::default();
        if let Some(url) = model_url.map(str::trim).filter(|s| !s.is_empty()) {
            config.model_url = url.to_string();
        }
        if let Some(level) = log_level.map(str::trim).filter(|s| !s.is_empty()) {
            config.log_level = log::Level::from_str(level).unwrap_or(log::Level::Info);
        }
        config
    }
}
