#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Where the remote processor listens.
    pub endpoint: String,
    /// Directory holding the current result artifacts.
    pub cache_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000/process".to_string(),
            cache_dir: "cache".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_the_local_processor() {
        let config = AppConfig::default();
        assert_eq!(config.endpoint, "http://localhost:8000/process");
        assert_eq!(config.cache_dir, "cache");
    }
}
