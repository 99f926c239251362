use std::env;

/// Process configuration, read once at startup and passed into component
/// constructors. Nothing in the crate consults the environment after this.
#[derive(Debug, Clone)]
pub struct Config {
    pub model: String,
    pub assistant_name: String,
    pub assistant_description: String,
    pub bin_dir: String,
    pub data_dir: String,
    pub data_file_prefix: String,
}

impl Config {
    /// Loads settings from the environment, reading a `.env` file first if
    /// one exists. Every setting has a default.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self {
            model: var_or("OPENAI_MODEL", "gpt-4o"),
            assistant_name: var_or("ASSISTANT_NAME", "AI Assistant Manager"),
            assistant_description: var_or("ASSISTANT_DESCRIPTION", "AI Assistant Manager"),
            bin_dir: var_or("BIN_DIR", "bin"),
            data_dir: var_or("DATA_DIR", "data"),
            data_file_prefix: var_or("DATA_FILE_PREFIX", "AI Assistant Manager"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            assistant_name: "AI Assistant Manager".to_string(),
            assistant_description: "AI Assistant Manager".to_string(),
            bin_dir: "bin".to_string(),
            data_dir: "data".to_string(),
            data_file_prefix: "AI Assistant Manager".to_string(),
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn var_or_falls_back_to_default() {
        assert_eq!(
            var_or("ASSISTANT_MANAGER_TEST_UNSET_KEY", "fallback"),
            "fallback"
        );
    }

    #[test]
    fn default_config_matches_env_defaults() {
        let config = Config::default();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.bin_dir, "bin");
        assert_eq!(config.data_file_prefix, "AI Assistant Manager");
    }
}
