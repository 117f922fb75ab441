use std::path::PathBuf;

use clap::{Args, Parser};

/// Command line / environment configuration.
///
/// The API key is intentionally absent: it is typed into the UI and kept in
/// memory for the session only.
#[derive(Debug, Clone, Parser)]
#[command(name = "flight-explorer", version, about)]
pub struct Config {
    /// Directory holding airlines, airplanes, airports and routes tables.
    #[arg(long, env = "FLIGHT_EXPLORER_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    #[command(flatten)]
    pub llm: LlmConfig,
}

/// Text-generation endpoint settings.
#[derive(Debug, Clone, Args)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API.
    #[arg(
        long = "llm-base-url",
        env = "FLIGHT_EXPLORER_LLM_BASE_URL",
        default_value = "https://api.openai.com/v1"
    )]
    pub base_url: String,

    /// Chat model used for descriptions.
    #[arg(long = "llm-model", env = "FLIGHT_EXPLORER_LLM_MODEL", default_value = "gpt-4o-mini")]
    pub model: String,

    /// Request timeout in seconds.
    #[arg(long = "llm-timeout-secs", env = "FLIGHT_EXPLORER_LLM_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let config = Config::try_parse_from([
            "flight-explorer",
            "--data-dir",
            "/srv/openflights",
            "--llm-base-url",
            "http://localhost:8080/v1",
            "--llm-model",
            "local-model",
            "--llm-timeout-secs",
            "5",
        ])
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/openflights"));
        assert_eq!(config.llm.base_url, "http://localhost:8080/v1");
        assert_eq!(config.llm.model, "local-model");
        assert_eq!(config.llm.timeout_secs, 5);
    }

    #[test]
    fn test_rejects_non_numeric_timeout() {
        assert!(Config::try_parse_from(["flight-explorer", "--llm-timeout-secs", "soon"]).is_err());
    }
}
