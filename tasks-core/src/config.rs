use std::env;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/tasks";
pub const API_URL_ENV: &str = "TASKS_API_URL";

/// Where the task collection lives. The binary layers a CLI flag on top of
/// this; here it is environment over default.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        let api_url = env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Config { api_url }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}
