use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    /// Key for the language-model service. Absence is reported per request,
    /// not at startup.
    pub gemini_api_key: Option<String>,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub static_dir: PathBuf,
    pub food_db_url: String,
    pub food_db_timeout_secs: u64,
    pub user_agent: String,
    pub gemini_url: String,
    pub gemini_model: String,
    pub ai_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("static_dir", &self.static_dir)
            .field("food_db_url", &self.food_db_url)
            .field("food_db_timeout_secs", &self.food_db_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("gemini_url", &self.gemini_url)
            .field("gemini_model", &self.gemini_model)
            .field("ai_timeout_secs", &self.ai_timeout_secs)
            .finish()
    }
}
