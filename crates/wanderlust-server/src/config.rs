use std::env;

const DEFAULT_GEMINI_MODELS: &str = "gemini-1.5-flash,gemini-1.5-flash-8b,gemini-2.0-flash";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub sqlite_path: String,
    pub google_api_key: Option<String>,
    pub gemini_api_url: String,
    pub gemini_models: Vec<String>,
    pub groq_api_key: Option<String>,
    pub groq_api_url: String,
    pub groq_model: String,
    pub nominatim_url: String,
    pub geocoder_user_agent: String,
    pub cache_ttl_secs: u64,
    pub cors_origin: String,
    pub secure_cookies: bool,
    pub rate_limit: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("SERVER_PORT must be a valid port number"),
            sqlite_path: env::var("SQLITE_PATH")
                .unwrap_or_else(|_| "./data/wanderlust.db".to_string()),
            google_api_key: non_empty_var("GOOGLE_API_KEY"),
            gemini_api_url: env::var("GEMINI_API_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".to_string()),
            gemini_models: parse_list(
                &env::var("GEMINI_MODELS").unwrap_or_else(|_| DEFAULT_GEMINI_MODELS.to_string()),
            ),
            groq_api_key: non_empty_var("GROQ_API_KEY"),
            groq_api_url: env::var("GROQ_API_URL")
                .unwrap_or_else(|_| "https://api.groq.com/openai/v1".to_string()),
            groq_model: env::var("GROQ_MODEL")
                .unwrap_or_else(|_| "llama3-70b-8192".to_string()),
            nominatim_url: env::var("NOMINATIM_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string()),
            geocoder_user_agent: env::var("GEOCODER_USER_AGENT")
                .unwrap_or_else(|_| "wanderlust-server/0.1".to_string()),
            cache_ttl_secs: env::var("CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            secure_cookies: env::var("SECURE_COOKIES")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            rate_limit: env::var("RATE_LIMIT")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
        }
    }
}

/// Blank keys in `.env` files count as unset.
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
