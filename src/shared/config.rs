//! Application configuration. API credentials, paths, pipeline tuning.

use serde::Deserialize;

pub const DEFAULT_LLM_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_LLM_MODEL: &str = "llama-3.1-70b-versatile";
pub const DEFAULT_EMBEDDING_API_URL: &str = "https://api.openai.com/v1/embeddings";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // LLM Configuration
    // ─────────────────────────────────────────────────────────────────────────
    /// LLM API key. Read from COLDMAIL_LLM_API_KEY, falling back to GROQ_API_KEY.
    #[serde(default)]
    pub llm_api_key: Option<String>,

    /// Chat completions endpoint. Defaults to Groq. Read from COLDMAIL_LLM_API_URL.
    #[serde(default)]
    pub llm_api_url: Option<String>,

    /// Model name. Defaults to "llama-3.1-70b-versatile". Read from COLDMAIL_LLM_MODEL.
    #[serde(default)]
    pub llm_model: Option<String>,

    /// Sampling temperature. Defaults to 0. Read from COLDMAIL_LLM_TEMPERATURE.
    #[serde(default)]
    pub llm_temperature: Option<f32>,

    // ─────────────────────────────────────────────────────────────────────────
    // Embedding Configuration
    // ─────────────────────────────────────────────────────────────────────────
    /// Embedding API key. Read from COLDMAIL_EMBEDDING_API_KEY, falling back to OPENAI_API_KEY.
    /// When unset, the local hashing embedder is used.
    #[serde(default)]
    pub embedding_api_key: Option<String>,

    #[serde(default)]
    pub embedding_api_url: Option<String>,

    #[serde(default)]
    pub embedding_model: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Catalog, output, pipeline
    // ─────────────────────────────────────────────────────────────────────────
    /// Portfolio CSV (Techstack,Links). Read from COLDMAIL_CATALOG_PATH.
    #[serde(default)]
    pub catalog_path: Option<String>,

    /// Where Markdown reports go. Read from COLDMAIL_OUTPUT_DIR.
    #[serde(default)]
    pub output_dir: Option<String>,

    /// Portfolio links per email. Read from COLDMAIL_TOP_K.
    #[serde(default)]
    pub top_k: Option<usize>,

    /// HTTP timeout for page fetch, LLM and embedding calls. Read from COLDMAIL_REQUEST_TIMEOUT_SECS.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Deadline for matching + composing one job. Read from COLDMAIL_JOB_TIMEOUT_SECS.
    #[serde(default)]
    pub job_timeout_secs: Option<u64>,

    /// Jobs composed in parallel. Read from COLDMAIL_COMPOSE_CONCURRENCY.
    #[serde(default)]
    pub compose_concurrency: Option<usize>,

    /// Cleaned page text is capped to this many characters. Read from COLDMAIL_MAX_PAGE_CHARS.
    #[serde(default)]
    pub max_page_chars: Option<usize>,

    // ─────────────────────────────────────────────────────────────────────────
    // Sender persona
    // ─────────────────────────────────────────────────────────────────────────
    #[serde(default)]
    pub sender_name: Option<String>,

    #[serde(default)]
    pub company_name: Option<String>,

    #[serde(default)]
    pub company_pitch: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        if let Ok(path) = std::env::var("COLDMAIL_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        // Environment wins over the file.
        c = c.add_source(config::Environment::with_prefix("COLDMAIL").try_parsing(true));
        c.build()?.try_deserialize()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // LLM Configuration Helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the LLM API key from config, COLDMAIL_LLM_API_KEY or GROQ_API_KEY.
    pub fn llm_api_key(&self) -> Option<String> {
        resolve_key(self.llm_api_key.clone(), || std::env::var("GROQ_API_KEY").ok())
    }

    pub fn llm_api_url_or_default(&self) -> String {
        self.llm_api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_LLM_API_URL.to_string())
    }

    pub fn llm_model_or_default(&self) -> String {
        self.llm_model
            .clone()
            .unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string())
    }

    pub fn llm_temperature_or_default(&self) -> f32 {
        self.llm_temperature.unwrap_or(0.0)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Embedding Configuration Helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the embedding API key from config, COLDMAIL_EMBEDDING_API_KEY or OPENAI_API_KEY.
    pub fn embedding_api_key(&self) -> Option<String> {
        resolve_key(self.embedding_api_key.clone(), || {
            std::env::var("OPENAI_API_KEY").ok()
        })
    }

    pub fn embedding_api_url_or_default(&self) -> String {
        self.embedding_api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_EMBEDDING_API_URL.to_string())
    }

    pub fn embedding_model_or_default(&self) -> String {
        self.embedding_model
            .clone()
            .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Catalog / Pipeline Helpers
    // ─────────────────────────────────────────────────────────────────────────

    pub fn catalog_path_or_default(&self) -> String {
        self.catalog_path
            .clone()
            .unwrap_or_else(|| "./portfolio.csv".to_string())
    }

    pub fn output_dir_or_default(&self) -> String {
        self.output_dir.clone().unwrap_or_else(|| "./out".to_string())
    }

    /// Returns top-k. Defaults to 2; zero is bumped to 1.
    pub fn top_k_or_default(&self) -> usize {
        self.top_k.unwrap_or(2).max(1)
    }

    pub fn request_timeout_secs_or_default(&self) -> u64 {
        self.request_timeout_secs.unwrap_or(60)
    }

    pub fn job_timeout_secs_or_default(&self) -> u64 {
        self.job_timeout_secs.unwrap_or(120)
    }

    pub fn compose_concurrency_or_default(&self) -> usize {
        self.compose_concurrency.unwrap_or(1).max(1)
    }

    pub fn max_page_chars_or_default(&self) -> usize {
        self.max_page_chars.unwrap_or(20_000)
    }

    /// Sender persona with defaults for unset fields.
    pub fn persona(&self) -> crate::usecases::prompts::Persona {
        let default = crate::usecases::prompts::Persona::default();
        crate::usecases::prompts::Persona {
            sender_name: self.sender_name.clone().unwrap_or(default.sender_name),
            company_name: self.company_name.clone().unwrap_or(default.company_name),
            company_pitch: self.company_pitch.clone().unwrap_or(default.company_pitch),
        }
    }
}

/// Explicit key unless blank, then the fallback unless blank.
///
/// An empty `COLDMAIL_*_API_KEY=` line must not shadow the provider's own variable.
fn resolve_key(
    explicit: Option<String>,
    fallback: impl FnOnce() -> Option<String>,
) -> Option<String> {
    let non_blank = |k: &String| !k.trim().is_empty();
    explicit.filter(non_blank).or_else(|| fallback().filter(non_blank))
}
