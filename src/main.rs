//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here; the pipeline lives in usecases.
//!
//! Usage: `coldmail [CAREERS_URL]` (prompts for the URL when omitted).

use coldmail::adapters::ai::{MockLlmAdapter, OpenAiAdapter};
use coldmail::adapters::embedding::{HashingEmbedder, OpenAiEmbeddingAdapter};
use coldmail::adapters::persistence::{CsvCatalog, MarkdownReportWriter};
use coldmail::adapters::ui::cli::CliInputPort;
use coldmail::adapters::web::HttpPageFetcher;
use coldmail::ports::{CatalogPort, EmbeddingPort, InputPort, LlmPort, PageFetcherPort, ReportPort};
use coldmail::shared::config::AppConfig;
use coldmail::usecases::{
    OutreachComposer, OutreachPipeline, PipelineOptions, PortfolioIndex, StructuredExtractor,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv::dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    coldmail::adapters::ui::init_ui();

    let cfg = AppConfig::load().map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;
    let request_timeout = Duration::from_secs(cfg.request_timeout_secs_or_default());

    // --- Language model ---
    let llm: Arc<dyn LlmPort> = match cfg.llm_api_key() {
        Some(key) => {
            info!(
                model = %cfg.llm_model_or_default(),
                url = %cfg.llm_api_url_or_default(),
                "using OpenAI-compatible LLM"
            );
            Arc::new(
                OpenAiAdapter::new(
                    cfg.llm_api_url_or_default(),
                    key,
                    cfg.llm_model_or_default(),
                    request_timeout,
                )
                .map_err(|e| anyhow::anyhow!("{}", e))?
                .with_temperature(cfg.llm_temperature_or_default()),
            )
        }
        None => {
            warn!("COLDMAIL_LLM_API_KEY / GROQ_API_KEY not set, using mock LLM adapter");
            Arc::new(MockLlmAdapter::new())
        }
    };

    // --- Embeddings ---
    let embedder: Arc<dyn EmbeddingPort> = match cfg.embedding_api_key() {
        Some(key) => {
            info!(model = %cfg.embedding_model_or_default(), "using remote embeddings");
            Arc::new(
                OpenAiEmbeddingAdapter::new(
                    cfg.embedding_api_url_or_default(),
                    key,
                    cfg.embedding_model_or_default(),
                    request_timeout,
                )
                .map_err(|e| anyhow::anyhow!("{}", e))?,
            )
        }
        None => {
            info!("no embedding API key; using local hashing embedder");
            Arc::new(HashingEmbedder::default())
        }
    };

    // --- Portfolio index (built once, before any job is processed) ---
    let catalog_path = cfg.catalog_path_or_default();
    let catalog: Arc<dyn CatalogPort> = Arc::new(CsvCatalog::new(&catalog_path));
    let index = Arc::new(PortfolioIndex::new(
        catalog,
        Arc::clone(&embedder),
        cfg.top_k_or_default(),
    ));
    index
        .warm_up()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    info!(
        path = %catalog_path,
        entries = index.len(),
        top_k = index.top_k(),
        "portfolio ready"
    );

    // --- Pipeline ---
    let fetcher: Arc<dyn PageFetcherPort> = Arc::new(
        HttpPageFetcher::new(request_timeout).map_err(|e| anyhow::anyhow!("{}", e))?,
    );
    let options = PipelineOptions {
        job_timeout: Duration::from_secs(cfg.job_timeout_secs_or_default()),
        concurrency: cfg.compose_concurrency_or_default(),
        max_page_chars: cfg.max_page_chars_or_default(),
    };
    let pipeline = Arc::new(
        OutreachPipeline::new(
            StructuredExtractor::new(Arc::clone(&llm)),
            index,
            Arc::new(OutreachComposer::new(llm, cfg.persona())),
            options,
        )
        .with_fetcher(fetcher),
    );

    let reports: Arc<dyn ReportPort> =
        Arc::new(MarkdownReportWriter::new(cfg.output_dir_or_default()));

    // --- Run (URL from argv or prompt) ---
    let url = std::env::args().nth(1);
    let input_port: Arc<dyn InputPort> = Arc::new(CliInputPort::new(pipeline, reports, url));
    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
