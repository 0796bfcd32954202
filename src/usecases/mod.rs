//! Application use cases. Orchestrate domain logic via ports.

pub mod composer;
pub mod extractor;
pub mod pipeline;
pub mod portfolio_index;
pub mod prompts;

pub use composer::OutreachComposer;
pub use extractor::StructuredExtractor;
pub use pipeline::{OutreachPipeline, PipelineOptions};
pub use portfolio_index::{PortfolioIndex, StaticCatalog};
pub use prompts::Persona;
