pub mod provider;
pub mod openai;
pub mod prompts;
pub mod parser;

pub use provider::AnalysisProvider;
pub use openai::OpenAiProvider;
