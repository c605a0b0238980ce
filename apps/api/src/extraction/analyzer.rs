//! StructuredDataAnalyzer — asks the generative model for a JSON object
//! describing the document text.

use tracing::info;

use crate::errors::PipelineError;
use crate::extraction::prompts::EXTRACT_PROMPT_TEMPLATE;
use crate::extraction::text::ExtractedText;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::TextGenerator;

/// Builds the single instruction sent for a document. The text is embedded
/// verbatim; it is never escaped or truncated.
pub fn build_prompt(document_text: &str) -> String {
    EXTRACT_PROMPT_TEMPLATE.replace("{document_text}", document_text)
}

/// Sends the document text to the model and returns its raw reply.
///
/// Any transport or API failure is a `ModelService` error. It is never
/// treated as "no data".
pub async fn analyze(
    text: &ExtractedText,
    llm: &dyn TextGenerator,
) -> Result<String, PipelineError> {
    let prompt = build_prompt(text.as_str());
    let raw = llm.generate(&prompt, JSON_ONLY_SYSTEM).await?;
    info!("Model replied with {} characters", raw.chars().count());
    Ok(raw)
}
