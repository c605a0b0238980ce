// Write path: PDF text → model reply → sanitized record → ResultStore.
// All model calls go through llm_client.

pub mod analyzer;
pub mod pipeline;
pub mod prompts;
pub mod sanitizer;
pub mod text;
