// Shared prompt fragments. Each component that calls the model keeps its own
// prompts.rs alongside it; only cross-cutting pieces live here.

/// System prompt that pushes the model toward JSON-only output.
/// Models still ignore it sometimes, hence the sanitizer.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured data extractor. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
