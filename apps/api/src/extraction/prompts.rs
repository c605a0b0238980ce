// Extraction prompt templates.

/// The document text is appended verbatim after a blank line.
pub const EXTRACT_PROMPT_TEMPLATE: &str = "\
Extract structured data from the following text and return only a valid JSON object. \
Ensure the response is strictly JSON with no additional text, explanations, or markdown formatting. \
If no structured data is found, return an empty JSON object: {}\n\n{document_text}";
