//! Prompt construction for the extraction request.
//!
//! The instruction is a versioned constant: the response parser depends on
//! the exact key names it demands, so any wording change must move in
//! lockstep with the parser's canonical key set.

use base64::Engine as _;
use serde::Serialize;

use super::mime::ImageContentType;

/// Version tag for the extraction instruction. Bump on any change to the
/// instruction text or its key set.
pub const EXTRACTION_PROMPT_VERSION: &str = "v1";

/// The fixed extraction instruction. Demands strict JSON with exactly the
/// seven canonical keys, nullable string values, and no surrounding prose.
pub const EXTRACTION_PROMPT: &str = "\
You are given a business card image.\n\
Extract information and return STRICT JSON ONLY, with exactly these keys:\n\
{\n\
  \"Company Name\": string|null,\n\
  \"Name\": string|null,\n\
  \"Title\": string|null,\n\
  \"Phone Number\": string|null,\n\
  \"Email Address\": string|null,\n\
  \"Company Address\": string|null,\n\
  \"Company Website\": string|null\n\
}\n\
Rules:\n\
- No markdown, no code blocks, no explanation.\n\
- If a field is missing from the card, use null.\n";

// ═══════════════════════════════════════════════════════════
// Request payload
// ═══════════════════════════════════════════════════════════

/// A chat-style request: a single user turn carrying the inline image and
/// the extraction instruction.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    ImageUrl { image_url: ImageUrl },
    Text { text: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Package one image plus the fixed instruction into a single-turn request.
/// The image travels inline as a self-describing base64 data URI.
pub fn build_request(bytes: &[u8], content_type: ImageContentType) -> ChatRequest {
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    let data_uri = format!("data:{};base64,{payload}", content_type.as_mime());

    ChatRequest {
        messages: vec![ChatMessage {
            role: "user",
            content: vec![
                ContentBlock::ImageUrl {
                    image_url: ImageUrl { url: data_uri },
                },
                ContentBlock::Text {
                    text: EXTRACTION_PROMPT.to_string(),
                },
            ],
        }],
    }
}
