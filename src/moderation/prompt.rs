// Fixed system prompts and user-message construction for each content kind.
//
// The prompt pins the reply to raw JSON in the ModerationVerdict schema.
// Model and endpoint come from config, never from the request.

use crate::gateway::types::{ChatMessage, ChatRequest, ContentPart, ImageUrl, MessageContent};

const TEXT_SYSTEM_PROMPT: &str = r#"You are a child-safety content analyzer. Your job is to analyze text for potentially harmful content that could negatively affect children.

IMPORTANT: You must respond ONLY with valid JSON, no markdown, no code blocks, just raw JSON.

Analyze the provided text and identify any concerning content. For each issue found, categorize it as:

Harm Types:
- "hate-speech": Content that attacks or demeans people based on identity
- "abuse": Bullying, harassment, threats, or intimidation
- "self-harm": Content promoting or glorifying self-injury or suicide
- "explicit": Sexual content, extreme violence, or age-inappropriate material

Severity Levels:
- "low": Mildly concerning, educational opportunity
- "medium": Moderately harmful, needs attention
- "high": Seriously concerning, requires immediate adult attention

Respond with this JSON structure:
{
  "toxicityScore": <number 0-100>,
  "issues": [
    {
      "harmType": "<harm-type>",
      "severity": "<severity>",
      "content": "<brief excerpt of concerning content>",
      "reason": "<short reason for flagging>",
      "explanation": "<child-friendly explanation of why this is concerning, written in a supportive and educational tone>"
    }
  ],
  "overallSafe": <boolean>,
  "friendlyMessage": "<a brief, encouraging message about the content's safety>"
}

If no issues are found, return:
{
  "toxicityScore": 0,
  "issues": [],
  "overallSafe": true,
  "friendlyMessage": "This content looks safe and friendly! Great job staying positive online."
}"#;

const IMAGE_SYSTEM_PROMPT: &str = r#"You are a child-safety image analyzer. Your job is to analyze images for potentially harmful content that could negatively affect children.

IMPORTANT: You must respond ONLY with valid JSON, no markdown, no code blocks, just raw JSON.

Analyze the provided image and identify any concerning content. For each issue found, categorize it as:

Harm Types:
- "hate-speech": Images containing hateful symbols, gestures, or messaging
- "abuse": Images depicting bullying, violence, or harmful behavior
- "self-harm": Images promoting or showing self-injury
- "explicit": Sexual content, graphic violence, or age-inappropriate imagery

Severity Levels:
- "low": Mildly concerning, educational opportunity
- "medium": Moderately harmful, needs attention
- "high": Seriously concerning, requires immediate adult attention

Respond with this JSON structure:
{
  "toxicityScore": <number 0-100>,
  "issues": [
    {
      "harmType": "<harm-type>",
      "severity": "<severity>",
      "content": "<brief description of concerning element>",
      "reason": "<short reason for flagging>",
      "explanation": "<child-friendly explanation of why this is concerning, written in a supportive and educational tone>"
    }
  ],
  "overallSafe": <boolean>,
  "friendlyMessage": "<a brief, encouraging message about the image's safety>"
}

If no issues are found, return:
{
  "toxicityScore": 0,
  "issues": [],
  "overallSafe": true,
  "friendlyMessage": "This image looks safe and appropriate! Nice choice."
}"#;

/// Which prompt (and fallback copy) a request uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptVariant {
    Text,
    Image,
}

impl PromptVariant {
    pub fn system_prompt(&self) -> &'static str {
        match self {
            PromptVariant::Text => TEXT_SYSTEM_PROMPT,
            PromptVariant::Image => IMAGE_SYSTEM_PROMPT,
        }
    }

    /// Message carried by the fail-open verdict for this variant.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            PromptVariant::Text => {
                "We analyzed the content but couldn't determine specific issues. The content may be safe."
            }
            PromptVariant::Image => {
                "We analyzed the image but couldn't determine specific issues. The image may be safe."
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PromptVariant::Text => "text",
            PromptVariant::Image => "image",
        }
    }
}

/// Validated user content ready to be embedded in a prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Text(String),
    /// https URL or `data:` URL
    Image(String),
}

impl Content {
    pub fn variant(&self) -> PromptVariant {
        match self {
            Content::Text(_) => PromptVariant::Text,
            Content::Image(_) => PromptVariant::Image,
        }
    }

    fn user_message(&self) -> ChatMessage {
        match self {
            Content::Text(text) => ChatMessage::user(MessageContent::Text(format!(
                "Analyze this text for child safety:\n\n{text}"
            ))),
            Content::Image(url) => ChatMessage::user(MessageContent::Parts(vec![
                ContentPart::Text {
                    text: "Analyze this image for child safety:".to_string(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl { url: url.clone() },
                },
            ])),
        }
    }
}

/// Build the upstream request: variant system prompt, then the user content.
pub fn build_request(model: &str, content: &Content) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(content.variant().system_prompt()),
            content.user_message(),
        ],
    }
}
