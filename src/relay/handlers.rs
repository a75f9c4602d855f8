// POST /analyze-text and POST /analyze-image.
//
// Both handlers validate their body into a `Content`, then share `relay()`.
// Bodies are parsed from raw bytes so that a missing field or a wrong type
// is a 400 with our own message. A body that can't be buffered at all is
// also reported as JSON.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::Json;
use serde_json::Value;
use tracing::info;

use super::error::RelayError;
use super::AppState;
use crate::gateway::traits::ChatCompletion;
use crate::moderation::normalize::normalize;
use crate::moderation::prompt::{build_request, Content};
use crate::moderation::types::ModerationVerdict;

const MISSING_TEXT: &str = "Please provide text to analyze";
const MISSING_IMAGE: &str = "Please provide an image to analyze (base64 or URL)";

/// POST /analyze-text — body `{ "text": string }`.
pub async fn analyze_text(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ModerationVerdict>, RelayError> {
    let content = parse_text_body(&body?)?;
    let verdict = relay(state.gateway.as_ref(), &state.config.model, content).await?;
    Ok(Json(verdict))
}

/// POST /analyze-image — body `{ "imageBase64"?: string, "imageUrl"?: string }`.
pub async fn analyze_image(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ModerationVerdict>, RelayError> {
    let content = parse_image_body(&body?)?;
    let verdict = relay(state.gateway.as_ref(), &state.config.model, content).await?;
    Ok(Json(verdict))
}

/// Forward one piece of content upstream and normalize the reply.
///
/// Exactly one gateway call, no retries. Gateway failures keep their
/// taxonomy; an unusable reply is not a failure (see `normalize`).
pub async fn relay(
    gateway: &dyn ChatCompletion,
    model: &str,
    content: Content,
) -> Result<ModerationVerdict, RelayError> {
    let variant = content.variant();
    info!(variant = variant.as_str(), "Analyzing {} for safety", variant.as_str());

    let request = build_request(model, &content);
    let reply = gateway.complete(&request).await?;

    let verdict = normalize(reply.as_deref(), variant);
    info!(
        variant = variant.as_str(),
        toxicity_score = verdict.toxicity_score,
        issues = verdict.issues.len(),
        "Analysis complete"
    );
    Ok(verdict)
}

/// Validate a text request body.
pub fn parse_text_body(body: &[u8]) -> Result<Content, RelayError> {
    let value = parse_json_object(body, MISSING_TEXT)?;
    match non_empty_str(&value, "text") {
        Some(text) => Ok(Content::Text(text.to_string())),
        None => Err(RelayError::InvalidInput(MISSING_TEXT.to_string())),
    }
}

/// Validate an image request body. `imageBase64` wins when both are set.
pub fn parse_image_body(body: &[u8]) -> Result<Content, RelayError> {
    let value = parse_json_object(body, MISSING_IMAGE)?;
    non_empty_str(&value, "imageBase64")
        .or_else(|| non_empty_str(&value, "imageUrl"))
        .map(|url| Content::Image(url.to_string()))
        .ok_or_else(|| RelayError::InvalidInput(MISSING_IMAGE.to_string()))
}

fn parse_json_object(body: &[u8], missing: &str) -> Result<Value, RelayError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err(RelayError::InvalidInput(missing.to_string())),
        Err(_) => Err(RelayError::InvalidInput(
            "Request body must be valid JSON".to_string(),
        )),
    }
}

fn non_empty_str<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    value
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_body_requires_string_text() {
        assert!(parse_text_body(br#"{}"#).is_err());
        assert!(parse_text_body(br#"{"text": 42}"#).is_err());
        assert!(parse_text_body(br#"{"text": ""}"#).is_err());
        assert!(parse_text_body(br#"not json"#).is_err());
        assert!(parse_text_body(br#"["text"]"#).is_err());
        assert_eq!(
            parse_text_body(br#"{"text": "hello"}"#).unwrap(),
            Content::Text("hello".to_string())
        );
    }

    #[test]
    fn image_body_prefers_base64() {
        let content =
            parse_image_body(br#"{"imageBase64": "data:image/png;base64,AA", "imageUrl": "https://x/y.png"}"#)
                .unwrap();
        assert_eq!(content, Content::Image("data:image/png;base64,AA".to_string()));
    }

    #[test]
    fn image_body_falls_back_to_url() {
        let content = parse_image_body(br#"{"imageBase64": "", "imageUrl": "https://x/y.png"}"#).unwrap();
        assert_eq!(content, Content::Image("https://x/y.png".to_string()));
    }

    #[test]
    fn image_body_without_image_is_invalid() {
        let err = parse_image_body(br#"{"imageUrl": null}"#).unwrap_err();
        assert_eq!(err.to_string(), MISSING_IMAGE);
    }
}
