//! Tests for the Gemini client facade over a scripted transport.

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::json;

use super::*;
use crate::history::HistoryLimits;
use crate::retry::testing::RecordingSleeper;
use crate::retry::RetryPolicy;
use crate::transport::testing::ScriptedTransport;
use crate::{AiError, ImageInput, Message};

fn text_response(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] }
        }]
    })
}

fn scripted_with(
    config: GeminiConfig,
    responses: Vec<Result<serde_json::Value, AiError>>,
) -> (GeminiClient, Arc<ScriptedTransport>, Arc<RecordingSleeper>) {
    let transport = Arc::new(ScriptedTransport::new(responses));
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = GeminiClient::with_transport(config, transport.clone())
        .unwrap()
        .with_sleeper(sleeper.clone());
    (client, transport, sleeper)
}

fn scripted(
    responses: Vec<Result<serde_json::Value, AiError>>,
) -> (GeminiClient, Arc<ScriptedTransport>, Arc<RecordingSleeper>) {
    scripted_with(GeminiConfig::new("test-key"), responses)
}

#[test]
fn empty_api_key_is_a_config_error() {
    let err = GeminiClient::new(GeminiConfig::new("")).unwrap_err();
    assert!(matches!(err, AiError::Config(_)));

    let transport = Arc::new(ScriptedTransport::default());
    let err = GeminiClient::with_transport(GeminiConfig::new("   "), transport).unwrap_err();
    assert!(matches!(err, AiError::Config(_)));
}

#[test]
fn config_debug_redacts_key() {
    let config = GeminiConfig::new("secret-key").with_text_model("gemini-2.0-flash");
    let debug = format!("{config:?}");
    assert!(!debug.contains("secret-key"));
    assert!(debug.contains("gemini-2.0-flash"));
}

#[test]
fn chat_formats_history_and_new_input() {
    let (client, transport, _) = scripted(vec![Ok(text_response("I'm fine"))]);
    let conversation = vec![
        Message::system("Be brief."),
        Message::user("hi"),
        Message::model("hello"),
        Message::user("how are you"),
    ];

    let reply = client.chat(&conversation).unwrap();
    assert_eq!(reply, "I'm fine");

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let (model, body) = &requests[0];
    assert_eq!(model, DEFAULT_MODEL);

    let contents = body["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[0]["role"], "user");
    assert_eq!(contents[0]["parts"][0]["text"], "hi");
    assert_eq!(contents[1]["role"], "model");
    assert_eq!(contents[1]["parts"][0]["text"], "hello");
    assert_eq!(contents[2]["role"], "user");
    assert_eq!(contents[2]["parts"][0]["text"], "how are you");
    assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be brief.");
    assert_eq!(body["generationConfig"]["maxOutputTokens"], 2048);
}

#[test]
fn chat_trims_to_history_limit() {
    let config = GeminiConfig::new("k").with_history(HistoryLimits {
        max_messages: 2,
        max_tokens: 10_000,
    });
    let (client, transport, _) = scripted_with(config, vec![Ok(text_response("good"))]);
    let conversation = vec![
        Message::user("hi"),
        Message::model("hello"),
        Message::user("how are you"),
    ];

    client.chat(&conversation).unwrap();

    let requests = transport.requests();
    let (_, body) = &requests[0];
    let contents = body["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 2);
    assert_eq!(contents[0]["parts"][0]["text"], "hello");
    assert_eq!(contents[1]["parts"][0]["text"], "how are you");
}

#[test]
fn chat_keeps_system_instruction_when_history_is_trimmed() {
    let config = GeminiConfig::new("k").with_history(HistoryLimits {
        max_messages: 2,
        max_tokens: 10_000,
    });
    let (client, transport, _) = scripted_with(config, vec![Ok(text_response("ok"))]);
    let conversation = vec![
        Message::system("Be brief."),
        Message::user("one"),
        Message::model("two"),
        Message::user("three"),
        Message::model("four"),
        Message::user("five"),
    ];

    client.chat(&conversation).unwrap();

    let requests = transport.requests();
    let (_, body) = &requests[0];
    let contents = body["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 2);
    assert_eq!(contents[0]["parts"][0]["text"], "four");
    assert_eq!(contents[1]["parts"][0]["text"], "five");
    assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be brief.");
}

#[test]
fn chat_with_only_a_system_message_sends_it_as_input() {
    let (client, transport, _) = scripted(vec![Ok(text_response("ok"))]);

    client.chat(&[Message::system("hello?")]).unwrap();

    let requests = transport.requests();
    let (_, body) = &requests[0];
    assert_eq!(body["contents"][0]["role"], "user");
    assert_eq!(body["contents"][0]["parts"][0]["text"], "hello?");
    assert!(body.get("systemInstruction").is_none());
}

#[test]
fn chat_rejects_empty_conversation_without_calling() {
    let (client, transport, _) = scripted(vec![]);
    let err = client.chat(&[]).unwrap_err();
    assert!(matches!(err, AiError::EmptyConversation));
    assert!(transport.requests().is_empty());
}

#[test]
fn chat_concatenates_text_parts() {
    let response = json!({
        "candidates": [{
            "content": { "parts": [{ "text": "Hello, " }, { "text": "world" }] }
        }]
    });
    let (client, _, _) = scripted(vec![Ok(response)]);
    assert_eq!(client.chat(&[Message::user("hi")]).unwrap(), "Hello, world");
}

#[test]
fn chat_falls_back_to_raw_response_without_text() {
    let response = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
    let (client, _, _) = scripted(vec![Ok(response.clone())]);
    let reply = client.chat(&[Message::user("hi")]).unwrap();
    assert_eq!(reply, response.to_string());
    assert!(reply.contains("SAFETY"));
}

#[test]
fn chat_retries_rate_limits_with_backoff() {
    let config = GeminiConfig::new("k")
        .with_retry(RetryPolicy::new(3, Duration::from_secs(1)).unwrap());
    let (client, transport, sleeper) = scripted_with(
        config,
        vec![
            Err(AiError::RateLimited),
            Err(AiError::RateLimited),
            Ok(text_response("ok")),
        ],
    );

    assert_eq!(client.chat(&[Message::user("hi")]).unwrap(), "ok");
    assert_eq!(transport.requests().len(), 3);
    assert_eq!(
        sleeper.recorded(),
        vec![Duration::from_secs(1), Duration::from_secs(2)]
    );
}

#[test]
fn chat_propagates_other_errors_immediately() {
    let (client, transport, sleeper) = scripted(vec![
        Err(AiError::ApiError("HTTP 400 Bad Request: invalid".into())),
        Ok(text_response("never")),
    ]);

    let err = client.chat(&[Message::user("hi")]).unwrap_err();
    assert!(matches!(err, AiError::ApiError(_)));
    assert_eq!(transport.requests().len(), 1);
    assert!(sleeper.recorded().is_empty());
}

#[test]
fn chat_gives_up_after_max_attempts() {
    let config = GeminiConfig::new("k")
        .with_retry(RetryPolicy::new(2, Duration::from_millis(10)).unwrap());
    let (client, transport, sleeper) = scripted_with(
        config,
        vec![
            Err(AiError::RateLimited),
            Err(AiError::RateLimited),
            Ok(text_response("too late")),
        ],
    );

    let err = client.chat(&[Message::user("hi")]).unwrap_err();
    assert!(matches!(err, AiError::RateLimited));
    assert_eq!(transport.requests().len(), 2);
    assert_eq!(sleeper.recorded(), vec![Duration::from_millis(10)]);
}

#[test]
fn ask_about_image_sends_inline_data() {
    let config = GeminiConfig::new("k").with_image_model("gemini-vision");
    let (client, transport, _) = scripted_with(config, vec![Ok(text_response("a cat"))]);
    let image = ImageInput::png(vec![0x89, b'P', b'N', b'G']);

    let answer = client.ask_about_image(&image, "What is this?").unwrap();
    assert_eq!(answer, "a cat");

    let requests = transport.requests();
    let (model, body) = &requests[0];
    assert_eq!(model, "gemini-vision");
    let parts = body["contents"][0]["parts"].as_array().unwrap();
    assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
    assert_eq!(
        parts[0]["inlineData"]["data"],
        STANDARD.encode([0x89, b'P', b'N', b'G'])
    );
    assert_eq!(parts[1]["text"], "What is this?");
}

#[test]
fn caption_uses_default_prompt() {
    let (client, transport, _) = scripted(vec![Ok(text_response("a dog"))]);
    let image = ImageInput::new(vec![1, 2, 3], "image/jpeg");

    assert_eq!(client.caption_image(&image).unwrap(), "a dog");
    let requests = transport.requests();
    let (_, body) = &requests[0];
    assert_eq!(body["contents"][0]["parts"][1]["text"], "Describe this image");
    assert_eq!(
        body["contents"][0]["parts"][0]["inlineData"]["mimeType"],
        "image/jpeg"
    );
}

#[test]
fn ask_about_image_retries_rate_limits() {
    let (client, transport, sleeper) = scripted(vec![
        Err(AiError::ApiError("HTTP 400: RESOURCE_EXHAUSTED".into())),
        Ok(text_response("ok")),
    ]);
    let image = ImageInput::png(vec![1]);

    assert_eq!(client.ask_about_image(&image, "?").unwrap(), "ok");
    assert_eq!(transport.requests().len(), 2);
    assert_eq!(sleeper.recorded(), vec![Duration::from_secs(1)]);
}

#[test]
fn generate_image_returns_decoded_bytes() {
    let response = json!({
        "candidates": [{
            "content": { "parts": [
                { "text": "Here you go" },
                { "inlineData": { "mimeType": "image/png", "data": STANDARD.encode(b"pngdata") } }
            ] }
        }]
    });
    let (client, transport, _) = scripted(vec![Ok(response)]);

    let image = client.generate_image("a lighthouse").unwrap();
    assert_eq!(image.data, b"pngdata");
    assert_eq!(image.mime_type, "image/png");

    let requests = transport.requests();
    let (_, body) = &requests[0];
    assert_eq!(body["contents"][0]["parts"][0]["text"], "a lighthouse");
    assert_eq!(
        body["generationConfig"]["responseModalities"],
        json!(["TEXT", "IMAGE"])
    );
}

#[test]
fn generate_image_without_image_part_is_absent() {
    let (client, _, _) = scripted(vec![Ok(text_response("I can only write text."))]);
    assert!(client.generate_image("a lighthouse").is_none());
}

#[test]
fn generate_image_swallows_errors() {
    let (client, _, _) = scripted(vec![Err(AiError::ApiError(
        "HTTP 400 Bad Request: modality not supported".into(),
    ))]);
    assert!(client.generate_image("a lighthouse").is_none());

    let (client, _, _) = scripted(vec![Err(AiError::NetworkError("dns".into()))]);
    assert!(client.generate_image("a lighthouse").is_none());

    let bad = json!({
        "candidates": [{
            "content": { "parts": [{ "inlineData": { "mimeType": "image/png", "data": "!!not base64!!" } }] }
        }]
    });
    let (client, _, _) = scripted(vec![Ok(bad)]);
    assert!(client.generate_image("a lighthouse").is_none());
}

#[test]
fn generate_image_exhausted_retries_are_absent() {
    let config = GeminiConfig::new("k")
        .with_retry(RetryPolicy::new(2, Duration::from_millis(5)).unwrap());
    let (client, transport, sleeper) = scripted_with(
        config,
        vec![Err(AiError::RateLimited), Err(AiError::RateLimited)],
    );

    assert!(client.generate_image("a lighthouse").is_none());
    assert_eq!(transport.requests().len(), 2);
    assert_eq!(sleeper.recorded().len(), 1);
}

#[test]
fn generate_image_skips_non_image_inline_data() {
    let response = json!({
        "candidates": [{
            "content": { "parts": [
                { "inlineData": { "mimeType": "audio/wav", "data": STANDARD.encode(b"wav") } }
            ] }
        }]
    });
    let (client, _, _) = scripted(vec![Ok(response)]);
    assert!(client.generate_image("a lighthouse").is_none());
}
