//! Single-shot chat completion.
//!
//! Sends one user message to a chat model and returns the text of the first
//! choice. Any API failure is returned to the caller unchanged. The reply can
//! also be streamed as it is generated, or returned token by token with the
//! probability the model gave each token.

use crate::error::{FellowshipError, Result};
use crate::probability::{TokenAlternative, TokenProbability, DEFAULT_TOP_K};
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestUserMessageArgs, ChatCompletionTokenLogprob, CreateChatCompletionRequest,
    CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
};
use async_openai::Client;
use futures::StreamExt;
use tracing::{debug, instrument};

/// Build a request holding a single user message.
pub fn build_request(model: &str, prompt: &str) -> Result<CreateChatCompletionRequest> {
    let message = ChatCompletionRequestUserMessageArgs::default()
        .content(prompt)
        .build()
        .map_err(|e| FellowshipError::Completion(e.to_string()))?;

    CreateChatCompletionRequestArgs::default()
        .model(model)
        .messages(vec![message.into()])
        .build()
        .map_err(|e| FellowshipError::Completion(e.to_string()))
}

/// Message content of the first choice.
pub fn first_choice_content(response: &CreateChatCompletionResponse) -> Result<String> {
    let choice = response
        .choices
        .first()
        .ok_or_else(|| FellowshipError::Completion("No choices in response".to_string()))?;

    choice
        .message
        .content
        .clone()
        .ok_or_else(|| FellowshipError::Completion("First choice has no content".to_string()))
}

/// Ask `model` to respond to `prompt`.
#[instrument(skip(client, prompt))]
pub async fn complete(client: &Client<OpenAIConfig>, model: &str, prompt: &str) -> Result<String> {
    let request = build_request(model, prompt)?;

    let response = client
        .chat()
        .create(request)
        .await
        .map_err(|e| FellowshipError::OpenAI(format!("Completion request failed: {}", e)))?;

    debug!("Received {} choices", response.choices.len());

    first_choice_content(&response)
}

/// Build a request that also asks for the log-probability of each token
/// and of its `top_logprobs` most likely alternatives.
pub fn build_logprobs_request(model: &str, prompt: &str, top_logprobs: u8) -> Result<CreateChatCompletionRequest> {
    let mut request = build_request(model, prompt)?;
    request.logprobs = Some(true);
    request.top_logprobs = Some(top_logprobs);
    Ok(request)
}

fn token_probability(entry: &ChatCompletionTokenLogprob) -> TokenProbability {
    TokenProbability {
        token: entry.token.clone(),
        probability: f64::from(entry.logprob).exp(),
        top_alternatives: entry
            .top_logprobs
            .iter()
            .map(|alt| TokenAlternative::from_logprob(alt.token.clone(), alt.logprob))
            .collect(),
    }
}

/// Per-token probabilities of the first choice.
pub fn first_choice_tokens(response: &CreateChatCompletionResponse) -> Result<Vec<TokenProbability>> {
    let choice = response
        .choices
        .first()
        .ok_or_else(|| FellowshipError::Completion("No choices in response".to_string()))?;

    let content = choice
        .logprobs
        .as_ref()
        .and_then(|logprobs| logprobs.content.as_ref())
        .ok_or_else(|| FellowshipError::Completion("First choice has no logprobs".to_string()))?;

    Ok(content.iter().map(token_probability).collect())
}

/// Ask `model` to respond to `prompt`, returning each generated token with
/// its probability and up to five alternatives.
#[instrument(skip(client, prompt))]
pub async fn token_probabilities(
    client: &Client<OpenAIConfig>,
    model: &str,
    prompt: &str,
) -> Result<Vec<TokenProbability>> {
    let top = u8::try_from(DEFAULT_TOP_K).unwrap_or(u8::MAX);
    let request = build_logprobs_request(model, prompt, top)?;

    let response = client
        .chat()
        .create(request)
        .await
        .map_err(|e| FellowshipError::OpenAI(format!("Completion request failed: {}", e)))?;

    let tokens = first_choice_tokens(&response)?;
    debug!("Received {} tokens", tokens.len());
    Ok(tokens)
}

/// Stream the reply to `prompt`, calling `on_delta` with each piece of text
/// as it arrives. Returns the full reply.
#[instrument(skip(client, prompt, on_delta))]
pub async fn stream_complete<F>(
    client: &Client<OpenAIConfig>,
    model: &str,
    prompt: &str,
    mut on_delta: F,
) -> Result<String>
where
    F: FnMut(&str),
{
    let mut request = build_request(model, prompt)?;
    request.stream = Some(true);

    let mut stream = client
        .chat()
        .create_stream(request)
        .await
        .map_err(|e| FellowshipError::OpenAI(format!("Completion request failed: {}", e)))?;

    let mut reply = String::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| FellowshipError::OpenAI(format!("Completion stream failed: {}", e)))?;
        for choice in chunk.choices.into_iter().filter(|c| c.index == 0) {
            if let Some(text) = choice.delta.content {
                on_delta(&text);
                reply.push_str(&text);
            }
        }
    }

    debug!("Streamed {} bytes", reply.len());
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn mock_client(server: &MockServer) -> Client<OpenAIConfig> {
        Client::with_config(
            OpenAIConfig::new()
                .with_api_base(server.uri())
                .with_api_key("test-key"),
        )
    }

    fn response(choices: serde_json::Value) -> CreateChatCompletionResponse {
        serde_json::from_value(json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "created": 1_700_000_000,
            "model": "gpt-4o-mini",
            "choices": choices
        }))
        .unwrap()
    }

    #[test]
    fn test_build_request_single_user_message() {
        let request = build_request("gpt-4o-mini", "Write a joke about Large Language Models.").unwrap();
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "Write a joke about Large Language Models.");
    }

    #[test]
    fn test_first_choice_content_takes_first() {
        let response = response(json!([
            {
                "index": 0,
                "message": { "role": "assistant", "content": "first" },
                "finish_reason": "stop"
            },
            {
                "index": 1,
                "message": { "role": "assistant", "content": "second" },
                "finish_reason": "stop"
            }
        ]));
        assert_eq!(first_choice_content(&response).unwrap(), "first");
    }

    #[test]
    fn test_first_choice_content_errors() {
        assert!(first_choice_content(&response(json!([]))).is_err());

        let no_content = response(json!([
            { "index": 0, "message": { "role": "assistant" }, "finish_reason": "stop" }
        ]));
        assert!(matches!(
            first_choice_content(&no_content),
            Err(FellowshipError::Completion(_))
        ));
    }

    #[test]
    fn test_build_logprobs_request() {
        let request = build_logprobs_request("gpt-4o-mini", "The sky is", 5).unwrap();
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["logprobs"], true);
        assert_eq!(body["top_logprobs"], 5);
        assert_eq!(body["messages"][0]["content"], "The sky is");
    }

    fn logprobs_choice() -> serde_json::Value {
        json!([{
            "index": 0,
            "message": { "role": "assistant", "content": "blue." },
            "finish_reason": "stop",
            "logprobs": {
                "content": [
                    {
                        "token": "blue",
                        "logprob": -0.105_360_5,
                        "bytes": null,
                        "top_logprobs": [
                            { "token": "blue", "logprob": -0.105_360_5, "bytes": null },
                            { "token": "clear", "logprob": -2.302_585, "bytes": null }
                        ]
                    },
                    { "token": ".", "logprob": 0.0, "bytes": null, "top_logprobs": [] }
                ],
                "refusal": null
            }
        }])
    }

    #[test]
    fn test_first_choice_tokens() {
        let tokens = first_choice_tokens(&response(logprobs_choice())).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].token, "blue");
        assert!((tokens[0].probability - 0.9).abs() < 1e-4);
        assert_eq!(tokens[0].top_alternatives.len(), 2);
        assert_eq!(tokens[0].top_alternatives[1].token, "clear");
        assert!((tokens[0].top_alternatives[1].probability - 0.1).abs() < 1e-4);
        assert_eq!(tokens[1].probability, 1.0);

        let without = response(json!([
            { "index": 0, "message": { "role": "assistant", "content": "hi" }, "finish_reason": "stop" }
        ]));
        assert!(matches!(first_choice_tokens(&without), Err(FellowshipError::Completion(_))));
    }

    #[tokio::test]
    async fn test_complete_against_mock_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({ "model": "gpt-4o-mini" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-test",
                "object": "chat.completion",
                "created": 1_700_000_000,
                "model": "gpt-4o-mini",
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": "Why did the LLM cross the road?" },
                    "finish_reason": "stop"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = mock_client(&server);
        let reply = complete(&client, "gpt-4o-mini", "Tell me a joke").await.unwrap();
        assert_eq!(reply, "Why did the LLM cross the road?");

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["messages"][0]["content"], "Tell me a joke");
    }

    #[tokio::test]
    async fn test_complete_surfaces_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {
                    "message": "Incorrect API key provided",
                    "type": "invalid_request_error",
                    "param": null,
                    "code": "invalid_api_key"
                }
            })))
            .mount(&server)
            .await;

        let client = mock_client(&server);
        let err = complete(&client, "gpt-4o-mini", "hi").await.unwrap_err();
        assert!(matches!(err, FellowshipError::OpenAI(_)));
        assert!(err.to_string().contains("Incorrect API key"));
    }

    #[tokio::test]
    async fn test_token_probabilities_against_mock_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({ "logprobs": true, "top_logprobs": 5 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-test",
                "object": "chat.completion",
                "created": 1_700_000_000,
                "model": "gpt-4o-mini",
                "choices": logprobs_choice()
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = mock_client(&server);
        let tokens = token_probabilities(&client, "gpt-4o-mini", "The sky is").await.unwrap();
        let text: String = tokens.iter().map(|t| t.token.as_str()).collect();
        assert_eq!(text, "blue.");
    }

    #[tokio::test]
    async fn test_stream_complete_collects_deltas() {
        let chunk = |content: serde_json::Value, finish: serde_json::Value| {
            json!({
                "id": "chatcmpl-test",
                "object": "chat.completion.chunk",
                "created": 1_700_000_000,
                "model": "gpt-4o-mini",
                "choices": [{ "index": 0, "delta": { "content": content }, "finish_reason": finish }]
            })
        };
        let body = format!(
            "data: {}\n\ndata: {}\n\ndata: {}\n\ndata: [DONE]\n\n",
            chunk(json!("Hello"), json!(null)),
            chunk(json!(", world"), json!(null)),
            chunk(json!(null), json!("stop")),
        );

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({ "stream": true })))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
            .mount(&server)
            .await;

        let client = mock_client(&server);
        let mut pieces = Vec::new();
        let reply = stream_complete(&client, "gpt-4o-mini", "Say hello", |delta| pieces.push(delta.to_string()))
            .await
            .unwrap();
        assert_eq!(reply, "Hello, world");
        assert_eq!(pieces, vec!["Hello", ", world"]);
    }
}
