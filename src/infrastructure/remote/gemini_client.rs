//! Gemini REST API クライアント
//!
//! - 説明取得: `POST {base}/models/{model}:generateContent`（画像 + テキスト）
//! - 再生成: `POST {base}/models/{model}:predict`（Imagen）
//! - 抽出: `POST {base}/models/{model}:generateContent` + `responseModalities: ["IMAGE"]`
//!
//! 認証は `x-goog-api-key` ヘッダー

use crate::config::RemoteServiceConfig;
use crate::domain::design::prompts::{describe_prompt, extract_prompt, recreate_prompt};
use crate::domain::design::{DesignError, DesignOperation, DesignService, ProductType};
use crate::domain::shared::ImageBlob;
use crate::domain::shared::value_objects::{MIME_JPEG, MIME_PNG};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};

const API_KEY_HEADER: &str = "x-goog-api-key";
const ERROR_BODY_LIMIT: usize = 200;

pub struct GeminiDesignService {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    describe_model: String,
    recreate_model: String,
    extract_model: String,
}

impl std::fmt::Debug for GeminiDesignService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiDesignService")
            .field("base_url", &self.base_url)
            .field("describe_model", &self.describe_model)
            .field("recreate_model", &self.recreate_model)
            .field("extract_model", &self.extract_model)
            .finish_non_exhaustive()
    }
}

impl GeminiDesignService {
    pub fn new(config: &RemoteServiceConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        debug!(
            base_url = %config.base_url,
            timeout = config.timeout_secs,
            "GeminiDesignService 初期化"
        );

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            describe_model: config.describe_model.clone(),
            recreate_model: config.recreate_model.clone(),
            extract_model: config.extract_model.clone(),
        })
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        operation: DesignOperation,
        url: &str,
        body: &B,
    ) -> Result<String, DesignError> {
        let response = self
            .http_client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| DesignError::remote(operation, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DesignError::remote(operation, e.to_string()))?;

        if !status.is_success() {
            warn!(status = %status, %operation, "Gemini API エラー応答");
            return Err(DesignError::remote(
                operation,
                parse_error_message(&body).unwrap_or_else(|| fallback_error_message(status, &body)),
            ));
        }
        Ok(body)
    }
}

#[async_trait]
impl DesignService for GeminiDesignService {
    #[instrument(skip(self, images), fields(image_count = images.len(), model = %self.describe_model))]
    async fn describe(
        &self,
        images: &[ImageBlob],
        product: ProductType,
    ) -> Result<String, DesignError> {
        let request = GenerateContentRequest::new(
            images,
            describe_prompt(product, images.len()),
            None,
        );
        let url = self.endpoint(&self.describe_model, "generateContent");
        let body = self.post(DesignOperation::Describe, &url, &request).await?;
        parse_description(&body)
    }

    #[instrument(skip(self, description), fields(model = %self.recreate_model))]
    async fn recreate(&self, description: &str) -> Result<ImageBlob, DesignError> {
        let request = PredictRequest::new(recreate_prompt(description));
        let url = self.endpoint(&self.recreate_model, "predict");
        let body = self.post(DesignOperation::Recreate, &url, &request).await?;
        parse_prediction(&body)
    }

    #[instrument(skip(self, images), fields(image_count = images.len(), model = %self.extract_model))]
    async fn extract_original(
        &self,
        images: &[ImageBlob],
        product: ProductType,
    ) -> Result<ImageBlob, DesignError> {
        let request = GenerateContentRequest::new(
            images,
            extract_prompt(product),
            Some(GenerationConfig {
                response_modalities: vec!["IMAGE"],
            }),
        );
        let url = self.endpoint(&self.extract_model, "generateContent");
        let body = self.post(DesignOperation::Extract, &url, &request).await?;
        parse_inline_image(&body)
    }

    fn provider_name(&self) -> &str {
        "gemini"
    }
}

// リクエスト

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// 画像パートを先に並べ、最後にプロンプトを置く
    fn new(images: &[ImageBlob], prompt: String, generation_config: Option<GenerationConfig>) -> Self {
        let mut parts: Vec<RequestPart> = images
            .iter()
            .map(|image| {
                RequestPart::InlineData(InlineData {
                    mime_type: image.mime_type().to_string(),
                    data: STANDARD.encode(image.data()),
                })
            })
            .collect();
        parts.push(RequestPart::Text(prompt));

        Self {
            contents: vec![Content { parts }],
            generation_config,
        }
    }
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum RequestPart {
    InlineData(InlineData),
    Text(String),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
struct PredictRequest {
    instances: Vec<PredictInstance>,
    parameters: PredictParameters,
}

impl PredictRequest {
    fn new(prompt: String) -> Self {
        Self {
            instances: vec![PredictInstance { prompt }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: "1:1",
                output_options: OutputOptions {
                    mime_type: MIME_JPEG,
                },
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct PredictInstance {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u32,
    aspect_ratio: &'static str,
    output_options: OutputOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputOptions {
    mime_type: &'static str,
}

// レスポンス

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn first_parts(&self) -> &[ResponsePart] {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| content.parts.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    #[serde(default)]
    bytes_base64_encoded: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

fn parse_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error.message)
        .filter(|message| !message.trim().is_empty())
}

/// エラーエンベロープでない場合は本文の先頭だけを使う
fn fallback_error_message(status: reqwest::StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return format!("HTTP {status}");
    }
    let truncated: String = body.chars().take(ERROR_BODY_LIMIT).collect();
    if truncated.len() < body.len() {
        format!("HTTP {status}: {truncated}...")
    } else {
        format!("HTTP {status}: {truncated}")
    }
}

fn invalid_response(operation: DesignOperation, error: impl std::fmt::Display) -> DesignError {
    DesignError::remote(operation, format!("Invalid response: {error}"))
}

/// 最初の候補のテキストパートを連結して説明文とする
fn parse_description(body: &str) -> Result<String, DesignError> {
    let operation = DesignOperation::Describe;
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| invalid_response(operation, e))?;

    let text: String = response
        .first_parts()
        .iter()
        .filter_map(|part| part.text.as_deref())
        .collect();

    if text.trim().is_empty() {
        return Err(DesignError::EmptyResult { operation });
    }
    Ok(text)
}

fn parse_prediction(body: &str) -> Result<ImageBlob, DesignError> {
    let operation = DesignOperation::Recreate;
    let response: PredictResponse =
        serde_json::from_str(body).map_err(|e| invalid_response(operation, e))?;

    let prediction = response
        .predictions
        .into_iter()
        .find(|p| p.bytes_base64_encoded.is_some())
        .ok_or(DesignError::EmptyResult { operation })?;

    let encoded = prediction.bytes_base64_encoded.unwrap_or_default();
    decode_image(
        operation,
        &encoded,
        prediction.mime_type.as_deref().unwrap_or(MIME_JPEG),
    )
}

/// 最初の候補から最初のインライン画像を取り出す
fn parse_inline_image(body: &str) -> Result<ImageBlob, DesignError> {
    let operation = DesignOperation::Extract;
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| invalid_response(operation, e))?;

    let inline = response
        .first_parts()
        .iter()
        .find_map(|part| part.inline_data.as_ref())
        .ok_or(DesignError::EmptyResult { operation })?;

    let mime_type = if inline.mime_type.is_empty() {
        MIME_PNG
    } else {
        inline.mime_type.as_str()
    };
    decode_image(operation, &inline.data, mime_type)
}

fn decode_image(
    operation: DesignOperation,
    encoded: &str,
    mime_type: &str,
) -> Result<ImageBlob, DesignError> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| invalid_response(operation, e))?;
    if bytes.is_empty() {
        return Err(DesignError::EmptyResult { operation });
    }
    Ok(ImageBlob::new(bytes, mime_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn service(server: &mockito::ServerGuard) -> GeminiDesignService {
        let config = RemoteServiceConfig::new("test-key").with_base_url(server.url());
        GeminiDesignService::new(&config).unwrap()
    }

    #[test]
    fn test_generate_content_request_shape() {
        let request = GenerateContentRequest::new(
            &[ImageBlob::jpeg(b"abc".to_vec())],
            "prompt".to_string(),
            Some(GenerationConfig {
                response_modalities: vec!["IMAGE"],
            }),
        );
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{
                    "parts": [
                        {"inlineData": {"mimeType": "image/jpeg", "data": "YWJj"}},
                        {"text": "prompt"}
                    ]
                }],
                "generationConfig": {"responseModalities": ["IMAGE"]}
            })
        );
    }

    #[test]
    fn test_predict_request_shape() {
        let value = serde_json::to_value(PredictRequest::new("draw".to_string())).unwrap();
        assert_eq!(value["instances"][0]["prompt"], "draw");
        assert_eq!(value["parameters"]["sampleCount"], 1);
        assert_eq!(value["parameters"]["aspectRatio"], "1:1");
        assert_eq!(value["parameters"]["outputOptions"]["mimeType"], "image/jpeg");
    }

    #[test]
    fn test_parse_description_joins_text_parts() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"A red "},{"text":"circle"}]}}]}"#;
        assert_eq!(parse_description(body).unwrap(), "A red circle");
    }

    #[test]
    fn test_parse_description_blank_is_empty_result() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#;
        assert_eq!(
            parse_description(body),
            Err(DesignError::EmptyResult {
                operation: DesignOperation::Describe
            })
        );
        assert!(parse_description(r#"{"candidates":[]}"#).is_err());
    }

    #[test]
    fn test_parse_inline_image_skips_text_parts() {
        let body = r#"{"candidates":[{"content":{"parts":[
            {"text":"here you go"},
            {"inlineData":{"mimeType":"image/png","data":"cG5n"}}
        ]}}]}"#;
        let image = parse_inline_image(body).unwrap();
        assert_eq!(image.data(), b"png");
        assert_eq!(image.mime_type(), "image/png");
    }

    #[test]
    fn test_parse_inline_image_without_image_part() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"sorry"}]}}]}"#;
        assert_eq!(
            parse_inline_image(body),
            Err(DesignError::EmptyResult {
                operation: DesignOperation::Extract
            })
        );
    }

    #[test]
    fn test_parse_prediction_without_images() {
        assert_eq!(
            parse_prediction(r#"{"predictions":[]}"#),
            Err(DesignError::EmptyResult {
                operation: DesignOperation::Recreate
            })
        );
        assert_eq!(
            parse_prediction("{}"),
            Err(DesignError::EmptyResult {
                operation: DesignOperation::Recreate
            })
        );
    }

    #[test]
    fn test_fallback_error_message_truncates_body() {
        let body = "x".repeat(500);
        let message = fallback_error_message(reqwest::StatusCode::BAD_GATEWAY, &body);
        assert!(message.starts_with("HTTP 502 Bad Gateway: xxx"));
        assert!(message.ends_with("..."));
        assert!(message.len() < 250);
    }

    #[test]
    fn test_parse_error_message() {
        assert_eq!(
            parse_error_message(r#"{"error":{"code":429,"message":"Quota exceeded"}}"#).as_deref(),
            Some("Quota exceeded")
        );
        assert_eq!(parse_error_message("<html>"), None);
    }

    #[tokio::test]
    async fn test_describe_calls_generate_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::Regex("Analyze the following image of a mug".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"A blue anchor"}]}}]}"#)
            .create_async()
            .await;

        let description = service(&server)
            .describe(&[ImageBlob::jpeg(b"photo".to_vec())], ProductType::Mug)
            .await
            .unwrap();
        assert_eq!(description, "A blue anchor");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_recreate_calls_predict() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/imagen-4.0-generate-001:predict")
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::PartialJson(json!({
                "parameters": {"sampleCount": 1, "aspectRatio": "1:1"}
            })))
            .with_status(200)
            .with_body(r#"{"predictions":[{"bytesBase64Encoded":"anBlZw==","mimeType":"image/jpeg"}]}"#)
            .create_async()
            .await;

        let image = service(&server).recreate("A blue anchor").await.unwrap();
        assert_eq!(image.data(), b"jpeg");
        assert_eq!(image.mime_type(), "image/jpeg");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_extract_requests_image_modality() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash-image:generateContent")
            .match_body(Matcher::PartialJson(json!({
                "generationConfig": {"responseModalities": ["IMAGE"]}
            })))
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"inlineData":{"mimeType":"image/png","data":"cG5n"}}]}}]}"#)
            .create_async()
            .await;

        let image = service(&server)
            .extract_original(&[ImageBlob::jpeg(b"photo".to_vec())], ProductType::TShirt)
            .await
            .unwrap();
        assert_eq!(image.data(), b"png");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_provider_error_message_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .with_status(503)
            .with_body(r#"{"error":{"code":503,"message":"The model is overloaded."}}"#)
            .create_async()
            .await;

        let error = service(&server)
            .describe(&[ImageBlob::jpeg(b"photo".to_vec())], ProductType::Item)
            .await
            .unwrap_err();
        assert_eq!(
            error,
            DesignError::remote(DesignOperation::Describe, "The model is overloaded.")
        );
        assert_eq!(error.user_message(), "The model is overloaded.");
    }

    #[tokio::test]
    async fn test_error_without_envelope_uses_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/imagen-4.0-generate-001:predict")
            .with_status(500)
            .with_body("internal")
            .create_async()
            .await;

        let error = service(&server).recreate("x").await.unwrap_err();
        assert_eq!(
            error.user_message(),
            "HTTP 500 Internal Server Error: internal"
        );
    }
}
