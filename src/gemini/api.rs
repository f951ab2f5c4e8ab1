use super::dto::{GenerateContentRequest, GenerateContentResponse};
use super::model::{InferenceClient, InferenceError, InferenceRequest, InferenceResponse};
use crate::config::model::GeminiConfig;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::RetryTransientMiddleware;
use tracing::{debug, error};

const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiAPI {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: String,
}

impl GeminiAPI {
    pub fn new(config: &GeminiConfig) -> Self {
        let client = ClientBuilder::new(Client::new())
            .with(RetryTransientMiddleware::new_with_policy(
                ExponentialBackoff::builder().build_with_max_retries(config.max_retries),
            ))
            .build();

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl InferenceClient for GeminiAPI {
    #[tracing::instrument(skip(self, request), fields(model = %request.model))]
    async fn generate(&self, request: InferenceRequest) -> Result<InferenceResponse, InferenceError> {
        let body = serde_json::to_string(&GenerateContentRequest::from(&request))
            .map_err(|err| InferenceError::Transport(err.to_string()))?;

        debug!("Sending {} turn(s)", request.turns.len());

        let response = self
            .client
            .post(self.endpoint(&request.model))
            .header(API_KEY_HEADER, &self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|err| InferenceError::Transport(err.to_string()))?;

        let status = response.status();
        let text_body = response
            .text()
            .await
            .map_err(|err| InferenceError::Transport(err.to_string()))?;

        if !status.is_success() {
            error!("Inference request failed with {}", status);
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body: text_body,
            });
        }

        match serde_json::from_str::<GenerateContentResponse>(&text_body) {
            Ok(parsed_response) => Ok(parsed_response.to_model()),
            Err(e) => {
                error!("Response parse failed: {:?}", e);
                Err(InferenceError::InvalidResponse(e.to_string()))
            }
        }
    }
}
