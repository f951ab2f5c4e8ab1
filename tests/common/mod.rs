#![allow(dead_code)]

use async_trait::async_trait;
use escale::events::model::Event;
use escale::gemini::model::{InferenceClient, InferenceError, InferenceRequest, InferenceResponse};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Answers with queued responses, in order, and records every request.
#[derive(Default)]
pub struct FakeClient {
    responses: Mutex<VecDeque<Result<InferenceResponse, InferenceError>>>,
    requests: Mutex<Vec<InferenceRequest>>,
}

impl FakeClient {
    pub fn answering(responses: Vec<Result<InferenceResponse, InferenceError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_text(text: &str) -> Self {
        Self::answering(vec![Ok(InferenceResponse {
            text: Some(text.to_string()),
            grounding_chunks: vec![],
        })])
    }

    pub fn failing() -> Self {
        Self::answering(vec![Err(InferenceError::Transport(
            "connection reset".to_string(),
        ))])
    }

    pub fn requests(&self) -> Vec<InferenceRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceClient for FakeClient {
    async fn generate(&self, request: InferenceRequest) -> Result<InferenceResponse, InferenceError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(InferenceError::Transport("no more responses".to_string())))
    }
}

/// Never answers, for cancelling requests mid-flight.
pub struct PendingClient;

#[async_trait]
impl InferenceClient for PendingClient {
    async fn generate(&self, _request: InferenceRequest) -> Result<InferenceResponse, InferenceError> {
        std::future::pending().await
    }
}

pub fn event(id: &str, iso_date: &str) -> Event {
    Event {
        id: id.to_string(),
        title: format!("Event {id}"),
        category: "Social".to_string(),
        date: iso_date.to_string(),
        iso_date: iso_date.to_string(),
        start_time: None,
        end_time: None,
        location: "Le Marais".to_string(),
        description: "Meet other students".to_string(),
        vibe: "Friendly".to_string(),
        is_accessible: true,
        accessibility_reason: Some("Central, metro Saint-Paul".to_string()),
    }
}
