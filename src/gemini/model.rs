use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const WEB_SOURCE_TITLE: &str = "View Source";
pub const MAPS_SOURCE_TITLE: &str = "View on Maps";
pub const MISSING_URI: &str = "#";

lazy_static! {
    static ref CODE_FENCE: Regex =
        Regex::new(r"(?s)^\s*```[a-zA-Z]*\s*\n(.*?)\n?\s*```\s*$").unwrap();
}

/// Anything able to answer a prompt, optionally constrained to a JSON schema
/// and grounded on web or map results.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn generate(&self, request: InferenceRequest) -> Result<InferenceResponse, InferenceError>;
}

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("output does not match the requested schema: {0}")]
    MalformedOutput(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundingTool {
    WebSearch,
    Maps,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InferenceRequest {
    pub model: String,
    pub turns: Vec<Turn>,
    pub system_instruction: Option<String>,
    /// When set, the response text must be JSON conforming to this schema.
    pub response_schema: Option<Value>,
    pub grounding: Option<GroundingTool>,
    /// Only used by map grounding.
    pub location: Option<Location>,
}

impl InferenceRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            turns: vec![Turn::user(prompt)],
            system_instruction: None,
            response_schema: None,
            grounding: None,
            location: None,
        }
    }

    pub fn with_turns(mut self, turns: Vec<Turn>) -> Self {
        self.turns = turns;
        self
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    pub fn with_grounding(mut self, tool: GroundingTool) -> Self {
        self.grounding = Some(tool);
        self
    }

    pub fn with_location(mut self, location: Option<Location>) -> Self {
        self.location = location;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InferenceResponse {
    pub text: Option<String>,
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GroundingChunk {
    Web(Attribution),
    Maps(Attribution),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attribution {
    pub title: Option<String>,
    pub uri: Option<String>,
}

impl InferenceResponse {
    pub fn web_sources(&self) -> Vec<GroundingSource> {
        self.grounding_chunks
            .iter()
            .filter_map(|chunk| match chunk {
                GroundingChunk::Web(attribution) => {
                    Some(GroundingSource::from_attribution(attribution, WEB_SOURCE_TITLE))
                }
                GroundingChunk::Maps(_) => None,
            })
            .collect()
    }

    pub fn map_sources(&self) -> Vec<GroundingSource> {
        self.grounding_chunks
            .iter()
            .filter_map(|chunk| match chunk {
                GroundingChunk::Maps(attribution) => {
                    Some(GroundingSource::from_attribution(attribution, MAPS_SOURCE_TITLE))
                }
                GroundingChunk::Web(_) => None,
            })
            .collect()
    }
}

/// A citation shown next to a generated answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub title: String,
    pub uri: String,
}

impl GroundingSource {
    fn from_attribution(attribution: &Attribution, fallback_title: &str) -> Self {
        Self {
            title: non_blank(&attribution.title).unwrap_or_else(|| fallback_title.to_string()),
            uri: non_blank(&attribution.uri).unwrap_or_else(|| MISSING_URI.to_string()),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Deserializes schema-constrained output. Models grounded on search tend to
/// wrap JSON in a Markdown fence, which is dropped first.
pub fn parse_structured<T: DeserializeOwned>(text: &str) -> Result<T, InferenceError> {
    let payload = match CODE_FENCE.captures(text) {
        Some(captures) => captures.get(1).map_or("", |body| body.as_str()),
        None => text,
    };

    serde_json::from_str(payload).map_err(|err| InferenceError::MalformedOutput(err.to_string()))
}
