use super::model::{
    Attribution, GroundingChunk, GroundingTool, InferenceRequest, InferenceResponse, Location,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const JSON_MIME_TYPE: &str = "application/json";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_config: Option<ToolConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl From<&InferenceRequest> for GenerateContentRequest {
    fn from(request: &InferenceRequest) -> Self {
        let contents = request
            .turns
            .iter()
            .map(|turn| Content {
                role: Some(<&'static str>::from(turn.role).to_string()),
                parts: vec![Part::text(&turn.text)],
            })
            .collect();

        let tools = match request.grounding {
            None => vec![],
            Some(GroundingTool::WebSearch) => vec![Tool {
                google_search: Some(Map::new()),
                google_maps: None,
            }],
            Some(GroundingTool::Maps) => vec![Tool {
                google_search: None,
                google_maps: Some(Map::new()),
            }],
        };

        let tool_config = match (request.grounding, request.location) {
            (Some(GroundingTool::Maps), Some(location)) => Some(ToolConfig {
                retrieval_config: RetrievalConfig {
                    lat_lng: location.into(),
                },
            }),
            _ => None,
        };

        Self {
            contents,
            system_instruction: request.system_instruction.as_ref().map(|instruction| Content {
                role: None,
                parts: vec![Part::text(instruction)],
            }),
            tools,
            tool_config,
            generation_config: request.response_schema.as_ref().map(|schema| GenerationConfig {
                response_mime_type: JSON_MIME_TYPE.to_string(),
                response_schema: schema.clone(),
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Set on thought summaries, which are never part of the answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            thought: None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_search: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_maps: Option<Map<String, Value>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolConfig {
    pub retrieval_config: RetrievalConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalConfig {
    pub lat_lng: LatLng,
}

#[derive(Debug, Serialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Location> for LatLng {
    fn from(location: Location) -> Self {
        Self {
            latitude: location.lat,
            longitude: location.lng,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<ResponseGroundingChunk>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseGroundingChunk {
    pub web: Option<ResponseAttribution>,
    pub maps: Option<ResponseAttribution>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseAttribution {
    pub title: Option<String>,
    pub uri: Option<String>,
}

impl From<ResponseAttribution> for Attribution {
    fn from(dto: ResponseAttribution) -> Self {
        Self {
            title: dto.title,
            uri: dto.uri,
        }
    }
}

impl GenerateContentResponse {
    /// Only the first candidate counts. Its text parts, minus thoughts, are
    /// concatenated and chunks that are neither web nor maps are dropped.
    pub fn to_model(self) -> InferenceResponse {
        let Some(candidate) = self.candidates.into_iter().next() else {
            return InferenceResponse::default();
        };

        let text = candidate.content.map(|content| {
            content
                .parts
                .into_iter()
                .filter(|part| part.thought != Some(true))
                .filter_map(|part| part.text)
                .collect::<String>()
        });

        let grounding_chunks = candidate
            .grounding_metadata
            .map(|metadata| metadata.grounding_chunks)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|chunk| match (chunk.web, chunk.maps) {
                (Some(web), _) => Some(GroundingChunk::Web(web.into())),
                (None, Some(maps)) => Some(GroundingChunk::Maps(maps.into())),
                (None, None) => None,
            })
            .collect();

        InferenceResponse {
            text: text.filter(|text| !text.is_empty()),
            grounding_chunks,
        }
    }
}
