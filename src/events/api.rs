use super::dto::{EventResponse, EventsResponse};
use super::model::Event;
use crate::gemini::model::{
    parse_structured, GroundingSource, GroundingTool, InferenceClient, InferenceRequest,
};
use chrono::{NaiveDate, Utc};
use itertools::Itertools;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

pub const INITIAL_QUERY: &str =
    "all student events, parties, and gatherings in Paris area for the next 7 days";
pub const DEFAULT_SEARCH_QUERY: &str = "upcoming parties and student events in Paris and suburbs";

const EMPTY_RESPONSE: &str = r#"{"events": []}"#;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscoveredEvents {
    pub events: Vec<Event>,
    pub sources: Vec<GroundingSource>,
}

pub struct EventQueryService {
    client: Arc<dyn InferenceClient>,
    model: String,
}

impl EventQueryService {
    pub fn new(client: Arc<dyn InferenceClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /**
    Never fails: transport errors and output that doesn't fit the schema both
    come back as an empty result.
    */
    #[tracing::instrument(skip(self))]
    pub async fn discover_events(&self, query: &str) -> DiscoveredEvents {
        let query = match query.trim() {
            "" => DEFAULT_SEARCH_QUERY,
            query => query,
        };

        let request = InferenceRequest::new(
            self.model.clone(),
            build_prompt(Utc::now().date_naive(), query),
        )
        .with_schema(events_schema())
        .with_grounding(GroundingTool::WebSearch);

        let response = match self.client.generate(request).await {
            Ok(response) => response,
            Err(e) => {
                error!("Event discovery failed: {}", e);
                return DiscoveredEvents::default();
            }
        };

        let text = response.text.as_deref().unwrap_or(EMPTY_RESPONSE);

        match parse_structured::<EventsResponse>(text) {
            Ok(parsed_response) => {
                let events = unique_events(parsed_response.events);

                info!("Discovered {} events", events.len());

                DiscoveredEvents {
                    events,
                    sources: response.web_sources(),
                }
            }
            Err(e) => {
                error!("Failed to parse events response: {}", e);
                DiscoveredEvents::default()
            }
        }
    }
}

/// Ids only have to be unique within one result set, the first occurrence wins.
fn unique_events(responses: Vec<EventResponse>) -> Vec<Event> {
    let total = responses.len();

    let events: Vec<Event> = responses
        .into_iter()
        .map(EventResponse::to_model)
        .map(|mut event| {
            if event.id.is_empty() {
                event.id = Uuid::new_v4().to_string();
            }
            event
        })
        .unique_by(|event| event.id.clone())
        .collect();

    if events.len() < total {
        warn!("Dropped {} events with duplicate ids", total - events.len());
    }

    events
}

pub fn build_prompt(today: NaiveDate, query: &str) -> String {
    format!(
        "Today is {today}. Find upcoming events in Paris for international students: {query}.

CURATION RULES:
- Include ALL types of events, including those that require advanced local knowledge, complex late-night travel (suburbs/banlieue), or those with minimal public information.
- IMPORTANT: For events that are centrally located (Arrondissements 1-11), well-documented, and easy to access, set 'isAccessible' to true.
- For events in the suburbs, niche underground parties, or places with complex access, set 'isAccessible' to false.
- If information is sparse, describe what is known and suggest how to find more (e.g., 'Check Instagram tags').",
        today = today.format("%Y-%m-%d"),
    )
}

pub fn events_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "events": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "title": { "type": "STRING" },
                        "category": { "type": "STRING" },
                        "date": { "type": "STRING" },
                        "isoDate": { "type": "STRING" },
                        "startTime": {
                            "type": "STRING",
                            "description": "Start time in HH:mm format if available, otherwise null"
                        },
                        "endTime": {
                            "type": "STRING",
                            "description": "End time in HH:mm format if available, otherwise null"
                        },
                        "location": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "vibe": { "type": "STRING" },
                        "isAccessible": {
                            "type": "BOOLEAN",
                            "description": "True ONLY if central, well-documented, and beginner-friendly."
                        },
                        "accessibilityReason": {
                            "type": "STRING",
                            "description": "Briefly why it is a 'Safe Bet' or why it might be challenging for a newcomer."
                        }
                    },
                    "required": [
                        "id", "title", "category", "date", "isoDate",
                        "location", "description", "vibe", "isAccessible"
                    ]
                }
            }
        }
    })
}
