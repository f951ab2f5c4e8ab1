use crate::gemini::model::{
    GroundingSource, GroundingTool, InferenceClient, InferenceError, InferenceRequest, Location,
};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceRecommendations {
    pub text: String,
    pub sources: Vec<GroundingSource>,
}

pub struct PlaceQueryService {
    client: Arc<dyn InferenceClient>,
    model: String,
}

impl PlaceQueryService {
    pub fn new(client: Arc<dyn InferenceClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Narrative answer grounded on maps, seeded with the user's position when known.
    /// Failures are left to the caller.
    #[tracing::instrument(skip(self))]
    pub async fn explore_places(
        &self,
        query: &str,
        location: Option<Location>,
    ) -> Result<PlaceRecommendations, InferenceError> {
        let request = InferenceRequest::new(self.model.clone(), build_prompt(query))
            .with_grounding(GroundingTool::Maps)
            .with_location(location);

        let response = self.client.generate(request).await?;
        let sources = response.map_sources();

        info!("Got recommendations with {} map sources", sources.len());

        Ok(PlaceRecommendations {
            text: response.text.unwrap_or_default(),
            sources,
        })
    }
}

pub fn build_prompt(query: &str) -> String {
    format!(
        "Recommend student spots in Paris for: {query}. Include both famous central spots and hidden local gems. Mark if they are easy to reach or require local expertise."
    )
}
