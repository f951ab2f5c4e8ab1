use super::api::{PlaceQueryService, PlaceRecommendations};
use crate::gemini::model::Location;
use crate::loading::LoadingGuard;
use tracing::error;

pub const DEFAULT_PLACES_QUERY: &str = "best cheap bars for students";

/// One-tap searches offered above the explorer's search box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumIter, strum::Display)]
pub enum Shortcut {
    Bars,
    Cafes,
    Studying,
}

impl Shortcut {
    pub fn query(&self) -> &'static str {
        match self {
            Shortcut::Bars => "cheapest happy hour bars for students",
            Shortcut::Cafes => "study friendly cafes with wifi",
            Shortcut::Studying => "quiet public libraries and study spaces",
        }
    }
}

/// Explorer view-state. A failed lookup keeps whatever was shown before.
#[derive(Debug, Default)]
pub struct Explorer {
    pub query: String,
    location: Option<Location>,
    results: Option<PlaceRecommendations>,
    loading: bool,
}

impl Explorer {
    pub fn new(location: Option<Location>) -> Self {
        Self {
            location,
            ..Default::default()
        }
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub fn set_location(&mut self, location: Option<Location>) {
        self.location = location;
    }

    pub fn results(&self) -> Option<&PlaceRecommendations> {
        self.results.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Custom query first, then the typed query, then the default one.
    pub fn effective_query<'a>(&'a self, custom: Option<&'a str>) -> &'a str {
        custom
            .filter(|q| !q.trim().is_empty())
            .or(Some(self.query.as_str()).filter(|q| !q.trim().is_empty()))
            .unwrap_or(DEFAULT_PLACES_QUERY)
    }

    pub async fn explore(&mut self, service: &PlaceQueryService, custom: Option<&str>) {
        let query = self.effective_query(custom).to_string();

        let location = self.location;

        let result = {
            let _loading = LoadingGuard::new(&mut self.loading);
            service.explore_places(&query, location).await
        };

        match result {
            Ok(results) => self.results = Some(results),
            Err(e) => error!("Place exploration failed: {}", e),
        }
    }

    pub async fn explore_shortcut(&mut self, service: &PlaceQueryService, shortcut: Shortcut) {
        self.explore(service, Some(shortcut.query())).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn should_prefer_custom_then_typed_then_default_query() {
        let mut explorer = Explorer::new(None);

        assert_eq!(explorer.effective_query(None), DEFAULT_PLACES_QUERY);

        explorer.query = "rooftops".to_string();
        assert_eq!(explorer.effective_query(None), "rooftops");
        assert_eq!(
            explorer.effective_query(Some(Shortcut::Cafes.query())),
            "study friendly cafes with wifi"
        );
        assert_eq!(explorer.effective_query(Some("  ")), "rooftops");
    }
}
