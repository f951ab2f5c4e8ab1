use super::model::Event;
use reqwest::Url;

const SEARCH_URL: &str = "https://www.google.com/search";
const MAPS_URL: &str = "https://www.google.com/maps/search/";
const INSTAGRAM_TAGS_URL: &str = "https://www.instagram.com/explore/tags";

/// Where to dig further when the generated description is thin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLinks {
    pub web_search: String,
    pub instagram: String,
    pub maps: String,
}

impl EventLinks {
    pub fn for_event(event: &Event) -> Self {
        let search_terms = format!("{} {} Paris", event.title, event.location);
        let map_terms = format!("{} Paris", event.location);
        let hashtag: String = event
            .title
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();

        Self {
            web_search: with_query(SEARCH_URL, &[("q", search_terms.as_str())]),
            instagram: format!("{}/{}/", INSTAGRAM_TAGS_URL, hashtag),
            maps: with_query(MAPS_URL, &[("api", "1"), ("query", map_terms.as_str())]),
        }
    }
}

fn with_query(base: &str, params: &[(&str, &str)]) -> String {
    match Url::parse_with_params(base, params) {
        Ok(url) => url.to_string(),
        Err(_) => base.to_string(),
    }
}
