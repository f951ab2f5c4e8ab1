use super::model::Event;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct EventsResponse {
    #[serde(default)]
    pub events: Vec<EventResponse>,
}

// Note: the optional clock fields need the custom deserializer, models
// return them as null, "", "null" or omit them entirely
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: String,
    pub title: String,
    pub category: String,
    pub date: String,
    pub iso_date: String,
    #[serde(default, deserialize_with = "deserialize_optional_str")]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_str")]
    pub end_time: Option<String>,
    pub location: String,
    pub description: String,
    pub vibe: String,
    pub is_accessible: bool,
    #[serde(default, deserialize_with = "deserialize_optional_str")]
    pub accessibility_reason: Option<String>,
}

impl EventResponse {
    pub fn to_model(self) -> Event {
        Event {
            id: self.id.trim().to_string(),
            title: self.title,
            category: self.category,
            date: self.date,
            iso_date: self.iso_date,
            start_time: self.start_time,
            end_time: self.end_time,
            location: self.location,
            description: self.description,
            vibe: self.vibe,
            is_accessible: self.is_accessible,
            accessibility_reason: self.accessibility_reason,
        }
    }
}

fn deserialize_optional_str<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(d)? {
        Value::String(s) if !s.trim().is_empty() && !s.eq_ignore_ascii_case("null") => Some(s),
        _ => None,
    })
}
