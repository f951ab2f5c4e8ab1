use crate::events::model::Event;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("share was cancelled or rejected: {0}")]
    Rejected(String),
    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareContent {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl ShareContent {
    pub fn for_event(event: &Event, app_url: &str) -> Self {
        let time_info = event
            .schedule_label()
            .map(|label| format!(" at {label}"))
            .unwrap_or_default();

        Self {
            title: event.title.clone(),
            text: format!(
                "🇫🇷 *{}* in Paris!\n📅 {}{}\n📍 {}\n\nCheck it out on L'Escale Paris:",
                event.title, event.date, time_info, event.location
            ),
            url: app_url.to_string(),
        }
    }

    pub fn clipboard_text(&self) -> String {
        format!("{}\n{}", self.text, self.url)
    }
}

/// Platform sharing capabilities.
pub trait ShareTarget {
    fn supports_native_share(&self) -> bool;

    fn share_natively(&self, content: &ShareContent) -> Result<(), ShareError>;

    fn copy_to_clipboard(&self, text: &str) -> Result<(), ShareError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Copied,
    Failed,
}

/// Native share sheet when the platform has one, clipboard otherwise.
#[tracing::instrument(skip_all, fields(event = %event.id))]
pub fn share_event(event: &Event, app_url: &str, target: &dyn ShareTarget) -> ShareOutcome {
    let content = ShareContent::for_event(event, app_url);

    let result = if target.supports_native_share() {
        target.share_natively(&content).map(|_| ShareOutcome::Shared)
    } else {
        target
            .copy_to_clipboard(&content.clipboard_text())
            .map(|_| ShareOutcome::Copied)
    };

    result.unwrap_or_else(|e| {
        error!("Error sharing: {}", e);
        ShareOutcome::Failed
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct FakeTarget {
        native: bool,
        copied: RefCell<Option<String>>,
    }

    impl ShareTarget for FakeTarget {
        fn supports_native_share(&self) -> bool {
            self.native
        }

        fn share_natively(&self, _content: &ShareContent) -> Result<(), ShareError> {
            Err(ShareError::Rejected("dismissed".to_string()))
        }

        fn copy_to_clipboard(&self, text: &str) -> Result<(), ShareError> {
            *self.copied.borrow_mut() = Some(text.to_string());
            Ok(())
        }
    }

    fn event() -> Event {
        Event {
            id: "fdlm".to_string(),
            title: "Fête de la Musique".to_string(),
            category: "Party".to_string(),
            date: "Saturday 21 June".to_string(),
            iso_date: "2025-06-21T18:00:00+02:00".to_string(),
            start_time: Some("18:00".to_string()),
            end_time: Some("02:00".to_string()),
            location: "Everywhere".to_string(),
            description: "Free concerts across the city".to_string(),
            vibe: "Festive".to_string(),
            is_accessible: true,
            accessibility_reason: None,
        }
    }

    #[test_log::test]
    fn should_format_share_text_with_time_range() {
        let content = ShareContent::for_event(&event(), "https://escale.example");

        assert_eq!(
            content.text,
            "🇫🇷 *Fête de la Musique* in Paris!\n📅 Saturday 21 June at 18:00 - 02:00\n📍 Everywhere\n\nCheck it out on L'Escale Paris:"
        );
    }

    #[test_log::test]
    fn should_fall_back_to_clipboard_without_native_share() {
        let target = FakeTarget {
            native: false,
            copied: RefCell::new(None),
        };

        let outcome = share_event(&event(), "https://escale.example", &target);

        assert_eq!(outcome, ShareOutcome::Copied);
        assert!(target
            .copied
            .borrow()
            .as_deref()
            .unwrap()
            .ends_with("Check it out on L'Escale Paris:\nhttps://escale.example"));
    }

    #[test_log::test]
    fn when_native_share_fails_should_report_failure() {
        let target = FakeTarget {
            native: true,
            copied: RefCell::new(None),
        };

        assert_eq!(
            share_event(&event(), "https://escale.example", &target),
            ShareOutcome::Failed
        );
        assert!(target.copied.borrow().is_none());
    }
}
