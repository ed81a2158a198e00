use serde::{Deserialize, Serialize};

/// One agenda page in the chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    /// Address the page was served from
    pub url: String,
    /// `YYYY-MM-DD HH:MM` when the page date could be parsed
    pub date: String,
    /// Older event to visit next; `None` ends the chain
    pub previous_link: Option<String>,
}

/// One talk listed in an event's timetable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub title: String,
    pub speaker: String,
    pub institution: String,
    pub attachment_url: Option<String>,
}

impl Contribution {
    /// Placeholder for a speaker or institution the page does not list
    pub const NOT_AVAILABLE: &'static str = "N/A";
    /// Placeholder written instead of a missing PDF link
    pub const NO_ATTACHMENT: &'static str = "no PDF";

    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            speaker: Self::NOT_AVAILABLE.to_string(),
            institution: Self::NOT_AVAILABLE.to_string(),
            attachment_url: None,
        }
    }

    pub fn attachment_or_sentinel(&self) -> &str {
        self.attachment_url.as_deref().unwrap_or(Self::NO_ATTACHMENT)
    }
}

/// One output row: an event paired with one of its talks, or with nothing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Meeting")]
    pub event_title: String,
    #[serde(rename = "Agenda")]
    pub event_url: String,
    #[serde(rename = "Date")]
    pub event_date: String,
    #[serde(rename = "Contribution")]
    pub contribution_title: String,
    #[serde(rename = "Speaker")]
    pub speaker: String,
    #[serde(rename = "Institution")]
    pub institution: String,
    #[serde(rename = "PDF")]
    pub attachment: String,
}

impl Record {
    pub fn new(event: &Event, contribution: &Contribution) -> Self {
        Self {
            event_title: event.title.clone(),
            event_url: event.url.clone(),
            event_date: event.date.clone(),
            contribution_title: contribution.title.clone(),
            speaker: contribution.speaker.clone(),
            institution: contribution.institution.clone(),
            attachment: contribution.attachment_or_sentinel().to_string(),
        }
    }

    /// Row kept for an event whose timetable has no contributions
    pub fn placeholder(event: &Event) -> Self {
        Self {
            event_title: event.title.clone(),
            event_url: event.url.clone(),
            event_date: event.date.clone(),
            contribution_title: String::new(),
            speaker: String::new(),
            institution: String::new(),
            attachment: String::new(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.contribution_title.is_empty()
            && self.speaker.is_empty()
            && self.institution.is_empty()
            && self.attachment.is_empty()
    }

    /// Field values in header order
    pub fn fields(&self) -> [&str; 7] {
        [
            self.event_title.as_str(),
            self.event_url.as_str(),
            self.event_date.as_str(),
            self.contribution_title.as_str(),
            self.speaker.as_str(),
            self.institution.as_str(),
            self.attachment.as_str(),
        ]
    }
}

/// Flatten one page into rows: one per contribution, or a single placeholder.
pub fn flatten(event: &Event, contributions: &[Contribution]) -> Vec<Record> {
    if contributions.is_empty() {
        return vec![Record::placeholder(event)];
    }
    contributions
        .iter()
        .map(|contribution| Record::new(event, contribution))
        .collect()
}
