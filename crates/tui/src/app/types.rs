use draftai_api::{ApiError, GeneratedReply, ToneSelection};

/// A reply the user has generated this session.
#[derive(Debug, Clone)]
pub struct ReplyRecord {
    pub tone: ToneSelection,
    pub text: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// What the status bar shows, plus the detail behind it for the error overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReport {
    pub summary: String,
    pub detail: Option<String>,
}

pub enum AppAsyncEvent {
    ReplyGenerated {
        request_id: u64,
        tone: ToneSelection,
        result: Result<GeneratedReply, ApiError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    Compose,
    Tones,
    Reply,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Compose => Focus::Tones,
            Focus::Tones => Focus::Reply,
            Focus::Reply => Focus::Compose,
        }
    }
}
