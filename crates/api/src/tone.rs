use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A reply tone. Each variant carries both its display label and the value
/// sent on the wire, so the two cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Professional,
    Friendly,
    Concise,
    Kind,
    Casual,
}

impl Tone {
    /// Tones offered by the injected webmail control.
    pub const EXTENSION: [Tone; 4] = [Tone::Professional, Tone::Friendly, Tone::Concise, Tone::Kind];

    /// Tones offered by the standalone compose form (plus `Auto`).
    pub const STANDALONE: [Tone; 3] = [Tone::Professional, Tone::Casual, Tone::Friendly];

    pub fn label(self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Friendly => "Friendly",
            Tone::Concise => "Concise",
            Tone::Kind => "Kind",
            Tone::Casual => "Casual",
        }
    }

    pub fn wire_value(self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Friendly => "friendly",
            Tone::Concise => "concise",
            Tone::Kind => "kind",
            Tone::Casual => "casual",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTone(pub String);

impl fmt::Display for UnknownTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tone: {}", self.0)
    }
}

impl std::error::Error for UnknownTone {}

impl FromStr for Tone {
    type Err = UnknownTone;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "professional" => Ok(Tone::Professional),
            "friendly" => Ok(Tone::Friendly),
            "concise" => Ok(Tone::Concise),
            "kind" => Ok(Tone::Kind),
            "casual" => Ok(Tone::Casual),
            _ => Err(UnknownTone(s.to_string())),
        }
    }
}

/// The tone a user picked, or `Auto` to let the service decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToneSelection {
    #[default]
    Auto,
    Fixed(Tone),
}

impl ToneSelection {
    pub fn label(self) -> &'static str {
        match self {
            ToneSelection::Auto => "None (Auto)",
            ToneSelection::Fixed(tone) => tone.label(),
        }
    }

    /// `Auto` is sent as an empty tone string.
    pub fn wire_value(self) -> &'static str {
        match self {
            ToneSelection::Auto => "",
            ToneSelection::Fixed(tone) => tone.wire_value(),
        }
    }

    /// Parses a configured tone; an empty string or `auto` means `Auto`.
    pub fn parse(value: &str) -> Result<Self, UnknownTone> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("auto") {
            return Ok(ToneSelection::Auto);
        }
        trimmed.parse().map(ToneSelection::Fixed)
    }
}

impl From<Tone> for ToneSelection {
    fn from(tone: Tone) -> Self {
        ToneSelection::Fixed(tone)
    }
}
