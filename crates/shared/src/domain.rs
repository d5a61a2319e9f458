use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub Uuid);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for ProjectId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Stable slide identifier. The backend keys slides by integer primary key, the
/// reorder endpoint exchanges them as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SlideId(pub String);

impl SlideId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlideId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for SlideId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Int(i64),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Text(text) => Self(text),
            Repr::Int(int) => Self(int.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LayoutType {
    Columns,
    Bullets,
    Icons,
    Timeline,
    Chart,
    Cycle,
    Arrows,
    Pyramid,
    Staircase,
    Other(String),
}

impl LayoutType {
    /// Exact match only: `"Bullets"` is not `bullets`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "columns" => Self::Columns,
            "bullets" => Self::Bullets,
            "icons" => Self::Icons,
            "timeline" => Self::Timeline,
            "chart" => Self::Chart,
            "cycle" => Self::Cycle,
            "arrows" => Self::Arrows,
            "pyramid" => Self::Pyramid,
            "staircase" => Self::Staircase,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Columns => "columns",
            Self::Bullets => "bullets",
            Self::Icons => "icons",
            Self::Timeline => "timeline",
            Self::Chart => "chart",
            Self::Cycle => "cycle",
            Self::Arrows => "arrows",
            Self::Pyramid => "pyramid",
            Self::Staircase => "staircase",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for LayoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the slide image sits relative to the layout body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionLayout {
    Vertical,
    Left,
    Right,
    #[default]
    #[serde(other)]
    None,
}
