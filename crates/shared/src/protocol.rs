use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{
    domain::{LayoutType, ProjectId, SectionLayout, SlideId},
    error::ProtocolError,
};

pub const DEFAULT_DOMINANT_COLOR: &str = "#3b82f6";

/// Heading fields every layout may carry alongside its body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Column {
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnsContent {
    #[serde(flatten)]
    pub header: ContentHeader,
    #[serde(default)]
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulletsContent {
    #[serde(flatten)]
    pub header: ContentHeader,
    #[serde(default)]
    pub bullets: Vec<Bullet>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IconItem {
    /// Free-text icon query such as `rocket` or `shield`.
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IconsContent {
    #[serde(flatten)]
    pub header: ContentHeader,
    #[serde(default)]
    pub icons: Vec<IconItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartDatum {
    #[serde(default)]
    pub label: String,
    /// Percentage. The generator emits either a number or a numeric string.
    #[serde(deserialize_with = "deserialize_percentage")]
    pub data: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartContent {
    #[serde(flatten)]
    pub header: ContentHeader,
    #[serde(default)]
    pub data: Vec<ChartDatum>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Shared body of the step-based layouts (timeline, cycle, arrows, pyramid, staircase).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepsContent {
    #[serde(flatten)]
    pub header: ContentHeader,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlideContent {
    Columns(ColumnsContent),
    Bullets(BulletsContent),
    Icons(IconsContent),
    Timeline(StepsContent),
    Chart(ChartContent),
    Cycle(StepsContent),
    Arrows(StepsContent),
    Pyramid(StepsContent),
    Staircase(StepsContent),
    Other { layout_type: String, content: Value },
}

impl SlideContent {
    pub fn from_wire(layout_type: &str, content: Value) -> Result<Self, serde_json::Error> {
        // A missing body is treated like an empty one.
        let content = if content.is_null() {
            Value::Object(Default::default())
        } else {
            content
        };

        Ok(match LayoutType::parse(layout_type) {
            LayoutType::Columns => Self::Columns(serde_json::from_value(content)?),
            LayoutType::Bullets => Self::Bullets(serde_json::from_value(content)?),
            LayoutType::Icons => Self::Icons(serde_json::from_value(content)?),
            LayoutType::Timeline => Self::Timeline(serde_json::from_value(content)?),
            LayoutType::Chart => Self::Chart(serde_json::from_value(content)?),
            LayoutType::Cycle => Self::Cycle(serde_json::from_value(content)?),
            LayoutType::Arrows => Self::Arrows(serde_json::from_value(content)?),
            LayoutType::Pyramid => Self::Pyramid(serde_json::from_value(content)?),
            LayoutType::Staircase => Self::Staircase(serde_json::from_value(content)?),
            LayoutType::Other(layout_type) => Self::Other {
                layout_type,
                content,
            },
        })
    }

    pub fn to_wire(&self) -> (String, Value) {
        let content = match self {
            Self::Columns(body) => serde_json::to_value(body),
            Self::Bullets(body) => serde_json::to_value(body),
            Self::Icons(body) => serde_json::to_value(body),
            Self::Chart(body) => serde_json::to_value(body),
            Self::Timeline(body)
            | Self::Cycle(body)
            | Self::Arrows(body)
            | Self::Pyramid(body)
            | Self::Staircase(body) => serde_json::to_value(body),
            Self::Other { content, .. } => Ok(content.clone()),
        };
        (
            self.layout_type().as_str().to_string(),
            content.unwrap_or_default(),
        )
    }

    pub fn layout_type(&self) -> LayoutType {
        match self {
            Self::Columns(_) => LayoutType::Columns,
            Self::Bullets(_) => LayoutType::Bullets,
            Self::Icons(_) => LayoutType::Icons,
            Self::Timeline(_) => LayoutType::Timeline,
            Self::Chart(_) => LayoutType::Chart,
            Self::Cycle(_) => LayoutType::Cycle,
            Self::Arrows(_) => LayoutType::Arrows,
            Self::Pyramid(_) => LayoutType::Pyramid,
            Self::Staircase(_) => LayoutType::Staircase,
            Self::Other { layout_type, .. } => LayoutType::Other(layout_type.clone()),
        }
    }

    pub fn header(&self) -> Option<&ContentHeader> {
        match self {
            Self::Columns(body) => Some(&body.header),
            Self::Bullets(body) => Some(&body.header),
            Self::Icons(body) => Some(&body.header),
            Self::Chart(body) => Some(&body.header),
            Self::Timeline(body)
            | Self::Cycle(body)
            | Self::Arrows(body)
            | Self::Pyramid(body)
            | Self::Staircase(body) => Some(&body.header),
            Self::Other { .. } => None,
        }
    }

    /// Heading shown in slide thumbnails: `heading`, then `title`.
    pub fn display_title(&self) -> Option<&str> {
        if let Some(header) = self.header() {
            return header.heading.as_deref().or(header.title.as_deref());
        }
        match self {
            Self::Other { content, .. } => content
                .get("heading")
                .or_else(|| content.get("title"))
                .and_then(Value::as_str),
            _ => None,
        }
    }

    pub fn key_message(&self) -> Option<&str> {
        match self {
            Self::Other { content, .. } => content.get("key_message").and_then(Value::as_str),
            _ => self.header().and_then(|h| h.key_message.as_deref()),
        }
    }
}

/// Wire form of a slide as the backend sends it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSlide {
    pub id: SlideId,
    #[serde(default)]
    pub slide_number: u32,
    #[serde(default)]
    pub content: Value,
    #[serde(default)]
    pub layout_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dominant_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_layout: Option<SectionLayout>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSlide", into = "RawSlide")]
pub struct Slide {
    pub id: SlideId,
    /// Position as last persisted by the backend; may lag the client order.
    pub slide_number: u32,
    pub content: SlideContent,
    pub dominant_color: String,
    pub img_url: Option<String>,
    pub section_layout: SectionLayout,
}

impl Slide {
    pub fn layout_type(&self) -> LayoutType {
        self.content.layout_type()
    }

    /// Image URL when it is present and not blank.
    pub fn image_url(&self) -> Option<&str> {
        self.img_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

impl TryFrom<RawSlide> for Slide {
    type Error = ProtocolError;

    fn try_from(raw: RawSlide) -> Result<Self, Self::Error> {
        let content = SlideContent::from_wire(&raw.layout_type, raw.content).map_err(|err| {
            ProtocolError::InvalidContent {
                slide_id: raw.id.to_string(),
                layout_type: raw.layout_type.clone(),
                reason: err.to_string(),
            }
        })?;

        Ok(Self {
            id: raw.id,
            slide_number: raw.slide_number,
            content,
            dominant_color: raw
                .dominant_color
                .filter(|color| !color.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DOMINANT_COLOR.to_string()),
            img_url: raw.img_url,
            section_layout: raw.section_layout.unwrap_or_default(),
        })
    }
}

impl From<Slide> for RawSlide {
    fn from(slide: Slide) -> Self {
        let (layout_type, content) = slide.content.to_wire();
        Self {
            id: slide.id,
            slide_number: slide.slide_number,
            content,
            layout_type,
            dominant_color: Some(slide.dominant_color),
            img_url: slide.img_url,
            section_layout: Some(slide.section_layout),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDetail {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderSlidesRequest {
    pub new_order: Vec<SlideId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideImageUpdateRequest {
    pub img_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideImageUpdateResponse {
    pub slide: Slide,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddSlideRequest {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddSlideResponse {
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestTitlesResponse {
    pub slide_titles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOutlineRequest {
    pub num_pages: u32,
    pub prompt: String,
    pub project_id: ProjectId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineResponse {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slide_titles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratePresentationRequest {
    pub slide_titles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPresentation {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slides: Vec<Slide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
}

fn deserialize_percentage<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Number(value) => Ok(value),
        Repr::Text(text) => text
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid percentage {text:?}"))),
    }
}
