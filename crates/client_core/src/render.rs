//! Maps a slide's layout to one of the fixed presentational templates.

use std::fmt;

use shared::{
    domain::SectionLayout,
    protocol::{ContentHeader, Slide, SlideContent, Step},
};

const DEFAULT_ICON: &str = "⚡";
const PYRAMID_WIDTH_STEP: u8 = 15;
const PYRAMID_MIN_WIDTH: u8 = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Template {
    Columns,
    Bullets,
    Icons,
    Timeline,
    Chart,
    Cycle,
    Arrows,
    Pyramid,
    Staircase,
    /// Fallback for layouts without a template; shows the raw layout name.
    AdvancedPlaceholder { layout_type: String },
}

impl Template {
    pub fn name(&self) -> &str {
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
            Self::AdvancedPlaceholder { .. } => "advanced",
        }
    }
}

/// `section_layout` names the side the content takes; the image fills the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagePlacement {
    Above,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub url: String,
    pub placement: ImagePlacement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedItem {
    pub marker: String,
    pub heading: Option<String>,
    pub body: String,
    /// Chart bar fill, 0..=100.
    pub meter: Option<u8>,
    /// Pyramid tier width in percent.
    pub width_percent: Option<u8>,
    /// Staircase step offset.
    pub indent: usize,
}

impl RenderedItem {
    fn new(marker: impl Into<String>, heading: Option<String>, body: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            heading: heading.filter(|h| !h.trim().is_empty()),
            body: body.into(),
            meter: None,
            width_percent: None,
            indent: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSlide {
    pub template: Template,
    pub title: Option<String>,
    pub accent: String,
    pub image: Option<RenderedImage>,
    pub items: Vec<RenderedItem>,
}

pub fn render_slide(slide: &Slide) -> RenderedSlide {
    let mut rendered = render_content(&slide.content, &slide.dominant_color);
    rendered.image = slide.image_url().and_then(|url| {
        let placement = match slide.section_layout {
            SectionLayout::Vertical => ImagePlacement::Above,
            SectionLayout::Left => ImagePlacement::Right,
            SectionLayout::Right => ImagePlacement::Left,
            SectionLayout::None => return None,
        };
        Some(RenderedImage {
            url: url.to_string(),
            placement,
        })
    });
    rendered
}

pub fn render_content(content: &SlideContent, dominant_color: &str) -> RenderedSlide {
    let (template, items) = match content {
        SlideContent::Columns(body) => (
            Template::Columns,
            body.columns
                .iter()
                .enumerate()
                .map(|(index, column)| {
                    RenderedItem::new(
                        numbered(index),
                        Some(column.heading.clone()),
                        column.description.clone(),
                    )
                })
                .collect(),
        ),
        SlideContent::Bullets(body) => (
            Template::Bullets,
            body.bullets
                .iter()
                .map(|bullet| RenderedItem::new("•", bullet.heading.clone(), bullet.text.clone()))
                .collect(),
        ),
        SlideContent::Icons(body) => (
            Template::Icons,
            body.icons
                .iter()
                .map(|icon| {
                    RenderedItem::new(
                        icon_glyph(&icon.icon),
                        Some(icon.heading.clone()),
                        icon.description.clone(),
                    )
                })
                .collect(),
        ),
        SlideContent::Chart(body) => (
            Template::Chart,
            body.data
                .iter()
                .map(|datum| {
                    let percent = clamp_percent(datum.data);
                    let mut item =
                        RenderedItem::new(format!("{percent}%"), Some(datum.label.clone()), "");
                    item.meter = Some(percent);
                    item
                })
                .collect(),
        ),
        SlideContent::Timeline(body) => (Template::Timeline, numbered_steps(&body.steps)),
        SlideContent::Cycle(body) => (Template::Cycle, numbered_steps(&body.steps)),
        SlideContent::Arrows(body) => (
            Template::Arrows,
            body.steps
                .iter()
                .map(|step| RenderedItem::new("→", Some(step.title.clone()), step.description.clone()))
                .collect(),
        ),
        SlideContent::Pyramid(body) => (
            Template::Pyramid,
            numbered_steps(&body.steps)
                .into_iter()
                .enumerate()
                .map(|(index, mut item)| {
                    item.width_percent = Some(pyramid_width(index));
                    item
                })
                .collect(),
        ),
        SlideContent::Staircase(body) => (
            Template::Staircase,
            numbered_steps(&body.steps)
                .into_iter()
                .enumerate()
                .map(|(index, mut item)| {
                    item.indent = index;
                    item
                })
                .collect(),
        ),
        SlideContent::Other { layout_type, .. } => (
            Template::AdvancedPlaceholder {
                layout_type: layout_type.clone(),
            },
            vec![RenderedItem::new(
                DEFAULT_ICON,
                Some("Advanced Layout".to_string()),
                format!("Layout: {layout_type}"),
            )],
        ),
    };

    RenderedSlide {
        template,
        title: content
            .header()
            .and_then(header_title)
            .or_else(|| content.display_title().map(str::to_string)),
        accent: dominant_color.to_string(),
        image: None,
        items,
    }
}

/// Glyph for a free-text icon query; unknown queries get the default glyph.
pub fn icon_glyph(query: &str) -> &'static str {
    match query.trim().to_ascii_lowercase().as_str() {
        "rocket" => "🚀",
        "shield" => "🛡️",
        "trophy" => "🏆",
        "bulb" => "💡",
        "star" => "⭐",
        "fire" => "🔥",
        "thunder" => "⚡",
        "heart" => "❤️",
        "crown" => "👑",
        "check" => "✅",
        "play" => "▶️",
        "gear" => "⚙️",
        "target" => "🎯",
        "diamond" => "💎",
        "magic" => "✨",
        "tiktok" => "📱",
        "instagram" => "📷",
        "discord" => "💬",
        "youtube" => "📺",
        _ => DEFAULT_ICON,
    }
}

fn header_title(header: &ContentHeader) -> Option<String> {
    header
        .title
        .as_deref()
        .or(header.heading.as_deref())
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(str::to_string)
}

fn numbered(index: usize) -> String {
    (index + 1).to_string()
}

fn numbered_steps(steps: &[Step]) -> Vec<RenderedItem> {
    steps
        .iter()
        .enumerate()
        .map(|(index, step)| {
            RenderedItem::new(numbered(index), Some(step.title.clone()), step.description.clone())
        })
        .collect()
}

fn pyramid_width(index: usize) -> u8 {
    let shrink = u8::try_from(index)
        .unwrap_or(u8::MAX)
        .saturating_mul(PYRAMID_WIDTH_STEP);
    100u8.saturating_sub(shrink).max(PYRAMID_MIN_WIDTH)
}

fn clamp_percent(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.trunc().clamp(0.0, 100.0) as u8
}

impl fmt::Display for RenderedSlide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.template.name())?;
        if let Some(title) = &self.title {
            write!(f, " {title}")?;
        }
        writeln!(f, " ({})", self.accent)?;

        if let Some(image) = &self.image {
            let side = match image.placement {
                ImagePlacement::Above => "above",
                ImagePlacement::Left => "left",
                ImagePlacement::Right => "right",
            };
            writeln!(f, "  image ({side}): {}", image.url)?;
        }

        for item in &self.items {
            write!(f, "  {}{}", "  ".repeat(item.indent), item.marker)?;
            match (&item.heading, item.body.is_empty()) {
                (Some(heading), false) => write!(f, " {heading}: {}", item.body)?,
                (Some(heading), true) => write!(f, " {heading}")?,
                (None, false) => write!(f, " {}", item.body)?,
                (None, true) => {}
            }
            if let Some(meter) = item.meter {
                let filled = usize::from(meter / 5);
                write!(f, " [{}{}]", "#".repeat(filled), ".".repeat(20 - filled))?;
            }
            if let Some(width) = item.width_percent {
                write!(f, " ({width}% wide)")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
