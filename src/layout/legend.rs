use crate::catalog::ResourceSpec;
use crate::config::{LegendConfig, TitleConfig};
use crate::ir::ConnectionStyle;

use super::text::estimate_line_count;
use super::types::LegendSwatch;
use super::{CellId, CellKind, EdgeLayout, LayoutError, Point, Rect, Registry, Size};

pub(crate) const LEGEND_HEADING: &str = "Legend";
pub(crate) const CONNECTIONS_HEADING: &str = "Connection styles";

pub(crate) fn title_height(description: Option<&str>, config: &TitleConfig) -> f32 {
    let lines = description_lines(description, config);
    config
        .min_height
        .max(config.base_height + lines as f32 * config.line_height)
}

fn description_lines(description: Option<&str>, config: &TitleConfig) -> usize {
    description
        .map(|text| estimate_line_count(text, config.chars_per_line))
        .unwrap_or(0)
}

/// Title block with a heading and, when there is text, a description below it.
pub(crate) fn place_title(
    registry: &mut Registry,
    title: &str,
    description: Option<&str>,
    origin: Point,
    config: &TitleConfig,
) -> Result<CellId, LayoutError> {
    let height = title_height(description, config);
    let lines = description_lines(description, config);
    let inner_width = config.width - config.padding * 2.0;

    let block = registry.insert(
        None,
        origin,
        Size::new(config.width, height),
        CellKind::TitleBlock,
        None,
        String::new(),
    )?;
    registry.insert(
        Some(block),
        Point::new(config.padding, config.padding),
        Size::new(inner_width, config.heading_height),
        CellKind::TitleHeading,
        None,
        title.to_string(),
    )?;
    if let (Some(text), true) = (description, lines > 0) {
        registry.insert(
            Some(block),
            Point::new(config.padding, config.padding + config.heading_height),
            Size::new(inner_width, lines as f32 * config.line_height),
            CellKind::TitleDescription,
            None,
            text.trim().to_string(),
        )?;
    }
    Ok(block)
}

/// What the legend lists for one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegendContent {
    /// Distinct resource types on the page, by display name.
    pub resources: Vec<&'static ResourceSpec>,
    /// Connection styles in use; empty unless something other than a plain line is drawn.
    pub styles: Vec<ConnectionStyle>,
}

impl LegendContent {
    pub fn collect(registry: &Registry, edges: &[EdgeLayout]) -> Self {
        let mut resources: Vec<&'static ResourceSpec> = Vec::new();
        for cell in registry.cells() {
            if let CellKind::Resource(resource) = &cell.kind
                && !resources.iter().any(|spec| spec.key == resource.spec.key)
            {
                resources.push(resource.spec);
            }
        }
        resources.sort_by(|a, b| {
            a.display_name
                .cmp(b.display_name)
                .then_with(|| a.key.cmp(b.key))
        });

        let mut styles: Vec<ConnectionStyle> = Vec::new();
        for edge in edges {
            if !styles.contains(&edge.style) {
                styles.push(edge.style);
            }
        }
        if styles.iter().all(|style| *style == ConnectionStyle::Plain) {
            styles.clear();
        }
        styles.sort_by_key(|style| style.display_name());

        Self { resources, styles }
    }

    pub fn size(&self, config: &LegendConfig) -> Size {
        let mut height = config.padding * 2.0
            + config.heading_height
            + self.resources.len() as f32 * config.row_height;
        if !self.styles.is_empty() {
            height += config.section_gap
                + config.heading_height
                + self.styles.len() as f32 * config.row_height;
        }
        Size::new(config.width, height)
    }
}

/// Places the legend with its top-left corner at `origin`; returns its bounds.
pub(crate) fn place_legend(
    registry: &mut Registry,
    content: &LegendContent,
    origin: Point,
    config: &LegendConfig,
) -> Result<Rect, LayoutError> {
    let size = content.size(config);
    let inner_width = config.width - config.padding * 2.0;
    let legend = registry.insert(None, origin, size, CellKind::Legend, None, String::new())?;

    let mut y = config.padding;
    registry.insert(
        Some(legend),
        Point::new(config.padding, y),
        Size::new(inner_width, config.heading_height),
        CellKind::LegendHeading,
        None,
        LEGEND_HEADING.to_string(),
    )?;
    y += config.heading_height;

    for &spec in &content.resources {
        registry.insert(
            Some(legend),
            Point::new(config.padding, y + (config.row_height - config.icon_size) / 2.0),
            Size::new(config.icon_size, config.icon_size),
            CellKind::LegendEntry(LegendSwatch::Resource(spec)),
            None,
            spec.display_name.to_string(),
        )?;
        y += config.row_height;
    }

    if !content.styles.is_empty() {
        y += config.section_gap;
        registry.insert(
            Some(legend),
            Point::new(config.padding, y),
            Size::new(inner_width, config.heading_height),
            CellKind::LegendHeading,
            None,
            CONNECTIONS_HEADING.to_string(),
        )?;
        y += config.heading_height;
        for style in &content.styles {
            registry.insert(
                Some(legend),
                Point::new(
                    config.padding,
                    y + (config.row_height - config.swatch_height) / 2.0,
                ),
                Size::new(config.swatch_width, config.swatch_height),
                CellKind::LegendEntry(LegendSwatch::Connection(*style)),
                None,
                style.display_name().to_string(),
            )?;
            y += config.row_height;
        }
    }

    Ok(Rect::new(origin, size))
}
