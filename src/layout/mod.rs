//! Architecture layout: size every container bottom-up, place it top-down into a
//! per-page [`Registry`], then route connections and add the title and legend.

mod error;
mod legend;
mod place;
mod registry;
mod routing;
mod size;
mod text;
pub(crate) mod types;

pub use error::LayoutError;
pub use legend::LegendContent;
pub use registry::{LAYER_ID, ROOT_ID, Registry};
pub use routing::resolve_endpoint;
pub use types::*;

use log::debug;

use crate::config::LayoutConfig;
use crate::ir::Architecture;

/// Lays out every page of `architecture`. Pages are independent; each gets its own
/// id namespace (`p1-`, `p2-`, ...).
pub fn compute_layout(
    architecture: &Architecture,
    config: &LayoutConfig,
) -> Result<Vec<PageLayout>, LayoutError> {
    architecture
        .page_views()
        .into_iter()
        .enumerate()
        .map(|(index, page)| compute_page_layout(page, index, config))
        .collect()
}

pub fn compute_page_layout(
    page: &Architecture,
    index: usize,
    config: &LayoutConfig,
) -> Result<PageLayout, LayoutError> {
    let mut registry = Registry::new(format!("p{}-", index + 1));
    let margin = config.page_margin;
    let description = page.description.as_deref();

    let title_height = legend::title_height(description, &config.title);
    let mut right = margin + config.title.width;
    let mut bottom = margin + title_height;
    let mut cursor_y = bottom + config.section_gap;

    let globals = size::size_resources(&page.global_resources);
    if !globals.is_empty() {
        let origin = Point::new(margin, cursor_y);
        let extent = place::place_leaf_row(&mut registry, &globals, origin, config)?;
        right = right.max(margin + extent.width);
        bottom = cursor_y + extent.height;
        cursor_y = bottom + config.section_gap;
    }

    let cloud = page
        .scope
        .as_ref()
        .map(|scope| size::size_scope(scope, config))
        .unwrap_or_default();
    let mut cloud_width = 0.0;
    if !cloud.is_empty() {
        let extent = place::place_row(&mut registry, &cloud, Point::new(margin, cursor_y), config)?;
        cloud_width = extent.width;
        right = right.max(margin + extent.width);
        bottom = cursor_y + extent.height;
        cursor_y = bottom + config.section_gap;
    }

    let on_premises: Vec<_> = page
        .on_premises
        .iter()
        .map(|block| size::size_on_premises(block, config))
        .collect();
    if !on_premises.is_empty() {
        let width = size::side_by_side(&on_premises, config.container_gap).width;
        let x = margin + ((cloud_width - width) / 2.0).max(0.0);
        let origin = Point::new(x, cursor_y);
        let extent = place::place_row(&mut registry, &on_premises, origin, config)?;
        right = right.max(x + extent.width);
        bottom = cursor_y + extent.height;
    }

    let edges = routing::route_connections(&mut registry, &page.connections, &config.routing);
    for point in edges.iter().flat_map(|edge| edge.waypoints.iter()) {
        right = right.max(point.x);
    }

    legend::place_title(
        &mut registry,
        &page.title,
        description,
        Point::new(margin, margin),
        &config.title,
    )?;

    let width = right + config.legend.gap + config.legend.width;
    let content = LegendContent::collect(&registry, &edges);
    let legend_bounds = legend::place_legend(
        &mut registry,
        &content,
        Point::new(width - config.legend.width, margin),
        &config.legend,
    )?;
    let height = bottom.max(legend_bounds.bottom()) + margin;

    let name = if page.title.trim().is_empty() {
        format!("Page {}", index + 1)
    } else {
        page.title.trim().to_string()
    };
    debug!(
        page = name.as_str(),
        cells = registry.len(),
        edges = edges.len(),
        width = width,
        height = height;
        "Computed page layout"
    );

    Ok(PageLayout {
        name,
        width,
        height,
        registry,
        edges,
    })
}
