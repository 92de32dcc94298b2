use crate::layout::Size;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-container minimum footprints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MinSizes {
    pub subscription: Size,
    pub region: Size,
    pub resource_group: Size,
    pub vnet: Size,
    pub subnet: Size,
    pub zone: Size,
    pub on_premises: Size,
}

impl Default for MinSizes {
    fn default() -> Self {
        Self {
            subscription: Size::new(420.0, 220.0),
            region: Size::new(380.0, 200.0),
            resource_group: Size::new(320.0, 180.0),
            vnet: Size::new(280.0, 160.0),
            subnet: Size::new(200.0, 130.0),
            zone: Size::new(170.0, 130.0),
            on_premises: Size::new(260.0, 160.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoutingConfig {
    /// Below this vertical distance between endpoint centers edges are drawn straight.
    pub direct_threshold: f32,
    /// Horizontal slack added to both sides of the endpoints' X-range.
    pub corridor_margin: f32,
    /// Gap between the rightmost obstruction and a detour's vertical leg.
    pub waypoint_clearance: f32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            direct_threshold: 40.0,
            corridor_margin: 20.0,
            waypoint_clearance: 30.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TitleConfig {
    pub width: f32,
    pub min_height: f32,
    pub base_height: f32,
    pub line_height: f32,
    pub chars_per_line: usize,
    pub padding: f32,
    pub heading_height: f32,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            min_height: 70.0,
            base_height: 50.0,
            line_height: 18.0,
            chars_per_line: 90,
            padding: 10.0,
            heading_height: 28.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegendConfig {
    pub width: f32,
    /// Space kept between the rightmost content and the legend.
    pub gap: f32,
    pub padding: f32,
    pub heading_height: f32,
    pub row_height: f32,
    pub icon_size: f32,
    pub swatch_width: f32,
    pub swatch_height: f32,
    pub section_gap: f32,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            width: 240.0,
            gap: 40.0,
            padding: 12.0,
            heading_height: 24.0,
            row_height: 28.0,
            icon_size: 22.0,
            swatch_width: 36.0,
            swatch_height: 10.0,
            section_gap: 8.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub page_margin: f32,
    /// Vertical gap between the title, global resources, cloud content and on-premises rows.
    pub section_gap: f32,
    /// Gap between sibling containers (stacked or side by side).
    pub container_gap: f32,
    pub container_padding: f32,
    pub header_height: f32,
    pub resource_column_width: f32,
    pub resource_row_height: f32,
    pub resource_group_columns: usize,
    pub subnet_columns: usize,
    pub zone_columns: usize,
    pub on_premises_columns: usize,
    pub subnet_spacing: f32,
    /// Horizontal margin around the subnet column of a non-hub VNet.
    pub vnet_margin: f32,
    pub caption_limit: usize,
    pub max_depth: usize,
    pub min_sizes: MinSizes,
    pub routing: RoutingConfig,
    pub title: TitleConfig,
    pub legend: LegendConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_margin: 40.0,
            section_gap: 40.0,
            container_gap: 30.0,
            container_padding: 20.0,
            header_height: 36.0,
            resource_column_width: 130.0,
            resource_row_height: 110.0,
            resource_group_columns: 4,
            subnet_columns: 2,
            zone_columns: 2,
            on_premises_columns: 4,
            subnet_spacing: 20.0,
            vnet_margin: 40.0,
            caption_limit: 3,
            max_depth: 16,
            min_sizes: MinSizes::default(),
            routing: RoutingConfig::default(),
            title: TitleConfig::default(),
            legend: LegendConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    layout: Option<LayoutConfig>,
    font_family: Option<String>,
    font_size: Option<f32>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = Theme::from_name(theme_name)
            .ok_or_else(|| anyhow::anyhow!("unknown theme `{theme_name}`"))?;
    }
    if let Some(v) = parsed.font_family {
        config.theme.font_family = v;
    }
    if let Some(v) = parsed.font_size {
        config.theme.font_size = v;
    }
    if let Some(layout) = parsed.layout {
        config.layout = layout;
    }

    Ok(config)
}
