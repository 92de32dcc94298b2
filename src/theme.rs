use serde::{Deserialize, Serialize};

use crate::ir::ConnectionStyle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerStyle {
    pub fill: String,
    pub stroke: String,
    pub font_color: String,
    pub dashed: bool,
    pub rounded: bool,
}

impl ContainerStyle {
    fn new(fill: &str, stroke: &str, font_color: &str, dashed: bool, rounded: bool) -> Self {
        Self {
            fill: fill.to_string(),
            stroke: stroke.to_string(),
            font_color: font_color.to_string(),
            dashed,
            rounded,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStyle {
    pub color: String,
    pub width: f32,
    /// draw.io `dashPattern`; `None` draws a solid line.
    pub dash_pattern: Option<String>,
    pub bidirectional: bool,
}

impl LineStyle {
    fn new(color: &str, width: f32, dash_pattern: Option<&str>, bidirectional: bool) -> Self {
        Self {
            color: color.to_string(),
            width,
            dash_pattern: dash_pattern.map(str::to_string),
            bidirectional,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub caption_font_size: f32,
    pub title_font_size: f32,
    pub text_color: String,
    pub subscription: ContainerStyle,
    pub region: ContainerStyle,
    pub primary_region: ContainerStyle,
    pub resource_group: ContainerStyle,
    pub vnet: ContainerStyle,
    pub hub_vnet: ContainerStyle,
    pub subnet: ContainerStyle,
    pub zone: ContainerStyle,
    pub on_premises: ContainerStyle,
    pub title: ContainerStyle,
    pub legend: ContainerStyle,
    pub plain: LineStyle,
    pub dashed: LineStyle,
    pub expressroute: LineStyle,
    pub vpn: LineStyle,
    pub peering: LineStyle,
}

impl Theme {
    pub fn azure() -> Self {
        Self {
            font_family: "Segoe UI, Helvetica, Arial, sans-serif".to_string(),
            font_size: 12.0,
            caption_font_size: 9.0,
            title_font_size: 18.0,
            text_color: "#1B1B1B".to_string(),
            subscription: ContainerStyle::new("#FFFFFF", "#0078D4", "#0078D4", false, false),
            region: ContainerStyle::new("#F7FBFF", "#5EA0EF", "#2B579A", true, true),
            primary_region: ContainerStyle::new("#F7FBFF", "#0078D4", "#0078D4", false, true),
            resource_group: ContainerStyle::new("#F2F2F2", "#7A7A7A", "#333333", true, true),
            vnet: ContainerStyle::new("#E8F4FC", "#0078D4", "#005BA1", false, false),
            hub_vnet: ContainerStyle::new("#DCEBFA", "#004E8C", "#004E8C", false, false),
            subnet: ContainerStyle::new("#FFFFFF", "#50E6FF", "#0063B1", true, false),
            zone: ContainerStyle::new("#FFF9E6", "#C19C00", "#8A6D00", true, true),
            on_premises: ContainerStyle::new("#F3F3F3", "#505050", "#333333", false, true),
            title: ContainerStyle::new("#FFFFFF", "#D0D0D0", "#1B1B1B", false, false),
            legend: ContainerStyle::new("#FAFAFA", "#B3B3B3", "#333333", false, true),
            plain: LineStyle::new("#404040", 1.5, None, false),
            dashed: LineStyle::new("#707070", 1.5, Some("6 4"), false),
            expressroute: LineStyle::new("#7B3FA0", 3.0, None, true),
            vpn: LineStyle::new("#E36C09", 2.0, Some("8 4"), true),
            peering: LineStyle::new("#0078D4", 2.0, Some("2 3"), true),
        }
    }

    /// Grayscale variant for print.
    pub fn monochrome() -> Self {
        Self {
            subscription: ContainerStyle::new("#FFFFFF", "#000000", "#000000", false, false),
            region: ContainerStyle::new("#FFFFFF", "#4D4D4D", "#000000", true, true),
            primary_region: ContainerStyle::new("#FFFFFF", "#000000", "#000000", false, true),
            resource_group: ContainerStyle::new("#F5F5F5", "#666666", "#000000", true, true),
            vnet: ContainerStyle::new("#EDEDED", "#333333", "#000000", false, false),
            hub_vnet: ContainerStyle::new("#E0E0E0", "#000000", "#000000", false, false),
            subnet: ContainerStyle::new("#FFFFFF", "#8C8C8C", "#000000", true, false),
            zone: ContainerStyle::new("#FAFAFA", "#A6A6A6", "#000000", true, true),
            on_premises: ContainerStyle::new("#F0F0F0", "#333333", "#000000", false, true),
            plain: LineStyle::new("#000000", 1.5, None, false),
            dashed: LineStyle::new("#000000", 1.5, Some("6 4"), false),
            expressroute: LineStyle::new("#000000", 3.0, None, true),
            vpn: LineStyle::new("#000000", 2.0, Some("8 4"), true),
            peering: LineStyle::new("#000000", 2.0, Some("2 3"), true),
            ..Self::azure()
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "azure" | "default" => Some(Self::azure()),
            "mono" | "monochrome" => Some(Self::monochrome()),
            _ => None,
        }
    }

    pub fn line_style(&self, style: ConnectionStyle) -> &LineStyle {
        match style {
            ConnectionStyle::Plain => &self.plain,
            ConnectionStyle::Dashed => &self.dashed,
            ConnectionStyle::ExpressRoute => &self.expressroute,
            ConnectionStyle::Vpn => &self.vpn,
            ConnectionStyle::Peering => &self.peering,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::azure()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_names_are_case_insensitive() {
        assert_eq!(Theme::from_name("Mono"), Some(Theme::monochrome()));
        assert_eq!(Theme::from_name(" azure "), Some(Theme::azure()));
        assert_eq!(Theme::from_name("neon"), None);
    }

    #[test]
    fn network_links_draw_both_arrowheads() {
        let theme = Theme::default();
        for style in ConnectionStyle::ALL {
            let expected = matches!(
                style,
                ConnectionStyle::ExpressRoute | ConnectionStyle::Vpn | ConnectionStyle::Peering
            );
            assert_eq!(theme.line_style(style).bidirectional, expected, "{style:?}");
        }
    }
}
