use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::LayoutConfig;
use crate::ir::{ConnectionStyle, Properties};
use crate::layout::{
    Cell, CellKind, EdgeLayout, LAYER_ID, LegendSwatch, PageLayout, ROOT_ID, RouteKind,
};
use crate::theme::{ContainerStyle, Theme};

/// Property keys shown under a resource's name, in display order.
pub const CAPTION_KEYS: &[&str] = &[
    "sku",
    "tier",
    "size",
    "vmSize",
    "addressSpace",
    "addressPrefix",
    "bandwidth",
    "capacity",
    "replicaCount",
    "nodeCount",
    "version",
    "kind",
];

const RESERVED_ATTRIBUTES: &[&str] = &["id", "label", "placeholders", "tooltip"];

static INVALID_KEY_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.\-]").expect("invalid key pattern"));

/// Serializes laid-out pages into one draw.io document, one `<diagram>` per page.
pub fn render_document(pages: &[PageLayout], theme: &Theme, config: &LayoutConfig) -> String {
    let mut xml = String::new();
    xml.push_str("<mxfile host=\"azure-drawio-renderer\" type=\"device\">");
    for (index, page) in pages.iter().enumerate() {
        render_page(&mut xml, page, index, theme, config);
    }
    xml.push_str("</mxfile>");
    xml
}

fn render_page(
    xml: &mut String,
    page: &PageLayout,
    index: usize,
    theme: &Theme,
    config: &LayoutConfig,
) {
    xml.push_str(&format!(
        "<diagram id=\"page-{}\" name=\"{}\">",
        index + 1,
        escape_xml(&page.name)
    ));
    xml.push_str(&format!(
        "<mxGraphModel dx=\"0\" dy=\"0\" grid=\"1\" gridSize=\"10\" guides=\"1\" tooltips=\"1\" connect=\"1\" arrows=\"1\" fold=\"1\" page=\"1\" pageScale=\"1\" pageWidth=\"{}\" pageHeight=\"{}\" math=\"0\" shadow=\"0\">",
        fmt_num(page.width),
        fmt_num(page.height)
    ));
    xml.push_str("<root>");
    let root = page.qualified_id(ROOT_ID);
    xml.push_str(&format!("<mxCell id=\"{root}\"/>"));
    xml.push_str(&format!(
        "<mxCell id=\"{}\" parent=\"{root}\"/>",
        page.qualified_id(LAYER_ID)
    ));

    for cell in page.cells() {
        render_cell(xml, page, cell, theme, config);
    }
    for edge in &page.edges {
        render_edge(xml, page, edge, theme);
    }

    xml.push_str("</root></mxGraphModel></diagram>");
}

fn render_cell(
    xml: &mut String,
    page: &PageLayout,
    cell: &Cell,
    theme: &Theme,
    config: &LayoutConfig,
) {
    let id = page.qualified_id(cell.id);
    let parent = page.qualified_id(cell.parent.unwrap_or(LAYER_ID));
    let style = vertex_style(&cell.kind, theme);
    let geometry = format!(
        "<mxGeometry x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" as=\"geometry\"/>",
        fmt_num(cell.relative.x),
        fmt_num(cell.relative.y),
        fmt_num(cell.bounds.width),
        fmt_num(cell.bounds.height)
    );

    let (label, properties) = match &cell.kind {
        CellKind::Resource(resource) => (
            resource_label(&cell.label, &resource.properties, config.caption_limit, theme),
            Some(&resource.properties),
        ),
        _ => (html_text(&cell.label), None),
    };

    let attributes = properties.map(property_attributes).unwrap_or_default();
    if attributes.is_empty() {
        xml.push_str(&format!(
            "<mxCell id=\"{id}\" value=\"{}\" style=\"{}\" vertex=\"1\" parent=\"{parent}\">{geometry}</mxCell>",
            escape_xml(&label),
            escape_xml(&style)
        ));
        return;
    }

    xml.push_str(&format!("<UserObject id=\"{id}\" label=\"{}\"", escape_xml(&label)));
    for (key, value) in &attributes {
        xml.push_str(&format!(" {key}=\"{}\"", escape_xml(value)));
    }
    xml.push('>');
    xml.push_str(&format!(
        "<mxCell style=\"{}\" vertex=\"1\" parent=\"{parent}\">{geometry}</mxCell>",
        escape_xml(&style)
    ));
    xml.push_str("</UserObject>");
}

fn render_edge(xml: &mut String, page: &PageLayout, edge: &EdgeLayout, theme: &Theme) {
    let label = edge.label.as_deref().map(html_text).unwrap_or_default();
    xml.push_str(&format!(
        "<mxCell id=\"{}\" value=\"{}\" style=\"{}\" edge=\"1\" parent=\"{}\" source=\"{}\" target=\"{}\">",
        page.qualified_id(edge.id),
        escape_xml(&label),
        escape_xml(&edge_style(edge, theme)),
        page.qualified_id(LAYER_ID),
        page.qualified_id(edge.source),
        page.qualified_id(edge.target)
    ));
    if edge.waypoints.is_empty() {
        xml.push_str("<mxGeometry relative=\"1\" as=\"geometry\"/>");
    } else {
        xml.push_str("<mxGeometry relative=\"1\" as=\"geometry\"><Array as=\"points\">");
        for point in &edge.waypoints {
            xml.push_str(&format!(
                "<mxPoint x=\"{}\" y=\"{}\"/>",
                fmt_num(point.x),
                fmt_num(point.y)
            ));
        }
        xml.push_str("</Array></mxGeometry>");
    }
    xml.push_str("</mxCell>");
}

fn container_style(style: &ContainerStyle, theme: &Theme) -> String {
    format!(
        "rounded={};whiteSpace=wrap;html=1;fillColor={};strokeColor={};fontColor={};dashed={};fontFamily={};fontSize={};fontStyle=1;verticalAlign=top;align=left;spacingLeft=10;container=1;collapsible=0;",
        u8::from(style.rounded),
        style.fill,
        style.stroke,
        style.font_color,
        u8::from(style.dashed),
        theme.font_family,
        fmt_num(theme.font_size)
    )
}

fn vertex_style(kind: &CellKind, theme: &Theme) -> String {
    match kind {
        CellKind::Subscription => container_style(&theme.subscription, theme),
        CellKind::Region { primary: true } => container_style(&theme.primary_region, theme),
        CellKind::Region { primary: false } => container_style(&theme.region, theme),
        CellKind::ResourceGroup => container_style(&theme.resource_group, theme),
        CellKind::VNet { hub: true } => container_style(&theme.hub_vnet, theme),
        CellKind::VNet { hub: false } => container_style(&theme.vnet, theme),
        CellKind::Subnet => container_style(&theme.subnet, theme),
        CellKind::Zone => container_style(&theme.zone, theme),
        CellKind::OnPremises => container_style(&theme.on_premises, theme),
        CellKind::Resource(resource) => format!(
            "image;aspect=fixed;html=1;points=[];align=center;verticalLabelPosition=bottom;verticalAlign=top;fontSize={};fontColor={};image={};",
            fmt_num(theme.font_size),
            theme.text_color,
            resource.spec.icon_path()
        ),
        CellKind::TitleBlock => format!(
            "rounded=0;whiteSpace=wrap;html=1;fillColor={};strokeColor={};container=1;collapsible=0;",
            theme.title.fill, theme.title.stroke
        ),
        CellKind::TitleHeading => format!(
            "text;html=1;align=left;verticalAlign=middle;fontStyle=1;fontSize={};fontColor={};fontFamily={};",
            fmt_num(theme.title_font_size),
            theme.title.font_color,
            theme.font_family
        ),
        CellKind::TitleDescription => format!(
            "text;html=1;whiteSpace=wrap;align=left;verticalAlign=top;fontSize={};fontColor={};fontFamily={};",
            fmt_num(theme.font_size),
            theme.title.font_color,
            theme.font_family
        ),
        CellKind::Legend => format!(
            "rounded={};whiteSpace=wrap;html=1;fillColor={};strokeColor={};container=1;collapsible=0;",
            u8::from(theme.legend.rounded),
            theme.legend.fill,
            theme.legend.stroke
        ),
        CellKind::LegendHeading => format!(
            "text;html=1;align=left;verticalAlign=middle;fontStyle=1;fontSize={};fontColor={};",
            fmt_num(theme.font_size),
            theme.legend.font_color
        ),
        CellKind::LegendEntry(LegendSwatch::Resource(spec)) => format!(
            "image;aspect=fixed;html=1;labelPosition=right;verticalLabelPosition=middle;align=left;verticalAlign=middle;spacingLeft=6;fontSize={};fontColor={};image={};",
            fmt_num(theme.font_size),
            theme.legend.font_color,
            spec.icon_path()
        ),
        CellKind::LegendEntry(LegendSwatch::Connection(style)) => {
            let line = theme.line_style(*style);
            format!(
                "shape=line;html=1;strokeWidth={};strokeColor={};{}labelPosition=right;verticalLabelPosition=middle;align=left;verticalAlign=middle;spacingLeft=8;fontSize={};fontColor={};",
                fmt_num(line.width),
                line.color,
                dash_style(line.dash_pattern.as_deref()),
                fmt_num(theme.font_size),
                theme.legend.font_color
            )
        }
    }
}

fn dash_style(pattern: Option<&str>) -> String {
    match pattern {
        Some(pattern) => format!("dashed=1;dashPattern={pattern};"),
        None => String::new(),
    }
}

fn edge_style(edge: &EdgeLayout, theme: &Theme) -> String {
    let line = theme.line_style(edge.style);
    let mut style = match edge.route {
        RouteKind::Direct => "edgeStyle=none;".to_string(),
        RouteKind::Orthogonal => "edgeStyle=orthogonalEdgeStyle;".to_string(),
        RouteKind::Detour => {
            "edgeStyle=orthogonalEdgeStyle;exitX=1;exitY=0.5;exitDx=0;exitDy=0;entryX=1;entryY=0.5;entryDx=0;entryDy=0;"
                .to_string()
        }
    };
    style.push_str(&format!(
        "rounded=0;html=1;endArrow=block;endFill=1;strokeColor={};strokeWidth={};fontColor={};fontSize={};",
        line.color,
        fmt_num(line.width),
        theme.text_color,
        fmt_num(theme.caption_font_size)
    ));
    if line.bidirectional {
        style.push_str("startArrow=block;startFill=1;");
    }
    style.push_str(&dash_style(line.dash_pattern.as_deref()));
    if edge.style == ConnectionStyle::Dashed && line.dash_pattern.is_none() {
        style.push_str("dashed=1;");
    }
    style
}

/// Resource name with up to `limit` well-known properties as a small caption.
fn resource_label(name: &str, properties: &Properties, limit: usize, theme: &Theme) -> String {
    let caption: Vec<String> = CAPTION_KEYS
        .iter()
        .filter_map(|key| {
            properties
                .get(*key)
                .map(|value| format!("{key}: {}", escape_html(&value.to_string())))
        })
        .take(limit)
        .collect();
    let mut label = html_text(name);
    if !caption.is_empty() {
        label.push_str(&format!(
            "<br><font style=\"font-size:{}px\">{}</font>",
            fmt_num(theme.caption_font_size),
            caption.join("<br>")
        ));
    }
    label
}

/// Sanitized attribute name and value for every property that survives sanitizing.
/// The first property wins when two keys collapse to the same attribute.
fn property_attributes(properties: &Properties) -> Vec<(String, String)> {
    let mut seen = HashSet::new();
    properties
        .iter()
        .filter_map(|(key, value)| {
            let key = sanitize_key(key)?;
            seen.insert(key.clone()).then(|| (key, value.to_string()))
        })
        .collect()
}

/// Makes a property name usable as an XML attribute on a `UserObject`.
pub fn sanitize_key(raw: &str) -> Option<String> {
    let compact: String = raw.chars().filter(|ch| !ch.is_whitespace()).collect();
    let mut key = INVALID_KEY_CHARS.replace_all(&compact, "").into_owned();
    if key.is_empty() {
        return None;
    }
    if !key.starts_with(|ch: char| ch.is_ascii_alphabetic() || ch == '_') {
        key.insert(0, '_');
    }
    if RESERVED_ATTRIBUTES.contains(&key.as_str()) {
        key.insert_str(0, "prop_");
    }
    Some(key)
}

/// Formats a coordinate: integers bare, otherwise at most two decimals.
pub fn fmt_num(value: f32) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        return format!("{}", rounded as i64);
    }
    let text = format!("{rounded:.2}");
    text.trim_end_matches('0').to_string()
}

/// User text as an html=1 label: markup escaped, newlines as `<br>`.
fn html_text(text: &str) -> String {
    escape_html(text).replace('\n', "<br>")
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
        .replace('\n', "&#10;")
}
