use crate::layout::PageLayout;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// JSON snapshot of one laid-out page, for debugging and golden comparisons.
#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub name: String,
    pub prefix: String,
    pub width: f32,
    pub height: f32,
    pub cells: Vec<CellDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
pub struct CellDump {
    pub id: String,
    pub parent: Option<String>,
    pub kind: String,
    pub name: Option<String>,
    pub label: String,
    /// Absolute page coordinates.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub id: String,
    pub source: String,
    pub target: String,
    pub style: String,
    pub route: String,
    pub label: Option<String>,
    pub points: Vec<[f32; 2]>,
}

impl LayoutDump {
    pub fn from_layout(layout: &PageLayout) -> Self {
        let cells = layout
            .cells()
            .iter()
            .map(|cell| CellDump {
                id: layout.qualified_id(cell.id),
                parent: cell.parent.map(|parent| layout.qualified_id(parent)),
                kind: cell.kind.as_str().to_string(),
                name: cell.name.clone(),
                label: cell.label.clone(),
                x: cell.bounds.x,
                y: cell.bounds.y,
                width: cell.bounds.width,
                height: cell.bounds.height,
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                id: layout.qualified_id(edge.id),
                source: layout.qualified_id(edge.source),
                target: layout.qualified_id(edge.target),
                style: edge.style.as_str().to_string(),
                route: edge.route.as_str().to_string(),
                label: edge.label.clone(),
                points: edge.waypoints.iter().map(|point| [point.x, point.y]).collect(),
            })
            .collect();

        LayoutDump {
            name: layout.name.clone(),
            prefix: layout.registry.prefix().to_string(),
            width: layout.width,
            height: layout.height,
            cells,
            edges,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &PageLayout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
