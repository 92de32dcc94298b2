use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::ResourceSpec;
use crate::ir::{ConnectionStyle, Properties};

use super::registry::Registry;

/// Tolerance for float comparisons on accumulated coordinates.
pub(crate) const GEOMETRY_EPSILON: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Component-wise maximum.
    pub fn at_least(self, floor: Size) -> Size {
        Size::new(self.width.max(floor.width), self.height.max(floor.height))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(origin: Point, size: Size) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// True when `other` lies entirely inside `self` (edges inclusive).
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x - GEOMETRY_EPSILON
            && other.y >= self.y - GEOMETRY_EPSILON
            && other.right() <= self.right() + GEOMETRY_EPSILON
            && other.bottom() <= self.bottom() + GEOMETRY_EPSILON
    }
}

/// Page-scoped cell identifier. Rendered with the page prefix, e.g. `p2-14`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CellId(pub u32);

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceCell {
    pub spec: &'static ResourceSpec,
    pub properties: Properties,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LegendSwatch {
    Resource(&'static ResourceSpec),
    Connection(ConnectionStyle),
}

/// Every kind of vertex a page can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum CellKind {
    Subscription,
    Region { primary: bool },
    ResourceGroup,
    VNet { hub: bool },
    Subnet,
    Zone,
    OnPremises,
    Resource(ResourceCell),
    TitleBlock,
    TitleHeading,
    TitleDescription,
    Legend,
    LegendHeading,
    LegendEntry(LegendSwatch),
}

impl CellKind {
    /// Containers that come from the architecture itself, as opposed to decoration.
    pub fn is_architecture_container(&self) -> bool {
        matches!(
            self,
            CellKind::Subscription
                | CellKind::Region { .. }
                | CellKind::ResourceGroup
                | CellKind::VNet { .. }
                | CellKind::Subnet
                | CellKind::Zone
                | CellKind::OnPremises
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CellKind::Subscription => "subscription",
            CellKind::Region { .. } => "region",
            CellKind::ResourceGroup => "resource_group",
            CellKind::VNet { .. } => "vnet",
            CellKind::Subnet => "subnet",
            CellKind::Zone => "zone",
            CellKind::OnPremises => "on_premises",
            CellKind::Resource(_) => "resource",
            CellKind::TitleBlock => "title",
            CellKind::TitleHeading => "title_heading",
            CellKind::TitleDescription => "title_description",
            CellKind::Legend => "legend",
            CellKind::LegendHeading => "legend_heading",
            CellKind::LegendEntry(_) => "legend_entry",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub id: CellId,
    pub parent: Option<CellId>,
    pub kind: CellKind,
    /// Name connections may refer to; `None` for decoration.
    pub name: Option<String>,
    pub label: String,
    pub relative: Point,
    pub bounds: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// Straight line, endpoints roughly level.
    Direct,
    /// Nothing in the way; the renderer's orthogonal router decides.
    Orthogonal,
    /// Right-side detour around obstructing containers.
    Detour,
}

impl RouteKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RouteKind::Direct => "direct",
            RouteKind::Orthogonal => "orthogonal",
            RouteKind::Detour => "detour",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLayout {
    pub id: CellId,
    pub source: CellId,
    pub target: CellId,
    pub style: ConnectionStyle,
    pub label: Option<String>,
    pub route: RouteKind,
    /// Absolute page coordinates.
    pub waypoints: Vec<Point>,
}

#[derive(Debug, Clone)]
pub struct PageLayout {
    pub name: String,
    pub width: f32,
    pub height: f32,
    pub registry: Registry,
    pub edges: Vec<EdgeLayout>,
}

impl PageLayout {
    pub fn cells(&self) -> &[Cell] {
        self.registry.cells()
    }

    /// Document-level identifier for a cell of this page.
    pub fn qualified_id(&self, id: CellId) -> String {
        self.registry.qualified_id(id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Cell> {
        self.cells()
            .iter()
            .find(|cell| cell.name.as_deref() == Some(name))
    }
}
