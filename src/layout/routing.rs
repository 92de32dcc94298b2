use std::collections::HashSet;

use log::{debug, warn};

use crate::config::RoutingConfig;
use crate::ir::Connection;

use super::{CellId, EdgeLayout, Point, Rect, Registry, RouteKind};

/// A container that sits between two endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Obstacle {
    pub(super) id: CellId,
    pub(super) bounds: Rect,
}

/// Resolves every connection against the placed cells and plans its route.
/// Connections whose endpoints cannot be found are logged and left out.
pub(crate) fn route_connections(
    registry: &mut Registry,
    connections: &[Connection],
    config: &RoutingConfig,
) -> Vec<EdgeLayout> {
    let mut edges = Vec::with_capacity(connections.len());
    for connection in connections {
        let source = resolve_endpoint(registry, &connection.from);
        let target = resolve_endpoint(registry, &connection.to);
        let (Some(source), Some(target)) = (source, target) else {
            warn!(
                from = connection.from.as_str(),
                to = connection.to.as_str(),
                from_found = source.is_some(),
                to_found = target.is_some();
                "Connection endpoint not found; dropping connection"
            );
            continue;
        };
        if source == target {
            warn!(
                from = connection.from.as_str(),
                to = connection.to.as_str();
                "Connection endpoints resolve to the same cell; dropping connection"
            );
            continue;
        }

        let (route, waypoints) = plan_route(registry, source, target, config);
        let id = registry.issue_id();
        edges.push(EdgeLayout {
            id,
            source,
            target,
            style: connection.effective_style(),
            label: connection
                .label
                .as_deref()
                .map(str::trim)
                .filter(|label| !label.is_empty())
                .map(str::to_string),
            route,
            waypoints,
        });
    }
    edges
}

/// Finds the cell a connection endpoint refers to.
///
/// Tries an exact name match, then a case-insensitive one, then a case-insensitive
/// substring match in either direction. Within a tier the earliest placed cell wins.
pub fn resolve_endpoint(registry: &Registry, query: &str) -> Option<CellId> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    let named = || {
        registry.cells().iter().filter_map(|cell| {
            cell.name
                .as_deref()
                .filter(|name| !name.trim().is_empty())
                .map(|name| (cell.id, name))
        })
    };

    if let Some((id, _)) = named().find(|(_, name)| *name == query) {
        return Some(id);
    }
    let lowered = query.to_lowercase();
    if let Some((id, _)) = named().find(|(_, name)| name.to_lowercase() == lowered) {
        return Some(id);
    }
    named()
        .find(|(_, name)| {
            let name = name.to_lowercase();
            name.contains(&lowered) || lowered.contains(&name)
        })
        .map(|(id, _)| id)
}

/// Containers whose vertical center lies strictly between the endpoints' centers
/// and which overlap the endpoints' horizontal corridor. Containers holding either
/// endpoint, or held by either endpoint, never obstruct.
pub(super) fn find_obstructions(
    registry: &Registry,
    source: CellId,
    target: CellId,
    corridor_margin: f32,
) -> Vec<Obstacle> {
    let (Some(from), Some(to)) = (registry.bounds(source), registry.bounds(target)) else {
        return Vec::new();
    };
    let holders: HashSet<CellId> = registry
        .ancestors(source)
        .into_iter()
        .chain(registry.ancestors(target))
        .collect();
    let (a, b) = (from.center().y, to.center().y);
    let (top, bottom) = (a.min(b), a.max(b));
    let left = from.x.min(to.x) - corridor_margin;
    let right = from.right().max(to.right()) + corridor_margin;

    registry
        .cells()
        .iter()
        .filter(|cell| cell.kind.is_architecture_container())
        .filter(|cell| cell.id != source && cell.id != target && !holders.contains(&cell.id))
        .filter(|cell| !from.contains(&cell.bounds) && !to.contains(&cell.bounds))
        .filter(|cell| {
            let middle = cell.bounds.center().y;
            top < middle && middle < bottom
        })
        .filter(|cell| cell.bounds.x < right && cell.bounds.right() > left)
        .map(|cell| Obstacle {
            id: cell.id,
            bounds: cell.bounds,
        })
        .collect()
}

fn plan_route(
    registry: &Registry,
    source: CellId,
    target: CellId,
    config: &RoutingConfig,
) -> (RouteKind, Vec<Point>) {
    let (Some(from), Some(to)) = (registry.bounds(source), registry.bounds(target)) else {
        return (RouteKind::Direct, Vec::new());
    };
    let (start, end) = (from.center(), to.center());
    if (start.y - end.y).abs() < config.direct_threshold {
        return (RouteKind::Direct, Vec::new());
    }

    let obstacles = find_obstructions(registry, source, target, config.corridor_margin);
    if obstacles.is_empty() {
        return (RouteKind::Orthogonal, Vec::new());
    }
    debug!(
        source = source.0,
        target = target.0,
        blocking = obstacles
            .iter()
            .map(|obstacle| obstacle.id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        "Routing connection around obstructing containers"
    );
    let x = obstacles
        .iter()
        .map(|obstacle| obstacle.bounds.right())
        .fold(from.right().max(to.right()), f32::max)
        + config.waypoint_clearance;
    (
        RouteKind::Detour,
        vec![Point::new(x, start.y), Point::new(x, end.y)],
    )
}
