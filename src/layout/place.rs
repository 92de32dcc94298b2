use crate::config::LayoutConfig;
use crate::ir::SubscriptionContent;

use super::size::{Element, Grid, SizedNode, gap_between, side_by_side};
use super::types::ResourceCell;
use super::{CellId, CellKind, LayoutError, Point, Registry, Size};

/// Places `node` at `at` relative to `parent`, then its subtree. Returns the new cell id.
pub(crate) fn place_node(
    registry: &mut Registry,
    node: &SizedNode<'_>,
    parent: Option<CellId>,
    at: Point,
    config: &LayoutConfig,
    depth: usize,
) -> Result<CellId, LayoutError> {
    let (kind, label) = describe(&node.element);
    if depth > config.max_depth {
        return Err(LayoutError::DepthExceeded {
            depth,
            limit: config.max_depth,
            name: label,
        });
    }
    let name = node.element.name().map(str::to_string);
    let id = registry.insert(parent, at, node.size, kind, name, label)?;

    let offsets = child_offsets(node, config);
    debug_assert_eq!(offsets.len(), node.children.len());
    for (child, offset) in node.children.iter().zip(offsets) {
        place_node(registry, child, Some(id), offset, config, depth + 1)?;
    }
    Ok(id)
}

/// Places top-level nodes left to right starting at `origin`; returns the occupied extent.
pub(crate) fn place_row(
    registry: &mut Registry,
    nodes: &[SizedNode<'_>],
    origin: Point,
    config: &LayoutConfig,
) -> Result<Size, LayoutError> {
    let mut x = origin.x;
    for node in nodes {
        place_node(registry, node, None, Point::new(x, origin.y), config, 0)?;
        x += node.size.width + config.container_gap;
    }
    Ok(side_by_side(nodes, config.container_gap))
}

/// Places loose resources on a single grid row starting at `origin`.
pub(crate) fn place_leaf_row(
    registry: &mut Registry,
    nodes: &[SizedNode<'_>],
    origin: Point,
    config: &LayoutConfig,
) -> Result<Size, LayoutError> {
    let grid = Grid::for_items(nodes, nodes.len(), config);
    for (index, node) in nodes.iter().enumerate() {
        let at = origin.offset(grid.slot(index, node.size));
        place_node(registry, node, None, at, config, 0)?;
    }
    Ok(grid.size())
}

fn describe(element: &Element<'_>) -> (CellKind, String) {
    match element {
        Element::Subscription(sub) => (CellKind::Subscription, sub.name.clone()),
        Element::Region(region) => {
            let label = if region.primary {
                format!("{} (Primary)", region.name)
            } else {
                region.name.clone()
            };
            (CellKind::Region { primary: region.primary }, label)
        }
        Element::ResourceGroup(group) => (CellKind::ResourceGroup, group.name.clone()),
        Element::VNet(vnet) => (
            CellKind::VNet { hub: vnet.is_hub() },
            with_range(&vnet.name, vnet.address_space.as_deref()),
        ),
        Element::Subnet(subnet) => (
            CellKind::Subnet,
            with_range(&subnet.name, subnet.address_prefix.as_deref()),
        ),
        Element::Zone(zone) => (CellKind::Zone, format!("Zone {}", zone.zone)),
        Element::OnPremises(block) => (CellKind::OnPremises, block.name.clone()),
        Element::Resource(resource, spec) => (
            CellKind::Resource(ResourceCell {
                spec: *spec,
                properties: resource.properties.clone(),
            }),
            resource.name.clone(),
        ),
    }
}

fn with_range(name: &str, range: Option<&str>) -> String {
    match range {
        Some(range) if !range.trim().is_empty() => format!("{name} ({range})"),
        _ => name.to_string(),
    }
}

fn child_offsets(node: &SizedNode<'_>, config: &LayoutConfig) -> Vec<Point> {
    let pad = config.container_padding;
    let header = config.header_height;
    let inner = Point::new(pad, header);
    let children = node.children.as_slice();

    match node.element {
        Element::Resource(..) => Vec::new(),
        Element::Zone(_) => grid_offsets(children, config.zone_columns, inner, config),
        Element::OnPremises(_) => {
            grid_offsets(children, config.on_premises_columns, inner, config)
        }
        Element::Subnet(_) => {
            let zone_count = children
                .iter()
                .take_while(|child| matches!(child.element, Element::Zone(_)))
                .count();
            let (zones, resources) = children.split_at(zone_count);
            let row_height = zones.iter().map(|zone| zone.size.height).fold(0.0, f32::max);
            let between = gap_between(zones.len(), resources.len(), config.subnet_spacing);
            let mut offsets = row_offsets(zones, inner, config.subnet_spacing);
            offsets.extend(grid_offsets(
                resources,
                config.subnet_columns,
                Point::new(pad, header + row_height + between),
                config,
            ));
            offsets
        }
        Element::VNet(vnet) if vnet.is_hub() => row_offsets(children, inner, config.subnet_spacing),
        Element::VNet(_) => column_offsets(
            children,
            Point::new(config.vnet_margin / 2.0, header),
            config.subnet_spacing,
        ),
        Element::ResourceGroup(_) => {
            let vnet_count = children
                .iter()
                .take_while(|child| matches!(child.element, Element::VNet(_)))
                .count();
            let (vnets, resources) = children.split_at(vnet_count);
            let column_width = vnets.iter().map(|vnet| vnet.size.width).fold(0.0, f32::max);
            let between = gap_between(vnets.len(), resources.len(), config.container_gap);
            let mut offsets = column_offsets(vnets, inner, config.container_gap);
            offsets.extend(grid_offsets(
                resources,
                config.resource_group_columns,
                Point::new(pad + column_width + between, header),
                config,
            ));
            offsets
        }
        Element::Region(_) => column_offsets(children, inner, config.container_gap),
        Element::Subscription(sub) => match sub.content {
            SubscriptionContent::ResourceGroups(_) => {
                column_offsets(children, inner, config.container_gap)
            }
            SubscriptionContent::Regions(_) => row_offsets(children, inner, config.container_gap),
        },
    }
}

fn grid_offsets(
    items: &[SizedNode<'_>],
    max_columns: usize,
    origin: Point,
    config: &LayoutConfig,
) -> Vec<Point> {
    let grid = Grid::for_items(items, max_columns, config);
    items
        .iter()
        .enumerate()
        .map(|(index, item)| origin.offset(grid.slot(index, item.size)))
        .collect()
}

fn row_offsets(items: &[SizedNode<'_>], origin: Point, gap: f32) -> Vec<Point> {
    let mut x = origin.x;
    items
        .iter()
        .map(|item| {
            let at = Point::new(x, origin.y);
            x += item.size.width + gap;
            at
        })
        .collect()
}

fn column_offsets(items: &[SizedNode<'_>], origin: Point, gap: f32) -> Vec<Point> {
    let mut y = origin.y;
    items
        .iter()
        .map(|item| {
            let at = Point::new(origin.x, y);
            y += item.size.height + gap;
            at
        })
        .collect()
}
