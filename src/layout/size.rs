use log::warn;

use crate::catalog::{self, ResourceSpec};
use crate::config::LayoutConfig;
use crate::ir::{
    AvailabilityZoneGroup, OnPremises, Region, Resource, ResourceGroup, Scope, Subnet,
    Subscription, SubscriptionContent, VNet,
};

use super::{Point, Size};

/// Closed set of architecture elements the estimator and placer walk.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Element<'a> {
    Subscription(&'a Subscription),
    Region(&'a Region),
    ResourceGroup(&'a ResourceGroup),
    VNet(&'a VNet),
    Subnet(&'a Subnet),
    Zone(&'a AvailabilityZoneGroup),
    OnPremises(&'a OnPremises),
    Resource(&'a Resource, &'static ResourceSpec),
}

impl Element<'_> {
    /// Name connections can refer to. Zones are anonymous.
    pub(crate) fn name(&self) -> Option<&str> {
        match self {
            Element::Subscription(sub) => Some(&sub.name),
            Element::Region(region) => Some(&region.name),
            Element::ResourceGroup(group) => Some(&group.name),
            Element::VNet(vnet) => Some(&vnet.name),
            Element::Subnet(subnet) => Some(&subnet.name),
            Element::Zone(_) => None,
            Element::OnPremises(block) => Some(&block.name),
            Element::Resource(resource, _) => Some(&resource.name),
        }
    }
}

/// An element with its computed footprint; children are in placement order.
#[derive(Debug, Clone)]
pub(crate) struct SizedNode<'a> {
    pub(crate) element: Element<'a>,
    pub(crate) size: Size,
    pub(crate) children: Vec<SizedNode<'a>>,
}

/// Wrapped grid of equal cells used for leaf resources.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Grid {
    pub(crate) columns: usize,
    pub(crate) rows: usize,
    pub(crate) cell: Size,
}

impl Grid {
    pub(crate) fn for_items(
        items: &[SizedNode<'_>],
        max_columns: usize,
        config: &LayoutConfig,
    ) -> Self {
        let max_columns = max_columns.max(1);
        let floor = Size::new(config.resource_column_width, config.resource_row_height);
        Self {
            columns: items.len().min(max_columns),
            rows: items.len().div_ceil(max_columns),
            cell: items.iter().fold(floor, |cell, item| cell.at_least(item.size)),
        }
    }

    pub(crate) fn size(&self) -> Size {
        Size::new(
            self.columns as f32 * self.cell.width,
            self.rows as f32 * self.cell.height,
        )
    }

    /// Offset of the `index`-th footprint inside the grid: centered horizontally,
    /// in the upper part of its cell so the caption below stays inside the row.
    pub(crate) fn slot(&self, index: usize, item: Size) -> Point {
        let columns = self.columns.max(1);
        let column = (index % columns) as f32;
        let row = (index / columns) as f32;
        Point::new(
            column * self.cell.width + (self.cell.width - item.width) / 2.0,
            row * self.cell.height + (self.cell.height - item.height) / 4.0,
        )
    }
}

/// Items laid out left to right with `gap` between them.
pub(crate) fn side_by_side(items: &[SizedNode<'_>], gap: f32) -> Size {
    let width: f32 = items.iter().map(|item| item.size.width).sum();
    let height = items.iter().map(|item| item.size.height).fold(0.0, f32::max);
    Size::new(width + gap * items.len().saturating_sub(1) as f32, height)
}

/// Items laid out top to bottom with `gap` between them.
pub(crate) fn stacked(items: &[SizedNode<'_>], gap: f32) -> Size {
    let width = items.iter().map(|item| item.size.width).fold(0.0, f32::max);
    let height: f32 = items.iter().map(|item| item.size.height).sum();
    Size::new(width, height + gap * items.len().saturating_sub(1) as f32)
}

/// Content plus side padding, header band and bottom padding.
fn framed(content: Size, config: &LayoutConfig) -> Size {
    Size::new(
        content.width + config.container_padding * 2.0,
        content.height + config.header_height + config.container_padding,
    )
}

/// Gap inserted between two arrangements only when both are non-empty.
pub(crate) fn gap_between(first: usize, second: usize, gap: f32) -> f32 {
    if first > 0 && second > 0 { gap } else { 0.0 }
}

pub(crate) fn size_resource(resource: &Resource) -> Option<SizedNode<'_>> {
    let Some(spec) = catalog::lookup(&resource.kind) else {
        warn!(
            resource_type = resource.kind.as_str(),
            name = resource.name.as_str();
            "Unknown resource type; skipping resource"
        );
        return None;
    };
    Some(SizedNode {
        element: Element::Resource(resource, spec),
        size: Size::new(spec.width, spec.height),
        children: Vec::new(),
    })
}

pub(crate) fn size_resources<'a>(
    resources: impl IntoIterator<Item = &'a Resource>,
) -> Vec<SizedNode<'a>> {
    resources.into_iter().filter_map(size_resource).collect()
}

pub(crate) fn size_zone<'a>(
    zone: &'a AvailabilityZoneGroup,
    config: &LayoutConfig,
) -> SizedNode<'a> {
    let children = size_resources(&zone.resources);
    let grid = Grid::for_items(&children, config.zone_columns, config);
    SizedNode {
        element: Element::Zone(zone),
        size: framed(grid.size(), config).at_least(config.min_sizes.zone),
        children,
    }
}

pub(crate) fn size_subnet<'a>(subnet: &'a Subnet, config: &LayoutConfig) -> SizedNode<'a> {
    let mut children: Vec<SizedNode<'a>> = subnet
        .availability_zones
        .iter()
        .map(|zone| size_zone(zone, config))
        .collect();
    let zone_count = children.len();
    children.extend(size_resources(&subnet.resources));

    let (zones, resources) = children.split_at(zone_count);
    let row = side_by_side(zones, config.subnet_spacing);
    let grid = Grid::for_items(resources, config.subnet_columns, config).size();
    let between = gap_between(zones.len(), resources.len(), config.subnet_spacing);
    let content = Size::new(row.width.max(grid.width), row.height + between + grid.height);

    SizedNode {
        element: Element::Subnet(subnet),
        size: framed(content, config).at_least(config.min_sizes.subnet),
        children,
    }
}

pub(crate) fn size_vnet<'a>(vnet: &'a VNet, config: &LayoutConfig) -> SizedNode<'a> {
    let children: Vec<SizedNode<'a>> = vnet
        .subnets
        .iter()
        .map(|subnet| size_subnet(subnet, config))
        .collect();
    let size = if vnet.is_hub() {
        framed(side_by_side(&children, config.subnet_spacing), config)
    } else {
        let column = stacked(&children, config.subnet_spacing);
        Size::new(
            column.width + config.vnet_margin,
            column.height + config.header_height + config.container_padding,
        )
    };
    SizedNode {
        element: Element::VNet(vnet),
        size: size.at_least(config.min_sizes.vnet),
        children,
    }
}

pub(crate) fn size_resource_group<'a>(
    group: &'a ResourceGroup,
    config: &LayoutConfig,
) -> SizedNode<'a> {
    let mut children: Vec<SizedNode<'a>> =
        group.vnets().map(|vnet| size_vnet(vnet, config)).collect();
    let vnet_count = children.len();
    children.extend(size_resources(group.resources()));

    let (vnets, resources) = children.split_at(vnet_count);
    let column = stacked(vnets, config.container_gap);
    let grid = Grid::for_items(resources, config.resource_group_columns, config).size();
    let between = gap_between(vnets.len(), resources.len(), config.container_gap);
    let content = Size::new(
        column.width + between + grid.width,
        column.height.max(grid.height),
    );

    SizedNode {
        element: Element::ResourceGroup(group),
        size: framed(content, config).at_least(config.min_sizes.resource_group),
        children,
    }
}

pub(crate) fn size_region<'a>(region: &'a Region, config: &LayoutConfig) -> SizedNode<'a> {
    let children: Vec<SizedNode<'a>> = region
        .resource_groups
        .iter()
        .map(|group| size_resource_group(group, config))
        .collect();
    let content = stacked(&children, config.container_gap);
    SizedNode {
        element: Element::Region(region),
        size: framed(content, config).at_least(config.min_sizes.region),
        children,
    }
}

pub(crate) fn size_subscription<'a>(
    subscription: &'a Subscription,
    config: &LayoutConfig,
) -> SizedNode<'a> {
    let (children, content) = match &subscription.content {
        SubscriptionContent::ResourceGroups(groups) => {
            let children: Vec<SizedNode<'a>> = groups
                .iter()
                .map(|group| size_resource_group(group, config))
                .collect();
            let content = stacked(&children, config.container_gap);
            (children, content)
        }
        SubscriptionContent::Regions(regions) => {
            let children: Vec<SizedNode<'a>> = regions
                .iter()
                .map(|region| size_region(region, config))
                .collect();
            let content = side_by_side(&children, config.container_gap);
            (children, content)
        }
    };
    SizedNode {
        element: Element::Subscription(subscription),
        size: framed(content, config).at_least(config.min_sizes.subscription),
        children,
    }
}

pub(crate) fn size_on_premises<'a>(block: &'a OnPremises, config: &LayoutConfig) -> SizedNode<'a> {
    let children = size_resources(&block.resources);
    let grid = Grid::for_items(&children, config.on_premises_columns, config);
    SizedNode {
        element: Element::OnPremises(block),
        size: framed(grid.size(), config).at_least(config.min_sizes.on_premises),
        children,
    }
}

/// Top-level cloud containers of a page, left to right.
pub(crate) fn size_scope<'a>(scope: &'a Scope, config: &LayoutConfig) -> Vec<SizedNode<'a>> {
    match scope {
        Scope::Subscription(subscription) => vec![size_subscription(subscription, config)],
        Scope::Subscriptions(subscriptions) => subscriptions
            .iter()
            .map(|subscription| size_subscription(subscription, config))
            .collect(),
        Scope::Regions(regions) => regions
            .iter()
            .map(|region| size_region(region, config))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{GroupItem, VNetKind};

    fn subnet(name: &str, resources: usize) -> Subnet {
        Subnet {
            name: name.to_string(),
            resources: (0..resources)
                .map(|i| Resource::new("virtual_machine", format!("{name}-vm{i}")))
                .collect(),
            ..Default::default()
        }
    }

    fn vnet(kind: VNetKind, subnets: Vec<Subnet>) -> VNet {
        VNet {
            name: "vnet".to_string(),
            kind,
            address_space: None,
            subnets,
        }
    }

    #[test]
    fn empty_containers_hit_their_floor() {
        let config = LayoutConfig::default();
        let group = ResourceGroup::new("empty");
        assert_eq!(size_resource_group(&group, &config).size, config.min_sizes.resource_group);
        let block = OnPremises::default();
        assert_eq!(size_on_premises(&block, &config).size, config.min_sizes.on_premises);
    }

    #[test]
    fn resource_group_grid_wraps_at_four_columns() {
        let config = LayoutConfig::default();
        let mut group = ResourceGroup::new("rg");
        for i in 0..5 {
            group = group.with_resource(Resource::new("app_service", format!("app{i}")));
        }
        let sized = size_resource_group(&group, &config);
        let expected_width = 4.0 * config.resource_column_width + 2.0 * config.container_padding;
        let expected_height = 2.0 * config.resource_row_height
            + config.header_height
            + config.container_padding;
        assert_eq!(sized.size.width, expected_width.max(config.min_sizes.resource_group.width));
        assert_eq!(sized.size.height, expected_height.max(config.min_sizes.resource_group.height));
    }

    #[test]
    fn adding_resources_never_shrinks_a_group() {
        let config = LayoutConfig::default();
        let mut group =
            ResourceGroup::new("rg").with_vnet(vnet(VNetKind::Hub, vec![subnet("a", 1)]));
        let mut previous = size_resource_group(&group, &config).size;
        for i in 0..10 {
            group = group.with_resource(Resource::new("key_vault", format!("kv{i}")));
            let next = size_resource_group(&group, &config).size;
            assert!(next.width >= previous.width && next.height >= previous.height);
            previous = next;
        }
    }

    #[test]
    fn hub_vnets_grow_sideways_and_standard_vnets_grow_down() {
        let config = LayoutConfig::default();
        let subnets = vec![subnet("a", 4), subnet("b", 4), subnet("c", 4)];
        let hub_vnet = vnet(VNetKind::Hub, subnets.clone());
        let standard_vnet = vnet(VNetKind::Standard, subnets);
        let hub = size_vnet(&hub_vnet, &config);
        let standard = size_vnet(&standard_vnet, &config);

        let child = hub.children[0].size;
        assert_eq!(
            hub.size.width,
            3.0 * child.width + 2.0 * config.subnet_spacing + 2.0 * config.container_padding
        );
        assert_eq!(
            standard.size.height,
            3.0 * child.height
                + 2.0 * config.subnet_spacing
                + config.header_height
                + config.container_padding
        );
        assert_eq!(standard.size.width, child.width + config.vnet_margin);
        assert!(hub.size.width > standard.size.width);
        assert!(standard.size.height > hub.size.height);
    }

    #[test]
    fn unknown_types_are_left_out() {
        let config = LayoutConfig::default();
        let group = ResourceGroup {
            name: "rg".to_string(),
            items: vec![
                GroupItem::Resource(Resource::new("virtual_machine", "vm")),
                GroupItem::Resource(Resource::new("flux_capacitor", "fc")),
            ],
        };
        let sized = size_resource_group(&group, &config);
        assert_eq!(sized.children.len(), 1);
        assert_eq!(sized.children[0].element.name(), Some("vm"));
    }

    #[test]
    fn subnet_places_zones_above_resources() {
        let config = LayoutConfig::default();
        let mut with_zones = subnet("app", 2);
        with_zones.availability_zones = vec![
            AvailabilityZoneGroup {
                zone: "1".to_string(),
                resources: vec![Resource::new("virtual_machine", "z1")],
            },
            AvailabilityZoneGroup {
                zone: "2".to_string(),
                resources: vec![Resource::new("virtual_machine", "z2")],
            },
        ];
        let sized = size_subnet(&with_zones, &config);
        assert!(matches!(sized.children[0].element, Element::Zone(_)));
        assert!(matches!(sized.children[2].element, Element::Resource(..)));
        let zone = sized.children[0].size;
        assert!(sized.size.width >= 2.0 * zone.width + config.subnet_spacing);
        assert!(sized.size.height >= zone.height + config.resource_row_height);
    }

    #[test]
    fn oversized_footprints_widen_grid_cells() {
        let mut config = LayoutConfig::default();
        config.resource_column_width = 10.0;
        config.resource_row_height = 10.0;
        let vm = Resource::new("virtual_machine", "vm");
        let items = size_resources([&vm]);
        let grid = Grid::for_items(&items, 4, &config);
        assert_eq!(grid.cell, items[0].size);
        assert_eq!(grid.slot(0, items[0].size), Point::new(0.0, 0.0));
    }
}
