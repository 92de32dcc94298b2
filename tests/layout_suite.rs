use std::collections::HashSet;
use std::path::Path;

use azure_drawio_renderer::ir::{
    Architecture, Connection, ConnectionStyle, Resource, ResourceGroup, Scope, Subscription,
};
use azure_drawio_renderer::layout::{CellKind, LegendSwatch, PageLayout, RouteKind};
use azure_drawio_renderer::{
    LayoutConfig, RenderOptions, compute_layout, generate, generate_from_str,
    generate_with_options, parse_architecture,
};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

const FIXTURES: &[&str] = &[
    "hub_spoke.json",
    "multi_region.json",
    "multi_page.json",
    "degraded.json",
    "stacked_groups.json",
];

fn read_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|err| panic!("fixture {name}: {err}"))
}

fn load_fixture(name: &str) -> Architecture {
    parse_architecture(&read_fixture(name)).unwrap_or_else(|err| panic!("fixture {name}: {err}"))
}

fn layout_fixture(name: &str) -> Vec<PageLayout> {
    compute_layout(&load_fixture(name), &LayoutConfig::default())
        .unwrap_or_else(|err| panic!("fixture {name}: {err}"))
}

fn check_containment(page: &PageLayout) -> Result<(), TestCaseError> {
    for cell in page.cells() {
        let Some(parent) = cell.parent else {
            prop_assert!(cell.bounds.x >= 0.0 && cell.bounds.y >= 0.0);
            prop_assert!(cell.bounds.right() <= page.width + 0.01);
            prop_assert!(cell.bounds.bottom() <= page.height + 0.01);
            continue;
        };
        let outer = page
            .registry
            .bounds(parent)
            .ok_or_else(|| TestCaseError::fail(format!("{} has a dangling parent", cell.label)))?;
        prop_assert!(
            outer.contains(&cell.bounds),
            "{} ({:?}) escapes its parent ({:?})",
            cell.label,
            cell.bounds,
            outer
        );
    }
    Ok(())
}

fn resource_group(name: &str, resources: usize) -> ResourceGroup {
    (0..resources).fold(ResourceGroup::new(name), |group, index| {
        group.with_resource(Resource::new("virtual_machine", format!("{name}-vm{index}")))
    })
}

fn single_subscription(groups: Vec<ResourceGroup>) -> Architecture {
    let mut arch = Architecture::new("Generated");
    arch.scope = Some(Scope::Subscription(Subscription::with_resource_groups(
        "sub", groups,
    )));
    arch
}

#[test]
fn all_fixtures_render() {
    for name in FIXTURES {
        let xml = generate_from_str(&read_fixture(name), &RenderOptions::default())
            .unwrap_or_else(|err| panic!("fixture {name}: {err}"));
        assert!(xml.starts_with("<mxfile"), "{name}: missing mxfile root");
        assert!(xml.ends_with("</mxfile>"), "{name}: unterminated document");
        assert_eq!(
            xml.matches("<diagram ").count(),
            xml.matches("</diagram>").count(),
            "{name}: unbalanced pages"
        );
    }
}

#[test]
fn fixtures_respect_containment() {
    for name in FIXTURES {
        for page in layout_fixture(name) {
            check_containment(&page).unwrap_or_else(|err| panic!("{name}/{}: {err}", page.name));
        }
    }
}

#[test]
fn output_is_byte_identical_across_runs() {
    for name in FIXTURES {
        let arch = load_fixture(name);
        let first = generate(&arch).unwrap();
        let second = generate(&arch).unwrap();
        assert_eq!(first, second, "{name}: output differs between runs");
    }
}

#[test]
fn pages_have_isolated_id_namespaces() {
    let pages = layout_fixture("multi_page.json");
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].name, "Platform");
    assert_eq!(pages[1].name, "Workload");

    let mut seen = HashSet::new();
    for (index, page) in pages.iter().enumerate() {
        let prefix = format!("p{}-", index + 1);
        for cell in page.cells() {
            let id = page.qualified_id(cell.id);
            assert!(id.starts_with(&prefix), "{id} outside {prefix}");
            assert!(seen.insert(id.clone()), "{id} reused");
        }
        for edge in &page.edges {
            assert!(page.registry.get(edge.source).is_some());
            assert!(page.registry.get(edge.target).is_some());
        }
    }
    assert_eq!(pages[0].cells()[0].id, pages[1].cells()[0].id);

    let xml = generate(&load_fixture("multi_page.json")).unwrap();
    assert!(xml.contains("<diagram id=\"page-1\" name=\"Platform\">"));
    assert!(xml.contains("<diagram id=\"page-2\" name=\"Workload\">"));
}

#[test]
fn identical_pages_never_share_identifiers() {
    let mut twin = single_subscription(vec![resource_group("web", 2), resource_group("data", 1)]);
    twin.connections = vec![Connection::new("web-vm0", "data-vm0")];
    let mut arch = Architecture::new("Twins");
    arch.pages = vec![twin.clone(), twin];
    let pages = compute_layout(&arch, &LayoutConfig::default()).unwrap();
    assert_eq!(pages.len(), 2);

    let mut seen = HashSet::new();
    for page in &pages {
        assert_eq!(page.edges.len(), 1);
        let ids = page
            .cells()
            .iter()
            .map(|cell| cell.id)
            .chain(page.edges.iter().map(|edge| edge.id));
        for id in ids {
            let id = page.qualified_id(id);
            assert!(seen.insert(id.clone()), "{id} appears on two pages");
        }
    }
    for edge in &pages[1].edges {
        for id in [edge.id, edge.source, edge.target] {
            let id = pages[1].qualified_id(id);
            assert!(id.starts_with("p2-"), "page 2 edge references {id}");
        }
    }

    let xml = generate(&arch).unwrap();
    let second = xml
        .split("<diagram id=\"page-2\"")
        .nth(1)
        .expect("second page");
    assert!(!second.contains("\"p1-"), "page 2 references page 1 ids");
    assert!(second.contains("source=\"p2-"));
}

#[test]
fn legend_lists_exactly_what_the_page_uses() {
    for name in FIXTURES {
        for page in layout_fixture(name) {
            let used: HashSet<&str> = page
                .cells()
                .iter()
                .filter_map(|cell| match &cell.kind {
                    CellKind::Resource(resource) => Some(resource.spec.key),
                    _ => None,
                })
                .collect();
            let listed: Vec<&str> = page
                .cells()
                .iter()
                .filter_map(|cell| match &cell.kind {
                    CellKind::LegendEntry(LegendSwatch::Resource(spec)) => Some(spec.key),
                    _ => None,
                })
                .collect();
            assert_eq!(listed.len(), used.len(), "{name}: duplicate or missing legend rows");
            assert_eq!(listed.iter().copied().collect::<HashSet<_>>(), used, "{name}");

            let styles: HashSet<ConnectionStyle> =
                page.edges.iter().map(|edge| edge.style).collect();
            let swatches: HashSet<ConnectionStyle> = page
                .cells()
                .iter()
                .filter_map(|cell| match &cell.kind {
                    CellKind::LegendEntry(LegendSwatch::Connection(style)) => Some(*style),
                    _ => None,
                })
                .collect();
            if styles.iter().any(|style| *style != ConnectionStyle::Plain) {
                assert_eq!(swatches, styles, "{name}");
            } else {
                assert!(swatches.is_empty(), "{name}: plain-only page lists styles");
            }
        }
    }
}

#[test]
fn bad_resources_and_connections_degrade_gracefully() {
    let pages = layout_fixture("degraded.json");
    let page = &pages[0];
    assert!(page.find_by_name("qpu").is_none());
    assert!(page.find_by_name("vm-ok").is_some());
    assert!(page.find_by_name("kv-ok").is_some());
    assert!(page.find_by_name("rg-empty").is_some());
    assert_eq!(page.edges.len(), 1);
    assert_eq!(page.edges[0].style, ConnectionStyle::Plain);

    let xml = generate(&load_fixture("degraded.json")).unwrap();
    assert!(!xml.contains("qpu"));
}

#[test]
fn stacked_groups_detour_around_the_middle_group() {
    let pages = layout_fixture("stacked_groups.json");
    let page = &pages[0];
    let edge = &page.edges[0];
    assert_eq!(edge.route, RouteKind::Detour);
    assert_eq!(edge.waypoints.len(), 2);
    let x = edge.waypoints[0].x;
    assert_eq!(edge.waypoints[1].x, x);
    for name in ["A", "B", "C", "vm-a", "vm-c"] {
        let cell = page.find_by_name(name).unwrap();
        assert!(x > cell.bounds.right(), "waypoint x {x} not right of {name}");
    }
    let source = page.registry.bounds(edge.source).unwrap();
    let target = page.registry.bounds(edge.target).unwrap();
    assert!(x > source.right() && x > target.right());
    assert!(edge.waypoints.iter().all(|point| point.x < page.width));

    let xml = generate(&load_fixture("stacked_groups.json")).unwrap();
    assert!(xml.contains("<Array as=\"points\">"));
    assert!(xml.contains("exitX=1;"));
}

#[test]
fn endpoint_names_resolve_through_all_tiers() {
    let pages = layout_fixture("hub_spoke.json");
    let page = &pages[0];
    let named = |id| page.registry.get(id).and_then(|cell| cell.name.as_deref());
    let vpn = page
        .edges
        .iter()
        .find(|edge| edge.style == ConnectionStyle::Vpn)
        .unwrap();
    assert_eq!(named(vpn.source), Some("On-Premises Datacenter"));
    assert_eq!(named(vpn.target), Some("vpngw-hub"));
    assert_eq!(page.edges.len(), 5);
}

#[test]
fn custom_properties_reach_the_document() {
    let xml = generate(&load_fixture("hub_spoke.json")).unwrap();
    assert!(xml.contains(" softDelete=\"true\""));
    assert!(!xml.contains("retention"));
    assert!(xml.contains(" os=\"Ubuntu 22.04\""));
    assert!(xml.contains("vmSize: Standard_D4s_v5"));
}

#[test]
fn monochrome_theme_changes_only_colors() {
    let arch = load_fixture("multi_region.json");
    let azure = generate(&arch).unwrap();
    let mono = generate_with_options(&arch, &RenderOptions::monochrome()).unwrap();
    assert_ne!(azure, mono);
    assert_eq!(azure.matches("vertex=\"1\"").count(), mono.matches("vertex=\"1\"").count());
}

#[test]
fn untitled_connections_to_self_are_dropped() {
    let mut arch = single_subscription(vec![resource_group("rg", 1)]);
    arch.connections = vec![Connection::new("rg-vm0", "RG-VM0")];
    let pages = compute_layout(&arch, &LayoutConfig::default()).unwrap();
    assert!(pages[0].edges.is_empty());
}

proptest! {
    #[test]
    fn generated_layouts_are_contained(
        groups in prop::collection::vec(0usize..9, 1..5),
        zones in 0usize..4,
    ) {
        let mut groups: Vec<ResourceGroup> = groups
            .iter()
            .enumerate()
            .map(|(index, count)| resource_group(&format!("rg{index}"), *count))
            .collect();
        if zones > 0 {
            let subnet = azure_drawio_renderer::ir::Subnet {
                name: "snet".to_string(),
                availability_zones: (1..=zones)
                    .map(|zone| azure_drawio_renderer::ir::AvailabilityZoneGroup {
                        zone: zone.to_string(),
                        resources: vec![Resource::new("vm", format!("z{zone}"))],
                    })
                    .collect(),
                ..Default::default()
            };
            let vnet = azure_drawio_renderer::ir::VNet {
                name: "vnet".to_string(),
                subnets: vec![subnet],
                ..Default::default()
            };
            groups[0] = groups[0].clone().with_vnet(vnet);
        }
        let pages = compute_layout(&single_subscription(groups), &LayoutConfig::default())
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        for page in &pages {
            check_containment(page)?;
        }
    }

    #[test]
    fn adding_a_resource_never_shrinks_its_group(count in 0usize..12) {
        let config = LayoutConfig::default();
        let size_of = |resources: usize| -> Result<(f32, f32), TestCaseError> {
            let arch = single_subscription(vec![resource_group("rg", resources)]);
            let pages = compute_layout(&arch, &config)
                .map_err(|err| TestCaseError::fail(err.to_string()))?;
            let group = pages[0]
                .find_by_name("rg")
                .ok_or_else(|| TestCaseError::fail("group missing"))?;
            Ok((group.bounds.width, group.bounds.height))
        };
        let before = size_of(count)?;
        let after = size_of(count + 1)?;
        prop_assert!(after.0 >= before.0 && after.1 >= before.1, "{before:?} -> {after:?}");
    }
}
