use std::fmt;

use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Deserializer};

/// Raised while converting deserialized input into the validated schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("architecture `{title}` declares more than one of subscription, subscriptions and regions")]
    ConflictingScope { title: String },
    #[error("subscription `{name}` declares both resource groups and regions")]
    ConflictingSubscriptionContent { name: String },
    #[error("page `{title}` declares nested pages; pages are only allowed at the top level")]
    NestedPages { title: String },
}

/// A single resource property value. Nulls are dropped before they reach this type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(value) => write!(f, "{value}"),
            Scalar::Number(value) => write!(f, "{value}"),
            Scalar::String(value) => f.write_str(value),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value.into())
    }
}

/// Resource properties in the order the caller supplied them.
pub type Properties = IndexMap<String, Scalar>;

fn deserialize_properties<'de, D>(deserializer: D) -> Result<Properties, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<IndexMap<String, Option<Scalar>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key, value)))
        .collect())
}

fn deserialize_zone<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Scalar::deserialize(deserializer)?.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Resource {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_properties")]
    pub properties: Properties,
}

impl Resource {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            properties: Properties::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityZoneGroup {
    #[serde(deserialize_with = "deserialize_zone")]
    pub zone: String,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subnet {
    pub name: String,
    #[serde(default, alias = "address_prefix")]
    pub address_prefix: Option<String>,
    #[serde(default, alias = "availability_zones", alias = "zones")]
    pub availability_zones: Vec<AvailabilityZoneGroup>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VNetKind {
    #[default]
    #[serde(alias = "spoke")]
    Standard,
    Hub,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VNet {
    pub name: String,
    pub kind: VNetKind,
    pub address_space: Option<String>,
    pub subnets: Vec<Subnet>,
}

impl VNet {
    pub fn is_hub(&self) -> bool {
        self.kind == VNetKind::Hub
    }
}

/// One entry of a resource group's ordered resource list.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupItem {
    VNet(VNet),
    Resource(Resource),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawResourceGroup")]
pub struct ResourceGroup {
    pub name: String,
    pub items: Vec<GroupItem>,
}

impl ResourceGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.items.push(GroupItem::Resource(resource));
        self
    }

    pub fn with_vnet(mut self, vnet: VNet) -> Self {
        self.items.push(GroupItem::VNet(vnet));
        self
    }

    /// Virtual networks in declaration order.
    pub fn vnets(&self) -> impl Iterator<Item = &VNet> {
        self.items.iter().filter_map(|item| match item {
            GroupItem::VNet(vnet) => Some(vnet),
            GroupItem::Resource(_) => None,
        })
    }

    /// Non-network resources in declaration order.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.items.iter().filter_map(|item| match item {
            GroupItem::Resource(resource) => Some(resource),
            GroupItem::VNet(_) => None,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResourceGroup {
    name: String,
    #[serde(default)]
    resources: Vec<RawGroupItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGroupItem {
    #[serde(rename = "type")]
    resource_type: String,
    name: String,
    #[serde(default, deserialize_with = "deserialize_properties")]
    properties: Properties,
    #[serde(default)]
    kind: Option<VNetKind>,
    #[serde(default, alias = "address_space")]
    address_space: Option<String>,
    #[serde(default)]
    subnets: Vec<Subnet>,
}

impl From<RawGroupItem> for GroupItem {
    fn from(raw: RawGroupItem) -> Self {
        let normalized = crate::catalog::normalize_type(&raw.resource_type);
        match normalized.as_str() {
            "vnet" | "virtual_network" | "hub_vnet" => {
                let kind = if normalized == "hub_vnet" {
                    VNetKind::Hub
                } else {
                    raw.kind.unwrap_or_default()
                };
                GroupItem::VNet(VNet {
                    name: raw.name,
                    kind,
                    address_space: raw.address_space,
                    subnets: raw.subnets,
                })
            }
            _ => GroupItem::Resource(Resource {
                kind: raw.resource_type,
                name: raw.name,
                properties: raw.properties,
            }),
        }
    }
}

impl From<RawResourceGroup> for ResourceGroup {
    fn from(raw: RawResourceGroup) -> Self {
        Self {
            name: raw.name,
            items: raw.resources.into_iter().map(GroupItem::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub name: String,
    #[serde(default, alias = "isPrimary", alias = "is_primary")]
    pub primary: bool,
    #[serde(default, alias = "resource_groups")]
    pub resource_groups: Vec<ResourceGroup>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubscriptionContent {
    ResourceGroups(Vec<ResourceGroup>),
    Regions(Vec<Region>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawSubscription")]
pub struct Subscription {
    pub name: String,
    pub content: SubscriptionContent,
}

impl Subscription {
    pub fn with_resource_groups(name: impl Into<String>, groups: Vec<ResourceGroup>) -> Self {
        Self {
            name: name.into(),
            content: SubscriptionContent::ResourceGroups(groups),
        }
    }

    pub fn with_regions(name: impl Into<String>, regions: Vec<Region>) -> Self {
        Self {
            name: name.into(),
            content: SubscriptionContent::Regions(regions),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSubscription {
    name: String,
    #[serde(default, alias = "resource_groups")]
    resource_groups: Vec<ResourceGroup>,
    #[serde(default)]
    regions: Vec<Region>,
}

impl TryFrom<RawSubscription> for Subscription {
    type Error = SchemaError;

    fn try_from(raw: RawSubscription) -> Result<Self, Self::Error> {
        let content = match (raw.resource_groups.is_empty(), raw.regions.is_empty()) {
            (false, false) => {
                return Err(SchemaError::ConflictingSubscriptionContent { name: raw.name });
            }
            (true, false) => SubscriptionContent::Regions(raw.regions),
            _ => SubscriptionContent::ResourceGroups(raw.resource_groups),
        };
        Ok(Self {
            name: raw.name,
            content,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(from = "String")]
pub enum ConnectionStyle {
    #[default]
    Plain,
    Dashed,
    ExpressRoute,
    Vpn,
    Peering,
}

impl ConnectionStyle {
    pub const ALL: [ConnectionStyle; 5] = [
        ConnectionStyle::Plain,
        ConnectionStyle::Dashed,
        ConnectionStyle::ExpressRoute,
        ConnectionStyle::Vpn,
        ConnectionStyle::Peering,
    ];

    /// Lenient parse; anything unrecognized is plain.
    pub fn parse(raw: &str) -> Self {
        match crate::catalog::normalize_type(raw).replace('_', "").as_str() {
            "dashed" | "dotted" => ConnectionStyle::Dashed,
            "expressroute" => ConnectionStyle::ExpressRoute,
            "vpn" => ConnectionStyle::Vpn,
            "peering" | "vnetpeering" => ConnectionStyle::Peering,
            _ => ConnectionStyle::Plain,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionStyle::Plain => "plain",
            ConnectionStyle::Dashed => "dashed",
            ConnectionStyle::ExpressRoute => "expressroute",
            ConnectionStyle::Vpn => "vpn",
            ConnectionStyle::Peering => "peering",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ConnectionStyle::Plain => "Connection",
            ConnectionStyle::Dashed => "Logical / dependency",
            ConnectionStyle::ExpressRoute => "ExpressRoute",
            ConnectionStyle::Vpn => "VPN tunnel",
            ConnectionStyle::Peering => "VNet peering",
        }
    }
}

impl From<String> for ConnectionStyle {
    fn from(raw: String) -> Self {
        ConnectionStyle::parse(&raw)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Connection {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub style: Option<ConnectionStyle>,
    #[serde(default)]
    pub label: Option<String>,
}

impl Connection {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            style: None,
            label: None,
        }
    }

    pub fn styled(mut self, style: ConnectionStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn effective_style(&self) -> ConnectionStyle {
        self.style.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OnPremises {
    pub name: String,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

/// The cloud content of one page.
#[derive(Debug, Clone, PartialEq)]
pub enum Scope {
    Subscription(Subscription),
    Subscriptions(Vec<Subscription>),
    Regions(Vec<Region>),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "RawArchitecture")]
pub struct Architecture {
    pub title: String,
    pub description: Option<String>,
    pub scope: Option<Scope>,
    pub connections: Vec<Connection>,
    pub global_resources: Vec<Resource>,
    pub on_premises: Vec<OnPremises>,
    pub pages: Vec<Architecture>,
}

impl Architecture {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// True when this value carries anything to draw besides its title.
    pub fn has_content(&self) -> bool {
        self.scope.is_some() || !self.global_resources.is_empty() || !self.on_premises.is_empty()
    }

    /// Pages in document order. A page-less architecture is its own single page; with
    /// explicit pages the top level only contributes a page when it has content of its own.
    pub fn page_views(&self) -> Vec<&Architecture> {
        if self.pages.is_empty() {
            return vec![self];
        }
        let mut views = Vec::with_capacity(self.pages.len() + 1);
        if self.has_content() {
            views.push(self);
        } else if !self.connections.is_empty() {
            warn!(
                title = self.title.as_str(),
                connections = self.connections.len();
                "Top level has no content of its own; dropping its connections"
            );
        }
        views.extend(self.pages.iter());
        views
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArchitecture {
    #[serde(default, alias = "name")]
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    subscription: Option<Subscription>,
    #[serde(default)]
    subscriptions: Option<Vec<Subscription>>,
    #[serde(default)]
    regions: Option<Vec<Region>>,
    #[serde(default)]
    connections: Vec<Connection>,
    #[serde(default, alias = "global_resources")]
    global_resources: Vec<Resource>,
    #[serde(default, alias = "on_premises", alias = "onPrem")]
    on_premises: Vec<OnPremises>,
    #[serde(default)]
    pages: Vec<Architecture>,
}

impl TryFrom<RawArchitecture> for Architecture {
    type Error = SchemaError;

    fn try_from(raw: RawArchitecture) -> Result<Self, Self::Error> {
        let scope = match (raw.subscription, raw.subscriptions, raw.regions) {
            (None, None, None) => None,
            (Some(single), None, None) => Some(Scope::Subscription(single)),
            (None, Some(many), None) => Some(Scope::Subscriptions(many)),
            (None, None, Some(regions)) => Some(Scope::Regions(regions)),
            _ => return Err(SchemaError::ConflictingScope { title: raw.title }),
        };
        if let Some(page) = raw.pages.iter().find(|page| !page.pages.is_empty()) {
            return Err(SchemaError::NestedPages {
                title: page.title.clone(),
            });
        }
        Ok(Self {
            title: raw.title,
            description: raw.description,
            scope,
            connections: raw.connections,
            global_resources: raw.global_resources,
            on_premises: raw.on_premises,
            pages: raw.pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(value: serde_json::Value) -> Result<Architecture, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn vnets_are_extracted_from_resource_lists() {
        let arch = parse(serde_json::json!({
            "title": "t",
            "subscription": {
                "name": "sub",
                "resourceGroups": [{
                    "name": "rg",
                    "resources": [
                        {"type": "app_service", "name": "web"},
                        {"type": "vnet", "name": "vnet-spoke", "addressSpace": "10.1.0.0/16",
                         "subnets": [{"name": "default"}]},
                        {"type": "Hub-VNet", "name": "vnet-hub"}
                    ]
                }]
            }
        }))
        .unwrap();
        let Some(Scope::Subscription(sub)) = &arch.scope else {
            panic!("expected single subscription");
        };
        let SubscriptionContent::ResourceGroups(groups) = &sub.content else {
            panic!("expected resource groups");
        };
        let vnets: Vec<_> = groups[0].vnets().collect();
        assert_eq!(vnets.len(), 2);
        assert_eq!(vnets[0].address_space.as_deref(), Some("10.1.0.0/16"));
        assert!(!vnets[0].is_hub());
        assert!(vnets[1].is_hub());
        assert_eq!(groups[0].resources().count(), 1);
    }

    #[test]
    fn null_properties_are_dropped_and_order_is_kept() {
        let resource: Resource = serde_json::from_str(
            r#"{
                "type": "virtual_machine",
                "name": "vm1",
                "properties": {"zeta": 1, "alpha": null, "sku": "B2s", "public": true}
            }"#,
        )
        .unwrap();
        let keys: Vec<_> = resource.properties.keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "sku", "public"]);
        assert_eq!(resource.properties["public"].to_string(), "true");
        assert_eq!(resource.properties["zeta"].to_string(), "1");
    }

    #[test]
    fn nested_property_values_are_rejected() {
        let result: Result<Resource, _> = serde_json::from_value(serde_json::json!({
            "type": "virtual_machine",
            "name": "vm1",
            "properties": {"tags": ["a", "b"]}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn conflicting_scope_is_rejected() {
        let err = parse(serde_json::json!({
            "title": "both",
            "subscription": {"name": "a"},
            "regions": []
        }))
        .unwrap_err();
        assert!(err.to_string().contains("more than one"), "{err}");
    }

    #[test]
    fn nested_pages_are_rejected() {
        let err = parse(serde_json::json!({
            "title": "root",
            "pages": [{"title": "p1", "pages": [{"title": "deep"}]}]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("nested pages"), "{err}");
    }

    #[test]
    fn subscription_with_both_groups_and_regions_is_rejected() {
        let result: Result<Subscription, _> = serde_json::from_value(serde_json::json!({
            "name": "s",
            "resourceGroups": [{"name": "rg"}],
            "regions": [{"name": "westeurope"}]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn connection_styles_parse_leniently() {
        assert_eq!(ConnectionStyle::parse("ExpressRoute"), ConnectionStyle::ExpressRoute);
        assert_eq!(ConnectionStyle::parse("express-route"), ConnectionStyle::ExpressRoute);
        assert_eq!(ConnectionStyle::parse("VPN"), ConnectionStyle::Vpn);
        assert_eq!(ConnectionStyle::parse("wormhole"), ConnectionStyle::Plain);
        let conn: Connection =
            serde_json::from_value(serde_json::json!({"from": "a", "to": "b", "style": "peering"}))
                .unwrap();
        assert_eq!(conn.effective_style(), ConnectionStyle::Peering);
    }

    #[test]
    fn zone_accepts_numbers() {
        let zone: AvailabilityZoneGroup =
            serde_json::from_value(serde_json::json!({"zone": 2, "resources": []})).unwrap();
        assert_eq!(zone.zone, "2");
    }

    #[test]
    fn page_views_skip_empty_top_level() {
        let mut arch = Architecture::new("doc");
        arch.pages = vec![Architecture::new("one"), Architecture::new("two")];
        assert_eq!(arch.page_views().len(), 2);
        arch.global_resources.push(Resource::new("dns_zone", "contoso.com"));
        let views = arch.page_views();
        assert_eq!(views.len(), 3);
        assert_eq!(views[0].title, "doc");
    }

    #[test]
    fn connections_on_an_empty_top_level_reach_no_page() {
        let mut arch = Architecture::new("doc");
        arch.connections = vec![Connection::new("a", "b")];
        arch.pages = vec![Architecture::new("one")];
        let views = arch.page_views();
        assert_eq!(views.len(), 1);
        assert!(views.iter().all(|page| page.connections.is_empty()));
    }
}
