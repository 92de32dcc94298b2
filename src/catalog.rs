//! Static resource catalog: type key to icon, default footprint and display name.

use once_cell::sync::Lazy;
use std::collections::HashMap;

const ICON_ROOT: &str = "img/lib/azure2/";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceSpec {
    pub key: &'static str,
    pub display_name: &'static str,
    /// Path relative to the draw.io Azure icon library.
    pub icon: &'static str,
    pub width: f32,
    pub height: f32,
}

impl ResourceSpec {
    const fn new(
        key: &'static str,
        display_name: &'static str,
        icon: &'static str,
        width: f32,
        height: f32,
    ) -> Self {
        Self {
            key,
            display_name,
            icon,
            width,
            height,
        }
    }

    pub fn icon_path(&self) -> String {
        format!("{ICON_ROOT}{}", self.icon)
    }
}

const ENTRIES: &[ResourceSpec] = &[
    // compute
    ResourceSpec::new(
        "virtual_machine",
        "Virtual Machine",
        "compute/Virtual_Machine.svg",
        60.0,
        56.0,
    ),
    ResourceSpec::new("vm_scale_set", "VM Scale Set", "compute/VM_Scale_Sets.svg", 60.0, 60.0),
    ResourceSpec::new("function_app", "Function App", "compute/Function_Apps.svg", 60.0, 52.0),
    ResourceSpec::new("app_service", "App Service", "app_services/App_Services.svg", 56.0, 56.0),
    ResourceSpec::new(
        "app_service_plan",
        "App Service Plan",
        "app_services/App_Service_Plans.svg",
        56.0,
        56.0,
    ),
    ResourceSpec::new("static_web_app", "Static Web App", "preview/Static_Apps.svg", 56.0, 48.0),
    ResourceSpec::new(
        "aks",
        "Kubernetes Service",
        "containers/Kubernetes_Services.svg",
        60.0,
        56.0,
    ),
    ResourceSpec::new(
        "container_app",
        "Container App",
        "other/Worker_Container_App.svg",
        56.0,
        56.0,
    ),
    ResourceSpec::new(
        "container_instance",
        "Container Instances",
        "containers/Container_Instances.svg",
        56.0,
        56.0,
    ),
    ResourceSpec::new(
        "container_registry",
        "Container Registry",
        "containers/Container_Registries.svg",
        60.0,
        54.0,
    ),
    // databases and storage
    ResourceSpec::new("sql_database", "SQL Database", "databases/SQL_Database.svg", 44.0, 60.0),
    ResourceSpec::new("sql_server", "SQL Server", "databases/SQL_Server.svg", 56.0, 56.0),
    ResourceSpec::new(
        "sql_managed_instance",
        "SQL Managed Instance",
        "databases/SQL_Managed_Instance.svg",
        56.0,
        56.0,
    ),
    ResourceSpec::new("cosmos_db", "Cosmos DB", "databases/Azure_Cosmos_DB.svg", 56.0, 56.0),
    ResourceSpec::new(
        "postgresql",
        "PostgreSQL",
        "databases/Azure_Database_PostgreSQL_Server.svg",
        44.0,
        60.0,
    ),
    ResourceSpec::new("mysql", "MySQL", "databases/Azure_Database_MySQL_Server.svg", 44.0, 60.0),
    ResourceSpec::new("redis_cache", "Cache for Redis", "databases/Cache_Redis.svg", 60.0, 50.0),
    ResourceSpec::new(
        "storage_account",
        "Storage Account",
        "storage/Storage_Accounts.svg",
        60.0,
        48.0,
    ),
    ResourceSpec::new(
        "data_lake",
        "Data Lake Storage",
        "storage/Data_Lake_Storage_Gen1.svg",
        60.0,
        48.0,
    ),
    // networking
    ResourceSpec::new("firewall", "Azure Firewall", "networking/Firewalls.svg", 60.0, 52.0),
    ResourceSpec::new(
        "application_gateway",
        "Application Gateway",
        "networking/Application_Gateways.svg",
        56.0,
        56.0,
    ),
    ResourceSpec::new(
        "load_balancer",
        "Load Balancer",
        "networking/Load_Balancers.svg",
        56.0,
        56.0,
    ),
    ResourceSpec::new(
        "vpn_gateway",
        "VPN Gateway",
        "networking/Virtual_Network_Gateways.svg",
        44.0,
        60.0,
    ),
    ResourceSpec::new(
        "expressroute_gateway",
        "ExpressRoute Gateway",
        "networking/Virtual_Network_Gateways.svg",
        44.0,
        60.0,
    ),
    ResourceSpec::new(
        "expressroute_circuit",
        "ExpressRoute Circuit",
        "networking/ExpressRoute_Circuits.svg",
        60.0,
        50.0,
    ),
    ResourceSpec::new("nat_gateway", "NAT Gateway", "networking/NAT.svg", 56.0, 56.0),
    ResourceSpec::new("bastion", "Bastion", "networking/Bastions.svg", 52.0, 60.0),
    ResourceSpec::new("public_ip", "Public IP", "networking/Public_IP_Addresses.svg", 60.0, 48.0),
    ResourceSpec::new(
        "nsg",
        "Network Security Group",
        "networking/Network_Security_Groups.svg",
        48.0,
        58.0,
    ),
    ResourceSpec::new("route_table", "Route Table", "networking/Route_Tables.svg", 56.0, 54.0),
    ResourceSpec::new(
        "private_endpoint",
        "Private Endpoint",
        "networking/Private_Endpoint.svg",
        56.0,
        52.0,
    ),
    ResourceSpec::new(
        "private_dns_zone",
        "Private DNS Zone",
        "networking/DNS_Zones.svg",
        56.0,
        56.0,
    ),
    ResourceSpec::new("dns_zone", "DNS Zone", "networking/DNS_Zones.svg", 56.0, 56.0),
    ResourceSpec::new("front_door", "Front Door", "networking/Front_Doors.svg", 60.0, 54.0),
    ResourceSpec::new(
        "traffic_manager",
        "Traffic Manager",
        "networking/Traffic_Manager_Profiles.svg",
        56.0,
        56.0,
    ),
    ResourceSpec::new("cdn", "CDN Profile", "app_services/CDN_Profiles.svg", 60.0, 38.0),
    ResourceSpec::new(
        "ddos_protection",
        "DDoS Protection",
        "networking/DDoS_Protection_Plans.svg",
        48.0,
        58.0,
    ),
    // integration and analytics
    ResourceSpec::new(
        "api_management",
        "API Management",
        "app_services/API_Management_Services.svg",
        60.0,
        52.0,
    ),
    ResourceSpec::new("service_bus", "Service Bus", "integration/Service_Bus.svg", 56.0, 56.0),
    ResourceSpec::new("event_hub", "Event Hubs", "analytics/Event_Hubs.svg", 56.0, 50.0),
    ResourceSpec::new("event_grid", "Event Grid", "integration/Event_Grid_Topics.svg", 56.0, 54.0),
    ResourceSpec::new("logic_app", "Logic App", "integration/Logic_Apps.svg", 60.0, 48.0),
    ResourceSpec::new("data_factory", "Data Factory", "databases/Data_Factory.svg", 56.0, 56.0),
    ResourceSpec::new(
        "synapse",
        "Synapse Analytics",
        "analytics/Azure_Synapse_Analytics.svg",
        56.0,
        60.0,
    ),
    ResourceSpec::new("databricks", "Databricks", "analytics/Azure_Databricks.svg", 56.0, 60.0),
    // identity, security, management
    ResourceSpec::new("key_vault", "Key Vault", "security/Key_Vaults.svg", 56.0, 56.0),
    ResourceSpec::new(
        "entra_id",
        "Microsoft Entra ID",
        "identity/Azure_Active_Directory.svg",
        60.0,
        56.0,
    ),
    ResourceSpec::new(
        "managed_identity",
        "Managed Identity",
        "identity/Managed_Identities.svg",
        52.0,
        56.0,
    ),
    ResourceSpec::new("defender", "Defender for Cloud", "security/Security_Center.svg", 50.0, 60.0),
    ResourceSpec::new("sentinel", "Microsoft Sentinel", "security/Azure_Sentinel.svg", 56.0, 56.0),
    ResourceSpec::new(
        "log_analytics",
        "Log Analytics Workspace",
        "analytics/Log_Analytics_Workspaces.svg",
        56.0,
        56.0,
    ),
    ResourceSpec::new(
        "application_insights",
        "Application Insights",
        "devops/Application_Insights.svg",
        44.0,
        60.0,
    ),
    ResourceSpec::new("monitor", "Azure Monitor", "management_governance/Monitor.svg", 56.0, 56.0),
    ResourceSpec::new(
        "recovery_vault",
        "Recovery Services Vault",
        "management_governance/Recovery_Services_Vaults.svg",
        60.0,
        52.0,
    ),
    // on-premises and clients
    ResourceSpec::new(
        "on_premises_datacenter",
        "On-Premises Datacenter",
        "other/Data_Collection_Rules.svg",
        60.0,
        60.0,
    ),
    ResourceSpec::new("server", "Server", "general/Server_Farm.svg", 56.0, 56.0),
    ResourceSpec::new("user", "User", "identity/Users.svg", 56.0, 56.0),
    ResourceSpec::new("router", "Router", "networking/Connections.svg", 56.0, 56.0),
];

const ALIASES: &[(&str, &str)] = &[
    ("vm", "virtual_machine"),
    ("vmss", "vm_scale_set"),
    ("webapp", "app_service"),
    ("web_app", "app_service"),
    ("functions", "function_app"),
    ("kubernetes", "aks"),
    ("acr", "container_registry"),
    ("sql", "sql_database"),
    ("cosmosdb", "cosmos_db"),
    ("redis", "redis_cache"),
    ("storage", "storage_account"),
    ("appgw", "application_gateway"),
    ("app_gateway", "application_gateway"),
    ("lb", "load_balancer"),
    ("vpn", "vpn_gateway"),
    ("er_gateway", "expressroute_gateway"),
    ("expressroute", "expressroute_circuit"),
    ("apim", "api_management"),
    ("keyvault", "key_vault"),
    ("aad", "entra_id"),
    ("azure_ad", "entra_id"),
    ("app_insights", "application_insights"),
    ("datacenter", "on_premises_datacenter"),
    ("on_premises", "on_premises_datacenter"),
];

static CATALOG: Lazy<HashMap<&'static str, &'static ResourceSpec>> = Lazy::new(|| {
    let mut map: HashMap<&'static str, &'static ResourceSpec> =
        ENTRIES.iter().map(|spec| (spec.key, spec)).collect();
    for (alias, target) in ALIASES {
        if let Some(spec) = map.get(target).copied() {
            map.insert(*alias, spec);
        }
    }
    map
});

/// Canonical form of a type key: trimmed, lowercase, `-` and spaces as `_`.
pub fn normalize_type(kind: &str) -> String {
    kind.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}

pub fn lookup(kind: &str) -> Option<&'static ResourceSpec> {
    CATALOG.get(normalize_type(kind).as_str()).copied()
}

pub fn entries() -> impl Iterator<Item = &'static ResourceSpec> {
    ENTRIES.iter()
}
