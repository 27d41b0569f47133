//! Top-level routing synthesis.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::balance::{load_balance_config, LoadBalanceMethod};
use super::combiner::combine_uplinks;
use super::failover::{failover_config, netwatch_routes, FailoverStyle};
use super::uplink::HealthCheckConfig;
use super::{DEFAULT_LOCAL_LIST, DEFAULT_ROUTING_MARK, MAIN_TABLE};
use crate::config::Topology;
use crate::routeros::{section, Command, RouterConfig};
use crate::topology::{VpnClients, WanLinks};
use crate::types::Network;

/// What the generated configuration does with multiple uplinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Ordered failover in the main table.
    #[default]
    Failover,
    /// Spread connections over all uplinks.
    LoadBalance,
    /// Load balancing plus failover in the main table.
    Both,
}

impl Strategy {
    pub fn balances(self) -> bool {
        matches!(self, Self::LoadBalance | Self::Both)
    }

    pub fn fails_over(self) -> bool {
        matches!(self, Self::Failover | Self::Both)
    }
}

/// Multi-link policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiLinkConfig {
    #[serde(default)]
    pub strategy: Strategy,

    /// Connection-splitting method when balancing.
    #[serde(default)]
    pub method: LoadBalanceMethod,

    /// Failover style.
    #[serde(default)]
    pub style: FailoverStyle,

    /// Table receiving failover routes.
    #[serde(default = "default_table")]
    pub table: String,

    /// Routing mark (and table) for balanced traffic.
    #[serde(default = "default_routing_mark")]
    pub routing_mark: String,

    /// Address list naming local networks, excluded from balancing.
    #[serde(default = "default_local_list")]
    pub local_address_list: String,

    /// Members of the local address list.
    #[serde(default)]
    pub local_networks: Vec<String>,
}

fn default_table() -> String {
    MAIN_TABLE.to_string()
}

fn default_routing_mark() -> String {
    DEFAULT_ROUTING_MARK.to_string()
}

fn default_local_list() -> String {
    DEFAULT_LOCAL_LIST.to_string()
}

impl Default for MultiLinkConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            method: LoadBalanceMethod::default(),
            style: FailoverStyle::default(),
            table: default_table(),
            routing_mark: default_routing_mark(),
            local_address_list: default_local_list(),
            local_networks: Vec::new(),
        }
    }
}

/// True for the per-network tables (`to-Domestic`, `to-Foreign`, `to-VPN`).
pub fn is_network_table(table: &str) -> bool {
    Network::ALL.iter().any(|n| n.routing_table() == table)
}

/// Netwatch failover for the main table.
///
/// Empty when no uplinks are configured.
pub fn main_table_routes(
    vpn: Option<&VpnClients>,
    wan: Option<&WanLinks>,
    health: &HealthCheckConfig,
) -> RouterConfig {
    let uplinks = combine_uplinks(vpn, wan, health);
    if uplinks.is_empty() {
        return RouterConfig::new();
    }
    netwatch_routes(&uplinks, MAIN_TABLE)
}

/// Failover routes for an arbitrary table.
///
/// Per-network tables get their routes elsewhere and yield nothing here,
/// so they never receive a second set of default routes.
pub fn routing_table_routes(
    table: &str,
    style: FailoverStyle,
    vpn: Option<&VpnClients>,
    wan: Option<&WanLinks>,
    health: &HealthCheckConfig,
) -> RouterConfig {
    if is_network_table(table) {
        debug!("Skipping per-network table {}", table);
        return RouterConfig::new();
    }
    let uplinks = combine_uplinks(vpn, wan, health);
    failover_config(style, &uplinks, table)
}

/// Members of the local address list.
fn local_address_list(multilink: &MultiLinkConfig) -> RouterConfig {
    let mut config = RouterConfig::new();
    for network in &multilink.local_networks {
        config.push(
            section::FIREWALL_ADDRESS_LIST,
            Command::add()
                .arg("list", &multilink.local_address_list)
                .arg("address", network),
        );
    }
    config
}

/// Build the complete routing configuration of a topology.
pub fn plan(topology: &Topology) -> RouterConfig {
    let multilink = &topology.multilink;
    let uplinks = combine_uplinks(
        topology.vpn_client.as_ref(),
        topology.wan_links.as_ref(),
        &topology.health_check,
    );

    if uplinks.is_empty() {
        info!("No uplinks configured, nothing to generate");
        return RouterConfig::new();
    }

    let mut parts = Vec::new();

    if multilink.strategy.balances() {
        parts.push(local_address_list(multilink));
        parts.push(load_balance_config(
            multilink.method,
            &uplinks,
            &multilink.routing_mark,
            &multilink.local_address_list,
        ));
    }

    if multilink.strategy.fails_over() {
        if is_network_table(&multilink.table) {
            debug!("Skipping failover for per-network table {}", multilink.table);
        } else {
            parts.push(failover_config(multilink.style, &uplinks, &multilink.table));
        }
    }

    let config = RouterConfig::merged(parts);

    info!(
        "Planned {} uplinks ({:?}, {} failover, {} balancing): {} commands",
        uplinks.len(),
        multilink.strategy,
        multilink.style,
        multilink.method,
        config.command_count()
    );

    config
}
