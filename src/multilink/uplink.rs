//! Normalized uplinks.
//!
//! WAN links and VPN clients arrive in different shapes; both are turned
//! into [`Uplink`] records so the rule builders can treat them uniformly.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::check_ip::CheckIpPool;
use crate::topology::{ConnectionMethod, VpnClients, WanLinkConfig};
use crate::types::{Network, RouterDuration};

/// Health-check cadence applied while normalizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckConfig {
    /// Probe interval for WAN links.
    #[serde(default = "default_wan_interval")]
    pub wan_interval: RouterDuration,

    /// Probe interval for VPN tunnels.
    #[serde(default = "default_vpn_interval")]
    pub vpn_interval: RouterDuration,

    /// Maximum wait for a probe reply.
    #[serde(default = "default_timeout")]
    pub timeout: RouterDuration,

    /// Failed shared probes needed to declare an uplink down.
    #[serde(default = "default_threshold")]
    pub threshold: u32,
}

fn default_wan_interval() -> RouterDuration {
    RouterDuration::from_secs(5)
}

fn default_vpn_interval() -> RouterDuration {
    RouterDuration::from_secs(10)
}

fn default_timeout() -> RouterDuration {
    RouterDuration::from_secs(1)
}

fn default_threshold() -> u32 {
    2
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            wan_interval: default_wan_interval(),
            vpn_interval: default_vpn_interval(),
            timeout: default_timeout(),
            threshold: default_threshold(),
        }
    }
}

/// One path to the outside world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uplink {
    /// Unique name within its source group.
    pub name: String,
    /// Source group and name (`Foreign-WAN-1`, `wireguard-Office`); unique
    /// across the combined set even when names repeat between groups.
    pub tag: String,
    /// Network classification.
    pub network: Network,
    /// Interface traffic leaves through.
    pub interface: String,
    /// Next hop used in routes.
    pub gateway: String,
    /// Priority rank, 1 = preferred.
    pub distance: u32,
    /// Relative share; carried for consumers, the rule builders ignore it.
    pub weight: Option<u32>,
    /// Dedicated probe address for the recursive route.
    pub check_ip: String,
    /// Shared probes for threshold checks.
    pub check_ips: Vec<String>,
    /// Probe interval.
    pub interval: RouterDuration,
    /// Probe timeout.
    pub timeout: RouterDuration,
    /// Failed probes (of `check_ips`) that mean down.
    pub threshold: u32,
}

impl Uplink {
    /// Comment tag of the uplink's default route; monitors find it by this.
    pub fn route_comment(&self) -> String {
        format!("Route-{}", self.tag)
    }

    /// Comment tag of the uplink's probe host route.
    pub fn check_route_comment(&self) -> String {
        format!("Check-{}", self.tag)
    }

    /// Comment tag of monitors and scripts belonging to the uplink.
    pub fn monitor_comment(&self) -> String {
        format!("Monitor-{}", self.tag)
    }

    /// Connection mark used by load-balancing rules.
    pub fn connection_mark(&self) -> String {
        format!("{}-conn", self.interface)
    }
}

/// Next hop of a WAN link.
///
/// PPPoE and LTE expose no IP gateway, so the interface itself is used.
/// DHCP leases are unknown until the router dials, so a per-network
/// placeholder address stands in.
fn wan_gateway(link: &WanLinkConfig, network: Network, interface: &str) -> String {
    match &link.connection {
        ConnectionMethod::Pppoe { .. } | ConnectionMethod::Lte { .. } => interface.to_string(),
        _ if crate::topology::is_lte_interface(&link.interface.interface_name) => {
            interface.to_string()
        }
        ConnectionMethod::Static { gateway, .. } => format!("{gateway}%{interface}"),
        ConnectionMethod::Dhcp => {
            format!("{}%{interface}", network.dhcp_placeholder_gateway())
        }
    }
}

/// Normalize one group of WAN links.
///
/// Probe addresses cycle through the group's pool by position, which keeps
/// them unique inside the group; uniqueness across groups is the
/// combiner's job.
pub fn from_wan_links(
    links: &[WanLinkConfig],
    network: Network,
    health: &HealthCheckConfig,
) -> Vec<Uplink> {
    let pool = CheckIpPool::for_network(network);

    links
        .iter()
        .enumerate()
        .map(|(index, link)| {
            let interface = link.final_interface();
            let uplink = Uplink {
                name: link.name.clone(),
                tag: format!("{network}-{}", link.name),
                network,
                gateway: wan_gateway(link, network, &interface),
                interface,
                distance: link.priority.unwrap_or(index as u32 + 1),
                weight: link.weight,
                check_ip: pool.pick(index).to_string(),
                check_ips: pool.shared(),
                interval: health.wan_interval,
                timeout: health.timeout,
                threshold: health.threshold,
            };
            debug!(
                "Normalized {} {} link {} via {} (check {})",
                network,
                link.connection.kind(),
                uplink.name,
                uplink.gateway,
                uplink.check_ip
            );
            uplink
        })
        .collect()
}

/// Normalize all VPN clients.
///
/// Probe addresses come from the foreign pool starting at `offset`, so the
/// caller can skip addresses already handed to foreign WAN links. The
/// running index spans all protocol families.
pub fn from_vpn_clients(
    clients: Option<&VpnClients>,
    offset: usize,
    health: &HealthCheckConfig,
) -> Vec<Uplink> {
    let Some(clients) = clients else {
        return Vec::new();
    };
    let pool = CheckIpPool::for_network(Network::Vpn);

    clients
        .iter()
        .enumerate()
        .map(|(running, (protocol, client))| {
            let interface = protocol.interface_name(&client.name);
            let uplink = Uplink {
                name: client.name.clone(),
                tag: format!("{protocol}-{}", client.name),
                network: Network::Vpn,
                gateway: interface.clone(),
                interface,
                distance: client.priority.unwrap_or(running as u32 + 1),
                weight: client.weight,
                check_ip: pool.pick(offset + running).to_string(),
                check_ips: pool.shared(),
                interval: health.vpn_interval,
                timeout: health.timeout,
                threshold: health.threshold,
            };
            debug!(
                "Normalized {} client {} via {} (check {})",
                protocol, uplink.name, uplink.gateway, uplink.check_ip
            );
            uplink
        })
        .collect()
}
