//! Combining uplinks from all sources into one prioritized list.

use tracing::debug;

use super::uplink::{from_vpn_clients, from_wan_links, HealthCheckConfig, Uplink};
use crate::topology::{VpnClients, WanLinks};
use crate::types::Network;

/// Combine VPN clients and WAN links into the final uplink list.
///
/// Order is fixed: VPN clients, then domestic links, then foreign links.
/// VPN probes start after the foreign links' share of the foreign pool, so
/// no two uplinks probe the same address while foreign links and VPN
/// clients together fit in [`FOREIGN_CHECK_IPS`](super::FOREIGN_CHECK_IPS).
/// Past that size the pool wraps and probes repeat.
///
/// Distances are renumbered from 1 in list order, overriding anything set
/// during normalization.
pub fn combine_uplinks(
    vpn: Option<&VpnClients>,
    wan: Option<&WanLinks>,
    health: &HealthCheckConfig,
) -> Vec<Uplink> {
    let (domestic, foreign) = match wan {
        Some(wan) => (
            from_wan_links(wan.group(Network::Domestic), Network::Domestic, health),
            from_wan_links(wan.group(Network::Foreign), Network::Foreign, health),
        ),
        None => (Vec::new(), Vec::new()),
    };
    let vpn = from_vpn_clients(vpn, foreign.len(), health);

    let mut combined: Vec<Uplink> = vpn.into_iter().chain(domestic).chain(foreign).collect();
    for (position, uplink) in combined.iter_mut().enumerate() {
        uplink.distance = position as u32 + 1;
    }

    debug!("Combined {} uplinks", combined.len());
    combined
}
