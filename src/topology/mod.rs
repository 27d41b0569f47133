//! Declarative description of the uplinks a router should use.
//!
//! WAN links are grouped as Domestic/Foreign; VPN clients are grouped by
//! tunnel protocol family. Only the fields the routing layer needs are
//! modelled.

mod interface;
mod vpn;
mod wan;

pub use interface::{
    is_lte_interface, macvlan_interface_name, requires_auto_macvlan, resolve_wan_interface,
    vlan_interface_name,
};
pub use vpn::{VpnClientConfig, VpnClients, VpnProtocol};
pub use wan::{ConnectionMethod, InterfaceConfig, WanLinkConfig, WanLinks};
