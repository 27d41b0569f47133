//! Final interface names of WAN links.
//!
//! A WAN link may be wrapped before it carries traffic: PPPoE creates its
//! own client interface, a VLAN tag or spoofed MAC adds VLAN/MACVLAN
//! interfaces on top of the port. Routes must point at the outermost one.

use super::wan::WanLinkConfig;

/// True for cellular modem ports (`lte1`, `LTE2`).
pub fn is_lte_interface(name: &str) -> bool {
    name.to_ascii_lowercase().starts_with("lte")
}

/// True for port types that get a MACVLAN when auto-wrapping is enabled.
pub fn requires_auto_macvlan(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    ["ether", "wifi", "wlan", "sfp"]
        .iter()
        .any(|prefix| lower.starts_with(prefix))
}

/// Name of the VLAN interface created for a tagged link.
pub fn vlan_interface_name(vlan_id: u16, interface: &str, link: &str) -> String {
    format!("VLAN{vlan_id}-{interface}-{link}")
}

/// Name of the MACVLAN interface created on top of `parent`.
pub fn macvlan_interface_name(parent: &str, link: &str) -> String {
    format!("MacVLAN-{parent}-{link}")
}

/// Resolve the interface a WAN link's routes must use.
///
/// First match wins: PPPoE, LTE, VLAN (always MACVLAN-wrapped), MAC only,
/// auto MACVLAN, raw port.
pub fn resolve_wan_interface(link: &WanLinkConfig) -> String {
    let cfg = &link.interface;
    let name = link.name.as_str();
    let iface = cfg.interface_name.as_str();

    if link.connection.is_pppoe() {
        return format!("pppoe-client-{name}");
    }

    if link.connection.is_lte() || is_lte_interface(iface) {
        return iface.to_string();
    }

    if let Some(vlan_id) = cfg.vlan_id {
        let vlan = vlan_interface_name(vlan_id, iface, name);
        return macvlan_interface_name(&vlan, name);
    }

    if cfg.mac_address.is_some() || (cfg.auto_macvlan && requires_auto_macvlan(iface)) {
        return macvlan_interface_name(iface, name);
    }

    iface.to_string()
}
