//! WAN link descriptions.

use serde::{Deserialize, Serialize};

use super::interface::resolve_wan_interface;
use crate::types::Network;

/// How a WAN link obtains connectivity.
///
/// The variants are mutually exclusive, so a link can never carry, say,
/// both PPPoE credentials and a static gateway.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum ConnectionMethod {
    /// Fixed address and next hop.
    Static {
        /// Interface address in CIDR form.
        address: String,
        /// Next-hop IPv4 address.
        gateway: String,
    },
    /// Address and gateway leased from the ISP.
    #[default]
    Dhcp,
    /// PPPoE dial-up; the client interface is the gateway.
    Pppoe {
        username: String,
        #[serde(default)]
        password: String,
    },
    /// Cellular modem.
    Lte {
        #[serde(default)]
        apn: Option<String>,
    },
}

impl ConnectionMethod {
    pub fn static_ip(address: impl Into<String>, gateway: impl Into<String>) -> Self {
        Self::Static {
            address: address.into(),
            gateway: gateway.into(),
        }
    }

    pub fn pppoe(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Pppoe {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn is_pppoe(&self) -> bool {
        matches!(self, Self::Pppoe { .. })
    }

    pub fn is_lte(&self) -> bool {
        matches!(self, Self::Lte { .. })
    }

    /// Short name used in logs and tables.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Static { .. } => "static",
            Self::Dhcp => "dhcp",
            Self::Pppoe { .. } => "pppoe",
            Self::Lte { .. } => "lte",
        }
    }
}

/// Physical attachment of a WAN link.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InterfaceConfig {
    /// Raw interface name (e.g. "ether1", "lte1", "sfp-sfpplus1").
    pub interface_name: String,

    /// 802.1Q tag; the link then runs over a VLAN + MACVLAN pair.
    #[serde(default)]
    pub vlan_id: Option<u16>,

    /// Spoofed MAC address; the link then runs over a MACVLAN.
    #[serde(default)]
    pub mac_address: Option<String>,

    /// Wrap ethernet/wifi/sfp ports in a MACVLAN even without a MAC or VLAN.
    #[serde(default)]
    pub auto_macvlan: bool,
}

impl InterfaceConfig {
    pub fn new(interface_name: impl Into<String>) -> Self {
        Self {
            interface_name: interface_name.into(),
            ..Default::default()
        }
    }
}

/// One WAN link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WanLinkConfig {
    /// Unique name within its group.
    pub name: String,

    /// Interface the link is attached to.
    pub interface: InterfaceConfig,

    /// Connection method (defaults to DHCP).
    #[serde(default)]
    pub connection: ConnectionMethod,

    /// Explicit priority (1 = most preferred).
    #[serde(default)]
    pub priority: Option<u32>,

    /// Relative share for weighted balancing.
    #[serde(default)]
    pub weight: Option<u32>,
}

impl WanLinkConfig {
    pub fn new(
        name: impl Into<String>,
        interface_name: impl Into<String>,
        connection: ConnectionMethod,
    ) -> Self {
        Self {
            name: name.into(),
            interface: InterfaceConfig::new(interface_name),
            connection,
            priority: None,
            weight: None,
        }
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_vlan(mut self, vlan_id: u16) -> Self {
        self.interface.vlan_id = Some(vlan_id);
        self
    }

    pub fn with_mac(mut self, mac: impl Into<String>) -> Self {
        self.interface.mac_address = Some(mac.into());
        self
    }

    /// Final interface name after PPPoE/LTE/VLAN/MACVLAN wrapping.
    pub fn final_interface(&self) -> String {
        resolve_wan_interface(self)
    }
}

/// WAN links grouped by network.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WanLinks {
    /// Links to domestic ISPs.
    #[serde(default)]
    pub domestic: Vec<WanLinkConfig>,

    /// Generic internet links.
    #[serde(default)]
    pub foreign: Vec<WanLinkConfig>,
}

impl WanLinks {
    /// Links of one group. VPN has no WAN links.
    pub fn group(&self, network: Network) -> &[WanLinkConfig] {
        match network {
            Network::Domestic => &self.domestic,
            Network::Foreign => &self.foreign,
            Network::Vpn => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.domestic.len() + self.foreign.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domestic.is_empty() && self.foreign.is_empty()
    }
}
