//! VPN client descriptions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tunnel protocol family of a VPN client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VpnProtocol {
    Wireguard,
    OpenVpn,
    L2tp,
    Pptp,
    Sstp,
    Ikev2,
}

impl VpnProtocol {
    /// All families, in the order their clients are normalized.
    pub const ALL: [VpnProtocol; 6] = [
        VpnProtocol::Wireguard,
        VpnProtocol::OpenVpn,
        VpnProtocol::L2tp,
        VpnProtocol::Pptp,
        VpnProtocol::Sstp,
        VpnProtocol::Ikev2,
    ];

    /// RouterOS interface prefix for a client of this family.
    pub fn interface_prefix(self) -> &'static str {
        match self {
            Self::Wireguard => "wireguard-client",
            Self::OpenVpn => "ovpn-client",
            Self::L2tp => "l2tp-client",
            Self::Pptp => "pptp-client",
            Self::Sstp => "sstp-client",
            Self::Ikev2 => "ike2-client",
        }
    }

    /// Virtual interface of client `name`.
    pub fn interface_name(self, name: &str) -> String {
        format!("{}-{name}", self.interface_prefix())
    }
}

impl fmt::Display for VpnProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Wireguard => "wireguard",
            Self::OpenVpn => "openvpn",
            Self::L2tp => "l2tp",
            Self::Pptp => "pptp",
            Self::Sstp => "sstp",
            Self::Ikev2 => "ikev2",
        };
        f.write_str(s)
    }
}

/// One VPN client as seen by the routing layer.
///
/// Protocol-specific settings (keys, servers, credentials) belong to the
/// section generators and are not modelled here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpnClientConfig {
    /// Unique client name.
    pub name: String,

    /// Explicit priority (1 = most preferred).
    #[serde(default)]
    pub priority: Option<u32>,

    /// Relative share for weighted balancing.
    #[serde(default)]
    pub weight: Option<u32>,
}

impl VpnClientConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority: None,
            weight: None,
        }
    }
}

/// VPN clients grouped by protocol family.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VpnClients {
    #[serde(default)]
    pub wireguard: Vec<VpnClientConfig>,
    #[serde(default)]
    pub openvpn: Vec<VpnClientConfig>,
    #[serde(default)]
    pub l2tp: Vec<VpnClientConfig>,
    #[serde(default)]
    pub pptp: Vec<VpnClientConfig>,
    #[serde(default)]
    pub sstp: Vec<VpnClientConfig>,
    #[serde(default)]
    pub ikev2: Vec<VpnClientConfig>,
}

impl VpnClients {
    /// Clients of one family.
    pub fn family(&self, protocol: VpnProtocol) -> &[VpnClientConfig] {
        match protocol {
            VpnProtocol::Wireguard => &self.wireguard,
            VpnProtocol::OpenVpn => &self.openvpn,
            VpnProtocol::L2tp => &self.l2tp,
            VpnProtocol::Pptp => &self.pptp,
            VpnProtocol::Sstp => &self.sstp,
            VpnProtocol::Ikev2 => &self.ikev2,
        }
    }

    /// Mutable access to one family, for building topologies in code.
    pub fn family_mut(&mut self, protocol: VpnProtocol) -> &mut Vec<VpnClientConfig> {
        match protocol {
            VpnProtocol::Wireguard => &mut self.wireguard,
            VpnProtocol::OpenVpn => &mut self.openvpn,
            VpnProtocol::L2tp => &mut self.l2tp,
            VpnProtocol::Pptp => &mut self.pptp,
            VpnProtocol::Sstp => &mut self.sstp,
            VpnProtocol::Ikev2 => &mut self.ikev2,
        }
    }

    /// Every client with its family, families in [`VpnProtocol::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (VpnProtocol, &VpnClientConfig)> {
        VpnProtocol::ALL
            .into_iter()
            .flat_map(move |p| self.family(p).iter().map(move |c| (p, c)))
    }

    pub fn len(&self) -> usize {
        VpnProtocol::ALL.iter().map(|p| self.family(*p).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
