//! Reachability probe addresses.
//!
//! Each uplink gets one dedicated probe address for its recursive route and
//! a shared short list for threshold checks. Domestic links probe resolvers
//! inside the local ISP backbone; everything else probes well-known public
//! anycast resolvers.

use crate::types::Network;

/// Probes reachable through domestic/local ISPs.
pub const DOMESTIC_CHECK_IPS: &[&str] = &[
    "217.218.127.127",
    "217.218.155.155",
    "2.188.21.131",
    "2.189.44.44",
    "78.157.42.100",
    "78.157.42.101",
    "185.51.200.2",
    "178.22.122.100",
    "5.202.100.100",
    "5.202.100.101",
];

/// Probes for general internet reachability.
pub const FOREIGN_CHECK_IPS: &[&str] = &[
    "1.1.1.1",
    "8.8.8.8",
    "9.9.9.9",
    "208.67.222.222",
    "4.2.2.4",
    "1.0.0.1",
    "8.8.4.4",
    "149.112.112.112",
    "208.67.220.220",
    "4.2.2.2",
    "94.140.14.14",
    "94.140.15.15",
    "76.76.2.0",
    "76.76.10.0",
    "185.228.168.9",
    "185.228.169.9",
];

/// Number of shared probes used for threshold checks.
pub const SHARED_PROBE_COUNT: usize = 5;

/// One of the two static probe pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckIpPool {
    addrs: &'static [&'static str],
}

impl CheckIpPool {
    pub const DOMESTIC: Self = Self {
        addrs: DOMESTIC_CHECK_IPS,
    };
    pub const FOREIGN: Self = Self {
        addrs: FOREIGN_CHECK_IPS,
    };

    /// Pool feeding uplinks of `network`. VPN tunnels use the foreign pool.
    pub fn for_network(network: Network) -> Self {
        match network {
            Network::Domestic => Self::DOMESTIC,
            Network::Foreign | Network::Vpn => Self::FOREIGN,
        }
    }

    /// Address at `index`, cycling through the pool.
    ///
    /// Indexes past the pool length wrap, so more uplinks than addresses
    /// share probes.
    pub fn pick(self, index: usize) -> &'static str {
        self.addrs[index % self.addrs.len()]
    }

    /// The first `SHARED_PROBE_COUNT` addresses.
    pub fn shared(self) -> Vec<String> {
        self.addrs
            .iter()
            .take(SHARED_PROBE_COUNT)
            .map(|s| (*s).to_string())
            .collect()
    }

    pub fn len(self) -> usize {
        self.addrs.len()
    }

    pub fn is_empty(self) -> bool {
        self.addrs.is_empty()
    }

    pub fn as_slice(self) -> &'static [&'static str] {
        self.addrs
    }
}
