//! Core types used throughout ros-multilink.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Classification of the path an uplink leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Network {
    /// Tunnel to a remote network (VPN client).
    #[serde(rename = "VPN", alias = "vpn")]
    Vpn,
    /// Link to a domestic/local ISP.
    #[serde(alias = "domestic")]
    Domestic,
    /// Generic internet link.
    #[serde(alias = "foreign")]
    Foreign,
}

impl Network {
    /// All networks in combination precedence order.
    pub const ALL: [Network; 3] = [Network::Vpn, Network::Domestic, Network::Foreign];

    /// Name used in RouterOS comments and table names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vpn => "VPN",
            Self::Domestic => "Domestic",
            Self::Foreign => "Foreign",
        }
    }

    /// Per-network routing table (`to-Domestic`, `to-Foreign`, `to-VPN`).
    pub fn routing_table(self) -> String {
        format!("to-{}", self.as_str())
    }

    /// Placeholder next hop for DHCP links.
    ///
    /// The real gateway is only known once the router negotiates a lease;
    /// the literal stands in for it in the generated script.
    pub fn dhcp_placeholder_gateway(self) -> &'static str {
        match self {
            Self::Domestic => "192.168.2.1",
            Self::Foreign | Self::Vpn => "192.168.1.1",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vpn" => Ok(Self::Vpn),
            "domestic" => Ok(Self::Domestic),
            "foreign" => Ok(Self::Foreign),
            other => Err(format!("unknown network '{other}'")),
        }
    }
}

/// A duration rendered as a RouterOS time literal (`5s`, `1m30s`, `500ms`).
///
/// Documents read and write it in humantime form, which accepts the same
/// short literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RouterDuration(#[serde(with = "humantime_serde")] pub Duration);

impl RouterDuration {
    pub const fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }

    pub const fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }
}

impl From<Duration> for RouterDuration {
    fn from(d: Duration) -> Self {
        Self(d)
    }
}

impl fmt::Display for RouterDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_ms = self.0.as_millis();
        if total_ms == 0 {
            return f.write_str("0s");
        }

        let millis = total_ms % 1000;
        let secs = total_ms / 1000;
        let (days, hours, minutes, seconds) =
            (secs / 86_400, secs % 86_400 / 3600, secs % 3600 / 60, secs % 60);

        if days > 0 {
            write!(f, "{days}d")?;
        }
        if hours > 0 {
            write!(f, "{hours}h")?;
        }
        if minutes > 0 {
            write!(f, "{minutes}m")?;
        }
        if seconds > 0 {
            write!(f, "{seconds}s")?;
        }
        if millis > 0 {
            write!(f, "{millis}ms")?;
        }
        Ok(())
    }
}
