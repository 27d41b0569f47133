//! Topology documents and logging setup.

use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, TopologyError};
use crate::multilink::{HealthCheckConfig, MultiLinkConfig};
use crate::topology::{
    ConnectionMethod, VpnClientConfig, VpnClients, VpnProtocol, WanLinkConfig, WanLinks,
};

/// Declarative description of a router's uplinks and multi-link policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    /// WAN links by network.
    #[serde(default)]
    pub wan_links: Option<WanLinks>,

    /// VPN clients by protocol family.
    #[serde(default)]
    pub vpn_client: Option<VpnClients>,

    /// Failover / load-balancing policy.
    #[serde(default)]
    pub multilink: MultiLinkConfig,

    /// Probe cadence.
    #[serde(default)]
    pub health_check: HealthCheckConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Document format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
}

impl Format {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

impl Topology {
    /// Load a topology from a TOML or JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;
        let topology = match Format::of(path) {
            Format::Json => Self::from_json(&content)?,
            Format::Toml => Self::from_toml(&content)?,
        };
        Ok(topology)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let topology: Self = toml::from_str(content)?;
        topology.validate()?;
        Ok(topology)
    }

    /// Parse and validate a JSON document.
    pub fn from_json(content: &str) -> Result<Self> {
        let topology: Self = serde_json::from_str(content)?;
        topology.validate()?;
        Ok(topology)
    }

    /// Save the topology, format chosen by extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match Format::of(path) {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };
        std::fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write {}: {e}", path.display())))?;
        Ok(())
    }

    /// Check the document's shape.
    ///
    /// Names must be non-empty and unique within their group, priorities
    /// start at 1, WAN links need an interface and static gateways must be
    /// IPv4 addresses.
    pub fn validate(&self) -> std::result::Result<(), TopologyError> {
        if let Some(wan) = &self.wan_links {
            validate_wan_group("wan_links.domestic", &wan.domestic)?;
            validate_wan_group("wan_links.foreign", &wan.foreign)?;
        }

        if let Some(vpn) = &self.vpn_client {
            for protocol in VpnProtocol::ALL {
                let group = format!("vpn_client.{protocol}");
                validate_vpn_group(&group, vpn.family(protocol))?;
            }
        }

        if self.multilink.strategy.balances() && self.multilink.routing_mark.trim().is_empty() {
            return Err(TopologyError::EmptyRoutingMark);
        }

        Ok(())
    }

    /// Default topology path.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "ros-multilink", "ros-multilink").map_or_else(
            || PathBuf::from("topology.toml"),
            |dirs| dirs.config_dir().join("topology.toml"),
        )
    }

    /// Example topology: one domestic and two foreign links plus a
    /// WireGuard tunnel.
    pub fn example() -> Self {
        let mut vpn = VpnClients::default();
        vpn.family_mut(VpnProtocol::Wireguard)
            .push(VpnClientConfig::new("WG-1"));

        Self {
            wan_links: Some(WanLinks {
                domestic: vec![WanLinkConfig::new("DOM-1", "ether2", ConnectionMethod::Dhcp)],
                foreign: vec![
                    WanLinkConfig::new(
                        "WAN-1",
                        "ether1",
                        ConnectionMethod::static_ip("203.0.113.2/30", "203.0.113.1"),
                    ),
                    WanLinkConfig::new("WAN-2", "ether3", ConnectionMethod::pppoe("user", "secret"))
                        .with_weight(2),
                ],
            }),
            vpn_client: Some(vpn),
            multilink: MultiLinkConfig {
                local_networks: vec!["192.168.88.0/24".into()],
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

fn validate_names<'a, I>(group: &str, names: I) -> std::result::Result<(), TopologyError>
where
    I: IntoIterator<Item = (&'a str, Option<u32>)>,
{
    let mut seen = HashSet::new();
    for (index, (name, priority)) in names.into_iter().enumerate() {
        if name.trim().is_empty() {
            return Err(TopologyError::EmptyName {
                group: group.to_string(),
                index,
            });
        }
        if !seen.insert(name) {
            return Err(TopologyError::DuplicateName {
                group: group.to_string(),
                name: name.to_string(),
            });
        }
        if priority == Some(0) {
            return Err(TopologyError::ZeroPriority {
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

fn validate_wan_group(
    group: &str,
    links: &[WanLinkConfig],
) -> std::result::Result<(), TopologyError> {
    validate_names(group, links.iter().map(|l| (l.name.as_str(), l.priority)))?;

    for link in links {
        if link.interface.interface_name.trim().is_empty() {
            return Err(TopologyError::EmptyInterface {
                name: link.name.clone(),
            });
        }
        if let ConnectionMethod::Static { gateway, .. } = &link.connection {
            if gateway.parse::<Ipv4Addr>().is_err() {
                return Err(TopologyError::InvalidGateway {
                    name: link.name.clone(),
                    gateway: gateway.clone(),
                });
            }
        }
    }
    Ok(())
}

fn validate_vpn_group(
    group: &str,
    clients: &[VpnClientConfig],
) -> std::result::Result<(), TopologyError> {
    validate_names(group, clients.iter().map(|c| (c.name.as_str(), c.priority)))
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (text or json).
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Enable colored output.
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_log_level() -> String {
    "warn".into()
}

fn default_log_format() -> String {
    "text".into()
}

fn default_color() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            color: default_color(),
        }
    }
}

impl LoggingConfig {
    /// Apply command-line settings on top of the document's `[logging]`.
    ///
    /// `no_color` can only turn color off.
    pub fn with_overrides(
        mut self,
        level: Option<&str>,
        format: Option<&str>,
        no_color: bool,
    ) -> Self {
        if let Some(level) = level {
            self.level = level.to_string();
        }
        if let Some(format) = format {
            self.format = format.to_string();
        }
        if no_color {
            self.color = false;
        }
        self
    }
}

/// Initialize logging.
///
/// Logs go to stderr so generated scripts on stdout stay clean.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| Error::Config(format!("Failed to init logging: {e}")))?;
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_ansi(config.color)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .map_err(|e| Error::Config(format!("Failed to init logging: {e}")))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_is_valid() {
        let example = Topology::example();
        assert!(example.validate().is_ok());
        assert_eq!(example.vpn_client.as_ref().map(VpnClients::len), Some(1));
    }

    #[test]
    fn test_toml_roundtrip_of_example() {
        let text = toml::to_string_pretty(&Topology::example()).unwrap();
        let parsed = Topology::from_toml(&text).unwrap();
        assert_eq!(parsed, Topology::example());
    }

    #[test]
    fn test_defaults_from_empty_document() {
        let topology = Topology::from_toml("").unwrap();
        assert!(topology.wan_links.is_none());
        assert_eq!(topology.health_check, HealthCheckConfig::default());
        assert_eq!(topology.logging.level, "warn");
    }

    #[test]
    fn test_logging_overrides() {
        let topology = Topology::from_toml(
            "[logging]\nlevel = \"debug\"\nformat = \"json\"\ncolor = true\n",
        )
        .unwrap();

        let kept = topology.logging.clone().with_overrides(None, None, false);
        assert_eq!(kept, topology.logging);

        let overridden = topology
            .logging
            .clone()
            .with_overrides(Some("trace"), Some("text"), true);
        assert_eq!(overridden.level, "trace");
        assert_eq!(overridden.format, "text");
        assert!(!overridden.color);
    }

    #[test]
    fn test_duplicate_name_in_group() {
        let mut topology = Topology::example();
        if let Some(wan) = topology.wan_links.as_mut() {
            wan.foreign[1].name = "WAN-1".into();
        }
        assert_eq!(
            topology.validate(),
            Err(TopologyError::DuplicateName {
                group: "wan_links.foreign".into(),
                name: "WAN-1".into(),
            })
        );
    }

    #[test]
    fn test_same_name_in_different_groups_is_allowed() {
        let mut topology = Topology::example();
        if let Some(wan) = topology.wan_links.as_mut() {
            wan.domestic[0].name = "WAN-1".into();
        }
        assert!(topology.validate().is_ok());
    }

    #[test]
    fn test_invalid_static_gateway() {
        let mut topology = Topology::example();
        if let Some(wan) = topology.wan_links.as_mut() {
            wan.foreign[0].connection = ConnectionMethod::static_ip("10.0.0.2/30", "gateway");
        }
        assert!(matches!(
            topology.validate(),
            Err(TopologyError::InvalidGateway { .. })
        ));
    }

    #[test]
    fn test_zero_priority_and_empty_name() {
        let mut topology = Topology::example();
        if let Some(vpn) = topology.vpn_client.as_mut() {
            vpn.wireguard[0].priority = Some(0);
        }
        assert_eq!(
            topology.validate(),
            Err(TopologyError::ZeroPriority { name: "WG-1".into() })
        );

        let mut topology = Topology::example();
        if let Some(vpn) = topology.vpn_client.as_mut() {
            vpn.wireguard[0].name = " ".into();
        }
        assert!(matches!(topology.validate(), Err(TopologyError::EmptyName { index: 0, .. })));
    }

    #[test]
    fn test_parse_error_is_user_error() {
        let err = Topology::from_toml("wan_links = 3").unwrap_err();
        assert!(err.is_user_error());
    }
}
