//! Failover routes.
//!
//! Four interchangeable styles turn an ordered uplink list into default
//! routes where the best healthy uplink wins:
//! - gateway check: one `check-gateway=ping` route per uplink
//! - recursive: a probe host route plus a default route resolved through it
//! - netwatch: the recursive skeleton toggled by `/tool netwatch`
//! - scheduled: the recursive skeleton toggled by a periodic ping script

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::monitor::{NetwatchPolicy, RouteAction};
use super::uplink::Uplink;
use crate::routeros::{section, Command, RouterConfig};

/// Failover style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailoverStyle {
    /// Router-native gateway ping on each route.
    GatewayCheck,
    /// Recursive routes on a distance ladder.
    Recursive,
    /// Recursive skeleton driven by netwatch up/down scripts.
    #[default]
    Netwatch,
    /// Recursive skeleton driven by a scheduled threshold script.
    Scheduled,
}

impl FailoverStyle {
    pub const ALL: [FailoverStyle; 4] = [
        FailoverStyle::GatewayCheck,
        FailoverStyle::Recursive,
        FailoverStyle::Netwatch,
        FailoverStyle::Scheduled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::GatewayCheck => "gateway_check",
            Self::Recursive => "recursive",
            Self::Netwatch => "netwatch",
            Self::Scheduled => "scheduled",
        }
    }
}

impl fmt::Display for FailoverStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FailoverStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == normalized)
            .ok_or_else(|| format!("unknown failover style: {s}"))
    }
}

/// Ladder distance of the uplink at 1-based `position`: 1, 5, 10, 15, ...
///
/// The gaps leave room for manually inserted routes.
pub fn ladder_distance(position: usize) -> u32 {
    match position {
        0 | 1 => 1,
        k => ((k - 2) * 5 + 5) as u32,
    }
}

/// Routes for `style`.
pub fn failover_config(style: FailoverStyle, uplinks: &[Uplink], table: &str) -> RouterConfig {
    match style {
        FailoverStyle::GatewayCheck => gateway_check_routes(uplinks, table),
        FailoverStyle::Recursive => recursive_routes(uplinks, table),
        FailoverStyle::Netwatch => netwatch_routes(uplinks, table),
        FailoverStyle::Scheduled => scheduled_routes(uplinks, table),
    }
}

/// One default route per uplink with a native gateway ping.
pub fn gateway_check_routes(uplinks: &[Uplink], table: &str) -> RouterConfig {
    let mut config = RouterConfig::new();
    for uplink in uplinks {
        config.push(
            section::IP_ROUTE,
            Command::add()
                .arg("dst-address", "0.0.0.0/0")
                .arg("gateway", &uplink.gateway)
                .arg("distance", uplink.distance)
                .arg("check-gateway", "ping")
                .arg("routing-table", table)
                .arg("comment", uplink.route_comment()),
        );
    }
    config
}

/// Host route to the uplink's probe via its real gateway.
fn check_route(uplink: &Uplink, table: &str) -> Command {
    Command::add()
        .arg("dst-address", format!("{}/32", uplink.check_ip))
        .arg("gateway", &uplink.gateway)
        .arg("scope", 10)
        .arg("routing-table", table)
        .arg("comment", uplink.check_route_comment())
}

/// Default route resolved through the probe host route.
fn ladder_route(uplink: &Uplink, position: usize, table: &str, check_gateway: bool) -> Command {
    let route = Command::add()
        .arg("dst-address", "0.0.0.0/0")
        .arg("gateway", &uplink.check_ip)
        .arg("distance", ladder_distance(position))
        .arg("target-scope", 11);
    let route = if check_gateway {
        route.arg("check-gateway", "ping")
    } else {
        route
    };
    route
        .arg("routing-table", table)
        .arg("comment", uplink.route_comment())
}

fn ladder(uplinks: &[Uplink], table: &str, check_gateway: bool) -> RouterConfig {
    let mut config = RouterConfig::new();
    for (index, uplink) in uplinks.iter().enumerate() {
        config.push(section::IP_ROUTE, check_route(uplink, table));
        config.push(section::IP_ROUTE, ladder_route(uplink, index + 1, table, check_gateway));
    }
    config
}

/// Recursive routes; liveness comes from the ping on the recursive hop.
pub fn recursive_routes(uplinks: &[Uplink], table: &str) -> RouterConfig {
    ladder(uplinks, table, true)
}

/// Netwatch entry probing `uplink.check_ip` and toggling its ladder route.
pub fn netwatch_entry(uplink: &Uplink, policy: NetwatchPolicy) -> Command {
    let comment = uplink.route_comment();
    Command::add()
        .arg("host", &uplink.check_ip)
        .arg("interval", uplink.interval)
        .arg("timeout", uplink.timeout)
        .arg("up-script", RouteAction::Enable.script(&comment))
        .arg("down-script", RouteAction::Disable.script(&comment))
        .arg("ignore-initial-up", policy.initial_up_arg())
        .arg("ignore-initial-down", policy.initial_down_arg())
        .arg("comment", uplink.monitor_comment())
}

/// Ladder without route-level checks plus one netwatch entry per uplink.
pub fn netwatch_routes(uplinks: &[Uplink], table: &str) -> RouterConfig {
    let mut config = ladder(uplinks, table, false);
    for uplink in uplinks {
        config.push(
            section::TOOL_NETWATCH,
            netwatch_entry(uplink, NetwatchPolicy::default()),
        );
    }
    config
}

/// Name of the script and scheduler entry of `uplink`.
pub fn failover_script_name(uplink: &Uplink) -> String {
    format!("Failover-{}", uplink.tag)
}

/// Script source counting failed pings over the shared probes.
pub fn failover_script_source(uplink: &Uplink) -> String {
    let probes = uplink
        .check_ips
        .iter()
        .map(|ip| format!("\"{ip}\""))
        .collect::<Vec<_>>()
        .join(";");
    let comment = uplink.route_comment();

    [
        ":local failed 0".to_string(),
        format!(
            ":foreach ip in={{{probes}}} do={{:if ([/ping $ip count=1 interface={}] = 0) do={{:set failed ($failed + 1)}}}}",
            uplink.interface
        ),
        format!(
            ":if ($failed >= {}) do={{{}}} else={{{}}}",
            uplink.threshold,
            RouteAction::Disable.script(&comment),
            RouteAction::Enable.script(&comment),
        ),
    ]
    .join("\n")
}

/// Ladder without route-level checks plus a script and scheduler per uplink.
pub fn scheduled_routes(uplinks: &[Uplink], table: &str) -> RouterConfig {
    let mut config = ladder(uplinks, table, false);
    for uplink in uplinks {
        let name = failover_script_name(uplink);
        config.push(
            section::SYSTEM_SCRIPT,
            Command::add()
                .arg("name", &name)
                .arg("policy", "read,write,test")
                .arg("source", failover_script_source(uplink))
                .arg("comment", uplink.monitor_comment()),
        );
        config.push(
            section::SYSTEM_SCHEDULER,
            Command::add()
                .arg("name", &name)
                .arg("interval", uplink.interval)
                .arg("on-event", &name)
                .arg("comment", uplink.monitor_comment()),
        );
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multilink::HealthCheckConfig;
    use crate::topology::{ConnectionMethod, WanLinkConfig};
    use crate::types::Network;

    fn uplinks(n: usize) -> Vec<Uplink> {
        let links: Vec<_> = (1..=n)
            .map(|i| {
                WanLinkConfig::new(
                    format!("WAN-{i}"),
                    format!("ether{i}"),
                    ConnectionMethod::Dhcp,
                )
            })
            .collect();
        crate::multilink::from_wan_links(&links, Network::Foreign, &HealthCheckConfig::default())
    }

    #[test]
    fn test_ladder_distance() {
        let ladder: Vec<_> = (1..=5).map(ladder_distance).collect();
        assert_eq!(ladder, vec![1, 5, 10, 15, 20]);
    }

    #[test]
    fn test_style_parse() {
        assert_eq!(
            "gateway-check".parse::<FailoverStyle>().unwrap(),
            FailoverStyle::GatewayCheck
        );
        assert_eq!("Netwatch".parse::<FailoverStyle>().unwrap(), FailoverStyle::Netwatch);
        assert!("bgp".parse::<FailoverStyle>().is_err());
    }

    #[test]
    fn test_gateway_check() {
        let config = gateway_check_routes(&uplinks(2), "main");
        let routes = config.section(section::IP_ROUTE);
        assert_eq!(routes.len(), 2);
        assert_eq!(
            routes[1],
            "add dst-address=0.0.0.0/0 gateway=192.168.1.1%ether2 distance=2 \
             check-gateway=ping routing-table=main comment=Route-Foreign-WAN-2"
        );
    }

    #[test]
    fn test_recursive_pairs() {
        let list = uplinks(2);
        let config = recursive_routes(&list, "main");
        let routes = config.section(section::IP_ROUTE);
        assert_eq!(routes.len(), 4);
        assert_eq!(
            routes[0],
            format!(
                "add dst-address={}/32 gateway=192.168.1.1%ether1 scope=10 \
                 routing-table=main comment=Check-Foreign-WAN-1",
                list[0].check_ip
            )
        );
        assert_eq!(
            routes[3],
            format!(
                "add dst-address=0.0.0.0/0 gateway={} distance=5 target-scope=11 \
                 check-gateway=ping routing-table=main comment=Route-Foreign-WAN-2",
                list[1].check_ip
            )
        );
    }

    #[test]
    fn test_netwatch_skeleton_has_no_route_check() {
        let config = netwatch_routes(&uplinks(2), "main");
        assert!(config
            .section(section::IP_ROUTE)
            .iter()
            .all(|r| !r.contains("check-gateway")));
        assert_eq!(config.section(section::TOOL_NETWATCH).len(), 2);
    }

    #[test]
    fn test_repeated_names_toggle_their_own_routes() {
        let links = vec![WanLinkConfig::new("WAN-1", "ether1", ConnectionMethod::Dhcp)];
        let health = HealthCheckConfig::default();
        let mut list = crate::multilink::from_wan_links(&links, Network::Domestic, &health);
        list.extend(crate::multilink::from_wan_links(&links, Network::Foreign, &health));

        let config = netwatch_routes(&list, "main");
        let scripts: Vec<_> = config
            .section(section::TOOL_NETWATCH)
            .iter()
            .map(|entry| entry.split(" down-script=").nth(1).unwrap_or_default())
            .collect();
        assert_eq!(scripts.len(), 2);
        assert_ne!(scripts[0], scripts[1]);

        for uplink in &list {
            let tagged = config
                .section(section::IP_ROUTE)
                .iter()
                .filter(|r| r.ends_with(&format!("comment={}", uplink.route_comment())))
                .count();
            assert_eq!(tagged, 1);
        }
    }

    #[test]
    fn test_netwatch_entry() {
        let mut list = uplinks(1);
        list[0].check_ip = "9.9.9.9".to_string();
        let entry = netwatch_entry(&list[0], NetwatchPolicy::default());
        assert_eq!(entry.get("host"), Some("9.9.9.9"));
        assert_eq!(entry.get("interval"), Some("5s"));
        assert_eq!(entry.get("timeout"), Some("1s"));
        assert_eq!(
            entry.get("down-script"),
            Some("/ip route disable [find comment=\"Route-Foreign-WAN-1\"]")
        );
        assert_eq!(entry.get("ignore-initial-up"), Some("yes"));
        assert_eq!(entry.get("ignore-initial-down"), Some("no"));
    }

    #[test]
    fn test_scheduled_script() {
        let list = uplinks(1);
        let source = failover_script_source(&list[0]);
        assert!(source.contains("interface=ether1"));
        assert!(source.contains("\"1.1.1.1\";\"8.8.8.8\""));
        assert!(source.contains(":if ($failed >= 2)"));

        let config = scheduled_routes(&list, "main");
        assert_eq!(config.section(section::SYSTEM_SCRIPT).len(), 1);
        assert_eq!(
            config.section(section::SYSTEM_SCHEDULER),
            ["add name=Failover-Foreign-WAN-1 interval=5s on-event=Failover-Foreign-WAN-1 \
              comment=Monitor-Foreign-WAN-1"]
        );
        assert!(config
            .section(section::IP_ROUTE)
            .iter()
            .all(|r| !r.contains("check-gateway")));
    }

    #[test]
    fn test_empty() {
        for style in FailoverStyle::ALL {
            assert!(failover_config(style, &[], "main").is_empty());
        }
    }
}
