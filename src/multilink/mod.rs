//! Multi-link routing synthesis.
//!
//! This module turns declared uplinks into RouterOS routing configuration:
//! - Normalization of WAN links and VPN clients into uplinks
//! - Prioritized combination with collision-free probe addresses
//! - PCC/NTH load-balancing mangle rules
//! - Failover routes in four styles
//! - Orchestration per routing table

mod balance;
mod check_ip;
mod combiner;
mod failover;
mod monitor;
mod planner;
mod uplink;

pub use balance::{build_rules, load_balance_config, LoadBalanceMethod};
pub use check_ip::{CheckIpPool, DOMESTIC_CHECK_IPS, FOREIGN_CHECK_IPS, SHARED_PROBE_COUNT};
pub use combiner::combine_uplinks;
pub use failover::{
    failover_config, failover_script_name, failover_script_source, gateway_check_routes,
    ladder_distance, netwatch_entry, netwatch_routes, recursive_routes, scheduled_routes,
    FailoverStyle,
};
pub use monitor::{transition, MonitorState, NetwatchMonitor, NetwatchPolicy, RouteAction};
pub use planner::{
    is_network_table, main_table_routes, plan, routing_table_routes, MultiLinkConfig, Strategy,
};
pub use uplink::{from_vpn_clients, from_wan_links, HealthCheckConfig, Uplink};

/// Routing table failover goes to by default.
pub const MAIN_TABLE: &str = "main";

/// Default routing mark for balanced traffic.
pub const DEFAULT_ROUTING_MARK: &str = "to-Multilink";

/// Default address list of local networks.
pub const DEFAULT_LOCAL_LIST: &str = "LOCAL-IP";
