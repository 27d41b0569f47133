//! RouterOS command model.
//!
//! - Command lines with stable argument order and CLI quoting
//! - Section map with merge and canonical rendering
//! - Stage-tagged mangle rules

mod command;
mod script;
pub mod mangle;

pub use command::{quote, Command};
pub use mangle::{MangleRule, MangleStage};
pub use script::{RouterConfig, SECTION_ORDER};

/// Menu paths used by the generator.
pub mod section {
    pub const IP_ROUTE: &str = "/ip route";
    pub const FIREWALL_MANGLE: &str = "/ip firewall mangle";
    pub const FIREWALL_ADDRESS_LIST: &str = "/ip firewall address-list";
    pub const ROUTING_TABLE: &str = "/routing table";
    pub const TOOL_NETWATCH: &str = "/tool netwatch";
    pub const SYSTEM_SCRIPT: &str = "/system script";
    pub const SYSTEM_SCHEDULER: &str = "/system scheduler";
}
