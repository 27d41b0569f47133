//! # ros-multilink
//!
//! Multi-WAN failover and load-balancing synthesis for MikroTik RouterOS.
//!
//! Given WAN links and VPN clients, ros-multilink builds one prioritized
//! list of uplinks and emits the routes, mangle rules, monitors and scripts
//! that make the router prefer the best healthy uplink or spread
//! connections across all of them.
//!
//! ## Pipeline
//!
//! ┌──────────────────────┐   ┌──────────────────────┐
//! │  WAN links           │   │  VPN clients         │
//! │  (domestic/foreign)  │   │  (per protocol)      │
//! └──────────┬───────────┘   └──────────┬───────────┘
//!            └────────────┬─────────────┘
//!                         ▼
//!              ┌─────────────────────┐
//!              │ Normalize + combine │  check IPs, distances
//!              └──────────┬──────────┘
//!            ┌────────────┴─────────────┐
//!            ▼                          ▼
//! ┌──────────────────────┐   ┌──────────────────────┐
//! │ Load balancing       │   │ Failover routes      │
//! │ (PCC / NTH mangle)   │   │ (4 styles)           │
//! └──────────┬───────────┘   └──────────┬───────────┘
//!            └────────────┬─────────────┘
//!                         ▼
//!              ┌─────────────────────┐
//!              │ RouterConfig        │  section → commands
//!              └─────────────────────┘

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow stylistic lints that don't affect correctness
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]              // ASCII diagrams in docs
#![allow(clippy::cast_possible_truncation)]  // Uplink counts fit in u32
#![allow(clippy::option_if_let_else)]        // More readable in context
#![allow(clippy::use_self)]                  // Explicit type names in matches
#![allow(clippy::match_same_arms)]           // Explicit arm per variant is clearer
#![allow(clippy::return_self_not_must_use)]  // Builder methods don't need must_use

pub mod config;
pub mod error;
pub mod multilink;
pub mod routeros;
pub mod topology;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;

pub use config::Topology;
pub use error::{Error, Result};
pub use types::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::Topology;
    pub use crate::error::{Error, Result};
    pub use crate::multilink::{
        combine_uplinks, plan, FailoverStyle, HealthCheckConfig, LoadBalanceMethod,
        MultiLinkConfig, Strategy, Uplink,
    };
    pub use crate::routeros::{Command, RouterConfig};
    pub use crate::topology::{ConnectionMethod, VpnClients, VpnProtocol, WanLinkConfig, WanLinks};
    pub use crate::types::*;
}
