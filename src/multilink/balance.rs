//! Load-balancing mangle rules (PCC and NTH).
//!
//! Both methods share the same staging:
//! 1. mark connections arriving on an uplink with `<iface>-conn`
//! 2. route router-originated traffic of marked connections
//! 3. split new outbound connections across uplinks
//! 4. route forwarded traffic of marked connections
//!
//! They differ only in step 3. PCC hashes addresses and ports, so a given
//! connection tuple always lands on the same uplink. NTH counts new
//! connections round-robin, so the assignment is not stable across
//! regenerations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::uplink::Uplink;
use crate::routeros::{mangle, section, Command, MangleRule, MangleStage, RouterConfig};

/// Connection-splitting method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LoadBalanceMethod {
    /// Per-connection classifier (hash of both addresses and ports).
    #[default]
    #[serde(rename = "PCC", alias = "pcc")]
    Pcc,
    /// Every Nth new connection.
    #[serde(rename = "NTH", alias = "nth")]
    Nth,
}

impl fmt::Display for LoadBalanceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pcc => f.write_str("PCC"),
            Self::Nth => f.write_str("NTH"),
        }
    }
}

impl FromStr for LoadBalanceMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PCC" => Ok(Self::Pcc),
            "NTH" => Ok(Self::Nth),
            _ => Err(format!("unknown load-balancing method: {s}")),
        }
    }
}

/// Build the tagged mangle rules for `uplinks`.
///
/// Rules come out uplink by uplink; [`mangle::into_config`] reorders them
/// into chain order. The uplink at position `i` of `N` owns classifier
/// bucket `i` of `N`; weights do not change the partition.
pub fn build_rules(
    method: LoadBalanceMethod,
    uplinks: &[Uplink],
    routing_mark: &str,
    local_list: &str,
) -> Vec<MangleRule> {
    let total = uplinks.len();
    let not_local = format!("!{local_list}");
    let mut rules = Vec::new();

    for (index, uplink) in uplinks.iter().enumerate() {
        let conn_mark = uplink.connection_mark();
        let group = uplink.tag.as_str();

        rules.push(MangleRule::new(
            MangleStage::InboundConnection,
            index,
            group,
            Command::add()
                .arg("chain", "prerouting")
                .arg("in-interface", &uplink.interface)
                .arg("connection-mark", "no-mark")
                .arg("action", "mark-connection")
                .arg("new-connection-mark", &conn_mark)
                .arg("passthrough", "yes"),
        ));

        rules.push(MangleRule::new(
            MangleStage::OutputRouting,
            index,
            group,
            Command::add()
                .arg("chain", "output")
                .arg("connection-mark", &conn_mark)
                .arg("action", "mark-routing")
                .arg("new-routing-mark", routing_mark)
                .arg("passthrough", "no"),
        ));

        let classifier = match method {
            LoadBalanceMethod::Pcc => Command::add()
                .arg("chain", "prerouting")
                .arg("connection-state", "new")
                .arg("connection-mark", "no-mark")
                .arg("dst-address-list", &not_local)
                .arg(
                    "per-connection-classifier",
                    format!("both-addresses-and-ports:{total}/{index}"),
                ),
            LoadBalanceMethod::Nth => Command::add()
                .arg("chain", "prerouting")
                .arg("connection-state", "new")
                .arg("connection-mark", "no-mark")
                .arg("src-address-list", local_list)
                .arg("dst-address-list", &not_local)
                .arg("nth", format!("{total},{}", index + 1)),
        };
        rules.push(MangleRule::new(
            MangleStage::Classifier,
            index,
            group,
            classifier
                .arg("action", "mark-connection")
                .arg("new-connection-mark", &conn_mark)
                .arg("passthrough", "yes"),
        ));

        rules.push(MangleRule::new(
            MangleStage::PreroutingRouting,
            index,
            group,
            Command::add()
                .arg("chain", "prerouting")
                .arg("connection-mark", &conn_mark)
                .arg("dst-address-list", &not_local)
                .arg("action", "mark-routing")
                .arg("new-routing-mark", routing_mark)
                .arg("passthrough", "no"),
        ));
    }

    rules
}

/// Full load-balancing configuration: the routing table, one checked
/// default route per uplink inside it, and the mangle rules in chain order.
pub fn load_balance_config(
    method: LoadBalanceMethod,
    uplinks: &[Uplink],
    routing_mark: &str,
    local_list: &str,
) -> RouterConfig {
    if uplinks.is_empty() {
        return RouterConfig::new();
    }

    let mut config = mangle::into_config(build_rules(method, uplinks, routing_mark, local_list));

    config.push(
        section::ROUTING_TABLE,
        Command::add().arg("name", routing_mark).flag("fib"),
    );
    for uplink in uplinks {
        config.push(
            section::IP_ROUTE,
            Command::add()
                .arg("dst-address", "0.0.0.0/0")
                .arg("gateway", &uplink.gateway)
                .arg("distance", uplink.distance)
                .arg("check-gateway", "ping")
                .arg("routing-table", routing_mark)
                .arg("comment", format!("LB-{}", uplink.tag)),
        );
    }

    config
}
