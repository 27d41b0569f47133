//! Structural guarantees of the synthesis pipeline.
//!
//! Checked over a spread of topology sizes rather than single examples:
//! - Determinism and idempotent builders
//! - Dense distances and fixed precedence
//! - Unique probe addresses and route comments across sources
//! - Complete PCC and NTH partitions, weighted or not
//! - Empty input in, empty output out

use std::collections::HashSet;

use ros_multilink::multilink::{
    build_rules, combine_uplinks, failover_config, load_balance_config, FailoverStyle,
    HealthCheckConfig, LoadBalanceMethod, FOREIGN_CHECK_IPS,
};
use ros_multilink::routeros::{section, MangleStage};
use ros_multilink::topology::{
    ConnectionMethod, VpnClientConfig, VpnClients, VpnProtocol, WanLinkConfig, WanLinks,
};
use ros_multilink::types::Network;

/// Topology with `vpn` clients spread over all families and the given
/// number of domestic and foreign links.
///
/// Names repeat across groups (`WAN-0` is both domestic and foreign, every
/// family's first client is `Office`) and most entries carry a weight.
fn topology(vpn: usize, domestic: usize, foreign: usize) -> (VpnClients, WanLinks) {
    let families = VpnProtocol::ALL.len();
    let mut clients = VpnClients::default();
    for i in 0..vpn {
        let protocol = VpnProtocol::ALL[i % families];
        let mut client = VpnClientConfig::new(if i < families {
            "Office".to_string()
        } else {
            format!("Office-{i}")
        });
        client.weight = Some(i as u32 % 3 + 1);
        clients.family_mut(protocol).push(client);
    }

    let link = |i: usize| {
        let link = WanLinkConfig::new(
            format!("WAN-{i}"),
            format!("ether{i}"),
            ConnectionMethod::Dhcp,
        );
        if i % 2 == 0 {
            link.with_weight(i as u32 + 2)
        } else {
            link
        }
    };
    let wan = WanLinks {
        domestic: (0..domestic).map(link).collect(),
        foreign: (0..foreign).map(link).collect(),
    };

    (clients, wan)
}

fn sizes() -> Vec<(usize, usize, usize)> {
    let mut out = Vec::new();
    for vpn in 0..4 {
        for domestic in 0..3 {
            for foreign in 0..4 {
                out.push((vpn, domestic, foreign));
            }
        }
    }
    out
}

// ============================================================================
// Combination
// ============================================================================

#[test]
fn test_combination_is_deterministic() {
    let health = HealthCheckConfig::default();
    for (v, d, f) in sizes() {
        let (vpn, wan) = topology(v, d, f);
        let first = combine_uplinks(Some(&vpn), Some(&wan), &health);
        let second = combine_uplinks(Some(&vpn), Some(&wan), &health);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

#[test]
fn test_distances_are_dense() {
    let health = HealthCheckConfig::default();
    for (v, d, f) in sizes() {
        let (vpn, wan) = topology(v, d, f);
        let uplinks = combine_uplinks(Some(&vpn), Some(&wan), &health);
        let distances: Vec<_> = uplinks.iter().map(|u| u.distance).collect();
        let expected: Vec<_> = (1..=uplinks.len() as u32).collect();
        assert_eq!(distances, expected, "sizes {v}/{d}/{f}");
    }
}

#[test]
fn test_check_ips_unique_across_sources() {
    let health = HealthCheckConfig::default();
    for (v, d, f) in sizes() {
        let (vpn, wan) = topology(v, d, f);
        let uplinks = combine_uplinks(Some(&vpn), Some(&wan), &health);
        let unique: HashSet<_> = uplinks.iter().map(|u| u.check_ip.as_str()).collect();
        assert_eq!(unique.len(), uplinks.len(), "sizes {v}/{d}/{f}");
    }
}

#[test]
fn test_foreign_pool_is_shared_without_collisions() {
    let health = HealthCheckConfig::default();
    let (vpn, wan) = topology(3, 0, 4);
    let uplinks = combine_uplinks(Some(&vpn), Some(&wan), &health);

    let used: Vec<_> = uplinks.iter().map(|u| u.check_ip.as_str()).collect();
    // VPN clients come first but take the pool entries after the foreign links.
    assert_eq!(&used[..3], &FOREIGN_CHECK_IPS[4..7]);
    assert_eq!(&used[3..], &FOREIGN_CHECK_IPS[..4]);
}

#[test]
fn test_precedence_order() {
    let health = HealthCheckConfig::default();
    let (vpn, wan) = topology(2, 2, 3);
    let uplinks = combine_uplinks(Some(&vpn), Some(&wan), &health);

    let networks: Vec<_> = uplinks.iter().map(|u| u.network).collect();
    assert_eq!(
        networks,
        vec![
            Network::Vpn,
            Network::Vpn,
            Network::Domestic,
            Network::Domestic,
            Network::Foreign,
            Network::Foreign,
            Network::Foreign,
        ]
    );
    assert!(networks.windows(2).all(|w| w[0] <= w[1]));
}

// ============================================================================
// Rule builders
// ============================================================================

#[test]
fn test_pcc_partition_is_complete() {
    let health = HealthCheckConfig::default();
    for (v, d, f) in sizes() {
        let (vpn, wan) = topology(v, d, f);
        let uplinks = combine_uplinks(Some(&vpn), Some(&wan), &health);
        let n = uplinks.len();
        let rules = build_rules(LoadBalanceMethod::Pcc, &uplinks, "to-Multilink", "LOCAL-IP");

        let buckets: Vec<_> = rules
            .iter()
            .filter(|r| r.stage == MangleStage::Classifier)
            .filter_map(|r| r.command.get("per-connection-classifier"))
            .collect();
        let expected: Vec<_> = (0..n)
            .map(|i| format!("both-addresses-and-ports:{n}/{i}"))
            .collect();
        assert_eq!(buckets, expected, "sizes {v}/{d}/{f}");
    }
}

#[test]
fn test_nth_partition_is_complete() {
    let health = HealthCheckConfig::default();
    for (v, d, f) in sizes() {
        let (vpn, wan) = topology(v, d, f);
        let uplinks = combine_uplinks(Some(&vpn), Some(&wan), &health);
        let n = uplinks.len();
        let rules = build_rules(LoadBalanceMethod::Nth, &uplinks, "to-Multilink", "LOCAL-IP");

        let counters: Vec<_> = rules
            .iter()
            .filter(|r| r.stage == MangleStage::Classifier)
            .filter_map(|r| r.command.get("nth"))
            .collect();
        let expected: Vec<_> = (1..=n).map(|i| format!("{n},{i}")).collect();
        assert_eq!(counters, expected, "sizes {v}/{d}/{f}");
    }
}

#[test]
fn test_route_comments_are_unique() {
    let health = HealthCheckConfig::default();
    for (v, d, f) in sizes() {
        let (vpn, wan) = topology(v, d, f);
        let uplinks = combine_uplinks(Some(&vpn), Some(&wan), &health);

        let tags: HashSet<_> = uplinks.iter().map(|u| u.route_comment()).collect();
        assert_eq!(tags.len(), uplinks.len(), "sizes {v}/{d}/{f}");

        for style in FailoverStyle::ALL {
            let config = failover_config(style, &uplinks, "main");
            for uplink in &uplinks {
                let needle = format!("comment={}", uplink.route_comment());
                let tagged = config
                    .section(section::IP_ROUTE)
                    .iter()
                    .filter(|r| r.ends_with(&needle))
                    .count();
                assert_eq!(tagged, 1, "{style} sizes {v}/{d}/{f}");
            }
        }
    }
}

#[test]
fn test_builders_are_idempotent() {
    let health = HealthCheckConfig::default();
    let (vpn, wan) = topology(2, 1, 3);
    let uplinks = combine_uplinks(Some(&vpn), Some(&wan), &health);

    for method in [LoadBalanceMethod::Pcc, LoadBalanceMethod::Nth] {
        let first = load_balance_config(method, &uplinks, "to-Multilink", "LOCAL-IP");
        let second = load_balance_config(method, &uplinks, "to-Multilink", "LOCAL-IP");
        assert_eq!(first.render(), second.render());
    }

    for style in FailoverStyle::ALL {
        let first = failover_config(style, &uplinks, "main");
        let second = failover_config(style, &uplinks, "main");
        assert_eq!(first, second);
    }
}

#[test]
fn test_empty_input_closure() {
    let health = HealthCheckConfig::default();
    assert!(combine_uplinks(None, None, &health).is_empty());

    let (vpn, wan) = topology(0, 0, 0);
    let uplinks = combine_uplinks(Some(&vpn), Some(&wan), &health);
    assert!(uplinks.is_empty());

    for method in [LoadBalanceMethod::Pcc, LoadBalanceMethod::Nth] {
        assert!(build_rules(method, &uplinks, "m", "LOCAL-IP").is_empty());
        assert!(load_balance_config(method, &uplinks, "m", "LOCAL-IP").is_empty());
    }
    for style in FailoverStyle::ALL {
        let config = failover_config(style, &uplinks, "main");
        assert!(config.is_empty());
        assert_eq!(config.render(), "");
    }
}
