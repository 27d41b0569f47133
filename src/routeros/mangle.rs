//! Priority-tagged firewall mangle rules.
//!
//! Load-balancing rules are emitted per uplink, but RouterOS evaluates the
//! mangle chain top to bottom, so all rules of one stage have to precede
//! the next stage. Each rule carries its stage and sub-priority from the
//! moment it is built; ordering happens on these tags and text is rendered
//! last.

use super::{section, Command, RouterConfig};

/// Evaluation stage of a mangle rule, in chain order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MangleStage {
    /// Mark connections by the interface they arrived on.
    InboundConnection,
    /// Route router-originated traffic of a marked connection.
    OutputRouting,
    /// Split new connections across uplinks (PCC / NTH).
    Classifier,
    /// Route forwarded traffic of a marked connection.
    PreroutingRouting,
}

/// A mangle rule together with its ordering metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MangleRule {
    /// Chain stage.
    pub stage: MangleStage,
    /// Position within the stage (uplink index).
    pub order: usize,
    /// Logical target the rule belongs to (uplink tag).
    pub group: String,
    /// The command itself.
    pub command: Command,
}

impl MangleRule {
    pub fn new(
        stage: MangleStage,
        order: usize,
        group: impl Into<String>,
        command: Command,
    ) -> Self {
        Self {
            stage,
            order,
            group: group.into(),
            command,
        }
    }
}

/// Sort rules into chain order: by stage, then by sub-priority.
///
/// The sort is stable, so rules with equal tags keep emission order.
pub fn sort_rules(rules: &mut [MangleRule]) {
    rules.sort_by_key(|r| (r.stage, r.order));
}

/// Rules of one logical target, in their current order.
pub fn rules_for<'a>(
    rules: &'a [MangleRule],
    group: &'a str,
) -> impl Iterator<Item = &'a MangleRule> {
    rules.iter().filter(move |r| r.group == group)
}

/// Sort and render rules into the mangle section of a config.
pub fn into_config(mut rules: Vec<MangleRule>) -> RouterConfig {
    sort_rules(&mut rules);
    let mut config = RouterConfig::new();
    config.extend(
        section::FIREWALL_MANGLE,
        rules.into_iter().map(|r| r.command),
    );
    config
}
