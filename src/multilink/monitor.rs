//! Netwatch monitor semantics.
//!
//! The router runs the monitor; this module models what it does with the
//! generated entry so the up/down scripts can be derived from one place and
//! the transitions can be tested offline.

use serde::{Deserialize, Serialize};

/// Observed reachability of an uplink's probe address. Monitors start `Up`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorState {
    #[default]
    Up,
    Down,
}

/// What a monitor transition does to the uplink's route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteAction {
    Enable,
    Disable,
}

impl RouteAction {
    /// RouterOS command toggling the route tagged `comment`.
    pub fn script(self, comment: &str) -> String {
        let verb = match self {
            Self::Enable => "enable",
            Self::Disable => "disable",
        };
        format!("/ip route {verb} [find comment=\"{comment}\"]")
    }
}

/// Handling of the very first observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetwatchPolicy {
    pub ignore_initial_up: bool,
    pub ignore_initial_down: bool,
}

impl Default for NetwatchPolicy {
    fn default() -> Self {
        Self {
            ignore_initial_up: true,
            ignore_initial_down: false,
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

impl NetwatchPolicy {
    /// `ignore-initial-up` argument value.
    pub fn initial_up_arg(self) -> &'static str {
        yes_no(self.ignore_initial_up)
    }

    /// `ignore-initial-down` argument value.
    pub fn initial_down_arg(self) -> &'static str {
        yes_no(self.ignore_initial_down)
    }
}

/// Apply one observation.
///
/// On the first observation the policy decides whether to act; afterwards
/// only a change of state fires a script. There is no terminal state.
pub fn transition(
    state: MonitorState,
    first: bool,
    observed: MonitorState,
    policy: NetwatchPolicy,
) -> (MonitorState, Option<RouteAction>) {
    let action = match observed {
        MonitorState::Up => RouteAction::Enable,
        MonitorState::Down => RouteAction::Disable,
    };

    if first {
        let ignored = match observed {
            MonitorState::Up => policy.ignore_initial_up,
            MonitorState::Down => policy.ignore_initial_down,
        };
        return (observed, (!ignored).then_some(action));
    }

    if state == observed {
        (state, None)
    } else {
        (observed, Some(action))
    }
}

/// Stateful wrapper around [`transition`].
#[derive(Debug, Clone, Default)]
pub struct NetwatchMonitor {
    state: MonitorState,
    observed_once: bool,
    policy: NetwatchPolicy,
}

impl NetwatchMonitor {
    pub fn new(policy: NetwatchPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Feed one probe result, returning the action the monitor fires.
    pub fn observe(&mut self, observed: MonitorState) -> Option<RouteAction> {
        let (next, action) = transition(self.state, !self.observed_once, observed, self.policy);
        self.state = next;
        self.observed_once = true;
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_up_is_ignored() {
        let mut monitor = NetwatchMonitor::new(NetwatchPolicy::default());
        assert_eq!(monitor.state(), MonitorState::Up);
        assert_eq!(monitor.observe(MonitorState::Up), None);
        assert_eq!(monitor.observe(MonitorState::Up), None);
    }

    #[test]
    fn test_initial_down_fires() {
        let mut monitor = NetwatchMonitor::new(NetwatchPolicy::default());
        assert_eq!(monitor.observe(MonitorState::Down), Some(RouteAction::Disable));
        assert_eq!(monitor.state(), MonitorState::Down);
        assert_eq!(monitor.observe(MonitorState::Down), None);
    }

    #[test]
    fn test_flapping() {
        let mut monitor = NetwatchMonitor::new(NetwatchPolicy::default());
        let actions: Vec<_> = [
            MonitorState::Up,
            MonitorState::Down,
            MonitorState::Up,
            MonitorState::Down,
        ]
        .into_iter()
        .map(|s| monitor.observe(s))
        .collect();
        assert_eq!(
            actions,
            vec![
                None,
                Some(RouteAction::Disable),
                Some(RouteAction::Enable),
                Some(RouteAction::Disable),
            ]
        );
    }

    #[test]
    fn test_policy_can_act_on_initial_up() {
        let policy = NetwatchPolicy {
            ignore_initial_up: false,
            ignore_initial_down: true,
        };
        assert_eq!(
            transition(MonitorState::Up, true, MonitorState::Up, policy),
            (MonitorState::Up, Some(RouteAction::Enable))
        );
        assert_eq!(
            transition(MonitorState::Up, true, MonitorState::Down, policy),
            (MonitorState::Down, None)
        );
    }

    #[test]
    fn test_scripts() {
        assert_eq!(
            RouteAction::Disable.script("Route-WAN-1"),
            "/ip route disable [find comment=\"Route-WAN-1\"]"
        );
        assert_eq!(NetwatchPolicy::default().initial_up_arg(), "yes");
        assert_eq!(NetwatchPolicy::default().initial_down_arg(), "no");
    }
}
