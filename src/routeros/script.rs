//! Section map of generated commands, merging and final rendering.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::section;

/// Canonical order of sections in a rendered script.
///
/// Tables must exist before routes reference them and scripts before the
/// scheduler entries that run them. Sections not listed here follow in
/// alphabetical order.
pub const SECTION_ORDER: &[&str] = &[
    section::ROUTING_TABLE,
    section::FIREWALL_ADDRESS_LIST,
    section::FIREWALL_MANGLE,
    section::IP_ROUTE,
    section::SYSTEM_SCRIPT,
    section::TOOL_NETWATCH,
    section::SYSTEM_SCHEDULER,
];

/// Generated configuration: section name → ordered command lines.
///
/// For a fixed input the same keys and lines come out in the same order;
/// nothing here depends on hashing or time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouterConfig {
    sections: BTreeMap<String, Vec<String>>,
}

impl RouterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rendered command to `section`.
    pub fn push(&mut self, section: &str, command: impl Into<String>) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .push(command.into());
    }

    /// Append several commands to `section`.
    pub fn extend<I, C>(&mut self, section: &str, commands: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        for command in commands {
            self.push(section, command);
        }
    }

    /// Lines of one section (empty if absent).
    pub fn section(&self, name: &str) -> &[String] {
        self.sections.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when no section holds any line.
    pub fn is_empty(&self) -> bool {
        self.sections.values().all(Vec::is_empty)
    }

    /// Total number of command lines.
    pub fn command_count(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    /// Append every section of `other` after the lines already present.
    pub fn merge(&mut self, other: RouterConfig) {
        for (name, lines) in other.sections {
            self.sections.entry(name).or_default().extend(lines);
        }
    }

    /// Merge several configs in order.
    pub fn merged<I: IntoIterator<Item = RouterConfig>>(configs: I) -> Self {
        let mut out = Self::new();
        for config in configs {
            out.merge(config);
        }
        out
    }

    /// Sections in render order.
    pub fn ordered_sections(&self) -> Vec<(&str, &[String])> {
        let mut known: Vec<(&str, &[String])> = SECTION_ORDER
            .iter()
            .filter_map(|name| {
                self.sections
                    .get_key_value(*name)
                    .map(|(k, v)| (k.as_str(), v.as_slice()))
            })
            .collect();

        known.extend(
            self.sections
                .iter()
                .filter(|(name, _)| !SECTION_ORDER.contains(&name.as_str()))
                .map(|(k, v)| (k.as_str(), v.as_slice())),
        );

        known.retain(|(_, lines)| !lines.is_empty());
        known
    }

    /// Render the final script text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (name, lines) in self.ordered_sections() {
            out.push_str(name);
            out.push('\n');
            for line in lines {
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routeros::Command;

    #[test]
    fn test_empty_config() {
        let config = RouterConfig::new();
        assert!(config.is_empty());
        assert_eq!(config.render(), "");
        assert!(config.section(section::IP_ROUTE).is_empty());
    }

    #[test]
    fn test_merge_appends_per_section() {
        let mut a = RouterConfig::new();
        a.push(section::IP_ROUTE, "add dst-address=0.0.0.0/0 gateway=ether1");

        let mut b = RouterConfig::new();
        b.push(section::IP_ROUTE, "add dst-address=0.0.0.0/0 gateway=ether2");
        b.push(section::TOOL_NETWATCH, "add host=1.1.1.1");

        a.merge(b);
        assert_eq!(a.section(section::IP_ROUTE).len(), 2);
        assert!(a.section(section::IP_ROUTE)[1].ends_with("ether2"));
        assert_eq!(a.command_count(), 3);
    }

    #[test]
    fn test_render_uses_canonical_order() {
        let mut config = RouterConfig::new();
        config.push(section::SYSTEM_SCHEDULER, "add name=s");
        config.push("/ip dns", "set servers=1.1.1.1");
        config.push(section::IP_ROUTE, "add gateway=ether1");
        config.push(section::SYSTEM_SCRIPT, "add name=s");

        let names: Vec<_> = config.ordered_sections().iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                section::IP_ROUTE,
                section::SYSTEM_SCRIPT,
                section::SYSTEM_SCHEDULER,
                "/ip dns"
            ]
        );
        assert!(config.render().starts_with("/ip route\nadd gateway=ether1\n"));
    }

    #[test]
    fn test_json_shape_is_plain_map() {
        let mut config = RouterConfig::new();
        config.push(section::IP_ROUTE, Command::add().arg("gateway", "ether1"));
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"/ip route":["add gateway=ether1"]}"#);
    }
}
