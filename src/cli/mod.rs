//! Command-line interface for ros-multilink.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// ros-multilink - RouterOS multi-WAN script generator
#[derive(Parser, Debug)]
#[command(
    name = "ros-multilink",
    author,
    version,
    about = "Generate RouterOS failover and load-balancing configuration",
    long_about = r#"
ros-multilink turns a declarative list of WAN links and VPN clients into
RouterOS commands:

  - Recursive, netwatch or scheduled-script failover routes
  - PCC / NTH load-balancing mangle rules
  - Collision-free health-check probes per uplink

QUICK START:
  ros-multilink example > topology.toml
  ros-multilink generate topology.toml
  ros-multilink generate topology.toml --strategy both --method nth
"#
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error); overrides `[logging]`
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Log format; overrides `[logging]`
    #[arg(long, global = true)]
    pub log_format: Option<OutputFormat>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate RouterOS commands for a topology
    Generate(GenerateArgs),

    /// Show the combined, prioritized uplink list
    Uplinks(UplinksArgs),

    /// Print an example topology
    Example(ExampleArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Generate command arguments
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Topology file (TOML or JSON); defaults to the user config directory
    pub topology: Option<PathBuf>,

    /// Override the multi-link strategy
    #[arg(long)]
    pub strategy: Option<StrategyArg>,

    /// Override the failover style
    #[arg(long)]
    pub style: Option<FailoverStyleArg>,

    /// Override the load-balancing method
    #[arg(long)]
    pub method: Option<LoadBalanceMethodArg>,

    /// Override the routing mark used for balanced traffic
    #[arg(long)]
    pub mark: Option<String>,

    /// Override the table receiving failover routes
    #[arg(long)]
    pub table: Option<String>,

    /// Write the script to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Uplinks command arguments
#[derive(Args, Debug)]
pub struct UplinksArgs {
    /// Topology file (TOML or JSON); defaults to the user config directory
    pub topology: Option<PathBuf>,
}

/// Example command arguments
#[derive(Args, Debug)]
pub struct ExampleArgs {
    /// Output path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Completions command arguments
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

/// Multi-link strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Ordered failover only
    Failover,
    /// Load balancing only
    LoadBalance,
    /// Load balancing with failover
    Both,
}

impl From<StrategyArg> for crate::multilink::Strategy {
    fn from(s: StrategyArg) -> Self {
        match s {
            StrategyArg::Failover => Self::Failover,
            StrategyArg::LoadBalance => Self::LoadBalance,
            StrategyArg::Both => Self::Both,
        }
    }
}

/// Failover style
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FailoverStyleArg {
    /// Native gateway ping per route
    GatewayCheck,
    /// Recursive routes on a distance ladder
    Recursive,
    /// Netwatch-driven (default)
    Netwatch,
    /// Scheduled ping script
    Scheduled,
}

impl From<FailoverStyleArg> for crate::multilink::FailoverStyle {
    fn from(s: FailoverStyleArg) -> Self {
        match s {
            FailoverStyleArg::GatewayCheck => Self::GatewayCheck,
            FailoverStyleArg::Recursive => Self::Recursive,
            FailoverStyleArg::Netwatch => Self::Netwatch,
            FailoverStyleArg::Scheduled => Self::Scheduled,
        }
    }
}

/// Load-balancing method
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LoadBalanceMethodArg {
    /// Per-connection classifier
    Pcc,
    /// Every Nth connection
    Nth,
}

impl From<LoadBalanceMethodArg> for crate::multilink::LoadBalanceMethod {
    fn from(m: LoadBalanceMethodArg) -> Self {
        match m {
            LoadBalanceMethodArg::Pcc => Self::Pcc,
            LoadBalanceMethodArg::Nth => Self::Nth,
        }
    }
}

/// Shell type for completions
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

impl From<Shell> for clap_complete::Shell {
    fn from(s: Shell) -> Self {
        match s {
            Shell::Bash => Self::Bash,
            Shell::Zsh => Self::Zsh,
            Shell::Fish => Self::Fish,
            Shell::PowerShell => Self::PowerShell,
        }
    }
}
