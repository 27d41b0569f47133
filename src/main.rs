//! ros-multilink CLI - RouterOS multi-WAN script generator.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use ros_multilink::cli::*;
use ros_multilink::config::{init_logging, LoggingConfig, Topology};
use ros_multilink::error::Result;
use ros_multilink::multilink::{combine_uplinks, plan, Uplink};
use ros_multilink::VERSION;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Command-line flags win over the topology's [logging] section.
    let level = cli.log_level.clone();
    let log_format = cli.log_format;
    let no_color = cli.no_color;
    let setup_logging = |base: LoggingConfig| {
        let config =
            base.with_overrides(level.as_deref(), log_format.map(OutputFormat::as_str), no_color);
        if let Err(e) = init_logging(&config) {
            eprintln!("{} {e}", "⚠".yellow());
        }
    };

    let format = cli.format;
    let result = match cli.command {
        Commands::Generate(args) => load_topology(args.topology.clone()).and_then(|topology| {
            setup_logging(topology.logging.clone());
            run_generate(topology, args, format)
        }),
        Commands::Uplinks(args) => load_topology(args.topology).and_then(|topology| {
            setup_logging(topology.logging.clone());
            run_uplinks(&topology, format)
        }),
        Commands::Example(args) => {
            setup_logging(LoggingConfig::default());
            run_example(args)
        }
        Commands::Completions(args) => {
            setup_logging(LoggingConfig::default());
            run_completions(args)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "✗".red());
            if e.is_user_error() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

/// Load the given topology, or the one in the user config directory.
fn load_topology(path: Option<PathBuf>) -> Result<Topology> {
    Topology::load(path.unwrap_or_else(Topology::default_path))
}

/// Write `content` to `output`, or stdout when absent.
fn emit(content: &str, output: Option<&Path>) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, content)?;
        eprintln!("{} Written to {}", "✓".green(), path.display());
    } else {
        print!("{content}");
    }
    Ok(())
}

/// Generate RouterOS commands
fn run_generate(mut topology: Topology, args: GenerateArgs, format: OutputFormat) -> Result<()> {

    let multilink = &mut topology.multilink;
    if let Some(strategy) = args.strategy {
        multilink.strategy = strategy.into();
    }
    if let Some(style) = args.style {
        multilink.style = style.into();
    }
    if let Some(method) = args.method {
        multilink.method = method.into();
    }
    if let Some(mark) = args.mark {
        multilink.routing_mark = mark;
    }
    if let Some(table) = args.table {
        multilink.table = table;
    }
    topology.validate()?;

    let config = plan(&topology);
    if config.is_empty() {
        eprintln!("{} No uplinks configured, nothing generated", "⚠".yellow());
    }

    let content = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&config)? + "\n",
        OutputFormat::Text => {
            format!("# generated by ros-multilink {VERSION}\n{}", config.render())
        }
    };
    emit(&content, args.output.as_deref())
}

/// Print the combined uplink list
fn run_uplinks(topology: &Topology, format: OutputFormat) -> Result<()> {
    let uplinks = combine_uplinks(
        topology.vpn_client.as_ref(),
        topology.wan_links.as_ref(),
        &topology.health_check,
    );

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&uplinks)?);
        return Ok(());
    }

    if uplinks.is_empty() {
        println!("{}", "No uplinks configured.".dimmed());
        return Ok(());
    }

    println!("{}", "Uplinks (by priority):".bright_white().bold());
    println!();
    for uplink in &uplinks {
        print_uplink(uplink);
    }

    Ok(())
}

fn print_uplink(uplink: &Uplink) {
    println!(
        "  {} {} {} via {} [{}]",
        format!("{:>2}.", uplink.distance).bright_white(),
        uplink.name.cyan(),
        format!("({})", uplink.network).dimmed(),
        uplink.gateway,
        format!("check {} every {}", uplink.check_ip, uplink.interval).dimmed()
    );
}

/// Print an example topology
fn run_example(args: ExampleArgs) -> Result<()> {
    let output = toml::to_string_pretty(&Topology::example())?;
    emit(&output, args.output.as_deref())
}

/// Generate shell completions
fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::generate;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    generate(
        clap_complete::Shell::from(args.shell),
        &mut cmd,
        name,
        &mut std::io::stdout(),
    );

    Ok(())
}
