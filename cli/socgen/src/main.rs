//! socgen CLI: SoC project generation from plugin manifests and data models.

mod commands;
mod config;

use std::process;

use anyhow::anyhow;
use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use simple_logger::SimpleLogger;

use commands::Workspace;
use config::SocgenConfig;

#[derive(Parser)]
#[command(name = "socgen", version, about = "SoC project and code generator")]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new socgen project
    Init {
        /// Project name
        name: String,
    },
    /// Print the controls of a scope after plugin overrides
    Controls {
        /// Control scope (memory, peripheral, pinConfig, clockConfig, dfg)
        scope: String,
        /// Plugin manifest (default: inputs.plugin)
        #[arg(long)]
        plugin: Option<String>,
        /// SoC data model (default: inputs.datamodel)
        #[arg(long)]
        datamodel: Option<String>,
    },
    /// Print the UI properties of a scope
    Properties {
        /// Property scope (workspace, project, codegen)
        scope: String,
        /// Plugin manifest (default: inputs.plugin)
        #[arg(long)]
        plugin: Option<String>,
        /// Context JSON used for conditions and defaults (default: inputs.context)
        #[arg(long)]
        context: Option<String>,
    },
    /// Evaluate a reverse-Polish register value expression
    Rpn {
        /// Expression, e.g. "${Value} 2 *"
        #[arg(allow_hyphen_values = true)]
        expr: String,
        /// Control value substituted for ${Value}
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        value: i64,
    },
    /// Emit C statements for a register operation sequence
    GenCode {
        /// Sequence JSON file
        #[arg(long)]
        sequence: String,
        /// SoC data model (default: inputs.datamodel)
        #[arg(long)]
        datamodel: Option<String>,
        /// Control value substituted for ${Value}
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        value: i64,
        /// Prefix of every emitted line
        #[arg(long, default_value = "    ")]
        indent: String,
    },
    /// Run a plugin generator (workspace, project, codegen)
    Generate {
        /// Generator to run
        kind: String,
        /// Plugin manifest (default: inputs.plugin)
        #[arg(long)]
        plugin: Option<String>,
        /// Context JSON (default: inputs.context)
        #[arg(long)]
        context: Option<String>,
        /// Output directory (default: output.dir)
        #[arg(long)]
        output: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let ws = match SocgenConfig::find_and_load(&cwd)? {
        Some((config, dir)) => Workspace {
            config: Some(config),
            dir,
        },
        None => Workspace { config: None, dir: cwd },
    };

    let level = log_level(cli.verbose, cli.quiet, ws.config.as_ref())?;
    SimpleLogger::new()
        .with_level(level)
        .init()
        .map_err(|e| anyhow!("installing logger: {e}"))?;

    match cli.command {
        Commands::Init { name } => commands::init::run(&name),

        Commands::Controls {
            scope,
            plugin,
            datamodel,
        } => commands::controls::run(&ws, &scope, plugin.as_deref(), datamodel.as_deref()),

        Commands::Properties {
            scope,
            plugin,
            context,
        } => commands::properties::run(&ws, &scope, plugin.as_deref(), context.as_deref()),

        Commands::Rpn { expr, value } => commands::rpn::run(&expr, value),

        Commands::GenCode {
            sequence,
            datamodel,
            value,
            indent,
        } => commands::gen_code::run(&ws, &sequence, datamodel.as_deref(), value, &indent),

        Commands::Generate {
            kind,
            plugin,
            context,
            output,
        } => commands::generate::run(
            &ws,
            &kind,
            plugin.as_deref(),
            context.as_deref(),
            output.as_deref(),
        ),
    }
}

/// Flags first, then `[logging] level`, then `warn`.
fn log_level(verbose: u8, quiet: bool, config: Option<&SocgenConfig>) -> anyhow::Result<LevelFilter> {
    if quiet {
        return Ok(LevelFilter::Error);
    }
    let from_flags = match verbose {
        0 => None,
        1 => Some(LevelFilter::Info),
        2 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    };
    if let Some(level) = from_flags {
        return Ok(level);
    }
    match config {
        Some(config) => Ok(config.log_level()?.unwrap_or(LevelFilter::Warn)),
        None => Ok(LevelFilter::Warn),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_commands() {
        let cli = Cli::try_parse_from(["socgen", "-vv", "rpn", "${Value} 2 *", "--value", "5"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Rpn { ref expr, value: 5 } if expr == "${Value} 2 *"));

        let cli = Cli::try_parse_from(["socgen", "controls", "pinConfig", "--datamodel", "soc.json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Controls { ref scope, datamodel: Some(_), plugin: None } if scope == "pinConfig"
        ));

        let cli = Cli::try_parse_from(["socgen", "gen-code", "--sequence", "s.json", "-q"]).unwrap();
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::GenCode { ref indent, value: 0, .. } if indent == "    "));
    }

    #[test]
    fn log_level_precedence() {
        let config = SocgenConfig::from_str("[project]\nname = \"x\"\n[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(log_level(0, true, Some(&config)).unwrap(), LevelFilter::Error);
        assert_eq!(log_level(1, false, Some(&config)).unwrap(), LevelFilter::Info);
        assert_eq!(log_level(3, false, None).unwrap(), LevelFilter::Trace);
        assert_eq!(log_level(0, false, Some(&config)).unwrap(), LevelFilter::Debug);
        assert_eq!(log_level(0, false, None).unwrap(), LevelFilter::Warn);
    }
}
