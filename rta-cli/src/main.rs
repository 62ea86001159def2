use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rta_core::{Limits, translate_debug, translate_with_limits};

#[derive(Parser)]
#[command(name = "rta")]
#[command(about = "RTA - compile regex notation into an NFA table and diagram")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    limits: LimitArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct LimitArgs {
    /// Maximum pattern length in characters
    #[arg(long, global = true, env = "RTA_MAX_LEN", default_value_t = Limits::DEFAULT_MAX_LEN)]
    max_len: usize,
    /// Maximum parser recursion depth (a repeated group uses two levels)
    #[arg(long, global = true, env = "RTA_MAX_DEPTH", default_value_t = Limits::DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

impl From<&LimitArgs> for Limits {
    fn from(args: &LimitArgs) -> Self {
        Limits::new(args.max_len, args.max_depth)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print both the transition table and the diagram
    Translate {
        /// The pattern
        pattern: String,
        /// Show the extent tree and normalized pattern
        #[arg(short, long)]
        debug: bool,
    },
    /// Print the transition table
    Table {
        /// The pattern
        pattern: String,
    },
    /// Print the Mermaid diagram
    Diagram {
        /// The pattern
        pattern: String,
    },
    /// Print the extent tree of a pattern
    Parse {
        /// The pattern
        pattern: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let limits = Limits::from(&cli.limits);

    match cli.command {
        Commands::Translate { pattern, debug } => cmd_translate(&pattern, debug, limits),
        Commands::Table { pattern } => cmd_table(&pattern, limits),
        Commands::Diagram { pattern } => cmd_diagram(&pattern, limits),
        Commands::Parse { pattern } => cmd_parse(&pattern, limits),
    }
}

fn fail(e: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), e);
    std::process::exit(1);
}

fn cmd_translate(pattern: &str, debug: bool, limits: Limits) {
    log::info!("translating `{}`", pattern);

    if debug {
        match translate_debug(pattern, limits) {
            Ok(report) => report.report(),
            Err(e) => fail(e),
        }
        return;
    }

    let translation = match translate_with_limits(pattern, limits) {
        Ok(t) => t,
        Err(e) => fail(e),
    };

    println!("{}", "Transition table:".bold());
    println!("{}", translation.table);
    println!();
    println!("{}", "Diagram:".bold());
    println!("{}", translation.diagram.green());
}

fn cmd_table(pattern: &str, limits: Limits) {
    match translate_with_limits(pattern, limits) {
        Ok(translation) => println!("{}", translation.table),
        Err(e) => fail(e),
    }
}

fn cmd_diagram(pattern: &str, limits: Limits) {
    match translate_with_limits(pattern, limits) {
        Ok(translation) => println!("{}", translation.diagram),
        Err(e) => fail(e),
    }
}

fn cmd_parse(pattern: &str, limits: Limits) {
    println!("{}", "Parsing pattern...".bold());
    println!("  Input: {}", pattern.cyan());
    println!();

    let extent = match rta_core::parse_with_limits(pattern, limits) {
        Ok(extent) => extent,
        Err(e) => fail(e),
    };

    println!("{}", "Extents:".bold());
    println!("  {:#?}", extent);
    println!();
    println!("  Notation: {}", extent.to_notation().green());
    println!(
        "  Leaves:   {} (depth {})",
        extent.leaf_count().to_string().yellow(),
        extent.depth()
    );
}
