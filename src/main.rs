use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use deploycfg::report::OutputFormat;

mod commands;

use commands::{CommandContext, VarArgs};

#[derive(Parser)]
#[command(
    name = "deploycfg",
    about = "Generates and verifies deploy-time configuration for static web apps",
    version,
    author,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Deployment root containing the template, artifact and CI manifest
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    /// Pipeline configuration file (defaults to <root>/deploycfg.yml, then the built-in pipeline)
    #[arg(short, long, env = "DEPLOYCFG_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Enable verbose output (use -vv for debug output)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate values, generate the artifact and verify the tree (default command)
    Run(VarArgs),

    /// Validate values and generate the artifact
    Generate(VarArgs),

    /// Verify the deployment tree without generating anything
    Verify,

    /// Show which required values are set, masked
    CheckEnv {
        /// Override a value (NAME=VALUE), may be repeated
        #[arg(long = "var", value_parser = commands::parse_key_val)]
        vars: Vec<(String, String)>,
    },

    /// Write the default configuration and template into the root
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbose flag
    init_logging(cli.verbose);

    let ctx = CommandContext {
        root: cli.root,
        config: cli.config,
        format: cli.format,
    };

    let result = match cli.command {
        Some(Commands::Run(args)) => commands::run_command(&ctx, &args),
        Some(Commands::Generate(args)) => commands::generate_command(&ctx, &args),
        Some(Commands::Verify) => commands::verify_command(&ctx),
        Some(Commands::CheckEnv { vars }) => commands::check_env_command(&ctx, vars),
        Some(Commands::Init { force }) => commands::init_command(&ctx, force),
        // Default to the full run
        None => commands::run_command(&ctx, &VarArgs::default()),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(error) => {
            // Configuration and usage problems, as opposed to defects
            eprintln!("{error:?}");
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbose {
        0 => EnvFilter::new("deploycfg=warn"), // Default: warnings and errors only
        1 => EnvFilter::new("deploycfg=info"), // -v: info messages
        _ => EnvFilter::new("deploycfg=debug"), // -vv or more: full debug
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
