mod check_env;
mod generate;
mod init;
mod run;
mod verify;

pub use check_env::check_env_command;
pub use generate::generate_command;
pub use init::init_command;
pub use run::run_command;
pub use verify::verify_command;

use clap::Args;
use miette::{IntoDiagnostic, Result, WrapErr};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use deploycfg::loader::{ConfigLoader, ConfigOrigin, LoadedConfig};
use deploycfg::report::{OutputFormat, VerificationReport, render_json, render_text};
use deploycfg::source::{LayeredSource, MapSource, ProcessEnv};

/// Global options shared by every subcommand
pub struct CommandContext {
    pub root: PathBuf,
    pub config: Option<PathBuf>,
    pub format: OutputFormat,
}

impl CommandContext {
    pub fn load_config(&self) -> Result<LoadedConfig> {
        let mut loader = ConfigLoader::new(&self.root);
        if let Some(path) = &self.config {
            loader = loader.with_config_file(path);
        }
        let loaded = loader.load()?;

        if self.format == OutputFormat::Text {
            let origin = match &loaded.origin {
                ConfigOrigin::File(path) => path.display().to_string(),
                ConfigOrigin::BuiltIn => "built-in".to_string(),
            };
            println!(
                "Pipeline '{}' in {} (config: {origin})",
                loaded.config.name,
                self.root.display()
            );
        }
        Ok(loaded)
    }

    /// Print the report and map it to the process exit status
    pub fn emit(&self, report: &VerificationReport) -> Result<u8> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let written = match self.format {
            OutputFormat::Text => render_text(report, &mut out),
            OutputFormat::Json => render_json(report, &mut out),
        };
        written.into_diagnostic().wrap_err("Failed to write report")?;
        Ok(report.exit_code())
    }

    /// Append `name=value` to `$GITHUB_OUTPUT`. Outside Actions the line is
    /// printed instead, on stderr when stdout carries the JSON report.
    pub fn write_github_output(&self, name: &str, value: &str) -> Result<()> {
        if let Ok(path) = std::env::var("GITHUB_OUTPUT") {
            let mut file = File::options()
                .create(true)
                .append(true)
                .open(&path)
                .into_diagnostic()
                .wrap_err_with(|| format!("Failed to open $GITHUB_OUTPUT file {path}"))?;
            writeln!(file, "{name}={value}").into_diagnostic()?;
        } else if self.format == OutputFormat::Json {
            eprintln!("{name}={value}");
        } else {
            println!("{name}={value}");
        }
        Ok(())
    }
}

#[derive(Debug, Default, Args)]
pub struct VarArgs {
    /// Override a value (NAME=VALUE), may be repeated
    #[arg(long = "var", value_parser = parse_key_val)]
    pub vars: Vec<(String, String)>,

    /// Append the artifact fingerprint as <NAME>=<fingerprint> to $GITHUB_OUTPUT
    #[arg(long = "github-output", value_name = "NAME")]
    pub github_output: Option<String>,
}

impl VarArgs {
    pub fn source(&self) -> LayeredSource<ProcessEnv> {
        value_source(self.vars.iter().cloned())
    }
}

pub fn value_source(vars: impl IntoIterator<Item = (String, String)>) -> LayeredSource<ProcessEnv> {
    LayeredSource::new(vars.into_iter().collect::<MapSource>(), ProcessEnv)
}

/// Parse a `NAME=VALUE` pair
pub fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid NAME=VALUE: no `=` found in `{s}`"))?;
    if name.is_empty() {
        return Err(format!("invalid NAME=VALUE: empty name in `{s}`"));
    }
    Ok((name.to_string(), value.to_string()))
}
