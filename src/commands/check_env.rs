use colored::Colorize;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use deploycfg::pipeline::Pipeline;
use deploycfg::report::{Defect, OutputFormat, VerificationReport, render_text};
use deploycfg::source::mask;

use super::{CommandContext, value_source};

#[derive(Serialize)]
struct ValueStatus {
    name: String,
    present: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    masked: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct CheckEnvReport<'a> {
    passed: bool,
    values: Vec<ValueStatus>,
    defects: &'a [Defect],
}

pub fn check_env_command(ctx: &CommandContext, vars: Vec<(String, String)>) -> Result<u8> {
    let loaded = ctx.load_config()?;
    let pipeline = Pipeline::new(&loaded.config, &ctx.root);

    let source = value_source(vars);
    let values = pipeline.read_values(&source);
    let validation = deploycfg::validation::validate(&values);

    let statuses: Vec<ValueStatus> = values
        .iter()
        .map(|value| ValueStatus {
            name: value.name.clone(),
            present: value.present(),
            masked: value.raw_value.as_deref().map(mask),
            error: value.source_error.as_ref().map(ToString::to_string),
        })
        .collect();

    let mut report = VerificationReport::new();
    report.extend(validation.defects.iter().cloned());

    match ctx.format {
        OutputFormat::Text => {
            for status in &statuses {
                match (&status.masked, &status.error) {
                    (Some(masked), _) => println!("  {} {}  {}", "✓".green(), status.name, masked),
                    (None, Some(error)) => println!("  {} {}  ({error})", "✗".red(), status.name),
                    (None, None) => println!("  {} {}  (not set)", "✗".red(), status.name),
                }
            }
            render_text(&report, &mut std::io::stdout().lock()).into_diagnostic()?;
        }
        OutputFormat::Json => {
            let json = CheckEnvReport {
                passed: report.passed(),
                values: statuses,
                defects: &report.defects,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&json).into_diagnostic()?
            );
        }
    }

    Ok(report.exit_code())
}
