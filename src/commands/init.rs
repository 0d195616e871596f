use miette::{IntoDiagnostic, Result, WrapErr};
use std::path::Path;

use deploycfg::defaults::{CONFIG_FILE_NAME, DEFAULT_PIPELINE, DEFAULT_PIPELINE_YAML, DEFAULT_TEMPLATE};
use deploycfg::generator::write_atomic;

use super::CommandContext;

pub fn init_command(ctx: &CommandContext, force: bool) -> Result<u8> {
    println!("Initializing deploycfg in: {}", ctx.root.display());

    let config_path = ctx
        .config
        .clone()
        .unwrap_or_else(|| ctx.root.join(CONFIG_FILE_NAME));
    write_if_absent(&config_path, DEFAULT_PIPELINE_YAML, force)?;
    write_if_absent(&ctx.root.join(&DEFAULT_PIPELINE.template), DEFAULT_TEMPLATE, force)?;

    Ok(0)
}

fn write_if_absent(path: &Path, content: &str, force: bool) -> Result<()> {
    if path.exists() && !force {
        println!("  skipped {} (already exists, use --force to overwrite)", path.display());
        return Ok(());
    }

    write_atomic(path, content)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
    println!("  wrote {}", path.display());
    Ok(())
}
