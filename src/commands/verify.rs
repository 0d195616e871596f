use miette::Result;

use deploycfg::pipeline::Pipeline;

use super::CommandContext;

pub fn verify_command(ctx: &CommandContext) -> Result<u8> {
    let loaded = ctx.load_config()?;
    let report = Pipeline::new(&loaded.config, &ctx.root).verify();
    ctx.emit(&report)
}
