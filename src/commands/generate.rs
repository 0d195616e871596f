use miette::Result;

use deploycfg::pipeline::Pipeline;

use super::{CommandContext, VarArgs};

pub fn generate_command(ctx: &CommandContext, args: &VarArgs) -> Result<u8> {
    let loaded = ctx.load_config()?;
    let pipeline = Pipeline::new(&loaded.config, &ctx.root);

    let report = pipeline.generate(&args.source());

    if let (Some(name), Some(artifact)) = (&args.github_output, &report.artifact) {
        ctx.write_github_output(name, &artifact.fingerprint)?;
    }
    ctx.emit(&report)
}
