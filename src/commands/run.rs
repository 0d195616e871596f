use miette::Result;

use deploycfg::pipeline::Pipeline;

use super::{CommandContext, VarArgs};

pub fn run_command(ctx: &CommandContext, args: &VarArgs) -> Result<u8> {
    let loaded = ctx.load_config()?;
    let pipeline = Pipeline::new(&loaded.config, &ctx.root);

    let report = pipeline.run(&args.source());

    if let (Some(name), Some(artifact)) = (&args.github_output, &report.artifact) {
        ctx.write_github_output(name, &artifact.fingerprint)?;
    }
    ctx.emit(&report)
}
