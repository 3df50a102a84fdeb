//! `cmakegen build` command

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

use crate::cli::BuildArgs;
use crate::commands::project_root;
use cmakegen::builder::PipelineEvent;
use cmakegen::ops::{build, BuildOptions};
use cmakegen::util::shell::Status;
use cmakegen::util::{GlobalContext, Shell};

pub fn execute(args: BuildArgs, shell: &Arc<Shell>) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let root = project_root(&ctx, args.path.as_deref())?;
    let config = ctx.load_config(&root);

    let opts = BuildOptions {
        clean: args.clean,
        build_dir: args.build_dir,
    };
    let build_dir = opts.build_dir_for(&root);

    shell.event(&PipelineEvent::BuildStarted {
        source_dir: root.clone(),
        build_dir: build_dir.clone(),
        build_type: config.build_type().to_string(),
    });
    let span = shell.span(
        Status::Building,
        format!("{} ({})", root.display(), config.build_type()),
    );

    let start = Instant::now();
    let result = build(&root, &config, &opts);
    shell.event(&PipelineEvent::build_finished(
        result.is_ok(),
        start.elapsed().as_millis() as u64,
    ));

    let result = result?;
    span.finish_with_message(format!(
        "{} build ({})",
        result.build_type,
        result.build_dir.display()
    ));

    Ok(())
}
