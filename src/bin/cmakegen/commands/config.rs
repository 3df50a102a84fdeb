//! `cmakegen config` command

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use crate::cli::{ConfigArgs, ConfigCommands, ConfigInitArgs, ConfigSetArgs, ConfigShowArgs};
use crate::commands::project_root;
use cmakegen::util::config::{project_config_path, set_config_value, Config};
use cmakegen::util::shell::Status;
use cmakegen::util::{GlobalContext, Shell};

pub fn execute(args: ConfigArgs, shell: &Arc<Shell>) -> Result<()> {
    let ctx = GlobalContext::new()?;

    match args.command {
        ConfigCommands::Show(args) => show(&ctx, shell, args),
        ConfigCommands::Init(args) => init(&ctx, shell, args),
        ConfigCommands::Set(args) => set(&ctx, shell, args),
        ConfigCommands::Path => path(&ctx, shell),
    }
}

fn global_path(ctx: &GlobalContext) -> Result<PathBuf> {
    ctx.config_path()
        .context("could not determine the home directory for the global config")
}

fn show(ctx: &GlobalContext, shell: &Shell, args: ConfigShowArgs) -> Result<()> {
    let root = project_root(ctx, args.path.as_deref())?;
    let config = ctx.load_config(&root);

    if shell.is_json() {
        shell.print_json(&config);
        return Ok(());
    }

    // fill in the defaults so the output shows what generation will use
    let mut effective = Config::with_defaults();
    effective.merge(config);
    let text = toml::to_string_pretty(&effective).context("failed to serialize config")?;
    print!("{}", text);
    Ok(())
}

fn init(ctx: &GlobalContext, shell: &Shell, args: ConfigInitArgs) -> Result<()> {
    let path = global_path(ctx)?;
    if path.exists() && !args.force {
        bail!(
            "config file already exists: {}\nuse `--force` to overwrite it",
            path.display()
        );
    }

    Config::with_defaults().save(&path)?;
    shell.status(Status::Created, path.display());
    Ok(())
}

fn set(ctx: &GlobalContext, shell: &Shell, args: ConfigSetArgs) -> Result<()> {
    let path = match &args.project {
        Some(dir) => project_config_path(&project_root(ctx, Some(dir))?),
        None => global_path(ctx)?,
    };

    set_config_value(&path, &args.key, &args.value)?;
    shell.status(
        Status::Info,
        format!("set {} = {} in {}", args.key, args.value, path.display()),
    );
    Ok(())
}

fn path(ctx: &GlobalContext, shell: &Shell) -> Result<()> {
    let global = ctx.config_path();
    let project = project_config_path(ctx.cwd());

    if shell.is_json() {
        shell.print_json(&serde_json::json!({
            "global": global,
            "project": project,
        }));
        return Ok(());
    }

    match global {
        Some(global) => println!("global:  {}", global.display()),
        None => println!("global:  (no home directory)"),
    }
    println!("project: {}", project.display());
    Ok(())
}
