use std::{
    env, fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use super::{BuildSummary, CommandResult, CommandSummary, helper::finish};
use crate::{
    cli::args::BuildCommand,
    config::{Config, load_config},
    core::{BuildContext, paths::lexical_normalize, root_node, to_pretty_json},
};

/// Resolve `path` against `base` unless it is already absolute.
fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        PathBuf::from(lexical_normalize(&base.join(path)))
    }
}

/// Load the config and apply CLI overrides (CLI > config file > defaults).
///
/// Returns the config together with the resolved source root and output file.
fn merged_config(cmd: &BuildCommand) -> Result<(Config, PathBuf, PathBuf)> {
    let args = &cmd.args;
    let cwd = env::current_dir().context("Failed to read the current directory.")?;

    let config_result = load_config(&cwd)?;
    if !config_result.from_file {
        debug!("no config file found, using default configuration");
    }
    let mut config = config_result.config;
    let base_dir = config_result.base_dir;

    if let Some(app) = &args.app {
        config.app = app.clone();
    }
    if args.prune_leaves {
        config.prune_leaves = true;
    }
    config.validate()?;

    let source_root = match &args.common.source_root {
        Some(root) => resolve(&cwd, root),
        None => resolve(&base_dir, Path::new(&config.source_root)),
    };
    let output_file = match &args.output_dir {
        Some(dir) => resolve(&cwd, dir).join(format!("{}-data.json", config.app)),
        None => resolve(&base_dir, &config.output_file()),
    };

    Ok((config, source_root, output_file))
}

pub fn build(cmd: BuildCommand) -> Result<CommandResult> {
    let (config, source_root, output_file) = merged_config(&cmd)?;

    if !source_root.is_dir() {
        bail!("Source root is not a directory: {}", source_root.display());
    }

    let ctx = BuildContext::new(config, source_root);
    let output = ctx.run();

    let document = to_pretty_json(&root_node(&output.forest, ctx.config.prune_leaves))?;

    let written = if cmd.args.stdout {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", document).context("Failed to write to stdout.")?;
        None
    } else {
        write_document(&output_file, &document)?;
        info!(file = %output_file.display(), "tree written");
        Some(output_file)
    };

    Ok(finish(
        CommandSummary::Build(BuildSummary {
            component_count: output.registry.len(),
            declaration_files: ctx.declaration_files.len(),
            markup_files: ctx.markup_files.len(),
            output_file: written,
        }),
        output.issues,
    ))
}

fn write_document(path: &Path, document: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, document).with_context(|| format!("Failed to write file: {}", path.display()))
}
