// src/pipeline.rs

//! The standard build pipeline: target declarations and their actions.
//!
//! This is the client side of the graph engine. Targets call the
//! toolchain through [`ProcessRunner`]; the engine decides what runs and
//! in which order.
//!
//! The shape of the pipeline:
//!
//! ```text
//! restore <-dep- compile <-dep- pack <-dep- install
//!                                    <-dep- update
//! clean             -before-> restore
//! pull              -before-> restore, set-runtime-paths
//! pull              -dependent_for-> update
//! set-runtime-paths -dependent_for-> pack
//! ```

use std::fs;
use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, info};

use crate::config::BuildContext;
use crate::errors::{BuildError, Result};
use crate::gitsync::BranchSync;
use crate::graph::{GraphBuilder, TargetGraph};
use crate::probe::record_runtime_paths;
use crate::settings::SettingsFile;

/// Target run when the CLI gets no explicit target name.
pub const DEFAULT_TARGET: &str = "compile";

/// Declare the standard target set.
pub fn standard_graph() -> Result<TargetGraph> {
    let mut b = GraphBuilder::new();

    b.target("clean").before(["restore"]).executes(clean);
    b.target("restore").executes(restore);
    b.target("compile").depends_on(["restore"]).executes(compile);
    b.target("pack").depends_on(["compile"]).executes(pack);
    b.target("install").depends_on(["pack"]).executes(install);
    b.target("update").depends_on(["pack"]).executes(update);
    b.target("set-runtime-paths")
        .dependent_for(["pack"])
        .executes(set_runtime_paths);
    b.target("pull")
        .dependent_for(["update"])
        .before(["restore", "set-runtime-paths"])
        .executes(pull);

    b.build()
}

/// Delete `**/bin` and `**/obj` under the source directory and reset the
/// output directory.
fn clean(ctx: &BuildContext) -> Result<()> {
    let matcher = build_dir_matcher()?;
    if ctx.config.source_dir.is_dir() {
        remove_matching_dirs(&ctx.config.source_dir, &ctx.config.source_dir, &matcher)?;
    }

    let output = &ctx.config.output_dir;
    if output.exists() {
        fs::remove_dir_all(output)?;
    }
    fs::create_dir_all(output)?;
    info!(output = %output.display(), "cleaned output directory");
    Ok(())
}

fn build_dir_matcher() -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in ["**/bin", "**/obj"] {
        let glob = Glob::new(pattern)
            .map_err(|e| BuildError::ConfigError(format!("bad clean pattern '{pattern}': {e}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| BuildError::ConfigError(format!("building clean matcher: {e}")))
}

fn remove_matching_dirs(root: &Path, dir: &Path, matcher: &GlobSet) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(&path);
        if matcher.is_match(relative) {
            debug!(dir = %path.display(), "removing build directory");
            fs::remove_dir_all(&path)?;
        } else {
            remove_matching_dirs(root, &path, matcher)?;
        }
    }
    Ok(())
}

fn restore(ctx: &BuildContext) -> Result<()> {
    let mut args = vec!["restore".to_string()];
    if let Some(solution) = &ctx.config.solution {
        args.push(solution.display().to_string());
    }
    dotnet(ctx, &args)
}

fn compile(ctx: &BuildContext) -> Result<()> {
    let mut args = vec!["build".to_string()];
    if let Some(solution) = &ctx.config.solution {
        args.push(solution.display().to_string());
    }
    args.extend([
        "-c".to_string(),
        ctx.config.configuration.to_string(),
        "--no-restore".to_string(),
    ]);
    dotnet(ctx, &args)
}

fn pack(ctx: &BuildContext) -> Result<()> {
    let mut args = vec!["pack".to_string()];
    if let Some(project) = &ctx.config.pack_project {
        args.push(project.display().to_string());
    }
    args.extend([
        "-c".to_string(),
        ctx.config.configuration.to_string(),
        "--no-build".to_string(),
        "--no-restore".to_string(),
        "-o".to_string(),
        ctx.config.output_dir.display().to_string(),
    ]);
    dotnet(ctx, &args)
}

fn install(ctx: &BuildContext) -> Result<()> {
    dotnet(ctx, &tool_args(ctx, "install"))
}

fn update(ctx: &BuildContext) -> Result<()> {
    dotnet(ctx, &tool_args(ctx, "update"))
}

fn tool_args(ctx: &BuildContext, verb: &str) -> Vec<String> {
    vec![
        "tool".to_string(),
        verb.to_string(),
        "--global".to_string(),
        ctx.config.package_id.clone(),
        "--add-source".to_string(),
        ctx.config.output_dir.display().to_string(),
    ]
}

/// Probe installed runtimes and persist their paths into the settings
/// document.
fn set_runtime_paths(ctx: &BuildContext) -> Result<()> {
    let mut settings = SettingsFile::load(&ctx.config.settings_path)?;
    record_runtime_paths(ctx.runner.as_ref(), &mut settings)?;
    settings.save()
}

/// Merge mainline into the working branch before anything restores or
/// probes.
fn pull(ctx: &BuildContext) -> Result<()> {
    BranchSync::new(
        ctx.runner.as_ref(),
        &ctx.config.mainline_branch,
        &ctx.config.settings_path,
    )
    .sync()
}

fn dotnet(ctx: &BuildContext, args: &[String]) -> Result<()> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    ctx.runner.run("dotnet", &args)?;
    Ok(())
}
