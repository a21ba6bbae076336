//! Implementation of the `stencil new` command.
//!
//! Responsibility: turn CLI arguments into a `ScaffoldRequest`, drive the
//! core pipeline, and display its progress. No business logic lives here.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use stencil_adapters::{GitCli, LocalFilesystem};
use stencil_core::{
    application::{CancellationToken, Filesystem, ScaffoldPipeline, ScaffoldPlan},
    domain::{ProjectName, RenameStep, ScaffoldRequest},
    error::StencilError,
};

use crate::{
    cli::{NewArgs, OutputFormat, global::GlobalArgs},
    commands::resolve_manifest,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `stencil new` command.
///
/// Dispatch sequence:
/// 1. Validate the project name and resolve the manifest
/// 2. Refuse an existing project directory
/// 3. Early-exit with the plan if `--dry-run`
/// 4. Confirm with the user when interactive
/// 5. Run the pipeline, rendering each event
/// 6. Print next-steps guidance
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Validate inputs
    let name = ProjectName::parse(&args.name).map_err(StencilError::from)?;
    let include_security = args.include_security(config.defaults.include_security);
    let manifest = resolve_manifest(args.template.as_deref(), args.manifest.as_deref())?;
    let workspace_dir = args.output.clone().unwrap_or_else(|| PathBuf::from("."));

    debug!(
        template = %manifest.id,
        include_security,
        workspace = %workspace_dir.display(),
        "Request resolved"
    );

    let filesystem = LocalFilesystem::new();
    let pipeline = ScaffoldPipeline::new(
        Box::new(filesystem),
        Box::new(GitCli::with_program(config.git.program.clone())),
        manifest,
    );
    let request = ScaffoldRequest::new(name, include_security);

    // 2. Existing directory
    let project_root = workspace_dir.join(request.project_name().as_str());
    if filesystem.exists(&project_root) {
        return Err(CliError::ProjectExists { path: project_root });
    }

    // 3. Dry run: describe but do not touch the disk.
    if args.dry_run {
        let plan = pipeline.plan(&request, &workspace_dir)?;
        return show_plan(&PlanView::new(&plan, include_security), &output);
    }

    // 4. Confirm
    if !args.yes && !global.quiet && output.format() == OutputFormat::Human {
        show_configuration(&request, &project_root, &output)?;
        if !confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    // 5. Run
    output.header(&format!("Creating '{}'...", request.project_name()))?;
    info!(path = %project_root.display(), "Scaffold started");

    let mut view = output.progress();
    for event in pipeline.run(request, &workspace_dir, CancellationToken::new()) {
        match event {
            Ok(event) => view.on_event(&event)?,
            Err(e) => {
                view.abandon();
                return Err(e.into());
            }
        }
    }

    info!("Scaffold completed");

    // 6. Next steps
    if output.format() != OutputFormat::Json && !global.quiet {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  cd {}", project_root.display()))?;
        output.print("  dotnet build")?;
    }

    Ok(())
}

// ── Dry run ──────────────────────────────────────────────────────────────────

/// Serializable description of a planned run.
#[derive(Debug, Serialize)]
struct PlanView {
    project_root: PathBuf,
    repository_url: String,
    branch: String,
    include_security: bool,
    rename_steps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    removals: Option<RemovalView>,
    advisories: Vec<String>,
}

#[derive(Debug, Serialize)]
struct RemovalView {
    deletions: usize,
    edits: usize,
    directories: Vec<PathBuf>,
    files: Vec<PathBuf>,
    line_filters: Vec<PathBuf>,
    block_removals: Vec<PathBuf>,
}

impl PlanView {
    fn new(plan: &ScaffoldPlan, include_security: bool) -> Self {
        Self {
            project_root: plan.project_root.clone(),
            repository_url: plan.repository_url.clone(),
            branch: format!("{} -> {}", plan.branch.from, plan.branch.to),
            include_security,
            rename_steps: plan.rename_steps.iter().map(describe_step).collect(),
            removals: plan.removal.as_ref().map(|set| RemovalView {
                deletions: set.deletion_count(),
                edits: set.edit_count(),
                directories: set.directories.clone(),
                files: set.files.clone(),
                line_filters: set.line_filters.iter().map(|f| f.path.clone()).collect(),
                block_removals: set.block_removals.iter().map(|b| b.path.clone()).collect(),
            }),
            advisories: plan.advisories.clone(),
        }
    }
}

fn describe_step(step: &RenameStep) -> String {
    match step {
        RenameStep::Replace(rule) => format!(
            "replace '{}' with '{}' in {}",
            rule.search_token, rule.replacement_token, rule.file_path
        ),
        RenameStep::Move { from, to } => format!("move {from} to {to}"),
    }
}

fn show_plan(plan: &PlanView, out: &OutputManager) -> CliResult<()> {
    if out.format() == OutputFormat::Json {
        out.json(plan)?;
        return Ok(());
    }

    out.info(&format!(
        "Dry run: would create {}",
        plan.project_root.display()
    ))?;
    out.print(&format!("  Template:  {}", plan.repository_url))?;
    out.print(&format!("  Branch:    {}", plan.branch))?;
    out.print("  Rename:")?;
    for step in &plan.rename_steps {
        out.print(&format!("    {step}"))?;
    }
    match &plan.removals {
        Some(removals) => {
            out.print(&format!(
                "  Security:  remove {} entries, edit {} files",
                removals.deletions, removals.edits
            ))?;
            if out.is_verbose() {
                for path in removals.directories.iter().chain(&removals.files) {
                    out.print(&format!("    - {}", path.display()))?;
                }
            }
        }
        None => out.print("  Security:  kept")?,
    }
    for advisory in &plan.advisories {
        out.warning(advisory)?;
    }
    Ok(())
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn show_configuration(
    request: &ScaffoldRequest,
    project_root: &Path,
    out: &OutputManager,
) -> CliResult<()> {
    let name = request.project_name();
    out.header("Configuration")?;
    out.print(&format!("  Project:   {name}"))?;
    out.print(&format!("  Solution:  {}", name.pascal_case()))?;
    out.print(&format!("  Namespace: {}", name.camel_case()))?;
    out.print(&format!(
        "  Security:  {}",
        if request.include_security() { "kept" } else { "removed" }
    ))?;
    out.print(&format!("  Location:  {}", project_root.display()))?;
    out.print("")?;
    Ok(())
}

#[cfg(feature = "interactive")]
fn confirm() -> CliResult<bool> {
    use std::io::IsTerminal;

    // Without a terminal there is nobody to ask.
    if !std::io::stdin().is_terminal() {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt("Continue?")
        .default(true)
        .interact()
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: std::io::Error::other(e),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm() -> CliResult<bool> {
    use std::io::{self, Write};

    print!("Continue? [Y/n] ");
    io::stdout().flush().map_err(|e| CliError::IoError {
        message: "failed to flush stdout".into(),
        source: e,
    })?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: e,
        })?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
