//! Scaffold Pipeline - main application orchestrator.
//!
//! This service coordinates the entire scaffolding workflow:
//! 1. Clone the template repository
//! 2. Rename the project (rename steps of the manifest)
//! 3. Optionally strip the security feature
//! 4. Reset version control history
//!
//! Progress is pulled: [`ScaffoldPipeline::run`] returns a [`ScaffoldRun`]
//! iterator. Every phase is announced before its work runs, and the outcome
//! of a phase travels on the event that announces the next one.

use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use crate::{
    application::{
        CancellationToken,
        ports::{Filesystem, VersionControl},
        services::{FeatureStripper, TextRelocator},
    },
    domain::{
        BranchRename, Phase, ProgressEvent, RelocationLedger, RemovalSet, RenameStep,
        RenderContext, ScaffoldRequest, TemplateManifest,
    },
    error::{StencilError, StencilResult},
};

/// Everything a run would do, computed without touching the disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldPlan {
    pub project_root: PathBuf,
    pub repository_url: String,
    pub branch: BranchRename,
    pub rename_steps: Vec<RenameStep>,
    /// `None` when the security feature is kept.
    pub removal: Option<RemovalSet>,
    pub advisories: Vec<String>,
}

/// Main scaffolding service.
pub struct ScaffoldPipeline {
    filesystem: Box<dyn Filesystem>,
    vcs: Box<dyn VersionControl>,
    manifest: TemplateManifest,
}

impl ScaffoldPipeline {
    /// Create a new pipeline with the given adapters and template manifest.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use stencil_core::application::ScaffoldPipeline;
    ///
    /// let pipeline = ScaffoldPipeline::new(
    ///     filesystem, // impl Filesystem
    ///     vcs,        // impl VersionControl
    ///     manifest,   // TemplateManifest
    /// );
    /// ```
    pub fn new(
        filesystem: Box<dyn Filesystem>,
        vcs: Box<dyn VersionControl>,
        manifest: TemplateManifest,
    ) -> Self {
        Self {
            filesystem,
            vcs,
            manifest,
        }
    }

    pub fn manifest(&self) -> &TemplateManifest {
        &self.manifest
    }

    /// Start a run. Nothing happens until the returned iterator is polled.
    pub fn run(
        &self,
        request: ScaffoldRequest,
        workspace_dir: impl Into<PathBuf>,
        cancel: CancellationToken,
    ) -> ScaffoldRun<'_> {
        let workspace_dir = workspace_dir.into();
        let project_root = workspace_dir.join(request.project_name().as_str());
        let context = RenderContext::new(request.project_name());

        ScaffoldRun {
            pipeline: self,
            request,
            context,
            workspace_dir,
            project_root,
            cancel,
            ledger: RelocationLedger::new(),
            generated: Vec::new(),
            state: RunState::Pending,
        }
    }

    /// Drive a run to completion, handing every event to `on_event`.
    ///
    /// Returns the terminal event.
    pub fn execute(
        &self,
        request: ScaffoldRequest,
        workspace_dir: impl Into<PathBuf>,
        cancel: CancellationToken,
        mut on_event: impl FnMut(&ProgressEvent),
    ) -> StencilResult<ProgressEvent> {
        let mut last = None;
        for event in self.run(request, workspace_dir, cancel) {
            let event = event?;
            on_event(&event);
            last = Some(event);
        }
        last.ok_or_else(|| StencilError::Internal {
            message: "scaffold run produced no events".into(),
        })
    }

    /// Compute what a run would do without cloning anything.
    ///
    /// Relocations are predicted from the rename steps, so removal paths are
    /// reported where they will be after Preparing.
    pub fn plan(
        &self,
        request: &ScaffoldRequest,
        workspace_dir: impl AsRef<Path>,
    ) -> StencilResult<ScaffoldPlan> {
        let project_root = workspace_dir
            .as_ref()
            .join(request.project_name().as_str());
        let context = RenderContext::new(request.project_name());
        let rename_steps = self.manifest.rename_steps(&context)?;

        let removal = if request.include_security() {
            None
        } else {
            let mut ledger = RelocationLedger::new();
            for step in &rename_steps {
                match step {
                    RenameStep::Replace(rule) => {
                        let current = ledger.resolve(rule.file_path.as_path());
                        let rendered = current.to_string_lossy();
                        if rendered.contains(rule.search_token.as_str()) {
                            let moved = rendered
                                .replace(rule.search_token.as_str(), &rule.replacement_token);
                            ledger.record(current.clone(), moved);
                        }
                    }
                    RenameStep::Move { from, to } => {
                        let current = ledger.resolve(from.as_path());
                        ledger.record(current, to.as_path());
                    }
                }
            }
            Some(
                self.manifest
                    .removal_set(&context, &project_root, &ledger)?,
            )
        };

        Ok(ScaffoldPlan {
            project_root,
            repository_url: self.manifest.repository_url.clone(),
            branch: self.manifest.branch.clone(),
            rename_steps,
            removal,
            advisories: self.manifest.advisories(&context),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Pending,
    Announced(Phase),
    Finished,
}

/// A single scaffold run, consumed by iteration.
///
/// Yields `Cloning, Preparing, [Stripping], GitInit, Completed`. The first
/// error (including cancellation) is yielded once and ends the stream.
pub struct ScaffoldRun<'a> {
    pipeline: &'a ScaffoldPipeline,
    request: ScaffoldRequest,
    context: RenderContext,
    workspace_dir: PathBuf,
    project_root: PathBuf,
    cancel: CancellationToken,
    ledger: RelocationLedger,
    generated: Vec<PathBuf>,
    state: RunState,
}

impl ScaffoldRun<'_> {
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    fn strips_security(&self) -> bool {
        !self.request.include_security()
    }

    /// Run the work of `phase` and build the event announcing its successor.
    fn advance(&mut self, phase: Phase) -> StencilResult<Option<ProgressEvent>> {
        let Some(next) = phase.next(self.strips_security()) else {
            return Ok(None);
        };

        self.cancel.check()?;
        let outcome = match phase {
            Phase::Cloning => self.clone_template()?,
            Phase::Preparing => self.prepare()?,
            Phase::Stripping => self.strip()?,
            Phase::GitInit => self.init_repository()?,
            Phase::Completed => return Ok(None),
        };
        self.cancel.check()?;

        if next == Phase::GitInit {
            self.reset_history()?;
        }

        let mut event = ProgressEvent::started(next, Some(outcome));
        if next == Phase::Completed {
            event.output_messages = self.pipeline.manifest.advisories(&self.context);
            event.generated_file_paths = Some(std::mem::take(&mut self.generated));
        }
        Ok(Some(event))
    }

    #[instrument(skip_all, fields(project = %self.request.project_name()))]
    fn clone_template(&mut self) -> StencilResult<String> {
        let url = self.pipeline.manifest.repository_url.as_str();
        self.pipeline.vcs.run(
            &["clone", "--", url, self.request.project_name().as_str()],
            &self.workspace_dir,
            &self.cancel,
        )?;
        info!(url, "Template cloned");
        Ok(format!("Starter project has been cloned from '{url}'."))
    }

    #[instrument(skip_all, fields(project = %self.request.project_name()))]
    fn prepare(&mut self) -> StencilResult<String> {
        let steps = self.pipeline.manifest.rename_steps(&self.context)?;
        let relocator = TextRelocator::new(self.pipeline.filesystem.as_ref(), &self.project_root);

        for step in &steps {
            self.cancel.check()?;
            match step {
                RenameStep::Replace(rule) => {
                    let current = self.ledger.resolve(rule.file_path.as_path());
                    let moved = relocator.relocate_and_replace(
                        &current,
                        &rule.search_token,
                        &rule.replacement_token,
                    )?;
                    self.ledger.record(current, moved);
                }
                RenameStep::Move { from, to } => {
                    let current = self.ledger.resolve(from.as_path());
                    relocator.relocate(&current, to.as_path())?;
                    self.ledger.record(current, to.as_path());
                }
            }
        }

        let pascal = self.context.project_name().pascal_case();
        info!(steps = steps.len(), relocations = self.ledger.len(), "Project prepared");
        Ok(format!("Project has been prepared with {pascal}."))
    }

    #[instrument(skip_all, fields(project = %self.request.project_name()))]
    fn strip(&mut self) -> StencilResult<String> {
        let set = self.pipeline.manifest.removal_set(
            &self.context,
            &self.project_root,
            &self.ledger,
        )?;
        let summary =
            FeatureStripper::new(self.pipeline.filesystem.as_ref()).strip_feature(&set, &self.cancel)?;
        info!(
            removed = summary.directories_removed + summary.files_removed,
            lines = summary.lines_removed,
            blocks = summary.blocks_removed,
            "Security feature removed"
        );
        Ok("Security mechanism has been removed.".to_string())
    }

    /// Drop the template's history and record the files of the new project.
    fn reset_history(&mut self) -> StencilResult<()> {
        let git_dir = self.project_root.join(".git");
        if self.pipeline.filesystem.exists(&git_dir) {
            self.pipeline.filesystem.remove_dir_all(&git_dir)?;
        }
        self.generated = self.pipeline.filesystem.list_files(&self.project_root)?;
        Ok(())
    }

    #[instrument(skip_all, fields(project = %self.request.project_name()))]
    fn init_repository(&mut self) -> StencilResult<String> {
        let BranchRename { from, to } = &self.pipeline.manifest.branch;
        let default_branch = format!("init.defaultBranch={from}");
        let vcs = self.pipeline.vcs.as_ref();

        vcs.run(
            &["-c", default_branch.as_str(), "init"],
            &self.project_root,
            &self.cancel,
        )?;
        self.cancel.check()?;
        vcs.run(
            &["branch", "-m", from.as_str(), to.as_str()],
            &self.project_root,
            &self.cancel,
        )?;

        info!(branch = %to, "Repository initialized");
        Ok("Git repository has been initialized.".to_string())
    }
}

impl Iterator for ScaffoldRun<'_> {
    type Item = StencilResult<ProgressEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = match self.state {
            RunState::Finished => return None,
            RunState::Pending => self
                .cancel
                .check()
                .map(|()| Some(ProgressEvent::started(Phase::Cloning, None)))
                .map_err(StencilError::from),
            RunState::Announced(phase) => self.advance(phase),
        };

        match result {
            Ok(Some(event)) => {
                self.state = RunState::Announced(event.phase);
                Some(Ok(event))
            }
            Ok(None) => {
                self.state = RunState::Finished;
                None
            }
            Err(e) => {
                warn!(error = %e, "Scaffold run stopped");
                self.state = RunState::Finished;
                Some(Err(e))
            }
        }
    }
}
