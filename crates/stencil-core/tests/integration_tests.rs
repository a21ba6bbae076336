//! Integration tests for stencil-core's public API.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use stencil_core::{
    application::ApplicationError,
    domain::{FeatureRemovalSpec, LineFilterSpec, RenameStep},
    prelude::*,
};

/// Flat map of file path to content; directories are implied.
#[derive(Default)]
struct MapFilesystem(Mutex<BTreeMap<PathBuf, String>>);

impl MapFilesystem {
    fn with(files: &[(&str, &str)]) -> Self {
        let fs = Self::default();
        for (path, content) in files {
            fs.0.lock()
                .unwrap()
                .insert(PathBuf::from(path), content.to_string());
        }
        fs
    }
}

impl Filesystem for MapFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.0.lock().unwrap().keys().any(|p| p.starts_with(path))
    }

    fn read_to_string(&self, path: &Path) -> StencilResult<String> {
        self.0
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| ApplicationError::io(path, "not found").into())
    }

    fn write_file(&self, path: &Path, content: &str) -> StencilResult<()> {
        self.0
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> StencilResult<()> {
        let mut files = self.0.lock().unwrap();
        let moved: Vec<_> = files
            .keys()
            .filter(|p| p.starts_with(from))
            .cloned()
            .collect();
        for old in moved {
            let content = files.remove(&old).unwrap();
            let rest = old.strip_prefix(from).unwrap();
            let new = if rest.as_os_str().is_empty() {
                to.to_path_buf()
            } else {
                to.join(rest)
            };
            files.insert(new, content);
        }
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> StencilResult<()> {
        self.0.lock().unwrap().retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> StencilResult<()> {
        self.0.lock().unwrap().remove(path);
        Ok(())
    }

    fn list_files(&self, root: &Path) -> StencilResult<Vec<PathBuf>> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .keys()
            .filter(|p| p.starts_with(root))
            .cloned()
            .collect())
    }
}

struct NoopVcs;

impl VersionControl for NoopVcs {
    fn run(&self, _: &[&str], _: &Path, cancel: &CancellationToken) -> StencilResult<()> {
        cancel.check()?;
        Ok(())
    }
}

fn manifest() -> TemplateManifest {
    TemplateManifest::builder()
        .id(TemplateId::new("mini", "1.0.0").unwrap())
        .repository_url("https://example.com/mini.git")
        .replace("mini.sln", "mini", "{{PROJECT_NAME_PASCAL}}")
        .move_path("src/starter", "src/{{PROJECT_NAME_CAMEL}}")
        .replace("mini.sln", "starter", "{{PROJECT_NAME_CAMEL}}")
        .security(FeatureRemovalSpec {
            directories: vec!["src/starter/Auth".into()],
            line_filters: vec![LineFilterSpec {
                path: "src/starter/Startup.cs".into(),
                needles: vec!["AddAuth".into()],
            }],
            ..Default::default()
        })
        .build()
        .unwrap()
}

#[test]
fn full_run_over_public_api() {
    // The clone is simulated by pre-seeding the project tree.
    let fs = MapFilesystem::with(&[
        ("/ws/my-app/mini.sln", "mini -> src/starter/App.csproj"),
        ("/ws/my-app/src/starter/App.csproj", "<Project />"),
        ("/ws/my-app/src/starter/Auth/Login.cs", "class Login {}"),
        (
            "/ws/my-app/src/starter/Startup.cs",
            "services.AddAuth();\nservices.AddMvc();\n",
        ),
        ("/ws/my-app/.git/HEAD", "ref: refs/heads/master"),
    ]);
    let pipeline = ScaffoldPipeline::new(Box::new(fs), Box::new(NoopVcs), manifest());
    let request = ScaffoldRequest::new(ProjectName::parse("my-app").unwrap(), false);

    let mut phases = Vec::new();
    let terminal = pipeline
        .execute(request, "/ws", CancellationToken::new(), |e| {
            phases.push(e.phase)
        })
        .unwrap();

    assert_eq!(
        phases,
        vec![
            Phase::Cloning,
            Phase::Preparing,
            Phase::Stripping,
            Phase::GitInit,
            Phase::Completed
        ]
    );
    assert_eq!(
        terminal.generated_file_paths.unwrap(),
        vec![
            PathBuf::from("/ws/my-app/MyApp.sln"),
            PathBuf::from("/ws/my-app/src/myApp/App.csproj"),
            PathBuf::from("/ws/my-app/src/myApp/Startup.cs"),
        ]
    );
}

#[test]
fn plan_lists_rename_steps_in_order() {
    let pipeline = ScaffoldPipeline::new(
        Box::new(MapFilesystem::default()),
        Box::new(NoopVcs),
        manifest(),
    );
    let request = ScaffoldRequest::new(ProjectName::parse("shop").unwrap(), true);
    let plan = pipeline.plan(&request, "/ws").unwrap();

    assert_eq!(plan.rename_steps.len(), 3);
    assert!(matches!(plan.rename_steps[1], RenameStep::Move { .. }));
    assert_eq!(plan.repository_url, "https://example.com/mini.git");
    assert!(plan.removal.is_none());
}

#[test]
fn invalid_names_never_reach_the_pipeline() {
    let err = ProjectName::parse("../escape").unwrap_err();
    let err: StencilError = err.into();
    assert_eq!(err.category(), stencil_core::error::ErrorCategory::Validation);
}
