//! Feature removal: delete the files of an optional feature and cut its
//! registrations out of the files that remain.

use std::path::Path;
use tracing::{debug, instrument, warn};

use crate::{
    application::{ApplicationError, CancellationToken, ports::Filesystem},
    domain::{BlockRemoval, LineFilter, RemovalSet},
    error::StencilResult,
};

/// What a strip pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StripSummary {
    pub directories_removed: usize,
    pub files_removed: usize,
    pub lines_removed: usize,
    pub blocks_removed: usize,
}

/// Applies a [`RemovalSet`] through the filesystem port.
pub struct FeatureStripper<'a> {
    filesystem: &'a dyn Filesystem,
}

impl<'a> FeatureStripper<'a> {
    pub fn new(filesystem: &'a dyn Filesystem) -> Self {
        Self { filesystem }
    }

    /// Delete directories, then files, then apply line filters and block
    /// removals.
    ///
    /// A missing deletion target or a block that cannot be found is fatal.
    /// A file whose blocks are not all present is left untouched.
    #[instrument(
        skip_all,
        fields(
            deletions = set.deletion_count(),
            edits = set.edit_count()
        )
    )]
    pub fn strip_feature(
        &self,
        set: &RemovalSet,
        cancel: &CancellationToken,
    ) -> StencilResult<StripSummary> {
        let mut summary = StripSummary::default();

        for dir in &set.directories {
            cancel.check()?;
            self.require(dir)?;
            self.filesystem.remove_dir_all(dir)?;
            summary.directories_removed += 1;
        }

        for file in &set.files {
            cancel.check()?;
            self.require(file)?;
            self.filesystem.remove_file(file)?;
            summary.files_removed += 1;
        }

        for filter in &set.line_filters {
            cancel.check()?;
            summary.lines_removed += self.filter_lines(filter)?;
        }

        for removal in &set.block_removals {
            cancel.check()?;
            summary.blocks_removed += self.remove_blocks(removal)?;
        }

        debug!(?summary, "Feature stripped");
        Ok(summary)
    }

    fn require(&self, path: &Path) -> StencilResult<()> {
        if self.filesystem.exists(path) {
            Ok(())
        } else {
            Err(ApplicationError::io(path, "removal target does not exist").into())
        }
    }

    fn filter_lines(&self, filter: &LineFilter) -> StencilResult<usize> {
        let content = self.filesystem.read_to_string(&filter.path)?;
        let (filtered, removed) = filter_content(&content, |line| filter.matches(line));
        if removed > 0 {
            self.filesystem.write_file(&filter.path, &filtered)?;
        }
        debug!(path = %filter.path.display(), removed, "Filtered lines");
        Ok(removed)
    }

    fn remove_blocks(&self, removal: &BlockRemoval) -> StencilResult<usize> {
        let mut content = self.filesystem.read_to_string(&removal.path)?;
        let crlf = content.contains("\r\n");

        for block in &removal.blocks {
            let needle = normalize_newlines(block, crlf);
            let Some(start) = content.find(&needle) else {
                let first_line = block.lines().find(|l| !l.trim().is_empty()).unwrap_or_default();
                warn!(path = %removal.path.display(), block = %first_line, "Block not found");
                return Err(ApplicationError::io(
                    &removal.path,
                    format!("block not found: '{}'", first_line.trim()),
                )
                .into());
            };
            content.replace_range(start..start + needle.len(), "");
        }

        if !removal.blocks.is_empty() {
            self.filesystem.write_file(&removal.path, &content)?;
        }
        Ok(removal.blocks.len())
    }
}

/// Drop every line for which `remove` holds, keeping the newline style and
/// the trailing newline of the input.
fn filter_content(content: &str, remove: impl Fn(&str) -> bool) -> (String, usize) {
    let newline = if content.contains("\r\n") { "\r\n" } else { "\n" };
    let trailing = content.ends_with('\n');

    let mut kept = Vec::new();
    let mut removed = 0;
    for line in content.lines() {
        if remove(line) {
            removed += 1;
        } else {
            kept.push(line);
        }
    }

    let mut out = kept.join(newline);
    if trailing && !kept.is_empty() {
        out.push_str(newline);
    }
    (out, removed)
}

fn normalize_newlines(block: &str, crlf: bool) -> String {
    let lf = block.replace("\r\n", "\n");
    if crlf { lf.replace('\n', "\r\n") } else { lf }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockFilesystem;
    use crate::error::StencilError;
    use std::path::PathBuf;

    fn filter(needles: &[&str]) -> LineFilter {
        LineFilter {
            path: PathBuf::from("/p/Startup.cs"),
            needles: needles.iter().map(|n| n.to_string()).collect(),
        }
    }

    #[test]
    fn filter_content_preserves_lf_and_trailing_newline() {
        let input = "using A;\nusing Auth;\nclass X {}\n";
        let (out, removed) = filter_content(input, |l| l.contains("Auth"));
        assert_eq!(out, "using A;\nclass X {}\n");
        assert_eq!(removed, 1);
    }

    #[test]
    fn filter_content_preserves_crlf() {
        let input = "a\r\nb-auth\r\nc";
        let (out, _) = filter_content(input, |l| l.contains("auth"));
        assert_eq!(out, "a\r\nc");
    }

    #[test]
    fn filter_content_keeps_order_and_blank_lines() {
        let input = "one\n\ntwo\nthree\n";
        let (out, removed) = filter_content(input, |l| l == "two");
        assert_eq!(out, "one\n\nthree\n");
        assert_eq!(removed, 1);
    }

    #[test]
    fn normalize_newlines_translates_for_crlf_files() {
        assert_eq!(normalize_newlines("a\nb\n", true), "a\r\nb\r\n");
        assert_eq!(normalize_newlines("a\r\nb", false), "a\nb");
    }

    #[test]
    fn deletes_directories_before_files() {
        let mut seq = mockall::Sequence::new();
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(true);
        fs.expect_remove_dir_all()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        fs.expect_remove_file()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let set = RemovalSet {
            directories: vec![PathBuf::from("/p/Auth")],
            files: vec![PathBuf::from("/p/AuthController.cs")],
            ..Default::default()
        };
        let summary = FeatureStripper::new(&fs)
            .strip_feature(&set, &CancellationToken::new())
            .unwrap();

        assert_eq!(summary.directories_removed, 1);
        assert_eq!(summary.files_removed, 1);
    }

    #[test]
    fn missing_target_is_fatal() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_remove_file().never();

        let set = RemovalSet {
            files: vec![PathBuf::from("/p/Gone.cs")],
            ..Default::default()
        };
        let err = FeatureStripper::new(&fs)
            .strip_feature(&set, &CancellationToken::new())
            .unwrap_err();

        assert!(matches!(
            err,
            StencilError::Application(ApplicationError::Io { .. })
        ));
    }

    #[test]
    fn line_filter_rewrites_file() {
        let mut fs = MockFilesystem::new();
        fs.expect_read_to_string().returning(|_| {
            Ok("using Application.Tests.DependencyResolvers;\nnamespace Application.Tests;\n".into())
        });
        fs.expect_write_file()
            .withf(|_, content| content == "namespace Application.Tests;\n")
            .times(1)
            .returning(|_, _| Ok(()));

        let set = RemovalSet {
            line_filters: vec![filter(&["using Application.Tests.DependencyResolvers;"])],
            ..Default::default()
        };
        let summary = FeatureStripper::new(&fs)
            .strip_feature(&set, &CancellationToken::new())
            .unwrap();

        assert_eq!(summary.lines_removed, 1);
    }

    fn program_blocks(blocks: &[&str]) -> RemovalSet {
        RemovalSet {
            block_removals: vec![BlockRemoval {
                path: PathBuf::from("/p/Program.cs"),
                blocks: blocks.iter().map(|b| b.to_string()).collect(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn blocks_are_removed_from_crlf_files() {
        let mut fs = MockFilesystem::new();
        fs.expect_read_to_string().returning(|_| {
            Ok("builder.Services.AddSecurityServices();\r\napp.UseAuthentication();\r\napp.UseAuthorization();\r\napp.Run();\r\n".into())
        });
        fs.expect_write_file()
            .withf(|_, content| content == "app.Run();\r\n")
            .times(1)
            .returning(|_, _| Ok(()));

        let set = program_blocks(&[
            "app.UseAuthentication();\napp.UseAuthorization();\n",
            "builder.Services.AddSecurityServices();\n",
        ]);
        let summary = FeatureStripper::new(&fs)
            .strip_feature(&set, &CancellationToken::new())
            .unwrap();

        assert_eq!(summary.blocks_removed, 2);
    }

    #[test]
    fn missing_block_is_fatal_and_leaves_file_untouched() {
        let mut fs = MockFilesystem::new();
        fs.expect_read_to_string()
            .returning(|_| Ok("app.UseAuthorization();\napp.Run();\n".into()));
        fs.expect_write_file().never();

        let set = program_blocks(&[
            "app.UseAuthorization();\n",
            "builder.Services.AddSecurityServices();",
        ]);
        let err = FeatureStripper::new(&fs)
            .strip_feature(&set, &CancellationToken::new())
            .unwrap_err();

        assert!(matches!(
            err,
            StencilError::Application(ApplicationError::Io { ref path, ref reason })
                if path == Path::new("/p/Program.cs") && reason.contains("AddSecurityServices")
        ));
    }

    #[test]
    fn cancellation_stops_between_entries() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();

        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(true);
        fs.expect_remove_dir_all().times(1).returning(move |_| {
            trigger.cancel();
            Ok(())
        });
        fs.expect_remove_file().never();

        let set = RemovalSet {
            directories: vec![PathBuf::from("/p/Auth")],
            files: vec![PathBuf::from("/p/User.cs")],
            ..Default::default()
        };
        let err = FeatureStripper::new(&fs).strip_feature(&set, &cancel).unwrap_err();

        assert!(err.is_cancelled());
    }
}
