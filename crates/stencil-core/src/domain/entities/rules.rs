//! Rename rules, removal sets and the relocation ledger.
//!
//! These are the concrete, fully-resolved instructions the application
//! services execute. Manifests produce them; nothing here touches the disk.

use std::path::{Path, PathBuf};

use super::common::RelativePath;

// ── Rename steps ─────────────────────────────────────────────────────────────

/// Replace every occurrence of `search_token` in a file, relocating the file
/// first when its path also contains the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementRule {
    pub file_path: RelativePath,
    pub search_token: String,
    pub replacement_token: String,
}

impl ReplacementRule {
    pub fn new(
        file_path: RelativePath,
        search_token: impl Into<String>,
        replacement_token: impl Into<String>,
    ) -> Self {
        Self {
            file_path,
            search_token: search_token.into(),
            replacement_token: replacement_token.into(),
        }
    }
}

/// One step of the Preparing phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameStep {
    Replace(ReplacementRule),
    /// Move a directory (or file) without touching its content.
    Move { from: RelativePath, to: RelativePath },
}

// ── Relocation ledger ────────────────────────────────────────────────────────

/// Ordered record of every move performed during a run.
///
/// Manifest paths are written against the template snapshot. Once a file or
/// directory has moved, later rules that name the old location are threaded
/// through this ledger to find the current one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelocationLedger {
    moves: Vec<(PathBuf, PathBuf)>,
}

impl RelocationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `from` now lives at `to`. No-op when they are equal.
    pub fn record(&mut self, from: impl Into<PathBuf>, to: impl Into<PathBuf>) {
        let (from, to) = (from.into(), to.into());
        if from != to {
            self.moves.push((from, to));
        }
    }

    /// Current location of a snapshot path.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        let mut current = path.to_path_buf();
        for (from, to) in &self.moves {
            if let Ok(rest) = current.strip_prefix(from) {
                current = if rest.as_os_str().is_empty() {
                    to.clone()
                } else {
                    to.join(rest)
                };
            }
        }
        current
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

// ── Removal set ──────────────────────────────────────────────────────────────

/// Drop every line of `path` that contains any of `needles`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFilter {
    pub path: PathBuf,
    pub needles: Vec<String>,
}

impl LineFilter {
    /// The removal predicate: `true` means the line goes.
    pub fn matches(&self, line: &str) -> bool {
        self.needles.iter().any(|needle| line.contains(needle.as_str()))
    }
}

/// Remove the first exact occurrence of each block from `path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRemoval {
    pub path: PathBuf,
    pub blocks: Vec<String>,
}

/// Everything the feature stripper deletes or edits, with paths resolved
/// against the project root.
///
/// Entries are independent: no entry depends on another succeeding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalSet {
    pub directories: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
    pub line_filters: Vec<LineFilter>,
    pub block_removals: Vec<BlockRemoval>,
}

impl RemovalSet {
    /// Number of filesystem entries that will be deleted.
    pub fn deletion_count(&self) -> usize {
        self.directories.len() + self.files.len()
    }

    /// Number of files that will be edited in place.
    pub fn edit_count(&self) -> usize {
        self.line_filters.len() + self.block_removals.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_resolves_moved_file() {
        let mut ledger = RelocationLedger::new();
        ledger.record("coreTemplate.sln", "Sample.sln");

        assert_eq!(ledger.resolve(Path::new("coreTemplate.sln")), PathBuf::from("Sample.sln"));
        assert_eq!(
            ledger.resolve(Path::new("coreTemplate.sln.DotSettings")),
            PathBuf::from("coreTemplate.sln.DotSettings")
        );
    }

    #[test]
    fn ledger_rebases_paths_under_moved_directory() {
        let mut ledger = RelocationLedger::new();
        ledger.record("src/starterProject", "src/sample");

        assert_eq!(
            ledger.resolve(Path::new("src/starterProject/WebAPI/appsettings.json")),
            PathBuf::from("src/sample/WebAPI/appsettings.json")
        );
        assert_eq!(
            ledger.resolve(Path::new("src/starterProjectExtras/x.cs")),
            PathBuf::from("src/starterProjectExtras/x.cs")
        );
    }

    #[test]
    fn ledger_chains_moves_in_order() {
        let mut ledger = RelocationLedger::new();
        ledger.record("a.txt", "b.txt");
        ledger.record("b.txt", "c.txt");
        ledger.record("same", "same");

        assert_eq!(ledger.resolve(Path::new("a.txt")), PathBuf::from("c.txt"));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn line_filter_matches_any_needle() {
        let filter = LineFilter {
            path: PathBuf::from("Startup.cs"),
            needles: vec!["AddUsersServices".into(), "DependencyResolvers".into()],
        };

        assert!(filter.matches("using Application.Tests.DependencyResolvers;"));
        assert!(filter.matches("    services.AddUsersServices();"));
        assert!(!filter.matches("namespace Application.Tests;"));
    }
}
