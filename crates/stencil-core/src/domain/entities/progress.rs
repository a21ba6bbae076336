use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Phases of a scaffold run, in the only order they can occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Cloning,
    Preparing,
    Stripping,
    GitInit,
    Completed,
}

impl Phase {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cloning => "cloning",
            Self::Preparing => "preparing",
            Self::Stripping => "stripping",
            Self::GitInit => "git-init",
            Self::Completed => "completed",
        }
    }

    /// Label shown when the phase starts.
    pub const fn status_message(&self) -> &'static str {
        match self {
            Self::Cloning => "Cloning starter project and core packages...",
            Self::Preparing => "Preparing project...",
            Self::Stripping => "Removing security mechanism...",
            Self::GitInit => "Initializing git repository...",
            Self::Completed => "Completed.",
        }
    }

    /// The phase announced after this one, or `None` after `Completed`.
    pub const fn next(self, strip_security: bool) -> Option<Self> {
        match self {
            Self::Cloning => Some(Self::Preparing),
            Self::Preparing if strip_security => Some(Self::Stripping),
            Self::Preparing | Self::Stripping => Some(Self::GitInit),
            Self::GitInit => Some(Self::Completed),
            Self::Completed => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot reported to the caller when a phase starts.
///
/// `last_operation_message` describes what the previous phase accomplished.
/// `output_messages` and `generated_file_paths` are only filled on the
/// terminal event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    pub phase: Phase,
    pub status_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_operation_message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub output_messages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_file_paths: Option<Vec<PathBuf>>,
}

impl ProgressEvent {
    pub fn started(phase: Phase, last_operation_message: Option<String>) -> Self {
        Self {
            phase,
            status_message: phase.status_message().to_string(),
            last_operation_message,
            output_messages: Vec::new(),
            generated_file_paths: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.phase == Phase::Completed
    }
}
