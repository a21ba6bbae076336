//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "stencil",
    bin_name = "stencil",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Create a new project from the core template",
    long_about = "Stencil clones the core template repository, renames it after \
                  your project, optionally strips its security feature and \
                  starts a fresh git history.",
    after_help = "EXAMPLES:\n\
        \x20 stencil new shop\n\
        \x20 stencil new inventory-api --without-security\n\
        \x20 stencil new shop --dry-run --output-format json\n\
        \x20 stencil completions bash > /usr/share/bash-completion/completions/stencil",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project from the template.
    #[command(
        visible_alias = "n",
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 stencil new shop\n\
            \x20 stencil new shop --without-security --yes\n\
            \x20 stencil new shop --manifest ./my-template.toml --output ../work"
    )]
    New(NewArgs),

    /// Show the template manifest.
    #[command(
        visible_alias = "t",
        about = "Show template details",
        after_help = "EXAMPLES:\n\
            \x20 stencil template\n\
            \x20 stencil template --manifest ./my-template.toml\n\
            \x20 stencil --output-format json template"
    )]
    Template(TemplateArgs),

    /// Initialise a Stencil configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 stencil init           # default location\n\
            \x20 stencil init --local   # .stencil.toml in the current directory\n\
            \x20 stencil init --force   # overwrite an existing file"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 stencil completions bash > ~/.local/share/bash-completion/completions/stencil\n\
            \x20 stencil completions zsh  > ~/.zfunc/_stencil\n\
            \x20 stencil completions fish > ~/.config/fish/completions/stencil.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Stencil configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 stencil config get defaults.include_security\n\
            \x20 stencil config list\n\
            \x20 stencil config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `stencil new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project name. Becomes the directory name; PascalCase and camelCase
    /// forms are derived from it.
    #[arg(value_name = "NAME", help = "Project name")]
    pub name: String,

    /// Remove the authentication and authorization feature.
    #[arg(
        long = "without-security",
        conflicts_with = "with_security",
        help = "Remove the security feature from the generated project"
    )]
    pub without_security: bool,

    /// Keep the security feature even if the configuration says otherwise.
    #[arg(
        long = "with-security",
        help = "Keep the security feature (overrides configuration)"
    )]
    pub with_security: bool,

    /// Directory the project is created in.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Parent directory for the project (default: current directory)"
    )]
    pub output: Option<PathBuf>,

    /// Use a manifest file instead of the built-in template.
    #[arg(
        short = 'm',
        long = "manifest",
        value_name = "FILE",
        help = "Template manifest to use instead of the built-in one"
    )]
    pub manifest: Option<PathBuf>,

    /// Pick a built-in template by id instead of the default one.
    #[arg(
        short = 't',
        long = "template",
        value_name = "ID",
        conflicts_with = "manifest",
        help = "Built-in template id, e.g. core-template@1.0.0"
    )]
    pub template: Option<String>,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation and create immediately"
    )]
    pub yes: bool,

    /// Preview what would be done without cloning or writing anything.
    #[arg(long = "dry-run", help = "Show what would be done without doing it")]
    pub dry_run: bool,
}

impl NewArgs {
    /// The effective security choice, given the configured default.
    pub fn include_security(&self, default: bool) -> bool {
        if self.without_security {
            false
        } else if self.with_security {
            true
        } else {
            default
        }
    }
}

// ── template ──────────────────────────────────────────────────────────────────

/// Arguments for `stencil template`.
#[derive(Debug, Args)]
pub struct TemplateArgs {
    /// Describe this manifest file instead of the built-in ones.
    #[arg(
        short = 'm',
        long = "manifest",
        value_name = "FILE",
        help = "Template manifest to describe"
    )]
    pub manifest: Option<PathBuf>,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `stencil init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.stencil.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `stencil completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `stencil config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.include_security`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_new_command() {
        let cli = Cli::parse_from(["stencil", "new", "shop", "--without-security", "-y"]);
        match cli.command {
            Commands::New(args) => {
                assert_eq!(args.name, "shop");
                assert!(!args.include_security(true));
                assert!(args.yes);
                assert!(!args.dry_run);
            }
            other => panic!("expected New command, got {other:?}"),
        }
    }

    #[test]
    fn security_follows_configuration_unless_overridden() {
        let cli = Cli::parse_from(["stencil", "new", "shop"]);
        let Commands::New(args) = cli.command else {
            panic!("expected New command");
        };
        assert!(args.include_security(true));
        assert!(!args.include_security(false));

        let cli = Cli::parse_from(["stencil", "new", "shop", "--with-security"]);
        let Commands::New(args) = cli.command else {
            panic!("expected New command");
        };
        assert!(args.include_security(false));
    }

    #[test]
    fn security_flags_conflict() {
        let result = Cli::try_parse_from([
            "stencil",
            "new",
            "shop",
            "--with-security",
            "--without-security",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["stencil", "--quiet", "--verbose", "template"]);
        assert!(result.is_err());
    }

    #[test]
    fn output_format_is_global() {
        let cli = Cli::parse_from(["stencil", "template", "--output-format", "json"]);
        assert_eq!(cli.global.output_format, Some(OutputFormat::Json));
    }
}
