use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string: plain for release builds, with the commit
/// hash and date appended when built from a checkout.
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{} ({} {})", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "menukit", bin_name = "menukit", version = get_version())]
#[command(about = "Edit chat-bot menu documents from the command line", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Menu document to operate on (defaults to document-path from config)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List sections
    #[command(alias = "ls")]
    List {
        /// Keep only sections whose name contains the term
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show one section in full, links to it included
    Show {
        /// Section name
        name: String,
    },

    /// List the sections whose buttons link to a section
    Links {
        /// Section name (need not exist; dangling targets are queryable)
        name: String,

        /// Count navigation buttons as links too
        #[arg(long)]
        include_nav: bool,
    },

    /// Add a new section
    #[command(alias = "a")]
    Add {
        /// Section name (must be unused)
        name: String,

        /// Body text
        #[arg(short, long)]
        text: Option<String>,

        /// File reference to attach
        #[arg(long, value_name = "FILE")]
        attach: Option<String>,
    },

    /// Remove a section; buttons pointing at it are left dangling
    #[command(alias = "rm")]
    Remove {
        /// Section name
        name: String,
    },

    /// Rename a section; buttons pointing at the old name are not rewritten
    #[command(alias = "mv")]
    Rename {
        /// Current name
        old: String,

        /// New name (must be unused)
        new: String,
    },

    /// Replace a section's body text
    SetText {
        /// Section name
        name: String,

        /// New body text
        text: String,
    },

    /// Attach a file to a section
    SetFile {
        /// Section name
        name: String,

        /// File reference to attach
        #[arg(value_name = "FILE")]
        attachment: String,
    },

    /// Detach a section's file
    ClearFile {
        /// Section name
        name: String,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (document-path, remote-path, nav-labels)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}
