use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "arbor", about = "Arbor - a minimal content-addressed version control system", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Repository root (the directory holding `.arbor`)
    #[arg(long, global = true, default_value = ".")]
    pub repo: PathBuf,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize a repository, or open an existing one
    Init(InitArgs),
    /// Record the working directory as a new commit
    Commit(CommitArgs),
    /// Show commit history of a branch
    Log(LogArgs),
    /// Show a single commit
    Show(ShowArgs),
    /// Print a stored object
    CatObject(CatObjectArgs),
    /// List or create branches
    Branch(BranchArgs),
    /// Switch to a different branch
    Switch(SwitchArgs),
    /// Show changes in the working directory or between commits
    Diff(DiffArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Directory to initialize (defaults to `--repo`)
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct CommitArgs {
    #[arg(short, long)]
    pub message: String,
    /// Author name (defaults to `author` from the repository config)
    #[arg(long)]
    pub author: Option<String>,
}

#[derive(Args)]
pub struct LogArgs {
    /// Branch to walk (defaults to the current branch)
    pub branch: Option<String>,
    /// Maximum number of commits, 0 for all
    #[arg(short = 'n', long, default_value = "0")]
    pub limit: usize,
    #[arg(long)]
    pub oneline: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Commit hash or branch name
    pub commit: String,
}

#[derive(Args)]
pub struct CatObjectArgs {
    /// Full object hash or branch name
    pub object: String,
}

#[derive(Args)]
pub struct BranchArgs {
    /// Create a branch with this name at the current head
    pub name: Option<String>,
}

#[derive(Args)]
pub struct SwitchArgs {
    pub branch: String,
    /// Create the branch first
    #[arg(short = 'c', long)]
    pub create: bool,
}

#[derive(Args)]
pub struct DiffArgs {
    /// Old side: commit hash or branch name (defaults to HEAD)
    pub from: Option<String>,
    /// New side: commit hash or branch name (defaults to the working directory)
    pub to: Option<String>,
    /// Only print per-file counts
    #[arg(long)]
    pub stat: bool,
}
