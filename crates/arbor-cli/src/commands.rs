use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use arbor_repo::{FileChange, Repository, METADATA_DIR};
use colored::Colorize;
use serde::Serialize;

use crate::cli::*;
use crate::render::{self, CommitView};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        command,
        repo: root,
        format,
        ..
    } = cli;

    if let Command::Init(args) = command {
        return cmd_init(args.path.unwrap_or(root), format);
    }

    let mut repo = open_existing(&root)?;
    let result = match command {
        Command::Init(_) => Ok(()),
        Command::Commit(args) => cmd_commit(&mut repo, args, format),
        Command::Log(args) => cmd_log(&repo, args, format),
        Command::Show(args) => cmd_show(&repo, args, format),
        Command::CatObject(args) => cmd_cat_object(&repo, args, format),
        Command::Branch(args) => cmd_branch(&mut repo, args, format),
        Command::Switch(args) => cmd_switch(&mut repo, args),
        Command::Diff(args) => cmd_diff(&repo, args, format),
    };
    repo.close()?;
    result
}

fn open_existing(root: &Path) -> anyhow::Result<Repository> {
    if !root.join(METADATA_DIR).is_dir() {
        bail!(
            "not an Arbor repository: {} (run `arbor init` first)",
            root.display()
        );
    }
    Repository::init(root).with_context(|| format!("failed to open repository at {}", root.display()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_init(path: PathBuf, format: OutputFormat) -> anyhow::Result<()> {
    let existed = path.join(METADATA_DIR).is_dir();
    let repo = Repository::init(&path)
        .with_context(|| format!("failed to initialize repository at {}", path.display()))?;
    let head = repo.head()?;
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "path": path.display().to_string(),
            "branch": repo.current_branch(),
            "head": head.to_hex(),
            "created": !existed,
        }))?,
        OutputFormat::Text => {
            let verb = if existed { "Reopened" } else { "Initialized" };
            println!(
                "{} {} Arbor repository in {}",
                "✓".green().bold(),
                verb,
                path.display().to_string().bold()
            );
            println!("  Branch: {}", repo.current_branch().yellow());
            println!("  Head:   {}", head.short_hex().dimmed());
        }
    }
    repo.close()?;
    Ok(())
}

fn cmd_commit(repo: &mut Repository, args: CommitArgs, format: OutputFormat) -> anyhow::Result<()> {
    let author = args
        .author
        .or_else(|| repo.config().author.clone())
        .unwrap_or_default();
    let hash = repo.create_commit(&author, &args.message)?;
    let entry = repo.get_commit(&hash)?;
    match format {
        OutputFormat::Json => print_json(&CommitView::from(&entry))?,
        OutputFormat::Text => println!(
            "[{} {}] {}",
            repo.current_branch().yellow(),
            hash.short_hex(),
            args.message
        ),
    }
    Ok(())
}

fn cmd_log(repo: &Repository, args: LogArgs, format: OutputFormat) -> anyhow::Result<()> {
    let branch = args
        .branch
        .unwrap_or_else(|| repo.current_branch().to_string());
    let entries = repo.get_commits(&branch, args.limit)?;
    match format {
        OutputFormat::Json => {
            let views: Vec<CommitView> = entries.iter().map(CommitView::from).collect();
            print_json(&views)?;
        }
        OutputFormat::Text if args.oneline => {
            for entry in &entries {
                println!("{}", render::commit_oneline(entry));
            }
        }
        OutputFormat::Text => {
            for entry in &entries {
                println!("{}", render::commit_block(entry));
            }
        }
    }
    Ok(())
}

fn cmd_show(repo: &Repository, args: ShowArgs, format: OutputFormat) -> anyhow::Result<()> {
    let hash = repo.resolve_hash(&args.commit)?;
    let entry = repo.get_commit(&hash)?;
    match format {
        OutputFormat::Json => print_json(&CommitView::from(&entry))?,
        OutputFormat::Text => {
            print!("{}", render::commit_block(&entry));
            let changes = match entry.commit.origin {
                Some(origin) => repo.diff_commits(&origin, &hash)?,
                None => Vec::new(),
            };
            for change in &changes {
                println!();
                print!("{}", render::change_body(change));
            }
        }
    }
    Ok(())
}

fn cmd_cat_object(repo: &Repository, args: CatObjectArgs, format: OutputFormat) -> anyhow::Result<()> {
    let hash = repo.resolve_hash(&args.object)?;
    let object = repo.get_object(&hash)?;
    match format {
        OutputFormat::Json => print_json(&render::object_json(&object)?)?,
        OutputFormat::Text => print!("{}", render::object_text(&object)?),
    }
    Ok(())
}

fn cmd_branch(repo: &mut Repository, args: BranchArgs, format: OutputFormat) -> anyhow::Result<()> {
    if let Some(name) = &args.name {
        let head = repo.create_branch(name)?;
        println!("Created branch {} at {}", name.yellow(), head.short_hex());
        return Ok(());
    }
    let branches = repo.list_branches();
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "current": repo.current_branch(),
            "branches": branches,
        }))?,
        OutputFormat::Text => {
            for name in &branches {
                if name == repo.current_branch() {
                    println!("* {}", name.green().bold());
                } else {
                    println!("  {name}");
                }
            }
        }
    }
    Ok(())
}

fn cmd_switch(repo: &mut Repository, args: SwitchArgs) -> anyhow::Result<()> {
    if args.create {
        repo.create_branch(&args.branch)?;
        repo.change_branch(&args.branch)?;
        println!("Created and switched to {}", args.branch.yellow().bold());
    } else {
        repo.change_branch(&args.branch)?;
        println!("Switched to {}", args.branch.yellow().bold());
    }
    Ok(())
}

fn cmd_diff(repo: &Repository, args: DiffArgs, format: OutputFormat) -> anyhow::Result<()> {
    let changes = collect_changes(repo, args.from.as_deref(), args.to.as_deref())?;
    match format {
        OutputFormat::Json => print_json(&changes)?,
        OutputFormat::Text if changes.is_empty() => println!("No changes."),
        OutputFormat::Text if args.stat => {
            for change in &changes {
                println!("{}", render::change_stat(change));
            }
            println!("{} file(s) changed", changes.len());
        }
        OutputFormat::Text => {
            for change in &changes {
                print!("{}", render::change_body(change));
            }
        }
    }
    Ok(())
}

/// No revisions: working tree against HEAD. One: working tree against it.
/// Two: the first commit against the second.
fn collect_changes(repo: &Repository, from: Option<&str>, to: Option<&str>) -> anyhow::Result<Vec<FileChange>> {
    Ok(match (from, to) {
        (None, None) => repo.diff_working_vs_head()?,
        (None, Some(to)) => bail!("target revision `{to}` given without a source revision"),
        (Some(from), None) => repo.diff_working_vs_commit(&repo.resolve_hash(from)?)?,
        (Some(from), Some(to)) => {
            repo.diff_commits(&repo.resolve_hash(from)?, &repo.resolve_hash(to)?)?
        }
    })
}
