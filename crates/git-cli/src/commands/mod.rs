pub mod cat_file;
pub mod hash_object;
pub mod init;
pub mod switch;

use anyhow::{bail, Result};
use bstr::BString;
use clap::Subcommand;

use git_hash::ObjectId;
use git_ref::{RefName, RefStore};
use git_utils::date::{GitDate, Signature};

use crate::Cli;

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty Git repository or reinitialize an existing one
    Init(init::InitArgs),
    /// Provide content or type and size information for repository objects
    CatFile(cat_file::CatFileArgs),
    /// Compute object ID and optionally create a blob from a file
    HashObject(hash_object::HashObjectArgs),
    /// Switch branches
    Switch(switch::SwitchArgs),
}

impl Commands {
    /// Get the command name as used in config keys (e.g., "init", "cat-file").
    pub fn command_name(&self) -> &str {
        match self {
            Commands::Init(_) => "init",
            Commands::CatFile(_) => "cat-file",
            Commands::HashObject(_) => "hash-object",
            Commands::Switch(_) => "switch",
        }
    }
}

/// Open a repository, respecting `--git-dir` and the `GIT_DIR` environment
/// variable. The core only consumes "given a git-dir path, open it" — no
/// walk-up-from-cwd discovery is attempted; a bare working directory is
/// assumed to contain `.git` unless overridden.
pub fn open_repo(cli: &Cli) -> Result<git_repository::Repository> {
    let git_dir = cli
        .git_dir
        .clone()
        .or_else(|| std::env::var_os("GIT_DIR").map(std::path::PathBuf::from))
        .unwrap_or_else(|| std::path::PathBuf::from(".git"));

    let repo = git_repository::Repository::open(&git_dir)?;
    Ok(repo)
}

/// Resolve a name to an `ObjectId` using the forms named in the CLI surface:
/// a full or abbreviated hex id, the literal `HEAD`, a bare ref name tried
/// under `refs/heads`, `refs/tags`, and `refs/remotes`, `heads/<n>`, or a
/// fully qualified `refs/...` name. No general revision-walking expressions
/// (`HEAD~2`, `branch^`, ranges, ...) are supported — that belongs to an
/// external collaborator, not the core.
pub fn resolve_name(repo: &git_repository::Repository, spec: &str) -> Result<ObjectId> {
    if let Ok(oid) = ObjectId::from_hex(spec) {
        if repo.odb().contains(&oid) {
            return Ok(oid);
        }
    }
    if git_object::name::is_hex_prefix(spec) {
        if let Ok(oid) = repo.odb().resolve_prefix(spec) {
            return Ok(oid);
        }
    }

    for candidate in ref_candidates(spec) {
        let refname = match RefName::new(BString::from(candidate)) {
            Ok(n) => n,
            Err(_) => continue,
        };
        if let Some(oid) = repo.refs().resolve_to_oid(&refname)? {
            return Ok(oid);
        }
    }

    bail!("fatal: not a valid object name: '{}'", spec)
}

/// Candidate ref names to try, in C git's order, for a bare name.
fn ref_candidates(spec: &str) -> Vec<String> {
    if spec == "HEAD" || spec.starts_with("refs/") {
        return vec![spec.to_string()];
    }
    let mut candidates = vec![format!("refs/{spec}")];
    if let Some(rest) = spec.strip_prefix("heads/") {
        candidates.push(format!("refs/heads/{rest}"));
    } else if let Some(rest) = spec.strip_prefix("tags/") {
        candidates.push(format!("refs/tags/{rest}"));
    } else if let Some(rest) = spec.strip_prefix("remotes/") {
        candidates.push(format!("refs/remotes/{rest}"));
    } else {
        candidates.push(format!("refs/heads/{spec}"));
        candidates.push(format!("refs/tags/{spec}"));
        candidates.push(format!("refs/remotes/{spec}"));
    }
    candidates
}

/// Build the identity used to stamp a reflog entry for a ref write, reading
/// the committer environment variables with a config fallback.
pub fn committer_signature(repo: &git_repository::Repository) -> Result<Signature> {
    let name = std::env::var("GIT_COMMITTER_NAME")
        .ok()
        .or_else(|| repo.config().get_string("user.name").ok().flatten())
        .unwrap_or_else(|| "Unknown".to_string());

    let email = std::env::var("GIT_COMMITTER_EMAIL")
        .ok()
        .or_else(|| repo.config().get_string("user.email").ok().flatten())
        .unwrap_or_else(|| "unknown@unknown".to_string());

    let date = if let Ok(date_str) = std::env::var("GIT_COMMITTER_DATE") {
        GitDate::parse_raw(&date_str)?
    } else {
        GitDate::now()
    };

    Ok(Signature {
        name: BString::from(name),
        email: BString::from(email),
        date,
    })
}

pub fn run(cli: Cli) -> Result<i32> {
    match &cli.command {
        Commands::Init(args) => init::run(args, &cli),
        Commands::CatFile(args) => cat_file::run(args, &cli),
        Commands::HashObject(args) => hash_object::run(args, &cli),
        Commands::Switch(args) => switch::run(args, &cli),
    }
}
