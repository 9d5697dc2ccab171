use std::io::{self, Write};

use anyhow::{bail, Result};
use bstr::BString;
use clap::Args;
use git_hash::ObjectId;
use git_ref::reflog::{append_reflog_entry, ReflogEntry};
use git_ref::{RefName, RefStore};

use crate::Cli;
use super::open_repo;

/// `switch` only moves the `HEAD` reference (and, with `-c`, creates the
/// target branch ref); it never touches the working tree or index, since
/// those are external collaborators the core does not manage.
#[derive(Args)]
pub struct SwitchArgs {
    /// Create a new branch and switch to it
    #[arg(short = 'c', long = "create", value_name = "new-branch")]
    pub create: Option<String>,

    /// Create a branch with no history and switch to it
    #[arg(long)]
    pub orphan: bool,

    /// Switch to a commit, leaving HEAD detached
    #[arg(short = 'd', long = "detach")]
    pub detach: bool,

    /// Branch, or starting point for a new branch, to switch to
    pub target: Option<String>,
}

pub fn run(args: &SwitchArgs, cli: &Cli) -> Result<i32> {
    let repo = open_repo(cli)?;
    let stderr = io::stderr();
    let mut err = stderr.lock();

    let old_head_oid = repo.head_oid()?.unwrap_or(ObjectId::NULL_SHA1);
    let old_branch = repo.current_branch()?.unwrap_or_else(|| {
        let hex = old_head_oid.to_hex();
        hex[..7.min(hex.len())].to_string()
    });

    if args.orphan {
        let branch = args
            .target
            .as_deref()
            .or(args.create.as_deref())
            .ok_or_else(|| anyhow::anyhow!("missing new branch name for --orphan"))?;
        let branch_ref = RefName::new(BString::from(format!("refs/heads/{branch}")))?;
        if repo.refs().resolve(&branch_ref)?.is_some() {
            bail!("fatal: a branch named '{}' already exists", branch);
        }
        let head = RefName::new(BString::from("HEAD"))?;
        repo.refs().write_symbolic_ref(&head, &branch_ref)?;
        write_switch_reflog(&repo, old_head_oid, ObjectId::NULL_SHA1, &old_branch, branch)?;
        writeln!(err, "Switched to a new branch '{}'", branch)?;
        return Ok(0);
    }

    if let Some(ref new_branch) = args.create {
        let start = args.target.as_deref().unwrap_or("HEAD");
        let oid = super::resolve_name(&repo, start)?;

        let branch_ref = RefName::new(BString::from(format!("refs/heads/{new_branch}")))?;
        if repo.refs().resolve(&branch_ref)?.is_some() {
            bail!("fatal: a branch named '{}' already exists", new_branch);
        }
        repo.refs().write_ref(&branch_ref, &oid)?;

        let head = RefName::new(BString::from("HEAD"))?;
        repo.refs().write_symbolic_ref(&head, &branch_ref)?;
        write_switch_reflog(&repo, old_head_oid, oid, &old_branch, new_branch)?;
        writeln!(err, "Switched to a new branch '{}'", new_branch)?;
        return Ok(0);
    }

    let target = args
        .target
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("missing branch or commit argument"))?;

    if args.detach {
        let oid = super::resolve_name(&repo, target)?;
        let head = RefName::new(BString::from("HEAD"))?;
        repo.refs().write_ref(&head, &oid)?;
        write_switch_reflog(&repo, old_head_oid, oid, &old_branch, target)?;
        writeln!(err, "HEAD is now at {} {}", &oid.to_hex()[..7], target)?;
        return Ok(0);
    }

    let branch_ref = RefName::new(BString::from(format!("refs/heads/{target}")))?;
    if let Some(oid) = repo.refs().resolve_to_oid(&branch_ref)? {
        let head = RefName::new(BString::from("HEAD"))?;
        repo.refs().write_symbolic_ref(&head, &branch_ref)?;
        write_switch_reflog(&repo, old_head_oid, oid, &old_branch, target)?;
        writeln!(err, "Switched to branch '{}'", target)?;
        Ok(0)
    } else {
        bail!("fatal: invalid reference: {}", target);
    }
}

fn write_switch_reflog(
    repo: &git_repository::Repository,
    old_oid: ObjectId,
    new_oid: ObjectId,
    old_name: &str,
    new_name: &str,
) -> Result<()> {
    let sig = super::committer_signature(repo)?;
    let entry = ReflogEntry {
        old_oid,
        new_oid,
        identity: sig,
        message: BString::from(format!("checkout: moving from {old_name} to {new_name}")),
    };
    let head_ref = RefName::new(BString::from("HEAD"))?;
    append_reflog_entry(repo.git_dir(), &head_ref, &entry)?;
    Ok(())
}
