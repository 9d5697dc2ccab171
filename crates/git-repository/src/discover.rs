use std::path::{Path, PathBuf};

use crate::{DiscoveredRepo, RepoError, RepositoryKind};

/// Open a known git directory path directly.
pub fn open_git_dir(git_dir: &Path) -> Result<DiscoveredRepo, RepoError> {
    let git_dir = std::fs::canonicalize(git_dir)
        .map_err(|_| RepoError::NotFound(git_dir.to_path_buf()))?;

    if !is_git_dir(&git_dir) {
        return Err(RepoError::InvalidGitDir {
            path: git_dir,
            reason: "missing HEAD, objects/, or refs/".to_string(),
        });
    }

    let common_dir = resolve_common_dir(&git_dir);

    // If the git dir has a commondir file, it's a linked worktree's git dir
    if git_dir.join("commondir").is_file() {
        // This is a worktree git dir (e.g., .git/worktrees/<name>)
        let gitdir_file = git_dir.join("gitdir");
        let work_tree = if gitdir_file.is_file() {
            let wt = std::fs::read_to_string(&gitdir_file)
                .map_err(|e| RepoError::InvalidGitDir {
                    path: gitdir_file,
                    reason: e.to_string(),
                })?;
            let wt = wt.trim();
            // The gitdir file in worktree git dir points to the .git file in the worktree
            // The worktree is the parent of that .git file
            let wt_path = PathBuf::from(wt);
            wt_path.parent().map(|p| p.to_path_buf())
        } else {
            None
        };
        return Ok(DiscoveredRepo {
            git_dir,
            work_tree,
            common_dir,
            kind: RepositoryKind::LinkedWorktree,
        });
    }

    // Check if the git dir is inside a working tree (i.e., parent has .git = this dir)
    if let Some(parent) = git_dir.parent() {
        if parent.join(".git") == git_dir {
            return Ok(DiscoveredRepo {
                work_tree: Some(parent.to_path_buf()),
                common_dir,
                git_dir,
                kind: RepositoryKind::Normal,
            });
        }
    }

    // Must be a bare repo
    Ok(DiscoveredRepo {
        common_dir: common_dir.clone(),
        git_dir,
        work_tree: None,
        kind: RepositoryKind::Bare,
    })
}

/// Check if a directory looks like a git dir (has HEAD, objects/, refs/).
pub fn is_git_dir(path: &Path) -> bool {
    path.join("HEAD").is_file() && path.join("objects").is_dir() && path.join("refs").is_dir()
}

/// Resolve the common dir for a git directory.
///
/// If the git dir has a `commondir` file, it points to the shared directory.
/// Otherwise, the common dir is the git dir itself.
fn resolve_common_dir(git_dir: &Path) -> PathBuf {
    let commondir_file = git_dir.join("commondir");
    if commondir_file.is_file() {
        if let Ok(content) = std::fs::read_to_string(&commondir_file) {
            let relative = content.trim();
            let resolved = git_dir.join(relative);
            if let Ok(canonical) = std::fs::canonicalize(&resolved) {
                return canonical;
            }
            return resolved;
        }
    }
    git_dir.to_path_buf()
}
