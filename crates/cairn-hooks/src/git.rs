//! Repository reads used by hooks.
//!
//! HEAD is read through `gix`. File lists use the git CLI, which is always
//! present when a hook fires. It runs with `core.quotePath=false`, and any
//! path git still quotes goes through [`unquote_path`].

use std::path::{Path, PathBuf};
use std::process::Command;

use cairn_core::enums::HookType;

use crate::error::HookError;
use crate::event::HookEvent;

/// Where HEAD points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoHead {
    pub root: PathBuf,
    /// `None` when HEAD is detached.
    pub branch: Option<String>,
    /// `None` in a repository without commits.
    pub commit: Option<String>,
}

fn open(path: &Path) -> Result<gix::Repository, HookError> {
    gix::discover(path).map_err(|_| HookError::NotGitRepo(path.to_path_buf()))
}

/// Discover the repository containing `path` and read HEAD.
///
/// # Errors
///
/// Returns [`HookError::NotGitRepo`] outside a repository, or
/// [`HookError::Git`] if HEAD cannot be read.
pub fn read_head(path: &Path) -> Result<RepoHead, HookError> {
    let repo = open(path)?;
    let root = repo
        .work_dir()
        .map_or_else(|| path.to_path_buf(), Path::to_path_buf);

    let head = repo
        .head()
        .map_err(|e| HookError::Git(format!("read HEAD: {e}")))?;
    let branch = head.referent_name().map(|name| {
        let full = name.as_bstr().to_string();
        full.strip_prefix("refs/heads/")
            .map_or_else(|| full.clone(), ToString::to_string)
    });
    let commit = repo.head_id().ok().map(|id| id.to_string());

    Ok(RepoHead {
        root,
        branch,
        commit,
    })
}

/// Paths staged for the next commit, excluding deletions.
///
/// # Errors
///
/// Returns [`HookError::Git`] if git cannot be run or exits non-zero.
pub fn staged_files(path: &Path) -> Result<Vec<String>, HookError> {
    git_lines(
        path,
        &["diff", "--cached", "--name-only", "--diff-filter=ACMR"],
    )
}

/// Paths brought in by the last merge (`ORIG_HEAD..HEAD`), excluding deletions.
///
/// # Errors
///
/// Returns [`HookError::Git`] if git cannot be run or exits non-zero.
pub fn merged_files(path: &Path) -> Result<Vec<String>, HookError> {
    git_lines(
        path,
        &[
            "diff",
            "--name-only",
            "--diff-filter=ACMR",
            "ORIG_HEAD",
            "HEAD",
        ],
    )
}

/// Arguments that keep non-ASCII paths verbatim in git output.
pub(crate) const VERBATIM_PATHS: [&str; 2] = ["-c", "core.quotePath=false"];

fn git_lines(path: &Path, args: &[&str]) -> Result<Vec<String>, HookError> {
    let output = Command::new("git")
        .args(VERBATIM_PATHS)
        .args(args)
        .current_dir(path)
        .output()
        .map_err(|e| HookError::Git(format!("run git {}: {e}", args.join(" "))))?;
    if !output.status.success() {
        return Err(HookError::Git(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(unquote_path)
        .collect())
}

/// Decode a path git printed as a C-style quoted string (`"a\tb"`,
/// `"caf\303\251.ts"`). Unquoted input is returned as is.
#[must_use]
pub fn unquote_path(raw: &str) -> String {
    let Some(inner) = raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return raw.to_string();
    };

    let mut bytes = Vec::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            let mut buf = [0; 4];
            bytes.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        match chars.next() {
            Some('n') => bytes.push(b'\n'),
            Some('t') => bytes.push(b'\t'),
            Some('r') => bytes.push(b'\r'),
            Some('a') => bytes.push(0x07),
            Some('b') => bytes.push(0x08),
            Some('f') => bytes.push(0x0c),
            Some('v') => bytes.push(0x0b),
            Some(digit @ '0'..='7') => {
                let mut value = digit.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(next) => {
                            value = value * 8 + next;
                            chars.next();
                        }
                        None => break,
                    }
                }
                bytes.push(u8::try_from(value).unwrap_or(u8::MAX));
            }
            Some(other) => {
                let mut buf = [0; 4];
                bytes.extend_from_slice(other.encode_utf8(&mut buf).as_bytes());
            }
            None => bytes.push(b'\\'),
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Build a [`HookEvent`] from the repository state at `path`.
///
/// Pre-commit events carry the staged files and post-merge events the merged
/// files. A failure to list them is logged and leaves the list empty.
///
/// # Errors
///
/// Returns [`HookError`] if the repository or HEAD cannot be read.
pub fn event_from_repo(
    hook_type: HookType,
    path: &Path,
    previous_commit: Option<String>,
) -> Result<HookEvent, HookError> {
    let head = read_head(path)?;
    let mut event = HookEvent::new(
        hook_type,
        head.root.to_string_lossy(),
        head.branch.unwrap_or_else(|| "HEAD".to_string()),
        head.commit.unwrap_or_default(),
    );
    event.previous_commit = previous_commit;

    let list = |files: Result<Vec<String>, HookError>| {
        files.unwrap_or_else(|e| {
            tracing::warn!(hook = %hook_type, %e, "could not list files for hook");
            Vec::new()
        })
    };
    match hook_type {
        HookType::PreCommit => event.staged_files = Some(list(staged_files(&head.root))),
        HookType::PostMerge => event.merged_files = Some(list(merged_files(&head.root))),
        HookType::PrePush | HookType::PostCheckout => {}
    }
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{commit_file, init_repo, run_git};
    use pretty_assertions::assert_eq;

    #[test]
    fn read_head_on_branch_and_detached() {
        let (_dir, root) = init_repo();
        commit_file(&root, "README.md", "# app\n", "initial");
        let sha = run_git(&root, &["rev-parse", "HEAD"]).trim().to_string();

        let head = read_head(&root).unwrap();
        assert_eq!(head.branch.as_deref(), Some("main"));
        assert_eq!(head.commit.as_deref(), Some(sha.as_str()));

        run_git(&root, &["checkout", "-b", "feat/hooks"]);
        assert_eq!(read_head(&root).unwrap().branch.as_deref(), Some("feat/hooks"));

        run_git(&root, &["checkout", &sha]);
        let detached = read_head(&root).unwrap();
        assert_eq!(detached.branch, None);
        assert_eq!(detached.commit.as_deref(), Some(sha.as_str()));
    }

    #[test]
    fn read_head_outside_repo_is_not_git_repo() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = read_head(dir.path()).unwrap_err();
        assert!(matches!(err, HookError::NotGitRepo(_)));
    }

    #[test]
    fn staged_files_lists_index_changes() {
        let (_dir, root) = init_repo();
        commit_file(&root, "README.md", "# app\n", "initial");
        std::fs::write(root.join("new.ts"), "export {};\n").unwrap();
        std::fs::write(root.join("README.md"), "# changed\n").unwrap();
        run_git(&root, &["add", "new.ts", "README.md"]);

        let mut staged = staged_files(&root).unwrap();
        staged.sort();
        assert_eq!(staged, vec!["README.md".to_string(), "new.ts".to_string()]);
    }

    #[test]
    fn staged_files_keep_non_ascii_names() {
        let (_dir, root) = init_repo();
        commit_file(&root, "README.md", "# app\n", "initial");
        std::fs::write(root.join("café.ts"), "export {};\n").unwrap();
        run_git(&root, &["add", "café.ts"]);

        assert_eq!(staged_files(&root).unwrap(), vec!["café.ts".to_string()]);
    }

    #[test]
    fn unquotes_c_style_paths() {
        assert_eq!(unquote_path("src/a.ts"), "src/a.ts");
        assert_eq!(unquote_path(r#""caf\303\251.ts""#), "café.ts");
        assert_eq!(unquote_path(r#""tab\there.ts""#), "tab\there.ts");
        assert_eq!(unquote_path(r#""say \"hi\".ts""#), "say \"hi\".ts");
        assert_eq!(unquote_path(r#""back\\slash.ts""#), "back\\slash.ts");
    }

    #[test]
    fn pre_commit_event_carries_staged_files() {
        let (_dir, root) = init_repo();
        commit_file(&root, "README.md", "# app\n", "initial");
        std::fs::write(root.join("lib.py"), "def f():\n    pass\n").unwrap();
        run_git(&root, &["add", "lib.py"]);

        let event = event_from_repo(HookType::PreCommit, &root, None).unwrap();
        assert_eq!(event.current_branch, "main");
        assert_eq!(event.staged_files, Some(vec!["lib.py".to_string()]));
        assert!(event.merged_files.is_none());
    }
}
