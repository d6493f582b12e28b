//! Working-directory resolution for run outputs.
//!
//! When a run does not name its own workdir, one is computed as
//! `./runs/{program}/{day}/{time}`. Collisions (two runs in the same
//! wall-clock second) are resolved by suffixing the time component with an
//! incrementing index. This is a local collision-avoidance loop for a
//! single process on a single filesystem, not a lock.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// Root directory under which per-run workdirs are created.
pub const WORKDIR_ROOT: &str = "./runs";

/// Resolve a fresh workdir for `program` under [`WORKDIR_ROOT`].
///
/// # Examples
///
/// ```no_run
/// use runcfg::workdir::resolve_workdir;
///
/// let dir = resolve_workdir("train");
/// assert!(dir.starts_with("./runs/train"));
/// ```
#[must_use]
pub fn resolve_workdir(program: &str) -> PathBuf {
    resolve_workdir_in(Path::new(WORKDIR_ROOT), program, Local::now())
}

/// Resolve a fresh workdir under an explicit root, at an explicit time.
///
/// The day component is formatted `%d-%m-%Y` and the time component
/// `%H:%M:%S`. If the computed path already exists, `({idx})` suffixes
/// starting at 2 are appended to the time component until a non-existing
/// path is found.
#[must_use]
pub fn resolve_workdir_in(root: &Path, program: &str, now: DateTime<Local>) -> PathBuf {
    let day = now.format("%d-%m-%Y").to_string();
    let time = now.format("%H:%M:%S").to_string();

    let mut workdir = root.join(program).join(&day).join(&time);
    let mut idx = 2;
    while workdir.exists() {
        workdir = root.join(program).join(&day).join(format!("{time}({idx})"));
        idx += 1;
    }

    workdir
}
