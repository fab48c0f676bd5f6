//! File-level filters over a directory tree
//!
//! Files whose name starts with `.` or `_` are ignored by both filters: they
//! are neither copied, deleted nor counted.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use super::{FilterSpec, OccurrenceCounter, is_excluded_name};
use crate::error::{Error, Result};
use crate::walker::walk_files;

/// Copy every kept file from `source` into the same relative location under
/// `dest`. A file matches when its name ends with one of the patterns.
///
/// The source tree is never modified. Files that fail to copy are logged and
/// left out of the counter.
pub fn filter_by_extension(spec: &FilterSpec, source: &Path, dest: &Path) -> Result<OccurrenceCounter> {
    ensure_dir(source)?;

    let mut counter = OccurrenceCounter::new();
    for file in walk_files(source) {
        let name = file.file_name();
        if is_excluded_name(&name) || !spec.keeps(spec.matches_suffix(&name)) {
            continue;
        }

        let target = dest.join(&file.relative);
        let copied = target
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|_| fs::copy(&file.path, &target));
        match copied {
            Ok(_) => {
                debug!(file = %file.relative_display(), "copied");
                counter.record(&name);
            }
            Err(e) => warn!(file = %file.path.display(), error = %e, "failed to copy file"),
        }
    }

    info!(
        mode = %spec.mode,
        kept = counter.total(),
        "extension filter copied {} into {}",
        source.display(),
        dest.display()
    );
    Ok(counter)
}

/// Delete every file under `source` that the filename filter does not keep.
/// A file matches when its name equals one of the patterns exactly.
///
/// This modifies `source` in place and cannot be undone; run it on a copy.
pub fn filter_by_filename(spec: &FilterSpec, source: &Path) -> Result<OccurrenceCounter> {
    ensure_dir(source)?;

    // Collect first so deletions don't race the walk.
    let files: Vec<_> = walk_files(source).collect();

    let mut counter = OccurrenceCounter::new();
    let mut removed = 0;
    for file in files {
        let name = file.file_name();
        if is_excluded_name(&name) {
            continue;
        }

        if spec.keeps(spec.matches_exact(&name)) {
            counter.record(&name);
            continue;
        }

        match fs::remove_file(&file.path) {
            Ok(()) => {
                debug!(file = %file.relative_display(), "removed");
                removed += 1;
            }
            Err(e) => warn!(file = %file.path.display(), error = %e, "failed to remove file"),
        }
    }

    info!(
        mode = %spec.mode,
        kept = counter.total(),
        removed,
        "filename filter applied to {}",
        source.display()
    );
    Ok(counter)
}

fn ensure_dir(source: &Path) -> Result<()> {
    if source.is_dir() {
        Ok(())
    } else {
        Err(Error::SourceMissing(source.to_path_buf()))
    }
}
