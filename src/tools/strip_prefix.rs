//! `strip-prefix`: drop a fixed prefix from file names in a folder

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::naming::strip_filename_prefix;
use crate::core::RunReport;

/// Rename every top-level entry of `dir` that starts with `prefix`
pub fn run(dir: &Path, prefix: &str) -> Result<RunReport, String> {
    if prefix.is_empty() {
        return Err("Prefix cannot be empty".to_string());
    }

    let entries =
        fs::read_dir(dir).map_err(|e| format!("Failed to read directory {}: {}", dir.display(), e))?;
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .collect();
    paths.sort();

    let mut report = RunReport::new();
    for path in paths {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };
        let Some(new_name) = strip_filename_prefix(&name, prefix) else {
            report.unchanged += 1;
            continue;
        };

        report.processed += 1;
        let target = path.with_file_name(new_name);
        match rename(&path, &target) {
            Ok(()) => {
                report.changed += 1;
                println!("Renamed: {} → {}", name, new_name);
            }
            Err(e) => {
                println!("Error renaming {}: {}", name, e);
                report.record_error(&name, &e);
            }
        }
    }

    if report.processed == 0 {
        println!("No files starting with '{}' in {}", prefix, dir.display());
    } else {
        println!("Renamed {} of {} files", report.changed, report.processed);
    }
    Ok(report)
}

fn rename(from: &Path, to: &Path) -> Result<(), String> {
    if to.exists() {
        return Err(format!("{} already exists", to.display()));
    }
    fs::rename(from, to).map_err(|e| format!("Failed to rename: {}", e))
}
