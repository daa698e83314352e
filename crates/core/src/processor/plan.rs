//! Turning discovered groups into work units.

use std::path::{Path, PathBuf};

use crate::discovery::VobGroup;

use super::types::{OutputMode, WorkUnit};

/// Output name used when none is given and the input has no usable base name.
const FALLBACK_OUTPUT_NAME: &str = "dvd.mp4";

/// Builds the work units for `groups` under the given output mode.
///
/// Returns an empty list when there is nothing to convert.
pub fn plan_units(groups: &[VobGroup], mode: &OutputMode) -> Vec<WorkUnit> {
    if groups.is_empty() {
        return Vec::new();
    }

    match mode {
        OutputMode::Split { output_dir } => groups
            .iter()
            .map(|group| WorkUnit {
                label: group.prefix.clone(),
                sources: group.files(),
                output_path: output_dir.join(group.output_file_name()),
            })
            .collect(),
        OutputMode::Combined { output_path } => {
            let label = output_path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "combined".to_string());

            vec![WorkUnit {
                label,
                sources: groups.iter().flat_map(VobGroup::files).collect(),
                output_path: output_path.clone(),
            }]
        }
    }
}

/// `<input dir name>.mp4` inside `cwd`.
pub fn default_combined_output(input_dir: &Path, cwd: &Path) -> PathBuf {
    let name = input_dir
        .file_name()
        .map(|n| format!("{}.mp4", n.to_string_lossy()))
        .unwrap_or_else(|| FALLBACK_OUTPUT_NAME.to_string());
    cwd.join(name)
}
