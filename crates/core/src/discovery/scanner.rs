//! Input directory scanning.

use regex_lite::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;
use tokio::fs;
use tracing::debug;

use super::types::{VobGroup, VobSegment};
use super::DiscoveryError;

static VOB_FILE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^VTS_(\d{2})_(\d+)\.VOB$").expect("VOB file name pattern"));

/// Splits `VTS_<NN>_<N>.VOB` into its title set and segment numbers.
pub fn parse_vob_file_name(name: &str) -> Option<(u8, u32)> {
    let caps = VOB_FILE_NAME.captures(name)?;
    let title_set = caps[1].parse().ok()?;
    let segment = caps[2].parse().ok()?;
    Some((title_set, segment))
}

/// Finds every VTS group in `dir`, sorted by prefix.
///
/// Sidecar files (`.IFO`, `.BUP`, `VIDEO_TS.VOB`) and directories are
/// ignored. An empty result is not an error.
pub async fn discover_groups(dir: &Path) -> Result<Vec<VobGroup>, DiscoveryError> {
    let unreadable = |source: std::io::Error| DiscoveryError::Unreadable {
        path: dir.to_path_buf(),
        source,
    };

    let meta = fs::metadata(dir).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DiscoveryError::InputNotFound {
                path: dir.to_path_buf(),
            }
        } else {
            unreadable(e)
        }
    })?;

    if !meta.is_dir() {
        return Err(DiscoveryError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let mut entries = fs::read_dir(dir).await.map_err(unreadable)?;
    let mut by_prefix: BTreeMap<String, Vec<VobSegment>> = BTreeMap::new();

    while let Some(entry) = entries.next_entry().await.map_err(unreadable)? {
        let file_name = entry.file_name();
        let Some((title_set, segment)) = file_name.to_str().and_then(parse_vob_file_name) else {
            continue;
        };

        // Follow symlinks; skip anything that is not a regular file
        let is_file = fs::metadata(entry.path())
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            debug!(path = %entry.path().display(), "Skipping non-file VOB entry");
            continue;
        }

        let segment = VobSegment {
            path: entry.path(),
            title_set,
            segment,
        };
        by_prefix.entry(segment.prefix()).or_default().push(segment);
    }

    let groups: Vec<VobGroup> = by_prefix
        .into_iter()
        .map(|(prefix, segments)| VobGroup::new(prefix, segments))
        .collect();

    debug!(
        dir = %dir.display(),
        groups = groups.len(),
        "Discovered VTS groups"
    );

    Ok(groups)
}
