//! Sample-name extraction from PAF file paths (§6 "File naming").
//!
//! Convention: `<anything>_<sample>.<ext>`; the sample label is the suffix
//! after the last `_` of the basename stem (the file name with its extension
//! removed).

use crate::error::IngestError;
use std::path::Path;

pub fn extract_sample_name(path: &Path) -> Result<String, IngestError> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| IngestError::NoSampleName { path: path.to_owned() })?;

    stem.rsplit('_')
        .next()
        .filter(|label| !label.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| IngestError::NoSampleName { path: path.to_owned() })
}
