// Write the merged document to a timestamped file

use crate::error::MergeError;
use chrono::NaiveDateTime;
use std::io::Write;
use std::path::{Path, PathBuf};

/// `output_YYYYMMDD_HHMMSS.html` for the given local wall-clock time.
pub fn output_file_name(timestamp: NaiveDateTime) -> String {
    format!("output_{}.html", timestamp.format("%Y%m%d_%H%M%S"))
}

/// Write `html` to `dir/output_<timestamp>.html`.
///
/// The content is written to a temporary file in `dir` first and then moved
/// into place, so a failed write never leaves a partial output behind. An
/// existing file with the same name is not overwritten.
pub fn write_output(
    dir: &Path,
    html: &str,
    timestamp: NaiveDateTime,
) -> Result<PathBuf, MergeError> {
    let path = dir.join(output_file_name(timestamp));
    let write_err = |source| MergeError::OutputWrite {
        path: path.clone(),
        source,
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".formgraft-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(write_err)?;
    tmp.write_all(html.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;

    match tmp.persist_noclobber(&path) {
        Ok(_) => Ok(path),
        Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => {
            Err(MergeError::OutputExists(path))
        }
        Err(e) => Err(write_err(e.error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 7)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_file_name_pattern() {
        assert_eq!(output_file_name(at(9, 5, 1)), "output_20250307_090501.html");
    }

    #[test]
    fn test_write_then_refuse_overwrite() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_output(dir.path(), "<p>one</p>", at(12, 0, 0)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<p>one</p>");

        let err = write_output(dir.path(), "<p>two</p>", at(12, 0, 0)).unwrap_err();
        assert!(matches!(err, MergeError::OutputExists(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "<p>one</p>");

        // No temporary files left behind
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["output_20250307_120000.html".to_string()]);
    }

    #[test]
    fn test_missing_directory_is_write_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = write_output(&missing, "x", at(1, 2, 3)).unwrap_err();
        assert!(matches!(err, MergeError::OutputWrite { .. }));
    }
}
