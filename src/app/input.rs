use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use serde_json::Value;

use super::AppError;

/// Read a JSON document from `path`, or from stdin when `path` is `-`.
pub(crate) fn read_json(path: &Path) -> Result<Value, AppError> {
    if path.as_os_str() == "-" {
        return Ok(serde_json::from_reader(io::stdin().lock())?);
    }
    let file = File::open(path).map_err(|source| AppError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"usage": {"total_tokens": 10}}"#).unwrap();
        let value = read_json(file.path()).unwrap();
        assert_eq!(value["usage"]["total_tokens"], 10);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_json(Path::new("/nonexistent/response.json")).unwrap_err();
        assert!(matches!(err, AppError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/response.json"));
    }

    #[test]
    fn malformed_file_is_json_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{not json").unwrap();
        assert!(matches!(read_json(file.path()), Err(AppError::Json(_))));
    }
}
