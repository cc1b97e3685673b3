//! Test fixtures: credential files, roster records and mock responses.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use httpmock::Then;
use serde_json::{Value, json};

/// Write `contents` to an `access_token` file inside `dir`.
///
/// # Errors
///
/// Returns an error when the file cannot be written.
pub fn write_token_file(dir: &Path, contents: &str) -> Result<PathBuf> {
    let path = dir.join("access_token");
    fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

/// Minimal student record as returned by the course users endpoint.
#[must_use]
pub fn student(id: u64, sortable_name: &str) -> Value {
    json!({ "id": id, "sortable_name": sortable_name })
}

/// Value of a `Link` header pointing at `next`.
#[must_use]
pub fn next_link_header(next: &str) -> String {
    format!("<{next}>; rel=\"next\"")
}

/// Respond with `status` and a JSON `body`.
pub fn json_response(then: Then, status: u16, body: &Value) -> Then {
    then.status(status)
        .header("content-type", "application/json")
        .json_body(body.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_file_round_trips_contents() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_token_file(dir.path(), "abc\n")?;
        assert_eq!(path, dir.path().join("access_token"));
        assert_eq!(fs::read_to_string(&path)?, "abc\n");
        Ok(())
    }

    #[test]
    fn next_link_header_marks_relation() {
        assert_eq!(
            next_link_header("http://127.0.0.1/a?page=2"),
            "<http://127.0.0.1/a?page=2>; rel=\"next\""
        );
    }
}
