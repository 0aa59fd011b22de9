pub mod config;
pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Read a typed JSON document from `--input <file>` or, failing that, from
/// piped stdin.
pub fn read_input<T: DeserializeOwned>(
    path: Option<&str>,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return file::read_json(path);
    }
    match stdin::read_stdin()? {
        Some(value) => serde_json::from_value(value)
            .map_err(|e| format!("Invalid {what} on stdin: {e}").into()),
        None => Err(format!("--input is required (or pipe a {what} as JSON on stdin)").into()),
    }
}
