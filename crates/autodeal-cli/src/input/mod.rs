pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Load an input record from `--input`, else piped stdin, else its default.
pub fn load_or_default<T>(path: Option<&str>) -> Result<T, Box<dyn std::error::Error>>
where
    T: DeserializeOwned + Default,
{
    if let Some(path) = path {
        return file::read_input(path);
    }
    Ok(stdin::read_stdin()?.unwrap_or_default())
}

/// Load an input record that has no sensible default.
pub fn load_required<T: DeserializeOwned>(
    path: Option<&str>,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return file::read_input(path);
    }
    stdin::read_stdin()?
        .ok_or_else(|| format!("{what} requires --input <file> or JSON on stdin").into())
}
