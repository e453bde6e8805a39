use anyhow::{Context, Result};
use std::path::Path;

/// Open a URL in the user's default browser
///
/// # Errors
/// Returns error if browser cannot be opened (e.g., no browser available)
pub fn open_url(url: &str) -> Result<()> {
    webbrowser::open(url)
        .with_context(|| format!("Failed to open browser for URL: {}", url))?;
    Ok(())
}

/// `file://` URL for an existing local file.
pub fn file_url(path: &Path) -> Result<String> {
    let absolute = path
        .canonicalize()
        .with_context(|| format!("{} does not exist", path.display()))?;
    Ok(format!("file://{}", absolute.display()))
}

/// Open a local file (a student sheet) with the default handler.
pub fn open_path(path: &Path) -> Result<()> {
    open_url(&file_url(path)?)
}
