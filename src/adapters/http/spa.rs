//! Static single-page application serving.

use std::path::Path;

use tower_http::services::{ServeDir, ServeFile};

/// Entry document served for any path that is not a static asset.
pub const INDEX_FILE: &str = "index.html";

/// Serves files from `dir`, answering unknown paths with `dir/index.html`
/// so client-side routes resolve on reload.
pub fn spa_service(dir: &Path) -> ServeDir<ServeFile> {
    ServeDir::new(dir).fallback(ServeFile::new(dir.join(INDEX_FILE)))
}
