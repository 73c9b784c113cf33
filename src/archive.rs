//! Archive extraction for release and style downloads

use crate::errors::{Result, ValeError};
use crate::platform::ArchiveFormat;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Unpack `bytes` into `dest`
///
/// Runs on the blocking pool; both decoders are synchronous.
pub async fn extract(format: ArchiveFormat, bytes: Vec<u8>, dest: &Path) -> Result<()> {
    let dest = dest.to_path_buf();
    tokio::task::spawn_blocking(move || extract_sync(format, &bytes, &dest))
        .await
        .map_err(|e| ValeError::ExtractionFailure(format!("extraction task failed: {}", e)))?
}

fn extract_sync(format: ArchiveFormat, bytes: &[u8], dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest)?;
    match format {
        ArchiveFormat::Zip => {
            let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
            tracing::debug!(
                "Extracting {} zip entries to {}",
                archive.len(),
                dest.display()
            );
            archive.extract(dest)?;
        }
        ArchiveFormat::TarGz => {
            let decoder = flate2::read::GzDecoder::new(Cursor::new(bytes));
            let mut archive = tar::Archive::new(decoder);
            archive
                .unpack(dest)
                .map_err(|e| ValeError::ExtractionFailure(format!("tar.gz: {}", e)))?;
            tracing::debug!("Extracted tar.gz to {}", dest.display());
        }
    }
    Ok(())
}

/// Find the first regular file called `name` anywhere under `dir`
pub fn find_file(dir: &Path, name: &str) -> Option<PathBuf> {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .flatten()
        .find(|e| e.file_type().is_file() && e.file_name() == name)
        .map(|e| e.into_path())
}
