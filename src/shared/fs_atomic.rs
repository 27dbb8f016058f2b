use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

fn staging_path(target: &Path) -> std::io::Result<PathBuf> {
    let parent = target
        .parent()
        .ok_or_else(|| std::io::Error::other("snapshot path has no parent directory"))?;
    let file_name = target
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("snapshot");
    let stamp = chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default();
    Ok(parent.join(format!(".{file_name}.{}.{stamp}.tmp", std::process::id())))
}

// Readers of `path` see either the previous blob or the new one, never a torn write.
pub fn atomic_write_file(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let staging = staging_path(path)?;
    let written = fs::OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(&staging)
        .and_then(|mut file| {
            file.write_all(content)?;
            file.sync_all()
        });
    if let Err(err) = written {
        let _ = fs::remove_file(&staging);
        return Err(err);
    }
    if let Err(err) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(err);
    }
    Ok(())
}
