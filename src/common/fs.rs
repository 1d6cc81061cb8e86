//! Common file system operations

use std::fs;
use std::io::Write;
use std::path::Path;

use walkdir::WalkDir;

/// Write `contents` to `path` without ever leaving a truncated file behind
///
/// The data goes to a temporary file in the destination directory first and
/// is then renamed over `path`.
pub fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(contents)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;

    Ok(())
}

/// Copy a directory recursively
pub fn copy_dir_recursive<P1, P2>(src: P1, dst: P2) -> std::io::Result<()>
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
{
    let src_ref = src.as_ref();
    let dst_ref = dst.as_ref();

    if !dst_ref.exists() {
        fs::create_dir_all(dst_ref)?;
    }

    for entry in fs::read_dir(src_ref)? {
        let entry = entry?;
        let entry_path = entry.path();
        let dst_path = dst_ref.join(entry.file_name());

        if entry_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&entry_path, &dst_path)?;
        } else {
            fs::copy(&entry_path, &dst_path)?;
        }
    }

    Ok(())
}

/// Add executable bits to every regular file below `dir`
///
/// Files that already carry the bits are left untouched. Returns the number
/// of files visited.
#[cfg(unix)]
pub fn mark_executable(dir: &Path) -> std::io::Result<usize> {
    use std::os::unix::fs::PermissionsExt;

    let mut visited = 0;
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry.map_err(std::io::Error::other)?;
        if !entry.file_type().is_file() {
            continue;
        }

        let metadata = entry.metadata().map_err(std::io::Error::other)?;
        let mode = metadata.permissions().mode();
        if mode & 0o111 != 0o111 {
            fs::set_permissions(entry.path(), fs::Permissions::from_mode(mode | 0o111))?;
        }
        visited += 1;
    }

    Ok(visited)
}

/// Executable bits do not exist on this platform; only counts the files
#[cfg(not(unix))]
pub fn mark_executable(dir: &Path) -> std::io::Result<usize> {
    let mut visited = 0;
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(std::io::Error::other)?;
        if entry.file_type().is_file() {
            visited += 1;
        }
    }
    Ok(visited)
}
