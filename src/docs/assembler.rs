use std::{
    fs::{self, File, Permissions},
    io::{self, ErrorKind, Write},
    path::Path,
};

use tempfile::NamedTempFile;

#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o644;

/// Joins component blocks with a single blank line, keeping their order.
pub fn assemble<S: AsRef<str>>(blocks: &[S]) -> String {
    blocks
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Replaces `path` with `content` without leaving a partial file behind.
///
/// The content goes to a temporary file in the destination directory which
/// is then renamed over the destination. Missing parent directories are
/// created. An existing destination keeps its permissions; a new one gets
/// `0o644` on Unix. On failure the temporary file is removed when it is
/// dropped.
///
/// # Errors
///
/// Returns the underlying I/O error.
pub fn write_atomically(path: &Path, content: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;

    let permissions = match fs::metadata(path) {
        Ok(existing) => existing.permissions(),
        Err(e) if e.kind() == ErrorKind::NotFound => new_file_permissions(temp.as_file())?,
        Err(e) => return Err(e),
    };
    temp.as_file().set_permissions(permissions)?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}

#[cfg(unix)]
fn new_file_permissions(_file: &File) -> io::Result<Permissions> {
    use std::os::unix::fs::PermissionsExt;

    Ok(Permissions::from_mode(NEW_FILE_MODE))
}

#[cfg(not(unix))]
fn new_file_permissions(file: &File) -> io::Result<Permissions> {
    Ok(file.metadata()?.permissions())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_are_separated_by_one_blank_line() {
        let document = assemble(&["== a\n", "== b\n"]);

        assert_eq!(document, "== a\n\n== b\n");
    }

    #[test]
    fn no_blocks_make_an_empty_document() {
        assert_eq!(assemble::<&str>(&[]), "");
    }

    #[test]
    fn overwrites_existing_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.adoc");
        fs::write(&path, "stale content that is longer than the new one").unwrap();

        write_atomically(&path, b"fresh").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh");
    }

    #[test]
    fn creates_missing_directories() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("docs/nested/out.adoc");

        write_atomically(&path, b"content").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn failed_write_leaves_no_temporary_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().join("occupied");
        fs::create_dir_all(target.join("child")).unwrap();

        assert!(write_atomically(&target, b"content").is_err());

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, [std::ffi::OsString::from("occupied")]);
    }

    #[cfg(unix)]
    #[test]
    fn new_files_are_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.adoc");

        write_atomically(&path, b"content").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn overwrite_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.adoc");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, Permissions::from_mode(0o664)).unwrap();

        write_atomically(&path, b"new").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o664);
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }
}
