//! Directory copy and removal helpers.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

#[cfg(unix)]
use std::os::unix::fs::symlink;

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Copy a directory tree, creating `dest` as needed.
///
/// Symlinks inside the tree are recreated as symlinks, never dereferenced.
pub fn copy_dir(src: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(src).follow_links(false) {
        let entry = entry.map_err(|error| {
            let path = error
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| src.to_path_buf());
            Error::StoreRead {
                path,
                source: io::Error::from(error),
            }
        })?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|error| write_error(&target, error))?;
        } else if entry.file_type().is_symlink() {
            copy_link(entry.path(), &target)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target).map_err(|error| write_error(&target, error))?;
        }
    }
    Ok(())
}

/// Recreate a symlink at `target` pointing where `link` points.
#[cfg(unix)]
fn copy_link(link: &Path, target: &Path) -> Result<()> {
    let destination = fs::read_link(link).map_err(|error| Error::StoreRead {
        path: link.to_path_buf(),
        source: error,
    })?;
    symlink(destination, target).map_err(|error| write_error(target, error))
}

/// Skip symlinks where they cannot be recreated without extra privileges.
#[cfg(not(unix))]
fn copy_link(_link: &Path, _target: &Path) -> Result<()> {
    Ok(())
}

/// Remove every entry directly inside a directory, keeping the directory.
pub fn clear_dir(dir: &Path) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|error| Error::StoreRead {
        path: dir.to_path_buf(),
        source: error,
    })?;
    for entry in entries {
        let entry = entry.map_err(|error| Error::StoreRead {
            path: dir.to_path_buf(),
            source: error,
        })?;
        remove_path(&entry.path())?;
    }
    Ok(())
}

/// Remove a file, symlink, or directory tree if it exists.
pub fn remove_path(path: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(error) => return Err(write_error(path, error)),
    };
    let removed = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    removed.map_err(|error| write_error(path, error))
}

/// Build a write error for a path.
fn write_error(path: &Path, source: io::Error) -> Error {
    Error::StoreWrite {
        path: PathBuf::from(path),
        source,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::{clear_dir, copy_dir, remove_path};

    #[test]
    fn copies_nested_files_verbatim() {
        let dir = tempdir().expect("tempdir");
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("scripts")).expect("create src");
        fs::write(src.join("SKILL.md"), "---\nname: a\n---\n").expect("write skill");
        fs::write(src.join("scripts").join("run.sh"), [0u8, 159, 146, 150]).expect("write script");

        let dest = dir.path().join("dest");
        copy_dir(&src, &dest).expect("copy");

        assert_eq!(
            fs::read(dest.join("scripts").join("run.sh")).expect("read"),
            vec![0u8, 159, 146, 150]
        );
        assert_eq!(
            fs::read_to_string(dest.join("SKILL.md")).expect("read"),
            "---\nname: a\n---\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn keeps_symlinks_as_links() {
        use std::{os::unix::fs::symlink, path::Path};

        let dir = tempdir().expect("tempdir");
        let private = dir.path().join("private");
        fs::create_dir_all(&private).expect("create private");
        fs::write(private.join("id_rsa"), "SECRET").expect("write secret");
        let src = dir.path().join("src");
        fs::create_dir_all(&src).expect("create src");
        fs::write(src.join("SKILL.md"), "body").expect("write skill");
        symlink(&private, src.join("link")).expect("link dir");
        symlink("SKILL.md", src.join("alias.md")).expect("link file");

        let dest = dir.path().join("dest");
        copy_dir(&src, &dest).expect("copy");

        let link = dest.join("link");
        assert!(fs::symlink_metadata(&link).expect("stat").file_type().is_symlink());
        assert_eq!(fs::read_link(&link).expect("read link"), private);
        assert_eq!(
            fs::read_link(dest.join("alias.md")).expect("read link"),
            Path::new("SKILL.md")
        );
        assert_eq!(fs::read_to_string(dest.join("alias.md")).expect("read"), "body");
    }

    #[test]
    fn clears_files_and_directories() {
        let dir = tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("old-skill").join("nested")).expect("create");
        fs::write(dir.path().join("stray.txt"), "x").expect("write");

        clear_dir(dir.path()).expect("clear");
        assert_eq!(fs::read_dir(dir.path()).expect("read").count(), 0);
    }

    #[test]
    fn removing_missing_path_is_ok() {
        let dir = tempdir().expect("tempdir");
        remove_path(&dir.path().join("missing")).expect("remove");
    }
}
