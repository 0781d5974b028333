use std::path::{Component, Path, PathBuf};

/// Joins an untrusted relative name onto `base`, refusing anything that would
/// resolve outside of it.
///
/// Returns `None` for absolute paths, drive prefixes, backslashes, null bytes
/// and any `..` that climbs above `base`. `.` segments are dropped. The check
/// is purely lexical; symlinks inside `base` are not followed.
pub fn safe_join(base: &Path, name: &str) -> Option<PathBuf> {
    if name.contains('\\') || name.contains('\0') {
        return None;
    }

    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    let mut joined = base.to_path_buf();
    joined.extend(parts);
    Some(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_join_plain_names() {
        let base = Path::new("/srv/uploads");
        assert_eq!(
            safe_join(base, "photo.png"),
            Some(PathBuf::from("/srv/uploads/photo.png"))
        );
        assert_eq!(
            safe_join(base, "./photo.png"),
            Some(PathBuf::from("/srv/uploads/photo.png"))
        );
        assert_eq!(
            safe_join(base, "a/../photo.png"),
            Some(PathBuf::from("/srv/uploads/photo.png"))
        );
    }

    #[test]
    fn test_safe_join_rejects_traversal() {
        let base = Path::new("/srv/uploads");
        assert_eq!(safe_join(base, "../secret"), None);
        assert_eq!(safe_join(base, "../../etc/passwd"), None);
        assert_eq!(safe_join(base, "a/../../b"), None);
        assert_eq!(safe_join(base, ".."), None);
        assert_eq!(safe_join(base, "/etc/passwd"), None);
        assert_eq!(safe_join(base, "..\\windows"), None);
        assert_eq!(safe_join(base, "evil\0.txt"), None);
    }

    #[test]
    fn test_safe_join_relative_base() {
        let joined = safe_join(Path::new("uploads"), "file.txt").unwrap();
        assert_eq!(joined, PathBuf::from("uploads/file.txt"));
        assert!(joined.starts_with("uploads"));
    }
}
