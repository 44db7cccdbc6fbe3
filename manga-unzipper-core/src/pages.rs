use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use crate::{Error, Result};

/// Lists every file of the workspace `folder`, sorted by name.
///
/// Nothing is filtered here, extraction only ever writes images into a workspace.
/// Names are compared byte-wise, so `page10.jpg` comes before `page2.jpg`.
///
/// ## Errors
///
/// Fails if `folder` is missing, isn't a directory, can't be listed or is empty
pub fn collect(folder: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    if !folder.exists() {
        return Err(Error::WorkspaceMissing(folder.to_path_buf()));
    }
    if !folder.is_dir() {
        return Err(Error::NotADirectory(folder.to_path_buf()));
    }

    let mut file_names = fs::read_dir(folder)?
        .map(|entry| {
            let file_name = entry?.file_name();
            file_name
                .into_string()
                .map_err(|name| Error::NonUtf8Path(name.to_string_lossy().into_owned()))
        })
        .collect::<Result<Vec<_>>>()?;
    if file_names.is_empty() {
        return Err(Error::EmptyArchive(folder.to_path_buf()));
    }
    file_names.sort();

    Ok(file_names
        .into_iter()
        .map(|file_name| folder.join(file_name))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Utf8Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), b"").unwrap();
        }
    }

    #[test]
    fn pages_are_sorted_lexicographically() {
        let dir = tempfile::tempdir().unwrap();
        let dir = Utf8Path::from_path(dir.path()).unwrap();
        touch(dir, &["page2.jpg", "page10.jpg", "page1.jpg"]);

        let pages = collect(dir).unwrap();
        let names = pages
            .iter()
            .filter_map(|page| page.file_name())
            .collect::<Vec<_>>();

        assert_eq!(names, ["page1.jpg", "page10.jpg", "page2.jpg"]);
        assert!(pages.iter().all(|page| page.parent() == Some(dir)));
    }

    #[test]
    fn every_file_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let dir = Utf8Path::from_path(dir.path()).unwrap();
        touch(dir, &["b.txt", "a.jpg"]);

        assert_eq!(collect(dir).unwrap().len(), 2);
    }

    #[test]
    fn empty_folder() {
        let dir = tempfile::tempdir().unwrap();
        let dir = Utf8Path::from_path(dir.path()).unwrap();

        assert!(matches!(collect(dir), Err(Error::EmptyArchive(_))));
    }

    #[test]
    fn missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let missing = Utf8Path::from_path(dir.path()).unwrap().join("nope");

        assert!(matches!(collect(&missing), Err(Error::WorkspaceMissing(_))));
    }

    #[test]
    fn file_instead_of_folder() {
        let dir = tempfile::tempdir().unwrap();
        let dir = Utf8Path::from_path(dir.path()).unwrap();
        touch(dir, &["a.jpg"]);

        assert!(matches!(
            collect(&dir.join("a.jpg")),
            Err(Error::NotADirectory(_))
        ));
    }
}
