use std::{
    fs::{File, OpenOptions},
    io::{self, Read, Seek},
};

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;
use zip::{read::ZipFile, ZipArchive};

use crate::{errors::Error, workspace::Workspace, Result};

/// Extensions accepted as page images, matched case-sensitively
pub static IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "png", "bmp", "jpeg"];

/// Whether an entry base name is a page image.
///
/// The name is split on `.` and the token right after the first dot is looked up,
/// so `page.jpg` matches while `page.v2.jpg` and `photo.JPG` don't.
#[must_use]
pub fn is_image(file_name: &str) -> bool {
    let mut tokens = file_name.split('.');
    tokens.next();

    tokens
        .next()
        .is_some_and(|token| IMAGE_EXTENSIONS.contains(&token))
}

/// Only `.zip` archives are handled, the suffix check is case-sensitive
#[must_use]
pub fn is_zip(path: &Utf8Path) -> bool {
    path.extension() == Some("zip")
}

pub struct Entry<'a>(ZipFile<'a>);

impl<'a> Entry<'a> {
    #[must_use]
    pub fn path(&self) -> &str {
        self.0.name()
    }

    /// Name of the entry without its directories inside the archive
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        if self.0.is_dir() {
            return None;
        }

        Utf8Path::new(self.0.name()).file_name()
    }

    /// Writes the entry under `dir` using only its base name.
    /// Returns `None` if a file with the same name is already there.
    ///
    /// ## Errors
    ///
    /// Fails if the target file can't be created or the entry can't be read
    pub fn extract_to(&mut self, dir: &Utf8Path) -> Result<Option<Utf8PathBuf>> {
        let Some(name) = self.name() else {
            return Ok(None);
        };
        let target = dir.join(name);

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&target) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        io::copy(&mut self.0, &mut file)?;

        Ok(Some(target))
    }
}

#[derive(Debug)]
pub struct Reader<R> {
    archive: ZipArchive<R>,
}

impl<R> Reader<R>
where
    R: Read + Seek,
{
    /// Creates a `Reader` from a `Read`
    ///
    /// ## Errors
    ///
    /// Fails if the underlying `ZipArchive` can't be created
    pub fn from_reader(reader: R) -> Result<Self> {
        Ok(Self {
            archive: ZipArchive::new(reader)?,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads the entry stored at `index`
    ///
    /// ## Errors
    ///
    /// Fails if the entry header can't be read
    pub fn by_index(&mut self, index: usize) -> Result<Entry<'_>> {
        Ok(Entry(self.archive.by_index(index)?))
    }

    /// Extracts every page image, flattened, into `dir`.
    /// Returns the written paths in archive order.
    ///
    /// ## Errors
    ///
    /// Fails on the first entry that can't be read or written
    pub fn extract_images(&mut self, dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
        let mut extracted = Vec::new();

        for index in 0..self.len() {
            let mut entry = self.by_index(index)?;
            if !entry.name().is_some_and(is_image) {
                debug!("skipping {}", entry.path());
                continue;
            }
            match entry.extract_to(dir)? {
                Some(path) => {
                    debug!("extracted {}", entry.path());
                    extracted.push(path);
                }
                None => debug!("{} already extracted, skipping", entry.path()),
            }
        }

        Ok(extracted)
    }
}

impl Reader<File> {
    /// Creates a `Reader` from a path
    ///
    /// ## Errors
    ///
    /// Fails if the file can't be opened or isn't a zip archive
    pub fn from_path(path: impl AsRef<Utf8Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;

        Self::from_reader(file)
    }
}

/// Extracts the page images of the zip archive at `path` into the `workspace` folder.
///
/// ## Errors
///
/// Fails with `NotAZipFile` before touching the filesystem if `path` doesn't end in `.zip`,
/// any later failure is reported as `ExtractionFailed`
pub fn extract(path: &Utf8Path, workspace: &Workspace) -> Result<Vec<Utf8PathBuf>> {
    if !is_zip(path) {
        return Err(Error::NotAZipFile(path.to_path_buf()));
    }

    let extract = || {
        workspace.create()?;
        Reader::from_path(path)?.extract_images(workspace.path())
    };

    extract().map_err(|err| Error::extraction_failed(path, err))
}
