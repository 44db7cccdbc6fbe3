use std::{error, io, result};

use camino::Utf8PathBuf;
use zip::result::ZipError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("input can only be a path or a list of paths, got {0}")]
    InvalidInputShape(String),

    #[error("file {0} not exists")]
    PathNotFound(Utf8PathBuf),

    #[error("{0} is not a zip file")]
    NotAZipFile(Utf8PathBuf),

    #[error("failed to unzip {path}")]
    ExtractionFailed {
        path: Utf8PathBuf,
        #[source]
        source: Box<dyn error::Error + Send + Sync>,
    },

    #[error("folder {0} doesn't exist")]
    WorkspaceMissing(Utf8PathBuf),

    #[error("{0} is not a folder")]
    NotADirectory(Utf8PathBuf),

    #[error("no image file in zip folder {0}")]
    EmptyArchive(Utf8PathBuf),

    #[error("output path {0} is not a folder")]
    OutputNotADirectory(Utf8PathBuf),

    #[error("{0} is not a valid utf-8 path")]
    NonUtf8Path(String),

    #[error("IO error {0}")]
    IO(#[from] io::Error),

    #[error("Zip error {0}")]
    Zip(#[from] ZipError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Pdf error: {0}")]
    Pdf(String),

    #[error("join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("no tokio runtime to run the jobs on: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

impl Error {
    pub(crate) fn extraction_failed(
        path: impl Into<Utf8PathBuf>,
        source: impl Into<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Self::ExtractionFailed {
            path: path.into(),
            source: source.into(),
        }
    }
}

pub type Result<T, E = Error> = result::Result<T, E>;
