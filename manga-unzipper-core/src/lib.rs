#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::env;

use camino::{Utf8Path, Utf8PathBuf};
use futures::future::join_all;
use tokio::{runtime::Handle, task::JoinHandle};
use tracing::{error, info, warn};

pub use crate::errors::{Error, Result};
pub use crate::input::ArchivePaths;
pub use crate::pdf::{PageGeometry, Placement};
pub use crate::workspace::Workspace;

pub mod archive;
pub mod errors;
pub mod image;
pub mod input;
pub mod pages;
pub mod pdf;
pub mod workspace;

#[derive(Debug, Clone)]
pub struct Config {
    /// Root under which the `manga-unzipper` workspaces folder is created
    pub temp_root: Utf8PathBuf,
    /// Delete each job workspace once the job is over
    pub cleanup_workspace: bool,
}

impl Config {
    /// Default config rooted in the platform temp directory
    ///
    /// ## Errors
    ///
    /// Fails if the temp directory isn't a valid utf-8 path
    pub fn from_env() -> Result<Self> {
        let temp_root = Utf8PathBuf::from_path_buf(env::temp_dir())
            .map_err(|path| Error::NonUtf8Path(path.display().to_string()))?;

        Ok(Self::with_temp_root(temp_root))
    }

    #[must_use]
    pub fn with_temp_root(temp_root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            temp_root: temp_root.into(),
            cleanup_workspace: false,
        }
    }
}

/// Name of the produced pdf: the archive file name up to its first dot,
/// `vol.1.zip` gives `vol`
#[must_use]
pub fn document_name(archive: &Utf8Path) -> &str {
    archive
        .file_name()
        .and_then(|file_name| file_name.split('.').next())
        .unwrap_or_default()
}

#[derive(Debug)]
pub struct JobOutcome {
    pub archive: Utf8PathBuf,
    /// Path of the written pdf on success
    pub result: Result<Utf8PathBuf>,
}

/// Jobs dispatched by `MangaUnzipper::unzip_manga`.
/// Dropping it leaves the jobs running in the background.
#[derive(Debug)]
pub struct Batch {
    jobs: Vec<(Utf8PathBuf, JoinHandle<Result<Utf8PathBuf>>)>,
}

impl Batch {
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Waits for every job, outcomes are returned in the order the archives were given
    pub async fn join(self) -> Vec<JobOutcome> {
        let (archives, handles): (Vec<_>, Vec<_>) = self.jobs.into_iter().unzip();

        archives
            .into_iter()
            .zip(join_all(handles).await)
            .map(|(archive, res)| JobOutcome {
                archive,
                result: res.map_err(Error::from).and_then(|res| res),
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct MangaUnzipper {
    config: Config,
}

impl MangaUnzipper {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Converts every archive into `<outdir>/<name>.pdf`, each one in its own job.
    ///
    /// Returns as soon as the jobs are dispatched. A failing job is logged and
    /// doesn't affect the others; the returned `Batch` can be joined to get every outcome.
    ///
    /// ## Errors
    ///
    /// Fails without dispatching anything if called outside of a tokio runtime
    pub fn unzip_manga(
        &self,
        archives: impl Into<ArchivePaths>,
        outdir: impl Into<Utf8PathBuf>,
    ) -> Result<Batch> {
        let runtime = Handle::try_current()?;
        let outdir = outdir.into();
        let jobs = archives
            .into()
            .into_vec()
            .into_iter()
            .map(|archive| {
                let unzipper = self.clone();
                let outdir = outdir.clone();
                let job_archive = archive.clone();
                let handle = runtime.spawn_blocking(move || {
                    let res = unzipper.convert(&job_archive, &outdir);
                    if let Err(err) = &res {
                        error!("{job_archive}: {err}");
                    }
                    res
                });

                (archive, handle)
            })
            .collect();

        Ok(Batch { jobs })
    }

    /// Converts a single archive, validate -> extract -> collect -> compose.
    /// Returns the path of the written pdf.
    ///
    /// ## Errors
    ///
    /// Any failing stage aborts the conversion and its error is returned as is
    pub fn convert(&self, archive: &Utf8Path, outdir: &Utf8Path) -> Result<Utf8PathBuf> {
        if !archive.exists() {
            return Err(Error::PathNotFound(archive.to_path_buf()));
        }

        let workspace = Workspace::new(&self.config.temp_root);
        let res = convert_in(archive, outdir, &workspace);

        if self.config.cleanup_workspace {
            if let Err(err) = workspace.remove() {
                warn!("couldn't remove workspace {}: {err}", workspace.path());
            }
        }

        res
    }
}

fn convert_in(
    archive: &Utf8Path,
    outdir: &Utf8Path,
    workspace: &Workspace,
) -> Result<Utf8PathBuf> {
    archive::extract(archive, workspace)?;
    info!("extract to {}", workspace.path());

    let pages = pages::collect(workspace.path())?;

    pdf::compose(&pages, outdir, document_name(archive), PageGeometry::A4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_name_stops_at_first_dot() {
        assert_eq!(document_name(Utf8Path::new("chapter1.zip")), "chapter1");
        assert_eq!(document_name(Utf8Path::new("/mangas/vol.1.zip")), "vol");
        assert_eq!(document_name(Utf8Path::new("my.manga.v2.zip")), "my");
        assert_eq!(document_name(Utf8Path::new("noext")), "noext");
    }

    #[test]
    fn config_defaults() {
        let config = Config::with_temp_root("/tmp");

        assert_eq!(config.temp_root, Utf8PathBuf::from("/tmp"));
        assert!(!config.cleanup_workspace);
    }

    #[test]
    fn dispatch_needs_a_runtime() {
        let unzipper = MangaUnzipper::new(Config::with_temp_root("/tmp"));

        assert!(matches!(
            unzipper.unzip_manga("chapter1.zip", "/out"),
            Err(Error::NoRuntime(_))
        ));
    }
}
