use std::{fs, io};

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;
use uuid::Uuid;

use crate::Result;

/// Name of the folder grouping every job workspace under the temp root
pub static WORKSPACES_DIR: &str = "manga-unzipper";

/// The folder a single job extracts its pages into, named after a fresh id
#[derive(Debug, Clone)]
pub struct Workspace {
    id: String,
    path: Utf8PathBuf,
}

impl Workspace {
    #[must_use]
    pub fn new(temp_root: &Utf8Path) -> Self {
        let id = Uuid::new_v4().simple().to_string();
        let path = temp_root.join(WORKSPACES_DIR).join(&id);

        Self { id, path }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Creates the shared workspaces folder if needed, then this workspace
    ///
    /// ## Errors
    ///
    /// Fails if either folder can't be created
    pub fn create(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::create_dir(&self.path)?;
        debug!("created workspace {}", self.path);

        Ok(())
    }

    /// Deletes the workspace and everything extracted into it
    ///
    /// ## Errors
    ///
    /// Fails if the folder exists but can't be removed
    pub fn remove(&self) -> Result<()> {
        match fs::remove_dir_all(&self.path) {
            Ok(()) => {
                debug!("removed workspace {}", self.path);
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
