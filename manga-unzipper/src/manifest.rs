use std::fs;

use anyhow::{anyhow, Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use manga_unzipper_core::ArchivePaths;
use serde_json::Value;

#[derive(Debug)]
pub struct Manifest {
    pub archives: ArchivePaths,
    pub outdir: Option<Utf8PathBuf>,
}

impl Manifest {
    pub fn from_path(path: &Utf8Path) -> Result<Self> {
        let content = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;

        Self::parse(&content).with_context(|| format!("invalid manifest {path}"))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let Value::Object(mut fields) = serde_json::from_str::<Value>(content)? else {
            return Err(anyhow!("manifest must be a json object"));
        };
        let archives = fields
            .remove("archives")
            .ok_or_else(|| anyhow!("missing `archives` field"))?;
        let archives = ArchivePaths::try_from(archives)?;
        let outdir = match fields.remove("outdir") {
            None | Some(Value::Null) => None,
            Some(Value::String(outdir)) => Some(outdir.into()),
            Some(_) => return Err(anyhow!("`outdir` must be a string")),
        };

        Ok(Self { archives, outdir })
    }
}
