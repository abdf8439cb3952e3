//! Provenance sidecars for CLI outputs.
//!
//! Every file a command writes gets `<stem>.provenance.json` next to it. The
//! sidecar ties the numbers back to their sources:
//! - `inputs` / `outputs`: path, size in bytes, and modification time
//!   (unix seconds, when the filesystem reports one).
//! - `counts`: the reach geometry the command built (points by type,
//!   polyline vertices, chainage range, both lengths).
//! - `command`, `params`, `tag`, `crate_version`, `code_rev`, `callsite`.

use anyhow::{Context, Result};
use reachgeom::{GeometryError, ReachGeometry};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::UNIX_EPOCH;

/// Size and modification time of a file at the time it was read or written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileStamp {
    pub path: String,
    pub bytes: u64,
    pub modified_unix: Option<u64>,
}

impl FileStamp {
    pub fn of(path: &Path) -> Result<Self> {
        let meta = fs::metadata(path).with_context(|| format!("stat {}", path.display()))?;
        let modified_unix = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs());
        Ok(Self {
            path: path.to_string_lossy().into_owned(),
            bytes: meta.len(),
            modified_unix,
        })
    }
}

/// Shape of a built reach geometry, shared by `inspect` output and sidecars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReachCounts {
    pub points: usize,
    pub gridpoints: usize,
    pub digipoints: usize,
    pub vertices: usize,
    pub chainage_start: f64,
    pub chainage_end: f64,
    pub length: f64,
    pub geometric_length: f64,
}

impl ReachCounts {
    pub fn of(g: &ReachGeometry) -> Self {
        let chainages = g.chainages();
        let vertices = match g.to_line_string() {
            Ok(line) => line.0.len(),
            Err(GeometryError::DegenerateLine { vertices }) => vertices,
            Err(_) => 0,
        };
        Self {
            points: g.points().len(),
            gridpoints: g.gridpoints().len(),
            digipoints: g.digipoints().len(),
            vertices,
            chainage_start: chainages[0],
            chainage_end: chainages[chainages.len() - 1],
            length: g.length(),
            geometric_length: g.geometric_length(),
        }
    }
}

/// Sidecar under construction; `write` stamps the artifact and saves it.
#[derive(Debug)]
pub struct Sidecar {
    command: &'static str,
    tag: Option<String>,
    params: Value,
    inputs: Vec<FileStamp>,
    reaches: Option<usize>,
    counts: Option<ReachCounts>,
}

impl Sidecar {
    pub fn new(command: &'static str, tag: Option<String>) -> Self {
        Self {
            command,
            tag,
            params: Value::Null,
            inputs: Vec::new(),
            reaches: None,
            counts: None,
        }
    }

    pub fn params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }

    /// Record an input file; stamped now, before anything is written.
    pub fn input(mut self, path: &Path) -> Result<Self> {
        self.inputs.push(FileStamp::of(path)?);
        Ok(self)
    }

    /// Record the geometry the artifact was derived from.
    pub fn geometry(mut self, reaches: Option<usize>, g: &ReachGeometry) -> Self {
        self.reaches = reaches;
        self.counts = Some(ReachCounts::of(g));
        self
    }

    /// Write `<stem>.provenance.json` next to the already written `artifact`.
    #[track_caller]
    pub fn write(self, artifact: &Path) -> Result<PathBuf> {
        let callsite = Location::caller();
        let doc = SidecarDoc {
            command: self.command,
            tag: self.tag,
            crate_version: reachgeom::VERSION,
            code_rev: code_rev(),
            callsite: Callsite {
                file: callsite.file(),
                line: callsite.line(),
            },
            params: self.params,
            inputs: self.inputs,
            outputs: vec![FileStamp::of(artifact)?],
            reaches: self.reaches,
            counts: self.counts,
        };
        let path = sidecar_path(artifact);
        fs::write(&path, serde_json::to_vec_pretty(&doc)?)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::debug!(path = %path.display(), command = doc.command, "provenance");
        Ok(path)
    }
}

#[derive(Serialize)]
struct Callsite {
    file: &'static str,
    line: u32,
}

#[derive(Serialize)]
struct SidecarDoc {
    command: &'static str,
    tag: Option<String>,
    crate_version: &'static str,
    code_rev: String,
    callsite: Callsite,
    params: Value,
    inputs: Vec<FileStamp>,
    outputs: Vec<FileStamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reaches: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    counts: Option<ReachCounts>,
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    artifact.with_extension("provenance.json")
}

/// `GIT_COMMIT` if set, else `git rev-parse HEAD`, else `"unknown"`.
fn code_rev() -> String {
    std::env::var("GIT_COMMIT")
        .ok()
        .filter(|rev| !rev.is_empty())
        .or_else(|| {
            let out = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
            out.status
                .success()
                .then(|| String::from_utf8_lossy(&out.stdout).trim().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}
