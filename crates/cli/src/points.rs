//! Point-table and reach-file readers.
//!
//! - CSV point tables: columns `type,chainage,x,y,z`, where `type` is `grid`
//!   or `digi` (`gridpoint`/`digipoint` also accepted). Read lazily via polars.
//! - Reach files: JSON array of `ReachRecord`.

use anyhow::{anyhow, bail, Context, Result};
use polars::prelude::*;
use reachgeom::api::{ReachPoint, ReachPointType, ReachRecord};
use std::path::Path;

pub fn read_points_csv(path: &Path) -> Result<Vec<ReachPoint>> {
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(100))
        .finish()
        .with_context(|| format!("opening {}", path.display()))?
        .select([
            col("type"),
            col("chainage").cast(DataType::Float64),
            col("x").cast(DataType::Float64),
            col("y").cast(DataType::Float64),
            col("z").cast(DataType::Float64),
        ])
        .collect()
        .with_context(|| format!("reading {}", path.display()))?;
    tracing::info!(rows = df.height(), path = %path.display(), "point_table");

    let kinds = df.column("type")?.str()?;
    let chainage = df.column("chainage")?.f64()?;
    let x = df.column("x")?.f64()?;
    let y = df.column("y")?.f64()?;
    let z = df.column("z")?.f64()?;

    let mut out = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let kind = match kinds.get(i).map(str::trim) {
            Some("grid") | Some("gridpoint") => ReachPointType::GridPoint,
            Some("digi") | Some("digipoint") => ReachPointType::DigiPoint,
            other => bail!("row {i}: unsupported point type {other:?}"),
        };
        let field =
            |name: &str, v: Option<f64>| v.ok_or_else(|| anyhow!("row {i}: missing {name}"));
        out.push(ReachPoint::new(
            kind,
            field("chainage", chainage.get(i))?,
            field("x", x.get(i))?,
            field("y", y.get(i))?,
            field("z", z.get(i))?,
        ));
    }
    Ok(out)
}

pub fn read_reaches_json(path: &Path) -> Result<Vec<ReachRecord>> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let reaches: Vec<ReachRecord> = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing reaches from {}", path.display()))?;
    tracing::info!(reaches = reaches.len(), path = %path.display(), "reach_file");
    Ok(reaches)
}
