use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use reachgeom::api::{draw_reaches, MeanderCfg, RangePolicy, ReachGeometry, SynthReplay};
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

mod points;
mod provenance;

use provenance::{ReachCounts, Sidecar};

#[derive(Parser)]
#[command(name = "reachgeom")]
#[command(about = "Reach geometry inspection and chainage conversion")]
struct Cmd {
    /// Optional run tag; propagated to outputs and logs
    #[arg(long)]
    tag: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Summarize a reach file (counts, chainage span, geometric length)
    Inspect {
        #[arg(long)]
        input: PathBuf,
    },
    /// Convert chainages to geometric distances (or back with --inverse)
    Convert {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        values: Vec<f64>,
        #[arg(long)]
        inverse: bool,
        #[arg(long, value_enum, default_value_t = Policy::Clamp)]
        policy: Policy,
    },
    /// Build the reach polyline from a CSV point table and write it as JSON
    Polyline {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Write a synthetic reach file
    Synth {
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 0)]
        index: u64,
        #[arg(long, default_value_t = 1)]
        reaches: usize,
        #[arg(long, default_value_t = 40)]
        digipoints: usize,
        #[arg(long)]
        out: PathBuf,
    },
}

/// Out-of-range behavior for `convert`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Policy {
    Clamp,
    Strict,
}

impl From<Policy> for RangePolicy {
    fn from(p: Policy) -> Self {
        match p {
            Policy::Clamp => RangePolicy::Clamp,
            Policy::Strict => RangePolicy::Strict,
        }
    }
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Inspect { input } => {
            let summary = inspect(&input, cmd.tag.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        Action::Convert {
            input,
            values,
            inverse,
            policy,
        } => {
            let rows = convert(&input, &values, inverse, policy.into(), cmd.tag.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&rows)?);
            Ok(())
        }
        Action::Polyline { input, out } => polyline(&input, &out, cmd.tag),
        Action::Synth {
            seed,
            index,
            reaches,
            digipoints,
            out,
        } => synth(seed, index, reaches, digipoints, &out, cmd.tag),
    }
}

#[derive(Debug, Serialize)]
struct Summary {
    reaches: usize,
    #[serde(flatten)]
    counts: ReachCounts,
}

#[derive(Debug, Serialize, PartialEq)]
struct Conversion {
    input: f64,
    output: f64,
}

fn load_geometry(input: &Path) -> Result<(usize, ReachGeometry)> {
    let reaches = points::read_reaches_json(input)?;
    let geometry = ReachGeometry::from_engine_reaches(&reaches)
        .with_context(|| format!("building reach geometry from {}", input.display()))?;
    Ok((reaches.len(), geometry))
}

fn inspect(input: &Path, tag: Option<&str>) -> Result<Summary> {
    tracing::info!(input = %input.display(), tag, "inspect");
    let (reaches, g) = load_geometry(input)?;
    Ok(Summary {
        reaches,
        counts: ReachCounts::of(&g),
    })
}

fn convert(
    input: &Path,
    values: &[f64],
    inverse: bool,
    policy: RangePolicy,
    tag: Option<&str>,
) -> Result<Vec<Conversion>> {
    tracing::info!(
        input = %input.display(),
        n = values.len(),
        inverse,
        policy = ?policy,
        tag,
        "convert"
    );
    let (_, g) = load_geometry(input)?;
    let table = g.table();
    values
        .iter()
        .map(|&v| {
            let output = if inverse {
                table.chainage_at(v, policy)
            } else {
                table.distance_at(v, policy)
            };
            Ok(Conversion {
                input: v,
                output: output?,
            })
        })
        .collect()
}

fn polyline(input: &Path, out: &Path, tag: Option<String>) -> Result<()> {
    tracing::info!(input = %input.display(), out = %out.display(), tag = ?tag, "polyline");
    let pts = points::read_points_csv(input)?;
    let g = ReachGeometry::new(pts)
        .with_context(|| format!("building reach geometry from {}", input.display()))?;
    let line = g
        .to_line_string()
        .with_context(|| format!("polyline for {}", input.display()))?;
    let vertices: Vec<(f64, f64)> = line.0.iter().map(|c| (c.x, c.y)).collect();
    tracing::info!(
        points = g.points().len(),
        vertices = vertices.len(),
        geometric_length = g.geometric_length(),
        "polyline_built"
    );
    let doc = json!({
        "vertices": vertices,
        "length": g.length(),
        "geometric_length": g.geometric_length(),
        "table": {
            "chainage": g.table().chainages(),
            "distance": g.table().distances(),
        }
    });
    write_output(out, &doc)?;
    Sidecar::new("polyline", tag)
        .input(input)?
        .geometry(None, &g)
        .write(out)?;
    Ok(())
}

fn synth(
    seed: u64,
    index: u64,
    reaches: usize,
    digipoints: usize,
    out: &Path,
    tag: Option<String>,
) -> Result<()> {
    tracing::info!(seed, index, reaches, digipoints, out = %out.display(), tag = ?tag, "synth");
    let cfg = MeanderCfg {
        digipoints,
        ..MeanderCfg::default()
    };
    let records = draw_reaches(cfg, SynthReplay { seed, index }, reaches);
    let merged = ReachGeometry::from_engine_reaches(&records)?;
    write_output(out, &records)?;
    Sidecar::new("synth", tag)
        .params(json!({
            "seed": seed,
            "index": index,
            "digipoints": digipoints,
            "step": cfg.step,
            "grid_every": cfg.grid_every,
        }))
        .geometry(Some(records.len()), &merged)
        .write(out)?;
    Ok(())
}

fn write_output<T: Serialize + ?Sized>(out: &Path, value: &T) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    std::fs::write(out, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", out.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn fixture_reaches(dir: &Path) -> PathBuf {
        let path = dir.join("reaches.json");
        fs::write(
            &path,
            r#"[
                {"name": "up",
                 "grid_points": [{"x": 0, "y": 0, "z": 0, "chainage": 0},
                                 {"x": 0.5, "y": 0.5, "z": 0.5, "chainage": 5}],
                 "digi_points": [{"x": 0, "y": 0, "z": 0, "m": 0}]},
                {"name": "down",
                 "grid_points": [{"x": 1, "y": 1, "z": 1, "chainage": 10}],
                 "digi_points": [{"x": 1, "y": 1, "z": 1, "m": 10}]}
            ]"#,
        )
        .unwrap();
        path
    }

    #[test]
    fn inspect_summarizes() {
        let dir = tempdir().unwrap();
        let s = inspect(&fixture_reaches(dir.path()), None).unwrap();
        assert_eq!(s.reaches, 2);
        let c = s.counts;
        assert_eq!(c.points, 3);
        assert_eq!(c.gridpoints, 3);
        assert_eq!(c.digipoints, 0);
        assert_eq!(c.length, 10.0);
        assert_eq!(c.geometric_length, 2f64.sqrt());
        assert_eq!(c.vertices, 3);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["reaches"], 2);
        assert_eq!(json["chainage_end"], 10.0);
    }

    #[test]
    fn convert_both_directions() {
        let dir = tempdir().unwrap();
        let input = fixture_reaches(dir.path());
        let fwd = convert(&input, &[5.0, 10.0], false, RangePolicy::Clamp, None).unwrap();
        assert_eq!(fwd[0].output, 0.5f64.sqrt());
        assert_eq!(fwd[1].output, 2f64.sqrt());
        let inv = convert(&input, &[2f64.sqrt()], true, RangePolicy::Strict, None).unwrap();
        assert_eq!(
            inv,
            vec![Conversion {
                input: 2f64.sqrt(),
                output: 10.0
            }]
        );
        assert!(convert(&input, &[11.0], false, RangePolicy::Strict, None).is_err());
        let clamped = convert(&input, &[11.0], false, RangePolicy::Clamp, None).unwrap();
        assert_eq!(clamped[0].output, 2f64.sqrt());
    }

    #[test]
    fn polyline_writes_output_and_provenance() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("points.csv");
        fs::write(
            &input,
            "type,chainage,x,y,z\ndigi,0,0,0,0\ngrid,0,0,0,0\ngrid,5,0.5,0.5,0.5\ndigi,10,1,1,1\n",
        )
        .unwrap();
        let out = dir.path().join("out/polyline.json");
        polyline(&input, &out, Some("t1".into())).unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
        assert_eq!(doc["vertices"].as_array().unwrap().len(), 3);
        assert_eq!(doc["length"], 10.0);
        assert_eq!(doc["table"]["chainage"].as_array().unwrap().len(), 3);
        let prov: serde_json::Value = serde_json::from_slice(
            &fs::read(dir.path().join("out/polyline.provenance.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(prov["command"], "polyline");
        assert_eq!(prov["tag"], "t1");
        assert_eq!(prov["inputs"][0]["path"], input.to_string_lossy().as_ref());
        assert_eq!(prov["inputs"][0]["bytes"], fs::metadata(&input).unwrap().len());
        assert_eq!(prov["counts"]["points"], 3);
        assert_eq!(prov["counts"]["vertices"], 3);
        assert_eq!(prov["counts"]["length"], 10.0);
    }

    #[test]
    fn synth_round_trips_through_inspect() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("synth.json");
        synth(3, 1, 3, 25, &out, None).unwrap();
        let prov: serde_json::Value =
            serde_json::from_slice(&fs::read(dir.path().join("synth.provenance.json")).unwrap())
                .unwrap();
        let s = inspect(&out, Some("check")).unwrap();
        assert_eq!(s.reaches, 3);
        let c = s.counts;
        assert_eq!(c.digipoints, 25);
        assert!(c.geometric_length > 0.0);
        assert!((c.length - c.geometric_length).abs() < 1e-6);
        assert_eq!(prov["reaches"], 3);
        assert_eq!(prov["params"]["seed"], 3);
        assert_eq!(prov["counts"]["digipoints"], 25);
        assert_eq!(prov["counts"]["gridpoints"], c.gridpoints);
        assert!(prov["inputs"].as_array().unwrap().is_empty());
    }
}
