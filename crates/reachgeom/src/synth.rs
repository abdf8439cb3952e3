//! Synthetic meandering reaches (random walk + replay tokens).
//!
//! Purpose
//! - Deterministic reach data for tests, benchmarks and the CLI without an
//!   engine at hand. Output uses the same `ReachRecord` format the engine
//!   adapters consume.
//!
//! Model
//! - Digitized points follow a random walk with bounded heading jitter and
//!   step length; `m = start_chainage + chainage_scale * arc length`.
//! - Grid points sit at segment midpoints every `grid_every` segments, plus
//!   both reach ends, with interpolated chainage.
//! - Bed level `z` descends along chainage with small jitter; grid points sit
//!   `GRID_BED_OFFSET` below the digitized elevation, so a grid point never
//!   duplicates the digitized point it shares a location with.
//! - Determinism uses a replay token `(seed, index)` mixed into one RNG.

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::{DigiPointRecord, GridPointRecord, ReachRecord};

pub const GRID_BED_OFFSET: f64 = 0.5;

/// Meander sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct MeanderCfg {
    /// Number of digitized points (at least 2).
    pub digipoints: usize,
    /// Step length range `[min, max]` between digitized points.
    pub step: (f64, f64),
    /// Maximum heading change per step, radians.
    pub heading_jitter: f64,
    /// Chainage units per unit of planar distance.
    pub chainage_scale: f64,
    pub start_chainage: f64,
    /// Grid point every this many segments (at least 1).
    pub grid_every: usize,
    pub origin: (f64, f64),
    /// Bed level at the upstream end and its drop per chainage unit.
    pub bed_level: f64,
    pub bed_slope: f64,
}

impl Default for MeanderCfg {
    fn default() -> Self {
        Self {
            digipoints: 40,
            step: (10.0, 50.0),
            heading_jitter: 0.6,
            chainage_scale: 1.0,
            start_chainage: 0.0,
            grid_every: 3,
            origin: (0.0, 0.0),
            bed_level: 10.0,
            bed_slope: 1e-3,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, cheap and stable.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw one meandering reach.
pub fn draw_reach(cfg: MeanderCfg, tok: ReplayToken) -> ReachRecord {
    let mut rng = tok.to_std_rng();
    let n = cfg.digipoints.max(2);
    let (s_lo, s_hi) = (cfg.step.0.max(1e-6), cfg.step.1.max(cfg.step.0.max(1e-6)));
    let jitter = cfg.heading_jitter.abs();
    let mut heading = rng.gen::<f64>() * std::f64::consts::TAU;
    let mut pos = Vector2::new(cfg.origin.0, cfg.origin.1);
    let mut arc = 0.0;

    let z_at = |m: f64, rng: &mut StdRng| {
        let noise = (rng.gen::<f64>() - 0.5) * 0.01;
        cfg.bed_level - cfg.bed_slope * (m - cfg.start_chainage) + noise
    };

    let mut digi = Vec::with_capacity(n);
    let m0 = cfg.start_chainage;
    digi.push(DigiPointRecord {
        x: pos.x,
        y: pos.y,
        z: z_at(m0, &mut rng),
        m: m0,
    });
    for _ in 1..n {
        heading += (rng.gen::<f64>() * 2.0 - 1.0) * jitter;
        let step = if s_hi > s_lo {
            rng.gen_range(s_lo..s_hi)
        } else {
            s_lo
        };
        pos += Vector2::new(heading.cos(), heading.sin()) * step;
        arc += step;
        let m = cfg.start_chainage + cfg.chainage_scale * arc;
        digi.push(DigiPointRecord {
            x: pos.x,
            y: pos.y,
            z: z_at(m, &mut rng),
            m,
        });
    }

    let every = cfg.grid_every.max(1);
    let mut grid = Vec::new();
    grid.push(grid_at(&digi[0]));
    for k in (0..n - 1).step_by(every) {
        let (a, b) = (&digi[k], &digi[k + 1]);
        grid.push(GridPointRecord {
            x: 0.5 * (a.x + b.x),
            y: 0.5 * (a.y + b.y),
            z: 0.5 * (a.z + b.z) - GRID_BED_OFFSET,
            chainage: 0.5 * (a.m + b.m),
        });
    }
    grid.push(grid_at(&digi[n - 1]));

    ReachRecord {
        name: format!("synth-{}-{}", tok.seed, tok.index),
        grid_points: grid,
        digi_points: digi,
    }
}

/// Draw one meander and cut it into `parts` contiguous reaches.
///
/// Neighbouring reaches share their boundary digitized point, as engine
/// reaches of one river do. Grid points are those of the whole meander, each
/// assigned to the reach whose chainage range holds it, so merging the parts
/// rebuilds exactly the geometry of `draw_reach`.
pub fn draw_reaches(cfg: MeanderCfg, tok: ReplayToken, parts: usize) -> Vec<ReachRecord> {
    let whole = draw_reach(cfg, tok);
    let parts = parts.clamp(1, whole.digi_points.len() - 1);
    let n = whole.digi_points.len();
    let mut out = Vec::with_capacity(parts);
    for p in 0..parts {
        let lo = p * (n - 1) / parts;
        let hi = (p + 1) * (n - 1) / parts;
        let digi = whole.digi_points[lo..=hi].to_vec();
        let (m_lo, m_hi) = (digi[0].m, digi[digi.len() - 1].m);
        let grid: Vec<GridPointRecord> = whole
            .grid_points
            .iter()
            .copied()
            .filter(|g| g.chainage >= m_lo && g.chainage <= m_hi)
            .collect();
        out.push(ReachRecord {
            name: format!("{}-{}", whole.name, p),
            grid_points: grid,
            digi_points: digi,
        });
    }
    out
}

#[inline]
fn grid_at(d: &DigiPointRecord) -> GridPointRecord {
    GridPointRecord {
        x: d.x,
        y: d.y,
        z: d.z - GRID_BED_OFFSET,
        chainage: d.m,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reach::ReachGeometry;

    #[test]
    fn reproducible_draw() {
        let tok = ReplayToken { seed: 42, index: 7 };
        let a = draw_reach(MeanderCfg::default(), tok);
        let b = draw_reach(MeanderCfg::default(), tok);
        assert_eq!(a, b);
        let c = draw_reach(MeanderCfg::default(), ReplayToken { seed: 42, index: 8 });
        assert_ne!(a, c);
    }

    #[test]
    fn chainage_tracks_arc_length() {
        let cfg = MeanderCfg {
            chainage_scale: 2.0,
            start_chainage: 1000.0,
            ..MeanderCfg::default()
        };
        let r = draw_reach(cfg, ReplayToken { seed: 1, index: 0 });
        let g = ReachGeometry::from_engine_reaches(&[r]).unwrap();
        assert!((g.length() - 2.0 * g.geometric_length()).abs() < 1e-6);
        assert_eq!(g.chainages()[0], 1000.0);
        assert_eq!(g.digipoints().len(), cfg.digipoints);
    }

    #[test]
    fn split_reaches_rebuild_the_whole() {
        let cfg = MeanderCfg::default();
        let tok = ReplayToken { seed: 9, index: 3 };
        let whole = ReachGeometry::from_engine_reaches(&[draw_reach(cfg, tok)]).unwrap();
        let mut parts = draw_reaches(cfg, tok, 4);
        assert_eq!(parts.len(), 4);
        parts.reverse();
        let merged = ReachGeometry::from_engine_reaches(&parts).unwrap();
        assert_eq!(merged.digipoints(), whole.digipoints());
        assert_eq!(merged.gridpoints(), whole.gridpoints());
        assert_eq!(merged.to_line_string(), whole.to_line_string());
        assert_eq!(merged, whole);
        // interior boundaries are shared digitized points, never extra grid points
        let grid_total: usize = parts.iter().map(|r| r.grid_points.len()).sum();
        assert_eq!(grid_total, whole.gridpoints().len());
        assert!(parts
            .windows(2)
            .all(|w| w[0].digi_points.first() == w[1].digi_points.last()));
    }
}
