use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use reachgeom::{GeometryError, RangePolicy, ReachGeometry, ReachPoint, ReachPointType};

pub type PyPoint = (String, f64, f64, f64, f64);

fn point_kind(kind: &str) -> PyResult<ReachPointType> {
    match kind.trim().to_ascii_lowercase().as_str() {
        "grid" | "gridpoint" => Ok(ReachPointType::GridPoint),
        "digi" | "digipoint" => Ok(ReachPointType::DigiPoint),
        other => Err(PyValueError::new_err(format!(
            "unsupported point type {other:?}"
        ))),
    }
}

pub fn geometry_from_py_points(points: Vec<PyPoint>) -> PyResult<ReachGeometry> {
    let points = points
        .into_iter()
        .map(|(kind, chainage, x, y, z)| {
            Ok(ReachPoint::new(point_kind(&kind)?, chainage, x, y, z))
        })
        .collect::<PyResult<Vec<_>>>()?;
    ReachGeometry::new(points).map_err(map_geometry_err)
}

pub fn policy(strict: bool) -> RangePolicy {
    if strict {
        RangePolicy::Strict
    } else {
        RangePolicy::Clamp
    }
}

pub fn map_geometry_err(err: GeometryError) -> PyErr {
    PyValueError::new_err(err.to_string())
}
