//! Chainage conversion and polyline bindings (kept separate so `lib.rs` stays tiny).

use crate::common::{geometry_from_py_points, map_geometry_err, policy, PyPoint};
use pyo3::prelude::*;

/// Map chainages to distances along the reach polyline.
/// Out-of-range values are clamped unless `strict` is set.
#[pyfunction]
#[pyo3(signature = (points, values, strict = false))]
pub fn chainage_to_geometric_distance(
    points: Vec<PyPoint>,
    values: Vec<f64>,
    strict: bool,
) -> PyResult<Vec<f64>> {
    let g = geometry_from_py_points(points)?;
    values
        .into_iter()
        .map(|c| g.table().distance_at(c, policy(strict)))
        .collect::<Result<_, _>>()
        .map_err(map_geometry_err)
}

/// Map distances along the reach polyline back to chainages.
#[pyfunction]
#[pyo3(signature = (points, values, strict = false))]
pub fn chainage_from_geometric_distance(
    points: Vec<PyPoint>,
    values: Vec<f64>,
    strict: bool,
) -> PyResult<Vec<f64>> {
    let g = geometry_from_py_points(points)?;
    values
        .into_iter()
        .map(|d| g.table().chainage_at(d, policy(strict)))
        .collect::<Result<_, _>>()
        .map_err(map_geometry_err)
}

/// Polyline vertices `(x, y)` in chainage order.
#[pyfunction]
pub fn reach_polyline(points: Vec<PyPoint>) -> PyResult<Vec<(f64, f64)>> {
    let g = geometry_from_py_points(points)?;
    let line = g.to_line_string().map_err(map_geometry_err)?;
    Ok(line.0.iter().map(|c| (c.x, c.y)).collect())
}

/// Chainage span and planar arc length, as `(length, geometric_length)`.
#[pyfunction]
pub fn reach_lengths(points: Vec<PyPoint>) -> PyResult<(f64, f64)> {
    let g = geometry_from_py_points(points)?;
    Ok((g.length(), g.geometric_length()))
}

pub fn register(m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(chainage_to_geometric_distance, m)?)?;
    m.add_function(wrap_pyfunction!(chainage_from_geometric_distance, m)?)?;
    m.add_function(wrap_pyfunction!(reach_polyline, m)?)?;
    m.add_function(wrap_pyfunction!(reach_lengths, m)?)?;
    Ok(())
}
