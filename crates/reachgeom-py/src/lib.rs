//! PyO3 bindings for the `reachgeom` chainage conversions.
//!
//! Notes
//! - Bindings stay thin: points cross the boundary as `(kind, chainage, x, y, z)`
//!   tuples and come back as plain floats or `(x, y)` pairs.
//! - Geometry errors surface as `ValueError`.

use pyo3::prelude::*;

mod common;
mod geom;

#[pymodule]
fn reachgeom_native(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add("__version__", reachgeom::VERSION)?;
    geom::register(m)?;
    Ok(())
}
