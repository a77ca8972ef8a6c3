//! Python bindings.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::path::PathBuf;

use crate::config::{AllocationConfig, RenderConfig};
use crate::models::{CoreIndex, TimeStep};
use crate::sorting::JobOrder;

/// A job with its assigned cores.
#[pyclass(name = "AllocatedJob")]
#[derive(Clone, Debug)]
pub struct PyAllocatedJob {
    #[pyo3(get)]
    pub id: String,
    #[pyo3(get)]
    pub machine: String,
    #[pyo3(get)]
    pub start_time: TimeStep,
    #[pyo3(get)]
    pub finish_time: TimeStep,
    #[pyo3(get)]
    pub cores: Vec<CoreIndex>,
}

#[pymethods]
impl PyAllocatedJob {
    fn __repr__(&self) -> String {
        format!(
            "AllocatedJob(id={:?}, machine={:?}, start={}, finish={}, cores={:?})",
            self.id, self.machine, self.start_time, self.finish_time, self.cores
        )
    }
}

fn to_py_err(err: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn allocation_config(order: &str, verbosity: u8) -> PyResult<AllocationConfig> {
    Ok(AllocationConfig {
        order: order.parse::<JobOrder>().map_err(to_py_err)?,
        verbosity,
    })
}

/// Allocate cores to the jobs of an input file.
///
/// # Raises
/// * ValueError if the file is malformed or a job cannot get its cores
#[pyfunction]
#[pyo3(signature = (path, order="input", verbosity=0))]
fn allocate_file(path: PathBuf, order: &str, verbosity: u8) -> PyResult<Vec<PyAllocatedJob>> {
    let config = allocation_config(order, verbosity)?;
    let allocation = crate::allocate_file(&path, &config).map_err(to_py_err)?;
    Ok(allocation
        .jobs
        .into_iter()
        .map(|job| PyAllocatedJob {
            id: job.id,
            machine: job.machine,
            start_time: job.start_time,
            finish_time: job.finish_time,
            cores: job.cores,
        })
        .collect())
}

/// Allocate cores to the jobs of an input file and write the SVG chart.
#[pyfunction]
#[pyo3(signature = (path, output, order="input"))]
fn render_svg(path: PathBuf, output: PathBuf, order: &str) -> PyResult<()> {
    let config = allocation_config(order, 0)?;
    let allocation = crate::allocate_file(&path, &config).map_err(to_py_err)?;
    crate::render::write_svg(&allocation, &RenderConfig::default(), &output).map_err(to_py_err)
}

/// The gantt_cores Python module.
#[pymodule]
fn gantt_cores(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyAllocatedJob>()?;
    m.add_function(wrap_pyfunction!(allocate_file, m)?)?;
    m.add_function(wrap_pyfunction!(render_svg, m)?)?;
    Ok(())
}
