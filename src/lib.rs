//! A framework for simulating superconducting nanowires modeled as chains of
//! coupled Josephson-junction-like circuit elements.
//!
//! The crate owns the parameter state of a run: it builds the initial
//! per-site vectors from the generation directives in a JSON configuration,
//! and interpolates the scalar drive parameters across the run according to
//! declared update windows. The circuit-equation stepper that consumes the
//! state is supplied by the caller through the [`Solver`] trait.
//!
//! To get started, refer to the `demos` directory in the main repository.

mod params;
mod simulation;

pub mod config;
pub mod prelude;

pub use params::{Parameters, ParametersDescriptor};
pub use simulation::{RunDescriptor, Simulation, SimulationDescriptor};

/// Represents an error in the simulation setup or run.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("config file {path} does not exist")]
    ConfigNotFound { path: std::path::PathBuf },
    #[error("config key `{key}` is missing or has the wrong type")]
    MissingField { key: String },
    #[error("{name} array does not have expected length \
        ( {name} array length: {input_length}, \
        expected length: {expected_length} )")]
    LengthMismatch {
        name: String,
        input_length: usize,
        expected_length: usize,
    },
    #[error("no recognized generation method for vector parameter `{name}`")]
    UnsupportedGenerator { name: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Manages actual computations.
///
/// Implemented outside this crate by the circuit-equation stepper. It is
/// handed the current parameter snapshot and returns the phase and voltage
/// vectors for the next time step, each of length `params.size()`.
pub trait Solver {
    fn step(
        &mut self,
        params: &Parameters,
    ) -> Result<(ndarray::Array1<f64>, ndarray::Array1<f64>), Error>;
}
