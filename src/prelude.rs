//! Includes commonly used library components.

pub use crate::config::schedule::{Ramp, UpdateWindow};
pub use crate::config::vector::VectorSpec;
pub use crate::config::{self, Settings};
pub use crate::{
    Error,
    Parameters,
    ParametersDescriptor,
    RunDescriptor,
    Simulation,
    SimulationDescriptor,
    Solver,
};
