use crate::config::schedule::UpdateWindow;
use crate::{Error, Parameters, Solver};

/// Describes a simulation.
pub struct SimulationDescriptor<S: Solver> {
    /// The `Solver` for the simulation.
    pub solver: S,
    /// The parameter state the simulation starts in.
    pub params: Parameters,
    /// The update windows driving the scalars, in declaration order.
    pub windows: Vec<UpdateWindow>,
}

/// Describes a simulation run.
pub struct RunDescriptor {
    /// How many steps to advance. `None` runs up to `max_steps`.
    pub nsteps: Option<usize>,
    /// Whether or not to print information to the console.
    pub verbose: bool,
}

/// The main `struct` of the framework.
///
/// Owns the parameter state and advances it step by step: each step first
/// interpolates the drive scalars for the current window configuration, then
/// hands the state to the solver and writes the returned phase and voltage
/// vectors back.
pub struct Simulation<S: Solver> {
    solver: S,
    params: Parameters,
    windows: Vec<UpdateWindow>,
    next_step: usize,
}

impl<S: Solver> Simulation<S> {
    /// Creates a new `Simulation` instance.
    #[inline]
    pub fn new(desc: SimulationDescriptor<S>) -> Self {
        Self {
            solver: desc.solver,
            params: desc.params,
            windows: desc.windows,
            next_step: 0,
        }
    }

    /// The current parameter state.
    #[inline]
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Does a computational run.
    pub fn run(&mut self, desc: RunDescriptor) -> Result<(), Error> {
        let remaining = self.params.max_steps().saturating_sub(self.next_step);
        let nsteps = match desc.nsteps {
            Some(nsteps) => nsteps.min(remaining),
            None => remaining,
        };

        // setup output if verbose
        let bar = if desc.verbose {
            println!("# of time steps: {}", nsteps);
            Some(indicatif::ProgressBar::new(nsteps as u64))
        } else {
            None
        };

        for step in self.next_step..self.next_step + nsteps {
            self.params.update(step, &self.windows);

            let (x, v) = self.solver.step(&self.params)?;
            self.params.set_state(x, v)?;

            if let Some(ref bar) = bar {
                bar.inc(1);
            }
        }
        self.next_step += nsteps;

        if let Some(ref bar) = bar {
            bar.finish();
        }

        Ok(())
    }
}
