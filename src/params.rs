use std::collections::BTreeMap;
use std::fmt;

use ndarray::Array1;

use crate::config::schedule::{self, UpdateWindow};
use crate::Error;

/// Describes the initial contents of a [`Parameters`] aggregate.
pub struct ParametersDescriptor {
    /// The number of steps the run should take.
    pub max_steps: usize,
    /// How many steps are averaged together per output sample.
    pub average: usize,
    /// The number of segments.
    pub size: usize,
    /// Length of a time step measured in units of L_K/R.
    pub dt: f64,
    /// Quality factor R sqrt(C / L).
    pub q: f64,
    /// Capacitance to ground in terms of the capacitance C.
    pub c0: f64,
    /// Cut-off voltage in terms of R I_c. Below this voltage the resistance
    /// is given by `rqp`, above it by 1 (= R / R).
    pub vg: f64,
    /// Noise level given by sqrt(2 k_B T / (R I_c^2)).
    pub nl: f64,
    /// Bias current in terms of the critical current.
    pub ib: f64,
    /// Additional named drive scalars (currents, voltage biases, shunt terms).
    pub drive: BTreeMap<String, f64>,
    /// Critical current at each site, in terms of I_c.
    pub ic: Array1<f64>,
    /// The phase at each site.
    pub x: Array1<f64>,
    /// The voltage at each site.
    pub v: Array1<f64>,
    /// Quasiparticle resistance at each site, in terms of the resistance R.
    pub rqp: Array1<f64>,
}

/// The parameter state of a run.
///
/// Constructed once at run start, then mutated once per step: the drive
/// scalars follow their configured update windows while the per-site vectors
/// evolve only through [`Simulation`](crate::Simulation) writing the solver
/// output back. The structural constants never change after construction.
pub struct Parameters {
    step: usize,
    time_step: usize,
    max_steps: usize,
    average: usize,
    size: usize,
    dt: f64,
    q: f64,
    c0: f64,
    vg: f64,
    /// Noise level given by sqrt(2 k_B T / (R I_c^2)).
    pub nl: f64,
    /// Bias current in terms of the critical current.
    pub ib: f64,
    /// Additional named drive scalars, updated alongside `nl` and `ib`.
    pub drive: BTreeMap<String, f64>,
    ic: Array1<f64>,
    x: Array1<f64>,
    v: Array1<f64>,
    rqp: Array1<f64>,
}

impl Parameters {
    /// Creates a new `Parameters` instance.
    ///
    /// Every per-site vector must have length `size`; a mismatch is a caller
    /// contract violation and fails with [`Error::LengthMismatch`].
    pub fn new(desc: ParametersDescriptor) -> Result<Self, Error> {
        for (name, vec) in [
            ("ic", &desc.ic),
            ("x", &desc.x),
            ("v", &desc.v),
            ("rqp", &desc.rqp),
        ] {
            if vec.len() != desc.size {
                return Err(Error::LengthMismatch {
                    name: name.to_string(),
                    input_length: vec.len(),
                    expected_length: desc.size,
                });
            }
        }

        Ok(Self {
            step: 0,
            time_step: 0,
            max_steps: desc.max_steps,
            average: desc.average,
            size: desc.size,
            dt: desc.dt,
            q: desc.q,
            c0: desc.c0,
            vg: desc.vg,
            nl: desc.nl,
            ib: desc.ib,
            drive: desc.drive,
            ic: desc.ic,
            x: desc.x,
            v: desc.v,
            rqp: desc.rqp,
        })
    }

    /// Advances the counters and interpolates every drive scalar for `step`.
    ///
    /// `step` is the driver-supplied step index; the elapsed-step counter is
    /// incremented by exactly one per call. Vector parameters are untouched.
    pub fn update(&mut self, step: usize, windows: &[UpdateWindow]) {
        self.step = step;
        self.time_step += 1;

        self.nl = schedule::scheduled_value("nl", self.nl, step, windows);
        self.ib = schedule::scheduled_value("ib", self.ib, step, windows);
        for (name, value) in self.drive.iter_mut() {
            *value = schedule::scheduled_value(name, *value, step, windows);
        }
    }

    /// Replaces the phase and voltage vectors with solver output.
    pub fn set_state(&mut self, x: Array1<f64>, v: Array1<f64>) -> Result<(), Error> {
        for (name, vec) in [("x", &x), ("v", &v)] {
            if vec.len() != self.size {
                return Err(Error::LengthMismatch {
                    name: name.to_string(),
                    input_length: vec.len(),
                    expected_length: self.size,
                });
            }
        }
        self.x = x;
        self.v = v;
        Ok(())
    }

    /// The elapsed simulation time, `step * dt`.
    #[inline]
    pub fn time(&self) -> f64 {
        (self.step as f64) * self.dt
    }

    /// The driver-supplied step index.
    #[inline]
    pub fn step(&self) -> usize {
        self.step
    }

    /// The number of [`update`](Self::update) calls made so far.
    #[inline]
    pub fn time_step(&self) -> usize {
        self.time_step
    }

    #[inline]
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    #[inline]
    pub fn average(&self) -> usize {
        self.average
    }

    /// The number of segments.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Length of a time step.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Quality factor.
    #[inline]
    pub fn q(&self) -> f64 {
        self.q
    }

    /// Capacitance to ground.
    #[inline]
    pub fn c0(&self) -> f64 {
        self.c0
    }

    /// Cut-off voltage.
    #[inline]
    pub fn vg(&self) -> f64 {
        self.vg
    }

    /// Critical current at each site.
    #[inline]
    pub fn ic(&self) -> &Array1<f64> {
        &self.ic
    }

    /// The phase at each site.
    #[inline]
    pub fn x(&self) -> &Array1<f64> {
        &self.x
    }

    /// The voltage at each site.
    #[inline]
    pub fn v(&self) -> &Array1<f64> {
        &self.v
    }

    /// Quasiparticle resistance at each site.
    #[inline]
    pub fn rqp(&self) -> &Array1<f64> {
        &self.rqp
    }
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Time:               {}", self.time())?;
        writeln!(f, "Time step:          {}", self.step)?;
        writeln!(f, "\u{0394}t:                 {}", self.dt)?;
        writeln!(f, "Size:               {}", self.size)?;
        writeln!(f, "Quality:            {}", self.q)?;
        writeln!(f, "Ground capacitance: {}", self.c0)?;
        writeln!(f, "Cut-off voltage:    {}", self.vg)?;
        writeln!(f, "Noise level:        {}", self.nl)?;
        writeln!(f, "Bias current:       {}", self.ib)?;
        writeln!(f)?;
        write!(
            f,
            "| Site |      Phase |    Voltage | Critical current | Quasiparticle resistance |"
        )?;

        for i in 0..self.size {
            write!(
                f,
                "\n| {:>4} | {:>10.2} | {:>10.2} | {:>16.2} | {:>24.2} |",
                i, self.x[i], self.v[i], self.ic[i], self.rqp[i]
            )?;
        }

        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schedule::{scheduled_value, Ramp};

    fn descriptor(size: usize) -> ParametersDescriptor {
        ParametersDescriptor {
            max_steps: 100,
            average: 10,
            size,
            dt: 0.05,
            q: 2.0,
            c0: 0.1,
            vg: 1.5,
            nl: 0.01,
            ib: 0.5,
            drive: BTreeMap::from([("vb".to_string(), 0.2), ("rt".to_string(), 1.0)]),
            ic: Array1::ones(size),
            x: Array1::zeros(size),
            v: Array1::zeros(size),
            rqp: Array1::from_elem(size, 5.0),
        }
    }

    fn ramp_window(name: &str, start: usize, end: usize, from: f64, to: f64) -> UpdateWindow {
        UpdateWindow {
            start,
            end,
            values: BTreeMap::from([(name.to_string(), Ramp { from, to })]),
        }
    }

    #[test]
    fn vector_length_is_checked() {
        let mut desc = descriptor(4);
        desc.rqp = Array1::zeros(3);
        match Parameters::new(desc) {
            Err(Error::LengthMismatch {
                name,
                input_length,
                expected_length,
            }) => {
                assert_eq!(name, "rqp");
                assert_eq!(input_length, 3);
                assert_eq!(expected_length, 4);
            }
            _ => panic!("expected length mismatch"),
        }
    }

    #[test]
    fn time_is_derived_from_step() {
        let mut params = Parameters::new(descriptor(4)).unwrap();
        params.update(10, &[]);
        assert!((params.time() - 0.5).abs() < 1e-12);
        assert_eq!(params.step(), 10);
    }

    #[test]
    fn counters_advance_independently() {
        let mut params = Parameters::new(descriptor(4)).unwrap();
        params.update(5, &[]);
        params.update(5, &[]);
        params.update(7, &[]);
        assert_eq!(params.step(), 7);
        assert_eq!(params.time_step(), 3);
    }

    #[test]
    fn update_matches_direct_scheduler_calls() {
        let windows = vec![
            ramp_window("ib", 0, 10, 0.0, 1.0),
            ramp_window("vb", 0, 20, 0.2, 0.6),
        ];
        let mut params = Parameters::new(descriptor(4)).unwrap();
        let nl = params.nl;

        params.update(5, &windows);

        assert_eq!(params.ib, scheduled_value("ib", 0.5, 5, &windows));
        assert_eq!(params.drive["vb"], scheduled_value("vb", 0.2, 5, &windows));
        // no window names nl or rt, both keep their current values
        assert_eq!(params.nl, nl);
        assert_eq!(params.drive["rt"], 1.0);
    }

    #[test]
    fn update_leaves_vectors_untouched() {
        let windows = vec![ramp_window("ib", 0, 10, 0.0, 1.0)];
        let mut params = Parameters::new(descriptor(4)).unwrap();
        let ic = params.ic().clone();
        let x = params.x().clone();
        let v = params.v().clone();
        let rqp = params.rqp().clone();

        params.update(3, &windows);

        assert_eq!(params.ic(), &ic);
        assert_eq!(params.x(), &x);
        assert_eq!(params.v(), &v);
        assert_eq!(params.rqp(), &rqp);
    }

    #[test]
    fn set_state_checks_lengths() {
        let mut params = Parameters::new(descriptor(4)).unwrap();
        assert!(params
            .set_state(Array1::zeros(4), Array1::zeros(4))
            .is_ok());
        assert!(params
            .set_state(Array1::zeros(5), Array1::zeros(4))
            .is_err());
    }
}
