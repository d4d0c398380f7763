use snspd::prelude::*;

use ndarray::Array1;
use serde_json::json;

/// Toy overdamped stepper: every junction relaxes on its own, with the
/// voltage given by the current left over after the supercurrent branch.
struct OverdampedSolver;

impl Solver for OverdampedSolver {
    fn step(
        &mut self,
        params: &Parameters,
    ) -> Result<(Array1<f64>, Array1<f64>), Error> {
        let v: Array1<f64> = params
            .x()
            .iter()
            .zip(params.ic().iter())
            .map(|(&x, &ic)| params.ib - ic * x.sin())
            .collect();
        let x = params.x() + &(&v * params.dt());
        Ok((x, v))
    }
}

fn main() {
    env_logger::init();

    let config = json!({
        "parameters": {
            "size": 10,
            "maxSteps": 20000,
            "average": 50,
            "dt": 0.02,
            "q": 1.3,
            "c0": 0.01,
            "vg": 2.0,
            "nl": 0.001,
            "ib": 0.0,
            "ic": 1.0,
            "x": {"stationaryPhase": true},
            "v": 0.0,
            "rqp": {"random": true, "min": 4.0, "max": 6.0}
        },
        // ramp the bias current up over the first half of the run
        "updates": [
            {"start": 0, "end": 10000, "values": {"ib": {"from": 0.0, "to": 0.7}}}
        ]
    });

    let params = config::init_params(&config, &mut rand::rng()).unwrap();
    let windows = config::update_windows(&config).unwrap();
    let settings = config::init_settings(&config, None);

    let mut simulation = Simulation::new(SimulationDescriptor {
        solver: OverdampedSolver,
        params,
        windows,
    });

    println!("-- Bias ramp --");
    simulation
        .run(RunDescriptor {
            nsteps: None,
            verbose: true,
        })
        .unwrap();

    println!("\n{}", simulation.params());
    println!("results would go to: {}", settings.output);
}
