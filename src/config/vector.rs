//! Generation directives for the per-site vector parameters.

use ndarray::Array1;
use rand::Rng;
use serde_json::Value;

use crate::Error;

/// How a per-site vector should be filled.
///
/// Parsed from the per-parameter entry in the `parameters` section of the
/// configuration, which is either a bare number, an explicit array, or an
/// object selecting a generator.
#[derive(Debug, Clone, PartialEq)]
pub enum VectorSpec {
    /// Every element takes the given value.
    Constant(f64),
    /// The array's values, used verbatim. Its length must equal the system
    /// size.
    Explicit(Vec<f64>),
    /// A descending phase ramp that makes the chain stationary for the
    /// configured bias current.
    StationaryPhase,
    /// Independent uniform draws over `[min, max)`.
    Random { min: f64, max: f64 },
}

impl VectorSpec {
    /// Reads the directive for the vector parameter `name` from its config
    /// entry.
    pub fn from_config(name: &str, entry: &Value) -> Result<Self, Error> {
        if let Some(value) = entry.as_f64() {
            return Ok(Self::Constant(value));
        }

        if let Some(values) = entry.as_array() {
            let values = values
                .iter()
                .map(Value::as_f64)
                .collect::<Option<Vec<f64>>>()
                .ok_or_else(|| Error::UnsupportedGenerator {
                    name: name.to_string(),
                })?;
            return Ok(Self::Explicit(values));
        }

        if let Some(object) = entry.as_object() {
            if object.get("stationaryPhase").and_then(Value::as_bool) == Some(true) {
                return Ok(Self::StationaryPhase);
            }

            if object.get("random").and_then(Value::as_bool) == Some(true) {
                let bound = |key: &str| {
                    object.get(key).and_then(Value::as_f64).ok_or_else(|| {
                        Error::MissingField {
                            key: format!("parameters.{}.{}", name, key),
                        }
                    })
                };
                return Ok(Self::Random {
                    min: bound("min")?,
                    max: bound("max")?,
                });
            }
        }

        Err(Error::UnsupportedGenerator {
            name: name.to_string(),
        })
    }

    /// Produces the vector `name` with `size` elements.
    ///
    /// `ib` is the configured bias current, consumed by the stationary-phase
    /// generator. `rng` is the randomness source for the uniform generator;
    /// callers wanting reproducible vectors pass a seeded generator.
    pub fn generate<R: Rng>(
        &self,
        name: &str,
        size: usize,
        ib: f64,
        rng: &mut R,
    ) -> Result<Array1<f64>, Error> {
        match self {
            Self::Constant(value) => Ok(Array1::from_elem(size, *value)),

            Self::Explicit(values) => {
                if values.len() != size {
                    return Err(Error::LengthMismatch {
                        name: name.to_string(),
                        input_length: values.len(),
                        expected_length: size,
                    });
                }
                Ok(Array1::from_vec(values.clone()))
            }

            // phases (size - i) * asin(ib) carry the bias current through
            // every junction, so the chain starts current-balanced; a bias
            // above the critical current is clamped before the arcsine
            Self::StationaryPhase => {
                let ratio = f64::asin(f64::min(ib, 1.0));
                Ok((0..size).map(|i| ((size - i) as f64) * ratio).collect())
            }

            Self::Random { min, max } => {
                Ok((0..size).map(|_| rng.random_range(*min..*max)).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn number_entry_parses_as_constant() {
        let spec = VectorSpec::from_config("ic", &json!(0.75)).unwrap();
        assert_eq!(spec, VectorSpec::Constant(0.75));
    }

    #[test]
    fn constant_fills_every_element() {
        let out = VectorSpec::Constant(3.5)
            .generate("ic", 6, 0.0, &mut rng())
            .unwrap();
        assert_eq!(out.len(), 6);
        assert!(out.iter().all(|&value| value == 3.5));
    }

    #[test]
    fn explicit_array_is_used_verbatim() {
        let spec = VectorSpec::from_config("v", &json!([1.0, 2.0, 3.0])).unwrap();
        let out = spec.generate("v", 3, 0.0, &mut rng()).unwrap();
        assert_eq!(out, ndarray::array![1.0, 2.0, 3.0]);
    }

    #[test]
    fn explicit_array_of_wrong_length_fails() {
        let spec = VectorSpec::Explicit(vec![1.0, 2.0]);
        match spec.generate("v", 3, 0.0, &mut rng()) {
            Err(Error::LengthMismatch {
                name,
                input_length,
                expected_length,
            }) => {
                assert_eq!(name, "v");
                assert_eq!(input_length, 2);
                assert_eq!(expected_length, 3);
            }
            _ => panic!("expected length mismatch"),
        }
    }

    #[test]
    fn stationary_phase_ramps_down_by_arcsine_of_bias() {
        let spec = VectorSpec::from_config("x", &json!({"stationaryPhase": true})).unwrap();
        let out = spec.generate("x", 4, 0.5, &mut rng()).unwrap();

        let ratio = f64::asin(0.5);
        for (i, &value) in out.iter().enumerate() {
            assert!((value - ((4 - i) as f64) * ratio).abs() < 1e-6);
        }
        assert!((out[0] - 2.094_395_1).abs() < 1e-6);
        assert!((out[3] - 0.523_598_8).abs() < 1e-6);
    }

    #[test]
    fn stationary_phase_clamps_overcritical_bias() {
        let out = VectorSpec::StationaryPhase
            .generate("x", 3, 7.5, &mut rng())
            .unwrap();
        let half_pi = std::f64::consts::FRAC_PI_2;
        assert!(out.iter().all(|value| value.is_finite()));
        assert!((out[2] - half_pi).abs() < 1e-12);
    }

    #[test]
    fn random_draws_stay_inside_the_bounds() {
        let spec =
            VectorSpec::from_config("rqp", &json!({"random": true, "min": 1.0, "max": 4.0}))
                .unwrap();
        let out = spec.generate("rqp", 1000, 0.0, &mut rng()).unwrap();
        assert_eq!(out.len(), 1000);
        assert!(out.iter().all(|&value| (1.0..4.0).contains(&value)));
    }

    #[test]
    fn seeded_generators_reproduce_their_draws() {
        let spec = VectorSpec::Random { min: 0.0, max: 1.0 };
        let first = spec.generate("rqp", 16, 0.0, &mut rng()).unwrap();
        let second = spec.generate("rqp", 16, 0.0, &mut rng()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn random_directive_requires_bounds() {
        let err = VectorSpec::from_config("rqp", &json!({"random": true, "min": 1.0}));
        match err {
            Err(Error::MissingField { key }) => assert_eq!(key, "parameters.rqp.max"),
            _ => panic!("expected missing field"),
        }
    }

    #[test]
    fn unrecognized_shapes_are_rejected() {
        for entry in [
            json!({"gaussian": true}),
            json!({"stationaryPhase": false}),
            json!({"random": false, "min": 0.0, "max": 1.0}),
            json!("constant"),
            json!([1.0, "two"]),
        ] {
            match VectorSpec::from_config("ic", &entry) {
                Err(Error::UnsupportedGenerator { name }) => assert_eq!(name, "ic"),
                other => panic!("expected unsupported generator, got {other:?}"),
            }
        }
    }
}
