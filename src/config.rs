//! Configuration loading and parameter construction.
//!
//! The configuration is a JSON tree with a `parameters` section holding the
//! structural constants, drive scalars and vector directives, an optional
//! `updates` array of scalar ramp windows, and an optional `settings`
//! section.

pub mod schedule;
pub mod vector;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use ndarray::Array1;
use rand::Rng;
use serde_json::Value;

use crate::params::{Parameters, ParametersDescriptor};
use crate::Error;
use schedule::UpdateWindow;
use vector::VectorSpec;

// keys of the `parameters` section that are not drive scalars
const STRUCTURAL_KEYS: [&str; 7] = ["size", "maxSteps", "average", "dt", "q", "c0", "vg"];
const VECTOR_KEYS: [&str; 4] = ["ic", "x", "v", "rqp"];
const NAMED_SCALAR_KEYS: [&str; 2] = ["nl", "ib"];

/// Reads the JSON configuration tree from `path`.
pub fn load(path: impl AsRef<Path>) -> Result<Value, Error> {
    let path = path.as_ref();
    log::debug!("reading config from {}", path.display());

    if !path.exists() {
        return Err(Error::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Builds the initial [`Parameters`] from a parsed configuration tree.
///
/// `rng` feeds the uniform-random vector directives. Production callers pass
/// `rand::rng()`; tests can pass a seeded generator for reproducible vectors.
pub fn init_params<R: Rng>(config: &Value, rng: &mut R) -> Result<Parameters, Error> {
    let init = config
        .get("parameters")
        .and_then(Value::as_object)
        .ok_or_else(|| Error::MissingField {
            key: "parameters".to_string(),
        })?;

    let number = |key: &str| -> Result<f64, Error> {
        init.get(key)
            .and_then(Value::as_f64)
            .ok_or_else(|| Error::MissingField {
                key: format!("parameters.{}", key),
            })
    };
    let integer = |key: &str| -> Result<usize, Error> {
        init.get(key)
            .and_then(Value::as_u64)
            .map(|value| value as usize)
            .ok_or_else(|| Error::MissingField {
                key: format!("parameters.{}", key),
            })
    };

    let size = integer("size")?;
    let ib = number("ib")?;

    // the stationary-phase directive needs the bias current
    let mut vector = |key: &str| -> Result<Array1<f64>, Error> {
        let entry = init.get(key).ok_or_else(|| Error::MissingField {
            key: format!("parameters.{}", key),
        })?;
        VectorSpec::from_config(key, entry)?.generate(key, size, ib, rng)
    };

    log::debug!("creating parameter struct");
    let ic = vector("ic")?;
    let x = vector("x")?;
    let v = vector("v")?;
    let rqp = vector("rqp")?;

    // every remaining numeric key is an additional drive scalar; the set is
    // open so configurations can carry bias and shunt terms the scheduler
    // should track without the crate enumerating them
    let mut drive = BTreeMap::new();
    for (key, entry) in init {
        if STRUCTURAL_KEYS.contains(&key.as_str())
            || VECTOR_KEYS.contains(&key.as_str())
            || NAMED_SCALAR_KEYS.contains(&key.as_str())
        {
            continue;
        }
        if let Some(value) = entry.as_f64() {
            drive.insert(key.clone(), value);
        }
    }

    Parameters::new(ParametersDescriptor {
        max_steps: integer("maxSteps")?,
        average: integer("average")?,
        size,
        dt: number("dt")?,
        q: number("q")?,
        c0: number("c0")?,
        vg: number("vg")?,
        nl: number("nl")?,
        ib,
        drive,
        ic,
        x,
        v,
        rqp,
    })
}

/// Reads the update windows, in declaration order.
///
/// A configuration without an `updates` section schedules nothing; every
/// scalar keeps its initial value for the whole run.
pub fn update_windows(config: &Value) -> Result<Vec<UpdateWindow>, Error> {
    match config.get("updates") {
        Some(updates) => Ok(serde_json::from_value(updates.clone())?),
        None => Ok(Vec::new()),
    }
}

/// Run-level settings resolved from the configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    /// The resolved output name.
    pub output: String,
}

/// Resolves the output name.
///
/// A caller-supplied override wins over `settings.output` in the
/// configuration; with neither present a timestamped default is used. The
/// chosen template is rendered with strftime-style specifiers against the
/// local time, so `"run_%Y-%m-%d.h5"` becomes `"run_2026-08-26.h5"`.
pub fn init_settings(config: &Value, output_override: Option<&str>) -> Settings {
    let template = output_override
        .map(str::to_string)
        .or_else(|| {
            config
                .get("settings")
                .and_then(|settings| settings.get("output"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| "out_%Y-%m-%d-%H%M%S.h5".to_string());

    Settings {
        output: chrono::Local::now().format(&template).to_string(),
    }
}
