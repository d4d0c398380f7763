//! Time-windowed linear ramps for the drive scalars.

use std::collections::BTreeMap;

use serde::Deserialize;

/// A `{from, to}` ramp target for one scalar inside an update window.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Ramp {
    pub from: f64,
    pub to: f64,
}

/// A configured step range over which named scalars ramp linearly.
///
/// The range is inclusive on both ends. When several windows cover the same
/// scalar at the same step, the first one in declaration order wins.
#[derive(Deserialize, Debug, Clone)]
pub struct UpdateWindow {
    pub start: usize,
    pub end: usize,
    pub values: BTreeMap<String, Ramp>,
}

/// Computes the value the scalar `name` should hold at `step`.
///
/// Scans the windows in declaration order and interpolates inside the first
/// one whose range contains `step` and whose values name the scalar. Without
/// a match the current value persists. A window with `start == end` is an
/// instantaneous jump: the scalar takes the ramp's `to` value at that step.
pub fn scheduled_value(
    name: &str,
    current: f64,
    step: usize,
    windows: &[UpdateWindow],
) -> f64 {
    let matched = windows
        .iter()
        .find(|w| w.values.contains_key(name) && w.start <= step && step <= w.end);

    match matched {
        Some(window) => {
            let Ramp { from, to } = window.values[name];

            if window.start == window.end {
                return to;
            }

            from + (to - from) * ((step - window.start) as f64)
                / ((window.end - window.start) as f64)
        }
        None => current,
    }
}
