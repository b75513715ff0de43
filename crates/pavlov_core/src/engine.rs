//! Trial Engine: the Fear / Persistent / Extinction recurrence
//!
//! For trial i with stimulus row (cs, us):
//!
//! ```text
//! P_i = w_P[i-1] * cs
//! E_i = w_E[i-1] * cs
//! F_i = w_F[i-1] * cs - w_FE * E_i
//!
//! d_w_F = alpha_F * cs * max(0, us - F_i)
//! d_w_P = alpha_P * cs * max(0, us - P_i)
//! d_w_E = alpha_E * cs * max(0, F_i * (P_i - us - E_i))
//!
//! w_X_i = w_X[i-1] + d_w_X
//! ```
//!
//! Activities read the previous trial's weights; learning is a delta rule on
//! a prediction error clipped at zero. Extinction learning is gated by Fear.

use crate::params::{ModelParameters, Weights};
use crate::schedule::{Schedule, StimulusTrial};
use crate::state::ModelState;
use serde::Serialize;

/// Neural activity on one trial.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Activity {
    /// Fear
    pub f: f64,
    /// Persistent
    pub p: f64,
    /// Extinction
    pub e: f64,
}

/// Everything one trial appends to the run record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrialOutcome {
    pub activity: Activity,
    /// Learning signals (weight change applied this trial)
    pub delta: Weights,
    /// Weights after the update
    pub weights: Weights,
}

/// Replays schedules against a [`ModelState`].
#[derive(Debug, Clone)]
pub struct TrialEngine {
    params: ModelParameters,
}

impl TrialEngine {
    pub fn new(params: ModelParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ModelParameters {
        &self.params
    }

    /// Compute one trial from the previous weights. Pure.
    pub fn evaluate(&self, prev: Weights, trial: StimulusTrial) -> TrialOutcome {
        let cs = trial.cs_value();
        let us = trial.us_value();
        let params = &self.params;

        // Activities first, from the previous weights
        let p = prev.w_p * cs;
        let e = prev.w_e * cs;
        let f = prev.w_f * cs - params.w_fe * e;

        // Then all deltas
        let d_w_f = params.alpha_f * cs * (us - f).max(0.0);
        let d_w_p = params.alpha_p * cs * (us - p).max(0.0);
        let d_w_e = params.extinction.rate(trial.us) * cs * (f * (p - us - e)).max(0.0);

        TrialOutcome {
            activity: Activity { f, p, e },
            delta: Weights::new(d_w_f, d_w_p, d_w_e),
            weights: Weights::new(prev.w_f + d_w_f, prev.w_p + d_w_p, prev.w_e + d_w_e),
        }
    }

    /// Run one trial and append it to `state`.
    pub fn step(&self, state: &mut ModelState, trial: StimulusTrial) -> TrialOutcome {
        let outcome = self.evaluate(state.current_weights(), trial);
        state.push(&outcome);
        outcome
    }

    /// Replay every trial of `schedule` in order, extending `state`.
    ///
    /// An empty schedule leaves the state untouched.
    pub fn run<'s>(&self, state: &'s mut ModelState, schedule: &Schedule) -> &'s mut ModelState {
        if schedule.is_empty() {
            tracing::debug!("Empty schedule, nothing to run");
            return state;
        }

        for trial in schedule {
            self.step(state, *trial);
        }

        let w = state.current_weights();
        tracing::debug!(
            "Run complete: {} trials ({} total), w_F={:.4} w_P={:.4} w_E={:.4}",
            schedule.len(),
            state.trials_run(),
            w.w_f,
            w.w_p,
            w.w_e
        );
        state
    }
}

impl Default for TrialEngine {
    fn default() -> Self {
        Self::new(ModelParameters::default())
    }
}

/// Seed a state for `params` and run `schedule` on it.
pub fn simulate(params: ModelParameters, schedule: &Schedule) -> ModelState {
    let mut state = ModelState::seeded(&params);
    TrialEngine::new(params).run(&mut state, schedule);
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ExtinctionRateMode;
    use crate::schedule::compile_with;

    const EPS: f64 = 1e-12;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{:?} vs {:?}", actual, expected);
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < EPS, "{:?} vs {:?}", actual, expected);
        }
    }

    #[test]
    fn test_two_conditioning_trials() {
        let params = ModelParameters::new(0.7, 0.7, 0.3).with_w_fe(1.0);
        let schedule = compile_with("F2*", 0.5, 0).unwrap();
        let state = simulate(params, &schedule);

        assert_close(state.p(), &[0.0, 0.0, 0.7]);
        assert_close(state.e(), &[0.0, 0.0, 0.0]);
        assert_close(state.f(), &[0.0, 0.0, 0.7]);
        assert_close(state.d_w_f(), &[0.0, 0.7, 0.21]);
        assert_close(state.d_w_p(), &[0.0, 0.7, 0.21]);
        assert_close(state.d_w_e(), &[0.0, 0.0, 0.0]);
        assert_close(state.w_f(), &[0.0, 0.7, 0.91]);
        assert_close(state.w_p(), &[0.0, 0.7, 0.91]);
        assert_close(state.w_e(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_first_extinction_trial() {
        // After one conditioning trial: w_F = w_P = 0.7, w_E = 0
        let schedule = compile_with("F1E1*", 0.5, 0).unwrap();
        let state = simulate(ModelParameters::default(), &schedule);

        // F = 0.7, P = 0.7, E = 0, us = 0
        assert_close(state.d_w_f(), &[0.0, 0.7, 0.0]);
        assert_close(state.d_w_p(), &[0.0, 0.7, 0.0]);
        // 0.3 * 0.7 * (0.7 - 0 - 0)
        assert_close(state.d_w_e(), &[0.0, 0.0, 0.3 * 0.7 * 0.7]);
        assert_close(state.w_e(), &[0.0, 0.0, 0.147]);
    }

    #[test]
    fn test_coupling_reduces_fear() {
        let engine = TrialEngine::new(ModelParameters::default().with_w_fe(0.5));
        let outcome = engine.evaluate(Weights::new(0.8, 0.9, 0.4), StimulusTrial::new(true, false));
        assert!((outcome.activity.e - 0.4).abs() < EPS);
        assert!((outcome.activity.f - 0.6).abs() < EPS);
        assert!((outcome.activity.p - 0.9).abs() < EPS);
    }

    #[test]
    fn test_no_cs_means_no_learning() {
        let engine = TrialEngine::default();
        let prev = Weights::new(0.5, 0.5, 0.2);
        for trial in [StimulusTrial::new(false, true), StimulusTrial::new(false, false)] {
            let outcome = engine.evaluate(prev, trial);
            assert_eq!(outcome.activity, Activity::default());
            assert_eq!(outcome.delta, Weights::ZERO);
            assert_eq!(outcome.weights, prev);
        }
    }

    #[test]
    fn test_split_rate_uses_us_presence() {
        let params = ModelParameters::split(0.7, 0.7, 0.4, 0.0);
        let engine = TrialEngine::new(params);
        let prev = Weights::new(0.9, 0.9, 0.0);

        let unreinforced = engine.evaluate(prev, StimulusTrial::new(true, false));
        assert!((unreinforced.delta.w_e - 0.4 * 0.9 * 0.9).abs() < EPS);

        // P > us + E would be needed for extinction learning on a US trial;
        // with alpha_e2 = 0 there is none regardless
        let reinforced = engine.evaluate(Weights::new(2.0, 2.0, 0.0), StimulusTrial::new(true, true));
        assert_eq!(reinforced.delta.w_e, 0.0);

        let single = TrialEngine::new(ModelParameters {
            extinction: ExtinctionRateMode::Single(0.4),
            ..params
        });
        let reinforced = single.evaluate(Weights::new(2.0, 2.0, 0.0), StimulusTrial::new(true, true));
        assert!((reinforced.delta.w_e - 0.4 * 2.0 * 1.0).abs() < EPS);
    }

    #[test]
    fn test_empty_schedule_is_noop() {
        let params = ModelParameters::default();
        let mut state = ModelState::seeded(&params);
        let engine = TrialEngine::new(params);
        engine.run(&mut state, &Schedule::default());
        assert_eq!(state, ModelState::seeded(&params));
    }

    #[test]
    fn test_run_extends_and_chains() {
        let params = ModelParameters::default();
        let engine = TrialEngine::new(params);
        let mut state = ModelState::seeded(&params);
        let first = compile_with("F3*", 0.5, 0).unwrap();
        let second = compile_with("E2*", 0.5, 0).unwrap();

        let len = engine.run(&mut state, &first).len();
        assert_eq!(len, 4);
        engine.run(&mut state, &second);
        assert_eq!(state.len(), 6);
        assert!(state.is_aligned());

        // Same as compiling both blocks at once
        let combined = simulate(params, &compile_with("F3E2*", 0.5, 0).unwrap());
        assert_eq!(state, combined);
    }

    #[test]
    fn test_step_returns_appended_values() {
        let params = ModelParameters::default();
        let engine = TrialEngine::new(params);
        let mut state = ModelState::seeded(&params);
        let outcome = engine.step(&mut state, StimulusTrial::new(true, true));
        assert_eq!(state.w_f().last().copied(), Some(outcome.weights.w_f));
        assert_eq!(state.d_w_p().last().copied(), Some(outcome.delta.w_p));
        assert_eq!(state.f().last().copied(), Some(outcome.activity.f));
    }
}
