//! Run record: append-only activity, weight and delta traces.

use crate::engine::TrialOutcome;
use crate::params::{ModelParameters, Weights};
use serde::Serialize;

/// Trace of a model run.
///
/// Every sequence starts with one seed entry (index 0) and grows by exactly
/// one entry per trial. Entries are never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelState {
    f: Vec<f64>,
    p: Vec<f64>,
    e: Vec<f64>,
    w_f: Vec<f64>,
    w_p: Vec<f64>,
    w_e: Vec<f64>,
    d_w_f: Vec<f64>,
    d_w_p: Vec<f64>,
    d_w_e: Vec<f64>,
}

impl ModelState {
    /// Fresh state: zero activity, zero deltas, initial weights from `params`.
    pub fn seeded(params: &ModelParameters) -> Self {
        let w = params.initial_weights;
        Self {
            f: vec![0.0],
            p: vec![0.0],
            e: vec![0.0],
            w_f: vec![w.w_f],
            w_p: vec![w.w_p],
            w_e: vec![w.w_e],
            d_w_f: vec![0.0],
            d_w_p: vec![0.0],
            d_w_e: vec![0.0],
        }
    }

    /// Discard every trial and return to the seed entries.
    pub fn reset(&mut self, params: &ModelParameters) {
        *self = Self::seeded(params);
    }

    /// Number of entries per sequence (`1 + trials_run`).
    pub fn len(&self) -> usize {
        self.f.len()
    }

    pub fn trials_run(&self) -> usize {
        self.len() - 1
    }

    /// Weights after the most recent trial (or the seed weights).
    pub fn current_weights(&self) -> Weights {
        // Sequences are never empty: seeding pushes one entry each
        Weights {
            w_f: self.w_f[self.w_f.len() - 1],
            w_p: self.w_p[self.w_p.len() - 1],
            w_e: self.w_e[self.w_e.len() - 1],
        }
    }

    /// All nine sequences have the same length.
    pub fn is_aligned(&self) -> bool {
        let n = self.f.len();
        [
            &self.p, &self.e, &self.w_f, &self.w_p, &self.w_e, &self.d_w_f, &self.d_w_p, &self.d_w_e,
        ]
        .iter()
        .all(|seq| seq.len() == n)
    }

    pub(crate) fn push(&mut self, outcome: &TrialOutcome) {
        self.f.push(outcome.activity.f);
        self.p.push(outcome.activity.p);
        self.e.push(outcome.activity.e);
        self.d_w_f.push(outcome.delta.w_f);
        self.d_w_p.push(outcome.delta.w_p);
        self.d_w_e.push(outcome.delta.w_e);
        self.w_f.push(outcome.weights.w_f);
        self.w_p.push(outcome.weights.w_p);
        self.w_e.push(outcome.weights.w_e);
        debug_assert!(self.is_aligned());
    }

    /// Fear activity
    pub fn f(&self) -> &[f64] {
        &self.f
    }

    /// Persistent activity
    pub fn p(&self) -> &[f64] {
        &self.p
    }

    /// Extinction activity
    pub fn e(&self) -> &[f64] {
        &self.e
    }

    pub fn w_f(&self) -> &[f64] {
        &self.w_f
    }

    pub fn w_p(&self) -> &[f64] {
        &self.w_p
    }

    pub fn w_e(&self) -> &[f64] {
        &self.w_e
    }

    pub fn d_w_f(&self) -> &[f64] {
        &self.d_w_f
    }

    pub fn d_w_p(&self) -> &[f64] {
        &self.d_w_p
    }

    pub fn d_w_e(&self) -> &[f64] {
        &self.d_w_e
    }
}

impl Default for ModelState {
    fn default() -> Self {
        Self::seeded(&ModelParameters::default())
    }
}
