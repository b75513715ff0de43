//! # Pavlov Core
//!
//! Discrete-trial fear-conditioning model with three coupled signals:
//!
//! - **Fear (F)**: net aversive response, inhibited by Extinction via `w_FE`
//! - **Persistent (P)**: CS–US association that extinction does not erase
//! - **Extinction (E)**: grows when Persistent overshoots, gated by Fear
//!
//! ## Pipeline
//!
//! 1. [`ScheduleCompiler`] turns notation like `"F20E20*"` into a [`Schedule`]
//! 2. [`TrialEngine`] replays it trial by trial into a [`ModelState`]
//! 3. [`Report`] exposes the traces to an external renderer
//!
//! [`Model`] bundles the three for the usual experiment lifecycle.

pub mod engine;
pub mod error;
mod model;
pub mod params;
pub mod report;
pub mod schedule;
mod state;

pub use engine::{simulate, Activity, TrialEngine, TrialOutcome};
pub use error::{Result, ScheduleError};
pub use model::Model;
pub use params::{ExtinctionRateMode, ModelParameters, Weights};
pub use report::{Panel, Report, Series, SeriesStyle};
pub use schedule::{
    compile, compile_with, Schedule, ScheduleCompiler, StimulusTrial, TrialType, DEFAULT_P_PROB,
};
pub use state::ModelState;
