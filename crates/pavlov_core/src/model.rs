//! Model: parameters, schedule and run record of one simulated subject
//!
//! Wraps the compiler and engine with the lifecycle of a single experiment:
//! wipe memory, generate a schedule, run it, hand the traces to a renderer.

use crate::engine::TrialEngine;
use crate::error::Result;
use crate::params::ModelParameters;
use crate::report::Report;
use crate::schedule::{Schedule, ScheduleCompiler, DEFAULT_P_PROB};
use crate::state::ModelState;
use tracing::info;

pub struct Model {
    engine: TrialEngine,
    compiler: ScheduleCompiler,
    schedule: Schedule,
    state: ModelState,
}

impl Model {
    /// Model whose partial blocks draw from OS entropy.
    pub fn new(params: ModelParameters) -> Self {
        Self::with_compiler(params, ScheduleCompiler::new())
    }

    /// Model whose partial blocks are reproducible from `seed`.
    pub fn with_seed(params: ModelParameters, seed: u64) -> Self {
        Self::with_compiler(params, ScheduleCompiler::with_seed(seed))
    }

    fn with_compiler(params: ModelParameters, compiler: ScheduleCompiler) -> Self {
        let mut model = Self {
            engine: TrialEngine::new(params),
            compiler,
            schedule: Schedule::default(),
            state: ModelState::seeded(&params),
        };
        model.wipe_memory();
        model
    }

    /// Reset activities, weights and deltas to their seed values.
    /// The current schedule is kept.
    pub fn wipe_memory(&mut self) {
        self.state.reset(self.engine.params());
        info!("Memory wiped");
    }

    /// Compile `notation` with the default partial-conditioning probability.
    pub fn generate_schedule(&mut self, notation: &str) -> Result<&Schedule> {
        self.generate_schedule_with(notation, DEFAULT_P_PROB)
    }

    /// Compile `notation` and make it the current schedule.
    /// On error the previous schedule stays in place.
    pub fn generate_schedule_with(&mut self, notation: &str, p_prob: f64) -> Result<&Schedule> {
        self.compiler.set_p_prob(p_prob)?;
        let schedule = self.compiler.compile(notation)?;
        Ok(self.install(schedule))
    }

    /// Structured form of [`generate_schedule_with`](Self::generate_schedule_with).
    pub fn generate_schedule_from_blocks(
        &mut self,
        blocks: &[(char, i64)],
        p_prob: f64,
    ) -> Result<&Schedule> {
        self.compiler.set_p_prob(p_prob)?;
        let schedule = self.compiler.compile_blocks(blocks)?;
        Ok(self.install(schedule))
    }

    fn install(&mut self, schedule: Schedule) -> &Schedule {
        info!(
            "Schedule generated: {} ({} trials)",
            schedule.label(),
            schedule.len()
        );
        self.schedule = schedule;
        &self.schedule
    }

    /// Replay the current schedule, appending to the existing traces.
    /// Without a schedule this is a no-op.
    pub fn run(&mut self) -> &ModelState {
        self.engine.run(&mut self.state, &self.schedule);
        info!("Done: {} trials recorded", self.state.trials_run());
        &self.state
    }

    pub fn params(&self) -> &ModelParameters {
        self.engine.params()
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn schedule_label(&self) -> &str {
        self.schedule.label()
    }

    pub fn state(&self) -> &ModelState {
        &self.state
    }

    /// Read-only view for renderers.
    pub fn report(&self) -> Report<'_> {
        Report::new(&self.schedule, self.engine.params(), &self.state)
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(ModelParameters::default())
    }
}
