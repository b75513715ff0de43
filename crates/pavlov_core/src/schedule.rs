//! Schedule Compiler: symbolic trial schedules → stimulus tables
//!
//! A schedule is written as `<Type><Count>` blocks terminated by `*`:
//!
//! - `F`: full conditioning (CS + US)
//! - `P`: partial conditioning (CS, US with probability `p_prob`)
//! - `E`: extinction (CS alone)
//! - `R`: rest (nothing)
//! - `T`: torture (US alone)
//!
//! `"F20E20*"` compiles to 20 conditioning trials followed by 20 extinction
//! trials. Partial blocks are the only stochastic element; the compiler owns
//! its RNG so a seed makes the whole run reproducible.

use crate::error::{Result, ScheduleError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default US probability for partial-conditioning blocks.
pub const DEFAULT_P_PROB: f64 = 0.5;

const TERMINATOR: char = '*';

/// Kind of trial block in a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrialType {
    /// CS paired with US on every trial
    Full,
    /// CS on every trial, US drawn per trial
    Partial,
    /// CS without US
    Extinction,
    /// Neither stimulus
    Rest,
    /// US without CS
    Torture,
}

impl TrialType {
    pub const ALL: [TrialType; 5] = [
        TrialType::Full,
        TrialType::Partial,
        TrialType::Extinction,
        TrialType::Rest,
        TrialType::Torture,
    ];

    /// Parse a schedule letter. Letters are case-sensitive.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'F' => Some(Self::Full),
            'P' => Some(Self::Partial),
            'E' => Some(Self::Extinction),
            'R' => Some(Self::Rest),
            'T' => Some(Self::Torture),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Full => 'F',
            Self::Partial => 'P',
            Self::Extinction => 'E',
            Self::Rest => 'R',
            Self::Torture => 'T',
        }
    }

    /// Whether trials of this type present the CS.
    pub fn has_cs(self) -> bool {
        matches!(self, Self::Full | Self::Partial | Self::Extinction)
    }
}

impl fmt::Display for TrialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One row of a compiled schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StimulusTrial {
    /// Conditioned stimulus present
    pub cs: bool,
    /// Unconditioned stimulus present
    pub us: bool,
}

impl StimulusTrial {
    pub const fn new(cs: bool, us: bool) -> Self {
        Self { cs, us }
    }

    pub fn cs_value(&self) -> f64 {
        if self.cs {
            1.0
        } else {
            0.0
        }
    }

    pub fn us_value(&self) -> f64 {
        if self.us {
            1.0
        } else {
            0.0
        }
    }
}

/// An ordered, immutable table of stimulus trials.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Schedule {
    trials: Vec<StimulusTrial>,
    /// Source notation, kept for labeling
    label: String,
}

impl Schedule {
    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    pub fn trials(&self) -> &[StimulusTrial] {
        &self.trials
    }

    pub fn get(&self, index: usize) -> Option<StimulusTrial> {
        self.trials.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StimulusTrial> {
        self.trials.iter()
    }

    /// The schedule notation this table was compiled from.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// CS column as numbers (one value per trial).
    pub fn cs_column(&self) -> Vec<f64> {
        self.trials.iter().map(StimulusTrial::cs_value).collect()
    }

    /// US column as numbers (one value per trial).
    pub fn us_column(&self) -> Vec<f64> {
        self.trials.iter().map(StimulusTrial::us_value).collect()
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a StimulusTrial;
    type IntoIter = std::slice::Iter<'a, StimulusTrial>;

    fn into_iter(self) -> Self::IntoIter {
        self.trials.iter()
    }
}

/// Parse schedule notation into `(type, count)` blocks without expanding them.
///
/// Digits accumulate into a count; a non-digit closes the pending count
/// against the previous letter, and `*` always closes one (so `*` needs a
/// count in front of it).
pub fn parse_blocks(notation: &str) -> Result<Vec<(TrialType, u32)>> {
    let mut blocks = Vec::new();
    let mut count_buf = String::new();
    let mut count_start = 0;
    let mut type_buf: Option<(usize, char)> = None;
    let mut len = 0;

    for (position, c) in notation.chars().enumerate() {
        len = position + 1;
        if c.is_ascii_digit() {
            if count_buf.is_empty() {
                count_start = position;
            }
            count_buf.push(c);
            continue;
        }

        if !count_buf.is_empty() || c == TERMINATOR {
            let count = parse_count(&count_buf, count_start, position)?;
            let kind = type_buf
                .and_then(|(_, t)| TrialType::from_char(t))
                .ok_or(ScheduleError::InvalidType {
                    found: type_buf.map(|(_, t)| t),
                    position: type_buf.map_or(count_start, |(p, _)| p),
                })?;
            blocks.push((kind, count));
            count_buf.clear();
        }
        type_buf = Some((position, c));
    }

    if len > 0 && !notation.ends_with(TERMINATOR) {
        return Err(ScheduleError::InvalidInput {
            position: len,
            reason: format!("schedule must end with '{TERMINATOR}'"),
        });
    }

    Ok(blocks)
}

fn parse_count(buf: &str, start: usize, position: usize) -> Result<u32> {
    if buf.is_empty() {
        return Err(ScheduleError::InvalidInput {
            position,
            reason: "missing trial count".to_string(),
        });
    }
    buf.parse::<u32>().map_err(|_| ScheduleError::InvalidInput {
        position: start,
        reason: format!("trial count {buf} is out of range"),
    })
}

/// Render blocks back into schedule notation, e.g. `"F20E20*"`.
pub fn format_blocks(blocks: &[(TrialType, u32)]) -> String {
    let mut out: String = blocks
        .iter()
        .map(|(kind, count)| format!("{kind}{count}"))
        .collect();
    if !out.is_empty() {
        out.push(TERMINATOR);
    }
    out
}

/// Compiles schedule notation into a [`Schedule`].
#[derive(Debug, Clone)]
pub struct ScheduleCompiler {
    p_prob: f64,
    rng: StdRng,
}

impl ScheduleCompiler {
    /// Compiler seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            p_prob: DEFAULT_P_PROB,
            rng: StdRng::from_entropy(),
        }
    }

    /// Compiler with a fixed seed; identical seeds give identical partial blocks.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            p_prob: DEFAULT_P_PROB,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Builder form of [`set_p_prob`](Self::set_p_prob).
    pub fn p_prob(mut self, p_prob: f64) -> Result<Self> {
        self.set_p_prob(p_prob)?;
        Ok(self)
    }

    /// Set the US probability used by partial-conditioning blocks.
    pub fn set_p_prob(&mut self, p_prob: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&p_prob) {
            return Err(ScheduleError::InvalidProbability(p_prob));
        }
        self.p_prob = p_prob;
        Ok(())
    }

    pub fn current_p_prob(&self) -> f64 {
        self.p_prob
    }

    /// Compile string notation such as `"F10E10F10*"`.
    pub fn compile(&mut self, notation: &str) -> Result<Schedule> {
        let blocks = parse_blocks(notation)?;
        Ok(self.expand(&blocks, notation.to_string()))
    }

    /// Compile an already-structured block list. Counts must fit in `u32`.
    pub fn compile_blocks(&mut self, blocks: &[(char, i64)]) -> Result<Schedule> {
        let parsed = blocks
            .iter()
            .enumerate()
            .map(|(position, &(letter, count))| -> Result<(TrialType, u32)> {
                let kind = TrialType::from_char(letter).ok_or(ScheduleError::InvalidType {
                    found: Some(letter),
                    position,
                })?;
                let count = u32::try_from(count).map_err(|_| ScheduleError::InvalidInput {
                    position,
                    reason: format!("trial count {count} is not a non-negative integer"),
                })?;
                Ok((kind, count))
            })
            .collect::<Result<Vec<_>>>()?;
        let label = format_blocks(&parsed);
        Ok(self.expand(&parsed, label))
    }

    fn expand(&mut self, blocks: &[(TrialType, u32)], label: String) -> Schedule {
        let total: usize = blocks.iter().map(|&(_, count)| count as usize).sum();
        let mut trials = Vec::with_capacity(total);

        for &(kind, count) in blocks {
            for _ in 0..count {
                let trial = match kind {
                    TrialType::Full => StimulusTrial::new(true, true),
                    TrialType::Partial => StimulusTrial::new(true, self.rng.gen_bool(self.p_prob)),
                    TrialType::Extinction => StimulusTrial::new(true, false),
                    TrialType::Rest => StimulusTrial::new(false, false),
                    TrialType::Torture => StimulusTrial::new(false, true),
                };
                trials.push(trial);
            }
        }

        tracing::debug!(
            "Schedule compiled: {} ({} blocks, {} trials, p_prob={})",
            label,
            blocks.len(),
            trials.len(),
            self.p_prob
        );

        Schedule { trials, label }
    }
}

impl Default for ScheduleCompiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Compile with the default probability and an entropy-seeded RNG.
pub fn compile(notation: &str) -> Result<Schedule> {
    ScheduleCompiler::new().compile(notation)
}

/// Compile with an explicit partial-conditioning probability and seed.
pub fn compile_with(notation: &str, p_prob: f64, seed: u64) -> Result<Schedule> {
    ScheduleCompiler::with_seed(seed).p_prob(p_prob)?.compile(notation)
}
