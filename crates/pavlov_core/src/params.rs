//! Model parameters: learning rates, coupling and initial weights.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Learning rate configuration for the Extinction signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtinctionRateMode {
    /// One rate for every trial
    Single(f64),
    /// `alpha_e1` on trials without US, `alpha_e2` on trials with US
    Split { alpha_e1: f64, alpha_e2: f64 },
}

impl ExtinctionRateMode {
    /// Rate applied to a trial given whether the US is present.
    pub fn rate(&self, us: bool) -> f64 {
        match *self {
            Self::Single(alpha_e) => alpha_e,
            Self::Split { alpha_e1, alpha_e2 } => {
                if us {
                    alpha_e2
                } else {
                    alpha_e1
                }
            }
        }
    }
}

impl Default for ExtinctionRateMode {
    fn default() -> Self {
        Self::Single(0.3)
    }
}

impl fmt::Display for ExtinctionRateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(alpha_e) => write!(f, "α_E : {}", alpha_e),
            Self::Split { alpha_e1, alpha_e2 } => {
                write!(f, "α_E1 : {} α_E2 : {}", alpha_e1, alpha_e2)
            }
        }
    }
}

/// The three association weights.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Weights {
    pub w_f: f64,
    pub w_p: f64,
    pub w_e: f64,
}

impl Weights {
    pub const ZERO: Weights = Weights {
        w_f: 0.0,
        w_p: 0.0,
        w_e: 0.0,
    };

    pub fn new(w_f: f64, w_p: f64, w_e: f64) -> Self {
        Self { w_f, w_p, w_e }
    }
}

/// Parameters of one model instance. Fixed for the lifetime of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParameters {
    /// Fear learning rate
    pub alpha_f: f64,
    /// Persistent learning rate
    pub alpha_p: f64,
    /// Extinction learning rate(s)
    pub extinction: ExtinctionRateMode,
    /// Inhibitory coupling from Extinction activity onto Fear activity (not learned)
    pub w_fe: f64,
    /// Weights restored by every reset
    pub initial_weights: Weights,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            alpha_f: 0.7,
            alpha_p: 0.7,
            extinction: ExtinctionRateMode::default(),
            w_fe: 1.0,
            initial_weights: Weights::ZERO,
        }
    }
}

impl ModelParameters {
    pub fn new(alpha_f: f64, alpha_p: f64, alpha_e: f64) -> Self {
        Self {
            alpha_f,
            alpha_p,
            extinction: ExtinctionRateMode::Single(alpha_e),
            ..Default::default()
        }
    }

    /// Two-rate extinction variant.
    pub fn split(alpha_f: f64, alpha_p: f64, alpha_e1: f64, alpha_e2: f64) -> Self {
        Self {
            alpha_f,
            alpha_p,
            extinction: ExtinctionRateMode::Split { alpha_e1, alpha_e2 },
            ..Default::default()
        }
    }

    pub fn with_w_fe(mut self, w_fe: f64) -> Self {
        self.w_fe = w_fe;
        self
    }

    pub fn with_initial_weights(mut self, weights: Weights) -> Self {
        self.initial_weights = weights;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = ModelParameters::default();
        assert_eq!(params.alpha_f, 0.7);
        assert_eq!(params.alpha_p, 0.7);
        assert_eq!(params.extinction, ExtinctionRateMode::Single(0.3));
        assert_eq!(params.w_fe, 1.0);
        assert_eq!(params.initial_weights, Weights::ZERO);
    }

    #[test]
    fn test_split_rate_selection() {
        let mode = ExtinctionRateMode::Split {
            alpha_e1: 0.2,
            alpha_e2: 0.05,
        };
        assert_eq!(mode.rate(false), 0.2);
        assert_eq!(mode.rate(true), 0.05);
        assert_eq!(ExtinctionRateMode::Single(0.3).rate(true), 0.3);
    }

    #[test]
    fn test_display() {
        assert_eq!(ExtinctionRateMode::Single(0.3).to_string(), "α_E : 0.3");
        assert_eq!(
            ExtinctionRateMode::Split {
                alpha_e1: 0.3,
                alpha_e2: 0.1
            }
            .to_string(),
            "α_E1 : 0.3 α_E2 : 0.1"
        );
    }

    #[test]
    fn test_deserialize_partial_params() {
        let params: ModelParameters =
            serde_json::from_str(r#"{"extinction": {"split": {"alpha_e1": 0.4, "alpha_e2": 0.1}}}"#)
                .unwrap();
        assert_eq!(params.alpha_f, 0.7);
        assert_eq!(params.extinction.rate(false), 0.4);
    }
}
