//! Renderer-facing view of a run.
//!
//! Four panels: the stimulus schedule, neural response, weights and learning
//! signals. Panels borrow the traces; nothing here can mutate a run.

use crate::params::ModelParameters;
use crate::schedule::Schedule;
use crate::state::ModelState;
use serde::Serialize;
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesStyle {
    /// One bar per trial, drawn from `baseline`
    Bar,
    Line,
}

#[derive(Debug, Clone, Serialize)]
pub struct Series<'a> {
    pub label: &'static str,
    pub color: &'static str,
    pub style: SeriesStyle,
    pub baseline: f64,
    pub values: Cow<'a, [f64]>,
}

impl<'a> Series<'a> {
    fn line(label: &'static str, color: &'static str, values: &'a [f64]) -> Self {
        Self {
            label,
            color,
            style: SeriesStyle::Line,
            baseline: 0.0,
            values: Cow::Borrowed(values),
        }
    }

    fn bars(label: &'static str, color: &'static str, baseline: f64, values: Vec<f64>) -> Self {
        Self {
            label,
            color,
            style: SeriesStyle::Bar,
            baseline,
            values: Cow::Owned(values),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Panel<'a> {
    pub title: String,
    /// x axis spans `0..=x_max`
    pub x_max: f64,
    /// y axis spans `0..=y_max`
    pub y_max: f64,
    pub series: Vec<Series<'a>>,
}

impl Panel<'_> {
    pub fn series(&self, label: &str) -> Option<&Series<'_>> {
        self.series.iter().find(|s| s.label == label)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report<'a> {
    pub schedule_label: &'a str,
    pub trials: usize,
    pub panels: Vec<Panel<'a>>,
}

impl<'a> Report<'a> {
    pub fn new(schedule: &'a Schedule, params: &ModelParameters, state: &'a ModelState) -> Self {
        let x_max = (schedule.len() + 1) as f64;

        let stimulus = Panel {
            title: format!("Schedule : {}", schedule.label()),
            x_max,
            y_max: 2.1,
            series: vec![
                // CS bars sit on top of the US bars
                Series::bars("CS", "blue", 1.0, schedule.cs_column()),
                Series::bars("US", "red", 0.0, schedule.us_column()),
            ],
        };

        let response = Panel {
            title: "Neural Response".to_string(),
            x_max,
            y_max: 1.1,
            series: vec![
                Series::line("Fear", "red", state.f()),
                Series::line("Persistent", "orange", state.p()),
                Series::line("Extinction", "blue", state.e()),
            ],
        };

        let weights = Panel {
            title: weights_title(params),
            x_max,
            y_max: 1.1,
            series: vec![
                Series::line("W_Fear", "red", state.w_f()),
                Series::line("W_Persistent", "orange", state.w_p()),
                Series::line("W_Extinction", "blue", state.w_e()),
            ],
        };

        let signals = Panel {
            title: "Learning Signals = delta weight".to_string(),
            x_max,
            y_max: 1.1,
            series: vec![
                Series::line("Learning signal_Fear", "red", state.d_w_f()),
                Series::line("Learning signal_Persistent", "orange", state.d_w_p()),
                Series::line("Learning signal_Extinction", "blue", state.d_w_e()),
            ],
        };

        Self {
            schedule_label: schedule.label(),
            trials: state.trials_run(),
            panels: vec![stimulus, response, weights, signals],
        }
    }
}

/// Title of the weights panel, listing every parameter of the run.
pub fn weights_title(params: &ModelParameters) -> String {
    format!(
        "Weights : α_F : {} α_P : {} {} w_FE : {}",
        params.alpha_f, params.alpha_p, params.extinction, params.w_fe
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::simulate;
    use crate::schedule::compile_with;

    #[test]
    fn test_panel_titles() {
        let params = ModelParameters::default();
        let schedule = compile_with("F20E20*", 0.5, 0).unwrap();
        let state = simulate(params, &schedule);
        let report = Report::new(&schedule, &params, &state);

        let titles: Vec<&str> = report.panels.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Schedule : F20E20*",
                "Neural Response",
                "Weights : α_F : 0.7 α_P : 0.7 α_E : 0.3 w_FE : 1",
                "Learning Signals = delta weight",
            ]
        );
        assert_eq!(report.trials, 40);
        assert!(report.panels.iter().all(|p| p.x_max == 41.0));
    }

    #[test]
    fn test_series_lengths() {
        let params = ModelParameters::default();
        let schedule = compile_with("F3T2*", 0.5, 0).unwrap();
        let state = simulate(params, &schedule);
        let report = Report::new(&schedule, &params, &state);

        let cs = report.panels[0].series("CS").unwrap();
        assert_eq!(cs.values.as_ref(), &[1.0, 1.0, 1.0, 0.0, 0.0]);
        assert_eq!(cs.baseline, 1.0);

        for panel in &report.panels[1..] {
            for series in &panel.series {
                assert_eq!(series.values.len(), 6, "{}", series.label);
            }
        }
        assert_eq!(
            report.panels[2].series("W_Fear").unwrap().values.as_ref(),
            state.w_f()
        );
    }

    #[test]
    fn test_split_title() {
        let params = ModelParameters::split(0.5, 0.6, 0.3, 0.1).with_w_fe(0.8);
        assert_eq!(
            weights_title(&params),
            "Weights : α_F : 0.5 α_P : 0.6 α_E1 : 0.3 α_E2 : 0.1 w_FE : 0.8"
        );
    }

    #[test]
    fn test_report_serializes() {
        let params = ModelParameters::default();
        let schedule = compile_with("F2*", 0.5, 0).unwrap();
        let state = simulate(params, &schedule);
        let json = serde_json::to_value(Report::new(&schedule, &params, &state)).unwrap();
        assert_eq!(json["schedule_label"], "F2*");
        assert_eq!(json["panels"].as_array().unwrap().len(), 4);
        assert_eq!(json["panels"][1]["series"][0]["style"], "line");
    }
}
