//! Plain-text rendering of a run report.

use pavlov_core::{Panel, Report};
use std::io::{self, Write};

const COLUMNS: [&str; 9] = ["F", "P", "E", "w_F", "w_P", "w_E", "d_w_F", "d_w_P", "d_w_E"];

/// Write the panel titles followed by one row per trial.
///
/// Row 0 is the seed state and has no stimulus.
pub fn write_table<W: Write>(out: &mut W, report: &Report<'_>) -> io::Result<()> {
    for panel in &report.panels {
        writeln!(out, "# {}", panel.title)?;
    }

    write!(out, "{:>5} {:>3} {:>3}", "trial", "CS", "US")?;
    for name in COLUMNS {
        write!(out, " {:>8}", name)?;
    }
    writeln!(out)?;

    let stimulus = report.panels.first();
    let traces: Vec<&[f64]> = report.panels[1..]
        .iter()
        .flat_map(|panel| panel.series.iter().map(|s| s.values.as_ref()))
        .collect();

    for row in 0..=report.trials {
        write!(out, "{:>5}", row)?;
        match row.checked_sub(1) {
            Some(trial) => write!(
                out,
                " {:>3} {:>3}",
                stimulus_at(stimulus, "CS", trial),
                stimulus_at(stimulus, "US", trial)
            )?,
            None => write!(out, " {:>3} {:>3}", "-", "-")?,
        }
        for trace in &traces {
            match trace.get(row) {
                Some(v) => write!(out, " {:>8.4}", v)?,
                None => write!(out, " {:>8}", "")?,
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

fn stimulus_at(panel: Option<&Panel<'_>>, label: &str, trial: usize) -> u8 {
    panel
        .and_then(|p| p.series(label))
        .and_then(|s| s.values.get(trial))
        .map_or(0, |v| if *v > 0.0 { 1 } else { 0 })
}
