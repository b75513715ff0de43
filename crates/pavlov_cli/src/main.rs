use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pavlov_core::{ExtinctionRateMode, Model, ModelParameters, DEFAULT_P_PROB};
use std::io::{self, Write};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One row per trial
    Table,
    /// Report panels as JSON, for an external plotting tool
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "pavlov", author, version, about, long_about = None)]
struct Args {
    /// Trial schedule, e.g. "F20E20*" (F full, P partial, E extinction, R rest, T torture)
    #[arg(short, long, env = "PAVLOV_SCHEDULE", default_value = "F20E20*")]
    schedule: String,

    /// Fear learning rate
    #[arg(long, env = "PAVLOV_ALPHA_F", default_value_t = 0.7)]
    alpha_f: f64,

    /// Persistent learning rate
    #[arg(long, env = "PAVLOV_ALPHA_P", default_value_t = 0.7)]
    alpha_p: f64,

    /// Extinction learning rate
    #[arg(long, env = "PAVLOV_ALPHA_E", default_value_t = 0.3)]
    alpha_e: f64,

    /// Extinction rate on trials without US (split mode, needs --alpha-e2)
    #[arg(long, env = "PAVLOV_ALPHA_E1", requires = "alpha_e2")]
    alpha_e1: Option<f64>,

    /// Extinction rate on trials with US (split mode, needs --alpha-e1)
    #[arg(long, env = "PAVLOV_ALPHA_E2", requires = "alpha_e1")]
    alpha_e2: Option<f64>,

    /// Inhibitory coupling from Extinction onto Fear
    #[arg(long, env = "PAVLOV_W_FE", default_value_t = 1.0)]
    w_fe: f64,

    /// US probability in partial-conditioning blocks
    #[arg(long, env = "PAVLOV_P_PROB", default_value_t = DEFAULT_P_PROB)]
    p_prob: f64,

    /// Seed for partial-conditioning draws (random if omitted)
    #[arg(long, env = "PAVLOV_SEED")]
    seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl Args {
    fn parameters(&self) -> ModelParameters {
        let extinction = match (self.alpha_e1, self.alpha_e2) {
            (Some(alpha_e1), Some(alpha_e2)) => ExtinctionRateMode::Split { alpha_e1, alpha_e2 },
            _ => ExtinctionRateMode::Single(self.alpha_e),
        };
        ModelParameters {
            alpha_f: self.alpha_f,
            alpha_p: self.alpha_p,
            extinction,
            ..ModelParameters::default()
        }
        .with_w_fe(self.w_fe)
    }
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the rendered run
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let params = args.parameters();
    info!("Parameters: {:?}", params);

    let mut model = match args.seed {
        Some(seed) => Model::with_seed(params, seed),
        None => Model::new(params),
    };
    model
        .generate_schedule_with(&args.schedule, args.p_prob)
        .with_context(|| format!("Failed to compile schedule {:?}", args.schedule))?;
    model.run();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let report = model.report();
    match args.format {
        OutputFormat::Table => render::write_table(&mut out, &report)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &report).context("Failed to encode report")?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args_match_default_parameters() {
        let args = Args::parse_from(["pavlov"]);
        assert_eq!(args.parameters(), ModelParameters::default());
        assert_eq!(args.schedule, "F20E20*");
        assert_eq!(args.format, OutputFormat::Table);
    }

    #[test]
    fn test_split_extinction_args() {
        let args = Args::parse_from(["pavlov", "--alpha-e1", "0.4", "--alpha-e2", "0.1"]);
        assert_eq!(
            args.parameters().extinction,
            ExtinctionRateMode::Split {
                alpha_e1: 0.4,
                alpha_e2: 0.1
            }
        );
    }

    #[test]
    fn test_split_requires_both_rates() {
        assert!(Args::try_parse_from(["pavlov", "--alpha-e1", "0.4"]).is_err());
    }
}
