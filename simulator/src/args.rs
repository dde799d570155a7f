use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Deterministic hostbot-db task simulator")]
pub(crate) struct Args {
    #[arg(long, value_parser = humantime::parse_duration)]
    pub(crate) duration: Option<Duration>,
    #[arg(long)]
    pub(crate) iterations: Option<u64>,
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    #[arg(long, default_value_t = 4)]
    pub(crate) idle_cap: usize,
    #[arg(long, default_value_t = 16)]
    pub(crate) max_outstanding: usize,
    #[arg(long, default_value_t = 0.05)]
    pub(crate) hold_rate: f64,
    #[arg(long, default_value_t = 0.02)]
    pub(crate) ping_fault_rate: f64,
    #[arg(long, default_value_t = 0.02)]
    pub(crate) connect_fault_rate: f64,
    #[arg(long, default_value_t = 0.03)]
    pub(crate) statement_fault_rate: f64,
    #[arg(long, default_value_t = 0.01)]
    pub(crate) spawn_refusal_rate: f64,
    /// JSON file with `DatabaseOptions`; its `idle_cap` overrides `--idle-cap`.
    #[arg(long)]
    pub(crate) options: Option<PathBuf>,
    #[arg(long)]
    pub(crate) log: Option<PathBuf>,
    #[arg(long)]
    pub(crate) quick: bool,
    #[arg(long)]
    pub(crate) stress: bool,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SimConfig {
    pub(crate) duration_ms: Option<u64>,
    pub(crate) iterations: Option<u64>,
    pub(crate) seed: u64,
    pub(crate) idle_cap: usize,
    pub(crate) max_outstanding: usize,
    pub(crate) hold_rate: f64,
    pub(crate) ping_fault_rate: f64,
    pub(crate) connect_fault_rate: f64,
    pub(crate) statement_fault_rate: f64,
    pub(crate) spawn_refusal_rate: f64,
    pub(crate) options: Option<PathBuf>,
    pub(crate) log: Option<PathBuf>,
    pub(crate) preset: Option<String>,
    pub(crate) first_steps: usize,
    pub(crate) tail_steps: usize,
}

impl SimConfig {
    pub(crate) fn from_args(args: Args) -> Self {
        let mut config = SimConfig {
            duration_ms: args
                .duration
                .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
            iterations: args.iterations,
            seed: args.seed.unwrap_or_else(random_seed),
            idle_cap: args.idle_cap,
            max_outstanding: args.max_outstanding.max(1),
            hold_rate: clamp_rate(args.hold_rate),
            ping_fault_rate: clamp_rate(args.ping_fault_rate),
            connect_fault_rate: clamp_rate(args.connect_fault_rate),
            statement_fault_rate: clamp_rate(args.statement_fault_rate),
            spawn_refusal_rate: clamp_rate(args.spawn_refusal_rate),
            options: args.options,
            log: args.log,
            preset: None,
            first_steps: 30,
            tail_steps: 80,
        };
        if config.iterations.is_none() && config.duration_ms.is_none() {
            config.iterations = Some(2_000);
        }

        if args.quick {
            config.apply_quick();
        }
        if args.stress {
            config.apply_stress();
        }

        config
    }

    fn apply_quick(&mut self) {
        self.preset = Some("quick".to_string());
        self.iterations = Some(1_000);
        self.duration_ms = None;
        self.idle_cap = 2;
        self.max_outstanding = 6;
    }

    fn apply_stress(&mut self) {
        self.preset = Some("stress".to_string());
        self.iterations = Some(50_000);
        self.duration_ms = None;
        self.idle_cap = 8;
        self.max_outstanding = 64;
        self.ping_fault_rate = 0.05;
        self.connect_fault_rate = 0.05;
        self.statement_fault_rate = 0.08;
        self.spawn_refusal_rate = 0.03;
    }
}

fn clamp_rate(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn random_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    now.as_secs() ^ u64::from(now.subsec_nanos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_rate_limits_bounds() {
        assert_eq!(clamp_rate(-1.0), 0.0);
        assert_eq!(clamp_rate(2.0), 1.0);
        assert_eq!(clamp_rate(0.5), 0.5);
        assert_eq!(clamp_rate(f64::NAN), 0.0);
    }
}
