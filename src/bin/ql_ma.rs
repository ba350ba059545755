//! Train independent Q-learning agents on the generic multi-agent environment.

use std::{error::Error, path::PathBuf};

use clap::Parser;
use log::info;
use qmarl::{
    config::{HyperParams, TrainConfig},
    discretize::SwitchDiscretizer,
    gym::GenericEnv,
    report::ReportWriter,
    runner::Runner,
};
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser, Debug)]
#[command(about = "Q-Learning")]
struct Args {
    /// Alpha learning rate
    #[arg(short, long, default_value_t = 0.1)]
    alpha: f64,

    /// Gamma discount rate
    #[arg(short, long, default_value_t = 0.99)]
    gamma: f64,

    /// Epsilon
    #[arg(short, long, default_value_t = 0.05)]
    epsilon: f64,

    /// Minimum epsilon
    #[arg(long = "min_epsilon", alias = "me", default_value_t = 0.005)]
    min_epsilon: f64,

    /// Epsilon decay
    #[arg(short, long, default_value_t = 1.0)]
    decay: f64,

    /// Number of runs
    #[arg(short, long, default_value_t = 1)]
    runs: u32,

    /// Episodes per run
    #[arg(long, default_value_t = 100)]
    episodes: u32,

    /// Step cap per episode, 0 for none
    #[arg(long, default_value_t = 1000)]
    max_steps: usize,

    /// Number of agents
    #[arg(long, default_value_t = 2)]
    agents: usize,

    /// Actions per agent
    #[arg(long, default_value_t = 5)]
    actions: usize,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Write per-episode reports to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Increase log verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let params = HyperParams {
        alpha: args.alpha,
        gamma: args.gamma,
        epsilon: args.epsilon,
        min_epsilon: args.min_epsilon,
        decay: args.decay,
    };
    let budget = TrainConfig {
        episodes: args.episodes,
        max_steps: (args.max_steps > 0).then_some(args.max_steps),
        runs: args.runs,
    };
    params.validate()?;
    budget.validate()?;

    let mut wtr = args
        .output
        .as_ref()
        .map(|path| ReportWriter::from_path(path, args.agents))
        .transpose()?;

    for run in 0..budget.runs {
        // distinct seeds per run keep runs independent but reproducible
        let seed = args.seed.map(|s| s.wrapping_add(u64::from(run) << 32));
        let env = match seed {
            Some(s) => GenericEnv::seeded(args.agents, args.actions, vec![0.0; 2], vec![1.0; 2], s)?,
            None => GenericEnv::new(args.agents, args.actions, vec![0.0; 2], vec![1.0; 2])?,
        };

        let mut runner = Runner::new(env, SwitchDiscretizer, &params, seed)?;
        for _ in 0..budget.episodes {
            let report = runner.run_episode(budget.max_steps)?;
            if let Some(wtr) = wtr.as_mut() {
                wtr.write(run, &report)?;
            }
        }

        for (i, agent) in runner.agents().iter().enumerate() {
            info!(
                "Run {run} agent {i}: total reward {}, {} states visited, epsilon {}",
                agent.total_reward(),
                agent.q_table().len(),
                agent.epsilon()
            );
        }
    }

    if let Some(mut wtr) = wtr {
        wtr.flush()?;
    }

    Ok(())
}
