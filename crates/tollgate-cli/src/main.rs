//! `tollgate` - run, check and summarize pilot tasks.

mod args;

use anyhow::{Context, Result};
use args::{Args, Commands, Mode, RunArgs};
use clap::Parser;
use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;
use tollgate_core::{validate, TaskSet};
use tollgate_harness::{results, HarnessConfig, InteractiveSupplier, ReplaySupplier, Runner, Summary};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.verbose);

    match args.command {
        Commands::Run(run_args) => run(run_args),
        Commands::Summarize { input } => summarize(&input),
        Commands::Check {
            tasks_dir,
            task,
            output,
        } => check(&tasks_dir, &task, output),
        Commands::Tasks { tasks_dir } => list_tasks(&tasks_dir),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "tollgate=info",
        1 => "tollgate=debug",
        _ => "tollgate=trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn load_tasks(dir: &Path) -> Result<TaskSet> {
    TaskSet::load_dir(dir).with_context(|| format!("Failed to load tasks from {}", dir.display()))
}

fn run(args: RunArgs) -> Result<ExitCode> {
    let mut config = match &args.config {
        Some(path) => HarnessConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => HarnessConfig::default(),
    };
    if let Some(dir) = args.tasks_dir {
        config.tasks_dir = dir;
    }
    if let Some(retries) = args.retries {
        config.max_attempts = retries;
    }
    if let Some(out) = args.out {
        config.results_path = out;
    }

    let runner = Runner::new(config.max_attempts)?;
    let tasks = load_tasks(&config.tasks_dir)?;
    tracing::info!(
        tasks = tasks.len(),
        max_attempts = runner.max_attempts(),
        mode = ?args.mode,
        "Starting run"
    );

    let records = match args.mode {
        Mode::Manual => {
            let stdin = io::stdin();
            let mut supplier = InteractiveSupplier::new(stdin.lock(), io::stderr());
            runner.run(&tasks, &mut supplier)?
        }
        Mode::FromFile => {
            let inputs = args
                .inputs
                .context("--inputs is required with --mode from-file")?;
            let mut supplier = ReplaySupplier::from_path(&inputs)
                .with_context(|| format!("Failed to read replay file {}", inputs.display()))?;
            runner.run(&tasks, &mut supplier)?
        }
    };

    results::write_results(&config.results_path, &records).with_context(|| {
        format!(
            "Failed to write results to {}",
            config.results_path.display()
        )
    })?;
    eprintln!(
        "Wrote {} rows to {}",
        records.len(),
        config.results_path.display()
    );
    Ok(ExitCode::SUCCESS)
}

fn summarize(input: &Path) -> Result<ExitCode> {
    let summary = Summary::from_csv(input)
        .with_context(|| format!("Failed to read results from {}", input.display()))?;
    print!("{}", summary);
    Ok(ExitCode::SUCCESS)
}

fn check(tasks_dir: &Path, task_id: &str, output: Option<String>) -> Result<ExitCode> {
    let tasks = load_tasks(tasks_dir)?;
    let task = tasks
        .get(task_id)
        .with_context(|| format!("No task with id {:?}", task_id))?;

    let output = match output {
        Some(output) => output,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read output from stdin")?;
            buf
        }
    };

    let verdict = validate(task, &output);
    tracing::debug!(task = %task.id, error = %verdict.error, "Checked output");
    println!("{}", serde_json::to_string_pretty(&verdict)?);

    Ok(if verdict.passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn list_tasks(tasks_dir: &Path) -> Result<ExitCode> {
    let tasks = load_tasks(tasks_dir)?;
    for task in &tasks {
        let kind = task.validator().map(|v| v.kind()).unwrap_or("-");
        let task_type = match task.task_type() {
            "" => "<none>",
            other => other,
        };
        println!("{:<6} {:<12} {}", task.id, task_type, kind);
    }
    Ok(ExitCode::SUCCESS)
}
