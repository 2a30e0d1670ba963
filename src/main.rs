//! @ai:module:intent CLI for the intersection benchmark driver
//! @ai:module:layer presentation

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use intersection_bench::{
    config::{BenchmarkConfig, LaunchMode},
    metrics::{BenchmarkResults, MetricsAggregator},
    output::OutputParser,
    preflight::Preflight,
    report::ReportGenerator,
    runner::{split_lines, BenchmarkSession, ProcessRunner, RunInvocation, SessionEvent, SessionPlan},
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "intersection-bench")]
#[command(about = "Benchmark driver for the token intersection program")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a benchmark session
    Run(RunArgs),

    /// Run the program once and print its user/system CPU time
    Cpu {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Pass --no_cpu_extensions to the program
        #[arg(long)]
        no_cpu_extensions: bool,
    },

    /// Parse a captured stdout file and print the recognized facts
    Parse {
        /// File holding the program's stdout
        file: PathBuf,
    },

    /// Generate reports from an existing results.json
    Report {
        /// Path to results JSON file
        #[arg(short, long)]
        results: PathBuf,

        /// Output directory for reports
        #[arg(short, long, default_value = "reports")]
        output: PathBuf,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = "benchmark.toml")]
        output: PathBuf,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Program to benchmark
    #[arg(long)]
    binary: Option<String>,

    /// First input file (-i)
    #[arg(long)]
    first: Option<String>,

    /// Second input file (-j)
    #[arg(long)]
    second: Option<String>,

    /// Output file passed to the program (-o)
    #[arg(long)]
    output_file: Option<String>,

    /// Number of measured runs
    #[arg(short, long)]
    runs: Option<u32>,

    /// Pass --no_cpu_extensions to the program
    #[arg(long)]
    no_cpu_extensions: bool,

    /// Skip the unmeasured discovery run
    #[arg(long)]
    no_warmup: bool,

    /// Kill a run after this many seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Launch the program directly instead of through `sh -c`
    #[arg(long)]
    direct: bool,

    /// Print the command line and exit
    #[arg(long)]
    dry_run: bool,

    /// Directory for timestamped result folders
    #[arg(long)]
    results_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("intersection_bench=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run_benchmarks(args).await,
        Commands::Cpu {
            config,
            no_cpu_extensions,
        } => cpu_time(config, no_cpu_extensions).await,
        Commands::Parse { file } => parse_output(file),
        Commands::Report { results, output } => generate_reports(results, output),
        Commands::Init { output } => init_config(output),
    }
}

/// @ai:intent Apply command-line overrides on top of the loaded configuration
/// @ai:effects pure
fn apply_overrides(config: &mut BenchmarkConfig, args: &RunArgs) {
    if let Some(ref binary) = args.binary {
        config.program.binary = binary.clone();
    }
    if let Some(ref first) = args.first {
        config.program.first_input = first.clone();
    }
    if let Some(ref second) = args.second {
        config.program.second_input = second.clone();
    }
    if let Some(ref output_file) = args.output_file {
        config.program.output_file = output_file.clone();
    }
    if let Some(runs) = args.runs {
        config.run.runs = runs;
    }
    if let Some(timeout) = args.timeout {
        config.run.timeout_secs = Some(timeout);
    }
    if let Some(ref results_dir) = args.results_dir {
        config.paths.results_dir = results_dir.clone();
    }
    if args.direct {
        config.program.launch = LaunchMode::Direct;
    }

    config.run.disable_extensions |= args.no_cpu_extensions;
    config.run.warmup &= !args.no_warmup;
    config.run.dry_run |= args.dry_run;
}

/// @ai:intent Run a full benchmark session and write reports
/// @ai:effects io, fs:write
async fn run_benchmarks(args: RunArgs) -> Result<()> {
    let mut config = load_or_default_config(args.config.clone())?;
    apply_overrides(&mut config, &args);

    let preflight = Preflight::check(&config.program);
    Preflight::log_warnings(&preflight);

    let plan = SessionPlan::from_config(&config);
    let command_line = plan.invocation.command_line();

    if config.run.dry_run {
        println!("Command:      {}", command_line);
        println!("Discovery:    {}", if plan.warmup { "yes" } else { "no" });
        println!("Timed runs:   {}", plan.runs);
        return Ok(());
    }

    let runner = Arc::new(
        ProcessRunner::new(config.program.launch).with_timeout(config.run.timeout()),
    );
    let reporter = ReportGenerator::new();

    let outcome = BenchmarkSession::new(runner, plan)
        .run_with(|event| match event {
            SessionEvent::WarmupStarted => {
                println!("Determine number of tokens in input files ...");
            }
            SessionEvent::WarmupFinished { state } => {
                println!("{}", reporter.render_discovery(state));
            }
            SessionEvent::RunStarted { index, total } => {
                println!("Run: {} / {}", index, total);
            }
            SessionEvent::RunFinished { result, .. } => {
                println!("{}s\n", result.elapsed_seconds);
            }
        })
        .await
        .context("Benchmark session aborted")?;

    let summary = ReportGenerator::summarize(&outcome.state)
        .context("Cannot summarize benchmark session")?;

    let results = BenchmarkResults::new(
        command_line,
        config.run.disable_extensions,
        outcome.state,
        summary,
    );

    let timestamp = chrono::Utc::now().format("%Y-%m-%d_%H-%M-%S");
    let output_dir = config.paths.results_dir.join(timestamp.to_string());
    println!("{}", reporter.render(&results.summary, &results.state));

    reporter.generate_all(&results, &output_dir)?;
    Ok(())
}

/// @ai:intent Run once with CPU accounting and print the times
/// @ai:effects io
async fn cpu_time(config_path: Option<PathBuf>, no_cpu_extensions: bool) -> Result<()> {
    let config = load_or_default_config(config_path)?;
    let runner = ProcessRunner::new(config.program.launch);
    let invocation = RunInvocation::new(
        config.program.command_line(),
        config.run.disable_extensions || no_cpu_extensions,
    );

    let usage = tokio::task::spawn_blocking(move || runner.run_with_cpu_accounting(&invocation))
        .await?
        .context("CPU accounting run failed")?;

    println!("real:   {:.6}s", usage.run.elapsed_seconds);
    println!("user:   {:.6}s", usage.user_time.as_secs_f64());
    println!("system: {:.6}s", usage.system_time.as_secs_f64());
    println!("CPU:    {:.6}s", usage.cpu_time().as_secs_f64());

    if usage.run.exit_status != 0 {
        tracing::warn!("Program exited with status {}", usage.run.exit_status);
    }

    Ok(())
}

/// @ai:intent Parse saved program output offline
/// @ai:effects fs:read, io
fn parse_output(file: PathBuf) -> Result<()> {
    let bytes = std::fs::read(&file).with_context(|| format!("Failed to read {}", file.display()))?;
    let lines = split_lines(&bytes);

    let facts = OutputParser::new()
        .parse(&lines)
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    for fact in &facts {
        println!("{:?}", fact);
    }

    let mut aggregator = MetricsAggregator::new();
    aggregator.absorb(&facts);

    println!();
    print!("{}", ReportGenerator::new().render_discovery(aggregator.state()));
    Ok(())
}

/// @ai:intent Generate reports from existing results
/// @ai:effects fs:read, fs:write
fn generate_reports(results_path: PathBuf, output: PathBuf) -> Result<()> {
    let reporter = ReportGenerator::new();
    let results = reporter.load_results(&results_path)?;

    println!("{}", reporter.render(&results.summary, &results.state));
    reporter.generate_all(&results, &output)?;
    Ok(())
}

/// @ai:intent Write default configuration
/// @ai:effects fs:write
fn init_config(output: PathBuf) -> Result<()> {
    let config = BenchmarkConfig::default();
    config.save(&output)?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}

/// @ai:intent Load configuration or use defaults
/// @ai:effects fs:read
fn load_or_default_config(path: Option<PathBuf>) -> Result<BenchmarkConfig> {
    match path {
        Some(p) => BenchmarkConfig::load(&p)
            .with_context(|| format!("Failed to load config {}", p.display())),
        None => {
            let default_path = PathBuf::from("benchmark.toml");

            if default_path.exists() {
                BenchmarkConfig::load(&default_path)
            } else {
                Ok(BenchmarkConfig::default())
            }
        }
    }
}
