use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ringq::config::Config;
use ringq::report::{self, Snapshot};
use ringq::script::{self, Op};
use ringq::RingBuffer;

#[derive(Parser, Debug)]
#[command(name = "ringq", about = "Replay operations against a resizable ring buffer", version)]
struct Cli {
    /// Initial capacity (defaults to general.default_capacity from the config)
    #[arg(short, long)]
    capacity: Option<usize>,

    /// File with one operation per line (append:<v>, pop, resize:<n>, get:<i>, len, destroy)
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Inline operation, replayed after the script; repeatable
    #[arg(short = 'o', long = "op", value_name = "OP")]
    ops: Vec<String>,

    /// Continue after an operation fails
    #[arg(long)]
    keep_going: bool,

    /// Print outcomes and the final buffer as JSON
    #[arg(long)]
    json: bool,

    /// Print config file path and current values, then exit
    #[arg(long)]
    config: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "ringq", &mut std::io::stdout());
        return Ok(());
    }

    let cfg = Config::load();
    init_tracing(&cfg.general.log_filter);

    if cli.config {
        return run_print_config(&cfg);
    }

    let ops = collect_ops(&cli)?;
    let capacity = cli.capacity.unwrap_or(cfg.general.default_capacity);
    let stop_on_error = cfg.script.stop_on_error && !cli.keep_going;

    let mut buf = RingBuffer::new(capacity);
    if buf.capacity() != capacity {
        eprintln!("ringq: could not allocate {} slots, starting with an empty buffer", capacity);
    }
    let outcomes = script::replay(&mut buf, &ops, stop_on_error);
    let snap = Snapshot::capture(&buf);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report::to_json(&outcomes, &snap))?);
    } else {
        print!("{}", report::generate(&outcomes, &snap));
    }

    if outcomes.iter().any(|o| o.result.is_failure()) {
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn collect_ops(cli: &Cli) -> Result<Vec<Op>> {
    let mut ops = match &cli.script {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading script {}", path.display()))?;
            script::parse_script(&text)?
        }
        None => Vec::new(),
    };
    for (i, text) in cli.ops.iter().enumerate() {
        ops.push(Op::parse(text, i + 1).with_context(|| format!("--op '{}'", text))?);
    }
    Ok(ops)
}

fn run_print_config(cfg: &Config) -> Result<()> {
    let path = Config::config_path()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(unknown)".to_string());
    println!("Config: {}", path);
    println!();
    println!("[general]");
    println!("  default_capacity = {}", cfg.general.default_capacity);
    println!("  log_filter       = {:?}", cfg.general.log_filter);
    println!();
    println!("[script]");
    println!("  stop_on_error    = {}", cfg.script.stop_on_error);
    Ok(())
}
