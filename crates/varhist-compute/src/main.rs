use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;
use varhist_cache::{LoadMode, VariantCache};
use varhist_compute::{DEFAULT_CAP, RequestRecord, run_batch};

const DEFAULT_CACHE_DIR: &str = "cache";
const DEFAULT_INPUT: &str = "requests.json";
const DEFAULT_OUTPUT: &str = "variants.json";

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = load_config();
    info!("using cache at {} (mode: {:?})", config.cache_dir.display(), config.cache_mode);
    info!(
        "reading requests from {}, writing results to {}",
        config.input.display(),
        config.output.display()
    );

    let start = Instant::now();
    let cache = if config.cache_dir.is_dir() {
        VariantCache::load(&config.cache_dir, config.cache_mode)?
    } else {
        warn!(
            "cache directory {} not found; computing without cached evidence",
            config.cache_dir.display()
        );
        VariantCache::empty()
    };
    info!(
        "cache loaded in {} ms ({} entries)",
        start.elapsed().as_millis(),
        cache.entry_count()
    );

    let raw = fs::read(&config.input)
        .with_context(|| format!("read requests from {}", config.input.display()))?;
    let requests: Vec<RequestRecord> = serde_json::from_slice(&raw)
        .with_context(|| format!("parse requests in {}", config.input.display()))?;

    let run_start = Instant::now();
    let results = run_batch(&cache, &requests, config.cap);
    info!(
        "{} of {} requests computed in {} ms",
        results.len(),
        requests.len(),
        run_start.elapsed().as_millis()
    );

    let json = serde_json::to_vec_pretty(&results).context("serialize results")?;
    fs::write(&config.output, json)
        .with_context(|| format!("write results to {}", config.output.display()))?;
    Ok(())
}

#[derive(Debug, Clone)]
struct Config {
    cache_dir: PathBuf,
    cache_mode: LoadMode,
    input: PathBuf,
    output: PathBuf,
    cap: usize,
}

fn load_config() -> Config {
    let mut cli_cache_dir: Option<PathBuf> = None;
    let mut cli_cache_mode: Option<LoadMode> = None;
    let mut cli_input: Option<PathBuf> = None;
    let mut cli_output: Option<PathBuf> = None;
    let mut cli_cap: Option<usize> = None;
    let mut args = env::args().skip(1).peekable();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--cache-dir" => {
                if let Some(path) = args.next() {
                    cli_cache_dir = Some(PathBuf::from(path));
                }
            }
            _ => {
                if let Some(path) = arg.strip_prefix("--cache-dir=") {
                    cli_cache_dir = Some(PathBuf::from(path));
                } else if let Some(mode) = arg.strip_prefix("--cache-mode=") {
                    cli_cache_mode = parse_load_mode(mode);
                } else if let Some(path) = arg.strip_prefix("--input=") {
                    cli_input = Some(PathBuf::from(path));
                } else if let Some(path) = arg.strip_prefix("--output=") {
                    cli_output = Some(PathBuf::from(path));
                } else if let Some(cap) = arg.strip_prefix("--cap=") {
                    cli_cap = cap.parse::<usize>().ok().filter(|c| *c > 0);
                }
            }
        }
    }

    let cache_dir = cli_cache_dir
        .or_else(|| env::var("VARHIST_CACHE_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR));
    let cache_mode = cli_cache_mode
        .or_else(|| {
            env::var("VARHIST_CACHE_MODE")
                .ok()
                .as_deref()
                .and_then(parse_load_mode)
        })
        .unwrap_or(LoadMode::Mmap);
    let input = cli_input
        .or_else(|| env::var("VARHIST_INPUT").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
    let output = cli_output
        .or_else(|| env::var("VARHIST_OUTPUT").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    let cap = cli_cap
        .or_else(|| {
            env::var("VARHIST_CAP")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|v| *v > 0)
        })
        .unwrap_or(DEFAULT_CAP);

    Config {
        cache_dir,
        cache_mode,
        input,
        output,
        cap,
    }
}

fn parse_load_mode(raw: &str) -> Option<LoadMode> {
    match raw.to_ascii_lowercase().as_str() {
        "mmap" => Some(LoadMode::Mmap),
        "owned" => Some(LoadMode::Owned),
        _ => None,
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .init();
}
