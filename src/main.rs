//! geotrace - IP geolocation lookup from the command line.
//!
//! Shows where your own public IP address is, then traces any addresses
//! given on the command line or typed interactively.

#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use geotrace::clock::{self, TimeSlot};
use geotrace::config::DEFAULT_CLOCK_TICK_MS;
use geotrace::render::{JsonSurface, MapWidget, Surface, TextMap, TextSurface};
use geotrace::{ClientEnvironment, FallbackProvider, Lookup, LookupConfig, Session};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Get the version string for geotrace
fn get_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(env!("CARGO_PKG_VERSION"), "-UNRELEASED")
    } else {
        env!("CARGO_PKG_VERSION")
    }
}

/// Command-line arguments for the lookup tool.
#[derive(Parser, Debug)]
#[clap(author, version, about = "IP geolocation lookup with API fallback", long_about = None)]
struct Args {
    /// IP addresses to trace
    ips: Vec<String>,

    /// Skip looking up your own public IP address
    #[clap(long)]
    no_self: bool,

    /// Read addresses to trace from stdin, one per line
    #[clap(short, long)]
    interactive: bool,

    /// Output results in JSON format
    #[clap(long)]
    json: bool,

    /// Timeout for each API request in milliseconds
    #[clap(long, default_value_t = geotrace::config::DEFAULT_REQUEST_TIMEOUT_MS)]
    timeout_ms: u64,

    /// Delay before retrying the primary API in milliseconds
    #[clap(long, default_value_t = geotrace::config::DEFAULT_RETRY_DELAY_MS)]
    retry_delay_ms: u64,

    /// How long responses are cached, in seconds
    #[clap(long, default_value_t = geotrace::config::DEFAULT_CACHE_TTL_SECS)]
    cache_ttl_secs: u64,

    /// Fallback API used when the primary one fails
    #[clap(long, value_enum, default_value_t = FallbackArg::IpapiCo)]
    fallback: FallbackArg,

    /// User agent sent with requests and used for client details
    #[clap(long)]
    user_agent: Option<String>,

    /// Enable verbose output (use -vv for debug logging)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum FallbackArg {
    IpapiCo,
    IpApiCom,
}

impl From<FallbackArg> for FallbackProvider {
    fn from(arg: FallbackArg) -> Self {
        match arg {
            FallbackArg::IpapiCo => FallbackProvider::IpapiCo,
            FallbackArg::IpApiCom => FallbackProvider::IpApiCom,
        }
    }
}

fn main() {
    // Quick check for help/version before starting async runtime
    let args: Vec<String> = std::env::args().collect();
    if args.len() == 2 && (args[1] == "--help" || args[1] == "-h") {
        // Clap will handle this
        let _ = Args::parse();
        return;
    }
    if args.len() == 2 && (args[1] == "--version" || args[1] == "-V") {
        println!("geotrace {}", get_version());
        return;
    }

    let args = Args::parse();
    geotrace::logging::init_logger(args.verbose);

    // Create single-threaded tokio runtime for lower overhead
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to create Tokio runtime");

    match runtime.block_on(async_main(args)) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Build the lookup configuration from arguments and environment
fn build_config(args: &Args, user_agent: &str) -> Result<LookupConfig> {
    LookupConfig::builder()
        .fallback(args.fallback.into())
        .request_timeout(Duration::from_millis(args.timeout_ms))
        .retry_delay(Duration::from_millis(args.retry_delay_ms))
        .cache_ttl(Duration::from_secs(args.cache_ttl_secs))
        .user_agent(user_agent)
        .env_overrides()
        .build()
        .map_err(|e| anyhow!("Invalid configuration - {}", e))
}

/// Run the session; returns whether every lookup succeeded
async fn async_main(args: Args) -> Result<bool> {
    let user_agent = args
        .user_agent
        .clone()
        .unwrap_or_else(|| geotrace::client_info::DEFAULT_USER_AGENT.to_string());
    let config = build_config(&args, &user_agent)?;
    log::debug!("Using configuration: {:?}", config);

    let lookup = Lookup::new(config).context("Failed to create HTTP client")?;
    let env = ClientEnvironment::detect(user_agent);

    let surface: Box<dyn Surface> = if args.json {
        Box::new(JsonSurface::stdout())
    } else {
        Box::new(TextSurface::stdio())
    };
    let map: Box<dyn MapWidget> = Box::new(TextMap::stdout(args.json));
    let mut session = Session::new(lookup, &env, surface, map);

    let mut all_ok = true;

    if !args.no_self {
        all_ok &= session.load().await.is_ok();
    }

    for ip in &args.ips {
        all_ok &= session.submit(ip).await.is_ok();
    }

    if args.interactive {
        all_ok &= run_interactive(&mut session).await?;
    }

    Ok(all_ok)
}

/// Trace addresses read from stdin until EOF
async fn run_interactive(session: &mut Session) -> Result<bool> {
    let slot: TimeSlot = session.time_slot();
    let ticker = clock::spawn_ticker(Duration::from_millis(DEFAULT_CLOCK_TICK_MS), slot.clone());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut all_ok = true;

    loop {
        prompt(&slot);
        let Some(line) = lines.next_line().await.context("Failed to read stdin")? else {
            break;
        };
        all_ok &= session.submit(&line).await.is_ok();
    }

    ticker.abort();
    Ok(all_ok)
}

fn prompt(slot: &TimeSlot) {
    let now = slot.lock().expect("mutex poisoned").clone();
    let mut err = std::io::stderr();
    let _ = write!(err, "[{}] Trace IP> ", now);
    let _ = err.flush();
}
