mod error;

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use dialoguer::Password;
use hibp_lookup::{Probe, RequestOptions, TlsPolicy};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::error::Error;

#[derive(Parser, Debug)]
#[command(name = "hibp-check")]
#[command(about = "Report how many times a password appears in the Have I Been Pwned breach corpus")]
#[command(version)]
struct Args {
    /// Password to check (prompted for without echo when neither this nor --hash is given)
    password: Option<String>,

    /// Check an already computed SHA-1 hash instead of a password
    #[arg(long)]
    hash: Option<String>,

    /// Extra request header, e.g. -H 'User-Agent: my-app'. May be repeated
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// Read timeout in seconds (0 disables it; negative values are rejected)
    #[arg(long)]
    read_timeout: Option<f64>,

    /// Connect timeout in seconds (0 disables it; negative values are rejected)
    #[arg(long)]
    connect_timeout: Option<f64>,

    /// Lookup endpoint; the hash is appended to it
    #[arg(long)]
    base_url: Option<String>,

    /// Proxy URL for all requests
    #[arg(long)]
    proxy: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long)]
    insecure: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = run(args);
    match &result {
        Ok(0) => println!("Good news: no breaches found."),
        Ok(count) => println!("Oh no: pwned! This password has been seen {} times before.", count),
        Err(e) => eprintln!("Error: {}", e),
    }

    ExitCode::from(exit_code(&result))
}

/// `0` when not found, `1` when breached, `2` on any error.
fn exit_code(result: &Result<u64, Error>) -> u8 {
    match result {
        Ok(0) => 0,
        Ok(_) => 1,
        Err(_) => 2,
    }
}

fn run(args: Args) -> Result<u64, Error> {
    if args.password.is_some() && args.hash.is_some() {
        return Err(Error::InvalidArgs);
    }

    let options = build_options(&args)?;
    debug!(base_url = %options.base_url, "starting lookup");

    let probe = match (args.hash, args.password) {
        (Some(hash), _) => Probe::new(hash, options)?,
        (None, Some(password)) => Probe::from_password(&password, options)?,
        (None, None) => {
            let password = Password::new().with_prompt("Password").interact()?;
            Probe::from_password(&password, options)?
        }
    };

    Ok(probe.check()?)
}

/// Environment-derived options with command-line flags applied on top.
fn build_options(args: &Args) -> Result<RequestOptions, Error> {
    let mut options = RequestOptions::from_env()?;

    for header in &args.headers {
        let (name, value) = parse_header(header)?;
        options = options.header(name, value);
    }
    if let Some(secs) = args.read_timeout {
        options = options.read_timeout(seconds("--read-timeout", secs)?);
    }
    if let Some(secs) = args.connect_timeout {
        options = options.connect_timeout(seconds("--connect-timeout", secs)?);
    }
    if let Some(base_url) = &args.base_url {
        options = options.base_url(base_url.clone());
    }
    if let Some(proxy) = &args.proxy {
        options = options.proxy(proxy.clone());
    }
    if args.insecure {
        options = options.tls(TlsPolicy::AcceptInvalidCerts);
    }

    Ok(options)
}

fn parse_header(raw: &str) -> Result<(&str, &str), Error> {
    match raw.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value.trim())),
        _ => Err(Error::MalformedHeader(raw.to_string())),
    }
}

/// `0` disables the timeout; negative, NaN and infinite values are rejected.
fn seconds(flag: &'static str, secs: f64) -> Result<Option<Duration>, Error> {
    if secs == 0.0 {
        return Ok(None);
    }
    if secs > 0.0 && secs.is_finite() {
        return Ok(Some(Duration::from_secs_f64(secs)));
    }
    Err(Error::InvalidTimeout { flag, value: secs })
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
