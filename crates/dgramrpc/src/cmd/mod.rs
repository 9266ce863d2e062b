mod call;
mod probe;

use std::collections::BTreeMap;

use clap::{Args, Subcommand};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send one request and print the response document.
    Call(CallArgs),
    /// Connect and run the initialize handshake only.
    Probe(ProbeArgs),
}

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Method name to invoke on the remote peer.
    pub method: String,

    #[command(flatten)]
    pub session: SessionArgs,

    /// Request parameter as KEY=VALUE (repeatable).
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    #[command(flatten)]
    pub session: SessionArgs,
}

#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Remote endpoint as HOST:PORT.
    #[arg(long, value_name = "HOST:PORT")]
    pub address: String,

    /// Receive budget in milliseconds (default 2000).
    #[arg(long, value_name = "MS")]
    pub timeout: Option<u64>,

    /// Extra session option forwarded verbatim to the peer during
    /// initialize (KEY=VALUE, repeatable).
    #[arg(long = "option", value_name = "KEY=VALUE")]
    pub options: Vec<String>,
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Call(args) => call::run(args, format),
        Command::Probe(args) => probe::run(args, format),
    }
}

pub(crate) fn session_options(args: &SessionArgs) -> CliResult<BTreeMap<String, String>> {
    let mut options = BTreeMap::new();
    options.insert("address".to_string(), args.address.clone());
    if let Some(millis) = args.timeout {
        options.insert("timeout".to_string(), millis.to_string());
    }
    for entry in &args.options {
        let (key, value) = split_pair(entry)?;
        options.insert(key, value);
    }
    Ok(options)
}

pub(crate) fn split_pair(entry: &str) -> CliResult<(String, String)> {
    match entry.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(CliError::new(
            USAGE,
            format!("expected KEY=VALUE, got '{entry}'"),
        )),
    }
}
