use dgramrpc_client::UdpSessionClient;

use crate::cmd::{session_options, ProbeArgs};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::{print_document, OutputFormat};

/// Establish the session and run the initialize handshake, nothing else.
pub fn run(args: ProbeArgs, format: OutputFormat) -> CliResult<i32> {
    let options = session_options(&args.session)?;
    let mut client = UdpSessionClient::from_options(options)
        .map_err(|err| client_error("invalid session options", err))?;

    client
        .ensure_connected()
        .map_err(|err| client_error("initialize failed", err))?;

    let report = serde_json::json!({
        "initialized": true,
        "address": client.config().address(),
        "timeout_ms": client.config().timeout().as_millis(),
    });
    print_document(&report, format);
    Ok(SUCCESS)
}
