use dgramrpc_client::UdpSessionClient;
use dgramrpc_wire::Request;

use crate::cmd::{session_options, split_pair, CallArgs};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::{print_document, OutputFormat};

pub fn run(args: CallArgs, format: OutputFormat) -> CliResult<i32> {
    let options = session_options(&args.session)?;
    let mut client = UdpSessionClient::from_options(options)
        .map_err(|err| client_error("invalid session options", err))?;

    let mut request = Request::new(&args.method);
    for entry in &args.params {
        let (key, value) = split_pair(entry)?;
        request = request.param(key, value);
    }

    client
        .send(&request)
        .map_err(|err| client_error("send failed", err))?;
    let (document, _consumed) = client
        .receive()
        .map_err(|err| client_error("receive failed", err))?;

    print_document(&document, format);
    Ok(SUCCESS)
}
