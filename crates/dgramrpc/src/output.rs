use std::io::IsTerminal;

use clap::ValueEnum;
use dgramrpc_wire::Document;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Json,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

pub fn print_document(document: &Document, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{document}"),
        OutputFormat::Pretty => println!(
            "{}",
            serde_json::to_string_pretty(document).unwrap_or_else(|_| document.to_string())
        ),
    }
}
