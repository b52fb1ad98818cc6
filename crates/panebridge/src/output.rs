use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use panebridge_wire::{Envelope, ModelDescriptor};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

pub fn print_envelope(envelope: &Envelope, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(envelope).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["TYPE", "ID", "DATA"])
                .add_row(vec![
                    envelope.message_type.clone(),
                    envelope.message_id.clone(),
                    data_preview(envelope),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "type={} id={} data={}",
                envelope.message_type,
                envelope.message_id,
                data_preview(envelope)
            );
        }
        OutputFormat::Raw => {
            print_raw(data_preview(envelope).as_bytes());
            println!();
        }
    }
}

pub fn print_models(models: &[ModelDescriptor], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(models).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["TITLE", "PROVIDER", "MODEL"]);
            for model in models {
                table.add_row(vec![
                    model.title.clone(),
                    model.provider.clone(),
                    model.model.clone(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for model in models {
                println!("{} ({}/{})", model.title, model.provider, model.model);
            }
        }
    }
}

fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn data_preview(envelope: &Envelope) -> String {
    serde_json::to_string(&envelope.data).unwrap_or_else(|_| "null".to_string())
}
