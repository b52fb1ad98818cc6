use std::fs;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

use panebridge_channel::PanelChannel;
use panebridge_protocol::{PanelProtocol, ProtocolConfig};
use panebridge_wire::Envelope;

use crate::cmd::{load_models, runtime, ReplayArgs};
use crate::exit::{io_error, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_envelope, OutputFormat};

pub fn run(args: ReplayArgs, format: OutputFormat) -> CliResult<i32> {
    let raw = fs::read_to_string(&args.path)
        .map_err(|err| io_error(&format!("failed reading {}", args.path.display()), err))?;

    let config = ProtocolConfig {
        models: load_models(args.models.as_deref())?,
        ..ProtocolConfig::default()
    };
    let channel = Arc::new(PanelChannel::new());
    let mut rx = channel.attach();
    let protocol = PanelProtocol::new(channel, Arc::new(args.script.completion()), config);

    let rt = runtime()?;
    let mut handled = 0usize;
    for (number, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let message: Value = serde_json::from_str(line).map_err(|err| {
            crate::exit::CliError::new(
                DATA_INVALID,
                format!("{}:{}: invalid JSON: {err}", args.path.display(), number + 1),
            )
        })?;

        rt.block_on(protocol.handle_message(&message));
        handled += 1;
        for envelope in drain(&mut rx) {
            print_envelope(&envelope, format);
        }
    }

    debug!(messages = handled, "replay complete");
    Ok(SUCCESS)
}

fn drain(rx: &mut UnboundedReceiver<Envelope>) -> Vec<Envelope> {
    let mut out = Vec::new();
    while let Ok(envelope) = rx.try_recv() {
        out.push(envelope);
    }
    out
}
