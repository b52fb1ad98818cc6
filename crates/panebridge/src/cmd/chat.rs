use std::sync::Arc;

use serde_json::json;

use panebridge_channel::PanelChannel;
use panebridge_protocol::{PanelProtocol, ProtocolConfig};
use panebridge_wire::{ops, ChatRequest};

use crate::cmd::{runtime, ChatArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_envelope, OutputFormat};

pub fn run(args: ChatArgs, format: OutputFormat) -> CliResult<i32> {
    let mut request = ChatRequest::from_prompt(&args.prompt);
    request.model = args.model.clone();

    let channel = Arc::new(PanelChannel::new());
    let mut rx = channel.attach();
    let protocol = PanelProtocol::new(
        channel,
        Arc::new(args.script.completion()),
        ProtocolConfig::default(),
    );

    let message = json!({
        "messageType": ops::STREAM_CHAT,
        "messageId": "cli-1",
        "data": request,
    });

    let rt = runtime()?;
    rt.block_on(protocol.handle_message(&message));

    while let Ok(envelope) = rx.try_recv() {
        print_envelope(&envelope, format);
    }

    Ok(SUCCESS)
}
