use serde_json::Value;

use crate::{
    domain::{
        events::{RelayCommand, RelayEvent},
        stats::PopulationStats,
    },
    relay::protocol::{encode_event, ProtocolError},
};

/// Maps a decoded Socket.IO event onto the relay contract.
///
/// Unknown event names yield `Ok(None)`; known names with a payload of the
/// wrong shape are errors.
pub fn inbound_event(name: &str, args: Vec<Value>) -> Result<Option<RelayEvent>, ProtocolError> {
    let event = match name {
        "partnerFound" => RelayEvent::PartnerFound,
        "partnerDisconnected" => RelayEvent::PartnerDisconnected,
        "typing" => RelayEvent::Typing,
        "message" => RelayEvent::Message(text_payload(args)?),
        "stats" => RelayEvent::Stats(stats_payload(args)?),
        _ => return Ok(None),
    };

    Ok(Some(event))
}

pub fn encode_command(command: &RelayCommand) -> String {
    match command {
        RelayCommand::FindPartner => encode_event(command.event_name(), &[]),
        RelayCommand::Message(text) => {
            encode_event(command.event_name(), &[Value::String(text.clone())])
        }
    }
}

fn text_payload(args: Vec<Value>) -> Result<String, ProtocolError> {
    match args.into_iter().next() {
        Some(Value::String(text)) => Ok(text),
        Some(other) => Err(ProtocolError::InvalidPayload {
            event: "message",
            details: format!("expected string, got {}", json_kind(&other)),
        }),
        None => Err(ProtocolError::InvalidPayload {
            event: "message",
            details: "missing text".to_owned(),
        }),
    }
}

fn stats_payload(args: Vec<Value>) -> Result<PopulationStats, ProtocolError> {
    let value = args
        .into_iter()
        .next()
        .ok_or_else(|| ProtocolError::InvalidPayload {
            event: "stats",
            details: "missing object".to_owned(),
        })?;

    serde_json::from_value(value).map_err(|error| ProtocolError::InvalidPayload {
        event: "stats",
        details: error.to_string(),
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
