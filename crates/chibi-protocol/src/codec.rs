//! Frame codec.
//!
//! A frame is a JSON array of command objects. The session speaks one frame
//! per message; the local relay uses one frame per line.

use serde_json::Value;

use crate::command::Command;
use crate::error::{ProtocolError, Result};

/// Encode commands into a single frame.
pub fn encode(commands: &[Command]) -> Result<String> {
    let values = commands
        .iter()
        .map(Command::to_value)
        .collect::<serde_json::Result<Vec<_>>>()?;
    Ok(serde_json::to_string(&values)?)
}

/// Decode a frame into commands.
///
/// Individual entries never fail to decode; unrecognized entries come back
/// as [`Command::Unknown`]. Only invalid JSON or a non-array frame is an
/// error.
pub fn decode(frame: &str) -> Result<Vec<Command>> {
    match serde_json::from_str::<Value>(frame)? {
        Value::Array(entries) => Ok(entries.into_iter().map(Command::from_value).collect()),
        other => Err(ProtocolError::NotAnArray {
            found: json_type(&other),
        }),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{LocationChecks, StatusUpdate};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_preserves_order() {
        let frame = encode(&[
            LocationChecks {
                locations: vec![2326528, 2326529],
                ..Default::default()
            }
            .into(),
            StatusUpdate {
                status: 30,
                ..Default::default()
            }
            .into(),
        ])
        .unwrap();

        let commands = decode(&frame).unwrap();
        let names: Vec<_> = commands.iter().map(Command::name).collect();
        assert_eq!(names, vec!["LocationChecks", "StatusUpdate"]);
    }

    #[test]
    fn test_decode_rejects_non_array() {
        let err = decode(r#"{"cmd": "RoomInfo"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::NotAnArray { found: "object" }));
        assert!(err.is_malformed_input());
    }

    #[test]
    fn test_decode_rejects_invalid_json() {
        let err = decode("[{").unwrap_err();
        assert!(err.is_malformed_input());
    }

    #[test]
    fn test_decode_empty_frame() {
        assert!(decode("[]").unwrap().is_empty());
    }
}
