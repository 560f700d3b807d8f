//! Kapsel Bridge
//!
//! Wire codec for native bridge calls tunneled through URL loads.
//!
//! The rendering surface has no direct function-call channel to the
//! native side, so it encodes a call as a single URL and triggers a
//! navigation to it. The shell's navigation policy intercepts the load,
//! decodes the command here, and dispatches it; the URL is never loaded
//! as a page.
//!
//! Wire format: `kapsel://exec/` + `service` + `#` + `action` + `#` +
//! `callbackId` + `#` + `args`. Only `args` may contain `#`: it is
//! everything after the third delimiter, forwarded verbatim.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed literal prefix marking a URL as an encoded bridge call.
///
/// Agreed between the surface-side script and the shell; a dedicated
/// scheme cannot collide with a real web host.
pub const EXEC_URL_PREFIX: &str = "kapsel://exec/";

/// A native bridge call carried by a URL load.
///
/// `args` is opaque at this layer (typically a JSON array); nothing
/// here parses or validates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeCommand {
    pub service: String,
    pub action: String,
    pub callback_id: String,
    pub args: String,
}

/// Failure to decode an exec URL.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CommandDecodeError {
    #[error("missing the {EXEC_URL_PREFIX} prefix")]
    NotExecUrl,
    #[error("expected service#action#callbackId#args after the prefix")]
    MissingField,
}

/// Failure to encode a command as an exec URL.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CommandEncodeError {
    #[error("`#` is reserved as the field delimiter (found in {0})")]
    DelimiterInField(&'static str),
}

impl BridgeCommand {
    /// Decode a command from an exec URL.
    ///
    /// Each boundary is the first `#` strictly after the previous one, so
    /// everything past the third boundary (further `#` characters
    /// included) lands in `args` unsplit. Callers treat an error as "not
    /// a command": log it and drop the navigation, never load the URL.
    pub fn decode(url: &str) -> Result<Self, CommandDecodeError> {
        let rest = url
            .strip_prefix(EXEC_URL_PREFIX)
            .ok_or(CommandDecodeError::NotExecUrl)?;
        let (service, rest) = rest.split_once('#').ok_or(CommandDecodeError::MissingField)?;
        let (action, rest) = rest.split_once('#').ok_or(CommandDecodeError::MissingField)?;
        let (callback_id, args) = rest.split_once('#').ok_or(CommandDecodeError::MissingField)?;
        Ok(Self {
            service: service.to_string(),
            action: action.to_string(),
            callback_id: callback_id.to_string(),
            args: args.to_string(),
        })
    }

    /// Serialize back into the exec URL form.
    ///
    /// Refused when `service`, `action`, or `callback_id` contain the
    /// delimiter; those fields would not survive a round trip.
    pub fn encode(&self) -> Result<String, CommandEncodeError> {
        for (name, value) in [
            ("service", &self.service),
            ("action", &self.action),
            ("callbackId", &self.callback_id),
        ] {
            if value.contains('#') {
                return Err(CommandEncodeError::DelimiterInField(name));
            }
        }
        Ok(format!(
            "{EXEC_URL_PREFIX}{}#{}#{}#{}",
            self.service, self.action, self.callback_id, self.args
        ))
    }

    /// Cheap prefix check used by the navigation chain before decoding.
    pub fn is_exec_url(url: &str) -> bool {
        url.starts_with(EXEC_URL_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode() {
        let url = format!("{EXEC_URL_PREFIX}Device#getInfo#12#[]");
        let command = BridgeCommand::decode(&url).unwrap();
        assert_eq!(command.service, "Device");
        assert_eq!(command.action, "getInfo");
        assert_eq!(command.callback_id, "12");
        assert_eq!(command.args, "[]");
    }

    #[test]
    fn test_args_keep_embedded_delimiters() {
        let url = format!("{EXEC_URL_PREFIX}Notify#alert#7#[\"#1 done\",\"a#b\"]");
        let command = BridgeCommand::decode(&url).unwrap();
        assert_eq!(command.args, "[\"#1 done\",\"a#b\"]");
    }

    #[test]
    fn test_decode_missing_fields() {
        let url = format!("{EXEC_URL_PREFIX}Device#getInfo");
        assert_eq!(
            BridgeCommand::decode(&url),
            Err(CommandDecodeError::MissingField)
        );
        let url = format!("{EXEC_URL_PREFIX}Device");
        assert_eq!(
            BridgeCommand::decode(&url),
            Err(CommandDecodeError::MissingField)
        );
    }

    #[test]
    fn test_decode_wrong_prefix() {
        assert_eq!(
            BridgeCommand::decode("https://example.com/a#b#c#d"),
            Err(CommandDecodeError::NotExecUrl)
        );
    }

    #[test]
    fn test_encode_round_trip() {
        let command = BridgeCommand {
            service: "Camera".to_string(),
            action: "takePicture".to_string(),
            callback_id: "Camera1".to_string(),
            args: "[50,\"#ff0000\"]".to_string(),
        };
        let url = command.encode().unwrap();
        assert!(BridgeCommand::is_exec_url(&url));
        assert_eq!(BridgeCommand::decode(&url).unwrap(), command);
    }

    #[test]
    fn test_encode_rejects_delimiter_in_fields() {
        let command = BridgeCommand {
            service: "Cam#era".to_string(),
            action: "go".to_string(),
            callback_id: "1".to_string(),
            args: String::new(),
        };
        assert_eq!(
            command.encode(),
            Err(CommandEncodeError::DelimiterInField("service"))
        );
    }
}
