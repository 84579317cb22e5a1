use tracing::{debug, warn};

use super::document::Document;
use super::entity::{self, Entity};
use crate::errors::Error;
use crate::record::BusinessRecord;


/// Prefix of the answer envelope namespace declared by the registry
pub const ENVELOPE_PREFIX: &str = "are";
/// Prefix of the registry data types namespace
pub const DATA_PREFIX: &str = "D";

const ENTITY: &str = "VBAS";
const ERROR_CODE: &str = "EK";
const ERROR_TEXT: &str = "ET";


/// Parse a registry response for the queried identification number
pub fn parse(body: &[u8], identifier: &str) -> Result<BusinessRecord, Error> {
    let document = Document::parse(body).map_err(|err| {
        warn!(identifier, error = %err, "Unreadable registry response");
        Error::InvalidResponse
    })?;

    let envelope = document.namespace(ENVELOPE_PREFIX);
    let data = document.namespace(DATA_PREFIX);

    if let Some(signal) = data.and_then(|ns| ErrorSignal::find(&document, ns)) {
        return Err(signal.into_error(identifier));
    }

    // the entity is nested in the first answer of the envelope
    let element = match (envelope, data) {
        (Some(envelope), Some(data)) => document
            .root()
            .children_in(envelope)
            .next()
            .and_then(|answer| answer.child(data, ENTITY)),
        _ => None,
    };

    if element.is_none() {
        debug!(identifier, "Response contains no entity");
    }

    Ok(entity::map(Entity::new(element, data.unwrap_or_default())))
}


/// An error reported by the registry inside an otherwise successful response
#[derive(Debug)]
struct ErrorSignal {
    code: Option<String>,
    message: Option<String>,
}

impl ErrorSignal {
    /// Search the whole document, the registry doesn't always nest errors in the answer
    fn find(document: &Document, namespace: &str) -> Option<ErrorSignal> {
        let code = document.find(namespace, ERROR_CODE).map(|el| el.text.trim().to_string());
        let message = document.find(namespace, ERROR_TEXT).map(|el| el.text.trim().to_string());

        match (code, message) {
            (None, None) => None,
            (code, message) => Some(ErrorSignal { code, message }),
        }
    }

    fn into_error(self, identifier: &str) -> Error {
        debug!(identifier, code = ?self.code, message = ?self.message, "Registry signalled an error");

        match self.message {
            Some(message) if !is_blank(&message) => Error::NotFound {
                identifier: identifier.to_string(),
                message,
                code: self.code.as_deref().map(error_code).unwrap_or(0),
            },
            _ => Error::InvalidResponse,
        }
    }
}

/// A message of a bare 0 counts as no message at all
fn is_blank(message: &str) -> bool {
    message.is_empty() || message == "0"
}

/// The leading, optionally signed, integer of the code or 0 if there is none
fn error_code(code: &str) -> i64 {
    let unsigned = code.strip_prefix(['+', '-']).unwrap_or(code);
    let sign = code.len() - unsigned.len();
    let end = sign + unsigned.bytes().take_while(u8::is_ascii_digit).count();
    code[..end].parse().unwrap_or(0)
}
