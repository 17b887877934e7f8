use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::api::models::{Message, MessagePart};
use crate::error::{MailError, MailResult};

const MULTIPART_ALTERNATIVE: &str = "multipart/alternative";

// The service emits both padded and unpadded url-safe payloads.
const URL_SAFE_INDIFFERENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Returns the decoded body of the first part matching `mime_type`
/// ("text/plain" or "text/html") with a non-empty payload. Top-level
/// parts are checked directly; a top-level `multipart/alternative`
/// container has its direct children checked too. Deeper nesting is
/// not searched.
pub fn message_body(msg: &Message, mime_type: &str) -> MailResult<String> {
    let parts = msg
        .payload
        .as_ref()
        .map(|payload| payload.parts.as_slice())
        .unwrap_or_default();

    for part in parts {
        if part.mime_type == MULTIPART_ALTERNATIVE {
            for nested in &part.parts {
                if let Some(data) = matching_payload(nested, mime_type) {
                    return decode_body(data);
                }
            }
        }
        if let Some(data) = matching_payload(part, mime_type) {
            return decode_body(data);
        }
    }

    Err(MailError::NotFound(
        "no message part matches the requested mime type",
    ))
}

fn matching_payload<'a>(part: &'a MessagePart, mime_type: &str) -> Option<&'a str> {
    if part.mime_type != mime_type {
        return None;
    }

    let body = part.body.as_ref()?;
    if body.size < 1 {
        return None;
    }

    Some(body.data.as_deref().unwrap_or_default())
}

fn decode_body(data: &str) -> MailResult<String> {
    let decoded = URL_SAFE_INDIFFERENT.decode(data)?;
    Ok(String::from_utf8(decoded)?)
}
