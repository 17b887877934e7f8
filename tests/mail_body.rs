use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::json;

use gmail_inbox::api::models::Message;
use gmail_inbox::error::MailError;
use gmail_inbox::mail::body::message_body;

fn alternative_message() -> Message {
    let plain = URL_SAFE_NO_PAD.encode("Meeting moved to 3pm.");
    let html = URL_SAFE_NO_PAD.encode("<p>Meeting moved to <b>3pm</b>.</p>");

    serde_json::from_value(json!({
        "id": "18c2f5a9e0b7d431",
        "threadId": "18c2f5a9e0b7d431",
        "labelIds": ["INBOX", "UNREAD"],
        "snippet": "Meeting moved to 3pm.",
        "internalDate": "1500000000000",
        "payload": {
            "partId": "",
            "mimeType": "multipart/mixed",
            "headers": [
                {"name": "From", "value": "alice@example.com"},
                {"name": "Subject", "value": "Schedule change"}
            ],
            "parts": [
                {
                    "partId": "0",
                    "mimeType": "multipart/alternative",
                    "body": {"size": 0},
                    "parts": [
                        {
                            "partId": "0.0",
                            "mimeType": "text/plain",
                            "body": {"size": 21, "data": plain}
                        },
                        {
                            "partId": "0.1",
                            "mimeType": "text/html",
                            "body": {"size": 35, "data": html}
                        }
                    ]
                },
                {
                    "partId": "1",
                    "mimeType": "application/pdf",
                    "filename": "agenda.pdf",
                    "body": {"size": 11082, "attachmentId": "ANGjdJ_2c"}
                }
            ]
        }
    }))
    .expect("message json")
}

#[test]
fn finds_plain_text_inside_multipart_alternative() {
    let msg = alternative_message();

    assert_eq!(
        message_body(&msg, "text/plain").expect("plain body"),
        "Meeting moved to 3pm."
    );
}

#[test]
fn finds_html_inside_multipart_alternative() {
    let msg = alternative_message();

    assert_eq!(
        message_body(&msg, "text/html").expect("html body"),
        "<p>Meeting moved to <b>3pm</b>.</p>"
    );
}

#[test]
fn reports_not_found_for_absent_mime_types() {
    let msg = alternative_message();

    assert!(matches!(
        message_body(&msg, "text/calendar"),
        Err(MailError::NotFound(_))
    ));
}

#[test]
fn decodes_simple_top_level_part() {
    let msg: Message = serde_json::from_value(json!({
        "id": "18c2f5a9e0b7d432",
        "payload": {
            "mimeType": "multipart/mixed",
            "parts": [
                {
                    "partId": "0",
                    "mimeType": "text/plain",
                    "body": {"size": 5, "data": URL_SAFE_NO_PAD.encode("hello")}
                }
            ]
        }
    }))
    .expect("message json");

    assert_eq!(message_body(&msg, "text/plain").expect("body"), "hello");
}

#[test]
fn rejects_invalid_base64_payloads() {
    let msg: Message = serde_json::from_value(json!({
        "id": "18c2f5a9e0b7d433",
        "payload": {
            "mimeType": "multipart/mixed",
            "parts": [
                {
                    "partId": "0",
                    "mimeType": "text/plain",
                    "body": {"size": 4, "data": "!!not base64!!"}
                }
            ]
        }
    }))
    .expect("message json");

    assert!(matches!(
        message_body(&msg, "text/plain"),
        Err(MailError::Decode(_))
    ));
}
