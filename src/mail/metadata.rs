use serde::Serialize;

use crate::api::models::Message;

/// The subset of message headers most callers care about. Scalar
/// fields keep the last occurrence of their header; list fields
/// accumulate every occurrence in header order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PartialMetadata {
    /// Entity that originally created and sent the message.
    pub sender: String,
    /// Entity that delivered the message here; for mailing-list
    /// traffic this is the relay, not the author.
    pub from: String,
    pub subject: String,
    /// Mailing list the message was posted to, if any.
    pub mailing_list: String,
    pub cc: Vec<String>,
    pub to: Vec<String>,
    /// Discussion-thread topics, e.g. from group services.
    pub thread_topic: Vec<String>,
    /// Addresses the message was delivered to; forwarding adds more.
    pub delivered_to: Vec<String>,
}

/// Collects the recognized headers into a [`PartialMetadata`].
/// Unrecognized headers are skipped; absent ones leave their field
/// empty.
pub fn partial_metadata(msg: &Message) -> PartialMetadata {
    let mut info = PartialMetadata::default();
    let headers = msg
        .payload
        .as_ref()
        .map(|payload| payload.headers.as_slice())
        .unwrap_or_default();

    for header in headers {
        match header.name.as_str() {
            "Sender" => info.sender = header.value.clone(),
            "From" => info.from = header.value.clone(),
            "Subject" => info.subject = header.value.clone(),
            "Mailing-list" => info.mailing_list = header.value.clone(),
            "CC" => info.cc.push(header.value.clone()),
            "To" => info.to.push(header.value.clone()),
            "Thread-Topic" => info.thread_topic.push(header.value.clone()),
            "Delivered-To" => info.delivered_to.push(header.value.clone()),
            _ => {}
        }
    }

    info
}
