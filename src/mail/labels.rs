use crate::api::models::Message;

/// True when the message carries the given label. Label ids are
/// upper-case by service convention, so the argument's casing does
/// not matter.
pub fn has_label(msg: &Message, label: &str) -> bool {
    let needle = label.to_uppercase();
    msg.label_ids.iter().any(|id| *id == needle)
}
