//! Shareable code generation for events and tickets.
//!
//! Event codes are short URL-safe strings that go into registration links.
//! Ticket codes embed the parent event code followed by a random hex suffix,
//! e.g. `K3J_9QXA-4F0C19BE`.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;

/// Length of an event code in characters.
pub const EVENT_CODE_LEN: usize = 8;

/// Random bytes behind a ticket suffix (two hex digits each).
const TICKET_SUFFIX_BYTES: usize = 4;

/// Generates an upper-cased, URL-safe event code.
///
/// Six random bytes encode to exactly eight base64url characters.
pub fn generate_event_code() -> String {
    let mut bytes = [0u8; 6];
    rand::thread_rng().fill_bytes(&mut bytes);

    let mut code = URL_SAFE_NO_PAD.encode(bytes).to_uppercase();
    code.truncate(EVENT_CODE_LEN);
    code
}

/// Generates a ticket code for the given event.
pub fn generate_ticket_code(event_code: &str) -> String {
    let mut bytes = [0u8; TICKET_SUFFIX_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);

    format!("{}-{}", event_code, hex::encode_upper(bytes))
}
