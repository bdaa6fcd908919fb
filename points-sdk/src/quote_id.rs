//! Quote identifiers.
//!
//! A quote id is `HMAC-SHA256(canonical_json, secret)` encoded as unpadded
//! base64. It is derived from the quote itself, so the same inputs always
//! produce the same id and the server never has to remember it.
//!
//! ```text
//! quoteId = base64(HMAC-SHA256(json(quote with quoteId = ""), secret))
//! ```

use serde::Serialize;

use crate::objects::QuoteResponse;

/// Number of HMAC bytes kept in the id.
pub const QUOTE_ID_BYTES: usize = 18;

/// Derive the id for `quote`, ignoring whatever `quote_id` it carries.
pub fn derive_quote_id(quote: &QuoteResponse, key: &[u8]) -> Result<String, serde_json::Error> {
    let mut canonical = quote.clone();
    canonical.quote_id = String::new();
    fingerprint(&canonical, key)
}

fn fingerprint<T: Serialize>(body: &T, key: &[u8]) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(body)?;
    let tag = ring::hmac::sign(
        &ring::hmac::Key::new(ring::hmac::HMAC_SHA256, key),
        json.as_bytes(),
    );
    Ok(fast32::base64::RFC4648_NOPAD.encode(&tag.as_ref()[..QUOTE_ID_BYTES]))
}
