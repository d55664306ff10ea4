//! Base64 `data:` URIs for handing encoded images to the host.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Build `data:<media_type>;base64,<payload>` from encoded bytes.
pub fn to_data_uri(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, STANDARD.encode(bytes))
}
