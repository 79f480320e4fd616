//! Base64 framing of ciphertext entries as they appear in config files

use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::{general_purpose, DecodePaddingMode};
use base64::{alphabet, Engine};

/// Standard alphabet, `=` padding optional on decode
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode a config-file ciphertext entry into the raw blob sent to the key service
///
/// Surrounding whitespace is ignored, which tolerates values pasted from a
/// terminal with a trailing newline. Trailing `=` padding may be omitted.
pub fn decode_ciphertext(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    LENIENT.decode(encoded.trim())
}

/// Encode a raw ciphertext blob for storage in a config file
pub fn encode_ciphertext(blob: &[u8]) -> String {
    general_purpose::STANDARD.encode(blob)
}
