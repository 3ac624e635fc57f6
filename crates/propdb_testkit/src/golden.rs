//! Byte-level golden assertions.
//!
//! Wire expectations are written as hex strings; whitespace inside them
//! is ignored so long encodings can be grouped per field.

/// Encodes bytes as hexadecimal string.
pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Decodes hexadecimal string to bytes.
pub fn hex_decode(hex: &str) -> Vec<u8> {
    let hex = hex.replace([' ', '\n', '\r'], "");
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).expect("Invalid hex"))
        .collect()
}

/// Asserts that `actual` encodes to the expected hex.
#[track_caller]
pub fn assert_hex(actual: &[u8], expected_hex: &str) {
    let expected = hex_decode(expected_hex);
    if actual != expected.as_slice() {
        panic!(
            "golden bytes differ:\n\
             Expected ({} bytes): {}\n\
             Actual ({} bytes): {}",
            expected.len(),
            hex_encode(&expected),
            actual.len(),
            hex_encode(actual)
        );
    }
}
