//! Key-to-filename encoding
//!
//! Maps arbitrary byte keys to names that are valid filenames on all common
//! operating systems while staying close to the input for readability.
//! Letters, digits and `._-` pass through, `/` becomes `_%_`, any other code
//! point becomes `#` followed by the hex of its zig-zag varint, and bytes that
//! are not valid UTF-8 become `%` followed by two hex digits.
//!
//! "Letters" means the Unicode Alphabetic property, which also admits the
//! Other_Alphabetic combining marks (Hebrew points, for example). Those pass
//! through unescaped. Injectivity never depends on that choice since `#`, `%`,
//! `/` and `~` are not alphabetic.
//!
//! The mapping is injective and one-way. Nothing ever decodes a filename.

/// Escape for the path separator
const SLASH_ESCAPE: &str = "_%_";

/// Prefix of an escaped code point
const CODE_POINT_MARKER: char = '#';

/// Prefix of an escaped non-UTF-8 byte
const RAW_BYTE_MARKER: char = '%';

/// Punctuation that can appear in filenames on every platform
const fn is_safe_punct(c: char) -> bool {
    matches!(c, '.' | '_' | '-')
}

fn passes_through(c: char) -> bool {
    c.is_alphabetic() || c.is_numeric() || is_safe_punct(c)
}

/// Zig-zag varint encoding of a code point, as produced by a signed LEB128 writer
fn varint(c: char) -> ([u8; 10], usize) {
    let mut buf = [0u8; 10];
    let mut ux = u64::from(u32::from(c)) << 1;
    let mut n = 0;
    while ux >= 0x80 {
        buf[n] = (ux as u8) | 0x80;
        ux >>= 7;
        n += 1;
    }
    buf[n] = ux as u8;
    (buf, n + 1)
}

fn push_escaped_char(out: &mut String, c: char) {
    let (buf, n) = varint(c);
    out.push(CODE_POINT_MARKER);
    out.push_str(&hex::encode(&buf[..n]));
}

/// Encode a key as a filename. The empty key encodes to the empty name.
pub fn encode(key: &[u8]) -> String {
    let mut out = String::with_capacity(key.len());
    for chunk in key.utf8_chunks() {
        for c in chunk.valid().chars() {
            if c == '/' {
                out.push_str(SLASH_ESCAPE);
            } else if c == '.' && out.is_empty() {
                // no hidden names, no "." or "..", no clash with the state or lock file
                push_escaped_char(&mut out, c);
            } else if passes_through(c) {
                out.push(c);
            } else {
                push_escaped_char(&mut out, c);
            }
        }
        for b in chunk.invalid() {
            out.push(RAW_BYTE_MARKER);
            out.push_str(&hex::encode([*b]));
        }
    }
    out
}
