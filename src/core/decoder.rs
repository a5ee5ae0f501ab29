//! Content decoding strategies
//!
//! Provides:
//! - Binary sniffing (null byte within the first 2 KB)
//! - An ordered fallback chain for turning bytes into text:
//!   strict UTF-8, strict GBK, then lossy UTF-8 which never fails

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::Path;

/// Number of leading bytes inspected by the binary sniff
pub const SNIFF_LEN: usize = 2048;

/// A text encoding tried by the decode chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextEncoding {
    /// Strict UTF-8, fails on any invalid sequence
    Utf8,
    /// Strict GBK, fails on any invalid sequence
    Gbk,
    /// UTF-8 with undecodable bytes dropped
    Utf8Lossy,
}

/// Attempts in order; the last one always succeeds
pub const DECODE_CHAIN: [TextEncoding; 3] =
    [TextEncoding::Utf8, TextEncoding::Gbk, TextEncoding::Utf8Lossy];

/// Outcome of a single decode attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    Decoded(String),
    Failed,
}

impl TextEncoding {
    /// Try to decode `bytes` with this encoding
    pub fn attempt(&self, bytes: &[u8]) -> Attempt {
        match self {
            TextEncoding::Utf8 => match std::str::from_utf8(bytes) {
                Ok(s) => Attempt::Decoded(s.to_string()),
                Err(_) => Attempt::Failed,
            },
            TextEncoding::Gbk => {
                if !is_gbk_byte_structure(bytes) {
                    return Attempt::Failed;
                }
                match encoding_rs::GBK.decode_without_bom_handling_and_without_replacement(bytes) {
                    Some(s) => Attempt::Decoded(s.into_owned()),
                    None => Attempt::Failed,
                }
            }
            TextEncoding::Utf8Lossy => Attempt::Decoded(decode_utf8_dropping_invalid(bytes)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Gbk => "gbk",
            TextEncoding::Utf8Lossy => "utf-8 (lossy)",
        }
    }
}

/// Text produced by the decode chain, with the encoding that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: TextEncoding,
}

impl DecodedText {
    pub fn is_lossy(&self) -> bool {
        self.encoding == TextEncoding::Utf8Lossy
    }
}

/// Run the decode chain; first success wins
pub fn decode_text(bytes: &[u8]) -> DecodedText {
    DECODE_CHAIN
        .iter()
        .find_map(|&encoding| match encoding.attempt(bytes) {
            Attempt::Decoded(text) => Some(DecodedText { text, encoding }),
            Attempt::Failed => None,
        })
        .unwrap_or_else(|| DecodedText {
            text: decode_utf8_dropping_invalid(bytes),
            encoding: TextEncoding::Utf8Lossy,
        })
}

/// Check that bytes are ASCII or two-byte GBK pairs only.
///
/// encoding_rs decodes GBK as GB18030, which also accepts a lone 0x80 (as €)
/// and four-byte sequences. Plain GBK rejects both.
fn is_gbk_byte_structure(bytes: &[u8]) -> bool {
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            0x00..=0x7F => i += 1,
            0x81..=0xFE => match bytes.get(i + 1).copied() {
                Some(0x40..=0x7E) | Some(0x80..=0xFE) => i += 2,
                _ => return false,
            },
            _ => return false,
        }
    }
    true
}

/// Decode as UTF-8, silently dropping invalid byte sequences
fn decode_utf8_dropping_invalid(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

/// Check whether a byte prefix looks binary (contains a null byte)
pub fn looks_binary(bytes: &[u8]) -> bool {
    let check_len = std::cmp::min(SNIFF_LEN, bytes.len());
    bytes[..check_len].contains(&0)
}

/// Sniff a file on disk. Files that cannot be opened are treated as binary.
pub fn is_binary_file(path: &Path) -> bool {
    let file = match fs::File::open(path) {
        Ok(f) => f,
        Err(_) => return true,
    };

    let mut prefix = Vec::with_capacity(SNIFF_LEN);
    match file.take(SNIFF_LEN as u64).read_to_end(&mut prefix) {
        Ok(_) => looks_binary(&prefix),
        Err(_) => true,
    }
}

/// Read a whole file and decode it through the chain
pub fn read_text_file(path: &Path) -> std::io::Result<DecodedText> {
    let bytes = fs::read(path)?;
    Ok(decode_text(&bytes))
}
