//! Binary snapshot codec
//!
//! Length-prefixed encode/decode primitives shared by every snapshot file.
//!
//! ## Wire Format
//!
//! ```text
//! scalar:       fixed-width little-endian (u64 / i64 / i32 / f32, bool = 1 byte)
//! string:       ┌──────────┬─────────────────┐
//!               │ len (8)  │  raw UTF-8      │
//!               └──────────┴─────────────────┘
//! string list:  ┌──────────┬─────────────────┐
//!               │ count(8) │  strings...     │
//!               └──────────┴─────────────────┘
//! ```
//!
//! There is no file header, magic number, or version tag, and no format
//! evolution story. Decoding enforces coarse sanity bounds on every count
//! and length field so that a truncated or corrupted snapshot is rejected
//! before any absurd allocation is attempted.

use std::io::{Read, Write};

use crate::error::{Result, StoreError};

/// Maximum decoded string length in bytes
pub const MAX_STRING_LEN: u64 = 1_000_000;

/// Maximum decoded string-list element count
pub const MAX_LIST_LEN: u64 = 10_000;

/// Maximum record count in a tree snapshot file
pub const MAX_RECORD_COUNT: u64 = 1_000_000;

/// Maximum record count in a flat index snapshot file
pub const MAX_INDEX_RECORDS: u64 = 100_000;

// =============================================================================
// Scalar Encoding/Decoding
// =============================================================================

pub fn write_u64<W: Write>(w: &mut W, value: u64) -> Result<()> {
    w.write_all(&value.to_le_bytes())?;
    Ok(())
}

pub fn read_u64<R: Read>(r: &mut R) -> Result<u64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

pub fn write_i64<W: Write>(w: &mut W, value: i64) -> Result<()> {
    w.write_all(&value.to_le_bytes())?;
    Ok(())
}

pub fn read_i64<R: Read>(r: &mut R) -> Result<i64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(i64::from_le_bytes(buf))
}

pub fn write_i32<W: Write>(w: &mut W, value: i32) -> Result<()> {
    w.write_all(&value.to_le_bytes())?;
    Ok(())
}

pub fn read_i32<R: Read>(r: &mut R) -> Result<i32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

pub fn write_f32<W: Write>(w: &mut W, value: f32) -> Result<()> {
    w.write_all(&value.to_le_bytes())?;
    Ok(())
}

pub fn read_f32<R: Read>(r: &mut R) -> Result<f32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(f32::from_le_bytes(buf))
}

/// Encode a bool as a single byte (0 or 1)
pub fn write_bool<W: Write>(w: &mut W, value: bool) -> Result<()> {
    w.write_all(&[value as u8])?;
    Ok(())
}

/// Decode a bool; any byte other than 0/1 is corruption
pub fn read_bool<R: Read>(r: &mut R) -> Result<bool> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    match buf[0] {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(StoreError::Corrupt(format!(
            "invalid bool byte: 0x{:02x}",
            other
        ))),
    }
}

// =============================================================================
// String Encoding/Decoding
// =============================================================================

/// Encode a string: u64 length + raw bytes
pub fn write_string<W: Write>(w: &mut W, s: &str) -> Result<()> {
    write_u64(w, s.len() as u64)?;
    if !s.is_empty() {
        w.write_all(s.as_bytes())?;
    }
    Ok(())
}

/// Decode a string, rejecting out-of-bounds lengths before allocating
pub fn read_string<R: Read>(r: &mut R) -> Result<String> {
    let len = read_u64(r)?;
    if len > MAX_STRING_LEN {
        return Err(StoreError::Corrupt(format!(
            "string length {} exceeds sanity bound {}",
            len, MAX_STRING_LEN
        )));
    }

    let mut buf = vec![0u8; len as usize];
    if len > 0 {
        r.read_exact(&mut buf)?;
    }

    String::from_utf8(buf)
        .map_err(|e| StoreError::Corrupt(format!("string is not valid UTF-8: {}", e)))
}

// =============================================================================
// String List Encoding/Decoding
// =============================================================================

/// Encode a list of strings: u64 count + that many encoded strings
pub fn write_string_list<W: Write>(w: &mut W, items: &[String]) -> Result<()> {
    write_u64(w, items.len() as u64)?;
    for item in items {
        write_string(w, item)?;
    }
    Ok(())
}

/// Decode a list of strings, rejecting out-of-bounds counts before allocating
pub fn read_string_list<R: Read>(r: &mut R) -> Result<Vec<String>> {
    let count = read_u64(r)?;
    if count > MAX_LIST_LEN {
        return Err(StoreError::Corrupt(format!(
            "list count {} exceeds sanity bound {}",
            count, MAX_LIST_LEN
        )));
    }

    let mut items = Vec::with_capacity(count as usize);
    for _ in 0..count {
        items.push(read_string(r)?);
    }
    Ok(items)
}
