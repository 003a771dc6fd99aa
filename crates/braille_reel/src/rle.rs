//! # Run-length records
//!
//! ```text
//!         MSB      LSB
//!          │        │
//!          ▼        ▼
//!         0CCC CCCC  VVVV VVVV          run: value V repeated C times
//!         1CCC CCCC  B₁ B₂ … B_C        literal: C raw bytes
//!         ▲
//! LITERAL─┘
//! ```
//!
//! `C` is in `1..=127` for every record the encoder emits.
//!
//! The stream carries no length. The decoder MUST know how many bytes a frame
//! holds; it stops as soon as that many bytes have been produced, which is
//! how consecutive frames are separated in a container.
//!
//! The encoder is greedy and single pass. A literal record stops one byte
//! short of a value that repeats three times, so the next record can start
//! with a run. That boundary is a heuristic, not a format requirement, but it
//! is kept stable so identical input always produces identical files.

use std::io::{self, Read};

use crate::{ReelError, Result};

/// Header bit marking a literal record.
pub const LITERAL_FLAG: u8 = 0x80;

/// Low seven header bits: the record's byte count.
pub const COUNT_MASK: u8 = 0x7F;

/// Longest run or literal a single record can describe.
pub const MAX_COUNT: usize = COUNT_MASK as usize;

const MIN_RUN: usize = 3;

/// Appends the records for `data` to `out`.
pub fn encode(data: &[u8], out: &mut Vec<u8>) {
    let mut offset = 0;
    while offset < data.len() {
        let rest = &data[offset..];
        if rest.len() < MIN_RUN {
            push_literal(out, rest);
            break;
        }

        let count = if rest[0] == rest[1] && rest[0] == rest[2] {
            let count = rest
                .iter()
                .take(MAX_COUNT)
                .take_while(|&&b| b == rest[0])
                .count();
            trace!("run: value=0x{:02X}, count={count}", rest[0]);
            out.push(count as u8);
            out.push(rest[0]);
            count
        } else {
            let count = literal_len(rest).min(MAX_COUNT);
            push_literal(out, &rest[..count]);
            count
        };
        offset += count;
    }
}

/// Encodes `data` into a fresh buffer.
#[must_use = "this returns the encoded records"]
pub fn encode_to_vec(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() / 2 + 2);
    encode(data, &mut out);
    out
}

// `rest` holds at least three bytes and does not start with a run.
fn literal_len(rest: &[u8]) -> usize {
    let mut count = MIN_RUN;
    let mut last = rest[MIN_RUN - 1];
    for i in MIN_RUN..rest.len() {
        if rest[i] == last && rest.get(i + 1) == Some(&last) {
            // leave `last` for the run detector
            return count - 1;
        }
        count += 1;
        last = rest[i];
    }
    count
}

#[inline]
fn push_literal(out: &mut Vec<u8>, bytes: &[u8]) {
    debug_assert!(bytes.len() <= MAX_COUNT);
    trace!("literal: count={}", bytes.len());
    out.push(LITERAL_FLAG | bytes.len() as u8);
    out.extend_from_slice(bytes);
}

/// Decodes records from `reader` until `out` is full.
///
/// Returns the number of input bytes consumed. A record that would write past
/// the end of `out` is [`ReelError::Overrun`]; running out of input first is
/// [`ReelError::Truncated`]. Nothing past the last needed record is read.
pub fn decode<R: Read>(reader: &mut R, out: &mut [u8]) -> Result<usize> {
    let expected = out.len();
    let mut produced = 0;
    let mut consumed = 0;

    while produced < expected {
        let mut header = [0u8; 1];
        read_record(reader, &mut header, produced, expected)?;
        let count = (header[0] & COUNT_MASK) as usize;
        let end = produced + count;
        if end > expected {
            return Err(ReelError::Overrun {
                attempted: end,
                expected,
            });
        }

        if header[0] & LITERAL_FLAG != 0 {
            read_record(reader, &mut out[produced..end], produced, expected)?;
            consumed += 1 + count;
        } else {
            let mut value = [0u8; 1];
            read_record(reader, &mut value, produced, expected)?;
            out[produced..end].fill(value[0]);
            consumed += 2;
        }
        produced = end;
    }

    Ok(consumed)
}

/// Decodes exactly `len` bytes from the start of `data`.
///
/// Returns the decoded bytes and how much of `data` they used.
pub fn decode_slice(data: &[u8], len: usize) -> Result<(Vec<u8>, usize)> {
    let mut reader = data;
    let mut out = vec![0; len];
    let consumed = decode(&mut reader, &mut out)?;
    Ok((out, consumed))
}

#[inline]
fn read_record<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    produced: usize,
    expected: usize,
) -> Result<()> {
    reader.read_exact(buf).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            ReelError::Truncated { produced, expected }
        } else {
            ReelError::Io(e)
        }
    })
}
