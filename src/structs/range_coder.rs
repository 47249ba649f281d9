/*---------------------------------------------------------------------------------------------
 *  Copyright (c) Microsoft Corporation. All rights reserved.
 *  Licensed under the Apache License, Version 2.0. See LICENSE.txt in the project root for license information.
 *--------------------------------------------------------------------------------------------*/

use std::io::{Read, Result, Write};

/// Computes the split point for both encode and decode: widens the (nominally
/// 16-bit, in practice wider, see `Counter`) probability estimate to 30 bits and
/// right-shifts a 64-bit product by 32, so the split always lands strictly inside
/// `[low, high)`. Must be reproduced exactly on both sides of the wire.
#[inline(always)]
fn split(low: u32, high: u32, p15: u32) -> u32 {
    low + ((((high - low) as u64) * ((p15 as u64) << 14)) >> 32) as u32
}

/// Bit-level range encoder over a 32-bit interval. Owns the byte sink; the
/// `Mixer` that sits on top of this drives one `encode_bit` call per coded bit.
pub struct RangeEncoder<W> {
    low: u32,
    high: u32,
    writer: W,
}

impl<W: Write> RangeEncoder<W> {
    pub fn new(writer: W) -> Self {
        RangeEncoder {
            low: 0,
            high: 0xFFFF_FFFF,
            writer,
        }
    }

    #[inline(always)]
    pub fn encode_bit(&mut self, bit: bool, p15: u32) -> Result<()> {
        let mid = split(self.low, self.high, p15);

        if bit {
            self.high = mid;
        } else {
            self.low = mid + 1;
        }

        while (self.low ^ self.high) < (1 << 24) {
            self.writer.write_all(&[(self.low >> 24) as u8])?;
            self.low <<= 8;
            self.high = (self.high << 8) | 0xFF;
        }

        Ok(())
    }

    /// Emits the four bytes needed to disambiguate the final interval and
    /// returns the underlying writer.
    pub fn flush(mut self) -> Result<W> {
        for _ in 0..4 {
            self.writer.write_all(&[(self.low >> 24) as u8])?;
            self.low <<= 8;
        }
        Ok(self.writer)
    }
}

/// Bit-level range decoder, the mirror image of `RangeEncoder`.
pub struct RangeDecoder<R> {
    low: u32,
    high: u32,
    code: u32,
    reader: R,
}

impl<R: Read> RangeDecoder<R> {
    /// Preloads `code` from the first four bytes of the stream (zero-filled
    /// past EOF), matching the encoder's flush.
    pub fn new(mut reader: R) -> Result<Self> {
        let mut code = 0u32;
        for _ in 0..4 {
            code = (code << 8) | read_byte_or_zero(&mut reader)?;
        }

        Ok(RangeDecoder {
            low: 0,
            high: 0xFFFF_FFFF,
            code,
            reader,
        })
    }

    #[inline(always)]
    pub fn decode_bit(&mut self, p15: u32) -> Result<bool> {
        let mid = split(self.low, self.high, p15);

        let bit = self.code <= mid;
        if bit {
            self.high = mid;
        } else {
            self.low = mid + 1;
        }

        while (self.low ^ self.high) < (1 << 24) {
            let byte = read_byte_or_zero(&mut self.reader)?;
            self.code = (self.code << 8) | byte;
            self.low <<= 8;
            self.high = (self.high << 8) | 0xFF;
        }

        Ok(bit)
    }
}

fn read_byte_or_zero<R: Read>(reader: &mut R) -> Result<u32> {
    let mut byte = [0u8; 1];
    let n = reader.read(&mut byte)?;
    Ok(if n == 0 { 0 } else { byte[0] as u32 })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drives the coder directly with an explicit (bit, p15) sequence, independent
    /// of the mixer, per the range coder law in the spec.
    fn roundtrip(bits_and_probs: &[(bool, u32)]) {
        let mut buf = Vec::new();
        {
            let mut enc = RangeEncoder::new(&mut buf);
            for &(bit, p15) in bits_and_probs {
                enc.encode_bit(bit, p15).unwrap();
            }
            enc.flush().unwrap();
        }

        let mut dec = RangeDecoder::new(&buf[..]).unwrap();
        for &(bit, p15) in bits_and_probs {
            assert_eq!(dec.decode_bit(p15).unwrap(), bit);
        }
    }

    #[test]
    fn roundtrips_constant_probability() {
        let seq: Vec<(bool, u32)> = (0..5000).map(|i| (i % 3 == 0, 32768)).collect();
        roundtrip(&seq);
    }

    #[test]
    fn roundtrips_extreme_probabilities() {
        roundtrip(&[(true, 1), (false, 1), (true, 65535), (false, 65535)]);
    }

    #[test]
    fn roundtrips_varying_probability() {
        let mut p: u32 = 32768;
        let seq: Vec<(bool, u32)> = (0..2000)
            .map(|i| {
                let bit = (i * 7 + 3) % 5 == 0;
                p = if bit {
                    p + ((p ^ 0xFFFF) >> 4)
                } else {
                    p - (p >> 4)
                };
                (bit, p.clamp(1, 65535))
            })
            .collect();
        roundtrip(&seq);
    }

    #[test]
    fn empty_stream_decodes_without_error() {
        let mut buf = Vec::new();
        {
            let enc = RangeEncoder::new(&mut buf);
            enc.flush().unwrap();
        }
        assert_eq!(buf.len(), 4);
        // no bits were coded; just make sure decoder construction doesn't panic
        RangeDecoder::new(&buf[..]).unwrap();
    }
}
