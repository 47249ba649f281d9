/*---------------------------------------------------------------------------------------------
 *  Copyright (c) Microsoft Corporation. All rights reserved.
 *  Licensed under the Apache License, Version 2.0. See LICENSE.txt in the project root for license information.
 *--------------------------------------------------------------------------------------------*/

use std::io::{Read, Result, Write};

use default_boxed::DefaultBoxed;

use super::counter::Counter;
use super::range_coder::{RangeDecoder, RangeEncoder};

/// The order-0/1 counters and the SSE table, boxed as one allocation so that
/// constructing a `Mixer` never puts ~270 KiB of counters on the stack.
#[derive(DefaultBoxed)]
struct CounterTables {
    counter0: [Counter<2>; 256],
    counter1: [[Counter<4>; 256]; 256],
    counter2: [[[Counter<6>; 17]; 256]; 2],
}

impl CounterTables {
    /// `default_boxed` gives every cell the generic 32768 seed; the SSE table
    /// needs the near-identity mapping `(k - (k == 16)) << 12` instead.
    fn seed_sse(&mut self) {
        for f in 0..2 {
            for ctx in 0..256 {
                for k in 0..=16usize {
                    let correction = (k == 16) as i32;
                    self.counter2[f][ctx][k] = Counter::new(((k as i32) - correction) << 12);
                }
            }
        }
    }
}

/// Abstracts over "encode this known bit" vs. "decode the next bit", so the
/// per-bit context-mixing logic in `Mixer::code_byte` is written exactly once
/// and driven identically by both directions.
trait Coder {
    fn code_bit(&mut self, p15: u32, known_bit: Option<bool>) -> Result<bool>;
}

impl<W: Write> Coder for RangeEncoder<W> {
    fn code_bit(&mut self, p15: u32, known_bit: Option<bool>) -> Result<bool> {
        let bit = known_bit.expect("encoder always supplies the bit to code");
        self.encode_bit(bit, p15)?;
        Ok(bit)
    }
}

impl<R: Read> Coder for RangeDecoder<R> {
    fn code_bit(&mut self, p15: u32, _known_bit: Option<bool>) -> Result<bool> {
        self.decode_bit(p15)
    }
}

/// Order-(0,1,2) context mixer with secondary symbol estimation, sitting on
/// top of a range coder. `C` is `RangeEncoder<W>` for compression or
/// `RangeDecoder<R>` for decompression; `put`/`get` are only defined for the
/// matching direction.
pub struct Mixer<C> {
    tables: Box<CounterTables>,
    c1: i32,
    c2: i32,
    run: i32,
    coder: C,
}

impl<C: Coder> Mixer<C> {
    fn new(coder: C) -> Self {
        let mut tables = CounterTables::default_boxed();
        tables.seed_sse();

        Mixer {
            tables,
            c1: 0,
            c2: 0,
            run: 0,
            coder,
        }
    }

    /// Codes one byte as 8 bits, MSB first. `known` is `Some(byte)` on encode
    /// (the bits are read off it) and `None` on decode (the bits come back
    /// from the coder); the returned byte is always the one actually coded.
    #[inline]
    fn code_byte(&mut self, known: Option<u8>) -> Result<u8> {
        if self.c1 == self.c2 {
            self.run += 1;
        } else {
            self.run = 0;
        }
        let f = (self.run > 2) as usize;

        let mut ctx: u32 = 1;
        for bit_index in 0..8 {
            let p0 = self.tables.counter0[ctx as usize].value();
            let p1 = self.tables.counter1[self.c1 as usize][ctx as usize].value();
            let p2 = self.tables.counter1[self.c2 as usize][ctx as usize].value();
            let p = (4 * p0 + 3 * p1 + p2) >> 3;

            let idx = (p >> 12) as usize;
            let x1 = self.tables.counter2[f][ctx as usize][idx].value();
            let x2 = self.tables.counter2[f][ctx as usize][idx + 1].value();
            let ssep = x1 + (((x2 - x1) * (p & 4095)) >> 12);

            let p15 = (p + 3 * ssep) as u32;

            let known_bit = known.map(|byte| ((byte >> (7 - bit_index)) & 1) != 0);
            let bit = self.coder.code_bit(p15, known_bit)?;

            self.tables.counter0[ctx as usize].update(bit);
            self.tables.counter1[self.c1 as usize][ctx as usize].update(bit);
            self.tables.counter2[f][ctx as usize][idx].update(bit);
            self.tables.counter2[f][ctx as usize][idx + 1].update(bit);

            ctx = ctx * 2 + bit as u32;
        }

        self.c2 = self.c1;
        self.c1 = (ctx & 0xFF) as i32;
        Ok(self.c1 as u8)
    }
}

impl<W: Write> Mixer<RangeEncoder<W>> {
    pub fn new_encoder(writer: W) -> Self {
        Mixer::new(RangeEncoder::new(writer))
    }

    pub fn put(&mut self, byte: u8) -> Result<()> {
        self.code_byte(Some(byte))?;
        Ok(())
    }

    pub fn put_u32(&mut self, value: u32) -> Result<()> {
        for shift in [24, 16, 8, 0] {
            self.put((value >> shift) as u8)?;
        }
        Ok(())
    }

    pub fn flush(self) -> Result<W> {
        self.coder.flush()
    }
}

impl<R: Read> Mixer<RangeDecoder<R>> {
    pub fn new_decoder(reader: R) -> Result<Self> {
        Ok(Mixer::new(RangeDecoder::new(reader)?))
    }

    pub fn get(&mut self) -> Result<u8> {
        self.code_byte(None)
    }

    pub fn get_u32(&mut self) -> Result<u32> {
        let mut value = 0u32;
        for _ in 0..4 {
            value = (value << 8) | self.get()? as u32;
        }
        Ok(value)
    }
}
