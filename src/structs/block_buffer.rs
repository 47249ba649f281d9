/*---------------------------------------------------------------------------------------------
 *  Copyright (c) Microsoft Corporation. All rights reserved.
 *  Licensed under the Apache License, Version 2.0. See LICENSE.txt in the project root for license information.
 *--------------------------------------------------------------------------------------------*/

//! A single allocation sized ~5 bytes per block byte, reinterpreted as two typed
//! views: a payload byte buffer and an `i32` scratch buffer for the BWT inverse's
//! `next[]` array. Mirrors the original `calloc(b, 5)` single-region allocation
//! without giving up Rust's alignment guarantees: the backing store is a `Vec<i32>`,
//! which is always 4-byte aligned, so casting a prefix of it to `&mut [u8]` is sound.

use bytemuck::cast_slice_mut;

fn words_for_bytes(n: usize) -> usize {
    (n + 3) / 4
}

pub struct BlockBuffer {
    capacity: usize,
    storage: Vec<i32>,
    payload_words: usize,
}

impl BlockBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        let payload_words = words_for_bytes(capacity);
        let storage = vec![0i32; payload_words + capacity];
        BlockBuffer {
            capacity,
            storage,
            payload_words,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The payload view, truncated to exactly `capacity` bytes even though the
    /// backing words may cover a few more.
    pub fn payload_mut(&mut self) -> &mut [u8] {
        let bytes = cast_slice_mut::<i32, u8>(&mut self.storage[..self.payload_words]);
        &mut bytes[..self.capacity]
    }

    pub fn scratch_mut(&mut self) -> &mut [i32] {
        &mut self.storage[self.payload_words..]
    }

    /// Both views at once, for the inverse BWT which reads the payload while
    /// writing into a freshly allocated output (scratch is only ever written).
    pub fn split_mut(&mut self) -> (&mut [u8], &mut [i32]) {
        let (payload_words, scratch) = self.storage.split_at_mut(self.payload_words);
        let bytes = cast_slice_mut::<i32, u8>(payload_words);
        (&mut bytes[..self.capacity], scratch)
    }
}
