/*---------------------------------------------------------------------------------------------
 *  Copyright (c) Microsoft Corporation. All rights reserved.
 *  Licensed under the Apache License, Version 2.0. See LICENSE.txt in the project root for license information.
 *--------------------------------------------------------------------------------------------*/

//! Whole-stream orchestration: magic, per-block `(n, p)` headers, the model-coded
//! end-of-stream marker, and the BWT + mixer calls that carry each block's bytes.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use log::info;

use crate::consts::{DEFAULT_BLOCK_SIZE, MAGIC};
use crate::errors::{err_exit_code, ExitCode};
use crate::helpers::{here, read_fill};
use crate::structs::block_buffer::BlockBuffer;
use crate::structs::bwt;
use crate::structs::mixer::Mixer;

/// Compresses `input` into `output` using block size `block_size` (bytes).
/// Reads until EOF, emitting one header+payload run per block, then a model-coded
/// `n=0` sentinel and the coder's flush tail.
pub fn compress<R: Read, W: Write>(
    mut input: R,
    mut output: W,
    block_size: usize,
) -> Result<()> {
    output.write_all(&MAGIC).context(here!())?;

    let mut buffer = BlockBuffer::with_capacity(block_size.max(1));
    let mut mixer = Mixer::new_encoder(&mut output);

    loop {
        let n = {
            let payload = buffer.payload_mut();
            read_fill(&mut input, payload).context(here!())?
        };
        if n == 0 {
            break;
        }

        let (payload, scratch) = buffer.split_mut();
        let block = &mut payload[..n];
        let p = bwt::forward(block)?;
        if p == 0 {
            return err_exit_code(ExitCode::BwtFailure, "forward bwt returned primary index 0");
        }
        let _ = scratch;

        mixer.put_u32(n as u32)?;
        mixer.put_u32(p)?;
        for &byte in block.iter() {
            mixer.put(byte)?;
        }
    }

    mixer.put_u32(0)?;
    mixer.flush()?;
    Ok(())
}

/// Decompresses a stream produced by [`compress`]. The block size is learned from
/// the first block's `n` (the largest any later block may declare); `output` is
/// left untouched past the in-band `n=0` terminator even if `input` has more bytes.
pub fn decompress<R: Read, W: Write>(mut input: R, mut output: W) -> Result<()> {
    let mut magic = [0u8; 4];
    read_fill(&mut input, &mut magic).context(here!())?;
    if magic != MAGIC {
        return err_exit_code(ExitCode::NotBcmFormat, "input is not in BCM format");
    }

    let mut mixer = Mixer::new_decoder(input)?;
    let mut buffer: Option<BlockBuffer> = None;
    let mut block_size_cap = DEFAULT_BLOCK_SIZE;

    loop {
        let n = mixer.get_u32()? as usize;
        if n == 0 {
            break;
        }

        let cap = match &buffer {
            Some(_) => block_size_cap,
            None => {
                block_size_cap = n;
                n
            }
        };
        if n > cap {
            return err_exit_code(
                ExitCode::FileCorrupted,
                format!("block size {n} exceeds established stream block size {cap}"),
            );
        }

        let p = mixer.get_u32()?;
        if p == 0 || p as usize > n {
            return err_exit_code(
                ExitCode::FileCorrupted,
                format!("bwt primary index {p} out of range for block of {n} bytes"),
            );
        }

        if buffer.is_none() {
            buffer = Some(BlockBuffer::with_capacity(cap));
        }
        let buffer = buffer.as_mut().unwrap();

        let (payload, scratch) = buffer.split_mut();
        let block = &mut payload[..n];
        for slot in block.iter_mut() {
            *slot = mixer.get()?;
        }

        let restored = bwt::inverse(block, scratch, p)?;
        output.write_all(&restored).context(here!())?;
    }

    info!("decompressed stream terminated by in-band end marker");
    Ok(())
}
