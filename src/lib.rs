/*---------------------------------------------------------------------------------------------
 *  Copyright (c) Microsoft Corporation. All rights reserved.
 *  Licensed under the Apache License, Version 2.0. See LICENSE.txt in the project root for license information.
 *--------------------------------------------------------------------------------------------*/

//! A BWT + context-mixing lossless file compressor.
//!
//! The public surface is deliberately small: [`compress`] and [`decompress`] take any
//! `Read`/`Write` pair and a block size, and do not touch the filesystem or the
//! process themselves — that's the CLI's job, in `main.rs`.

pub mod consts;
pub mod errors;
pub mod helpers;
pub mod structs;

pub use crate::errors::{BcmError, ExitCode};
pub use crate::structs::block_framer::{compress, decompress};
