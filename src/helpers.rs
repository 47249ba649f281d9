/*---------------------------------------------------------------------------------------------
 *  Copyright (c) Microsoft Corporation. All rights reserved.
 *  Licensed under the Apache License, Version 2.0. See LICENSE.txt in the project root for license information.
 *--------------------------------------------------------------------------------------------*/

/// Captures the call site as a short string, for use with `anyhow::Context::context`
/// when an error needs to be pinned to a specific line without a full backtrace.
#[macro_export]
macro_rules! here {
    () => {
        format!("{}:{}:{}", file!(), line!(), column!())
    };
}

/// Fills `buf` from `reader`, stopping at EOF; returns the number of bytes filled.
/// Unlike `Read::read`, this keeps calling `read` until either `buf` is full or
/// the source is exhausted, since a single `read` is permitted to return short.
pub fn read_fill<R: std::io::Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
