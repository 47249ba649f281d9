/*---------------------------------------------------------------------------------------------
 *  Copyright (c) Microsoft Corporation. All rights reserved.
 *  Licensed under the Apache License, Version 2.0. See LICENSE.txt in the project root for license information.
 *--------------------------------------------------------------------------------------------*/

/// Stream magic, written uncoded as the first four bytes of every compressed file.
pub const MAGIC: [u8; 4] = *b"BCM1";

/// Default block size when the CLI is not given `-b`.
pub const DEFAULT_BLOCK_SIZE: usize = 20 << 20;
