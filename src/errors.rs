/*---------------------------------------------------------------------------------------------
 *  Copyright (c) Microsoft Corporation. All rights reserved.
 *  Licensed under the Apache License, Version 2.0. See LICENSE.txt in the project root for license information.
 *--------------------------------------------------------------------------------------------*/

use std::fmt;

/// Stable process exit code, independent of the human-readable error chain `anyhow`
/// builds around it. `main` maps this back to `std::process::exit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    GenericFailure = 1,
    NotBcmFormat = 2,
    FileCorrupted = 3,
    OutOfMemory = 4,
    BwtFailure = 5,
    InvalidArgument = 6,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Root-cause error carried through `anyhow::Error` so the CLI can recover
/// a stable exit code without pattern-matching the whole error chain.
#[derive(Debug)]
pub struct BcmError {
    pub code: ExitCode,
    pub message: String,
}

impl fmt::Display for BcmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BcmError {}

/// Construct a failed `anyhow::Result` carrying a `BcmError` as its root cause.
pub fn err_exit_code<T>(code: ExitCode, message: impl Into<String>) -> anyhow::Result<T> {
    Err(BcmError {
        code,
        message: message.into(),
    }
    .into())
}

/// Walks an `anyhow::Error` chain looking for the `BcmError` this crate attaches
/// to every fatal condition it raises itself; falls back to `GenericFailure`
/// for errors that originated outside this crate (e.g. raw I/O errors).
pub fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<BcmError>() {
            return e.code;
        }
    }
    ExitCode::GenericFailure
}
