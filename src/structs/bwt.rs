/*---------------------------------------------------------------------------------------------
 *  Copyright (c) Microsoft Corporation. All rights reserved.
 *  Licensed under the Apache License, Version 2.0. See LICENSE.txt in the project root for license information.
 *--------------------------------------------------------------------------------------------*/

//! Burrows-Wheeler Transform on a single in-memory block.
//!
//! Both directions are pure, I/O-free functions over caller-owned buffers, so they
//! can be driven directly from unit tests without going through the range coder or
//! any file framing.

use anyhow::Result;

use crate::errors::{err_exit_code, ExitCode};

/// Sorts the `n` cyclic rotations of `data` and overwrites `data` in place with the
/// BWT's last column. Returns the primary index `p`: one more than the sorted rank
/// of the rotation that begins at offset 0, matching the "no sentinel" convention
/// the inverse transform expects (see `inverse` below).
///
/// Uses rank-doubling suffix sorting adapted to a circular string: at each round the
/// sort key is the pair of ranks `(rank[i], rank[(i+k) % n])`, which converges to a
/// full ordering of the rotations in O(log n) rounds since `n` is finite and cyclic.
pub fn forward(data: &mut [u8]) -> Result<u32> {
    let n = data.len();
    if n == 0 {
        return Ok(0);
    }
    if n == 1 {
        return Ok(1);
    }

    let mut sa: Vec<u32> = (0..n as u32).collect();
    let mut rank: Vec<i32> = data.iter().map(|&b| b as i32).collect();
    let mut tmp: Vec<i32> = vec![0; n];

    let key = |rank: &[i32], k: usize, i: u32| -> (i32, i32) {
        let i = i as usize;
        let second = rank[(i + k) % n];
        (rank[i], second)
    };

    let mut k = 1usize;
    loop {
        sa.sort_unstable_by(|&a, &b| key(&rank, k, a).cmp(&key(&rank, k, b)));

        tmp[sa[0] as usize] = 0;
        for idx in 1..n {
            let prev = key(&rank, k, sa[idx - 1]);
            let cur = key(&rank, k, sa[idx]);
            tmp[sa[idx] as usize] = tmp[sa[idx - 1] as usize] + (cur != prev) as i32;
        }
        rank.copy_from_slice(&tmp);

        let distinct = rank[sa[n - 1] as usize] as usize + 1 == n;
        if distinct || k >= n {
            break;
        }
        k *= 2;
    }

    let mut last_column = vec![0u8; n];
    let mut primary = 0u32;
    for (sorted_row, &start) in sa.iter().enumerate() {
        last_column[sorted_row] = data[(start as usize + n - 1) % n];
        if start == 0 {
            primary = sorted_row as u32 + 1;
        }
    }
    data.copy_from_slice(&last_column);

    Ok(primary)
}

/// Reconstructs the original block from its BWT last column `data` and primary
/// index `p`, writing the result into a freshly allocated `Vec<u8>`.
///
/// `scratch` is the caller's `next[]` workspace (typically the block buffer's spare
/// i32 view); it must have length at least `data.len()`. The algorithm:
/// 1. Count symbol occurrences and turn them into a stable base offset per symbol
///    (`t[byte]`), i.e. the start of that symbol's run in the sorted first column.
/// 2. For each row `i`, `next[t[data[i]]] = i`, bumped by one past the primary index
///    to account for the missing sentinel row, then `t[data[i]]` is advanced. This
///    makes `next` the inverse of the LF-mapping rank assigned by step 1's counting.
/// 3. Walk that inverse mapping starting from row `p - 1` (the 0-based rank of the
///    original string's own rotation): at each step, follow `next` and immediately
///    undo the sentinel-row shift to land back on a real row before both reading
///    `data` at that row and using it as the next step's index. Doing the shift
///    correction once per step, rather than folding a bare `- 1` into the `next`
///    index, is what keeps the walk on real rows for every choice of `p`, not just
///    `p == n`.
pub fn inverse(data: &[u8], scratch: &mut [i32], p: u32) -> Result<Vec<u8>> {
    let n = data.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    if p == 0 || p as usize > n {
        return err_exit_code(ExitCode::FileCorrupted, format!(
            "bwt primary index {p} out of range for block of {n} bytes"
        ));
    }
    if scratch.len() < n {
        return err_exit_code(
            ExitCode::OutOfMemory,
            "bwt inverse scratch buffer smaller than block",
        );
    }

    let mut t = [0u32; 256];
    for &b in data {
        t[b as usize] += 1;
    }
    let mut sum = 0u32;
    for count in t.iter_mut() {
        let c = *count;
        *count = sum;
        sum += c;
    }

    let next = &mut scratch[..n];
    for (i, &b) in data.iter().enumerate() {
        let row = t[b as usize];
        next[row as usize] = (i as i32) + (i >= p as usize) as i32;
        t[b as usize] += 1;
    }

    let p = p as i32;
    let unshift = |v: i32| -> usize { (v - (v >= p) as i32) as usize };

    let mut row = unshift(p);
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        let v = next[row];
        row = unshift(v);
        out.push(data[row]);
    }

    Ok(out)
}
