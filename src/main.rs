/*---------------------------------------------------------------------------------------------
 *  Copyright (c) Microsoft Corporation. All rights reserved.
 *  Licensed under the Apache License, Version 2.0. See LICENSE.txt in the project root for license information.
 *--------------------------------------------------------------------------------------------*/

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode as ProcessExitCode;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use log::info;

use bcm::consts::DEFAULT_BLOCK_SIZE;
use bcm::errors::exit_code_for;
use bcm::{compress, decompress};

const USAGE: &str = "\
bcm - a BWT + context-mixing lossless file compressor

USAGE:
    bcm [options] infile [outfile]

OPTIONS:
    -d              decompress (default: compress)
    -b<N>, -b<N>k   block size in MiB (or KiB with the k suffix); default 20 MiB
    -f               allow overwriting an existing output file
    -h, --help       print this message and exit
    --version        print version information and exit
";

struct Args {
    decompress: bool,
    force: bool,
    block_size: usize,
    input: PathBuf,
    output: Option<PathBuf>,
}

fn parse_block_size(raw: &str) -> Result<usize> {
    let (digits, multiplier) = match raw.strip_suffix('k') {
        Some(rest) => (rest, 1024),
        None => (raw, 1024 * 1024),
    };
    let n: usize = digits
        .parse()
        .map_err(|_| anyhow!("invalid block size '-b{raw}': not a number"))?;
    if n < 1 {
        return Err(anyhow!("invalid block size '-b{raw}': must be at least 1"));
    }
    Ok(n * multiplier)
}

fn parse_args() -> Result<Args> {
    // pico-args has no built-in support for an attached-value short option like
    // "-b20k", so that one is pulled out of the raw argument list by hand before
    // handing the rest to `Arguments`.
    let mut block_size = DEFAULT_BLOCK_SIZE;
    let mut raw_args = Vec::new();
    for arg in std::env::args_os().skip(1) {
        match arg.to_str().and_then(|s| s.strip_prefix("-b")) {
            Some(suffix) => block_size = parse_block_size(suffix)?,
            None => raw_args.push(arg),
        }
    }

    let mut pargs = pico_args::Arguments::from_vec(raw_args);

    if pargs.contains(["-h", "--help"]) {
        print!("{USAGE}");
        std::process::exit(0);
    }
    if pargs.contains("--version") {
        println!(
            "bcm {} ({})",
            env!("CARGO_PKG_VERSION"),
            git_version::git_version!(fallback = "unknown")
        );
        std::process::exit(0);
    }

    let decompress = pargs.contains("-d");
    let force = pargs.contains("-f");

    let mut positional = pargs.finish().into_iter();
    let input = positional
        .next()
        .ok_or_else(|| anyhow!("missing input path"))
        .map(PathBuf::from)?;
    let output = positional.next().map(PathBuf::from);

    if let Some(extra) = positional.next() {
        return Err(anyhow!("unexpected argument '{}'", extra.to_string_lossy()));
    }

    Ok(Args {
        decompress,
        force,
        block_size,
        input,
        output,
    })
}

fn derive_output_path(input: &Path, decompress: bool) -> PathBuf {
    if decompress {
        match input.to_str().and_then(|s| s.strip_suffix(".bcm")) {
            Some(stripped) => PathBuf::from(stripped),
            None => {
                let mut s = input.as_os_str().to_owned();
                s.push(".out");
                PathBuf::from(s)
            }
        }
    } else {
        let mut s = input.as_os_str().to_owned();
        s.push(".bcm");
        PathBuf::from(s)
    }
}

fn run(args: Args) -> Result<()> {
    let output_path = args
        .output
        .unwrap_or_else(|| derive_output_path(&args.input, args.decompress));

    if !args.force && output_path.exists() {
        return Err(anyhow!(
            "output file '{}' already exists (use -f to overwrite)",
            output_path.display()
        ));
    }

    let input_file = File::open(&args.input)
        .with_context(|| format!("opening input file '{}'", args.input.display()))?;
    let input_len = input_file.metadata().map(|m| m.len()).unwrap_or(0);
    let reader = BufReader::new(input_file);

    let output_file = File::create(&output_path)
        .with_context(|| format!("creating output file '{}'", output_path.display()))?;
    let writer = BufWriter::new(output_file);

    let start = Instant::now();
    if args.decompress {
        decompress(reader, writer)?;
    } else {
        compress(reader, writer, args.block_size)?;
    }

    let output_len = std::fs::metadata(&output_path).map(|m| m.len()).unwrap_or(0);
    info!(
        "{} -> {} in {:.3}s",
        input_len,
        output_len,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

fn main() -> ProcessExitCode {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()
        .ok();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("bcm: {e}");
            eprint!("{USAGE}");
            return ProcessExitCode::from(bcm::ExitCode::InvalidArgument.code() as u8);
        }
    };

    if let Err(e) = run(args) {
        eprintln!("bcm: {e}");
        return ProcessExitCode::from(exit_code_for(&e).code() as u8);
    }

    ProcessExitCode::SUCCESS
}
