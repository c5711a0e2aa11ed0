//! `rexcount`: count or enumerate the members of a bounded regex language.
//!
//! A thin front end over the [`rexcount`] library; the pattern language and
//! enumeration logic live there. This binary only parses arguments, drives
//! `seek`/`next`, and formats output.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;
use num_bigint::BigUint;
use num_traits::Zero;
use rexcount::{Flags, Regex};
use thiserror::Error;

/// Count and enumerate the members of a bounded regex language.
#[derive(Parser)]
#[command(name = "rexcount", version, about)]
struct Args {
    /// Case-insensitive matching.
    #[arg(short = 'i')]
    caseless: bool,

    /// Let `.` match any byte, including newline.
    #[arg(short = 's')]
    dotall: bool,

    /// Enumerate every member instead of just printing the count.
    #[arg(short = 'e')]
    enumerate: bool,

    /// Prefix each enumerated member with its index.
    #[arg(short = 'n')]
    number: bool,

    /// Index from 0 instead of 1.
    #[arg(short = 'z')]
    zero_based: bool,

    /// Start enumeration at this index.
    #[arg(short = 'f')]
    from: Option<BigUint>,

    /// Stop enumeration after this many members.
    #[arg(short = 'c')]
    count: Option<BigUint>,

    /// Stop enumeration at this index (inclusive).
    #[arg(short = 't')]
    to: Option<BigUint>,

    /// Print `count` (default 1) uniformly random members instead of a
    /// contiguous run.
    #[arg(short = 'r')]
    random: bool,

    /// Group enumerated indices with `,` as the thousands separator.
    #[arg(short = ',')]
    sep_comma: bool,

    /// Group enumerated indices with `_` as the thousands separator.
    #[arg(short = '_')]
    sep_underscore: bool,

    /// Group enumerated indices with `.` as the thousands separator.
    #[arg(short = '.')]
    sep_dot: bool,

    /// Don't group enumerated indices at all.
    #[arg(short = '~')]
    sep_none: bool,

    /// The pattern to count or enumerate.
    pattern: String,
}

/// A failure with a specific process exit code attached, the way the
/// original command line tool distinguished a usage error (1), a seek past
/// the end of the language (100), and an internal failure (111).
#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("seek past end")]
    SeekPastEnd,
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Usage(_) => 1,
            CliError::SeekPastEnd => 100,
        }
    }
}

/// Exit code for a failure with no more specific meaning (the original
/// tool's allocation-failure code; here, any error `anyhow` surfaces that
/// wasn't raised as a [`CliError`]).
const EXIT_INTERNAL: u8 = 111;

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:#}", err);
            let code = err.downcast_ref::<CliError>().map_or(EXIT_INTERNAL, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn separator(args: &Args) -> Option<char> {
    if args.sep_none {
        None
    } else if args.sep_underscore {
        Some('_')
    } else if args.sep_dot {
        Some('.')
    } else {
        // `-,` and the unflagged default agree: comma-grouped.
        Some(',')
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    let mut flags = Flags::empty();
    if args.caseless {
        flags |= Flags::CASELESS;
    }
    if args.dotall {
        flags |= Flags::DOTALL;
    }

    let mut re = rexcount::parse(args.pattern.as_bytes(), flags);
    if let Some(message) = re.error_message() {
        return Err(CliError::Usage(message).into());
    }
    debug!("pattern accepted, nitems = {}", re.count());

    let sep = separator(&args);
    let offset: u32 = if args.zero_based { 0 } else { 1 };
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.random {
        let count = args.count.clone().unwrap_or_else(|| BigUint::from(1u32));
        return run_random(&mut re, &count, args.number, sep, &mut out);
    }

    let do_enumerate =
        args.enumerate || args.number || args.from.is_some() || args.to.is_some() || args.count.is_some();
    if !do_enumerate {
        print_grouped(&mut out, &re.count(), sep).context("writing summary count")?;
        writeln!(out).context("writing summary count")?;
        return Ok(());
    }

    let from = args.from.clone().unwrap_or_else(|| BigUint::from(offset));
    if from < BigUint::from(offset) {
        return Err(CliError::Usage(format!("start point can't be less than {}", offset)).into());
    }

    let count = if let Some(to) = &args.to {
        if to < &from {
            return Err(CliError::Usage("start point must be before finish".to_string()).into());
        }
        to - &from + BigUint::from(1u32)
    } else {
        args.count.clone().unwrap_or_else(BigUint::zero)
    };

    run_enumerate(&mut re, &from, &count, offset, args.number, sep, &mut out)
}

fn run_random(re: &mut Regex, count: &BigUint, number: bool, sep: Option<char>, out: &mut impl Write) -> Result<()> {
    if re.count().is_zero() {
        return Err(CliError::Usage("pattern denotes the empty language".to_string()).into());
    }
    let mut rng = rand::thread_rng();
    let mut remaining = count.clone();
    while remaining > BigUint::zero() {
        let pos = re.seek_random(&mut rng);
        print_member(re, number.then_some(&pos), sep, out).context("writing enumerated member")?;
        remaining -= BigUint::from(1u32);
    }
    Ok(())
}

fn run_enumerate(
    re: &mut Regex,
    from: &BigUint,
    count: &BigUint,
    offset: u32,
    number: bool,
    sep: Option<char>,
    out: &mut impl Write,
) -> Result<()> {
    let seek_pos = from - BigUint::from(offset);
    if re.seek(&seek_pos) {
        return Err(CliError::SeekPastEnd.into());
    }

    let mut printed = BigUint::zero();
    let mut index = from.clone();
    loop {
        print_member(re, number.then_some(&index), sep, out).context("writing enumerated member")?;
        index += BigUint::from(1u32);
        printed += BigUint::from(1u32);
        if !count.is_zero() && printed >= *count {
            break;
        }
        if re.iterate() {
            break;
        }
    }
    Ok(())
}

fn print_member(re: &Regex, index: Option<&BigUint>, sep: Option<char>, out: &mut impl Write) -> io::Result<()> {
    if let Some(index) = index {
        print_grouped(out, index, sep)?;
        write!(out, " ")?;
    }
    out.write_all(&re.current())?;
    writeln!(out)?;
    Ok(())
}

/// Writes `value` in decimal, grouped in runs of three digits from the
/// right with `sep` between groups (no grouping if `sep` is `None`).
fn print_grouped(out: &mut impl Write, value: &BigUint, sep: Option<char>) -> io::Result<()> {
    let digits = value.to_str_radix(10);
    match sep {
        None => write!(out, "{}", digits),
        Some(sep) => write!(out, "{}", group_digits(&digits, sep)),
    }
}

fn group_digits(digits: &str, sep: char) -> String {
    let len = digits.len();
    let first_group = if len % 3 == 0 { 3 } else { len % 3 };
    let mut grouped = String::with_capacity(len + len / 3);
    grouped.push_str(&digits[..first_group]);
    let mut i = first_group;
    while i < len {
        grouped.push(sep);
        grouped.push_str(&digits[i..i + 3]);
        i += 3;
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_digits_in_threes() {
        assert_eq!(group_digits("1000", ','), "1,000");
        assert_eq!(group_digits("6760000", ','), "6,760,000");
        assert_eq!(group_digits("7", ','), "7");
        assert_eq!(group_digits("100", ','), "100");
    }
}
