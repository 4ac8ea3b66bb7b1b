//! Magpie - magic number finder
//!
//! Recomputes the rook and bishop magic multipliers and prints them as Rust
//! source for `src/magics.rs`. The default seed reproduces the checked-in
//! tables.
//!
//! Usage:
//!     find_magics [seed]

use std::process::ExitCode;

use magpie_chess::magic_search::{find_all_magics, render_magics, XorShift32, DEFAULT_SEED, MAX_ATTEMPTS};

fn main() -> ExitCode {
    let seed = match std::env::args().nth(1) {
        None => DEFAULT_SEED,
        Some(arg) => match arg.parse::<u32>() {
            Ok(seed) => seed,
            Err(err) => {
                eprintln!("invalid seed '{}': {}", arg, err);
                return ExitCode::FAILURE;
            }
        },
    };

    let mut rng = XorShift32::new(seed);
    match find_all_magics(&mut rng, MAX_ATTEMPTS) {
        Ok(set) => {
            print!("{}", render_magics(&set));
            ExitCode::SUCCESS
        }
        Err((slider, sq)) => {
            eprintln!("no {:?} magic found for square {} after {} attempts", slider, sq, MAX_ATTEMPTS);
            ExitCode::FAILURE
        }
    }
}
