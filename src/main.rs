//! Magpie - UCI Chess Engine
//!
//! Usage:
//!     magpie
//!
//! The engine reads UCI commands from stdin and writes responses to stdout.
//! Compatible with any UCI chess GUI (Arena, CuteChess, etc.)

use std::io;

use magpie_chess::attacks;
use magpie_chess::uci::UCIProtocol;

fn main() {
    // build slider tables before the GUI starts timing us
    attacks::init();

    let mut uci = UCIProtocol::new();
    uci.run(io::stdin().lock());
}
