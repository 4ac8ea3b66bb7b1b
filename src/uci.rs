//! Magpie - UCI Protocol Module
//!
//! This module implements the Universal Chess Interface (UCI) protocol,
//! allowing the engine to communicate with chess GUIs.
//!
//! Output goes to any `Write` sink so the protocol can be driven from tests.
//! Diagnostics use the protocol's own `info string` channel.

use std::io::{self, BufRead, Write};
use std::time::Instant;

use crate::error::{EngineError, EngineResult};
use crate::make_move::MoveFilter;
use crate::move_generator::MoveGenerator;
use crate::moves::Move;
use crate::perft::perft_divide;
use crate::position::Position;
use crate::search::{SearchEngine, SearchInfo};
use crate::types::*;

// Engine identification
const ENGINE_NAME: &str = "Magpie";
const ENGINE_AUTHOR: &str = "The Magpie developers";
const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Search depth used by `go` when none is given
pub const DEFAULT_DEPTH: i32 = 6;
/// Deepest search `go` will start
pub const MAX_DEPTH: i32 = 30;

const BENCH_DEPTH: u32 = 4;

const BENCH_POSITIONS: [&str; 3] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
];

/// Integer `spin` option, the only kind the engine exposes
#[derive(Clone, Debug)]
pub struct UCIOption {
    pub name: String,
    pub default: i32,
    pub value: i32,
    pub min: i32,
    pub max: i32,
}

impl UCIOption {
    pub fn spin(name: &str, default: i32, min: i32, max: i32) -> Self {
        UCIOption {
            name: name.to_string(),
            default,
            value: default,
            min,
            max,
        }
    }

    pub fn to_uci_string(&self) -> String {
        format!(
            "option name {} type spin default {} min {} max {}",
            self.name, self.default, self.min, self.max
        )
    }

    /// Set a new value; returns `false` if it does not parse or is out of range
    pub fn set_value(&mut self, value_str: &str) -> bool {
        match value_str.parse::<i32>() {
            Ok(val) if (self.min..=self.max).contains(&val) => {
                self.value = val;
                true
            }
            _ => false,
        }
    }

    pub fn get_int(&self) -> i32 {
        self.value
    }
}

/// UCI protocol handler
pub struct UCIProtocol<W: Write> {
    position: Position,
    move_generator: MoveGenerator,
    search_engine: SearchEngine,
    running: bool,
    debug_mode: bool,
    options: Vec<UCIOption>,
    out: W,
}

impl UCIProtocol<io::Stdout> {
    /// Protocol handler that answers on standard output
    pub fn new() -> Self {
        UCIProtocol::with_output(io::stdout())
    }
}

impl Default for UCIProtocol<io::Stdout> {
    fn default() -> Self {
        UCIProtocol::new()
    }
}

impl<W: Write> UCIProtocol<W> {
    pub fn with_output(out: W) -> Self {
        UCIProtocol {
            position: Position::startpos(),
            move_generator: MoveGenerator::new(),
            search_engine: SearchEngine::new(),
            running: true,
            debug_mode: false,
            options: vec![UCIOption::spin("Depth", DEFAULT_DEPTH, 1, MAX_DEPTH)],
            out,
        }
    }

    /// Current position
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Consume the handler and return its output sink
    pub fn into_output(self) -> W {
        self.out
    }

    /// Read commands until `quit` or end of input
    pub fn run<R: BufRead>(&mut self, input: R) {
        for line in input.lines() {
            let Ok(line) = line else {
                break;
            };
            let line = line.trim();
            if !line.is_empty() {
                self.process_command(line);
            }
            if !self.running {
                break;
            }
        }
    }

    pub fn process_command(&mut self, line: &str) {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            return;
        }

        let command = parts[0];
        let args = &parts[1..];

        match command {
            "uci" => self.cmd_uci(),
            "isready" => self.cmd_isready(),
            "setoption" => self.cmd_setoption(args),
            "ucinewgame" => self.cmd_ucinewgame(),
            "position" => self.cmd_position(args),
            "go" => self.cmd_go(args),
            "stop" => self.cmd_stop(),
            "quit" => self.cmd_quit(),
            "debug" => self.cmd_debug(args),
            "d" => self.cmd_display(),
            "perft" => self.cmd_perft(args),
            "bench" => self.cmd_bench(),
            _ => {
                if self.debug_mode {
                    self.send(&format!("info string Unknown command: {}", command));
                }
            }
        }
    }

    /// Whether `quit` has been received
    pub fn is_running(&self) -> bool {
        self.running
    }

    fn send(&mut self, message: &str) {
        writeln!(self.out, "{}", message).ok();
        self.out.flush().ok();
    }

    fn cmd_uci(&mut self) {
        self.send(&format!("id name {} {}", ENGINE_NAME, ENGINE_VERSION));
        self.send(&format!("id author {}", ENGINE_AUTHOR));

        let options: Vec<String> = self.options.iter().map(UCIOption::to_uci_string).collect();
        for option in options {
            self.send(&option);
        }

        self.send("uciok");
    }

    fn cmd_setoption(&mut self, args: &[&str]) {
        if args.len() < 2 || args[0] != "name" {
            return;
        }

        // Parse option name and value
        let value_at = args.iter().position(|&a| a == "value");
        let name = args[1..value_at.unwrap_or(args.len())].join(" ");
        let value_str = value_at.map(|i| args[i + 1..].join(" "));

        let debug = self.debug_mode;
        let message = match self.options.iter_mut().find(|opt| opt.name.eq_ignore_ascii_case(&name)) {
            Some(opt) => {
                let value = value_str.unwrap_or_default();
                if opt.set_value(&value) {
                    debug.then(|| format!("info string Option {} set to {}", opt.name, opt.value))
                } else {
                    Some(format!("info string Invalid value '{}' for option {}", value, opt.name))
                }
            }
            None => debug.then(|| format!("info string Unknown option: {}", name)),
        };

        if let Some(msg) = message {
            self.send(&msg);
        }
    }

    fn cmd_isready(&mut self) {
        self.send("readyok");
    }

    fn cmd_ucinewgame(&mut self) {
        self.position = Position::startpos();
    }

    fn cmd_position(&mut self, args: &[&str]) {
        match self.parse_position(args) {
            Ok(position) => self.position = position,
            Err(err) => self.send(&format!("info string {}", err)),
        }
    }

    /// Build the position described by `position` arguments.
    ///
    /// Nothing is committed unless the whole command parses, so a bad move
    /// list leaves the previous position in place.
    fn parse_position(&self, args: &[&str]) -> EngineResult<Position> {
        let moves_at = args.iter().position(|&a| a == "moves");
        let setup = &args[..moves_at.unwrap_or(args.len())];

        let mut position = match setup.first() {
            Some(&"startpos") | None => Position::startpos(),
            Some(&"fen") => Position::from_fen(&setup[1..].join(" "))?,
            Some(other) => return Err(EngineError::InvalidCommand(format!("position {}", other))),
        };

        if let Some(idx) = moves_at {
            for move_str in &args[idx + 1..] {
                let mv = self.parse_move(&position, move_str)?;
                let applied = position.make_move(mv, MoveFilter::AllMoves);
                debug_assert!(applied, "legal move {} rejected", mv);
            }
        }

        Ok(position)
    }

    /// Resolve UCI move text against the legal moves of `position`
    fn parse_move(&self, position: &Position, move_str: &str) -> EngineResult<Move> {
        let invalid = || EngineError::InvalidMove(move_str.to_string());

        if !(4..=5).contains(&move_str.len()) || !move_str.is_ascii() {
            return Err(invalid());
        }

        let from_sq = parse_square(&move_str[0..2]).ok_or_else(invalid)?;
        let to_sq = parse_square(&move_str[2..4]).ok_or_else(invalid)?;

        let promotion = match move_str[4..].chars().next() {
            None => None,
            Some(c) => Some(match c.to_ascii_lowercase() {
                'q' => PieceKind::Queen,
                'r' => PieceKind::Rook,
                'b' => PieceKind::Bishop,
                'n' => PieceKind::Knight,
                _ => return Err(invalid()),
            }),
        };

        self.move_generator
            .generate_legal_moves(position)
            .iter()
            .copied()
            .find(|mv| {
                mv.source() == from_sq
                    && mv.target() == to_sq
                    && mv.promoted().map(|p| p.kind()) == promotion
            })
            .ok_or_else(|| EngineError::IllegalMove(move_str.to_string()))
    }

    fn cmd_go(&mut self, args: &[&str]) {
        let mut depth = self
            .options
            .iter()
            .find(|opt| opt.name == "Depth")
            .map_or(DEFAULT_DEPTH, UCIOption::get_int);

        let mut i = 0;
        while i < args.len() {
            match args[i] {
                "depth" if i + 1 < args.len() => {
                    if let Ok(d) = args[i + 1].parse::<i32>() {
                        depth = d;
                    }
                    i += 2;
                }
                // Searches cannot be interrupted, so `infinite` and the time
                // controls all run at the configured depth
                "wtime" | "btime" | "winc" | "binc" | "movestogo" | "movetime" | "nodes" | "mate" => {
                    i += 2;
                }
                _ => {
                    i += 1;
                }
            }
        }

        let depth = depth.clamp(1, MAX_DEPTH) as u32;

        let mut info_line = None;
        let result = self
            .search_engine
            .search_with_info(&self.position, depth, |info| info_line = Some(format_info(info)));

        if let Some(line) = info_line {
            self.send(&line);
        }

        match result.best_move {
            Some(mv) => self.send(&format!("bestmove {}", mv.to_uci())),
            None => self.send("bestmove 0000"),
        }
    }

    /// Searches run to completion before the next command is read
    fn cmd_stop(&mut self) {}

    fn cmd_quit(&mut self) {
        self.running = false;
    }

    fn cmd_debug(&mut self, args: &[&str]) {
        if let Some(&mode) = args.first() {
            self.debug_mode = mode == "on";
        }
    }

    fn cmd_display(&mut self) {
        let board = self.position.to_string();
        self.send(&board);

        let fen = self.position.to_fen();
        self.send(&format!("FEN: {}", fen));

        let in_check = self.move_generator.is_in_check(&self.position);
        self.send(&format!("In check: {}", in_check));

        let legal_moves = self.move_generator.generate_legal_moves(&self.position);
        self.send(&format!("Legal moves: {}", legal_moves.len()));

        let move_list: Vec<String> = legal_moves.iter().take(20).map(|m| m.to_uci()).collect();
        let mut moves_str = move_list.join(" ");
        if legal_moves.len() > 20 {
            moves_str.push_str(" ...");
        }
        self.send(&format!("Moves: {}", moves_str));
    }

    fn cmd_perft(&mut self, args: &[&str]) {
        let depth = args.first().and_then(|s| s.parse::<u32>().ok()).unwrap_or(1).max(1);

        let start = Instant::now();
        let mut position = self.position;
        let divide = perft_divide(&mut position, depth);
        let elapsed_ms = start.elapsed().as_millis();

        let mut total = 0u64;
        for (mv, nodes) in divide {
            total += nodes;
            self.send(&format!("{}: {}", mv.to_uci(), nodes));
        }

        self.send(&format!("Nodes: {}", total));
        self.send(&format!("info string perft depth {} nodes {} time {}", depth, total, elapsed_ms));
    }

    fn cmd_bench(&mut self) {
        let mut total_nodes = 0u64;
        let start_time = Instant::now();

        for fen in BENCH_POSITIONS {
            match Position::from_fen(fen) {
                Ok(position) => {
                    total_nodes += self.search_engine.search(&position, BENCH_DEPTH).nodes;
                }
                Err(err) => self.send(&format!("info string {}", err)),
            }
        }

        let elapsed_secs = start_time.elapsed().as_secs_f64();
        let nps = if elapsed_secs > 0.0 { (total_nodes as f64 / elapsed_secs) as u64 } else { 0 };

        self.send(&format!(
            "info string Benchmark: {} nodes in {:.2}s ({} nps)",
            total_nodes, elapsed_secs, nps
        ));
    }
}

/// Format a search report as a UCI `info` line
pub fn format_info(info: &SearchInfo) -> String {
    let score = match info.mate_in() {
        Some(moves) => format!("mate {}", moves),
        None => format!("cp {}", info.score),
    };

    let mut line = format!(
        "info depth {} score {} nodes {} time {} nps {}",
        info.depth,
        score,
        info.nodes,
        info.time_ms,
        info.nps()
    );
    if let Some(mv) = info.best_move {
        line.push_str(&format!(" pv {}", mv.to_uci()));
    }
    line
}
