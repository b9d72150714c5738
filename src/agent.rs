//! Agent lifecycle for arena matches.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::error::{Error, Result};
use crate::protocol::{TokenReader, TokenWriter};

/// One round's report from the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// Result code for the previous round (the ID of the winning agent).
    pub result: i64,
    /// The opponent's move in the previous round.
    pub opponent_move: String,
}

/// Where the agent is in the `initialize -> [update -> end_turn]*` sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Constructed, handshake not yet consumed.
    New,
    /// Between rounds, waiting for the next update.
    Idle,
    /// Update consumed, turn not yet finished.
    InTurn,
    /// All rounds played.
    Done,
}

/// A contest participant wired to the engine's token streams.
///
/// The engine drives the agent through a fixed sequence: [`initialize`] once,
/// then one [`update`]/[`end_turn`] pair per round, for the round count
/// announced in the handshake. Each call consumes exactly its expected tokens;
/// calls out of order fail with [`Error::Lifecycle`] rather than desync the
/// stream.
///
/// Streams are explicit so tests can substitute in-memory buffers:
///
/// ```
/// use arena_sdk::Agent;
/// use std::io::Cursor;
///
/// let mut out = Vec::new();
/// let mut agent = Agent::new(Cursor::new("7\n3\n"), &mut out);
/// agent.initialize().unwrap();
/// assert_eq!(agent.id(), 7);
/// assert_eq!(agent.max_rounds(), 3);
/// ```
///
/// [`initialize`]: Agent::initialize
/// [`update`]: Agent::update
/// [`end_turn`]: Agent::end_turn
#[derive(Debug)]
pub struct Agent<R, W> {
    reader: TokenReader<R>,
    writer: TokenWriter<W>,
    phase: Phase,
    id: i64,
    max_rounds: u32,
    rounds_played: u32,
    round_results: Vec<i64>,
    opponent_moves: Vec<String>,
}

impl<R: BufRead, W: Write> Agent<R, W> {
    /// Create an agent over explicit engine streams.
    pub fn new(input: R, output: W) -> Self {
        Self {
            reader: TokenReader::new(input),
            writer: TokenWriter::new(output),
            phase: Phase::New,
            id: 0,
            max_rounds: 0,
            rounds_played: 0,
            round_results: Vec::new(),
            opponent_moves: Vec::new(),
        }
    }

    /// Agent ID assigned by the engine. Valid after [`Agent::initialize`].
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Total rounds in the match. Valid after [`Agent::initialize`].
    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// Rounds finished so far.
    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// Result codes from past rounds, oldest first.
    pub fn round_results(&self) -> &[i64] {
        &self.round_results
    }

    /// Opponent moves from past rounds, oldest first.
    pub fn opponent_moves(&self) -> &[String] {
        &self.opponent_moves
    }

    /// Consume the engine's handshake: this agent's ID, then the round count.
    ///
    /// Must run exactly once, before any other lifecycle call. Both values
    /// persist on the agent for the rest of the session.
    pub fn initialize(&mut self) -> Result<()> {
        if self.phase != Phase::New {
            return Err(Error::Lifecycle("initialize called twice"));
        }
        self.id = self.reader.next_int()?;
        let rounds = self.reader.next_int()?;
        self.max_rounds = u32::try_from(rounds).map_err(|_| Error::Format {
            expected: "round count",
            token: rounds.to_string(),
        })?;
        self.phase = if self.max_rounds == 0 {
            Phase::Done
        } else {
            Phase::Idle
        };
        debug!(id = self.id, rounds = self.max_rounds, "initialized");
        Ok(())
    }

    /// Consume the engine's per-round update: the last round's result code,
    /// then the opponent's move token, in that order.
    ///
    /// The pair is recorded in the agent's history and returned.
    pub fn update(&mut self) -> Result<Turn> {
        match self.phase {
            Phase::New => return Err(Error::Lifecycle("update before initialize")),
            Phase::InTurn => return Err(Error::Lifecycle("update called twice in a round")),
            Phase::Done => return Err(Error::Lifecycle("update after final round")),
            Phase::Idle => {}
        }
        let result = self.reader.next_int()?;
        let opponent_move = self.reader.next_str()?;
        self.round_results.push(result);
        self.opponent_moves.push(opponent_move.clone());
        self.phase = Phase::InTurn;
        Ok(Turn {
            result,
            opponent_move,
        })
    }

    /// Emit one command token for the current turn.
    ///
    /// Only legal between [`Agent::update`] and [`Agent::end_turn`]; the
    /// engine reads commands until it sees the finish line.
    pub fn send(&mut self, command: &str) -> Result<()> {
        if self.phase != Phase::InTurn {
            return Err(Error::Lifecycle("send outside a turn"));
        }
        self.writer.command(command)
    }

    /// Close out the turn.
    ///
    /// Writes exactly the `D_FINISH` line, telling the engine to stop reading
    /// this agent's commands for the current round.
    pub fn end_turn(&mut self) -> Result<()> {
        if self.phase != Phase::InTurn {
            return Err(Error::Lifecycle("end_turn outside a turn"));
        }
        self.writer.finish()?;
        self.rounds_played += 1;
        self.phase = if self.rounds_played == self.max_rounds {
            debug!(rounds = self.rounds_played, "final round finished");
            Phase::Done
        } else {
            Phase::Idle
        };
        Ok(())
    }

    /// True once every announced round has been played.
    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Tear down into the transport layers, for post-session inspection.
    pub fn into_parts(self) -> (TokenReader<R>, TokenWriter<W>) {
        (self.reader, self.writer)
    }
}
