//! Drives an agent through a full match session.
//!
//! The harness owns the lifecycle sequencing so user kits only decide what to
//! do inside a turn: it consumes the handshake, then runs exactly one
//! update/end-turn pair per announced round. A per-turn hook runs between the
//! two with the round's [`Turn`] record and may emit commands through the
//! agent; the plain scaffold finishes every turn untouched.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use tracing::{debug, error, info};

use crate::agent::{Agent, Turn};
use crate::error::Result;
use crate::stream::DeadlineReader;

/// Harness configuration.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Per-read deadline. `None` blocks indefinitely on each read.
    pub read_deadline: Option<Duration>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            read_deadline: Some(Duration::from_secs(60)),
        }
    }
}

/// Runs an agent against the match engine.
///
/// # Example
///
/// ```no_run
/// use arena_sdk::{Harness, HarnessConfig};
///
/// fn main() -> anyhow::Result<()> {
///     let harness = Harness::from_stdio(&HarnessConfig::default());
///     harness.run_with(|agent, turn| {
///         // react to turn.result / turn.opponent_move here
///         agent.send("R")
///     })?;
///     Ok(())
/// }
/// ```
pub struct Harness<R, W> {
    agent: Agent<R, W>,
}

impl Harness<DeadlineReader, io::Stdout> {
    /// Harness over the process's standard streams, as run under the engine.
    pub fn from_stdio(config: &HarnessConfig) -> Self {
        let input = DeadlineReader::new(io::stdin(), config.read_deadline);
        Self::new(Agent::new(input, io::stdout()))
    }
}

impl<R: BufRead, W: Write> Harness<R, W> {
    /// Create a harness around an already-wired agent.
    pub fn new(agent: Agent<R, W>) -> Self {
        Self { agent }
    }

    /// Run the scaffold session: consume every update, finish every turn.
    ///
    /// Returns the agent for post-match inspection.
    pub fn run(self) -> Result<Agent<R, W>> {
        self.run_with(|_, _| Ok(()))
    }

    /// Run the session with a per-turn hook.
    ///
    /// The hook runs after each update and before the turn is finished. Any
    /// error, from the protocol or from the hook, aborts the session
    /// immediately and nothing further is written.
    pub fn run_with<F>(mut self, mut on_turn: F) -> Result<Agent<R, W>>
    where
        F: FnMut(&mut Agent<R, W>, &Turn) -> Result<()>,
    {
        match Self::drive(&mut self.agent, &mut on_turn) {
            Ok(()) => {
                info!(rounds = self.agent.rounds_played(), "match complete");
                Ok(self.agent)
            }
            Err(e) => {
                error!("session aborted: {}", e);
                Err(e)
            }
        }
    }

    fn drive<F>(agent: &mut Agent<R, W>, on_turn: &mut F) -> Result<()>
    where
        F: FnMut(&mut Agent<R, W>, &Turn) -> Result<()>,
    {
        agent.initialize()?;
        info!(id = agent.id(), rounds = agent.max_rounds(), "match started");

        for round in 1..=agent.max_rounds() {
            let turn = agent.update()?;
            debug!(
                round,
                result = turn.result,
                opponent = %turn.opponent_move,
                "round update"
            );
            on_turn(agent, &turn)?;
            agent.end_turn()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Cursor;

    #[test]
    fn test_scaffold_session_finishes_every_round() {
        let mut out = Vec::new();
        let input = Cursor::new("7\n3\n1 rock\n2 paper\n1 scissors\n".to_string());
        let agent = Harness::new(Agent::new(input, &mut out)).run().unwrap();
        assert_eq!(agent.id(), 7);
        assert_eq!(agent.rounds_played(), 3);
        drop(agent);
        assert_eq!(out, b"D_FINISH\nD_FINISH\nD_FINISH\n");
    }

    #[test]
    fn test_hook_commands_interleave_with_finish() {
        let mut out = Vec::new();
        let input = Cursor::new("4\n2\n0 P\n4 S\n".to_string());
        let agent = Harness::new(Agent::new(input, &mut out))
            .run_with(|agent, _turn| agent.send("R"))
            .unwrap();
        drop(agent);
        assert_eq!(out, b"R\nD_FINISH\nR\nD_FINISH\n");
    }

    #[test]
    fn test_hook_error_aborts_without_finish() {
        let mut out = Vec::new();
        let input = Cursor::new("4\n2\n0 P\n4 S\n".to_string());
        let err = Harness::new(Agent::new(input, &mut out))
            .run_with(|_, _| Err(Error::Lifecycle("kit gave up")))
            .unwrap_err();
        assert!(matches!(err, Error::Lifecycle("kit gave up")));
        assert!(out.is_empty());
    }
}
