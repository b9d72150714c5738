//! Arena SDK - Rust
//!
//! Kit for building agents that compete in round-based arena matches.
//!
//! An agent talks to the match engine over a plain whitespace-token protocol
//! on its standard streams. The engine sends a handshake (agent ID, round
//! count), then one update per round (result code, opponent move); the agent
//! answers each round with optional command tokens and the `D_FINISH` line.
//!
//! # Example
//!
//! ```no_run
//! use arena_sdk::{Harness, HarnessConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     // Scaffold agent: consume every update, finish every turn.
//!     Harness::from_stdio(&HarnessConfig::default()).run()?;
//!     Ok(())
//! }
//! ```
//!
//! For deterministic tests, wire the [`Agent`] to in-memory buffers instead
//! of the process streams:
//!
//! ```
//! use arena_sdk::{Agent, Harness};
//! use std::io::Cursor;
//!
//! let mut out = Vec::new();
//! let input = Cursor::new("7\n1\n1 rock\n");
//! let agent = Harness::new(Agent::new(input, &mut out)).run().unwrap();
//! assert_eq!(agent.id(), 7);
//! ```

pub mod agent;
pub mod error;
pub mod harness;
pub mod protocol;
pub mod stream;

pub use agent::{Agent, Turn};
pub use error::{Error, Result};
pub use harness::{Harness, HarnessConfig};
pub use protocol::{TokenReader, TokenWriter, FINISH};
pub use stream::DeadlineReader;
