//! Deterministic multi-turn command interpreter for the dashboard assistant.
//!
//! One invocation handles one raw chat message: a pending flow (awaiting a
//! confirmation, an assignee, or a project choice) takes priority over fresh
//! intent classification, mutations run against the store mid-turn, and the
//! session's memory record is rewritten before the reply is surfaced.

pub mod engine;
pub mod intents;
pub mod resolve;
pub mod responses;

pub use engine::{CommandStore, StoreFuture, TurnOutcome, run_chat_turn};
pub use intents::{Intent, classify};
