//! Ironfront - turn-based tactical combat engine
//!
//! Two to four factions contest a grid of terrain, moving units, trading
//! fire, capturing structures, and building reinforcements under a shared
//! action-point and money economy. The crate is the rules engine only: it
//! consumes a generated board and commands, and emits events and
//! snapshots for whatever front-end cares to draw them.

pub mod ai;
pub mod board;
pub mod capture;
pub mod catalog;
pub mod combat;
pub mod command;
pub mod core;
pub mod events;
pub mod movement;
pub mod state;
pub mod turn;
pub mod unit;
