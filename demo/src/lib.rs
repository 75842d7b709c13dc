//! Tic-tac-toe over the Gridwire protocol.
//!
//! The game rules ([`game`]), their registration as protocol tools and a
//! resource ([`tools`]), and the client-side players ([`player`]). The
//! binary in `main.rs` wires these into `serve` and `play` commands.

pub mod game;
pub mod player;
pub mod tools;
