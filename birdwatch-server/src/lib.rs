//! Birdwatch server.
//!
//! Polls the upstream drone position feed on a fixed interval, tracks
//! no-fly-zone violations with `birdwatch-core`, resolves pilots from the
//! registry, and pushes the closest-violation set to SSE subscribers
//! whenever it changes.

pub mod config;
pub mod fetch;
pub mod monitor;
pub mod pilots;
pub mod publish;
pub mod web;
