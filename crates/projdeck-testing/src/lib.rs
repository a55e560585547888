//! Testing infrastructure for projdeck integration tests.
//!
//! `TestWorld` builds an isolated environment: a scan root with declared
//! projects, a data directory with a written config, and a state directory
//! for machine documents, all inside one temp dir.

pub mod world;

pub use world::TestWorld;
