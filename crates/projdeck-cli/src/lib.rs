// NOTE: projdeck architecture rationale
//
// Why a fresh catalog per invocation (no persistent index)?
// - The unified catalog is a pure function of the filesystem plus the
//   machine state documents; recomputing it keeps re-generation idempotent
//   and removes a whole class of cache-invalidation bugs
// - Scan cost is bounded by depth, so a full rescan is cheap
//
// Why per-machine state documents instead of one shared file?
// - Each machine owns exactly one document and writes it wholesale;
//   merging is a commutative max-of-timestamps reduction, so there is
//   nothing to lock and no conflict to resolve
// - A stale or corrupt peer document degrades to a warning, never an error
//
// Why write-then-swap for every persisted artifact?
// - A killed invocation must leave the previous dashboard and state
//   document intact; readers only ever see fully materialized files

mod args;
mod commands;
pub mod config;
mod handlers;
mod pipeline;
mod relay;
mod render;
mod report;
mod types;

pub use args::{Cli, Commands};
pub use commands::run;
