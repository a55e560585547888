pub mod error;
pub mod identity;
pub mod machine;
pub mod record;
pub mod unified;
pub mod warning;

pub use error::{Error, Result};
pub use identity::RemoteIdentity;
pub use machine::{MachineActivityEntry, MachineStateDocument};
pub use record::{ProjectRecord, ProjectStatus};
pub use unified::{Presence, UnifiedEntry};
pub use warning::ScanWarning;
