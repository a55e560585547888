pub mod aggregate;
pub mod error;
pub mod loader;
pub mod origin;
pub mod scanner;

pub use aggregate::{AggregateInput, AggregateOutcome, aggregate};
pub use error::{Error, Result};
pub use loader::{DECLARATION_FILE, Declaration, SCREENSHOT_FILE, load_declaration};
pub use origin::{OriginResolution, parse_remote_url, resolve_origin};
pub use scanner::{ScanOptions, ScanOutcome, scan};
