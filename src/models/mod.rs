pub mod consent;
pub mod patient;
pub mod stats;
pub mod transaction;

// Re-export commonly used types
pub use consent::*;
pub use patient::*;
pub use stats::*;
pub use transaction::*;
