pub mod copy;
pub mod identifier;

pub use copy::{Clipboard, CopyableIdentifier, StdoutClipboard};
pub use identifier::{truncate_identifier, AdaptiveIdentifier, LayoutMetrics};
