pub mod wallet;

pub use wallet::{LocalWalletAdapter, SignApproval, WalletAdapter, WalletHandle};
