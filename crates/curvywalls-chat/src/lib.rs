//! Curvy Walls Chat Library
//!
//! Classifies consecutive chat messages into merged visual runs: same
//! speaker, close enough in time, compatible roll types. The host applies
//! the resulting tags to its rendered message list.

pub mod merge;
pub mod settings;

pub use merge::{MergeLog, MergeMessage, MergeTag, can_merge};
pub use settings::{DEFAULT_EPOCH_SECONDS, MergeSettings, RollPolicy};
