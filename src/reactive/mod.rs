//! Single-threaded reactive primitives.
//!
//! Scroll and resize notifications reach the mapping engine as signal
//! writes; the engine reacts through effects and memos, and a mounted
//! section releases everything it created by disposing its owner.

pub mod effect;
pub mod memo;
pub mod owner;
pub mod runtime;
pub mod signal;

pub use effect::{Effect, create_effect};
pub use memo::{Memo, create_memo};
pub use owner::{OwnerId, current_owner, dispose_owner, is_owner_alive, on_cleanup, with_owner};
pub use runtime::{batch, untrack};
pub use signal::{ReadSignal, Signal, WriteSignal, create_signal};
