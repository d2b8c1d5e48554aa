//! The channel controller: bridges the store's live window to local view
//! state, and user intent back to store writes.

pub mod controller;
pub mod state;

pub use controller::{ChannelController, SubmitOutcome};
pub use state::{ChannelState, EMOJI_PALETTE};
