//! Remote authority boundary.
//!
//! The server owns the pet aggregate of record; the engine consumes it
//! through this narrow request contract and treats every successful
//! response as an unconditional overwrite of local state.

mod pet_client;
mod types;

pub use pet_client::{PetClient, DEFAULT_REQUEST_TIMEOUT};
pub use types::{GaugeSavePayload, PetAction, RemoteError};
