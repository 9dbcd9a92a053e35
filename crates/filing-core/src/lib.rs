pub mod error;
pub mod sequencer;
pub mod types;

pub use error::*;
pub use sequencer::*;
pub use types::*;
