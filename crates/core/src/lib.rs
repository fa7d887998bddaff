//! Core logic including the conversation loop, the transcript, and the
//! seam to the completion service.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod console;
mod model_client;
mod session;
pub mod transcript;

pub use console::{Console, ReadError};
pub use session::{Session, SessionBuilder, SessionEnd};
pub use transcript::Transcript;
