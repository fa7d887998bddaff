//! The protocol between the conversation loop and a completion service.
//!
//! This crate establishes a small contract for anything that can turn a
//! transcript into generated text, so that the loop can talk to a real
//! service or a scripted fake without knowing which one it has.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod message;
mod provider;
mod request;
mod response;

pub use error::*;
pub use message::*;
pub use provider::*;
pub use request::*;
pub use response::*;
