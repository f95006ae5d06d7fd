//! Log event building blocks: severity levels and free-form payloads.
//!
//! A log event is ephemeral — a [`Severity`], a [`Payload`] of arbitrary
//! caller values, a timestamp, and the owning record. It is mirrored to the
//! console and handed to the transport; nothing is retained locally.

mod payload;
mod severity;

pub use payload::Payload;
pub use severity::Severity;
