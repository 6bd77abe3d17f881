//! Utility types shared across the engine.

mod secret;

pub use secret::SecretString;
