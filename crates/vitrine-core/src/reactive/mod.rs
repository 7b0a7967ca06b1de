#![forbid(unsafe_code)]

//! Reactive primitives: signals, batching, and subscription scopes.

pub mod batch;
pub mod scope;
pub mod signal;

pub use batch::BatchScope;
pub use scope::Subscriptions;
pub use signal::{Signal, Subscription};
