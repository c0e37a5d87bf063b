pub mod dispatcher;
pub mod endpoint;
pub mod normalizer;
pub mod prompt;
pub mod providers;

pub use dispatcher::{DispatchError, Dispatcher, RetryPolicy};
pub use normalizer::{normalize, Normalized};
