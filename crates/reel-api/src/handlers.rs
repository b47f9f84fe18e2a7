//! Request handlers.

pub mod ask;
pub mod captions;
pub mod health;
pub mod upload;

pub use ask::*;
pub use captions::*;
pub use health::*;
pub use upload::*;
