pub mod details;
pub mod event;

pub use details::*;
pub use event::*;
