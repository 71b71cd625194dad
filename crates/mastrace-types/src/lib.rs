pub mod domain;
pub mod event;
pub mod records;

pub use domain::*;
pub use event::*;
pub use records::*;
