pub mod console;
pub mod traits;

pub use console::ConsoleRenderer;
pub use traits::{CsvTable, Renderer};
