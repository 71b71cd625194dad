//! # Presentation Layer
//!
//! Unidirectional flow from engine values to terminal output:
//!
//! ```text
//! [ Handler ] --> [ Presenter ] --> [ ViewModel ] --> [ Renderer ] --> [ Output ]
//!                  (converter)       (contract)        (console)    (plain/json/csv)
//! ```
//!
//! * `view_models/`: serializable data contracts; plain text via `Display`,
//!   tabular output via `CsvTable`. No calculation.
//! * `presenters/`: engine values → view models (filtering, sorting, labels).
//! * `renderers/`: paints a `CommandResultViewModel` in the chosen format.
//! * `formatters/`: small shared string helpers.

pub mod formatters;
pub mod presenters;
pub mod renderers;
pub mod view_models;

pub use renderers::{ConsoleRenderer, CsvTable, Renderer};
pub use view_models::{CommandResultViewModel, Guidance, StatusBadge, StatusLevel};
