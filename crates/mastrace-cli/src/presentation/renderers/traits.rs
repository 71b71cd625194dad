use anyhow::Result;
use serde::Serialize;
use std::fmt::Display;

use crate::presentation::view_models::CommandResultViewModel;

/// Tabular form of a view model for `--format csv`.
pub trait CsvTable {
    fn csv_header(&self) -> Vec<&'static str>;
    fn csv_rows(&self) -> Vec<Vec<String>>;
}

pub trait Renderer {
    fn render<T>(&self, result: CommandResultViewModel<T>) -> Result<()>
    where
        T: Serialize + Display + CsvTable;
}
