use anyhow::Result;
use mastrace_engine::Reconstruction;

use crate::presentation::presenters;
use crate::presentation::{ConsoleRenderer, Renderer};
use crate::types::{OutputFormat, StatusFilter};

pub fn handle(
    reconstruction: &Reconstruction,
    status: Option<StatusFilter>,
    limit: usize,
    format: OutputFormat,
) -> Result<()> {
    let view_model =
        presenters::present_session_list(reconstruction.metrics.values(), status, limit);

    let renderer = ConsoleRenderer::new(format);
    renderer.render(view_model)?;

    Ok(())
}
