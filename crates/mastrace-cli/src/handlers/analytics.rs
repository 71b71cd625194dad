use anyhow::Result;
use mastrace_engine::Reconstruction;

use crate::presentation::presenters;
use crate::presentation::{ConsoleRenderer, Renderer};
use crate::types::OutputFormat;

pub fn handle(reconstruction: &Reconstruction, top: usize, format: OutputFormat) -> Result<()> {
    let analytics = reconstruction.analytics();
    let view_model = presenters::present_analytics(&analytics, top);

    let renderer = ConsoleRenderer::new(format);
    renderer.render(view_model)?;

    Ok(())
}
