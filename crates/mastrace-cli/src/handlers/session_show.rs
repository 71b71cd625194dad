use anyhow::Result;
use mastrace_engine::Reconstruction;

use super::find_session;
use crate::presentation::presenters;
use crate::presentation::{ConsoleRenderer, Renderer};
use crate::types::OutputFormat;

pub fn handle(
    reconstruction: &Reconstruction,
    session_id: &str,
    format: OutputFormat,
) -> Result<()> {
    let (metrics, timeline) = find_session(reconstruction, session_id)?;

    let view_model = presenters::present_session_detail(metrics, timeline);

    let renderer = ConsoleRenderer::new(format);
    renderer.render(view_model)?;

    Ok(())
}
