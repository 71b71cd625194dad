use anyhow::Result;
use mastrace_engine::{Reconstruction, conversation_flow};

use super::find_session;
use crate::presentation::presenters;
use crate::presentation::{ConsoleRenderer, Renderer};
use crate::types::OutputFormat;

pub fn handle(
    reconstruction: &Reconstruction,
    session_id: &str,
    preview_chars: usize,
    format: OutputFormat,
) -> Result<()> {
    let (_, timeline) = find_session(reconstruction, session_id)?;

    let messages = conversation_flow(timeline, preview_chars);
    let view_model = presenters::present_conversation(session_id, messages);

    let renderer = ConsoleRenderer::new(format);
    renderer.render(view_model)?;

    Ok(())
}
