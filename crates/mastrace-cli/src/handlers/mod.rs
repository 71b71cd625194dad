pub mod analytics;
pub mod session_flow;
pub mod session_list;
pub mod session_show;

use anyhow::{Result, bail};
use mastrace_engine::Reconstruction;
use mastrace_types::{SessionId, SessionMetrics, SessionTimeline};

/// Metrics and timeline of one session, or a "not found" error naming the id.
fn find_session<'a>(
    reconstruction: &'a Reconstruction,
    session_id: &str,
) -> Result<(&'a SessionMetrics, &'a SessionTimeline)> {
    let id = SessionId::from(session_id);
    match (
        reconstruction.session_metrics(&id),
        reconstruction.timeline(&id),
    ) {
        (Some(metrics), Some(timeline)) => Ok((metrics, timeline)),
        _ => bail!("Session not found: {}", session_id),
    }
}
