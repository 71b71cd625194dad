mod analytics;
mod session;

pub use analytics::present_analytics;
pub use session::{present_conversation, present_session_detail, present_session_list};
