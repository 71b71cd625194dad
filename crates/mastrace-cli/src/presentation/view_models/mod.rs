pub mod analytics;
pub mod common;
pub mod result;
pub mod session;

pub use analytics::{AnalyticsViewModel, DailyCost, HourlyTokens, ModelTokens, SessionCostRow};
pub use common::{Guidance, StatusBadge, StatusLevel};
pub use result::CommandResultViewModel;
pub use session::{
    ConversationViewModel, FilterSummary, MessageRow, SessionDetailViewModel, SessionListViewModel,
    SessionSummaryRow, TimelineRow,
};
