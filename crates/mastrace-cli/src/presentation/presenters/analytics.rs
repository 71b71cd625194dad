use mastrace_engine::SnapshotAnalytics;

use crate::presentation::view_models::{
    AnalyticsViewModel, CommandResultViewModel, DailyCost, Guidance, HourlyTokens, ModelTokens,
    SessionCostRow, StatusBadge,
};

pub fn present_analytics(
    analytics: &SnapshotAnalytics,
    top: usize,
) -> CommandResultViewModel<AnalyticsViewModel> {
    let content = AnalyticsViewModel {
        total_sessions: analytics.total_sessions,
        total_llm_calls: analytics.total_llm_calls,
        total_cost: analytics.total_cost,
        top_sessions: analytics
            .top_sessions(top)
            .iter()
            .map(|s| SessionCostRow {
                session_id: s.session_id.to_string(),
                cost: s.cost,
            })
            .collect(),
        daily_cost: analytics
            .daily_cost
            .iter()
            .map(|(date, cost)| DailyCost {
                date: date.to_string(),
                cost: *cost,
            })
            .collect(),
        tokens_by_model: analytics
            .tokens_by_model
            .iter()
            .map(|(model, tokens)| ModelTokens {
                model: model.clone(),
                tokens: *tokens,
            })
            .collect(),
        hourly_tokens: analytics
            .hourly_tokens
            .iter()
            .map(|(hour, tokens)| HourlyTokens {
                hour: *hour,
                tokens: *tokens,
            })
            .collect(),
    };

    let mut result = CommandResultViewModel::new(content);
    if analytics.total_llm_calls == 0 {
        result = result.with_badge(StatusBadge::info("No chat completions in snapshot"));
    } else {
        result = result.with_badge(StatusBadge::success(format!(
            "{} LLM calls across {} sessions",
            analytics.total_llm_calls, analytics.total_sessions
        )));
        if analytics.cost_by_session.len() > top {
            result = result.with_suggestion(
                Guidance::new(format!("Showing the {} most expensive sessions", top))
                    .with_command(format!(
                        "mastrace analytics --top {}",
                        analytics.cost_by_session.len()
                    )),
            );
        }
    }
    result
}
