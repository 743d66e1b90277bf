use super::{conversation_state::ConversationState, stats::PopulationStats, status::ConnectionStatus};

/// Everything the views need to know about the relay session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    pub connection: ConnectionStatus,
    pub conversation: ConversationState,
    pub stats: PopulationStats,
}
