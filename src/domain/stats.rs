use serde::{Deserialize, Serialize};

/// Last population snapshot pushed by the relay.
///
/// Always replaced as a whole; fields are never merged across updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulationStats {
    pub online_users: u64,
    pub active_chats: u64,
}

impl PopulationStats {
    pub fn new(online_users: u64, active_chats: u64) -> Self {
        Self {
            online_users,
            active_chats,
        }
    }
}
