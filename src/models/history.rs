// History point for the rolling packet-count window

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    /// Epoch milliseconds.
    pub timestamp: u64,
    pub packet_count: u64,
}
