use serde::Serialize;

use crate::station::profile::StationProfile;
use crate::station::snapshot::RadioState;

/// Messages pushed to observers over the WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum OutgoingMessage {
    /// Full station snapshot, pushed after every mutation.
    RadioState(RadioState),
    /// Observer count, pushed on join and leave.
    #[serde(rename_all = "camelCase")]
    ListenerCount { count: usize },
    /// Courtesy notification after a profile write; profile data is
    /// out-of-band of the snapshot.
    StationUpdate(StationProfile),
}
