//! Bounded delivery channel for completed rooms.
//!
//! Producers are the per-lane match passes; the receiver belongs to the
//! host. Sends run on detached tasks so a slow consumer back-pressures the
//! emission tasks, never the tick loop.

use tokio::sync::mpsc;

use crate::error::{Result, RoomForgeError};
use crate::model::RoomRef;

pub const DEFAULT_SINK_CAPACITY: usize = 128;

/// Create the delivery channel. The sink side is cloned into each queue; the
/// receiver goes to the consumer.
pub fn room_channel(capacity: usize) -> (RoomSink, mpsc::Receiver<RoomRef>) {
    let (tx, rx) = mpsc::channel(capacity);
    (RoomSink { tx }, rx)
}

/// Producer handle to the room channel.
#[derive(Clone)]
pub struct RoomSink {
    tx: mpsc::Sender<RoomRef>,
}

impl RoomSink {
    /// Deliver one room, waiting for channel capacity.
    pub async fn deliver(&self, room: RoomRef) -> Result<()> {
        self.tx
            .send(room)
            .await
            .map_err(|_| RoomForgeError::SinkClosed)
    }

    /// Deliver on a spawned task and return immediately. Must be called from
    /// within a tokio runtime.
    pub fn deliver_detached(&self, room: RoomRef) {
        let sink = self.clone();
        tokio::spawn(async move {
            if sink.deliver(room).await.is_err() {
                tracing::warn!("completed room dropped: consumer closed the sink");
            }
        });
    }
}
