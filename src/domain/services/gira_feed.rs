use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;
use crate::domain::models::gira::Gira;

const FEED_CAPACITY: usize = 64;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GiraChange {
    GiraCreated { gira: Gira },
    GiraUpdated { gira: Gira },
    BookingCountChanged { gira_id: String, booked: i64, remaining: i64 },
}

impl GiraChange {
    pub fn event_name(&self) -> &'static str {
        match self {
            GiraChange::GiraCreated { .. } => "gira_created",
            GiraChange::GiraUpdated { .. } => "gira_updated",
            GiraChange::BookingCountChanged { .. } => "booking_count_changed",
        }
    }
}

/// Fan-out of gira changes to connected pages. Best effort: slow
/// subscribers lose the oldest events and nothing is replayed.
#[derive(Clone)]
pub struct GiraFeed {
    sender: broadcast::Sender<GiraChange>,
}

impl GiraFeed {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(FEED_CAPACITY);
        Self { sender }
    }

    pub fn publish(&self, change: GiraChange) {
        // An error only means nobody is listening right now.
        if let Err(e) = self.sender.send(change) {
            debug!("No feed subscribers for {}", e.0.event_name());
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GiraChange> {
        self.sender.subscribe()
    }
}

impl Default for GiraFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_changes() {
        let feed = GiraFeed::new();
        let mut rx = feed.subscribe();

        feed.publish(GiraChange::BookingCountChanged { gira_id: "g1".into(), booked: 3, remaining: 7 });

        let change = rx.recv().await.unwrap();
        assert_eq!(change, GiraChange::BookingCountChanged { gira_id: "g1".into(), booked: 3, remaining: 7 });
    }

    #[test]
    fn publishing_without_subscribers_is_harmless() {
        let feed = GiraFeed::new();
        feed.publish(GiraChange::BookingCountChanged { gira_id: "g1".into(), booked: 0, remaining: 1 });
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(GiraChange::BookingCountChanged {
            gira_id: "g1".into(), booked: 1, remaining: 2,
        }).unwrap();
        assert_eq!(json["type"], "BOOKING_COUNT_CHANGED");
        assert_eq!(json["remaining"], 2);
    }
}
