//! Events delivered to the embedding application.

use serde_json::{Value, json};
use tokio::sync::mpsc;

use crate::page::PageRef;
use crate::scroll::Direction;

#[derive(Debug, Clone)]
pub enum PagerEvent {
    /// A drag began.
    ScrollStart {
        current_page: usize,
        direction: Direction,
    },
    /// The content moved during a drag. `offset` is the raw pixel offset
    /// reported by the host.
    Scroll {
        current_page: usize,
        offset: f32,
        direction: Direction,
    },
    /// A swipe settled, whether or not the page changed.
    ScrollEnd { current_page: usize },
    /// A swipe settled on a different page. `previous_view` is absent when the
    /// old index no longer exists.
    Change {
        current_page: usize,
        previous_page: usize,
        current_view: PageRef,
        previous_view: Option<PageRef>,
    },
}

impl PagerEvent {
    /// Name the embedding layer dispatches under.
    pub fn name(&self) -> &'static str {
        match self {
            PagerEvent::ScrollStart { .. } => "scrollstart",
            PagerEvent::Scroll { .. } => "scroll",
            PagerEvent::ScrollEnd { .. } => "scrollend",
            PagerEvent::Change { .. } => "change",
        }
    }

    /// Payload as the embedding layer sees it. Page handles are reduced to
    /// their labels.
    pub fn to_json(&self) -> Value {
        match self {
            PagerEvent::ScrollStart {
                current_page,
                direction,
            } => json!({
                "currentPage": current_page,
                "direction": direction,
            }),
            PagerEvent::Scroll {
                current_page,
                offset,
                direction,
            } => json!({
                "currentPage": current_page,
                "offset": offset,
                "direction": direction,
            }),
            PagerEvent::ScrollEnd { current_page } => json!({
                "currentPage": current_page,
            }),
            PagerEvent::Change {
                current_page,
                previous_page,
                current_view,
                previous_view,
            } => {
                let mut payload = json!({
                    "currentPage": current_page,
                    "previousPage": previous_page,
                    "currentView": current_view.label(),
                });
                if let Some(previous) = previous_view {
                    payload["previousView"] = Value::from(previous.label());
                }
                payload
            }
        }
    }
}

/// Receives pager events. Called synchronously on the signal path, so
/// implementations should hand off rather than do work.
pub trait EventSink: Send + Sync {
    fn deliver(&self, event: &PagerEvent);
}

impl EventSink for mpsc::UnboundedSender<PagerEvent> {
    fn deliver(&self, event: &PagerEvent) {
        if self.send(event.clone()).is_err() {
            log::trace!("dropping {} event: receiver closed", event.name());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::LazyPage;
    use crate::testing::BasicVisual;

    #[test]
    fn change_payload_omits_missing_previous_view() {
        let page = LazyPage::new("intro", || Ok(BasicVisual::shared(1))).shared();
        let event = PagerEvent::Change {
            current_page: 2,
            previous_page: 5,
            current_view: page,
            previous_view: None,
        };

        let payload = event.to_json();
        assert_eq!(event.name(), "change");
        assert_eq!(payload["currentPage"], 2);
        assert_eq!(payload["previousPage"], 5);
        assert_eq!(payload["currentView"], "intro");
        assert!(payload.get("previousView").is_none());
    }

    #[test]
    fn direction_serializes_lowercase() {
        let event = PagerEvent::ScrollStart {
            current_page: 0,
            direction: Direction::Backward,
        };
        assert_eq!(event.to_json()["direction"], "backward");
    }

    #[tokio::test]
    async fn channel_sink_forwards_events() {
        let (tx, mut rx) = mpsc::unbounded_channel::<PagerEvent>();
        tx.deliver(&PagerEvent::ScrollEnd { current_page: 3 });
        let received = rx.recv().await.unwrap();
        assert_eq!(received.name(), "scrollend");

        drop(rx);
        // Closed receiver is not an error for the pager.
        tx.deliver(&PagerEvent::ScrollEnd { current_page: 4 });
    }
}
