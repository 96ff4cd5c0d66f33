//! Chart controllers and the selection mailbox
//!
//! The primary view never calls the detail view directly. A hover hook posts a
//! [`SelectionEvent`] into a single-slot [`Mailbox`]; whoever owns both views
//! drains the slot and drives the detail view. Posting over an undrained event
//! replaces it, so the latest pointer event always wins.

pub mod detail;
pub mod primary;

pub use detail::DetailView;
pub use primary::PrimaryView;

use crate::query::BucketKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    /// Pointer entered the marker of this (year, bucket)
    Enter(BucketKey),
    /// Pointer left a marker
    Leave,
}

#[derive(Debug, Default)]
pub struct Mailbox {
    slot: Option<SelectionEvent>,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites whatever is pending.
    pub fn post(&mut self, event: SelectionEvent) {
        self.slot = Some(event);
    }

    pub fn take(&mut self) -> Option<SelectionEvent> {
        self.slot.take()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }
}

/// Cosmetic label cap, counted in characters.
pub fn truncate_label(name: &str, max_chars: usize) -> String {
    name.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mailbox_latest_event_wins() {
        let mut mb = Mailbox::new();
        mb.post(SelectionEvent::Enter(BucketKey { year: 2016, bucket: 7 }));
        mb.post(SelectionEvent::Leave);
        mb.post(SelectionEvent::Enter(BucketKey { year: 2018, bucket: 6 }));

        assert_eq!(mb.take(), Some(SelectionEvent::Enter(BucketKey { year: 2018, bucket: 6 })));
        assert_eq!(mb.take(), None);
        assert!(mb.is_empty());
    }

    #[test]
    fn test_truncate_label_counts_chars() {
        assert_eq!(truncate_label("Twilight Imperium", 10), "Twilight I");
        assert_eq!(truncate_label("Azul", 10), "Azul");
        assert_eq!(truncate_label("Ça ira, Café", 4), "Ça i");
        assert_eq!(truncate_label("", 10), "");
    }
}
