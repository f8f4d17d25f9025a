//! Delayed page transitions, drained by the frame tick.

/// A deferred transition. Each variant names the entity it targets so the
/// coordinator can re-check it when the entry comes due.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageEvent {
    RevealWish,
    FinishGiftOpen { gift: u32 },
    HideConfetti { generation: u64 },
}

#[derive(Clone, Copy, Debug)]
struct Scheduled {
    due_ms: f64,
    seq: u64,
    event: PageEvent,
}

#[derive(Debug, Default)]
pub struct Timeline {
    pending: Vec<Scheduled>,
    next_seq: u64,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now_ms: f64, delay_secs: f64, event: PageEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled { due_ms: now_ms + delay_secs * 1000.0, seq, event });
    }

    /// Remove and return every event due at or before `now_ms`, earliest first;
    /// ties keep scheduling order.
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<PageEvent> {
        let mut due: Vec<Scheduled> = Vec::new();
        self.pending.retain(|s| {
            if s.due_ms <= now_ms {
                due.push(*s);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|s| s.event).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_due_order() {
        let mut tl = Timeline::new();
        tl.schedule(0.0, 6.0, PageEvent::HideConfetti { generation: 1 });
        tl.schedule(100.0, 0.5, PageEvent::FinishGiftOpen { gift: 2 });
        tl.schedule(0.0, 0.5, PageEvent::RevealWish);
        assert!(tl.drain_due(499.0).is_empty());
        assert_eq!(
            tl.drain_due(600.0),
            vec![PageEvent::RevealWish, PageEvent::FinishGiftOpen { gift: 2 }]
        );
        assert_eq!(tl.len(), 1);
        assert_eq!(tl.drain_due(6_000.0), vec![PageEvent::HideConfetti { generation: 1 }]);
        assert!(tl.is_empty());
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut tl = Timeline::new();
        tl.schedule(0.0, 0.5, PageEvent::FinishGiftOpen { gift: 3 });
        tl.schedule(0.0, 0.5, PageEvent::FinishGiftOpen { gift: 1 });
        assert_eq!(
            tl.drain_due(500.0),
            vec![PageEvent::FinishGiftOpen { gift: 3 }, PageEvent::FinishGiftOpen { gift: 1 }]
        );
    }

    #[test]
    fn clear_drops_pending() {
        let mut tl = Timeline::new();
        tl.schedule(0.0, 0.5, PageEvent::RevealWish);
        tl.clear();
        assert!(tl.drain_due(10_000.0).is_empty());
    }
}
