//! Gift boxes: Closed -> Opening (shaking) -> Open.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GiftIcon {
    Heart,
    Star,
    Sparkle,
    Generic,
}

/// Static description of one gift.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GiftSpec {
    pub id: u32,
    pub color: &'static str,
    pub ribbon_color: &'static str,
    pub message: &'static str,
    pub icon: GiftIcon,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GiftState {
    Closed,
    Opening,
    Open,
}

#[derive(Clone, Copy, Debug)]
pub struct GiftBox {
    pub spec: &'static GiftSpec,
    pub state: GiftState,
}

impl GiftBox {
    pub fn id(&self) -> u32 {
        self.spec.id
    }

    pub fn opened(&self) -> bool {
        self.state == GiftState::Open
    }
}

#[derive(Debug)]
pub struct GiftRevealer {
    gifts: Vec<GiftBox>,
}

impl GiftRevealer {
    pub fn new(specs: &'static [GiftSpec]) -> Self {
        Self {
            gifts: specs.iter().map(|spec| GiftBox { spec, state: GiftState::Closed }).collect(),
        }
    }

    /// Start opening a closed gift. Opening or open gifts, and unknown ids, are
    /// left alone.
    pub fn open(&mut self, id: u32) -> bool {
        self.transition(id, GiftState::Closed, GiftState::Opening)
    }

    /// Finish the open started by `open`. Returns false unless the gift is
    /// still mid-open.
    pub fn finish_open(&mut self, id: u32) -> bool {
        self.transition(id, GiftState::Opening, GiftState::Open)
    }

    fn transition(&mut self, id: u32, from: GiftState, to: GiftState) -> bool {
        match self.gifts.iter_mut().find(|g| g.id() == id) {
            Some(gift) if gift.state == from => {
                *gift = GiftBox { state: to, ..*gift };
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: u32) -> Option<&GiftBox> {
        self.gifts.iter().find(|g| g.id() == id)
    }

    pub fn gifts(&self) -> &[GiftBox] {
        &self.gifts
    }

    pub fn opened_ids(&self) -> Vec<u32> {
        self.gifts.iter().filter(|g| g.opened()).map(GiftBox::id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GIFT_MESSAGES;

    #[test]
    fn open_then_finish() {
        let mut gifts = GiftRevealer::new(GIFT_MESSAGES);
        assert!(gifts.open(2));
        assert_eq!(gifts.get(2).unwrap().state, GiftState::Opening);
        assert!(!gifts.get(2).unwrap().opened());
        assert!(gifts.finish_open(2));
        assert!(gifts.get(2).unwrap().opened());
        assert_eq!(gifts.opened_ids(), vec![2]);
    }

    #[test]
    fn repeated_open_is_ignored() {
        let mut gifts = GiftRevealer::new(GIFT_MESSAGES);
        assert!(gifts.open(1));
        assert!(!gifts.open(1));
        assert!(gifts.finish_open(1));
        assert!(!gifts.open(1));
        assert!(!gifts.finish_open(1));
        assert_eq!(gifts.get(1).unwrap().state, GiftState::Open);
    }

    #[test]
    fn unknown_gift_is_ignored() {
        let mut gifts = GiftRevealer::new(GIFT_MESSAGES);
        assert!(!gifts.open(99));
        assert!(!gifts.finish_open(99));
    }

    #[test]
    fn finish_without_open_is_ignored() {
        let mut gifts = GiftRevealer::new(GIFT_MESSAGES);
        assert!(!gifts.finish_open(3));
        assert_eq!(gifts.get(3).unwrap().state, GiftState::Closed);
    }
}
