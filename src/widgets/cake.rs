//! Candle sequencer for the cake widget.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candle {
    pub index: usize,
    pub lit: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CakeState {
    AnyUnlit,
    /// Every candle is lit; the wish is revealed once the delay elapses.
    WishPending,
    AllLit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightOutcome {
    /// Already lit, or no such candle.
    Ignored,
    Lit,
    /// This call lit the last candle. Returned at most once per cake.
    AllLit,
}

impl LightOutcome {
    pub fn changed(self) -> bool {
        !matches!(self, LightOutcome::Ignored)
    }
}

#[derive(Debug)]
pub struct CandleSequencer {
    candles: Vec<Candle>,
    state: CakeState,
}

impl CandleSequencer {
    pub fn new(count: usize) -> Self {
        Self {
            candles: (0..count).map(|index| Candle { index, lit: false }).collect(),
            state: CakeState::AnyUnlit,
        }
    }

    pub fn light(&mut self, index: usize) -> LightOutcome {
        let Some(&candle) = self.candles.get(index) else {
            return LightOutcome::Ignored;
        };
        if candle.lit {
            return LightOutcome::Ignored;
        }
        self.candles[index] = Candle { lit: true, ..candle };
        if self.all_lit() && self.state == CakeState::AnyUnlit {
            self.state = CakeState::WishPending;
            LightOutcome::AllLit
        } else {
            LightOutcome::Lit
        }
    }

    /// Complete the pending wish. Only the first call after the last candle is
    /// lit succeeds.
    pub fn reveal_wish(&mut self) -> bool {
        if self.state != CakeState::WishPending || !self.all_lit() {
            return false;
        }
        self.state = CakeState::AllLit;
        true
    }

    pub fn all_lit(&self) -> bool {
        !self.candles.is_empty() && self.candles.iter().all(|c| c.lit)
    }

    pub fn lit_count(&self) -> usize {
        self.candles.iter().filter(|c| c.lit).count()
    }

    pub fn is_lit(&self, index: usize) -> bool {
        self.candles.get(index).is_some_and(|c| c.lit)
    }

    pub fn wish_revealed(&self) -> bool {
        self.state == CakeState::AllLit
    }

    pub fn state(&self) -> CakeState {
        self.state
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }
}
