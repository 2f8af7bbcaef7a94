use serde::{Deserialize, Serialize};

/// Feedback cue emitted to the audio layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Flip,
    Match,
    Wrong,
    Win,
}

impl Signal {
    pub const ALL: [Signal; 4] = [Self::Flip, Self::Match, Self::Wrong, Self::Win];

    pub const fn name(self) -> &'static str {
        use Signal::*;
        match self {
            Flip => "flip",
            Match => "match",
            Wrong => "wrong",
            Win => "win",
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
enum GateState {
    #[default]
    Open,
    /// Signal just fired, further triggers are dropped.
    Cooling,
    /// Cooldown over and playback cut, waiting before reopening.
    Grace,
}

/// Rate limit for a signal: a trigger closes the gate through a cooldown and a grace period.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalGate {
    state: GateState,
}

impl SignalGate {
    pub fn is_open(&self) -> bool {
        matches!(self.state, GateState::Open)
    }

    /// Closes the gate and returns `true` if the signal may fire now.
    pub fn try_trigger(&mut self) -> bool {
        if self.is_open() {
            self.state = GateState::Cooling;
            true
        } else {
            false
        }
    }

    pub fn end_cooldown(&mut self) {
        if matches!(self.state, GateState::Cooling) {
            self.state = GateState::Grace;
        }
    }

    pub fn end_grace(&mut self) {
        if matches!(self.state, GateState::Grace) {
            self.state = GateState::Open;
        }
    }
}
