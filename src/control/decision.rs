//! Fan speed decision engine.
//!
//! Maps heart rate to a recommended fan speed through fixed, non-overlapping
//! bands, checked from the top down:
//!
//! | bpm          | speed |
//! |--------------|-------|
//! | > 130        | High  |
//! | > 115        | Med   |
//! | > 100        | Low   |
//! | otherwise    | Off   |
//!
//! The engine only proposes a speed.  Change throttling happens at the
//! actuation boundary (see [`FanChangeTimer`](super::dwell::FanChangeTimer)).

use log::debug;

use crate::config::ControllerConfig;
use crate::fsm::StateId;

/// Fan speed, ordered by intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum FanSpeed {
    #[default]
    Off,
    Low,
    Med,
    High,
}

impl FanSpeed {
    pub fn name(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Low => "Low",
            Self::Med => "Med",
            Self::High => "High",
        }
    }
}

/// Heart-rate band thresholds (strictly greater-than).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedBands {
    pub high_above: u8,
    pub med_above: u8,
    pub low_above: u8,
}

impl SpeedBands {
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self {
            high_above: config.high_above_bpm,
            med_above: config.med_above_bpm,
            low_above: config.low_above_bpm,
        }
    }

    /// Pure band lookup; first match from the top wins.
    pub fn speed_for(&self, bpm: u8) -> FanSpeed {
        if bpm > self.high_above {
            FanSpeed::High
        } else if bpm > self.med_above {
            FanSpeed::Med
        } else if bpm > self.low_above {
            FanSpeed::Low
        } else {
            FanSpeed::Off
        }
    }
}

impl Default for SpeedBands {
    fn default() -> Self {
        Self::from_config(&ControllerConfig::default())
    }
}

/// Holds the current recommendation (DesiredSpeed) between ticks.
pub struct DecisionEngine {
    bands: SpeedBands,
    desired: FanSpeed,
}

impl DecisionEngine {
    pub fn new(bands: SpeedBands) -> Self {
        Self {
            bands,
            desired: FanSpeed::Off,
        }
    }

    /// One evaluation per tick.
    ///
    /// `new_bpm` is the sample consumed from the mailbox this tick, if any.
    /// Outside `Connected` the recommendation is forced to `Off`, whatever
    /// was latched before.
    pub fn evaluate(&mut self, link: StateId, new_bpm: Option<u8>) -> FanSpeed {
        let next = match (link, new_bpm) {
            (StateId::Connected, Some(bpm)) => self.bands.speed_for(bpm),
            (StateId::Connected, None) => self.desired,
            _ => FanSpeed::Off,
        };

        if next != self.desired {
            debug!("decision: {} -> {}", self.desired.name(), next.name());
        }
        self.desired = next;
        next
    }

    pub fn desired(&self) -> FanSpeed {
        self.desired
    }
}
