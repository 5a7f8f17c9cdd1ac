// Copyright (C) 2025 Paul Hampson
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License version 3 as  published by the
// Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program.  If not, see <https://www.gnu.org/licenses/>.

use crate::config::TrackerConfig;
use crate::drink_monitor::messaging::Snapshot;
use crate::weight::WeighingSystem;

#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<WeighingE> {
    Weighing(WeighingE),
    /// Nothing heavier than the tared platform was found when capturing the full bottle
    InitialWeightNotPositive,
}

/// Capture failed. Hands the weighing system back so capture can be retried.
pub struct CaptureFailure<WS: WeighingSystem> {
    pub weighing_system: WS,
    pub error: Error<WS::Error>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PresenceTransition {
    Unchanged,
    /// First below-threshold reading while the bottle was present
    GracePeriodStarted,
    /// In-range reading arrived before the grace period ran out
    GracePeriodCancelled,
    BottleRemoved,
    BottleRestored,
}

/// Debounced belief about whether the bottle is on the sensor.
///
/// PRESENT -> ABSENT only after `grace_period` consecutive readings below the drop threshold.
/// ABSENT -> PRESENT on the first reading at or above it. While the bottle is (or is believed
/// to be) away, `last_valid_weight` keeps the last in-range reading.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PresenceState {
    bottle_present: bool,
    last_valid_weight: f32,
    grace_counter: u32,
}

impl PresenceState {
    pub fn new(initial_weight: f32) -> Self {
        Self {
            bottle_present: true,
            last_valid_weight: initial_weight,
            grace_counter: 0,
        }
    }

    pub fn bottle_present(&self) -> bool {
        self.bottle_present
    }

    pub fn last_valid_weight(&self) -> f32 {
        self.last_valid_weight
    }

    pub fn grace_counter(&self) -> u32 {
        self.grace_counter
    }

    pub fn update(&mut self, weight: f32, drop_threshold: f32, grace_period: u32) -> PresenceTransition {
        if weight < drop_threshold {
            if !self.bottle_present {
                // already removed, the counter is not re-armed
                return PresenceTransition::Unchanged;
            }

            self.grace_counter = self.grace_counter.saturating_add(1);
            if self.grace_counter >= grace_period {
                self.bottle_present = false;
                PresenceTransition::BottleRemoved
            } else if self.grace_counter == 1 {
                PresenceTransition::GracePeriodStarted
            } else {
                PresenceTransition::Unchanged
            }
        } else {
            let transition = if !self.bottle_present {
                PresenceTransition::BottleRestored
            } else if self.grace_counter > 0 {
                PresenceTransition::GracePeriodCancelled
            } else {
                PresenceTransition::Unchanged
            };
            self.grace_counter = 0;
            self.last_valid_weight = weight;
            self.bottle_present = true;
            transition
        }
    }

    pub fn snapshot(&self, initial_weight: f32) -> Snapshot {
        Snapshot::from_levels(initial_weight, self.last_valid_weight)
    }
}

pub struct BottleTracker<WS> {
    weighing_system: WS,
    presence: PresenceState,
    initial_weight: f32,
    drop_threshold: f32,
    grace_period: u32,
    step_readings: usize,
}

impl<WS> BottleTracker<WS>
where
    WS: WeighingSystem,
{
    /// Weigh the full bottle and start tracking with it present. Call once, after the bottle has
    /// been placed on the tared platform.
    pub async fn capture_initial_weight(
        mut weighing_system: WS,
        config: &TrackerConfig,
    ) -> Result<Self, CaptureFailure<WS>> {
        let initial_weight = match weighing_system.get_weight(config.capture_readings).await {
            Ok(weight) => weight,
            Err(error) => {
                return Err(CaptureFailure {
                    weighing_system,
                    error: Error::Weighing(error),
                })
            }
        };

        if !(initial_weight > 0.0) {
            warn!("Captured weight {} is not a bottle", initial_weight);
            return Err(CaptureFailure {
                weighing_system,
                error: Error::InitialWeightNotPositive,
            });
        }

        let drop_threshold = initial_weight * config.drop_threshold_fraction;
        info!(
            "Initial weight = {}, drop threshold = {}",
            initial_weight, drop_threshold
        );

        Ok(Self {
            weighing_system,
            presence: PresenceState::new(initial_weight),
            initial_weight,
            drop_threshold,
            grace_period: config.grace_period,
            step_readings: config.step_readings,
        })
    }

    pub fn initial_weight(&self) -> f32 {
        self.initial_weight
    }

    pub fn drop_threshold(&self) -> f32 {
        self.drop_threshold
    }

    pub fn presence(&self) -> &PresenceState {
        &self.presence
    }

    /// One tracking cycle. A failed reading counts as missing: the last valid weight is reported
    /// and the presence state is left exactly as it was.
    pub async fn step(&mut self) -> Snapshot {
        match self.weighing_system.get_weight(self.step_readings).await {
            Ok(weight) => {
                trace!("Cycle weight = {}", weight);
                let transition = self
                    .presence
                    .update(weight, self.drop_threshold, self.grace_period);
                self.log_transition(transition);
            }
            Err(_) => {
                warn!(
                    "Weight reading unavailable, holding {}",
                    self.presence.last_valid_weight()
                );
            }
        }

        self.presence.snapshot(self.initial_weight)
    }

    fn log_transition(&self, transition: PresenceTransition) {
        match transition {
            PresenceTransition::Unchanged => {}
            PresenceTransition::GracePeriodStarted => {
                debug!("Weight dropped below threshold. Starting grace period")
            }
            PresenceTransition::GracePeriodCancelled => {
                debug!("Weight back in range. Grace period cancelled")
            }
            PresenceTransition::BottleRemoved => {
                info!(
                    "Bottle removed. Holding last known good value {}",
                    self.presence.last_valid_weight()
                )
            }
            PresenceTransition::BottleRestored => info!("Bottle back on the sensor"),
        }
    }
}
