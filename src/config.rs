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

//! Tunable parameters for the bottle monitor.

/// Startup configuration error. There is no sensible recovery from any of these.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Reference unit is zero, NaN or infinite
    InvalidReferenceUnit,
    /// Drop threshold fraction must lie strictly between 0 and 1
    InvalidDropThresholdFraction,
    /// At least one below-threshold cycle has to be tolerated before removal
    ZeroGracePeriod,
    ZeroReadingCount,
    ZeroCyclePeriod,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrackerConfig {
    /// Raw counts per weight unit. Sensor and mount specific.
    pub reference_unit: f32,
    /// The bottle is treated as lifted once the weight drops below this fraction of the full
    /// bottle weight.
    pub drop_threshold_fraction: f32,
    /// Consecutive below-threshold cycles tolerated before the bottle is declared removed
    pub grace_period: u32,
    pub cycle_period_ms: u64,
    pub tare_readings: usize,
    pub capture_readings: usize,
    pub step_readings: usize,
    /// Pause after taring before asking for the bottle
    pub tare_settle_ms: u64,
    /// Time given to place the full bottle before its weight is captured
    pub bottle_placement_ms: u64,
    /// Longest wait for the ADC to signal a conversion before a read is abandoned
    pub ready_timeout_us: u32,
}

impl TrackerConfig {
    pub const DEFAULT_REFERENCE_UNIT: f32 = 1720.0;
    pub const DEFAULT_DROP_THRESHOLD_FRACTION: f32 = 0.4;
    pub const DEFAULT_GRACE_PERIOD: u32 = 10;

    pub const fn new() -> Self {
        Self {
            reference_unit: Self::DEFAULT_REFERENCE_UNIT,
            drop_threshold_fraction: Self::DEFAULT_DROP_THRESHOLD_FRACTION,
            grace_period: Self::DEFAULT_GRACE_PERIOD,
            cycle_period_ms: 5000,
            tare_readings: 15,
            capture_readings: 10,
            step_readings: 5,
            tare_settle_ms: 2000,
            bottle_placement_ms: 5000,
            ready_timeout_us: 1_000_000,
        }
    }

    pub const fn with_reference_unit(mut self, reference_unit: f32) -> Self {
        self.reference_unit = reference_unit;
        self
    }

    pub const fn with_drop_threshold_fraction(mut self, fraction: f32) -> Self {
        self.drop_threshold_fraction = fraction;
        self
    }

    pub const fn with_grace_period(mut self, cycles: u32) -> Self {
        self.grace_period = cycles;
        self
    }

    pub const fn with_cycle_period_ms(mut self, cycle_period_ms: u64) -> Self {
        self.cycle_period_ms = cycle_period_ms;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.reference_unit.is_finite() || self.reference_unit == 0.0 {
            return Err(ConfigError::InvalidReferenceUnit);
        }
        if !(self.drop_threshold_fraction > 0.0 && self.drop_threshold_fraction < 1.0) {
            return Err(ConfigError::InvalidDropThresholdFraction);
        }
        if self.grace_period == 0 {
            return Err(ConfigError::ZeroGracePeriod);
        }
        if self.tare_readings == 0 || self.capture_readings == 0 || self.step_readings == 0 {
            return Err(ConfigError::ZeroReadingCount);
        }
        if self.cycle_period_ms == 0 {
            return Err(ConfigError::ZeroCyclePeriod);
        }
        Ok(())
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::new()
    }
}
