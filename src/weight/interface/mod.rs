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

pub mod hx711async;

#[cfg(test)]
pub(crate) mod scripted;
#[cfg(test)]
pub(crate) mod simulated;

/// Number of raw readings averaged by [`AsyncStrainGaugeInterface::read_averaged`] callers that
/// have no better figure.
pub const DEFAULT_AVERAGED_READINGS: usize = 3;

pub trait AsyncStrainGaugeInterface {
    type Error;

    /// Initialise the gauge and make it ready for taking readings. Will put it into an initalized,
    /// powered up state.
    async fn initialize(&mut self) -> Result<(), Self::Error>;

    /// True when the gauge has a conversion waiting to be clocked out. Never blocks.
    fn is_ready(&mut self) -> Result<bool, Self::Error>;

    /// Gets next raw, sign extended reading from the strain gauge. Waits for the conversion to be
    /// ready. If the gauge is powered down then this function is expected to power up the device
    /// and get the reading.
    async fn read_raw(&mut self) -> Result<i32, Self::Error>;

    /// Mean of `times` consecutive raw readings. A count of zero is treated as one.
    async fn read_averaged(&mut self, times: usize) -> Result<f32, Self::Error> {
        let times = times.max(1);
        let mut sum: i64 = 0;
        for _ in 0..times {
            sum += i64::from(self.read_raw().await?);
        }
        Ok(sum as f32 / times as f32)
    }

    /// Power down the strain gauge
    async fn power_down(&mut self) -> Result<(), Self::Error>;

    /// Power up the strain gauge
    async fn power_up(&mut self) -> Result<(), Self::Error>;

    /// Return the number of bits supported by the ADC
    fn get_adc_bit_count(&self) -> usize;
}
