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

#[allow(clippy::module_inception)]
pub mod weight;
pub mod interface;

/// Readings averaged by [`WeighingSystem::tare`] when nothing else is configured
pub const DEFAULT_TARE_READINGS: usize = 15;
/// Readings averaged by [`WeighingSystem::get_weight`] when nothing else is configured
pub const DEFAULT_WEIGHT_READINGS: usize = 3;

pub trait WeighingSystem {

    type Error;

    /// Set the divisor converting tared raw counts into weight units. Zero is rejected.
    fn set_reference_unit(&mut self, reference_unit: f32) -> Result<(), Self::Error>;

    /// Record the raw baseline for an empty platform. Only the platform may be on the sensor.
    async fn tare(&mut self, times: usize) -> Result<(), Self::Error>;

    /// Derive the reference unit from a known mass sitting on the tared platform.
    async fn calibrate(&mut self, known_mass: f32, times: usize) -> Result<(), Self::Error>;

    async fn get_weight(&mut self, times: usize) -> Result<f32, Self::Error>;
}
