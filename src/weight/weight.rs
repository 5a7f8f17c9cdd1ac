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

use crate::weight::interface::AsyncStrainGaugeInterface;
use crate::weight::WeighingSystem;
#[allow(unused_imports)]
use micromath::F32Ext;

#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<StrainGaugeE> {
    StrainGaugeReadingError(StrainGaugeE),
    InvalidReferenceUnit,
    InvalidCalibrationMass,
    /// Calibration reading was indistinguishable from the tare reading
    NoLoadAtCalibration,
}

/// Raw count baseline and conversion divisor for the load cell.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationState {
    pub reference_unit: f32,
    pub tare_offset: f32,
}

impl CalibrationState {
    pub fn weight_from_raw(&self, raw_average: f32) -> f32 {
        (raw_average - self.tare_offset) / self.reference_unit
    }

    /// Inverse of [`CalibrationState::weight_from_raw`]
    pub fn raw_from_weight(&self, weight: f32) -> f32 {
        weight * self.reference_unit + self.tare_offset
    }
}

impl Default for CalibrationState {
    fn default() -> Self {
        Self {
            reference_unit: 1.0,
            tare_offset: 0.0,
        }
    }
}

pub struct WeightScale<StrainGauge> {
    strain_gauge: StrainGauge,
    calibration: CalibrationState,
}

impl<StrainGauge, StrainGaugeE> WeightScale<StrainGauge>
where
    StrainGauge: AsyncStrainGaugeInterface<Error = StrainGaugeE>,
{
    pub async fn new(mut strain_gauge: StrainGauge) -> Result<Self, Error<StrainGaugeE>> {
        strain_gauge
            .initialize()
            .await
            .map_err(Error::StrainGaugeReadingError)?;
        Ok(Self {
            strain_gauge,
            calibration: CalibrationState::default(),
        })
    }

    pub fn calibration(&self) -> CalibrationState {
        self.calibration
    }

    async fn get_raw_average(&mut self, times: usize) -> Result<f32, Error<StrainGaugeE>> {
        self.strain_gauge
            .read_averaged(times)
            .await
            .map_err(Error::StrainGaugeReadingError)
    }
}

impl<StrainGauge, StrainGaugeE> WeighingSystem for WeightScale<StrainGauge>
where
    StrainGauge: AsyncStrainGaugeInterface<Error = StrainGaugeE>,
{
    type Error = Error<StrainGaugeE>;

    fn set_reference_unit(&mut self, reference_unit: f32) -> Result<(), Self::Error> {
        if !reference_unit.is_finite() || reference_unit == 0.0 {
            return Err(Error::InvalidReferenceUnit);
        }
        self.calibration.reference_unit = reference_unit;
        debug!("Reference unit = {}", reference_unit);
        Ok(())
    }

    async fn tare(&mut self, times: usize) -> Result<(), Self::Error> {
        self.calibration.tare_offset = self.get_raw_average(times).await?;
        debug!("Tare offset = {}", self.calibration.tare_offset);
        Ok(())
    }

    async fn calibrate(&mut self, known_mass: f32, times: usize) -> Result<(), Self::Error> {
        if !known_mass.is_finite() || known_mass <= 0.0 {
            return Err(Error::InvalidCalibrationMass);
        }

        let tared_mean_measurement = self.get_raw_average(times).await? - self.calibration.tare_offset;
        if tared_mean_measurement.abs() < f32::EPSILON {
            return Err(Error::NoLoadAtCalibration);
        }

        self.calibration.reference_unit = tared_mean_measurement / known_mass;
        debug!("Calibration counts per unit = {}", self.calibration.reference_unit);
        Ok(())
    }

    async fn get_weight(&mut self, times: usize) -> Result<f32, Self::Error> {
        let reading = self.get_raw_average(times).await?;
        trace!("Averaged reading = {}", reading);
        Ok(self.calibration.weight_from_raw(reading))
    }
}
