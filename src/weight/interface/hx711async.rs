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

//! Bit-banged HX711 driver.
//!
//! Timing is a platform constraint: PD_SCK must not stay high for more than ~50us during a
//! transfer or the device powers down, so the delay provider must not overshoot
//! [`CLK_HALF_PERIOD_US`] by much.

use crate::weight::interface::AsyncStrainGaugeInterface;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;

const POWER_MODE_CHANGE_DELAY_US: u32 = 60;
pub const CLK_HALF_PERIOD_US: u32 = 1;
const READY_POLL_INTERVAL_US: u32 = 1000;
const VALID_DATA_BITS: usize = 24;
const DATA_MASK: u32 = (1 << VALID_DATA_BITS) - 1;
const SIGN_BIT: u32 = 1 << (VALID_DATA_BITS - 1);

#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<OutPinE, InPinE> {
    OutPin(OutPinE),
    InPin(InPinE),
    /// DOUT never went low within the ready timeout
    Timeout,
}

/// Two's complement sign extension of a 24 bit sample. Bits above 23 in `raw` are ignored.
pub fn sign_extend(raw: u32) -> i32 {
    let data = raw & DATA_MASK;
    if data & SIGN_BIT != 0 {
        (data | !DATA_MASK) as i32
    } else {
        data as i32
    }
}

pub struct Hx711Async<CLK, DATA, D> {
    clock_pin: CLK,
    data_pin: DATA,
    delay: D,
    ready_timeout_us: u32,
    powered_up: bool,
}

impl<CLK, DATA, D, ClkE, DataE> Hx711Async<CLK, DATA, D>
where
    CLK: OutputPin<Error = ClkE>,
    DATA: InputPin<Error = DataE>,
    D: DelayNs,
{
    pub fn new(clock_pin: CLK, data_pin: DATA, delay: D, ready_timeout_us: u32) -> Self {
        Self {
            clock_pin,
            data_pin,
            delay,
            ready_timeout_us,
            powered_up: false,
        }
    }

    async fn wait_until_ready(&mut self) -> Result<(), Error<ClkE, DataE>> {
        let mut waited_us: u32 = 0;
        while !self.is_ready()? {
            if waited_us >= self.ready_timeout_us {
                warn!("HX711 not ready after {} us", waited_us);
                return Err(Error::Timeout);
            }
            self.delay.delay_us(READY_POLL_INTERVAL_US).await;
            waited_us = waited_us.saturating_add(READY_POLL_INTERVAL_US);
        }
        Ok(())
    }

    async fn pulse_clock(&mut self) -> Result<(), Error<ClkE, DataE>> {
        self.clock_pin.set_high().map_err(Error::OutPin)?;
        self.delay.delay_us(CLK_HALF_PERIOD_US).await;
        self.clock_pin.set_low().map_err(Error::OutPin)?;
        self.delay.delay_us(CLK_HALF_PERIOD_US).await;
        Ok(())
    }
}

impl<CLK, DATA, D, ClkE, DataE> AsyncStrainGaugeInterface for Hx711Async<CLK, DATA, D>
where
    CLK: OutputPin<Error = ClkE>,
    DATA: InputPin<Error = DataE>,
    D: DelayNs,
{
    type Error = Error<ClkE, DataE>;

    async fn initialize(&mut self) -> Result<(), Self::Error> {
        self.power_up().await
    }

    fn is_ready(&mut self) -> Result<bool, Self::Error> {
        // DOUT goes low when conversion is ready
        self.data_pin.is_low().map_err(Error::InPin)
    }

    async fn read_raw(&mut self) -> Result<i32, Self::Error> {
        if !self.powered_up {
            self.power_up().await?;
        }

        self.wait_until_ready().await?;

        let mut data: u32 = 0;
        for _ in 0..VALID_DATA_BITS {
            self.clock_pin.set_high().map_err(Error::OutPin)?;
            data <<= 1;
            self.delay.delay_us(CLK_HALF_PERIOD_US).await;
            self.clock_pin.set_low().map_err(Error::OutPin)?;
            if self.data_pin.is_high().map_err(Error::InPin)? {
                data |= 0x1;
            }
            self.delay.delay_us(CLK_HALF_PERIOD_US).await;
        }

        // 25th pulse ends the transfer and keeps channel A at gain 128 for the next conversion
        self.pulse_clock().await?;

        let reading = sign_extend(data);
        trace!("HX711 raw = {}", reading);
        Ok(reading)
    }

    async fn power_down(&mut self) -> Result<(), Self::Error> {
        self.clock_pin.set_high().map_err(Error::OutPin)?;
        self.delay.delay_us(POWER_MODE_CHANGE_DELAY_US).await;
        self.powered_up = false;
        Ok(())
    }

    async fn power_up(&mut self) -> Result<(), Self::Error> {
        self.clock_pin.set_low().map_err(Error::OutPin)?;
        self.delay.delay_us(POWER_MODE_CHANGE_DELAY_US).await;
        self.powered_up = true;
        Ok(())
    }

    fn get_adc_bit_count(&self) -> usize {
        VALID_DATA_BITS
    }
}
