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

//! Pin level model of an HX711 for exercising the driver on the host.
//!
//! DOUT is low while a conversion is queued. Each rising PD_SCK edge shifts the next bit (MSB
//! first) onto DOUT; the 25th rising edge ends the transfer.

use core::convert::Infallible;
use core::cell::{Cell, RefCell};
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;
use std::collections::VecDeque;
use std::rc::Rc;

const PULSES_PER_TRANSFER: usize = 25;

#[derive(Default)]
struct SimState {
    samples: VecDeque<u32>,
    shifting: Option<u32>,
    pulses: usize,
    clock_high: bool,
    total_pulses: usize,
    completed_transfers: usize,
}

#[derive(Clone, Default)]
pub struct SimulatedHx711 {
    state: Rc<RefCell<SimState>>,
}

impl SimulatedHx711 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pins(&self) -> (SimClock, SimData) {
        (
            SimClock {
                state: self.state.clone(),
            },
            SimData {
                state: self.state.clone(),
            },
        )
    }

    /// Queue 24 bit conversions. Bits above 23 are dropped.
    pub fn push_samples(&self, samples: &[u32]) {
        let mut state = self.state.borrow_mut();
        state
            .samples
            .extend(samples.iter().map(|sample| sample & 0xFF_FFFF));
    }

    pub fn clock_is_high(&self) -> bool {
        self.state.borrow().clock_high
    }

    pub fn total_pulses(&self) -> usize {
        self.state.borrow().total_pulses
    }

    pub fn completed_transfers(&self) -> usize {
        self.state.borrow().completed_transfers
    }
}

pub struct SimClock {
    state: Rc<RefCell<SimState>>,
}

pub struct SimData {
    state: Rc<RefCell<SimState>>,
}

impl ErrorType for SimClock {
    type Error = Infallible;
}

impl OutputPin for SimClock {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.state.borrow_mut().clock_high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        if state.clock_high {
            return Ok(());
        }
        state.clock_high = true;
        state.total_pulses += 1;

        if state.shifting.is_some() {
            state.pulses += 1;
            if state.pulses == PULSES_PER_TRANSFER {
                state.shifting = None;
                state.pulses = 0;
                state.completed_transfers += 1;
            }
        } else if let Some(sample) = state.samples.pop_front() {
            state.shifting = Some(sample);
            state.pulses = 1;
        }
        Ok(())
    }
}

impl ErrorType for SimData {
    type Error = Infallible;
}

impl InputPin for SimData {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let state = self.state.borrow();
        let level = match state.shifting {
            Some(sample) => (sample >> (24 - state.pulses)) & 0x1 == 0x1,
            None => state.samples.is_empty(),
        };
        Ok(level)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

/// Delay that returns immediately and only keeps count of the time asked for.
#[derive(Clone, Default)]
pub struct NoopDelay {
    elapsed_ns: Rc<Cell<u64>>,
}

impl NoopDelay {
    pub fn elapsed_us(&self) -> u64 {
        self.elapsed_ns.get() / 1000
    }
}

impl DelayNs for NoopDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns.set(self.elapsed_ns.get() + u64::from(ns));
    }
}
