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

//! Strain gauge that replays a queue of raw readings. Running dry reads as a timeout.

use crate::weight::interface::AsyncStrainGaugeInterface;
use core::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScriptedGaugeError {
    Timeout,
}

#[derive(Clone, Default)]
pub struct ScriptedGauge {
    readings: Rc<RefCell<VecDeque<Result<i32, ScriptedGaugeError>>>>,
}

impl ScriptedGauge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_raw(&self, raw: i32, times: usize) {
        let mut readings = self.readings.borrow_mut();
        readings.extend(core::iter::repeat(Ok(raw)).take(times));
    }

    pub fn push_timeout(&self) {
        self.readings
            .borrow_mut()
            .push_back(Err(ScriptedGaugeError::Timeout));
    }

    pub fn remaining(&self) -> usize {
        self.readings.borrow().len()
    }
}

impl AsyncStrainGaugeInterface for ScriptedGauge {
    type Error = ScriptedGaugeError;

    async fn initialize(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn is_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.readings.borrow().is_empty())
    }

    async fn read_raw(&mut self) -> Result<i32, Self::Error> {
        self.readings
            .borrow_mut()
            .pop_front()
            .unwrap_or(Err(ScriptedGaugeError::Timeout))
    }

    async fn power_down(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn power_up(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn get_adc_bit_count(&self) -> usize {
        24
    }
}
