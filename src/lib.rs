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

//! Bottle monitoring core: HX711 acquisition, load cell calibration and the bottle presence
//! tracker that turns noisy weight readings into "water left / water drank" figures.
//!
//! The firmware binary (`firmware` feature) wires these onto an RP2040 with embassy. Everything
//! in here is `no_std` and runs on the host for tests.

#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

// Must come first so the other modules see its macros.
mod fmt;

pub mod application;
pub mod config;
pub mod drink_monitor;
pub mod weight;

pub use application::monitor_manager::BottleMonitor;
pub use config::{ConfigError, TrackerConfig};
pub use drink_monitor::bottle_tracking::{BottleTracker, PresenceState, PresenceTransition};
pub use drink_monitor::messaging::Snapshot;
pub use drink_monitor::publish::{ChannelPublishSink, PublishError, PublishSink};
pub use weight::interface::hx711async::Hx711Async;
pub use weight::interface::AsyncStrainGaugeInterface;
pub use weight::weight::{CalibrationState, WeightScale};
pub use weight::WeighingSystem;
