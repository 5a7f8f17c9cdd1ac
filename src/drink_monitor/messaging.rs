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

use core::fmt::Write;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::pubsub::{PubSubChannel, Publisher, Subscriber};
use heapless::String;

pub const PAYLOAD_CAPACITY: usize = 128;

/// Fill level report produced once per tracking cycle. Both values are clamped at zero.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    pub water_left: f32,
    pub water_drank: f32,
}

impl Snapshot {
    pub const WATER_LEFT_KEY: &'static str = "water_left";
    pub const WATER_DRANK_KEY: &'static str = "water_drank";

    pub fn from_levels(initial_weight: f32, last_valid_weight: f32) -> Self {
        let water_left = f32::max(0.0, last_valid_weight);
        Self {
            water_left,
            water_drank: f32::max(0.0, initial_weight - water_left),
        }
    }

    pub fn fields(&self) -> [(&'static str, f32); 2] {
        [
            (Self::WATER_LEFT_KEY, self.water_left),
            (Self::WATER_DRANK_KEY, self.water_drank),
        ]
    }

    /// Key/value body handed to the remote data sink, e.g.
    /// `{"water_left":480.0,"water_drank":20.0}`
    pub fn to_payload(&self) -> Result<String<PAYLOAD_CAPACITY>, core::fmt::Error> {
        let mut payload = String::new();
        payload.write_char('{')?;
        for (index, (key, value)) in self.fields().iter().enumerate() {
            if index > 0 {
                payload.write_char(',')?;
            }
            write!(payload, "\"{}\":{:.1}", key, value)?;
        }
        payload.write_char('}')?;
        Ok(payload)
    }
}

const CHANNEL_DEPTH: usize = 4;
const CHANNEL_SUBS: usize = 1;
const CHANNEL_PUBS: usize = 1;

pub type SnapshotChannel =
    PubSubChannel<CriticalSectionRawMutex, Snapshot, CHANNEL_DEPTH, CHANNEL_SUBS, CHANNEL_PUBS>;
pub type SnapshotChannelSubscriber<'a> =
    Subscriber<'a, CriticalSectionRawMutex, Snapshot, CHANNEL_DEPTH, CHANNEL_SUBS, CHANNEL_PUBS>;
pub type SnapshotChannelPublisher<'a> =
    Publisher<'a, CriticalSectionRawMutex, Snapshot, CHANNEL_DEPTH, CHANNEL_SUBS, CHANNEL_PUBS>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_clamped_at_zero() {
        assert_eq!(
            Snapshot::from_levels(500.0, -12.0),
            Snapshot {
                water_left: 0.0,
                water_drank: 500.0
            }
        );
        // refilled above the starting level
        assert_eq!(
            Snapshot::from_levels(500.0, 650.0),
            Snapshot {
                water_left: 650.0,
                water_drank: 0.0
            }
        );
    }

    #[test]
    fn levels_add_up_to_initial_weight_without_clamping() {
        let snapshot = Snapshot::from_levels(500.0, 321.5);
        assert_eq!(snapshot.water_left + snapshot.water_drank, 500.0);
    }

    #[test]
    fn payload_lists_both_keys() {
        let snapshot = Snapshot::from_levels(500.0, 480.0);
        let payload = snapshot.to_payload().unwrap();
        assert_eq!(payload.as_str(), "{\"water_left\":480.0,\"water_drank\":20.0}");
    }

    #[test]
    fn payload_fits_extreme_values() {
        let snapshot = Snapshot {
            water_left: f32::MAX,
            water_drank: f32::MAX,
        };
        assert!(snapshot.to_payload().is_ok());
    }
}
