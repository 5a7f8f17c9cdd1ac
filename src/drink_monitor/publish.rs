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

use crate::drink_monitor::messaging::{Snapshot, SnapshotChannelPublisher};

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PublishError {
    /// Reporting side has not drained earlier snapshots
    ChannelFull,
}

/// Destination for the per-cycle snapshot. Delivery is best effort: the caller logs failures and
/// carries on, there is no retry.
pub trait PublishSink {
    type Error;

    async fn publish(&mut self, snapshot: &Snapshot) -> Result<(), Self::Error>;
}

/// Hands snapshots to whichever task talks to the remote data sink.
pub struct ChannelPublishSink<'a> {
    publisher: SnapshotChannelPublisher<'a>,
}

impl<'a> ChannelPublishSink<'a> {
    pub fn new(publisher: SnapshotChannelPublisher<'a>) -> Self {
        Self { publisher }
    }
}

impl PublishSink for ChannelPublishSink<'_> {
    type Error = PublishError;

    async fn publish(&mut self, snapshot: &Snapshot) -> Result<(), Self::Error> {
        self.publisher
            .try_publish(*snapshot)
            .map_err(|_| PublishError::ChannelFull)
    }
}
