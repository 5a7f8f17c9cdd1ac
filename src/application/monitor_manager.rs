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

use crate::drink_monitor::bottle_tracking::BottleTracker;
use crate::drink_monitor::messaging::Snapshot;
use crate::drink_monitor::publish::PublishSink;
use crate::weight::WeighingSystem;

/// Acts as a bridge between the bottle tracker and wherever the snapshots are published
pub struct BottleMonitor<WS, S> {
    tracker: BottleTracker<WS>,
    sink: S,
}

impl<WS, S> BottleMonitor<WS, S>
where
    WS: WeighingSystem,
    S: PublishSink,
{
    pub fn new(tracker: BottleTracker<WS>, sink: S) -> Self {
        Self { tracker, sink }
    }

    pub fn tracker(&self) -> &BottleTracker<WS> {
        &self.tracker
    }

    /// Step the tracker once and publish the result. The caller owns the cadence.
    pub async fn run_cycle(&mut self) -> Snapshot {
        let snapshot = self.tracker.step().await;
        info!(
            "Water left: {} ml, water drank: {} ml",
            snapshot.water_left, snapshot.water_drank
        );

        if self.sink.publish(&snapshot).await.is_err() {
            warn!("Snapshot not published, next cycle will try again");
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackerConfig;
    use crate::weight::interface::scripted::ScriptedGauge;
    use crate::weight::weight::WeightScale;
    use embassy_futures::block_on;

    #[derive(Default)]
    struct RecordingSink {
        published: Vec<Snapshot>,
        fail_next: bool,
    }

    impl PublishSink for RecordingSink {
        type Error = ();

        async fn publish(&mut self, snapshot: &Snapshot) -> Result<(), Self::Error> {
            if core::mem::take(&mut self.fail_next) {
                return Err(());
            }
            self.published.push(*snapshot);
            Ok(())
        }
    }

    fn monitor(gauge: &ScriptedGauge) -> BottleMonitor<WeightScale<ScriptedGauge>, RecordingSink> {
        let config = TrackerConfig::new()
            .with_reference_unit(2.0)
            .with_grace_period(2);
        let mut scale = block_on(WeightScale::new(gauge.clone())).unwrap();
        scale.set_reference_unit(config.reference_unit).unwrap();
        gauge.push_raw(1000, config.capture_readings);
        let tracker = match block_on(BottleTracker::capture_initial_weight(scale, &config)) {
            Ok(tracker) => tracker,
            Err(failure) => panic!("capture failed: {:?}", failure.error),
        };
        BottleMonitor::new(tracker, RecordingSink::default())
    }

    #[test]
    fn each_cycle_publishes_its_snapshot() {
        let gauge = ScriptedGauge::new();
        let mut monitor = monitor(&gauge);
        assert_eq!(monitor.tracker().initial_weight(), 500.0);

        gauge.push_raw(900, 5);
        let first = block_on(monitor.run_cycle());
        gauge.push_raw(100, 5);
        let second = block_on(monitor.run_cycle());

        assert_eq!(first, Snapshot::from_levels(500.0, 450.0));
        assert_eq!(second, first);
        assert_eq!(monitor.sink.published, vec![first, second]);
    }

    #[test]
    fn publish_failure_leaves_tracking_untouched() {
        let gauge = ScriptedGauge::new();
        let mut monitor = monitor(&gauge);

        gauge.push_raw(100, 5);
        monitor.sink.fail_next = true;
        let snapshot = block_on(monitor.run_cycle());
        assert!(monitor.sink.published.is_empty());
        assert_eq!(snapshot.water_left, 500.0);
        assert_eq!(monitor.tracker().presence().grace_counter(), 1);

        gauge.push_raw(100, 5);
        block_on(monitor.run_cycle());
        assert!(!monitor.tracker().presence().bottle_present());
        assert_eq!(monitor.sink.published.len(), 1);
    }
}
