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

#![no_std]
#![no_main]

use assign_resources::assign_resources;
use defmt::{error, info, warn, Debug2Format};
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals;
use embassy_sync::pubsub::PubSubChannel;
use embassy_time::{Delay, Duration, Ticker, Timer};
use thirstwatch::drink_monitor::messaging::{
    SnapshotChannel, SnapshotChannelPublisher, SnapshotChannelSubscriber,
};
use thirstwatch::{
    BottleMonitor, BottleTracker, ChannelPublishSink, Hx711Async, TrackerConfig, WeighingSystem,
    WeightScale,
};
#[allow(unused_imports)]
use {defmt_rtt as _, panic_probe as _};

static SNAPSHOT_CHANNEL: SnapshotChannel = PubSubChannel::new();

const TRACKER_CONFIG: TrackerConfig = TrackerConfig::new();

assign_resources! {
    strain_gauge_io: StrainGaugeResources {
        clk_pin: PIN_14,
        data_pin: PIN_15,
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    let resources = split_resources! {p};

    if let Err(e) = TRACKER_CONFIG.validate() {
        defmt::panic!("Invalid tracker configuration: {}", e);
    }

    warn!("Launching bottle monitor");

    spawner
        .spawn(reporting_task(SNAPSHOT_CHANNEL.subscriber().unwrap()))
        .unwrap();
    spawner
        .spawn(monitoring_task(
            resources.strain_gauge_io,
            SNAPSHOT_CHANNEL.publisher().unwrap(),
            TRACKER_CONFIG,
        ))
        .unwrap();
}

#[embassy_executor::task]
async fn monitoring_task(
    strain_gauge_resources: StrainGaugeResources,
    snapshot_publisher: SnapshotChannelPublisher<'static>,
    config: TrackerConfig,
) {
    let clk_pin_out = Output::new(strain_gauge_resources.clk_pin, Level::Low);
    let data_pin = Input::new(strain_gauge_resources.data_pin, Pull::Up);
    let strain_gauge = Hx711Async::new(clk_pin_out, data_pin, Delay, config.ready_timeout_us);

    let mut weight_scale = match WeightScale::new(strain_gauge).await {
        Ok(scale) => scale,
        Err(e) => defmt::panic!("Strain gauge initialisation failed: {}", Debug2Format(&e)),
    };
    if let Err(e) = weight_scale.set_reference_unit(config.reference_unit) {
        defmt::panic!("Reference unit rejected: {}", Debug2Format(&e));
    }

    info!("Taring... make sure only the platform is on the sensor.");
    if let Err(e) = weight_scale.tare(config.tare_readings).await {
        defmt::panic!("Tare failed: {}", Debug2Format(&e));
    }
    info!("Tare complete.");
    Timer::after(Duration::from_millis(config.tare_settle_ms)).await;

    let tracker = loop {
        info!("Place full bottle on the platform...");
        Timer::after(Duration::from_millis(config.bottle_placement_ms)).await;

        match BottleTracker::capture_initial_weight(weight_scale, &config).await {
            Ok(tracker) => break tracker,
            Err(failure) => {
                error!("Unable to capture bottle weight: {}", Debug2Format(&failure.error));
                weight_scale = failure.weighing_system;
            }
        }
    };

    let mut monitor = BottleMonitor::new(tracker, ChannelPublishSink::new(snapshot_publisher));
    let mut cycle_ticker = Ticker::every(Duration::from_millis(config.cycle_period_ms));
    loop {
        monitor.run_cycle().await;
        cycle_ticker.next().await;
    }
}

/// Stands in for the remote data sink: renders each snapshot as the key/value body the sink
/// expects and logs it.
#[embassy_executor::task]
async fn reporting_task(mut snapshot_subscriber: SnapshotChannelSubscriber<'static>) {
    loop {
        let snapshot = snapshot_subscriber.next_message_pure().await;
        match snapshot.to_payload() {
            Ok(payload) => info!("Publishing {}", payload.as_str()),
            Err(_) => warn!("Snapshot payload did not fit the buffer"),
        }
    }
}
