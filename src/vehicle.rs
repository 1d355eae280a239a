use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::Sender;
use rand::Rng;

use crate::light::TrafficLight;

#[derive(Debug, Clone, Copy)]
pub enum VehicleEvent {
    Arrived,
    Crossed,
}

/// Drives in a loop: approach the intersection, wait for green, cross.
/// Exits once the light shuts down or the event channel disconnects.
pub fn main(light: Arc<TrafficLight>, event_tx: Sender<VehicleEvent>) {
    let mut rng = rand::rng();

    loop {
        thread::sleep(Duration::from_secs_f64(rng.random_range(0.5..2.0)));
        if event_tx.send(VehicleEvent::Arrived).is_err() {
            return;
        }
        if light.wait_for_green().is_err() {
            return;
        }
        if event_tx.send(VehicleEvent::Crossed).is_err() {
            return;
        }
    }
}
