use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::unbounded;

use traffic_light::config::Config;
use traffic_light::light::TrafficLight;
use traffic_light::status;
use traffic_light::vehicle;

fn main() {
    // READ CONFIGURATION
    let config = Config::get();

    // INITIALIZE CHANNELS
    let (event_tx, event_rx) = unbounded();

    // START TRAFFIC LIGHT
    let mut threads = Vec::new();
    let light = Arc::new(TrafficLight::new(config.light.clone()));
    light.start(&mut threads).expect("traffic light started twice");

    // SPAWN VEHICLE THREADS
    for _ in 0..config.sim.num_vehicles {
        let light = Arc::clone(&light);
        let event_tx = event_tx.clone();
        threads.push(thread::spawn(move || vehicle::main(light, event_tx)));
    }
    drop(event_tx);

    // INITIALIZE STATUS MODULE
    {
        let light = Arc::clone(&light);
        threads.push(thread::spawn(move || {
            if status::main(light, event_rx).is_err() {
                println!("status rendering stopped...");
            }
        }));
    }

    // RUN FOR THE CONFIGURED DURATION, THEN SHUT DOWN AND JOIN EVERYTHING
    thread::sleep(Duration::from_secs(config.sim.run_secs));
    light.shutdown();
    for handle in threads {
        handle.join().expect("worker thread panicked");
    }
}
