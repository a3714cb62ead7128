use std::collections::BTreeMap;
use std::process;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::unbounded;

use shared_resources::config::ControllerConfig;
use shared_resources::handoff_buffer::HandoffBuffer;

use controller::dispatch;
use controller::elevator::{shared_queue, ElevatorHandle};
use controller::floor;
use controller::inputs;
use controller::scheduler;
use controller::state_machine;

fn main() {
    env_logger::init();

    // READ CONFIGURATION
    let config = ControllerConfig::get();

    // READ REQUEST FEED
    let records = match inputs::read_request_file(&config.input.requests_path) {
        Ok(records) => records,
        Err(e) => {
            log::error!("{}", e);
            process::exit(1);
        }
    };

    // INITIALIZE HANDOFF BUFFERS
    let floor_buffer = Arc::new(HandoffBuffer::new());
    let elevator_buffer = Arc::new(HandoffBuffer::new());

    // INITIALIZE SCHEDULER RELAYS, ONE PER DIRECTION OF TRAVEL
    for input in [floor_buffer.clone(), elevator_buffer.clone()] {
        let floor_side = floor_buffer.clone();
        let elevator_side = elevator_buffer.clone();
        thread::spawn(move || scheduler::main(input, floor_side, elevator_side));
    }

    // INITIALIZE CHANNELS
    let (monitor_tx, monitor_rx) = unbounded();
    let (snapshot_tx, snapshot_rx) = unbounded();

    // INITIALIZE ELEVATOR THREADS
    let mut handles = BTreeMap::new();
    let mut disruption_txs = BTreeMap::new();
    for number in 1..=config.system.num_elevators {
        let queue = shared_queue(&config.system);
        let (disruption_tx, disruption_rx) = unbounded();
        let (sensor_query_tx, sensor_query_rx) = unbounded();

        let num_floors = config.system.num_floors;
        thread::spawn(move || state_machine::arrival_sensor(num_floors, sensor_query_rx));
        {
            let system = config.system;
            let queue = queue.clone();
            let outbound = elevator_buffer.clone();
            let monitor_tx = monitor_tx.clone();
            thread::spawn(move || state_machine::main(
                number,
                system,
                queue,
                disruption_rx,
                sensor_query_tx,
                outbound,
                monitor_tx,
            ));
        }

        disruption_txs.insert(number, disruption_tx.clone());
        handles.insert(number, ElevatorHandle {
            number,
            queue,
            disruption_tx,
        });
    }
    drop(monitor_tx);

    // INITIALIZE STATUS BROADCAST THREAD
    {
        let monitor_port = config.network.monitor_port;
        thread::spawn(move || {
            if let Err(e) = transport::udpnet::bcast::tx(monitor_port, snapshot_rx, true) {
                log::error!("status broadcast stopped: {}", e);
            }
        });
    }

    // INITIALIZE DISPATCH THREAD
    {
        let elevator_buffer = elevator_buffer.clone();
        thread::spawn(move || dispatch::main(elevator_buffer, handles, monitor_rx, snapshot_tx));
    }

    // INITIALIZE FLOOR FEED AND RUN THE FLOOR SIDE
    floor::init(records, floor_buffer.clone(), disruption_txs);
    floor::main(floor_buffer);
}
