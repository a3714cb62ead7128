/// ----- DISPATCH MODULE -----
/// Elevator-side actor. Consumes calls forwarded by the scheduler, keeps
/// the latest snapshot of every car, picks a car with the selector and
/// enqueues the call into that car's request queue. Assignment notices go
/// back through the buffer; snapshots are republished to the status
/// observers over the transport link.

use std::collections::BTreeMap;
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};

use shared_resources::direction::Direction;
use shared_resources::event::{Event, Origin, Payload};
use shared_resources::fault::ElevatorMonitor;
use shared_resources::handoff_buffer::HandoffBuffer;

use crate::elevator::ElevatorHandle;
use crate::selector;

pub fn main(
    buffer: Arc<HandoffBuffer>,
    handles: BTreeMap<u8, ElevatorHandle>,
    monitor_rx: Receiver<ElevatorMonitor>,
    snapshot_tx: Sender<ElevatorMonitor>,
) {
    let mut monitors: BTreeMap<u8, ElevatorMonitor> = BTreeMap::new();

    // Every elevator publishes a snapshot as soon as its thread starts.
    // The roster must be complete before the first call is assigned.
    while monitors.len() < handles.len() {
        match monitor_rx.recv() {
            Ok(snapshot) => {
                monitors.insert(snapshot.elevator, snapshot.clone());
                let _ = snapshot_tx.send(snapshot);
            }
            Err(_) => break,
        }
    }

    loop {
        let event = match buffer.remove_first(Origin::Elevator) {
            Some(event) => event,
            None => return,
        };
        drain_monitors(&mut monitors, &monitor_rx, &snapshot_tx);

        match event.payload {
            Payload::ElevatorCall {
                floor,
                direction,
                desired_floor,
            } => {
                assign_call(&buffer, &handles, &monitors, floor, direction, desired_floor);
            }
            other => {
                log::debug!("dispatch ignoring event: {:?}", other);
            }
        }
    }
}

fn drain_monitors(
    monitors: &mut BTreeMap<u8, ElevatorMonitor>,
    monitor_rx: &Receiver<ElevatorMonitor>,
    snapshot_tx: &Sender<ElevatorMonitor>,
) {
    while let Ok(snapshot) = monitor_rx.try_recv() {
        monitors.insert(snapshot.elevator, snapshot.clone());
        let _ = snapshot_tx.send(snapshot);
    }
}

fn assign_call(
    buffer: &Arc<HandoffBuffer>,
    handles: &BTreeMap<u8, ElevatorHandle>,
    monitors: &BTreeMap<u8, ElevatorMonitor>,
    floor: u8,
    direction: Direction,
    desired_floor: u8,
) {
    let number = match selector::choose_elevator(floor, direction, monitors, handles) {
        Some(number) => number,
        None => {
            log::warn!(
                "no elevator available for call at floor {}, request dropped",
                floor
            );
            return;
        }
    };

    let (Some(handle), Some(monitor)) = (handles.get(&number), monitors.get(&number)) else {
        log::warn!("no handle registered for elevator {}, request dropped", number);
        return;
    };
    // an idle car adopts the call's direction as its service direction
    let service_direction = if monitor.direction == Direction::Stop {
        direction
    } else {
        monitor.direction
    };

    let accepted = {
        let mut queue = handle.queue.0.lock();
        queue.add_call(
            monitor.current_floor,
            service_direction,
            floor,
            direction,
            desired_floor,
        )
    };
    match accepted {
        Ok(()) => {
            handle.queue.1.notify_all();
            log::info!("call at floor {} assigned to elevator {}", floor, number);
            buffer.add_last(
                Event::new(
                    Origin::Elevator,
                    Payload::FloorAssignment {
                        floor,
                        direction,
                        elevator: number,
                    },
                ),
                Origin::Elevator,
            );
        }
        Err(e) => {
            log::warn!("rejected call at floor {}: {}", floor, e);
        }
    }
}
