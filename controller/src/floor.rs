/// ----- FLOOR MODULE -----
/// Floor-side actor. A feed thread replays the parsed request records in
/// order, pacing on each record's inter-arrival delay: passenger calls go
/// into the floor-side buffer, disturbance records are injected straight
/// onto the targeted elevator's channel. The main loop consumes the
/// scheduler's answers and logs them for the building side.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::Sender;

use shared_resources::event::{Event, Origin, Payload};
use shared_resources::handoff_buffer::HandoffBuffer;

use crate::elevator::Disruption;
use crate::inputs::InputRecord;

pub fn init(
    records: Vec<InputRecord>,
    buffer: Arc<HandoffBuffer>,
    disruption_txs: BTreeMap<u8, Sender<Disruption>>,
) -> thread::JoinHandle<()> {
    thread::Builder::new()
        .name("floor_feed".to_string())
        .spawn(move || feed(records, buffer, disruption_txs))
        .unwrap()
}

fn feed(
    records: Vec<InputRecord>,
    buffer: Arc<HandoffBuffer>,
    disruption_txs: BTreeMap<u8, Sender<Disruption>>,
) {
    for record in records {
        match record {
            InputRecord::Call {
                delay,
                floor,
                direction,
                desired_floor,
            } => {
                thread::sleep(Duration::from_secs_f64(delay));
                log::info!(
                    "passenger at floor {} going {:?} towards floor {}",
                    floor,
                    direction,
                    desired_floor
                );
                buffer.add_last(
                    Event::new(
                        Origin::Floor,
                        Payload::ElevatorCall {
                            floor,
                            direction,
                            desired_floor,
                        },
                    ),
                    Origin::Floor,
                );
            }
            InputRecord::Fault {
                delay,
                elevator,
                disruption,
            } => {
                thread::sleep(Duration::from_secs_f64(delay));
                match disruption_txs.get(&elevator) {
                    Some(tx) => {
                        log::info!("injecting {:?} into elevator {}", disruption, elevator);
                        // the car may already have failed and hung up
                        let _ = tx.send(disruption);
                    }
                    None => {
                        log::warn!("fault record names unknown elevator {}", elevator);
                    }
                }
            }
        }
    }
    log::info!("request feed exhausted");
}

pub fn main(buffer: Arc<HandoffBuffer>) {
    while let Some(event) = buffer.remove_first(Origin::Floor) {
        match event.payload {
            Payload::FloorAssignment {
                floor,
                direction,
                elevator,
            } => {
                log::info!(
                    "floor {} ({:?}) will be served by elevator {}",
                    floor,
                    direction,
                    elevator
                );
            }
            Payload::Approach {
                elevator,
                floor,
                may_stop,
            } => {
                log::debug!(
                    "elevator {} approaching floor {}{}",
                    elevator,
                    floor,
                    if may_stop { ", stopping" } else { "" }
                );
            }
            Payload::Status(monitor) => {
                log::debug!(
                    "elevator {} at floor {}: {:?}/{:?}",
                    monitor.elevator,
                    monitor.current_floor,
                    monitor.movement,
                    monitor.door
                );
            }
            Payload::Fault { kind, elevator } => {
                log::error!("elevator {} reported fault: {}", elevator, kind.as_string());
            }
            other => {
                log::debug!("floor side ignoring event: {:?}", other);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use crossbeam_channel::unbounded;

    use super::*;
    use shared_resources::direction::Direction;

    #[test]
    fn feed_replays_calls_into_the_buffer() {
        let buffer = Arc::new(HandoffBuffer::new());
        let records = vec![
            InputRecord::Call { delay: 0.0, floor: 2, direction: Direction::Up, desired_floor: 4 },
            InputRecord::Call { delay: 0.0, floor: 6, direction: Direction::Down, desired_floor: 1 },
        ];

        let feed = init(records, buffer.clone(), BTreeMap::new());
        feed.join().unwrap();

        match buffer.remove_first(Origin::Scheduler).unwrap().payload {
            Payload::ElevatorCall { floor, .. } => assert_eq!(floor, 2),
            other => panic!("unexpected payload: {:?}", other),
        }
        match buffer.remove_first(Origin::Scheduler).unwrap().payload {
            Payload::ElevatorCall { floor, .. } => assert_eq!(floor, 6),
            other => panic!("unexpected payload: {:?}", other),
        }
        assert!(buffer.is_empty());
    }

    #[test]
    fn feed_paces_on_the_record_delay() {
        let buffer = Arc::new(HandoffBuffer::new());
        let records = vec![InputRecord::Call {
            delay: 0.2,
            floor: 2,
            direction: Direction::Up,
            desired_floor: 4,
        }];

        let start = Instant::now();
        init(records, buffer.clone(), BTreeMap::new()).join().unwrap();
        assert!(start.elapsed() >= Duration::from_millis(200));
    }

    #[test]
    fn fault_records_reach_the_targeted_elevator() {
        let buffer = Arc::new(HandoffBuffer::new());
        let (tx, rx) = unbounded();
        let mut txs = BTreeMap::new();
        txs.insert(1, tx);

        let records = vec![
            InputRecord::Fault { delay: 0.0, elevator: 1, disruption: Disruption::Interrupt },
            InputRecord::Fault { delay: 0.0, elevator: 9, disruption: Disruption::Interrupt },
        ];
        init(records, buffer.clone(), txs).join().unwrap();

        assert_eq!(rx.try_recv().unwrap(), Disruption::Interrupt);
        assert!(rx.try_recv().is_err());
        assert!(buffer.is_empty());
    }
}
