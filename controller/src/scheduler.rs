/// ----- SCHEDULER -----
/// Pure forwarding relay between the floor side and the elevator side.
/// Holds no per-floor or per-elevator state: events are routed on their
/// origin alone and forwarded unmodified. One relay instance runs per
/// direction of travel, each blocking on its own input buffer, so neither
/// side is ever busy-polled.

use std::sync::Arc;

use shared_resources::event::{Event, Origin};
use shared_resources::handoff_buffer::HandoffBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    FloorSide,
    ElevatorSide,
}

/// Events from the floor side go to the elevators and vice versa. An event
/// claiming to originate from the scheduler itself is a routing error.
pub fn route(event: &Event) -> Option<Destination> {
    match event.origin {
        Origin::Floor => Some(Destination::ElevatorSide),
        Origin::Elevator => Some(Destination::FloorSide),
        Origin::Scheduler => None,
    }
}

pub fn main(
    input: Arc<HandoffBuffer>,
    floor_side: Arc<HandoffBuffer>,
    elevator_side: Arc<HandoffBuffer>,
) {
    while let Some(event) = input.remove_first(Origin::Scheduler) {
        match route(&event) {
            Some(Destination::FloorSide) => {
                floor_side.add_last(event, Origin::Scheduler);
            }
            Some(Destination::ElevatorSide) => {
                elevator_side.add_last(event, Origin::Scheduler);
            }
            None => {
                log::warn!("scheduler saw an event with its own origin, dropping: {:?}", event);
            }
        }
    }
}
