use std::time::SystemTime;

use crate::direction::Direction;
use crate::fault::{ElevatorMonitor, Fault};

/// Which actor produced an event. Used by the scheduler for routing and by
/// the handoff buffers for the turn-taking rule.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Floor,
    Elevator,
    Scheduler,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub enum Payload {
    /// Passenger call from a floor: pick up at `floor`, drop off at
    /// `desired_floor`.
    ElevatorCall {
        floor: u8,
        direction: Direction,
        desired_floor: u8,
    },
    /// Assignment notice sent back to the floor side.
    FloorAssignment {
        floor: u8,
        direction: Direction,
        elevator: u8,
    },
    /// Elevator nearing a floor; `may_stop` is set by the arrival sensor.
    Approach {
        elevator: u8,
        floor: u8,
        may_stop: bool,
    },
    Status(ElevatorMonitor),
    Fault {
        kind: Fault,
        elevator: u8,
    },
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Event {
    pub timestamp: SystemTime,
    pub origin: Origin,
    pub payload: Payload,
}

impl Event {
    pub fn new(origin: Origin, payload: Payload) -> Self {
        Event {
            timestamp: SystemTime::now(),
            origin,
            payload,
        }
    }
}
