use std::sync::Arc;

use crossbeam_channel::Sender;
use parking_lot::{Condvar, Mutex};

use shared_resources::config::SystemConfig;
use shared_resources::direction::Direction;
use shared_resources::fault::{DoorState, ElevatorMonitor, Fault, MovementState};

use crate::request_queue::RequestQueue;

/// The request queue is shared between the owning elevator thread and the
/// dispatch actor; the condvar wakes the elevator when new stops arrive.
pub type SharedQueue = Arc<(Mutex<RequestQueue>, Condvar)>;

pub fn shared_queue(config: &SystemConfig) -> SharedQueue {
    Arc::new((Mutex::new(RequestQueue::new(config)), Condvar::new()))
}

/// Externally injected disturbances, delivered on the elevator's own
/// channel. Interrupt maps to a cooperative thread interrupt: mid-travel
/// it strands the car, during a door wait it only abandons the door cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disruption {
    DoorMalfunction,
    SensorFailure,
    Interrupt,
}

impl Disruption {
    pub fn from_string(s: &str) -> Option<Disruption> {
        match s {
            "doors" => Some(Disruption::DoorMalfunction),
            "sensor" => Some(Disruption::SensorFailure),
            "interrupt" => Some(Disruption::Interrupt),
            _ => None,
        }
    }
}

/// One physical car, owned by its state-machine thread.
pub struct Elevator {
    pub number: u8,
    pub current_floor: u8,
    pub direction: Direction,
    pub movement: MovementState,
    pub door: DoorState,
    pub fault: Fault,
    pub config: SystemConfig,
}

impl Elevator {
    pub fn new(number: u8, config: SystemConfig) -> Self {
        Elevator {
            number,
            current_floor: 1,
            direction: Direction::Stop,
            movement: MovementState::Idle,
            door: DoorState::Open,
            fault: Fault::None,
            config,
        }
    }

    pub fn monitor(&self, queue_time_estimate: f64, has_no_pending_requests: bool) -> ElevatorMonitor {
        ElevatorMonitor {
            elevator: self.number,
            current_floor: self.current_floor,
            direction: self.direction,
            movement: self.movement,
            door: self.door,
            fault: self.fault,
            queue_time_estimate,
            has_no_pending_requests,
        }
    }
}

/// Dispatch-side handle to one elevator.
pub struct ElevatorHandle {
    pub number: u8,
    pub queue: SharedQueue,
    pub disruption_tx: Sender<Disruption>,
}
