use crate::direction::Direction;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementState {
    Idle,
    Active,
    Stuck,
}

impl MovementState {
    pub fn as_string(self) -> String {
        match self {
            MovementState::Idle => String::from("idle"),
            MovementState::Active => String::from("active"),
            MovementState::Stuck => String::from("stuck"),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorState {
    Open,
    Closed,
    Stuck,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    None,
    DoorsStuck,
    DoorsInterrupted,
    ElevatorStuck,
    ArrivalSensorFail,
}

impl Fault {
    /// A terminal fault takes the elevator out of dispatch until external
    /// intervention. DoorsInterrupted only abandons one door cycle.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Fault::None | Fault::DoorsInterrupted)
    }

    pub fn as_string(self) -> String {
        match self {
            Fault::None => String::from("none"),
            Fault::DoorsStuck => String::from("doorsStuck"),
            Fault::DoorsInterrupted => String::from("doorsInterrupted"),
            Fault::ElevatorStuck => String::from("elevatorStuck"),
            Fault::ArrivalSensorFail => String::from("arrivalSensorFail"),
        }
    }
}

/// Read-only snapshot of one elevator, published by its own thread.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct ElevatorMonitor {
    pub elevator: u8,
    pub current_floor: u8,
    pub direction: Direction,
    pub movement: MovementState,
    pub door: DoorState,
    pub fault: Fault,
    pub queue_time_estimate: f64,
    pub has_no_pending_requests: bool,
}
