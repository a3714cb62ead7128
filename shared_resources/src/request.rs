use crate::direction::Direction;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceRequest {
    pub floor: u8,
    pub direction: Direction,
}

impl ServiceRequest {
    pub fn new(floor: u8, direction: Direction) -> Self {
        ServiceRequest { floor, direction }
    }
}
