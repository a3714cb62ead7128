/// ----- REQUEST QUEUE -----
/// Per-elevator store of pending stops with SCAN semantics. Stops ahead of
/// the elevator in its serving direction are drained in floor order;
/// already-passed stops wait in the missed set for the next sweep;
/// opposite-direction stops wait for a reversal.

use std::collections::BTreeSet;
use std::fmt;

use shared_resources::config::SystemConfig;
use shared_resources::direction::Direction;
use shared_resources::request::ServiceRequest;

#[derive(Debug, PartialEq, Eq)]
pub enum RequestError {
    InvalidFloor(u8),
    InvalidDirection,
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::InvalidFloor(floor) => write!(f, "invalid floor number {}", floor),
            RequestError::InvalidDirection => write!(f, "direction must be up or down"),
        }
    }
}

impl std::error::Error for RequestError {}

#[derive(Debug, Clone)]
pub struct RequestQueue {
    serving: Direction,
    current: BTreeSet<u8>,
    opposite: BTreeSet<u8>,
    missed: BTreeSet<u8>,
    num_floors: u8,
    travel_time: f64,
    load_time: f64,
}

impl RequestQueue {
    pub fn new(config: &SystemConfig) -> Self {
        RequestQueue {
            serving: Direction::Up,
            current: BTreeSet::new(),
            opposite: BTreeSet::new(),
            missed: BTreeSet::new(),
            num_floors: config.num_floors,
            travel_time: config.travel_time,
            load_time: config.load_time,
        }
    }

    pub fn serving_direction(&self) -> Direction {
        self.serving
    }

    /// Classifies `request` relative to the elevator's anchor floor and
    /// service direction and files it into one of the three sets.
    pub fn add_request(
        &mut self,
        anchor_floor: u8,
        service_direction: Direction,
        request: ServiceRequest,
    ) -> Result<(), RequestError> {
        self.check_floor(anchor_floor)?;
        self.check_floor(request.floor)?;
        if service_direction == Direction::Stop || request.direction == Direction::Stop {
            return Err(RequestError::InvalidDirection);
        }

        self.serving = service_direction;
        if request.direction == service_direction {
            if request.floor == anchor_floor || ahead(service_direction, anchor_floor, request.floor)
            {
                self.current.insert(request.floor);
            } else {
                self.missed.insert(request.floor);
            }
        } else {
            self.opposite.insert(request.floor);
        }
        Ok(())
    }

    /// A passenger call carries both a pickup and a destination floor; both
    /// become stops so the elevator visits the call floor, then the
    /// destination.
    pub fn add_call(
        &mut self,
        anchor_floor: u8,
        service_direction: Direction,
        floor: u8,
        direction: Direction,
        desired_floor: u8,
    ) -> Result<(), RequestError> {
        self.check_floor(desired_floor)?;
        self.add_request(anchor_floor, service_direction, ServiceRequest::new(floor, direction))?;
        if desired_floor != floor {
            let travel = Direction::towards(floor, desired_floor);
            self.add_request(
                anchor_floor,
                service_direction,
                ServiceRequest::new(desired_floor, travel),
            )?;
        }
        Ok(())
    }

    /// Pops the next stop of the current sweep, in ascending order while
    /// serving Up and descending while serving Down. Never looks at the
    /// other two sets.
    pub fn remove_request(&mut self) -> Option<u8> {
        match self.serving {
            Direction::Up => self.current.pop_first(),
            _ => self.current.pop_last(),
        }
    }

    pub fn peek_next_request(&self) -> Option<u8> {
        let head = match self.serving {
            Direction::Up => self.current.first().copied(),
            _ => self.current.last().copied(),
        };
        if head.is_none() {
            log::warn!("peek_next_request called on an empty current queue");
        }
        head
    }

    /// Only acts once the current sweep is exhausted: missed stops are
    /// folded back into the current queue first, and only if that leaves
    /// nothing to do is the opposite queue swapped in, reversing the
    /// serving direction. Returns true iff the direction reversed.
    pub fn swap_queues(&mut self) -> bool {
        if !self.current.is_empty() {
            return false;
        }
        self.current = std::mem::take(&mut self.missed);
        if !self.current.is_empty() {
            return false;
        }
        if self.opposite.is_empty() {
            return false;
        }
        std::mem::swap(&mut self.current, &mut self.opposite);
        self.serving = self.serving.opposite();
        true
    }

    /// Rough time to clear everything pending, walking the stops in the
    /// order a full scan would visit them. Used only for elevator ranking.
    pub fn get_expected_time(&self, anchor_floor: u8) -> f64 {
        let mut total = 0.0;
        let mut prev = anchor_floor;

        let mut visit = |floor: u8| {
            total += self.load_time + self.travel_time(prev, floor);
            prev = floor;
        };

        match self.serving {
            Direction::Up => {
                self.current.iter().for_each(|&f| visit(f));
                self.opposite.iter().rev().for_each(|&f| visit(f));
                self.missed.iter().for_each(|&f| visit(f));
            }
            _ => {
                self.current.iter().rev().for_each(|&f| visit(f));
                self.opposite.iter().for_each(|&f| visit(f));
                self.missed.iter().rev().for_each(|&f| visit(f));
            }
        }
        total
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty() && self.opposite.is_empty() && self.missed.is_empty()
    }

    /// Drops every pending stop. Used when a fault makes the elevator
    /// non-dispatchable.
    pub fn clear(&mut self) {
        self.current.clear();
        self.opposite.clear();
        self.missed.clear();
    }

    fn travel_time(&self, from: u8, to: u8) -> f64 {
        (i16::from(to) - i16::from(from)).unsigned_abs() as f64 * self.travel_time
    }

    fn check_floor(&self, floor: u8) -> Result<(), RequestError> {
        if floor == 0 || floor > self.num_floors {
            return Err(RequestError::InvalidFloor(floor));
        }
        Ok(())
    }
}

fn ahead(direction: Direction, anchor: u8, floor: u8) -> bool {
    match direction {
        Direction::Up => floor > anchor,
        _ => floor < anchor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SystemConfig {
        SystemConfig {
            num_floors: 10,
            num_elevators: 1,
            travel_time: 1.0,
            load_time: 2.0,
        }
    }

    fn queue() -> RequestQueue {
        RequestQueue::new(&test_config())
    }

    #[test]
    fn drains_current_sweep_in_ascending_order() {
        let mut q = queue();
        q.add_request(1, Direction::Up, ServiceRequest::new(3, Direction::Up)).unwrap();
        q.add_request(1, Direction::Up, ServiceRequest::new(2, Direction::Up)).unwrap();

        assert_eq!(q.remove_request(), Some(2));
        assert_eq!(q.remove_request(), Some(3));
        assert_eq!(q.remove_request(), None);
    }

    #[test]
    fn passed_stops_land_in_missed() {
        let mut q = queue();
        q.add_request(5, Direction::Up, ServiceRequest::new(3, Direction::Up)).unwrap();

        // Not reachable this sweep.
        assert_eq!(q.remove_request(), None);
        assert!(!q.swap_queues()); // missed refill, no reversal
        assert_eq!(q.remove_request(), Some(3));
        assert!(q.is_empty());
    }

    #[test]
    fn opposite_direction_waits_for_reversal() {
        let mut q = queue();
        q.add_request(1, Direction::Up, ServiceRequest::new(7, Direction::Down)).unwrap();
        q.add_request(1, Direction::Up, ServiceRequest::new(5, Direction::Down)).unwrap();

        assert_eq!(q.remove_request(), None);
        assert!(q.swap_queues());
        assert_eq!(q.serving_direction(), Direction::Down);
        assert_eq!(q.remove_request(), Some(7));
        assert_eq!(q.remove_request(), Some(5));
    }

    #[test]
    fn swap_refuses_while_current_nonempty() {
        let mut q = queue();
        q.add_request(1, Direction::Up, ServiceRequest::new(4, Direction::Up)).unwrap();
        q.add_request(1, Direction::Up, ServiceRequest::new(6, Direction::Down)).unwrap();

        assert!(!q.swap_queues());
        assert_eq!(q.serving_direction(), Direction::Up);
        assert_eq!(q.remove_request(), Some(4));
    }

    #[test]
    fn every_added_request_comes_back_exactly_once() {
        let mut q = queue();
        let added = [
            (3, Direction::Up),
            (8, Direction::Up),
            (2, Direction::Down),
            (9, Direction::Down),
            (5, Direction::Up),
        ];
        for (floor, direction) in added {
            q.add_request(4, Direction::Up, ServiceRequest::new(floor, direction)).unwrap();
        }

        let mut served = Vec::new();
        loop {
            while let Some(floor) = q.remove_request() {
                served.push(floor);
            }
            if q.is_empty() {
                break;
            }
            q.swap_queues();
        }

        let mut expected: Vec<u8> = added.iter().map(|(f, _)| *f).collect();
        expected.sort_unstable();
        served.sort_unstable();
        assert_eq!(served, expected);
    }

    #[test]
    fn scan_order_is_monotone_per_sweep() {
        let mut q = queue();
        for floor in [6, 2, 9, 4] {
            q.add_request(1, Direction::Up, ServiceRequest::new(floor, Direction::Up)).unwrap();
        }
        let mut last = 0;
        while let Some(floor) = q.remove_request() {
            assert!(floor >= last);
            last = floor;
        }

        for floor in [6, 2, 9, 4] {
            q.add_request(10, Direction::Down, ServiceRequest::new(floor, Direction::Down)).unwrap();
        }
        let mut last = u8::MAX;
        while let Some(floor) = q.remove_request() {
            assert!(floor <= last);
            last = floor;
        }
    }

    #[test]
    fn call_enqueues_pickup_and_destination() {
        let mut q = queue();
        q.add_call(1, Direction::Up, 2, Direction::Up, 4).unwrap();

        assert_eq!(q.remove_request(), Some(2));
        assert_eq!(q.remove_request(), Some(4));
        assert!(q.is_empty());
    }

    #[test]
    fn rejects_invalid_arguments() {
        let mut q = queue();
        assert_eq!(
            q.add_request(1, Direction::Up, ServiceRequest::new(0, Direction::Up)),
            Err(RequestError::InvalidFloor(0))
        );
        assert_eq!(
            q.add_request(1, Direction::Up, ServiceRequest::new(11, Direction::Up)),
            Err(RequestError::InvalidFloor(11))
        );
        assert_eq!(
            q.add_request(1, Direction::Stop, ServiceRequest::new(3, Direction::Up)),
            Err(RequestError::InvalidDirection)
        );
        assert_eq!(
            q.add_request(1, Direction::Up, ServiceRequest::new(3, Direction::Stop)),
            Err(RequestError::InvalidDirection)
        );
        assert!(q.is_empty());
    }

    #[test]
    fn peek_does_not_remove() {
        let mut q = queue();
        q.add_request(1, Direction::Up, ServiceRequest::new(3, Direction::Up)).unwrap();
        assert_eq!(q.peek_next_request(), Some(3));
        assert_eq!(q.remove_request(), Some(3));
        assert_eq!(q.peek_next_request(), None);
    }

    #[test]
    fn expected_time_walks_all_three_sets() {
        let mut q = queue();
        q.add_request(1, Direction::Up, ServiceRequest::new(3, Direction::Up)).unwrap();
        q.add_request(1, Direction::Up, ServiceRequest::new(5, Direction::Down)).unwrap();

        // 1 -> 3: load 2.0 + travel 2.0, then 3 -> 5: load 2.0 + travel 2.0
        assert_eq!(q.get_expected_time(1), 8.0);
        assert!(q.remove_request().is_some()); // get_expected_time must not consume
        assert_eq!(q.remove_request(), None);
    }
}
