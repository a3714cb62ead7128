/// ----- ELEVATOR SELECTOR -----
/// Stateless choice of which car serves a new call. Idle cars win
/// outright; otherwise cars already sweeping towards the call floor are
/// ranked by expected queue-clearing time, with every other busy car as a
/// fallback. Stuck or faulted cars are never selected.

use std::collections::BTreeMap;

use shared_resources::direction::Direction;
use shared_resources::fault::{ElevatorMonitor, MovementState};

use crate::elevator::ElevatorHandle;

pub fn choose_elevator(
    floor: u8,
    direction: Direction,
    monitors: &BTreeMap<u8, ElevatorMonitor>,
    handles: &BTreeMap<u8, ElevatorHandle>,
) -> Option<u8> {
    let mut best: Option<(u8, f64)> = None;
    let mut fallback: Option<(u8, f64)> = None;

    for (&number, monitor) in monitors {
        if monitor.movement == MovementState::Stuck || monitor.fault.is_terminal() {
            log::warn!("elevator {} is out of service, skipping", number);
            continue;
        }
        if monitor.movement == MovementState::Idle {
            return Some(number);
        }

        let handle = match handles.get(&number) {
            Some(handle) => handle,
            None => continue,
        };
        let expected = handle
            .queue
            .0
            .lock()
            .get_expected_time(monitor.current_floor);

        let reachable = monitor.direction == direction
            && still_ahead(monitor.direction, monitor.current_floor, floor);
        let slot = if reachable { &mut best } else { &mut fallback };
        // strict comparison keeps ties on the first elevator seen
        if slot.as_ref().map_or(true, |&(_, t)| expected < t) {
            *slot = Some((number, expected));
        }
    }

    best.or(fallback).map(|(number, _)| number)
}

fn still_ahead(direction: Direction, current_floor: u8, floor: u8) -> bool {
    match direction {
        Direction::Up => floor >= current_floor,
        Direction::Down => floor <= current_floor,
        Direction::Stop => false,
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::unbounded;

    use super::*;
    use crate::elevator::shared_queue;
    use shared_resources::config::SystemConfig;
    use shared_resources::fault::{DoorState, Fault};
    use shared_resources::request::ServiceRequest;

    fn test_config() -> SystemConfig {
        SystemConfig {
            num_floors: 10,
            num_elevators: 3,
            travel_time: 1.0,
            load_time: 2.0,
        }
    }

    fn handle(number: u8) -> ElevatorHandle {
        let (disruption_tx, _disruption_rx) = unbounded();
        ElevatorHandle {
            number,
            queue: shared_queue(&test_config()),
            disruption_tx,
        }
    }

    fn monitor(number: u8, floor: u8, direction: Direction, movement: MovementState) -> ElevatorMonitor {
        ElevatorMonitor {
            elevator: number,
            current_floor: floor,
            direction,
            movement,
            door: DoorState::Closed,
            fault: Fault::None,
            queue_time_estimate: 0.0,
            has_no_pending_requests: true,
        }
    }

    fn setup(count: u8) -> (BTreeMap<u8, ElevatorMonitor>, BTreeMap<u8, ElevatorHandle>) {
        let mut monitors = BTreeMap::new();
        let mut handles = BTreeMap::new();
        for number in 1..=count {
            monitors.insert(number, monitor(number, 1, Direction::Stop, MovementState::Idle));
            handles.insert(number, handle(number));
        }
        (monitors, handles)
    }

    fn load(handles: &BTreeMap<u8, ElevatorHandle>, number: u8, anchor: u8, floors: &[u8]) {
        let mut q = handles[&number].queue.0.lock();
        for &floor in floors {
            q.add_request(anchor, Direction::Up, ServiceRequest::new(floor, Direction::Up))
                .unwrap();
        }
    }

    #[test]
    fn idle_elevator_wins_regardless_of_estimates() {
        let (mut monitors, handles) = setup(2);
        monitors.insert(1, monitor(1, 4, Direction::Up, MovementState::Active));
        load(&handles, 1, 4, &[5]);

        assert_eq!(choose_elevator(5, Direction::Up, &monitors, &handles), Some(2));
    }

    #[test]
    fn first_idle_elevator_breaks_the_tie() {
        let (monitors, handles) = setup(2);
        assert_eq!(choose_elevator(5, Direction::Up, &monitors, &handles), Some(1));
    }

    #[test]
    fn stuck_elevators_are_skipped() {
        let (mut monitors, handles) = setup(2);
        monitors.insert(1, monitor(1, 1, Direction::Stop, MovementState::Stuck));

        assert_eq!(choose_elevator(5, Direction::Up, &monitors, &handles), Some(2));
    }

    #[test]
    fn faulted_idle_elevator_is_not_selectable() {
        let (mut monitors, handles) = setup(2);
        let mut broken = monitor(1, 1, Direction::Stop, MovementState::Idle);
        broken.fault = Fault::DoorsStuck;
        monitors.insert(1, broken);

        assert_eq!(choose_elevator(5, Direction::Up, &monitors, &handles), Some(2));
    }

    #[test]
    fn sweeping_towards_the_call_beats_a_faster_fallback() {
        let (mut monitors, handles) = setup(2);
        // Elevator 1 is below the call floor, heading up: still reachable.
        monitors.insert(1, monitor(1, 2, Direction::Up, MovementState::Active));
        load(&handles, 1, 2, &[3, 4, 9]);
        // Elevator 2 has a shorter queue but is already past the floor.
        monitors.insert(2, monitor(2, 8, Direction::Up, MovementState::Active));
        load(&handles, 2, 8, &[9]);

        assert_eq!(choose_elevator(5, Direction::Up, &monitors, &handles), Some(1));
    }

    #[test]
    fn falls_back_to_least_loaded_busy_elevator() {
        let (mut monitors, handles) = setup(2);
        monitors.insert(1, monitor(1, 8, Direction::Up, MovementState::Active));
        load(&handles, 1, 8, &[9, 10]);
        monitors.insert(2, monitor(2, 7, Direction::Up, MovementState::Active));
        load(&handles, 2, 7, &[8]);

        // Call at floor 5 going up is behind both cars; pick the cheaper.
        assert_eq!(choose_elevator(5, Direction::Up, &monitors, &handles), Some(2));
    }

    #[test]
    fn no_selectable_elevator_yields_none() {
        let (mut monitors, handles) = setup(2);
        monitors.insert(1, monitor(1, 1, Direction::Stop, MovementState::Stuck));
        monitors.insert(2, monitor(2, 3, Direction::Stop, MovementState::Stuck));

        assert_eq!(choose_elevator(5, Direction::Up, &monitors, &handles), None);
    }
}
