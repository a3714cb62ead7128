/// ----- ELEVATOR STATE MACHINE -----
/// One instance per car, running on its own thread. Drains the car's
/// request queue stop by stop: travel one floor at a time, confirm each
/// floor with the arrival sensor, cycle the doors, and swap queue sweeps
/// when the current one runs dry. Faults are latched here and never
/// cleared; a terminal fault drops all pending stops and ends the thread.

use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, select, Receiver, Sender};

use shared_resources::config::SystemConfig;
use shared_resources::direction::Direction;
use shared_resources::event::{Event, Origin, Payload};
use shared_resources::fault::{DoorState, ElevatorMonitor, Fault, MovementState};
use shared_resources::handoff_buffer::HandoffBuffer;

use crate::elevator::{Disruption, Elevator, SharedQueue};

/// Floor sensor query: the floor being approached and where to send the
/// may-stop verdict.
pub type SensorQuery = (u8, Sender<bool>);

/// Confirms approached floors. Stops replying once its query channel is
/// gone, which the state machine observes as a sensor failure.
pub fn arrival_sensor(num_floors: u8, query_rx: Receiver<SensorQuery>) {
    while let Ok((floor, reply_tx)) = query_rx.recv() {
        let may_stop = (1..=num_floors).contains(&floor);
        let _ = reply_tx.send(may_stop);
    }
}

pub fn main(
    number: u8,
    config: SystemConfig,
    queue: SharedQueue,
    disruption_rx: Receiver<Disruption>,
    sensor_query_tx: Sender<SensorQuery>,
    outbound: Arc<HandoffBuffer>,
    monitor_tx: Sender<ElevatorMonitor>,
) {
    let mut machine = StateMachine {
        elevator: Elevator::new(number, config),
        queue,
        disruption_rx,
        sensor_query_tx,
        outbound,
        monitor_tx,
        sensor_dead: false,
        door_fault_pending: false,
    };

    machine.publish();
    loop {
        machine.wait_for_requests();
        machine.move_elevator_while_possible();
        if machine.elevator.fault.is_terminal() {
            return;
        }
    }
}

struct StateMachine {
    elevator: Elevator,
    queue: SharedQueue,
    disruption_rx: Receiver<Disruption>,
    sensor_query_tx: Sender<SensorQuery>,
    outbound: Arc<HandoffBuffer>,
    monitor_tx: Sender<ElevatorMonitor>,
    sensor_dead: bool,
    door_fault_pending: bool,
}

impl StateMachine {
    fn wait_for_requests(&mut self) {
        let mut q = self.queue.0.lock();
        while q.is_empty() {
            self.queue.1.wait(&mut q);
        }
    }

    /// Serves stops until all three queue sets are empty or a terminal
    /// fault makes the car non-dispatchable.
    fn move_elevator_while_possible(&mut self) {
        loop {
            let next = {
                let mut q = self.queue.0.lock();
                match q.remove_request() {
                    Some(floor) => Some(floor),
                    None => {
                        q.swap_queues();
                        q.remove_request()
                    }
                }
            };
            let Some(target) = next else { break };

            self.serve_stop(target);
            if self.elevator.fault.is_terminal() {
                return;
            }
        }
        self.elevator.movement = MovementState::Idle;
        self.elevator.direction = Direction::Stop;
        self.publish();
    }

    fn serve_stop(&mut self, target: u8) {
        self.elevator.movement = MovementState::Active;

        while self.elevator.current_floor != target {
            self.elevator.direction = Direction::towards(self.elevator.current_floor, target);
            self.publish();

            if !self.travel_one_floor() {
                self.fail(Fault::ElevatorStuck);
                return;
            }

            let next_floor = match self.elevator.direction {
                Direction::Up => self.elevator.current_floor + 1,
                _ => self.elevator.current_floor - 1,
            };
            if !self.check_arrival(next_floor) {
                self.fail(Fault::ArrivalSensorFail);
                return;
            }
            self.elevator.current_floor = next_floor;
        }

        // Confirmed arrival: momentarily idle, then cycle the doors.
        self.elevator.movement = MovementState::Idle;
        self.elevator.direction = Direction::Stop;
        self.publish();
        self.door_cycle();
    }

    /// One inter-floor travel period. Returns false if the thread was
    /// interrupted in transit, which strands the car between floors.
    fn travel_one_floor(&mut self) -> bool {
        loop {
            select! {
                recv(self.disruption_rx) -> msg => match msg {
                    Ok(Disruption::Interrupt) => return false,
                    Ok(Disruption::SensorFailure) => self.sensor_dead = true,
                    Ok(Disruption::DoorMalfunction) => self.door_fault_pending = true,
                    Err(_) => {
                        // injector gone; finish the step undisturbed
                        thread::sleep(self.elevator.config.travel_duration());
                        return true;
                    }
                },
                default(self.elevator.config.travel_duration()) => return true,
            }
        }
    }

    /// Emits the approach event and waits for the arrival sensor to set
    /// may_stop within one travel period.
    fn check_arrival(&mut self, floor: u8) -> bool {
        self.emit(Payload::Approach {
            elevator: self.elevator.number,
            floor,
            may_stop: false,
        });

        let (reply_tx, reply_rx) = bounded(1);
        if !self.sensor_dead && self.sensor_query_tx.send((floor, reply_tx)).is_ok() {
            if let Ok(may_stop) = reply_rx.recv_timeout(self.elevator.config.travel_duration()) {
                self.emit(Payload::Approach {
                    elevator: self.elevator.number,
                    floor,
                    may_stop,
                });
                return may_stop;
            }
        } else {
            // no sensor to answer; still honor the bounded window
            thread::sleep(self.elevator.config.travel_duration());
        }
        false
    }

    fn door_cycle(&mut self) {
        self.elevator.door = DoorState::Open;
        if self.door_fault_pending {
            self.door_fault_pending = false;
            self.fail(Fault::DoorsStuck);
            return;
        }
        self.publish();

        loop {
            select! {
                recv(self.disruption_rx) -> msg => match msg {
                    Ok(Disruption::DoorMalfunction) => {
                        self.fail(Fault::DoorsStuck);
                        return;
                    }
                    Ok(Disruption::Interrupt) => {
                        // Abandon this door cycle only: doors stay open and
                        // the car remains dispatchable.
                        self.elevator.fault = Fault::DoorsInterrupted;
                        self.emit(Payload::Fault {
                            kind: Fault::DoorsInterrupted,
                            elevator: self.elevator.number,
                        });
                        self.publish();
                        return;
                    }
                    Ok(Disruption::SensorFailure) => self.sensor_dead = true,
                    Err(_) => {
                        thread::sleep(self.elevator.config.load_duration());
                        self.elevator.door = DoorState::Closed;
                        self.publish();
                        return;
                    }
                },
                default(self.elevator.config.load_duration()) => {
                    self.elevator.door = DoorState::Closed;
                    self.publish();
                    return;
                }
            }
        }
    }

    /// Latches a terminal fault: pending stops are dropped and the car is
    /// excluded from further dispatch.
    fn fail(&mut self, fault: Fault) {
        log::warn!("elevator {}: fault {}", self.elevator.number, fault.as_string());
        self.elevator.fault = fault;
        match fault {
            Fault::ElevatorStuck | Fault::ArrivalSensorFail => {
                self.elevator.movement = MovementState::Stuck;
            }
            Fault::DoorsStuck => {
                self.elevator.door = DoorState::Stuck;
            }
            _ => (),
        }
        self.queue.0.lock().clear();
        self.emit(Payload::Fault {
            kind: fault,
            elevator: self.elevator.number,
        });
        self.publish();
    }

    fn emit(&self, payload: Payload) {
        self.outbound
            .add_last(Event::new(Origin::Elevator, payload), Origin::Elevator);
    }

    fn publish(&self) {
        let (estimate, empty) = {
            let q = self.queue.0.lock();
            (
                q.get_expected_time(self.elevator.current_floor),
                q.is_empty(),
            )
        };
        let snapshot = self.elevator.monitor(estimate, empty);
        // Observers may disappear during shutdown; a fault here must never
        // take the elevator thread down with it.
        let _ = self.monitor_tx.send(snapshot.clone());
        self.emit(Payload::Status(snapshot));
    }
}
