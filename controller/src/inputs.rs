/// ----- INPUTS MODULE -----
/// Parses the request feed the floor subsystem replays. One record per
/// line: an optional inter-arrival delay in seconds, then either a
/// passenger call `floor direction desired_floor` or a disturbance
/// `fault elevator kind`. Malformed lines fail the whole load; requests
/// are never silently coerced.

use std::fmt;
use std::fs;
use std::io;

use shared_resources::direction::Direction;

use crate::elevator::Disruption;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputRecord {
    Call {
        delay: f64,
        floor: u8,
        direction: Direction,
        desired_floor: u8,
    },
    Fault {
        delay: f64,
        elevator: u8,
        disruption: Disruption,
    },
}

#[derive(Debug)]
pub enum InputError {
    Io(io::Error),
    BadRecord { line: usize, reason: String },
}

impl From<io::Error> for InputError {
    fn from(e: io::Error) -> Self {
        InputError::Io(e)
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Io(e) => write!(f, "could not read request feed: {}", e),
            InputError::BadRecord { line, reason } => {
                write!(f, "bad record on line {}: {}", line, reason)
            }
        }
    }
}

pub fn read_request_file(path: &str) -> Result<Vec<InputRecord>, InputError> {
    parse_records(&fs::read_to_string(path)?)
}

pub fn parse_records(contents: &str) -> Result<Vec<InputRecord>, InputError> {
    let mut records = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        records.push(parse_line(line).map_err(|reason| InputError::BadRecord {
            line: index + 1,
            reason,
        })?);
    }
    Ok(records)
}

fn parse_line(line: &str) -> Result<InputRecord, String> {
    let mut fields: Vec<&str> = line.split_whitespace().collect();

    // both record kinds have three fields, so a fourth means a leading delay
    let delay = if fields.len() == 4 {
        let head = fields.remove(0);
        head.parse::<f64>()
            .map_err(|_| format!("delay {} is not a number", head))?
    } else {
        0.0
    };

    match fields.as_slice() {
        ["fault", elevator, kind] => Ok(InputRecord::Fault {
            delay,
            elevator: elevator
                .parse::<u8>()
                .map_err(|_| format!("elevator number {} is not a number", elevator))?,
            disruption: Disruption::from_string(kind)
                .ok_or_else(|| format!("unknown fault kind {}", kind))?,
        }),
        [floor, direction, desired_floor] => Ok(InputRecord::Call {
            delay,
            floor: floor
                .parse::<u8>()
                .map_err(|_| format!("floor {} is not a number", floor))?,
            direction: Direction::from_string(direction)
                .ok_or_else(|| format!("unknown direction {}", direction))?,
            desired_floor: desired_floor
                .parse::<u8>()
                .map_err(|_| format!("desired floor {} is not a number", desired_floor))?,
        }),
        _ => Err(String::from("expected 'floor direction desired_floor' or 'fault elevator kind'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_calls_with_and_without_delay() {
        let records = parse_records("2 up 4\n0.5 3 down 1\n").unwrap();
        assert_eq!(
            records,
            vec![
                InputRecord::Call { delay: 0.0, floor: 2, direction: Direction::Up, desired_floor: 4 },
                InputRecord::Call { delay: 0.5, floor: 3, direction: Direction::Down, desired_floor: 1 },
            ]
        );
    }

    #[test]
    fn parses_fault_records() {
        let records = parse_records("1.5 fault 2 doors\nfault 1 interrupt\n").unwrap();
        assert_eq!(
            records,
            vec![
                InputRecord::Fault { delay: 1.5, elevator: 2, disruption: Disruption::DoorMalfunction },
                InputRecord::Fault { delay: 0.0, elevator: 1, disruption: Disruption::Interrupt },
            ]
        );
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let records = parse_records("# morning rush\n\n2 up 4\n").unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(parse_records("2 sideways 4\n").is_err());
        assert!(parse_records("2 up\n").is_err());
        assert!(parse_records("fault 2 gremlins\n").is_err());
    }
}
