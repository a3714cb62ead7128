/// ----- STATUS DISPLAY -----
/// Live table of every elevator heard over the status broadcast, redrawn
/// in place. A periodic redraw keeps the LAST SEEN column moving even
/// when no new snapshots arrive.

use std::collections::BTreeMap;
use std::io::{stdout, Stdout, Write};
use std::time::{Duration, Instant};

use crossbeam_channel::{select, Receiver};
use crossterm::{cursor, terminal, ExecutableCommand, Result};

use shared_resources::fault::ElevatorMonitor;

const HEADER_SIZE: u16 = 5;

pub fn main(status_rx: Receiver<ElevatorMonitor>) -> Result<()> {
    let mut stdout = stdout();
    let mut elevators: BTreeMap<u8, (ElevatorMonitor, Instant)> = BTreeMap::new();

    loop {
        select! {
            recv(status_rx) -> msg => {
                let snapshot = match msg {
                    Ok(snapshot) => snapshot,
                    Err(_) => return Ok(()),
                };
                elevators.insert(snapshot.elevator, (snapshot, Instant::now()));
                print_status(&mut stdout, &elevators)?;
            },
            default(Duration::from_millis(500)) => {
                print_status(&mut stdout, &elevators)?;
            },
        }
    }
}

fn print_status(
    stdout: &mut Stdout,
    elevators: &BTreeMap<u8, (ElevatorMonitor, Instant)>,
) -> Result<()> {
    stdout.execute(terminal::Clear(terminal::ClearType::FromCursorDown))?;

    writeln!(stdout, "+---------------------------------------------------------------------------------------+")?;
    writeln!(stdout, "| ELEVATORS                                                                             |")?;
    writeln!(stdout, "+----------+----------+-----------+----------+------------------+-----------+-----------+")?;
    writeln!(stdout, "| {0:<8} | {1:<8} | {2:<9} | {3:<8} | {4:<16} | {5:<9} | {6:<9} |",
        "ELEVATOR", "FLOOR", "DIRECTION", "STATE", "FAULT", "QUEUE ETA", "LAST SEEN")?;
    writeln!(stdout, "+----------+----------+-----------+----------+------------------+-----------+-----------+")?;
    for (number, (elev, last_seen)) in elevators {
        writeln!(stdout, "| {0:<8} | {1:<8} | {2:<9} | {3:<8} | {4:<16} | {5:>8.1}s | {6:>7}ms |",
            number,
            elev.current_floor,
            elev.direction.as_string().unwrap_or_else(|| String::from("-")),
            elev.movement.as_string(),
            elev.fault.as_string(),
            elev.queue_time_estimate,
            Instant::now().duration_since(*last_seen).as_millis())?;
        writeln!(stdout, "+----------+----------+-----------+----------+------------------+-----------+-----------+")?;
    }

    stdout.execute(cursor::MoveUp(HEADER_SIZE + 2 * elevators.len() as u16))?;
    Ok(())
}
