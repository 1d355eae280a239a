use std::io::{stdout, Stdout, Write};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{select, Receiver};
use crossterm::{cursor, terminal, ExecutableCommand, Result};

use crate::light::TrafficLight;
use crate::phase::Phase;
use crate::vehicle::VehicleEvent;

const STATUS_SIZE: u16 = 9;

pub fn main(light: Arc<TrafficLight>, event_rx: Receiver<VehicleEvent>) -> Result<()> {
    let mut stdout = stdout();

    let mut waiting: u32 = 0;
    let mut crossed: u32 = 0;

    for _ in 0..STATUS_SIZE {
        writeln!(stdout, "")?;
    }

    loop {
        select! {
            recv(event_rx) -> msg => {
                match msg {
                    Ok(VehicleEvent::Arrived) => waiting += 1,
                    Ok(VehicleEvent::Crossed) => {
                        waiting = waiting.saturating_sub(1);
                        crossed += 1;
                    },
                    Err(_) => break,
                }
                printstatus(&mut stdout, light.current_phase(), waiting, crossed)?;
            },
            default(Duration::from_millis(200)) => {
                printstatus(&mut stdout, light.current_phase(), waiting, crossed)?;
            },
        }
    }

    Ok(())
}

fn printstatus(stdout: &mut Stdout, phase: Phase, waiting: u32, crossed: u32) -> Result<()> {
    stdout.execute(cursor::MoveUp(STATUS_SIZE))?;
    stdout.execute(terminal::Clear(terminal::ClearType::FromCursorDown))?;

    writeln!(stdout, "+-------------------------+")?;
    writeln!(stdout, "| INTERSECTION            |")?;
    writeln!(stdout, "+------------+------------+")?;
    writeln!(stdout, "| {0:<10} | {1:<10} |", "LIGHT", phase.as_string())?;
    writeln!(stdout, "+------------+------------+")?;
    writeln!(stdout, "| {0:<10} | {1:<10} |", "WAITING", waiting)?;
    writeln!(stdout, "+------------+------------+")?;
    writeln!(stdout, "| {0:<10} | {1:<10} |", "CROSSED", crossed)?;
    writeln!(stdout, "+------------+------------+")?;

    Ok(())
}
