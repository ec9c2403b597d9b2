//! Aritmetica dei turni: durata con passaggio della mezzanotte, pause, trasferimenti.

use super::ShiftError;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Durate di pausa selezionabili dal modulo
pub const ALLOWED_BREAK_MINUTES: [i64; 4] = [0, 30, 60, 90];

/// Durate di trasferimento selezionabili dal modulo
pub const ALLOWED_TRANSFER_MINUTES: [i64; 7] = [0, 15, 30, 45, 60, 90, 120];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkedTime {
    pub elapsed_minutes: u32,
    pub worked_minutes: u32,
    /// ore arrotondate a due decimali
    pub ore: f64,
    /// durata di 24 ore o più: ore registrate a 0
    pub duration_warning: bool,
}

pub fn validate_break(minutes: i64) -> Result<u32, ShiftError> {
    if ALLOWED_BREAK_MINUTES.contains(&minutes) {
        Ok(minutes as u32)
    } else {
        Err(ShiftError::InvalidInput("Valore di pausa non consentito."))
    }
}

pub fn validate_transfer(minutes: i64) -> Result<u32, ShiftError> {
    if ALLOWED_TRANSFER_MINUTES.contains(&minutes) {
        Ok(minutes as u32)
    } else {
        Err(ShiftError::InvalidInput("Valore di trasferimento non consentito."))
    }
}

pub fn round_hours(minutes: u32) -> f64 {
    (f64::from(minutes) / 60.0 * 100.0).round() / 100.0
}

/// Calcola le ore lavorate fra due orari espressi in minuti dalla mezzanotte.
///
/// Se la fine non è successiva all'inizio il turno attraversa la mezzanotte.
/// Con il passaggio della mezzanotte la durata arriva a 24 ore solo quando
/// inizio e fine coincidono: in quel caso il turno viene registrato a 0 ore
/// con `duration_warning`.
pub fn compute_worked_time(
    start_minutes: u32,
    end_minutes: u32,
    break_minutes: u32,
    transfer_minutes: u32,
) -> Result<WorkedTime, ShiftError> {
    let elapsed = if end_minutes <= start_minutes {
        end_minutes + MINUTES_PER_DAY - start_minutes
    } else {
        end_minutes - start_minutes
    };

    if elapsed >= MINUTES_PER_DAY {
        return Ok(WorkedTime {
            elapsed_minutes: elapsed,
            worked_minutes: 0,
            ore: 0.0,
            duration_warning: true,
        });
    }

    let worked = i64::from(elapsed) - i64::from(break_minutes) - i64::from(transfer_minutes);
    if worked <= 0 {
        return Err(ShiftError::InvalidInput(
            "La durata del turno, tolte pausa e trasferimento, deve essere positiva.",
        ));
    }
    let worked = worked as u32;

    Ok(WorkedTime {
        elapsed_minutes: elapsed,
        worked_minutes: worked,
        ore: round_hours(worked),
        duration_warning: false,
    })
}
