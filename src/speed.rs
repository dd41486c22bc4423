use core::cell::Cell;
use critical_section::Mutex;

/// Target speed shared between application code and the interrupt handlers.
///
/// The value is wider than the native word on 8-bit targets, so every access goes through a
/// critical section to avoid torn reads.
pub struct TargetSpeed {
    speed_pps: Mutex<Cell<i16>>,
    max_speed_pps: i16,
}

impl TargetSpeed {
    /// `max_speed_pps` saturates at `i16::MAX` so the negative bound stays representable.
    pub const fn new(max_speed_pps: u16) -> Self {
        let max_speed_pps = if max_speed_pps > i16::MAX as u16 {
            i16::MAX
        } else {
            max_speed_pps as i16
        };

        Self {
            speed_pps: Mutex::new(Cell::new(0)),
            max_speed_pps,
        }
    }

    /// Clamps into `[-max, max]`, stores, and returns the stored value.
    pub fn set(&self, speed_pps: i16) -> i16 {
        let speed_pps = speed_pps.clamp(-self.max_speed_pps, self.max_speed_pps);

        critical_section::with(|cs| self.speed_pps.borrow(cs).set(speed_pps));

        speed_pps
    }

    pub fn get(&self) -> i16 {
        critical_section::with(|cs| self.speed_pps.borrow(cs).get())
    }

    pub fn max_speed(&self) -> u16 {
        self.max_speed_pps as u16
    }
}

/// Reprograms whatever produces the pulse cadence.
///
/// Called with the magnitude of the new current speed, including 0 when the motor stops.
pub trait FrequencySetter {
    fn set_frequency(&mut self, pulses_per_second: u16);
}

impl<F: FnMut(u16)> FrequencySetter for F {
    fn set_frequency(&mut self, pulses_per_second: u16) {
        self(pulses_per_second)
    }
}
