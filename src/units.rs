use crate::phase::StepType;
#[allow(unused_imports)]
use micromath::F32Ext;

const MICROS_PER_SECOND: u32 = 1_000_000;

/// Mechanical resolution of the motor, counted in half steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorGeometry {
    pub half_steps_per_rev: u16,
}

impl MotorGeometry {
    /// 28BYJ-48 with its 1:64 gearbox: 4096 half steps = 360°.
    pub const BYJ48: Self = Self::new(4096);

    pub const fn new(half_steps_per_rev: u16) -> Self {
        Self { half_steps_per_rev }
    }

    /// Output shaft rotation per pulse.
    pub fn step_angle_deg(&self, step_type: StepType) -> f32 {
        360.0 * step_type.stride() as f32 / self.half_steps_per_rev as f32
    }

    /// Pulse rate for a shaft speed, rounded and saturated to the `i16` range.
    pub fn pps_from_deg_per_s(&self, speed_deg_s: f32, step_type: StepType) -> i16 {
        (speed_deg_s / self.step_angle_deg(step_type)).round() as i16
    }

    pub fn deg_per_s_from_pps(&self, speed_pps: i16, step_type: StepType) -> f32 {
        speed_pps as f32 * self.step_angle_deg(step_type)
    }
}

/// Time between two pulses at `speed_pps`, or `None` when stopped.
pub fn pulse_period_us(speed_pps: i16) -> Option<u32> {
    match speed_pps.unsigned_abs() {
        0 => None,
        pps => Some(MICROS_PER_SECOND / pps as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn byj48_step_angles() {
        let geometry = MotorGeometry::BYJ48;
        assert!(close(geometry.step_angle_deg(StepType::Step8), 0.087_890_63));
        assert!(close(geometry.step_angle_deg(StepType::Step4), 0.175_781_25));
    }

    #[test]
    fn deg_per_s_round_trip_on_whole_pulses() {
        let geometry = MotorGeometry::BYJ48;

        // one revolution every 8 s in half-step mode
        assert_eq!(geometry.pps_from_deg_per_s(45.0, StepType::Step8), 512);
        assert_eq!(geometry.pps_from_deg_per_s(-45.0, StepType::Step4), -256);
        assert!(close(geometry.deg_per_s_from_pps(512, StepType::Step8), 45.0));
    }

    #[test]
    fn conversion_saturates() {
        let geometry = MotorGeometry::BYJ48;
        assert_eq!(geometry.pps_from_deg_per_s(1.0e9, StepType::Step8), i16::MAX);
        assert_eq!(geometry.pps_from_deg_per_s(-1.0e9, StepType::Step8), i16::MIN);
    }

    #[test]
    fn pulse_period() {
        assert_eq!(pulse_period_us(0), None);
        assert_eq!(pulse_period_us(100), Some(10_000));
        assert_eq!(pulse_period_us(-100), Some(10_000));
        assert_eq!(pulse_period_us(i16::MIN), Some(30));
    }
}
