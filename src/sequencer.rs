use crate::{
    coils::CoilDriver,
    phase::{Excitation, PhaseIndex, RotationDirection, StepType},
    speed::{FrequencySetter, TargetSpeed},
    units,
};
use ufmt::derive::uDebug;

/// Point-in-time view of the sequencer, for printing over a serial port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uDebug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    pub phase_index: u8,
    pub step_type: StepType,
    pub cw_positive: bool,
    pub target_speed_pps: i16,
    pub current_speed_pps: i16,
}

/// Drives a 4-phase unipolar stepper from two periodic ticks.
///
/// [`update_speed`](Self::update_speed) runs on the slow scheduling cadence and reconciles the
/// shared target speed into the current speed. [`update_pulse`](Self::update_pulse) runs once
/// per step, at the rate last handed to the [`FrequencySetter`]. The two ticks must not preempt
/// each other; only the [`TargetSpeed`] is touched from other contexts.
pub struct StepSequencer<'a, Coils, Freq> {
    coils: Coils,
    freq_setter: Freq,
    target: &'a TargetSpeed,
    index: PhaseIndex,
    step_type: StepType,
    cw_positive: bool,
    current_speed_pps: i16,
    sched_period_us: u32,
}

impl<'a, Coils, Freq> StepSequencer<'a, Coils, Freq>
where
    Coils: CoilDriver,
    Freq: FrequencySetter,
{
    /// `sched_period_us` is advisory: it records the cadence the caller runs
    /// [`update_speed`](Self::update_speed) at and is not enforced here.
    pub fn new(
        coils: Coils,
        target: &'a TargetSpeed,
        sched_period_us: u32,
        freq_setter: Freq,
    ) -> Self {
        Self {
            coils,
            freq_setter,
            target,
            index: PhaseIndex::INITIAL,
            step_type: StepType::Step4,
            cw_positive: true,
            current_speed_pps: 0,
            sched_period_us,
        }
    }

    pub fn set_direction_convention(&mut self, cw_positive: bool) {
        self.cw_positive = cw_positive;
    }

    pub fn is_direction_convention_cw(&self) -> bool {
        self.cw_positive
    }

    pub fn max_speed(&self) -> u16 {
        self.target.max_speed()
    }

    pub fn set_half_step(&mut self, half_step: bool) {
        self.step_type = if half_step {
            StepType::Step8
        } else {
            StepType::Step4
        };
    }

    pub fn is_half_step(&self) -> bool {
        matches!(self.step_type, StepType::Step8)
    }

    pub fn step_type(&self) -> StepType {
        self.step_type
    }

    pub fn step_clockwise(&mut self) {
        self.step(RotationDirection::Clockwise)
    }

    pub fn step_counterclockwise(&mut self) {
        self.step(RotationDirection::AntiClockwise)
    }

    /// Outputs the pattern at the current index, then moves the index one step.
    pub fn step(&mut self, direction: RotationDirection) {
        self.coils.drive(self.index.excitation());

        self.index = self.index.next(direction, self.step_type);
    }

    /// De-energizes every coil. The phase index is kept.
    pub fn step_idle(&mut self) {
        self.coils.drive(Excitation::Off)
    }

    /// Stores a new target, clamped to the configured maximum.
    pub fn set_target_speed(&self, speed_pps: i16) -> i16 {
        self.target.set(speed_pps)
    }

    pub fn target_speed(&self) -> i16 {
        self.target.get()
    }

    pub fn current_speed(&self) -> i16 {
        self.current_speed_pps
    }

    /// Scheduling cadence tick.
    pub fn update_speed(&mut self) {
        let target = self.target.get();

        if self.current_speed_pps == target {
            return;
        }

        // No acceleration profile: the current speed jumps to the target.
        self.current_speed_pps = target;

        self.freq_setter
            .set_frequency(self.current_speed_pps.unsigned_abs());

        // The pulse timer ticks very slowly at zero speed, don't leave a coil energized until then.
        if self.current_speed_pps == 0 {
            self.step_idle();
        }
    }

    /// Pulse cadence tick. A negative speed always turns against the positive direction.
    pub fn update_pulse(&mut self) {
        let speed = self.current_speed_pps;

        if speed == 0 {
            self.step_idle();
            return;
        }

        let direction = match (speed > 0, self.cw_positive) {
            (true, true) | (false, false) => RotationDirection::Clockwise,
            (true, false) | (false, true) => RotationDirection::AntiClockwise,
        };

        self.step(direction)
    }

    pub fn phase_index(&self) -> PhaseIndex {
        self.index
    }

    pub fn sched_period_us(&self) -> u32 {
        self.sched_period_us
    }

    /// Period between pulses at the current speed, `None` when stopped.
    pub fn pulse_period_us(&self) -> Option<u32> {
        units::pulse_period_us(self.current_speed_pps)
    }

    pub fn status(&self) -> Status {
        Status {
            phase_index: self.index.get(),
            step_type: self.step_type,
            cw_positive: self.cw_positive,
            target_speed_pps: self.target.get(),
            current_speed_pps: self.current_speed_pps,
        }
    }

    pub fn coils(&self) -> &Coils {
        &self.coils
    }

    pub fn release(self) -> Coils {
        self.coils
    }
}
