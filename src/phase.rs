use embedded_hal::digital::PinState;
use ufmt::derive::uDebug;

/// Number of positions in the half-step drive sequence.
pub const PHASE_COUNT: u8 = 8;

/// Coil energization pattern over the four windings A, B, C, D.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uDebug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Excitation {
    Off,
    A,
    B,
    C,
    D,
    AB,
    BC,
    CD,
    DA,
}

impl Excitation {
    /// Levels for coils `[A, B, C, D]`.
    pub fn levels(self) -> [PinState; 4] {
        let [a, b, c, d] = self.bits();
        [a.into(), b.into(), c.into(), d.into()]
    }

    pub fn bits(self) -> [bool; 4] {
        match self {
            Excitation::Off => [false, false, false, false],
            Excitation::A => [true, false, false, false],
            Excitation::B => [false, true, false, false],
            Excitation::C => [false, false, true, false],
            Excitation::D => [false, false, false, true],
            Excitation::AB => [true, true, false, false],
            Excitation::BC => [false, true, true, false],
            Excitation::CD => [false, false, true, true],
            Excitation::DA => [true, false, false, true],
        }
    }
}

/// Unipolar half-step sequence. Neighbouring entries differ in exactly one coil.
pub const PHASE_TABLE: [Excitation; PHASE_COUNT as usize] = [
    Excitation::D,
    Excitation::CD,
    Excitation::C,
    Excitation::BC,
    Excitation::B,
    Excitation::AB,
    Excitation::A,
    Excitation::DA,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, uDebug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepType {
    Step8, // half-step, every table entry
    Step4, // full-step, every other table entry
}

impl StepType {
    /// Table positions moved per step.
    pub fn stride(self) -> u8 {
        match self {
            StepType::Step8 => 1,
            StepType::Step4 => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uDebug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RotationDirection {
    Clockwise,
    AntiClockwise,
}

/// Position in [`PHASE_TABLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, uDebug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhaseIndex(u8);

impl PhaseIndex {
    pub const INITIAL: Self = Self(PHASE_COUNT - 1);

    pub fn new(index: u8) -> Self {
        Self(index % PHASE_COUNT)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn excitation(self) -> Excitation {
        PHASE_TABLE
            .get(self.0 as usize)
            .copied()
            .unwrap_or(Excitation::Off)
    }

    /// Clockwise walks the table downwards, anti-clockwise upwards. Wrapping is modulo the
    /// table length, so a full-step walk never changes the index parity.
    pub fn next(self, direction: RotationDirection, step_type: StepType) -> Self {
        let stride = step_type.stride() as i8;
        let delta = match direction {
            RotationDirection::Clockwise => -stride,
            RotationDirection::AntiClockwise => stride,
        };

        Self((self.0 as i8 + delta).rem_euclid(PHASE_COUNT as i8) as u8)
    }
}

impl Default for PhaseIndex {
    fn default() -> Self {
        Self::INITIAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_drive_sequence() {
        let expected: [[u8; 4]; 8] = [
            [0, 0, 0, 1],
            [0, 0, 1, 1],
            [0, 0, 1, 0],
            [0, 1, 1, 0],
            [0, 1, 0, 0],
            [1, 1, 0, 0],
            [1, 0, 0, 0],
            [1, 0, 0, 1],
        ];

        for (excitation, row) in PHASE_TABLE.iter().zip(expected.iter()) {
            let bits = excitation.bits().map(u8::from);
            assert_eq!(&bits, row, "{excitation:?}");
        }
    }

    #[test]
    fn neighbours_differ_in_one_coil() {
        for i in 0..PHASE_COUNT {
            let here = PhaseIndex::new(i).excitation().bits();
            let there = PhaseIndex::new(i + 1).excitation().bits();
            let changed = here.iter().zip(there.iter()).filter(|(a, b)| a != b).count();
            assert_eq!(changed, 1, "between {i} and {}", i + 1);
        }
    }

    #[test]
    fn half_step_visits_every_position() {
        let mut index = PhaseIndex::INITIAL;
        let mut visited = [0u8; 8];
        for slot in visited.iter_mut() {
            index = index.next(RotationDirection::Clockwise, StepType::Step8);
            *slot = index.get();
        }
        assert_eq!(visited, [6, 5, 4, 3, 2, 1, 0, 7]);

        for slot in visited.iter_mut() {
            index = index.next(RotationDirection::AntiClockwise, StepType::Step8);
            *slot = index.get();
        }
        assert_eq!(visited, [0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn full_step_wraps_like_the_edge_rules() {
        // odd positions: past 7 lands on 1, below 0 lands on 7
        let index = PhaseIndex::new(7).next(RotationDirection::AntiClockwise, StepType::Step4);
        assert_eq!(index.get(), 1);
        let index = PhaseIndex::new(1).next(RotationDirection::Clockwise, StepType::Step4);
        assert_eq!(index.get(), 7);
        // half-step: past 7 lands on 0
        let index = PhaseIndex::new(7).next(RotationDirection::AntiClockwise, StepType::Step8);
        assert_eq!(index.get(), 0);
    }

    #[test]
    fn full_step_preserves_parity() {
        for start in 0..PHASE_COUNT {
            let mut index = PhaseIndex::new(start);
            for n in 0..40 {
                let direction = if n % 3 == 0 {
                    RotationDirection::AntiClockwise
                } else {
                    RotationDirection::Clockwise
                };
                index = index.next(direction, StepType::Step4);
                assert_eq!(index.get() % 2, start % 2, "start {start}, step {n}");
            }
        }
    }

    #[test]
    fn out_of_range_index_is_reduced() {
        assert_eq!(PhaseIndex::new(9).get(), 1);
        assert_eq!(Excitation::Off.levels(), [PinState::Low; 4]);
    }
}
