//! Phase sequencer for 4-phase unipolar stepper motors (28BYJ-48 + ULN2003 and the like).
//!
//! The sequencer is driven by two externally scheduled ticks: a slow one that applies the
//! target speed and reprograms the pulse timer through a [`FrequencySetter`], and a fast one,
//! once per pulse, that energizes the next coil pattern through a [`CoilDriver`].
//!
//! ```
//! use uniseq::{StepSequencer, TargetSpeed};
//! # use core::convert::Infallible;
//! # use embedded_hal::digital::{ErrorType, OutputPin};
//! # struct Pin;
//! # impl ErrorType for Pin { type Error = Infallible; }
//! # impl OutputPin for Pin {
//! #     fn set_low(&mut self) -> Result<(), Infallible> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Infallible> { Ok(()) }
//! # }
//! use uniseq::CoilPins;
//!
//! static TARGET: TargetSpeed = TargetSpeed::new(500);
//!
//! let coils = CoilPins::new(Pin, Pin, Pin, Pin);
//! let mut seq = StepSequencer::new(coils, &TARGET, 10_000, |_pps: u16| {
//!     // reprogram the pulse timer
//! });
//!
//! TARGET.set(-200);
//! seq.update_speed(); // scheduling tick
//! seq.update_pulse(); // pulse tick
//! assert_eq!(seq.current_speed(), -200);
//! ```
#![cfg_attr(not(test), no_std)]

pub mod coils;
pub mod phase;
pub mod sequencer;
pub mod speed;
pub mod units;

pub use coils::{CoilDriver, CoilPins};
pub use phase::{Excitation, PhaseIndex, RotationDirection, StepType, PHASE_TABLE};
pub use sequencer::{Status, StepSequencer};
pub use speed::{FrequencySetter, TargetSpeed};
pub use units::MotorGeometry;
