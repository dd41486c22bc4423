use crate::phase::Excitation;
use embedded_hal::digital::OutputPin;

/// Something that can energize the four motor windings.
///
/// Implementations are called from interrupt context and must return quickly.
pub trait CoilDriver {
    fn drive(&mut self, excitation: Excitation);
}

/// Four GPIO outputs wired to the windings A, B, C and D (e.g. ULN2003 IN1..IN4).
pub struct CoilPins<PinA, PinB, PinC, PinD> {
    in_a: PinA,
    in_b: PinB,
    in_c: PinC,
    in_d: PinD,
}

impl<PinA, PinB, PinC, PinD> CoilPins<PinA, PinB, PinC, PinD>
where
    PinA: OutputPin,
    PinB: OutputPin,
    PinC: OutputPin,
    PinD: OutputPin,
{
    pub fn new(in_a: PinA, in_b: PinB, in_c: PinC, in_d: PinD) -> Self {
        Self {
            in_a,
            in_b,
            in_c,
            in_d,
        }
    }

    pub fn release(self) -> (PinA, PinB, PinC, PinD) {
        (self.in_a, self.in_b, self.in_c, self.in_d)
    }
}

impl<PinA, PinB, PinC, PinD> CoilDriver for CoilPins<PinA, PinB, PinC, PinD>
where
    PinA: OutputPin,
    PinB: OutputPin,
    PinC: OutputPin,
    PinD: OutputPin,
{
    fn drive(&mut self, excitation: Excitation) {
        let [a, b, c, d] = excitation.levels();

        // A failed write must not keep the other coils from being updated.
        self.in_a.set_state(a).ok();
        self.in_b.set_state(b).ok();
        self.in_c.set_state(c).ok();
        self.in_d.set_state(d).ok();
    }
}
