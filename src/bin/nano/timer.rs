use avr_device::{
    atmega328p::{TC0, TC1},
    interrupt::Mutex,
};
use core::cell::Cell;
use uniseq::FrequencySetter;

static TICK_COUNTER: Mutex<Cell<u32>> = Mutex::new(Cell::new(0));

/// Increments the tick counter. Called from the TC0 compare interrupt only.
pub fn tick() -> u32 {
    avr_device::interrupt::free(|cs| {
        let ticks = TICK_COUNTER.borrow(cs);
        let next = ticks.get().wrapping_add(1);
        ticks.set(next);
        next
    })
}

/// Periodic tick on TC0 in CTC mode, drives the speed-update cadence.
///
/// ╔═══════════╦══════════════╦═════════════╗
/// ║ PRESCALER ║ TIMER_COUNTS ║ Tick period ║
/// ╠═══════════╬══════════════╬═════════════╣
/// ║        64 ║          250 ║        1 ms ║
/// ║       256 ║          125 ║        2 ms ║
/// ║       256 ║          250 ║        4 ms ║
/// ║      1024 ║          125 ║        8 ms ║
/// ╚═══════════╩══════════════╩═════════════╝
pub struct SchedTimer<const SYS_CLK_MHZ: u32, const PRESCALER: u32, const OF_COUNT: u8> {
    timer_counter: TC0,
    tick_period_us: u32,
}

impl<const SYS_CLK_MHZ: u32, const PRESCALER: u32, const OF_COUNT: u8>
    SchedTimer<SYS_CLK_MHZ, PRESCALER, OF_COUNT>
{
    const PRESCALER_TEST: () = assert!(
        (PRESCALER == 1)
            || (PRESCALER == 8)
            || (PRESCALER == 64)
            || (PRESCALER == 256)
            || (PRESCALER == 1024)
    );

    const ROUND_TEST: () = assert!(
        (PRESCALER * ((OF_COUNT as u32) + 1) / SYS_CLK_MHZ) * SYS_CLK_MHZ
            == PRESCALER * ((OF_COUNT as u32) + 1),
        "tick period must be a whole number of microseconds"
    );

    pub fn new(timer_counter: TC0) -> Self {
        let _ = Self::PRESCALER_TEST;
        let _ = Self::ROUND_TEST;

        let tick_period_us = (PRESCALER * ((OF_COUNT as u32) + 1)) / SYS_CLK_MHZ;
        Self {
            timer_counter,
            tick_period_us,
        }
    }

    pub fn init(&mut self) {
        // TCCR0A: WGM01:0 Waveform Generation Mode: CTC "Clear Timer on Compare Match"
        self.timer_counter.tccr0a.write(|w| w.wgm0().ctc());

        // OCR0A: compare value
        self.timer_counter
            .ocr0a
            .write(|w| unsafe { w.bits(OF_COUNT) });

        // TCCR0B: CS0 Clock Select
        self.timer_counter.tccr0b.write(|w| match PRESCALER {
            1 => w.cs0().direct(),
            8 => w.cs0().prescale_8(),
            64 => w.cs0().prescale_64(),
            256 => w.cs0().prescale_256(),
            1024 => w.cs0().prescale_1024(),
            _ => unreachable!(),
        });

        // TIMSK0: OCIE0A Output Compare Match A Interrupt Enable
        self.timer_counter.timsk0.write(|w| w.ocie0a().set_bit());

        avr_device::interrupt::free(|cs| TICK_COUNTER.borrow(cs).set(0));
    }

    pub fn tick_period_us(&self) -> u32 {
        self.tick_period_us
    }

    pub fn millis(&self) -> u32 {
        let ticks = avr_device::interrupt::free(|cs| TICK_COUNTER.borrow(cs).get());
        ticks.wrapping_mul(self.tick_period_us) / 1_000
    }
}

/// TC1 in CTC mode, one compare interrupt per motor pulse.
pub struct PulseTimer<const SYS_CLK_MHZ: u32> {
    timer_counter: TC1,
}

impl<const SYS_CLK_MHZ: u32> PulseTimer<SYS_CLK_MHZ> {
    const PRESCALER: u32 = 256;
    const TICK_HZ: u32 = SYS_CLK_MHZ * 1_000_000 / Self::PRESCALER;

    pub fn new(timer_counter: TC1) -> Self {
        timer_counter.tccr1a.reset();

        // WGM13:0 = 0b0100: CTC with TOP = OCR1A
        timer_counter
            .tccr1b
            .write(|w| w.wgm1().bits(0b01).cs1().prescale_256());

        Self { timer_counter }
    }
}

impl<const SYS_CLK_MHZ: u32> FrequencySetter for PulseTimer<SYS_CLK_MHZ> {
    /// A rate of 0 stops the pulse interrupt; the sequencer has idled the coils already.
    fn set_frequency(&mut self, pulses_per_second: u16) {
        if pulses_per_second == 0 {
            self.timer_counter.timsk1.write(|w| w.ocie1a().clear_bit());
            return;
        }

        let top = (Self::TICK_HZ / pulses_per_second as u32)
            .saturating_sub(1)
            .min(u16::MAX as u32) as u16;

        self.timer_counter.ocr1a.write(|w| unsafe { w.bits(top) });

        // A counter already past the new TOP would run the full 16 bit range first.
        if self.timer_counter.tcnt1.read().bits() > top {
            self.timer_counter.tcnt1.write(|w| unsafe { w.bits(0) });
        }

        self.timer_counter.timsk1.write(|w| w.ocie1a().set_bit());
    }
}
