#![no_std]
#![no_main]
#![feature(abi_avr_interrupt)]

mod pins;
mod serial;
mod timer;

use avr_device::interrupt::Mutex;
use core::cell::RefCell;
use panic_halt as _;
use pins::{PortBPin, PortDPin};
use serial::SerialWriter;
use timer::{PulseTimer, SchedTimer};
use uniseq::{CoilPins, MotorGeometry, StepSequencer, StepType, TargetSpeed};

const SYS_CLK_MHZ: u32 = 16;
const MAX_SPEED_PPS: u16 = 800;
const SCHED_PERIOD_US: u32 = 10_000;
const SCHED_TICK_US: u32 = 1_000;
const STATUS_PERIOD_MS: u32 = 1_000;

// (shaft speed in deg/s, duration in ms)
const PROFILE: [(f32, u32); 4] = [(30.0, 4_000), (0.0, 1_000), (-60.0, 4_000), (0.0, 1_000)];

// ULN2003 IN1..IN4 on D7..D10
type Coils = CoilPins<PortDPin<7>, PortBPin<0>, PortBPin<1>, PortBPin<2>>;
type Sequencer = StepSequencer<'static, Coils, PulseTimer<SYS_CLK_MHZ>>;

static TARGET_SPEED: TargetSpeed = TargetSpeed::new(MAX_SPEED_PPS);
static SEQUENCER: Mutex<RefCell<Option<Sequencer>>> = Mutex::new(RefCell::new(None));

#[avr_device::entry]
fn main() -> ! {
    let dp = avr_device::atmega328p::Peripherals::take().unwrap();

    let mut serial = SerialWriter::new(dp.USART0);

    let coils = CoilPins::new(
        PortDPin::<7>::into_output(&dp.PORTD),
        PortBPin::<0>::into_output(&dp.PORTB),
        PortBPin::<1>::into_output(&dp.PORTB),
        PortBPin::<2>::into_output(&dp.PORTB),
    );

    let mut sequencer = StepSequencer::new(
        coils,
        &TARGET_SPEED,
        SCHED_PERIOD_US,
        PulseTimer::new(dp.TC1),
    );
    sequencer.set_half_step(true);
    sequencer.step_idle();

    avr_device::interrupt::free(|cs| {
        SEQUENCER.borrow(cs).replace(Some(sequencer));
    });

    let mut sched_timer: SchedTimer<SYS_CLK_MHZ, 64, 249> = SchedTimer::new(dp.TC0);
    sched_timer.init();

    // Enable interrupts globally
    unsafe { avr_device::interrupt::enable() };

    ufmt::uwriteln!(
        &mut serial,
        "uniseq: max {} pps, sched {} us",
        MAX_SPEED_PPS,
        SCHED_PERIOD_US
    )
    .ok();

    let geometry = MotorGeometry::BYJ48;
    let mut segment = 0;
    let mut segment_start_ms = sched_timer.millis();
    let mut last_status_ms = segment_start_ms;

    TARGET_SPEED.set(geometry.pps_from_deg_per_s(PROFILE[0].0, StepType::Step8));

    loop {
        let now_ms = sched_timer.millis();

        let (_, duration_ms) = PROFILE[segment];
        if now_ms.wrapping_sub(segment_start_ms) >= duration_ms {
            segment = (segment + 1) % PROFILE.len();
            segment_start_ms = now_ms;

            let (speed_deg_s, _) = PROFILE[segment];
            TARGET_SPEED.set(geometry.pps_from_deg_per_s(speed_deg_s, StepType::Step8));
        }

        if now_ms.wrapping_sub(last_status_ms) >= STATUS_PERIOD_MS {
            last_status_ms = now_ms;

            let status = avr_device::interrupt::free(|cs| {
                SEQUENCER
                    .borrow(cs)
                    .borrow()
                    .as_ref()
                    .map(|sequencer| sequencer.status())
            });

            if let Some(status) = status {
                ufmt::uwriteln!(&mut serial, "{:?}", status).ok();
            }
        }
    }
}

#[avr_device::interrupt(atmega328p)]
fn TIMER0_COMPA() {
    if timer::tick() % (SCHED_PERIOD_US / SCHED_TICK_US) != 0 {
        return;
    }

    avr_device::interrupt::free(|cs| {
        if let Some(sequencer) = SEQUENCER.borrow(cs).borrow_mut().as_mut() {
            sequencer.update_speed();
        }
    })
}

#[avr_device::interrupt(atmega328p)]
fn TIMER1_COMPA() {
    avr_device::interrupt::free(|cs| {
        if let Some(sequencer) = SEQUENCER.borrow(cs).borrow_mut().as_mut() {
            sequencer.update_pulse();
        }
    })
}
