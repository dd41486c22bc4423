use avr_device::atmega328p::{PORTB, PORTD};
use core::convert::Infallible;
use embedded_hal::digital::{ErrorType, OutputPin};

macro_rules! port_pin {
    ($Pin:ident, $PORT:ident, $port:ident, $ddr:ident) => {
        /// Bit `BIT` of the port, configured as an output.
        pub struct $Pin<const BIT: u8>;

        impl<const BIT: u8> $Pin<BIT> {
            const MASK: u8 = 1 << BIT;

            pub fn into_output(port: &$PORT) -> Self {
                port.$port
                    .modify(|r, w| unsafe { w.bits(r.bits() & !Self::MASK) });
                port.$ddr
                    .modify(|r, w| unsafe { w.bits(r.bits() | Self::MASK) });
                Self
            }
        }

        impl<const BIT: u8> ErrorType for $Pin<BIT> {
            type Error = Infallible;
        }

        impl<const BIT: u8> OutputPin for $Pin<BIT> {
            fn set_low(&mut self) -> Result<(), Self::Error> {
                // The output pins are only written from interrupt handlers after init.
                let port = unsafe { &*$PORT::ptr() };
                port.$port
                    .modify(|r, w| unsafe { w.bits(r.bits() & !Self::MASK) });
                Ok(())
            }

            fn set_high(&mut self) -> Result<(), Self::Error> {
                let port = unsafe { &*$PORT::ptr() };
                port.$port
                    .modify(|r, w| unsafe { w.bits(r.bits() | Self::MASK) });
                Ok(())
            }
        }
    };
}

port_pin!(PortBPin, PORTB, portb, ddrb);
port_pin!(PortDPin, PORTD, portd, ddrd);
