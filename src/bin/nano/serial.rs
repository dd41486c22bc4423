use avr_device::atmega328p::USART0;
use core::convert::Infallible;
use ufmt::uWrite;

/// Blocking transmit-only USART0 writer.
pub struct SerialWriter {
    usart: USART0,
}

impl SerialWriter {
    /// 115200 baud at 16 MHz with double speed enabled.
    const UBRR_115200: u16 = 16;

    pub fn new(usart: USART0) -> Self {
        usart.ubrr0.write(|w| unsafe { w.bits(Self::UBRR_115200) });
        usart.ucsr0a.write(|w| w.u2x0().set_bit());
        // UCSR0C keeps its reset value: 8N1
        usart.ucsr0b.write(|w| w.txen0().set_bit());

        Self { usart }
    }

    fn write_byte(&mut self, byte: u8) {
        while self.usart.ucsr0a.read().udre0().bit_is_clear() {}

        self.usart.udr0.write(|w| unsafe { w.bits(byte) });
    }
}

impl uWrite for SerialWriter {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        for byte in s.bytes() {
            self.write_byte(byte);
        }
        Ok(())
    }
}
