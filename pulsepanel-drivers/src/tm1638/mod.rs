//! TM1638 LED&KEY panel driver
//!
//! The TM1638 talks a three-wire serial protocol: STB frames a transfer,
//! CLK clocks bits LSB-first, DIO carries data in both directions. DIO must
//! be an open-drain output with a pull-up so the chip can drive it while
//! keys are read.
//!
//! Display RAM holds two bytes per position: even addresses are the digit
//! segments, odd addresses the LED above the digit.

mod font;

pub use font::{segments, SEG_DP};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use pulsepanel_display::{PanelDevice, PanelError, MAX_BRIGHTNESS, PANEL_DIGITS};

/// TM1638 commands
mod cmd {
    /// Data write, auto-incrementing address
    pub const WRITE_INC: u8 = 0x40;
    /// Data write, fixed address
    pub const WRITE_FIXED: u8 = 0x44;
    /// Key scan read
    pub const READ_KEYS: u8 = 0x42;
    /// Display control, brightness in the low three bits
    pub const DISPLAY_ON: u8 = 0x88;
    /// Display RAM base address
    pub const ADDRESS_BASE: u8 = 0xC0;
}

/// Display RAM size in bytes
const RAM_SIZE: usize = 16;

/// Key scan bytes per read
const KEY_BYTES: u8 = 4;

/// Half clock period when running on a fast MCU
const BIT_DELAY_NS: u32 = 1_000;

fn bus<T, E>(result: Result<T, E>) -> Result<T, PanelError> {
    result.map_err(|_| PanelError::Bus)
}

/// TM1638 driver
pub struct Tm1638<STB, CLK, DIO, D> {
    stb: STB,
    clk: CLK,
    dio: DIO,
    delay: D,
    /// Insert a delay around every clock edge
    high_freq: bool,
}

impl<STB, CLK, DIO, D> Tm1638<STB, CLK, DIO, D>
where
    STB: OutputPin,
    CLK: OutputPin,
    DIO: OutputPin + InputPin,
    D: DelayNs,
{
    /// Create a driver without touching the bus
    ///
    /// - `high_freq`: slow the clock down for MCUs that toggle pins faster
    ///   than the TM1638 can follow
    pub fn new(stb: STB, clk: CLK, dio: DIO, delay: D, high_freq: bool) -> Self {
        Self {
            stb,
            clk,
            dio,
            delay,
            high_freq,
        }
    }

    /// Give the pins and delay back
    pub fn release(self) -> (STB, CLK, DIO, D) {
        (self.stb, self.clk, self.dio, self.delay)
    }

    /// Set the raw segments of one digit
    pub fn display_segments(&mut self, position: u8, segments: u8) -> Result<(), PanelError> {
        if position >= PANEL_DIGITS {
            return Err(PanelError::InvalidPosition);
        }
        self.write_at(cmd::ADDRESS_BASE + 2 * position, segments)
    }

    /// Switch the LED above a digit
    pub fn set_led(&mut self, position: u8, on: bool) -> Result<(), PanelError> {
        if position >= PANEL_DIGITS {
            return Err(PanelError::InvalidPosition);
        }
        self.write_at(cmd::ADDRESS_BASE + 2 * position + 1, u8::from(on))
    }

    fn write_at(&mut self, address: u8, value: u8) -> Result<(), PanelError> {
        self.send_command(cmd::WRITE_FIXED)?;
        bus(self.stb.set_low())?;
        self.shift_out(address)?;
        self.shift_out(value)?;
        bus(self.stb.set_high())
    }

    fn send_command(&mut self, command: u8) -> Result<(), PanelError> {
        bus(self.stb.set_low())?;
        self.shift_out(command)?;
        bus(self.stb.set_high())
    }

    fn bit_delay(&mut self) {
        if self.high_freq {
            self.delay.delay_ns(BIT_DELAY_NS);
        }
    }

    fn shift_out(&mut self, byte: u8) -> Result<(), PanelError> {
        for bit in 0..8 {
            if byte & (1 << bit) != 0 {
                bus(self.dio.set_high())?;
            } else {
                bus(self.dio.set_low())?;
            }
            bus(self.clk.set_high())?;
            self.bit_delay();
            bus(self.clk.set_low())?;
            self.bit_delay();
        }
        Ok(())
    }

    fn shift_in(&mut self) -> Result<u8, PanelError> {
        let mut byte = 0;
        for bit in 0..8 {
            bus(self.clk.set_high())?;
            self.bit_delay();
            if bus(self.dio.is_high())? {
                byte |= 1 << bit;
            }
            bus(self.clk.set_low())?;
            self.bit_delay();
        }
        Ok(byte)
    }
}

impl<STB, CLK, DIO, D> PanelDevice for Tm1638<STB, CLK, DIO, D>
where
    STB: OutputPin,
    CLK: OutputPin,
    DIO: OutputPin + InputPin,
    D: DelayNs,
{
    fn init(&mut self) -> Result<(), PanelError> {
        bus(self.stb.set_high())?;
        bus(self.clk.set_low())?;
        bus(self.dio.set_low())?;
        self.send_command(cmd::DISPLAY_ON | MAX_BRIGHTNESS)
    }

    fn reset(&mut self) -> Result<(), PanelError> {
        self.send_command(cmd::WRITE_INC)?;
        bus(self.stb.set_low())?;
        self.shift_out(cmd::ADDRESS_BASE)?;
        for _ in 0..RAM_SIZE {
            self.shift_out(0)?;
        }
        bus(self.stb.set_high())
    }

    fn set_brightness(&mut self, level: u8) -> Result<(), PanelError> {
        self.send_command(cmd::DISPLAY_ON | level.min(MAX_BRIGHTNESS))
    }

    fn write_text(&mut self, text: &str) -> Result<(), PanelError> {
        let mut chars = text.chars().peekable();
        let mut position = 0;

        while position < PANEL_DIGITS {
            let Some(c) = chars.next() else {
                break;
            };
            let mut pattern = if c.is_ascii() { segments(c as u8) } else { 0 };
            // A following '.' lights this digit's decimal point
            if chars.peek() == Some(&'.') {
                chars.next();
                pattern |= SEG_DP;
            }
            self.display_segments(position, pattern)?;
            position += 1;
        }
        Ok(())
    }

    fn read_buttons(&mut self) -> Result<u8, PanelError> {
        bus(self.stb.set_low())?;
        self.shift_out(cmd::READ_KEYS)?;
        // Release DIO so the chip can drive it
        bus(self.dio.set_high())?;
        self.bit_delay();

        let mut buttons = 0u8;
        for i in 0..KEY_BYTES {
            buttons |= self.shift_in()? << i;
        }

        bus(self.stb.set_high())?;
        Ok(buttons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use embedded_hal::digital::{ErrorKind, ErrorType};
    use pulsepanel_display::PanelController;
    use pulsepanel_protocol::DisplayMode;
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Debug)]
    struct MockError;

    impl embedded_hal::digital::Error for MockError {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    /// Shared bus state decoding STB-framed transfers
    #[derive(Default)]
    struct Bus {
        dio: bool,
        /// Bytes of the transfer in progress
        window: Option<Vec<u8>>,
        bit_count: u8,
        /// Completed transfers
        transfers: Vec<Vec<u8>>,
        /// Bytes the chip answers with on key reads
        responses: VecDeque<u8>,
        response_bit: u8,
        delays: u32,
        fail: bool,
    }

    impl Bus {
        fn stb(&mut self, high: bool) {
            if high {
                if let Some(window) = self.window.take() {
                    self.transfers.push(window);
                }
            } else {
                self.window = Some(Vec::new());
                self.bit_count = 0;
            }
        }

        fn clk_rise(&mut self) {
            let Some(window) = self.window.as_mut() else {
                return;
            };
            if self.bit_count % 8 == 0 {
                window.push(0);
            }
            if self.dio {
                if let Some(last) = window.last_mut() {
                    *last |= 1 << (self.bit_count % 8);
                }
            }
            self.bit_count += 1;
        }

        fn read_bit(&mut self) -> bool {
            let Some(&byte) = self.responses.front() else {
                return false;
            };
            let high = byte & (1 << self.response_bit) != 0;
            self.response_bit += 1;
            if self.response_bit == 8 {
                self.response_bit = 0;
                self.responses.pop_front();
            }
            high
        }
    }

    #[derive(Clone, Copy)]
    enum Line {
        Stb,
        Clk,
        Dio,
    }

    struct MockPin {
        bus: Rc<RefCell<Bus>>,
        line: Line,
    }

    impl MockPin {
        fn set(&mut self, high: bool) -> Result<(), MockError> {
            let mut bus = self.bus.borrow_mut();
            if bus.fail {
                return Err(MockError);
            }
            match self.line {
                Line::Stb => bus.stb(high),
                Line::Clk => {
                    if high {
                        bus.clk_rise();
                    }
                }
                Line::Dio => bus.dio = high,
            }
            Ok(())
        }
    }

    impl ErrorType for MockPin {
        type Error = MockError;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.set(false)
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.set(true)
        }
    }

    impl InputPin for MockPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.bus.borrow_mut().read_bit())
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            self.is_high().map(|high| !high)
        }
    }

    struct MockDelay {
        bus: Rc<RefCell<Bus>>,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, _ns: u32) {
            self.bus.borrow_mut().delays += 1;
        }
    }

    type MockTm1638 = Tm1638<MockPin, MockPin, MockPin, MockDelay>;

    fn setup(high_freq: bool) -> (MockTm1638, Rc<RefCell<Bus>>) {
        let bus = Rc::new(RefCell::new(Bus::default()));
        let pin = |line| MockPin {
            bus: bus.clone(),
            line,
        };
        let delay = MockDelay { bus: bus.clone() };
        let panel = Tm1638::new(pin(Line::Stb), pin(Line::Clk), pin(Line::Dio), delay, high_freq);
        (panel, bus)
    }

    fn transfers(bus: &Rc<RefCell<Bus>>) -> Vec<Vec<u8>> {
        core::mem::take(&mut bus.borrow_mut().transfers)
    }

    /// Expected transfers for fixed-address digit writes
    fn digit_writes(patterns: &[u8]) -> Vec<Vec<u8>> {
        patterns
            .iter()
            .enumerate()
            .flat_map(|(i, &p)| [vec![0x44], vec![0xC0 + 2 * i as u8, p]])
            .collect()
    }

    #[test]
    fn test_init_activates_display() {
        let (mut panel, bus) = setup(false);
        panel.init().unwrap();
        assert_eq!(transfers(&bus), vec![vec![0x8F]]);
    }

    #[test]
    fn test_reset_clears_ram() {
        let (mut panel, bus) = setup(false);
        panel.reset().unwrap();

        let mut expected = vec![0xC0];
        expected.extend([0u8; 16]);
        assert_eq!(transfers(&bus), vec![vec![0x40], expected]);
    }

    #[test]
    fn test_brightness_clamped() {
        let (mut panel, bus) = setup(false);
        panel.set_brightness(2).unwrap();
        panel.set_brightness(0).unwrap();
        panel.set_brightness(200).unwrap();
        assert_eq!(transfers(&bus), vec![vec![0x8A], vec![0x88], vec![0x8F]]);
    }

    #[test]
    fn test_write_text() {
        let (mut panel, bus) = setup(false);
        panel.write_text("Ld000123").unwrap();
        assert_eq!(
            transfers(&bus),
            digit_writes(&[0x38, 0x5E, 0x3F, 0x3F, 0x3F, 0x06, 0x5B, 0x4F])
        );
    }

    #[test]
    fn test_write_text_decimal_point() {
        let (mut panel, bus) = setup(false);
        panel.write_text("1.2").unwrap();
        assert_eq!(transfers(&bus), digit_writes(&[0x06 | SEG_DP, 0x5B]));
    }

    #[test]
    fn test_write_text_truncates() {
        let (mut panel, bus) = setup(false);
        panel.write_text("123456789").unwrap();
        assert_eq!(transfers(&bus).len(), 16);
    }

    #[test]
    fn test_led_addresses() {
        let (mut panel, bus) = setup(false);
        panel.set_led(0, true).unwrap();
        panel.set_led(7, false).unwrap();
        assert_eq!(
            transfers(&bus),
            vec![vec![0x44], vec![0xC1, 1], vec![0x44], vec![0xCF, 0]]
        );
    }

    #[test]
    fn test_invalid_position() {
        let (mut panel, bus) = setup(false);
        assert_eq!(panel.set_led(8, true), Err(PanelError::InvalidPosition));
        assert_eq!(
            panel.display_segments(8, 0x3F),
            Err(PanelError::InvalidPosition)
        );
        assert!(transfers(&bus).is_empty());
    }

    #[test]
    fn test_read_buttons() {
        let (mut panel, bus) = setup(false);
        // S1 in byte 0, S7 in byte 2 (upper nibble), S4 in byte 3
        bus.borrow_mut().responses = VecDeque::from([0x01, 0x00, 0x10, 0x01]);

        let buttons = panel.read_buttons().unwrap();
        assert_eq!(buttons, 0b0100_1001);

        let transfers = transfers(&bus);
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0][0], 0x42);
    }

    #[test]
    fn test_dio_released_after_key_read() {
        let (mut panel, bus) = setup(false);
        panel.read_buttons().unwrap();
        assert!(bus.borrow().dio);

        let (_stb, _clk, dio, _delay) = panel.release();
        assert!(matches!(dio.line, Line::Dio));
    }

    #[test]
    fn test_delay_only_when_high_freq() {
        let (mut slow, slow_bus) = setup(false);
        slow.write_text("8").unwrap();
        assert_eq!(slow_bus.borrow().delays, 0);

        let (mut fast, fast_bus) = setup(true);
        fast.write_text("8").unwrap();
        // Two per bit, three bytes
        assert_eq!(fast_bus.borrow().delays, 2 * 8 * 3);
    }

    #[test]
    fn test_bus_error() {
        let (mut panel, bus) = setup(false);
        bus.borrow_mut().fail = true;
        assert_eq!(panel.init(), Err(PanelError::Bus));
        assert_eq!(panel.write_text("1"), Err(PanelError::Bus));
    }

    #[test]
    fn test_controller_over_tm1638() {
        let (panel, bus) = setup(true);
        let mut controller = PanelController::new(panel, 'r');

        controller.begin().unwrap();
        let setup_transfers = transfers(&bus);
        assert_eq!(setup_transfers.first(), Some(&vec![0x8F]));
        assert_eq!(setup_transfers.last(), Some(&vec![0x8A]));

        controller.render_value(-5, DisplayMode::ForwardOnly).unwrap();
        assert_eq!(
            transfers(&bus),
            digit_writes(&[0x50, 0x71, 0x40, 0x3F, 0x3F, 0x3F, 0x3F, 0x6D])
        );
    }
}
