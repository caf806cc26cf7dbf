// The eight GameBoy buttons/direction keys are arranged as two 4-bit rows. Select either row by
// writing to this register, then read back bits 0-3; a 1 bit means released.
//
// FF00 - P1/JOYP - Joypad (R/W)
//
// Bit 7 - Not used
// Bit 6 - Not used
// Bit 5 - Select Button Keys    (0=Select)
// Bit 4 - Select Direction Keys (0=Select)
// Bit 3 - Down  or Start  (0=Pressed) (Read Only)
// Bit 2 - Up    or Select (0=Pressed) (Read Only)
// Bit 1 - Left  or B      (0=Pressed) (Read Only)
// Bit 0 - Right or A      (0=Pressed) (Read Only)
use super::memory::Memory;
use std::sync::atomic::{AtomicU8, Ordering};

#[rustfmt::skip]
#[derive(Clone, Copy)]
pub enum JoypadKey {
    Right  = 0,
    Left   = 1,
    Up     = 2,
    Down   = 3,
    A      = 0x10,
    B      = 0x11,
    Select = 0x12,
    Start  = 0x13,
}

#[derive(Clone, Copy, Eq, PartialEq)]
enum Select {
    Direction,
    Button,
    None,
}

pub struct Joypad {
    select: Select,
    direction: u8,
    button: u8,
}

impl Joypad {
    pub fn power_up() -> Self {
        Self { select: Select::None, direction: 0x0f, button: 0x0f }
    }

    // Returns true if the press should request the Joypad interrupt (a row bit transitions
    // from released to pressed).
    pub fn update_key(&mut self, key: JoypadKey, pressed: bool) -> bool {
        let row = key as u8;
        let bit = row & 0x0f;
        let button_row = row & 0x10 != 0x00;
        let flags = if button_row { &mut self.button } else { &mut self.direction };
        let was_pressed = *flags & (1 << bit) == 0x00;
        if pressed {
            *flags &= !(1 << bit);
        } else {
            *flags |= 1 << bit;
        }
        pressed && !was_pressed
    }

    // Replaces both rows with a freshly observed snapshot (see `KeyPort`) and reports whether
    // any bit went from released to pressed, so the caller can request the Joypad interrupt.
    pub fn sync(&mut self, direction: u8, button: u8) -> bool {
        let newly_pressed = (self.direction & !direction) | (self.button & !button);
        self.direction = direction;
        self.button = button;
        newly_pressed != 0
    }
}

// The presentation side of the key-event channel described in the design: two plain bytes, one
// per row, updated a bit at a time by the host and read back wholesale by the emulation thread
// once per instruction boundary. Row-granular writes plus relaxed loads/stores are sufficient
// here, since there's no multi-field invariant to protect, so no lock is needed.
pub struct KeyPort {
    direction: AtomicU8,
    button: AtomicU8,
}

impl KeyPort {
    pub fn new() -> Self {
        Self { direction: AtomicU8::new(0x0f), button: AtomicU8::new(0x0f) }
    }

    // Called by the host (presentation activity) on every key transition.
    pub fn update(&self, key: JoypadKey, pressed: bool) {
        let row = key as u8;
        let bit = row & 0x0f;
        let cell = if row & 0x10 != 0x00 { &self.button } else { &self.direction };
        if pressed {
            cell.fetch_and(!(1 << bit), Ordering::Relaxed);
        } else {
            cell.fetch_or(1 << bit, Ordering::Relaxed);
        }
    }

    // Called by the emulation activity; returns (direction, button).
    pub fn snapshot(&self) -> (u8, u8) {
        (self.direction.load(Ordering::Relaxed), self.button.load(Ordering::Relaxed))
    }
}

impl Default for KeyPort {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory for Joypad {
    fn get(&self, a: u16) -> u8 {
        assert_eq!(a, 0xff00);
        match self.select {
            Select::Direction => 0b0001_0000 | self.direction,
            Select::Button => 0b0010_0000 | self.button,
            Select::None => 0x3f,
        }
    }

    fn set(&mut self, a: u16, v: u8) {
        assert_eq!(a, 0xff00);
        self.select = if v & 0b0001_0000 == 0x00 {
            Select::Direction
        } else if v & 0b0010_0000 == 0x00 {
            Select::Button
        } else {
            Select::None
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_selected_reads_as_0x3f() {
        let j = Joypad::power_up();
        assert_eq!(j.get(0xff00), 0x3f);
    }

    #[test]
    fn pressing_clears_the_row_bit_and_releasing_sets_it_back() {
        let mut j = Joypad::power_up();
        j.set(0xff00, 0b1110_1111); // select direction row
        assert!(j.update_key(JoypadKey::Down, true));
        assert_eq!(j.get(0xff00) & 0x0f, 0b0111);
        assert!(!j.update_key(JoypadKey::Down, true));
        assert!(!j.update_key(JoypadKey::Down, false));
        assert_eq!(j.get(0xff00) & 0x0f, 0x0f);
    }

    #[test]
    fn rows_are_independent() {
        let mut j = Joypad::power_up();
        j.update_key(JoypadKey::A, true);
        j.set(0xff00, 0b1101_1111); // select button row
        assert_eq!(j.get(0xff00) & 0x0f, 0b1110);
    }

    #[test]
    fn key_port_publishes_row_bytes_read_back_verbatim() {
        let port = KeyPort::new();
        assert_eq!(port.snapshot(), (0x0f, 0x0f));
        port.update(JoypadKey::Up, true);
        port.update(JoypadKey::Start, true);
        let (direction, button) = port.snapshot();
        assert_eq!(direction, 0b1011);
        assert_eq!(button, 0b0111);
    }

    #[test]
    fn sync_detects_a_release_to_press_transition() {
        let mut j = Joypad::power_up();
        assert!(!j.sync(0x0f, 0x0f));
        assert!(j.sync(0x0e, 0x0f)); // direction bit 0 newly pressed
        assert!(!j.sync(0x0e, 0x0f)); // unchanged, no new press
        assert!(!j.sync(0x0f, 0x0f)); // release generates no interrupt
    }
}
