// The boot ROM occupies 0x0000-0x00FF until the game writes any non-zero value to the
// boot-disable port (FF50), at which point it detaches permanently and the cartridge takes
// over that range. The port keeps reading back whatever was written, even after detaching.
//
// See: http://www.pastraiser.com/cpu/gameboy/gameboy_opcodes.html (0x0000 is usually `jp 0x0100`
// once the boot ROM hands off) and Pan Docs' "Power Up Sequence".
use super::memory::Memory;

pub struct BootRom {
    data: [u8; 0x100],
    active: bool,
    disable: u8,
}

impl BootRom {
    // `data` is `None` when the host has no boot ROM image to supply; the unit starts
    // detached and reads of 0x0000-0x00FF fall through to the cartridge.
    pub fn power_up(data: Option<[u8; 0x100]>) -> Self {
        match data {
            Some(data) => Self { data, active: true, disable: 0x00 },
            None => Self { data: [0x00; 0x100], active: false, disable: 0x01 },
        }
    }

    pub fn active(&self) -> bool {
        self.active
    }
}

impl Memory for BootRom {
    fn get(&self, a: u16) -> u8 {
        match a {
            0x0000..=0x00ff => self.data[a as usize],
            0xff50 => self.disable,
            _ => unreachable!("boot rom does not own {:04x}", a),
        }
    }

    fn set(&mut self, a: u16, v: u8) {
        match a {
            0x0000..=0x00ff => {}
            0xff50 => {
                self.disable = v;
                if v != 0x00 {
                    self.active = false;
                }
            }
            _ => unreachable!("boot rom does not own {:04x}", a),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detaches_on_nonzero_write_and_retains_the_written_byte() {
        let mut b = BootRom::power_up(Some([0xaa; 0x100]));
        assert!(b.active());
        b.set(0xff50, 0x01);
        assert!(!b.active());
        assert_eq!(b.get(0xff50), 0x01);
    }

    #[test]
    fn zero_write_does_not_detach() {
        let mut b = BootRom::power_up(Some([0x00; 0x100]));
        b.set(0xff50, 0x00);
        assert!(b.active());
        assert_eq!(b.get(0xff50), 0x00);
    }

    #[test]
    fn absent_boot_rom_starts_detached_and_reads_back_disabled() {
        let b = BootRom::power_up(None);
        assert!(!b.active());
        assert_eq!(b.get(0xff50), 0x01);
    }
}
