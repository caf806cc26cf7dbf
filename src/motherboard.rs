// The VM driver: wires a Cpu to an Mmunit and drives them one CPU instruction at a time,
// syncing the joypad from a shared `KeyPort` snapshot at every instruction boundary and handing
// back a composed frame once per VBlank.
use super::cartridge::Cartridge;
use super::cpu::Cpu;
use super::joypad::KeyPort;
use super::mmunit::Mmunit;
use super::pixelmap::PixelMap;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

pub struct Vm {
    cpu: Cpu,
    mmu: Mmunit,
    keys: Arc<KeyPort>,
}

impl Vm {
    pub fn power_up(cartridge: Cartridge, boot_rom: Option<[u8; 0x100]>, keys: Arc<KeyPort>) -> Self {
        Self { cpu: Cpu::power_up(), mmu: Mmunit::power_up(cartridge, boot_rom), keys }
    }

    // Runs exactly one CPU instruction (interrupt dispatch counts as one), syncing the joypad
    // first so a key event observed before this instruction can be reflected in it. Returns the
    // composed frame the instant the PPU finishes VBlank, `None` every other step.
    pub fn step(&mut self) -> Option<PixelMap> {
        let (direction, button) = self.keys.snapshot();
        self.mmu.sync_joypad(direction, button);
        let clocks = self.cpu.step(&mut self.mmu);
        if self.mmu.advance(clocks) {
            self.mmu.request_vblank();
            return Some(self.mmu.gpu.compose_frame());
        }
        None
    }

    pub fn title(&self) -> String {
        self.mmu.cartridge.title()
    }

    // Disables the per-instruction opcode trace (on by default, matching the teacher's debug
    // build convention) - see the `-n` flag in main.rs.
    pub fn set_trace(&mut self, trace: bool) {
        self.cpu.trace = trace;
    }
}

// Implemented by whatever owns the window. `prepare` opens it and hands back whether that
// succeeded; `run` then owns the presentation loop until the window closes, pulling frames off
// the bounded channel and publishing key transitions to the shared `KeyPort`. Kept separate from
// `Vm` so the emulation thread never has to know how frames get on screen.
pub trait Displayer {
    fn prepare(&mut self, keys: Arc<KeyPort>) -> bool;
    fn push_frame(&mut self, frame: PixelMap);
    fn run(&mut self, frames: Receiver<PixelMap>);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge;

    fn rom() -> Vec<u8> {
        let mut rom = vec![0x00; 0x8000];
        #[rustfmt::skip]
        let logo: [u8; 48] = [
            0xce, 0xed, 0x66, 0x66, 0xcc, 0x0d, 0x00, 0x0b, 0x03, 0x73, 0x00, 0x83, 0x00, 0x0c, 0x00, 0x0d,
            0x00, 0x08, 0x11, 0x1f, 0x88, 0x89, 0x00, 0x0e, 0xdc, 0xcc, 0x6e, 0xe6, 0xdd, 0xdd, 0xd9, 0x99,
            0xbb, 0xbb, 0x67, 0x63, 0x6e, 0x0e, 0xec, 0xcc, 0xdd, 0xdc, 0x99, 0x9f, 0xbb, 0xb9, 0x33, 0x3e,
        ];
        rom[0x104..0x134].copy_from_slice(&logo);
        rom[0x147] = 0x00;
        rom[0x148] = 0x00;
        rom[0x149] = 0x00;
        // 0x00 fill means the program counter runs into an endless stream of NOPs, which is
        // enough to exercise clock accounting without needing a real program.
        let sum: u8 = rom[0x134..0x14d].iter().fold(0u8, |x, &b| x.wrapping_sub(b).wrapping_sub(1));
        rom[0x14d] = sum;
        rom
    }

    #[test]
    fn stepping_a_nop_program_advances_the_clock_without_producing_a_frame() {
        let cart = cartridge::load_bytes(rom()).unwrap();
        let keys = Arc::new(KeyPort::new());
        let mut vm = Vm::power_up(cart, None, keys);
        assert!(vm.step().is_none());
    }

    #[test]
    fn a_full_frames_worth_of_nops_yields_exactly_one_frame() {
        let cart = cartridge::load_bytes(rom()).unwrap();
        let keys = Arc::new(KeyPort::new());
        let mut vm = Vm::power_up(cart, None, keys);
        let mut frames = 0;
        // NOP costs 1 M-cycle (4 clocks); 70224 clocks make a frame, so at most ~17556 steps.
        for _ in 0..20_000 {
            if vm.step().is_some() {
                frames += 1;
            }
        }
        assert_eq!(frames, 1);
    }
}
