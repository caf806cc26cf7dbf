// Note: Game BoyTM, Game Boy PocketTM, Super Game BoyTM and Game Boy ColorTM are registered trademarks of
// Nintendo CO., LTD. © 1989 to 1999 by Nintendo CO., LTD.
use gameboy::cartridge::Cartridge;
use gameboy::gpu::{SCREEN_H, SCREEN_W};
use gameboy::joypad::{JoypadKey, KeyPort};
use gameboy::motherboard::{Displayer, Vm};
use gameboy::pixelmap::PixelMap;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

// Presentation paces itself to roughly 66 fps; anything faster just burns CPU redrawing a frame
// nobody asked for yet.
const MIN_FRAME_MILLIS: u64 = 15;

fn main() {
    rog::reg("gameboy");
    rog::reg("gameboy::cartridge");

    let mut rom = String::new();
    let mut no_trace = false;
    {
        let mut ap = argparse::ArgumentParser::new();
        ap.set_description("Gameboy emulator");
        ap.refer(&mut no_trace).add_option(
            &["-n", "--no-trace"],
            argparse::StoreTrue,
            "Disable the per-instruction opcode trace",
        );
        ap.refer(&mut rom).add_argument("rom", argparse::Store, "Rom path");
        ap.parse_args_or_exit();
    }

    if rom.is_empty() {
        rog::println!("Usage: gameboy [-n] <rom>");
        std::process::exit(-2);
    }

    let cartridge = match gameboy::cartridge::load(&rom) {
        Some(c) => c,
        None => {
            rog::println!("Could not load cartridge from {}", rom);
            std::process::exit(-1);
        }
    };
    let title = cartridge.title();

    let keys = Arc::new(KeyPort::new());
    let (frame_tx, frame_rx) = sync_channel::<PixelMap>(3);

    let emu_keys = keys.clone();
    thread::spawn(move || run_emulation(cartridge, emu_keys, !no_trace, frame_tx));

    let mut display = MinifbDisplay::new(&title);
    if display.prepare(keys.clone()) {
        display.run(frame_rx);
    }
}

// Runs the emulation loop on its own thread: steps the Vm forever, sending a composed frame
// through the bounded channel every time one completes. The channel's small bound (3) gives
// implicit backpressure - if presentation falls behind, emulation blocks on `send` rather than
// piling up frames in memory.
fn run_emulation(cartridge: Cartridge, keys: Arc<KeyPort>, trace: bool, frame_tx: SyncSender<PixelMap>) {
    let mut vm = Vm::power_up(cartridge, None, keys);
    vm.set_trace(trace);
    loop {
        if let Some(frame) = vm.step() {
            if frame_tx.send(frame).is_err() {
                return;
            }
        }
    }
}

struct MinifbDisplay {
    title: String,
    window: Option<minifb::Window>,
    keys: Option<Arc<KeyPort>>,
    buffer: Vec<u32>,
}

impl MinifbDisplay {
    fn new(title: &str) -> Self {
        Self { title: title.to_string(), window: None, keys: None, buffer: vec![0x00; SCREEN_W * SCREEN_H] }
    }
}

impl Displayer for MinifbDisplay {
    fn prepare(&mut self, keys: Arc<KeyPort>) -> bool {
        let mut options = minifb::WindowOptions::default();
        options.resize = true;
        options.scale = minifb::Scale::X2;
        match minifb::Window::new(format!("Gameboy - {}", self.title).as_str(), SCREEN_W, SCREEN_H, options) {
            Ok(w) => {
                self.window = Some(w);
                self.keys = Some(keys);
                true
            }
            Err(e) => {
                rog::println!("Could not open window: {}", e);
                false
            }
        }
    }

    fn push_frame(&mut self, frame: PixelMap) {
        render(&frame, &mut self.buffer);
        if let Some(window) = &mut self.window {
            window.update_with_buffer(&self.buffer).unwrap();
        }
    }

    fn run(&mut self, frame_rx: Receiver<PixelMap>) {
        const KEY_MAP: [(minifb::Key, JoypadKey); 8] = [
            (minifb::Key::Right, JoypadKey::Right),
            (minifb::Key::Left, JoypadKey::Left),
            (minifb::Key::Up, JoypadKey::Up),
            (minifb::Key::Down, JoypadKey::Down),
            (minifb::Key::Z, JoypadKey::A),
            (minifb::Key::X, JoypadKey::B),
            (minifb::Key::Space, JoypadKey::Select),
            (minifb::Key::Enter, JoypadKey::Start),
        ];

        loop {
            let frame_start = Instant::now();
            {
                let window = match &mut self.window {
                    Some(w) => w,
                    None => return,
                };
                if !window.is_open() || window.is_key_down(minifb::Key::Escape) {
                    return;
                }
                if let Some(keys) = &self.keys {
                    for (rk, vk) in KEY_MAP.iter() {
                        keys.update(*vk, window.is_key_down(*rk));
                    }
                }
            }
            match frame_rx.recv_timeout(Duration::from_millis(MIN_FRAME_MILLIS)) {
                Ok(frame) => self.push_frame(frame),
                Err(_) => {
                    if let Some(window) = &mut self.window {
                        window.update();
                    }
                }
            }
            let elapsed = frame_start.elapsed();
            if elapsed < Duration::from_millis(MIN_FRAME_MILLIS) {
                thread::sleep(Duration::from_millis(MIN_FRAME_MILLIS) - elapsed);
            }
        }
    }
}

// Each pixel is a 2-bit shade index (0 = lightest); expand to a grayscale ARGB word for minifb.
fn render(frame: &PixelMap, buffer: &mut [u32]) {
    for y in 0..frame.height() {
        for x in 0..frame.width() {
            let shade = frame.get(x, y);
            let level = 255 - (u32::from(shade) * 255 / 3);
            buffer[y * frame.width() + x] = 0xff00_0000 | (level << 16) | (level << 8) | level;
        }
    }
}
