//! Contains the top-level machine that owns the CPU and bus and
//! drives them one frame at a time.

use std::time::{Duration, Instant};

use crate::{bus::Bus, cpu::Cpu, joypad::GbKey};

/// Target frame interval for 59.73 Hz, the DMG's real refresh rate.
const FRAME_DURATION: Duration = Duration::from_nanos(16_742_706);

/// Wraps all the individual components of the Game Boy and coordinates
/// the single-threaded cooperative tick: the CPU drives every bus
/// access, which in turn ticks the timers, PPU and APU by one M-cycle.
pub struct GameBoy {
    /// The Sharp SM83 CPU.
    cpu: Cpu,

    /// The memory bus interface, owning every peripheral.
    bus: Bus,

    /// Wall-clock time the previous frame's VBLANK was entered at.
    last_frame_at: Instant,

    /// Frames rendered since the last once-a-second diagnostic report.
    frames_this_second: u32,

    /// Wall-clock time the last once-a-second report was made at.
    last_report_at: Instant,
}

impl GameBoy {
    /// Create a new `GameBoy` instance for the given ROM image.
    pub fn new(rom_buffer: &[u8], audio_callback: Box<dyn FnMut(&[i16]) + Send>) -> Self {
        let now = Instant::now();

        Self {
            cpu: Cpu::new(),
            bus: Bus::new(rom_buffer, audio_callback),
            last_frame_at: now,
            frames_this_second: 0,
            last_report_at: now,
        }
    }

    /// Return the title of the game.
    pub fn game_title(&self) -> String {
        self.bus.cartridge.game_title()
    }

    /// Skip the Game Boy bootrom, initializing registers the way
    /// hardware leaves them at 0x0100.
    pub fn skip_bootrom(&mut self) {
        self.cpu.skip_bootrom();
        self.bus.skip_bootrom();
    }

    /// Get a reference to the rendered framebuffer. Valid once a full
    /// frame has been produced by `execute_frame`.
    pub fn get_framebuffer(&self) -> &[u8] {
        self.bus.ppu.framebuffer.as_ref()
    }

    /// Redirects to the joypad interface.
    pub fn key_down(&mut self, key: GbKey) {
        self.bus.joypad.key_down(key);
    }

    /// Redirects to the joypad interface.
    pub fn key_up(&mut self, key: GbKey) {
        self.bus.joypad.key_up(key);
    }

    /// Execute instructions until a full frame has been produced (the
    /// PPU entered VBLANK), then pace to 60 fps. Call this once per
    /// host display refresh.
    pub fn execute_frame(&mut self) {
        loop {
            self.cpu.step(&mut self.bus);

            if self.bus.take_vblank() {
                break;
            }
        }

        self.pace_frame();
    }

    /// Sleep off whatever time remains of the 59.73 Hz frame budget,
    /// and once a second, report how many frames were actually
    /// rendered (diagnostics only; does not affect emulation).
    fn pace_frame(&mut self) {
        let elapsed = self.last_frame_at.elapsed();

        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }

        self.last_frame_at = Instant::now();
        self.frames_this_second += 1;

        if self.last_report_at.elapsed() >= Duration::from_secs(1) {
            log::debug!("{} frames in the last second", self.frames_this_second);

            self.frames_this_second = 0;
            self.last_report_at = Instant::now();
        }
    }
}
