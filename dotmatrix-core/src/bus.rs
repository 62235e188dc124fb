//! Contains implementation of the Game Boy memory bus interface.
//!
//! The bus owns every memory-mapped peripheral (cartridge, work RAM,
//! high RAM, timers, PPU, APU, joypad) and is the single place address
//! decoding happens; the PPU/APU only ever see their own MMIO ranges
//! through the dispatch here, plus the direct VRAM/OAM accessors the
//! PPU exposes for its own use.

use crate::apu::Apu;
use crate::cartridge::{load_cartridge, Cartridge};
use crate::joypad::Joypad;
use crate::ppu::{Ppu, PpuEvent};
use crate::timers::Timers;

/// The Game Boy memory bus.
pub struct Bus {
    /// The inserted cartridge (ROM + MBC + external RAM).
    pub cartridge: Box<dyn Cartridge>,

    /// 8 KB of Work RAM, mapped to 0xC000-0xDFFF (and echoed at
    /// 0xE000-0xFDFF).
    work_ram: Box<[u8; 0x2000]>,

    /// High RAM, mapped to 0xFF80-0xFFFE.
    high_ram: Box<[u8; 0x7F]>,

    /// DIV/TIMA/TMA/TAC.
    timers: Timers,

    /// VRAM, OAM and the pixel pipeline.
    pub ppu: Ppu,

    /// The four sound channels, frame sequencer and mixer.
    apu: Apu,

    /// P1/JOYP.
    pub joypad: Joypad,

    /// $FF0F - IF register. Bits set here request the corresponding
    /// interrupt; the CPU clears a bit once it services it.
    pub if_flag: u8,

    /// $FFFF - IE register. Bits set here permit the corresponding
    /// interrupt to be serviced.
    pub ie_flag: u8,

    /// Latched by `tick` when the PPU reports `EnteredVblank`; consumed
    /// by the top-level frame driver once per `execute_frame` call so
    /// it knows when to pace to 60 fps without the PPU itself touching
    /// host time.
    vblank_latch: bool,
}

impl Bus {
    /// Create a new `Bus` instance for the given ROM image.
    pub fn new(rom_buffer: &[u8], audio_callback: Box<dyn FnMut(&[i16]) + Send>) -> Self {
        Self {
            cartridge: load_cartridge(rom_buffer),
            work_ram: Box::new([0; 0x2000]),
            high_ram: Box::new([0; 0x7F]),
            timers: Timers::new(),
            ppu: Ppu::new(),
            apu: Apu::new(audio_callback),
            joypad: Joypad::new(),
            if_flag: 0,
            ie_flag: 0,
            vblank_latch: false,
        }
    }

    /// Read a byte from the given address. Does not tick the rest of
    /// the machine; callers (the CPU) do that explicitly via `tick`.
    pub fn read_byte(&self, addr: u16) -> u8 {
        match addr {
            // ROM banks, rerouted to the cartridge/MBC.
            0x0000..=0x7FFF => self.cartridge.read_byte(addr),

            // Video RAM, rerouted to the PPU.
            0x8000..=0x9FFF => self.ppu.read_byte(addr),

            // External (cartridge) RAM.
            0xA000..=0xBFFF => self.cartridge.read_byte(addr),

            // Work RAM and its echo.
            0xC000..=0xDFFF | 0xE000..=0xFDFF => self.work_ram[(addr & 0x1FFF) as usize],

            // OAM, rerouted to the PPU.
            0xFE00..=0xFE9F => self.ppu.read_byte(addr),

            // Unusable range.
            0xFEA0..=0xFEFF => 0xFF,

            // P1/JOYP.
            0xFF00 => self.joypad.read_byte(addr),

            // DIV, TIMA, TMA, TAC.
            0xFF04..=0xFF07 => self.timers.read_byte(addr),

            // IF register.
            0xFF0F => self.if_flag | 0b1110_0000,

            // APU's I/O registers and wave RAM.
            0xFF10..=0xFF26 | 0xFF30..=0xFF3F => self.apu.read_byte(addr),

            // PPU's I/O registers (LCDC, STAT, SCY/SCX, LY/LYC, palettes, WY/WX).
            0xFF40..=0xFF4B => self.ppu.read_byte(addr),

            // High RAM.
            0xFF80..=0xFFFE => self.high_ram[(addr - 0xFF80) as usize],

            // IE register.
            0xFFFF => self.ie_flag,

            _ => 0xFF,
        }
    }

    /// Write a byte to the given address. Does not tick the rest of
    /// the machine; callers (the CPU) do that explicitly via `tick`.
    pub fn write_byte(&mut self, addr: u16, value: u8) {
        match addr {
            // ROM banks, rerouted to the cartridge/MBC (bank control writes).
            0x0000..=0x7FFF => self.cartridge.write_byte(addr, value),

            // Video RAM, rerouted to the PPU.
            0x8000..=0x9FFF => self.ppu.write_byte(addr, value),

            // External (cartridge) RAM.
            0xA000..=0xBFFF => self.cartridge.write_byte(addr, value),

            // Work RAM and its echo.
            0xC000..=0xDFFF | 0xE000..=0xFDFF => self.work_ram[(addr & 0x1FFF) as usize] = value,

            // OAM, rerouted to the PPU.
            0xFE00..=0xFE9F => self.ppu.write_byte(addr, value),

            // Unusable range.
            0xFEA0..=0xFEFF => {}

            // P1/JOYP.
            0xFF00 => self.joypad.write_byte(addr, value),

            // DIV, TIMA, TMA, TAC.
            0xFF04..=0xFF07 => self.timers.write_byte(addr, value),

            // IF register.
            0xFF0F => self.if_flag = value & 0x1F,

            // APU's I/O registers and wave RAM.
            0xFF10..=0xFF26 | 0xFF30..=0xFF3F => self.apu.write_byte(addr, value),

            // OAM DMA transfer request. Performed instantly (no in-flight
            // restriction on which memory regions are accessible mid-DMA);
            // this is a faithful enough model for commercial ROMs, which
            // only ever trigger it from HRAM. Must be matched ahead of the
            // 0xFF40..=0xFF4B range below, which would otherwise shadow it.
            0xFF46 => {
                let source = (value as u16) << 8;

                for i in 0..0xA0u16 {
                    let byte = self.read_byte(source + i);
                    self.ppu.write_byte(0xFE00 + i, byte);
                }
            }

            // PPU's I/O registers.
            0xFF40..=0xFF4B => self.ppu.write_byte(addr, value),

            // High RAM.
            0xFF80..=0xFFFE => self.high_ram[(addr - 0xFF80) as usize] = value,

            // IE register.
            0xFFFF => self.ie_flag = value,

            _ => {}
        }
    }

    /// Read a word from the specified address.
    pub fn read_word(&self, addr: u16) -> u16 {
        (self.read_byte(addr) as u16) | ((self.read_byte(addr.wrapping_add(1)) as u16) << 8)
    }

    /// Write a word to the specified address.
    pub fn write_word(&mut self, addr: u16, value: u16) {
        self.write_byte(addr, value as u8);
        self.write_byte(addr.wrapping_add(1), (value >> 8) as u8);
    }

    /// Skip the bootrom: initialize the registers the bootrom would
    /// have set up, the way hardware leaves them at 0x0100.
    pub fn skip_bootrom(&mut self) {
        self.ppu.write_byte(0xFF40, 0x91);
        self.ppu.write_byte(0xFF47, 0xFC);
        self.ppu.write_byte(0xFF48, 0xFF);
        self.ppu.write_byte(0xFF49, 0xFF);
    }

    /// Tick every component on the bus by one M-cycle (4 T-cycles),
    /// in the order the CPU's memory access happened: timers, then
    /// the PPU, then the APU. Returns the most significant `PpuEvent`
    /// observed, so the top-level frame driver can pace to 60 fps and
    /// report diagnostics without the PPU knowing about host time.
    pub fn tick(&mut self) -> PpuEvent {
        self.timers.tick(&mut self.if_flag);

        let ppu_event = self.ppu.tick(&mut self.if_flag, 4);
        self.apu.tick(4);
        self.joypad.tick(&mut self.if_flag);

        if ppu_event == PpuEvent::EnteredVblank {
            self.vblank_latch = true;
        }

        ppu_event
    }

    /// Consume the VBLANK latch set by `tick`, returning whether a
    /// VBLANK transition happened since the last call.
    pub fn take_vblank(&mut self) -> bool {
        std::mem::take(&mut self.vblank_latch)
    }
}
