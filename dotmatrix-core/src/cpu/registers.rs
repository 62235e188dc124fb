//! Contains helper struct `Registers` with methods
//! to access 16 bit combined versions of the regular
//! 8 bit registers.

use bitflags::bitflags;

bitflags! {
    pub struct Flags: u8 {
        const Z = 0b1000_0000;
        const N = 0b0100_0000;
        const H = 0b0010_0000;
        const C = 0b0001_0000;
    }
}

/// Enumerates all 16 bit register pairs, grouped the way the opcode
/// table groups them (see wheremyfoodat's decoding PDF). `HLI`/`HLD`
/// are the post-increment/post-decrement HL used by `LD A,(HL+)`-style
/// opcodes; they only ever appear as the argument to `read_r16`.
#[derive(Clone, Copy)]
pub enum Reg16 {
    AF,
    BC,
    DE,
    HL,
    SP,
    HLI,
    HLD,
}

/// Enumerates the 8 bit register operands in their opcode bit order
/// (B, C, D, E, H, L, (HL), A). `HL` is the odd one out: it does not
/// name a register at all, but "the byte at the address HL points to".
#[derive(Clone, Copy)]
pub enum Reg8 {
    B,
    C,
    D,
    E,
    H,
    L,
    HL,
    A,
}

impl Reg8 {
    /// Decode the 3 bit field opcodes use to select an 8 bit operand.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x7 {
            0 => Reg8::B,
            1 => Reg8::C,
            2 => Reg8::D,
            3 => Reg8::E,
            4 => Reg8::H,
            5 => Reg8::L,
            6 => Reg8::HL,
            7 => Reg8::A,

            _ => unreachable!(),
        }
    }
}

pub struct Registers {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub f: Flags,
    pub sp: u16,
    pub pc: u16,
}

impl Registers {
    /// Create a new `Registers` instance, zeroed.
    pub fn new() -> Self {
        Self {
            a: 0,
            b: 0,
            c: 0,
            d: 0,
            e: 0,
            h: 0,
            l: 0,
            f: Flags::empty(),
            sp: 0,
            pc: 0,
        }
    }

    #[inline]
    pub fn get_bc(&self) -> u16 {
        ((self.b as u16) << 8) | self.c as u16
    }

    #[inline]
    pub fn set_bc(&mut self, value: u16) {
        self.b = (value >> 8) as u8;
        self.c = value as u8;
    }

    #[inline]
    pub fn get_de(&self) -> u16 {
        ((self.d as u16) << 8) | self.e as u16
    }

    #[inline]
    pub fn set_de(&mut self, value: u16) {
        self.d = (value >> 8) as u8;
        self.e = value as u8;
    }

    #[inline]
    pub fn get_hl(&self) -> u16 {
        ((self.h as u16) << 8) | self.l as u16
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        self.h = (value >> 8) as u8;
        self.l = value as u8;
    }

    #[inline]
    pub fn get_af(&self) -> u16 {
        ((self.a as u16) << 8) | self.f.bits() as u16
    }

    #[inline]
    pub fn set_af(&mut self, value: u16) {
        self.a = (value >> 8) as u8;
        self.f = Flags::from_bits_truncate(value as u8 & 0xF0);
    }

    /// Read a 16 bit register pair, applying the HL post-increment or
    /// post-decrement `Reg16::HLI`/`Reg16::HLD` imply.
    pub fn read_r16(&mut self, reg: Reg16) -> u16 {
        match reg {
            Reg16::AF => self.get_af(),
            Reg16::BC => self.get_bc(),
            Reg16::DE => self.get_de(),
            Reg16::HL => self.get_hl(),
            Reg16::SP => self.sp,

            Reg16::HLI => {
                let value = self.get_hl();
                self.set_hl(value.wrapping_add(1));

                value
            }

            Reg16::HLD => {
                let value = self.get_hl();
                self.set_hl(value.wrapping_sub(1));

                value
            }
        }
    }

    /// Write a 16 bit register pair.
    pub fn write_r16(&mut self, reg: Reg16, value: u16) {
        match reg {
            Reg16::AF => self.set_af(value),
            Reg16::BC => self.set_bc(value),
            Reg16::DE => self.set_de(value),
            Reg16::HL | Reg16::HLI | Reg16::HLD => self.set_hl(value),
            Reg16::SP => self.sp = value,
        }
    }

    #[inline]
    pub fn get_zf(&self) -> bool {
        self.f.contains(Flags::Z)
    }

    #[inline]
    pub fn set_zf(&mut self, value: bool) {
        self.f.set(Flags::Z, value);
    }

    #[inline]
    pub fn get_nf(&self) -> bool {
        self.f.contains(Flags::N)
    }

    #[inline]
    pub fn set_nf(&mut self, value: bool) {
        self.f.set(Flags::N, value);
    }

    #[inline]
    pub fn get_hf(&self) -> bool {
        self.f.contains(Flags::H)
    }

    #[inline]
    pub fn set_hf(&mut self, value: bool) {
        self.f.set(Flags::H, value);
    }

    #[inline]
    pub fn get_cf(&self) -> bool {
        self.f.contains(Flags::C)
    }

    #[inline]
    pub fn set_cf(&mut self, value: bool) {
        self.f.set(Flags::C, value);
    }
}
