//! Contains functions to decode opcodes and dispatch to the
//! correct handler.

use super::registers::{Reg16, Reg8};
use super::Cpu;
use crate::bus::Bus;

// WHOMSOEVER STRAY HITHER, READ AHEAD
//
// ACQUIRE A LOOKALIKE OF THIS SACRED TEXT
// https://cdn.discordapp.com/attachments/465586075830845475/742438340078469150/SM83_decoding.pdf
// THEN THOU MIGHT BEGIN TO UNDERSTAND THE GIBBERISH BENEATH.

/// R16 (group 1) - 16 bit arithmetic/load destinations.
fn r16_group_one(index: u8) -> Reg16 {
    match index & 0x3 {
        0 => Reg16::BC,
        1 => Reg16::DE,
        2 => Reg16::HL,
        3 => Reg16::SP,

        _ => unreachable!(),
    }
}

/// R16 (group 2) - indirect addressing through BC/DE/HL+/HL-.
fn r16_group_two(index: u8) -> Reg16 {
    match index & 0x3 {
        0 => Reg16::BC,
        1 => Reg16::DE,
        2 => Reg16::HLI,
        3 => Reg16::HLD,

        _ => unreachable!(),
    }
}

/// R16 (group 3) - push/pop destinations (uses AF instead of SP).
fn r16_group_three(index: u8) -> Reg16 {
    match index & 0x3 {
        0 => Reg16::BC,
        1 => Reg16::DE,
        2 => Reg16::HL,
        3 => Reg16::AF,

        _ => unreachable!(),
    }
}

/// ALU `A, r8` opcode group, indexed by the middle 3 opcode bits.
const ALU_GROUP: [fn(&mut Cpu, u8); 8] = [
    Cpu::add_a,
    Cpu::adc_a,
    Cpu::sub_a,
    Cpu::sbc_a,
    Cpu::and_a,
    Cpu::xor_a,
    Cpu::or_a,
    Cpu::cp_a,
];

/// CB-prefixed rotate/shift group, indexed the same way.
const SHIFT_GROUP: [fn(&mut Cpu, &mut Bus, Reg8); 8] = [
    Cpu::rlc_r8,
    Cpu::rrc_r8,
    Cpu::rl_r8,
    Cpu::rr_r8,
    Cpu::sla_r8,
    Cpu::sra_r8,
    Cpu::swap_r8,
    Cpu::srl_r8,
];

impl Cpu {
    pub fn decode_and_execute(&mut self, bus: &mut Bus, opcode: u8) {
        match opcode {
            0x00 => {}

            // LD [u16], SP
            0x08 => self.ld_u16_sp(bus),

            // STOP
            0x10 => {
                self.imm_byte(bus);
            }

            // JR (unconditional)
            0x18 => self.jr(bus),

            // JR (conditional)
            0x20 | 0x28 | 0x30 | 0x38 => {
                let condition = (opcode >> 3) & 0x3;
                self.conditional_jr(bus, condition);
            }

            // LD r16, u16
            0x01 | 0x11 | 0x21 | 0x31 => {
                let index = (opcode >> 4) & 0x3;
                let r16 = r16_group_one(index);
                let imm = self.imm_word(bus);

                self.reg.write_r16(r16, imm);
            }

            // ADD HL, r16
            0x09 | 0x19 | 0x29 | 0x39 => {
                let index = (opcode >> 4) & 0x3;
                let r16 = r16_group_one(index);

                self.add_hl_r16(bus, r16);
            }

            // LD (r16), A
            0x02 | 0x12 | 0x22 | 0x32 => {
                let index = (opcode >> 4) & 0x3;
                let r16 = r16_group_two(index);
                let addr = self.reg.read_r16(r16);

                bus.write_byte(addr, self.reg.a);
                self.tick_bus(bus);
            }

            // LD A, (r16)
            0x0A | 0x1A | 0x2A | 0x3A => {
                let index = (opcode >> 4) & 0x3;
                let r16 = r16_group_two(index);
                let addr = self.reg.read_r16(r16);

                self.reg.a = bus.read_byte(addr);
                self.tick_bus(bus);
            }

            // INC r16
            0x03 | 0x13 | 0x23 | 0x33 => {
                let r16 = r16_group_one((opcode >> 4) & 0x3);
                let value = self.reg.read_r16(r16);

                self.reg.write_r16(r16, value.wrapping_add(1));
                self.tick_bus(bus);
            }

            // DEC r16
            0x0B | 0x1B | 0x2B | 0x3B => {
                let r16 = r16_group_one((opcode >> 4) & 0x3);
                let value = self.reg.read_r16(r16);

                self.reg.write_r16(r16, value.wrapping_sub(1));
                self.tick_bus(bus);
            }

            // INC r8
            0x04 | 0x14 | 0x24 | 0x34 | 0x0C | 0x1C | 0x2C | 0x3C => {
                let r8 = Reg8::from_bits(opcode >> 3);
                self.inc_r8(bus, r8);
            }

            // DEC r8
            0x05 | 0x15 | 0x25 | 0x35 | 0x0D | 0x1D | 0x2D | 0x3D => {
                let r8 = Reg8::from_bits(opcode >> 3);
                self.dec_r8(bus, r8);
            }

            // LD r8, u8
            0x06 | 0x16 | 0x26 | 0x36 | 0x0E | 0x1E | 0x2E | 0x3E => {
                let r8 = Reg8::from_bits(opcode >> 3);
                let imm = self.imm_byte(bus);

                self.write_r8(bus, r8, imm);
            }

            // RLCA / RRCA / RLA / RRA
            0x07 => self.rlca(),
            0x0F => self.rrca(),
            0x17 => self.rla(),
            0x1F => self.rra(),

            // DAA / CPL / SCF / CCF
            0x27 => self.daa(),
            0x2F => self.cpl(),
            0x37 => self.scf(),
            0x3F => self.ccf(),

            // HALT
            0x76 => self.halt(),

            // LD r8, r8
            0x40..=0x7F => {
                let src = Reg8::from_bits(opcode);
                let dest = Reg8::from_bits(opcode >> 3);

                let value = self.read_r8(bus, src);
                self.write_r8(bus, dest, value);
            }

            // ALU A, r8
            0x80..=0xBF => {
                let src = Reg8::from_bits(opcode);
                let index = ((opcode >> 3) & 0x7) as usize;

                let value = self.read_r8(bus, src);
                ALU_GROUP[index](self, value);
            }

            // RET (conditional)
            0xC0 | 0xC8 | 0xD0 | 0xD8 => {
                self.conditional_ret(bus, (opcode >> 3) & 0x3);
            }

            // LDH [FF00+u8], A
            0xE0 => {
                let addr = 0xFF00u16.wrapping_add(self.imm_byte(bus) as u16);
                bus.write_byte(addr, self.reg.a);
                self.tick_bus(bus);
            }

            // ADD SP, i8
            0xE8 => self.add_sp_i8(bus),

            // LDH A, [FF00+u8]
            0xF0 => {
                let addr = 0xFF00u16.wrapping_add(self.imm_byte(bus) as u16);
                self.reg.a = bus.read_byte(addr);
                self.tick_bus(bus);
            }

            // LD HL, SP + i8
            0xF8 => self.ld_hl_sp_i8(bus),

            // POP r16
            0xC1 | 0xD1 | 0xE1 | 0xF1 => {
                let r16 = r16_group_three((opcode >> 4) & 0x3);
                let value = self.pop(bus);

                self.reg.write_r16(r16, value);
            }

            // RET (unconditional)
            0xC9 => self.ret(bus),

            // RETI
            0xD9 => {
                self.ret(bus);
                self.enable_ime();
            }

            // JP HL
            0xE9 => {
                self.reg.pc = self.reg.get_hl();
            }

            // LD SP, HL
            0xF9 => {
                self.reg.sp = self.reg.get_hl();
                self.tick_bus(bus);
            }

            // LD [u16], A
            0xEA => {
                let addr = self.imm_word(bus);
                bus.write_byte(addr, self.reg.a);
                self.tick_bus(bus);
            }

            // LD A, [u16]
            0xFA => {
                let addr = self.imm_word(bus);
                self.reg.a = bus.read_byte(addr);
                self.tick_bus(bus);
            }

            // LD [FF00+C], A
            0xE2 => {
                let addr = 0xFF00u16.wrapping_add(self.reg.c as u16);
                bus.write_byte(addr, self.reg.a);
                self.tick_bus(bus);
            }

            // LD A, [FF00+C]
            0xF2 => {
                let addr = 0xFF00u16.wrapping_add(self.reg.c as u16);
                self.reg.a = bus.read_byte(addr);
                self.tick_bus(bus);
            }

            // JP u16
            0xC3 => {
                let addr = self.imm_word(bus);
                self.jp(bus, addr);
            }

            // JP (conditional)
            0xC2 | 0xCA | 0xD2 | 0xDA => {
                let condition = (opcode >> 3) & 0x3;
                let addr = self.imm_word(bus);

                if self.condition_met(condition) {
                    self.jp(bus, addr);
                }
            }

            // CB prefixed.
            0xCB => {
                let opcode = self.imm_byte(bus);

                match opcode {
                    0x00..=0x3F => {
                        let r8 = Reg8::from_bits(opcode);
                        let index = ((opcode >> 3) & 0x7) as usize;

                        SHIFT_GROUP[index](self, bus, r8);
                    }

                    0x40..=0x7F => {
                        let r8 = Reg8::from_bits(opcode);
                        let bit = (opcode >> 3) & 0x7;

                        self.bit_r8(bus, r8, bit);
                    }

                    0x80..=0xBF => {
                        let r8 = Reg8::from_bits(opcode);
                        let bit = (opcode >> 3) & 0x7;

                        self.res_r8(bus, r8, bit);
                    }

                    0xC0..=0xFF => {
                        let r8 = Reg8::from_bits(opcode);
                        let bit = (opcode >> 3) & 0x7;

                        self.set_r8(bus, r8, bit);
                    }
                }
            }

            // DI / EI
            0xF3 => self.disable_ime(),
            0xFB => self.enable_ime(),

            // CALL (condition)
            0xC4 | 0xCC | 0xD4 | 0xDC => {
                let condition = (opcode >> 3) & 0x3;
                self.conditional_call(bus, condition);
            }

            // PUSH r16
            0xC5 | 0xD5 | 0xE5 | 0xF5 => {
                let r16 = r16_group_three((opcode >> 4) & 0x3);
                let value = self.reg.read_r16(r16);

                self.push(bus, value);
            }

            // CALL u16
            0xCD => self.call(bus),

            // ALU A, u8
            0xC6 | 0xD6 | 0xE6 | 0xF6 | 0xCE | 0xDE | 0xEE | 0xFE => {
                let index = ((opcode >> 3) & 0x7) as usize;
                let value = self.imm_byte(bus);

                ALU_GROUP[index](self, value);
            }

            // RST
            0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => {
                let vector = (opcode & 0b0011_1000) as u16;

                self.push(bus, self.reg.pc);
                self.reg.pc = vector;
            }

            _ => {
                log::error!("unhandled opcode 0x{:02X} at PC 0x{:04X}", opcode, self.reg.pc.wrapping_sub(1));
                std::process::exit(1);
            }
        }
    }
}
