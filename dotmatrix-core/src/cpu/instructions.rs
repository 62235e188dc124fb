//! Contains implementations of the opcode handlers `decode.rs`
//! dispatches to.

use super::registers::{Reg16, Reg8};
use super::Cpu;
use crate::bus::Bus;

impl Cpu {
    /// LD (u16), SP
    pub fn ld_u16_sp(&mut self, bus: &mut Bus) {
        let addr = self.imm_word(bus);

        bus.write_byte(addr, self.reg.sp as u8);
        self.tick_bus(bus);
        bus.write_byte(addr.wrapping_add(1), (self.reg.sp >> 8) as u8);
        self.tick_bus(bus);
    }

    /// Unconditional relative jump.
    pub fn jr(&mut self, bus: &mut Bus) {
        let offset = self.imm_byte(bus) as i8 as i16;
        self.reg.pc = (self.reg.pc as i16).wrapping_add(offset) as u16;
        self.tick_bus(bus);
    }

    /// Conditional relative jump.
    pub fn conditional_jr(&mut self, bus: &mut Bus, condition: u8) {
        let offset = self.imm_byte(bus) as i8 as i16;

        if self.condition_met(condition) {
            self.reg.pc = (self.reg.pc as i16).wrapping_add(offset) as u16;
            self.tick_bus(bus);
        }
    }

    /// ADD HL, r16
    pub fn add_hl_r16(&mut self, bus: &mut Bus, rr: Reg16) {
        let hl = self.reg.get_hl();
        let rr = self.reg.read_r16(rr);

        self.reg.set_hl(hl.wrapping_add(rr));
        self.tick_bus(bus);

        self.reg.set_nf(false);
        self.reg.set_hf((hl & 0xFFF) + (rr & 0xFFF) > 0xFFF);
        self.reg.set_cf((hl as u32) + (rr as u32) > 0xFFFF);
    }

    /// ADD SP, i8
    pub fn add_sp_i8(&mut self, bus: &mut Bus) {
        let sp = self.reg.sp;
        let offset = self.imm_byte(bus) as i8 as i16 as u16;

        self.reg.sp = sp.wrapping_add(offset);
        self.tick_bus(bus);
        self.tick_bus(bus);

        self.reg.set_zf(false);
        self.reg.set_nf(false);
        self.reg.set_hf((sp & 0xF) + (offset & 0xF) > 0xF);
        self.reg.set_cf((sp & 0xFF) + (offset & 0xFF) > 0xFF);
    }

    /// LD HL, SP + i8
    pub fn ld_hl_sp_i8(&mut self, bus: &mut Bus) {
        let sp = self.reg.sp;
        let offset = self.imm_byte(bus) as i8 as i16 as u16;

        self.reg.set_hl(sp.wrapping_add(offset));
        self.tick_bus(bus);

        self.reg.set_zf(false);
        self.reg.set_nf(false);
        self.reg.set_hf((sp & 0xF) + (offset & 0xF) > 0xF);
        self.reg.set_cf((sp & 0xFF) + (offset & 0xFF) > 0xFF);
    }

    /// INC r8
    pub fn inc_r8(&mut self, bus: &mut Bus, r8: Reg8) {
        let value = self.read_r8(bus, r8);
        let res = value.wrapping_add(1);

        self.write_r8(bus, r8, res);

        self.reg.set_zf(res == 0);
        self.reg.set_nf(false);
        self.reg.set_hf((value & 0xF) + 1 > 0xF);
    }

    /// DEC r8
    pub fn dec_r8(&mut self, bus: &mut Bus, r8: Reg8) {
        let value = self.read_r8(bus, r8);
        let res = value.wrapping_sub(1);

        self.write_r8(bus, r8, res);

        self.reg.set_zf(res == 0);
        self.reg.set_nf(true);
        self.reg.set_hf(value & 0xF == 0);
    }

    /// RLCA
    pub fn rlca(&mut self) {
        let carry = self.reg.a >> 7;

        self.reg.a = (self.reg.a << 1) | carry;

        self.reg.set_zf(false);
        self.reg.set_nf(false);
        self.reg.set_hf(false);
        self.reg.set_cf(carry != 0);
    }

    /// RRCA
    pub fn rrca(&mut self) {
        let carry = self.reg.a & 0x1;

        self.reg.a = (self.reg.a >> 1) | (carry << 7);

        self.reg.set_zf(false);
        self.reg.set_nf(false);
        self.reg.set_hf(false);
        self.reg.set_cf(carry != 0);
    }

    /// RLA
    pub fn rla(&mut self) {
        let carry_in = self.reg.get_cf() as u8;
        let carry_out = self.reg.a >> 7;

        self.reg.a = (self.reg.a << 1) | carry_in;

        self.reg.set_zf(false);
        self.reg.set_nf(false);
        self.reg.set_hf(false);
        self.reg.set_cf(carry_out != 0);
    }

    /// RRA
    pub fn rra(&mut self) {
        let carry_in = self.reg.get_cf() as u8;
        let carry_out = self.reg.a & 0x1;

        self.reg.a = (self.reg.a >> 1) | (carry_in << 7);

        self.reg.set_zf(false);
        self.reg.set_nf(false);
        self.reg.set_hf(false);
        self.reg.set_cf(carry_out != 0);
    }

    /// DAA - adjust A into packed BCD after an ADD/SUB.
    pub fn daa(&mut self) {
        let mut adjust = 0u8;
        let mut carry = self.reg.get_cf();

        if self.reg.get_hf() || (!self.reg.get_nf() && (self.reg.a & 0xF) > 9) {
            adjust |= 0x6;
        }

        if self.reg.get_cf() || (!self.reg.get_nf() && self.reg.a > 0x99) {
            adjust |= 0x60;
            carry = true;
        }

        if self.reg.get_nf() {
            self.reg.a = self.reg.a.wrapping_sub(adjust);
        } else {
            self.reg.a = self.reg.a.wrapping_add(adjust);
        }

        self.reg.set_zf(self.reg.a == 0);
        self.reg.set_hf(false);
        self.reg.set_cf(carry);
    }

    /// CPL
    pub fn cpl(&mut self) {
        self.reg.a = !self.reg.a;

        self.reg.set_nf(true);
        self.reg.set_hf(true);
    }

    /// SCF
    pub fn scf(&mut self) {
        self.reg.set_nf(false);
        self.reg.set_hf(false);
        self.reg.set_cf(true);
    }

    /// CCF
    pub fn ccf(&mut self) {
        self.reg.set_nf(false);
        self.reg.set_hf(false);
        self.reg.set_cf(!self.reg.get_cf());
    }

    /// ADD A, r8
    pub fn add_a(&mut self, value: u8) {
        let a = self.reg.a;
        let (res, carry) = a.overflowing_add(value);

        self.reg.a = res;

        self.reg.set_zf(res == 0);
        self.reg.set_nf(false);
        self.reg.set_hf((a & 0xF) + (value & 0xF) > 0xF);
        self.reg.set_cf(carry);
    }

    /// ADC A, r8
    pub fn adc_a(&mut self, value: u8) {
        let a = self.reg.a;
        let carry_in = self.reg.get_cf() as u8;

        let res = a as u16 + value as u16 + carry_in as u16;

        self.reg.a = res as u8;

        self.reg.set_zf(self.reg.a == 0);
        self.reg.set_nf(false);
        self.reg.set_hf((a & 0xF) + (value & 0xF) + carry_in > 0xF);
        self.reg.set_cf(res > 0xFF);
    }

    /// SUB A, r8
    pub fn sub_a(&mut self, value: u8) {
        let a = self.reg.a;
        let (res, carry) = a.overflowing_sub(value);

        self.reg.a = res;

        self.reg.set_zf(res == 0);
        self.reg.set_nf(true);
        self.reg.set_hf((a & 0xF) < (value & 0xF));
        self.reg.set_cf(carry);
    }

    /// SBC A, r8
    pub fn sbc_a(&mut self, value: u8) {
        let a = self.reg.a;
        let carry_in = self.reg.get_cf() as i16;

        let res = a as i16 - value as i16 - carry_in;

        self.reg.a = res as u8;

        self.reg.set_zf(self.reg.a == 0);
        self.reg.set_nf(true);
        self.reg
            .set_hf((a & 0xF) as i16 - (value & 0xF) as i16 - carry_in < 0);
        self.reg.set_cf(res < 0);
    }

    /// AND A, r8
    pub fn and_a(&mut self, value: u8) {
        self.reg.a &= value;

        self.reg.set_zf(self.reg.a == 0);
        self.reg.set_nf(false);
        self.reg.set_hf(true);
        self.reg.set_cf(false);
    }

    /// XOR A, r8
    pub fn xor_a(&mut self, value: u8) {
        self.reg.a ^= value;

        self.reg.set_zf(self.reg.a == 0);
        self.reg.set_nf(false);
        self.reg.set_hf(false);
        self.reg.set_cf(false);
    }

    /// OR A, r8
    pub fn or_a(&mut self, value: u8) {
        self.reg.a |= value;

        self.reg.set_zf(self.reg.a == 0);
        self.reg.set_nf(false);
        self.reg.set_hf(false);
        self.reg.set_cf(false);
    }

    /// CP A, r8
    pub fn cp_a(&mut self, value: u8) {
        let a = self.reg.a;

        self.reg.set_zf(a == value);
        self.reg.set_nf(true);
        self.reg.set_hf((a & 0xF) < (value & 0xF));
        self.reg.set_cf(a < value);
    }

    /// RLC r8
    pub fn rlc_r8(&mut self, bus: &mut Bus, r8: Reg8) {
        let value = self.read_r8(bus, r8);
        let carry = value >> 7;
        let res = (value << 1) | carry;

        self.write_r8(bus, r8, res);
        self.set_shift_flags(res, carry != 0);
    }

    /// RRC r8
    pub fn rrc_r8(&mut self, bus: &mut Bus, r8: Reg8) {
        let value = self.read_r8(bus, r8);
        let carry = value & 0x1;
        let res = (value >> 1) | (carry << 7);

        self.write_r8(bus, r8, res);
        self.set_shift_flags(res, carry != 0);
    }

    /// RL r8
    pub fn rl_r8(&mut self, bus: &mut Bus, r8: Reg8) {
        let value = self.read_r8(bus, r8);
        let carry_in = self.reg.get_cf() as u8;
        let carry_out = value >> 7;
        let res = (value << 1) | carry_in;

        self.write_r8(bus, r8, res);
        self.set_shift_flags(res, carry_out != 0);
    }

    /// RR r8
    pub fn rr_r8(&mut self, bus: &mut Bus, r8: Reg8) {
        let value = self.read_r8(bus, r8);
        let carry_in = self.reg.get_cf() as u8;
        let carry_out = value & 0x1;
        let res = (value >> 1) | (carry_in << 7);

        self.write_r8(bus, r8, res);
        self.set_shift_flags(res, carry_out != 0);
    }

    /// SLA r8
    pub fn sla_r8(&mut self, bus: &mut Bus, r8: Reg8) {
        let value = self.read_r8(bus, r8);
        let carry = value >> 7;
        let res = value << 1;

        self.write_r8(bus, r8, res);
        self.set_shift_flags(res, carry != 0);
    }

    /// SRA r8
    pub fn sra_r8(&mut self, bus: &mut Bus, r8: Reg8) {
        let value = self.read_r8(bus, r8);
        let carry = value & 0x1;
        let res = (value >> 1) | (value & 0x80);

        self.write_r8(bus, r8, res);
        self.set_shift_flags(res, carry != 0);
    }

    /// SWAP r8
    pub fn swap_r8(&mut self, bus: &mut Bus, r8: Reg8) {
        let value = self.read_r8(bus, r8);
        let res = (value << 4) | (value >> 4);

        self.write_r8(bus, r8, res);

        self.reg.set_zf(res == 0);
        self.reg.set_nf(false);
        self.reg.set_hf(false);
        self.reg.set_cf(false);
    }

    /// SRL r8
    pub fn srl_r8(&mut self, bus: &mut Bus, r8: Reg8) {
        let value = self.read_r8(bus, r8);
        let carry = value & 0x1;
        let res = value >> 1;

        self.write_r8(bus, r8, res);
        self.set_shift_flags(res, carry != 0);
    }

    /// Shared flag update for the CB rotate/shift group.
    fn set_shift_flags(&mut self, res: u8, carry: bool) {
        self.reg.set_zf(res == 0);
        self.reg.set_nf(false);
        self.reg.set_hf(false);
        self.reg.set_cf(carry);
    }

    /// BIT b, r8
    pub fn bit_r8(&mut self, bus: &mut Bus, r8: Reg8, bit: u8) {
        let value = self.read_r8(bus, r8);

        self.reg.set_zf((value & (1 << bit)) == 0);
        self.reg.set_nf(false);
        self.reg.set_hf(true);
    }

    /// RES b, r8
    pub fn res_r8(&mut self, bus: &mut Bus, r8: Reg8, bit: u8) {
        let value = self.read_r8(bus, r8);
        self.write_r8(bus, r8, value & !(1 << bit));
    }

    /// SET b, r8
    pub fn set_r8(&mut self, bus: &mut Bus, r8: Reg8, bit: u8) {
        let value = self.read_r8(bus, r8);
        self.write_r8(bus, r8, value | (1 << bit));
    }
}
