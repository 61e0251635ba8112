//! Test support: a small Hack machine simulator
//!
//! Executes instruction records directly (no binary assembly step) so
//! tests can assert on RAM effects of generated code: stack deltas,
//! boolean encodings, and the call/return protocol. Mirrors the
//! assembler's symbol rules: markers name instruction addresses,
//! unknown symbols become variables allocated from RAM[16] up.

use crate::asm::{AsmInst, Comp, Dest, Jump};
use std::collections::HashMap;

pub const RAM_SIZE: usize = 32768;

/// Machine state after a run
pub struct Machine {
    pub ram: Vec<i16>,
    pub a: i16,
    pub d: i16,
    pub pc: usize,
    pub steps: usize,
}

impl Machine {
    /// Execute a program until the program counter runs past the last
    /// instruction or `max_steps` is reached
    pub fn run(program: &[AsmInst], max_steps: usize) -> Machine {
        // First pass: markers name the next executable instruction;
        // comments occupy no address.
        let mut labels: HashMap<&str, u16> = HashMap::new();
        let mut text: Vec<&AsmInst> = Vec::new();
        for inst in program {
            match inst {
                AsmInst::Marker(name) => {
                    labels.insert(name.as_str(), text.len() as u16);
                }
                AsmInst::Comment(_) => {}
                executable => text.push(executable),
            }
        }

        let mut variables: HashMap<&str, u16> = HashMap::new();
        let mut next_variable = 16u16;
        let mut machine = Machine {
            ram: vec![0; RAM_SIZE],
            a: 0,
            d: 0,
            pc: 0,
            steps: 0,
        };

        while machine.pc < text.len() && machine.steps < max_steps {
            machine.steps += 1;
            match text[machine.pc] {
                AsmInst::AddrImm(value) => {
                    machine.a = *value as i16;
                    machine.pc += 1;
                }
                AsmInst::AddrReg(register) => {
                    machine.a = register.address() as i16;
                    machine.pc += 1;
                }
                AsmInst::AddrSym(symbol) => {
                    let address = match labels.get(symbol.as_str()) {
                        Some(&target) => target,
                        None => *variables.entry(symbol.as_str()).or_insert_with(|| {
                            let slot = next_variable;
                            next_variable += 1;
                            slot
                        }),
                    };
                    machine.a = address as i16;
                    machine.pc += 1;
                }
                AsmInst::Assign(dest, comp) => {
                    let value = machine.eval(*comp);
                    machine.write(*dest, value);
                    machine.pc += 1;
                }
                AsmInst::Branch(comp, jump) => {
                    let value = machine.eval(*comp);
                    if jump_taken(*jump, value) {
                        machine.pc = machine.a as u16 as usize;
                    } else {
                        machine.pc += 1;
                    }
                }
                AsmInst::Marker(_) | AsmInst::Comment(_) => {
                    machine.pc += 1;
                }
            }
        }
        machine
    }

    /// The current stack pointer (RAM[0])
    pub fn sp(&self) -> i16 {
        self.ram[0]
    }

    fn mem(&self) -> i16 {
        self.ram[self.a as u16 as usize & (RAM_SIZE - 1)]
    }

    fn write(&mut self, dest: Dest, value: i16) {
        let address = self.a as u16 as usize & (RAM_SIZE - 1);
        match dest {
            Dest::M => self.ram[address] = value,
            Dest::D => self.d = value,
            Dest::A => self.a = value,
            Dest::MD => {
                self.ram[address] = value;
                self.d = value;
            }
            Dest::AM => {
                self.ram[address] = value;
                self.a = value;
            }
            Dest::AD => {
                self.a = value;
                self.d = value;
            }
            Dest::AMD => {
                self.ram[address] = value;
                self.a = value;
                self.d = value;
            }
        }
    }

    fn eval(&self, comp: Comp) -> i16 {
        let d = self.d;
        let a = self.a;
        let m = self.mem();
        match comp {
            Comp::Zero => 0,
            Comp::One => 1,
            Comp::NegOne => -1,
            Comp::D => d,
            Comp::A => a,
            Comp::M => m,
            Comp::NotD => !d,
            Comp::NotA => !a,
            Comp::NotM => !m,
            Comp::NegD => d.wrapping_neg(),
            Comp::NegA => a.wrapping_neg(),
            Comp::NegM => m.wrapping_neg(),
            Comp::DPlusOne => d.wrapping_add(1),
            Comp::APlusOne => a.wrapping_add(1),
            Comp::MPlusOne => m.wrapping_add(1),
            Comp::DMinusOne => d.wrapping_sub(1),
            Comp::AMinusOne => a.wrapping_sub(1),
            Comp::MMinusOne => m.wrapping_sub(1),
            Comp::DPlusA => d.wrapping_add(a),
            Comp::DPlusM => d.wrapping_add(m),
            Comp::DMinusA => d.wrapping_sub(a),
            Comp::DMinusM => d.wrapping_sub(m),
            Comp::AMinusD => a.wrapping_sub(d),
            Comp::MMinusD => m.wrapping_sub(d),
            Comp::DAndA => d & a,
            Comp::DAndM => d & m,
            Comp::DOrA => d | a,
            Comp::DOrM => d | m,
        }
    }
}

fn jump_taken(jump: Jump, value: i16) -> bool {
    match jump {
        Jump::JGT => value > 0,
        Jump::JEQ => value == 0,
        Jump::JGE => value >= 0,
        Jump::JLT => value < 0,
        Jump::JNE => value != 0,
        Jump::JLE => value <= 0,
        Jump::JMP => true,
    }
}
