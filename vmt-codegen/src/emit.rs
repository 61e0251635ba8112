//! VM command to Hack assembly generation
//!
//! `CodeGen` turns decoded VM commands into Hack instruction records.
//! It owns the generator state that must stay globally consistent
//! across a whole program: the comparison-label counter, the
//! return-label counter, and the current translation-unit name used
//! for static-segment symbols. One instance is shared across all
//! units of a program so generated labels never collide.

use crate::asm::{AsmInst, Comp, Dest, Jump, Register};
use log::debug;
use vmt_common::{SourceLocation, TranslateError};
use vmt_frontend::{AluOp, Command, Segment};

/// Scratch cells, allocated by the downstream assembler's variable pass
const SCRATCH_ADDR: &str = "addr";
const SCRATCH_FRAME: &str = "frame";
const SCRATCH_RET: &str = "ret";

/// Base address of the operand stack
const STACK_BASE: u16 = 256;
/// Base address of the temp segment (RAM[5..=12])
const TEMP_BASE: u16 = 5;
/// Saved slots in a call frame: return address + LCL/ARG/THIS/THAT
const FRAME_SIZE: u16 = 5;
/// Function invoked by the bootstrap, with zero arguments
const ENTRY_POINT: &str = "Sys.init";

/// The instruction emitter and its generator state
pub struct CodeGen {
    compare_count: u32,
    call_count: u32,
    unit_name: String,
    insts: Vec<AsmInst>,
}

impl CodeGen {
    pub fn new() -> Self {
        Self {
            compare_count: 0,
            call_count: 0,
            unit_name: String::new(),
            insts: Vec::new(),
        }
    }

    /// Set the translation-unit name used for static-segment symbols
    ///
    /// Must be called before emitting a unit's commands. Counters are
    /// deliberately not reset here.
    pub fn set_unit_name(&mut self, name: &str) {
        debug!("generating code for unit {}", name);
        self.unit_name = name.to_string();
    }

    /// The instructions emitted so far
    pub fn instructions(&self) -> &[AsmInst] {
        &self.insts
    }

    pub fn into_instructions(self) -> Vec<AsmInst> {
        self.insts
    }

    /// Emit the once-per-program bootstrap: SP = 256, call Sys.init 0
    ///
    /// Routing the entry through the ordinary call path guarantees the
    /// entry point runs inside a proper frame (and claims return
    /// label index 0).
    pub fn emit_bootstrap(&mut self) {
        debug!("emitting bootstrap");
        self.insts.extend([
            AsmInst::AddrImm(STACK_BASE),
            AsmInst::Assign(Dest::D, Comp::A),
            AsmInst::AddrReg(Register::Sp),
            AsmInst::Assign(Dest::M, Comp::D),
        ]);
        self.emit_call(ENTRY_POINT, 0);
    }

    /// Emit one command's instruction block, preceded by a comment
    /// naming the command
    pub fn emit_command(
        &mut self,
        command: &Command,
        location: &SourceLocation,
    ) -> Result<(), TranslateError> {
        match command {
            Command::Arithmetic(op) => {
                self.emit_arithmetic(*op);
                Ok(())
            }
            Command::Push { segment, index } => self.emit_push(*segment, *index, location),
            Command::Pop { segment, index } => self.emit_pop(*segment, *index, location),
            Command::Label(name) => {
                self.insts
                    .push(AsmInst::Comment(format!("LABEL {}", name)));
                self.insts.push(AsmInst::Marker(name.clone()));
                Ok(())
            }
            Command::Goto(name) => {
                self.insts.push(AsmInst::Comment(format!("GOTO {}", name)));
                self.emit_jump(name);
                Ok(())
            }
            Command::IfGoto(name) => {
                self.emit_if_goto(name);
                Ok(())
            }
            Command::Function { name, locals } => self.emit_function(name, *locals, location),
            Command::Call { name, args } => {
                self.emit_call(name, *args);
                Ok(())
            }
            Command::Return => {
                self.emit_return();
                Ok(())
            }
        }
    }

    fn emit_arithmetic(&mut self, op: AluOp) {
        self.insts.push(AsmInst::Comment(op.to_string()));
        match op {
            AluOp::Add => self.binary(Comp::DPlusM),
            AluOp::Sub => self.binary(Comp::MMinusD),
            AluOp::And => self.binary(Comp::DAndM),
            AluOp::Or => self.binary(Comp::DOrM),
            AluOp::Neg => self.unary(Comp::NegM),
            AluOp::Not => self.unary(Comp::NotM),
            AluOp::Eq => self.compare(Jump::JEQ),
            AluOp::Gt => self.compare(Jump::JGT),
            AluOp::Lt => self.compare(Jump::JLT),
        }
    }

    /// Binary op: pop y into D, pop x and combine, push the result
    fn binary(&mut self, result: Comp) {
        self.pop_operand(Comp::M);
        self.pop_operand(result);
        self.push_d();
    }

    /// Unary op: pop the operand transformed into D, push it back
    fn unary(&mut self, result: Comp) {
        self.pop_operand(result);
        self.push_d();
    }

    /// Comparison: D = x - y, branch to a fresh label pair, push -1
    /// (true) or 0 (false)
    fn compare(&mut self, condition: Jump) {
        self.pop_operand(Comp::M);
        self.pop_operand(Comp::MMinusD);
        let true_label = format!("TRUE_{}", self.compare_count);
        let false_label = format!("FALSE_{}", self.compare_count);
        self.compare_count += 1;
        self.insts.extend([
            AsmInst::AddrSym(true_label.clone()),
            AsmInst::Branch(Comp::D, condition),
            AsmInst::Assign(Dest::D, Comp::Zero),
            AsmInst::AddrSym(false_label.clone()),
            AsmInst::Branch(Comp::Zero, Jump::JMP),
            AsmInst::Marker(true_label),
            AsmInst::Assign(Dest::D, Comp::NegOne),
            AsmInst::Marker(false_label),
        ]);
        self.push_d();
    }

    fn emit_push(
        &mut self,
        segment: Segment,
        index: u16,
        location: &SourceLocation,
    ) -> Result<(), TranslateError> {
        self.insts
            .push(AsmInst::Comment(format!("PUSH {} {}", segment, index)));
        match segment {
            Segment::Argument => self.push_base_offset(Register::Arg, index),
            Segment::Local => self.push_base_offset(Register::Lcl, index),
            Segment::This => self.push_base_offset(Register::This, index),
            Segment::That => self.push_base_offset(Register::That, index),
            Segment::Temp => {
                self.temp_addr(index);
                self.push_through_addr();
            }
            Segment::Constant => {
                self.insts.extend([
                    AsmInst::AddrImm(index),
                    AsmInst::Assign(Dest::D, Comp::A),
                ]);
                self.push_d();
            }
            Segment::Static => {
                let symbol = self.static_symbol(index);
                self.insts.extend([
                    AsmInst::AddrSym(symbol),
                    AsmInst::Assign(Dest::D, Comp::M),
                ]);
                self.push_d();
            }
            Segment::Pointer => {
                let register = pointer_register(index, location)?;
                self.insts.extend([
                    AsmInst::AddrReg(register),
                    AsmInst::Assign(Dest::D, Comp::M),
                ]);
                self.push_d();
            }
        }
        Ok(())
    }

    fn emit_pop(
        &mut self,
        segment: Segment,
        index: u16,
        location: &SourceLocation,
    ) -> Result<(), TranslateError> {
        self.insts
            .push(AsmInst::Comment(format!("POP {} {}", segment, index)));
        match segment {
            Segment::Argument => self.pop_base_offset(Register::Arg, index),
            Segment::Local => self.pop_base_offset(Register::Lcl, index),
            Segment::This => self.pop_base_offset(Register::This, index),
            Segment::That => self.pop_base_offset(Register::That, index),
            Segment::Temp => {
                self.temp_addr(index);
                self.pop_through_addr();
            }
            Segment::Static => {
                let symbol = self.static_symbol(index);
                self.pop_to_d();
                self.insts.extend([
                    AsmInst::AddrSym(symbol),
                    AsmInst::Assign(Dest::M, Comp::D),
                ]);
            }
            Segment::Pointer => {
                let register = pointer_register(index, location)?;
                self.pop_to_d();
                self.insts.extend([
                    AsmInst::AddrReg(register),
                    AsmInst::Assign(Dest::M, Comp::D),
                ]);
            }
            Segment::Constant => {
                // Undefined by contract. Keep the decrement-then-read
                // shape and store through the literal address.
                self.pop_to_d();
                self.insts.extend([
                    AsmInst::AddrImm(index),
                    AsmInst::Assign(Dest::M, Comp::D),
                ]);
            }
        }
        Ok(())
    }

    fn emit_if_goto(&mut self, name: &str) {
        self.insts
            .push(AsmInst::Comment(format!("IF-GOTO {}", name)));
        self.pop_operand(Comp::M);
        self.insts.extend([
            AsmInst::AddrSym(name.to_string()),
            AsmInst::Branch(Comp::D, Jump::JNE),
        ]);
    }

    fn emit_function(
        &mut self,
        name: &str,
        locals: u16,
        location: &SourceLocation,
    ) -> Result<(), TranslateError> {
        self.insts
            .push(AsmInst::Comment(format!("FUNCTION {} {}", name, locals)));
        self.insts.push(AsmInst::Marker(name.to_string()));
        for _ in 0..locals {
            self.emit_push(Segment::Constant, 0, location)?;
        }
        Ok(())
    }

    /// Call protocol: push the return address and the four segment
    /// base registers, then recompute ARG and LCL from the
    /// post-push stack pointer, then jump to the callee.
    fn emit_call(&mut self, name: &str, args: u16) {
        self.insts
            .push(AsmInst::Comment(format!("CALL {} {}", name, args)));
        let return_label = format!("{}$return{}", name, self.call_count);
        self.call_count += 1;

        self.insts.extend([
            AsmInst::AddrSym(return_label.clone()),
            AsmInst::Assign(Dest::D, Comp::A),
        ]);
        self.push_d();
        for register in [Register::Lcl, Register::Arg, Register::This, Register::That] {
            self.insts.extend([
                AsmInst::AddrReg(register),
                AsmInst::Assign(Dest::D, Comp::M),
            ]);
            self.push_d();
        }
        // ARG = SP - args - 5; must run after the five pushes above
        self.insts.extend([
            AsmInst::AddrReg(Register::Sp),
            AsmInst::Assign(Dest::D, Comp::M),
            AsmInst::AddrImm(args),
            AsmInst::Assign(Dest::D, Comp::DMinusA),
            AsmInst::AddrImm(FRAME_SIZE),
            AsmInst::Assign(Dest::D, Comp::DMinusA),
            AsmInst::AddrReg(Register::Arg),
            AsmInst::Assign(Dest::M, Comp::D),
        ]);
        // LCL = SP
        self.insts.extend([
            AsmInst::AddrReg(Register::Sp),
            AsmInst::Assign(Dest::D, Comp::M),
            AsmInst::AddrReg(Register::Lcl),
            AsmInst::Assign(Dest::M, Comp::D),
        ]);
        self.emit_jump(name);
        self.insts.push(AsmInst::Marker(return_label));
    }

    /// Return protocol. The frame base is captured into a scratch cell
    /// first; every frame-relative read goes through that cell, so
    /// LCL itself can be restored last.
    fn emit_return(&mut self) {
        self.insts.push(AsmInst::Comment("RETURN".to_string()));
        // frame = LCL
        self.insts.extend([
            AsmInst::AddrReg(Register::Lcl),
            AsmInst::Assign(Dest::D, Comp::M),
            AsmInst::AddrSym(SCRATCH_FRAME.to_string()),
            AsmInst::Assign(Dest::M, Comp::D),
        ]);
        // ret = *(frame - 5); captured before ARG slot 0 is overwritten
        self.frame_slot_to_d(FRAME_SIZE);
        self.insts.extend([
            AsmInst::AddrSym(SCRATCH_RET.to_string()),
            AsmInst::Assign(Dest::M, Comp::D),
        ]);
        // *ARG = pop(); the return value becomes the caller's new top
        self.insts.extend([
            AsmInst::AddrReg(Register::Sp),
            AsmInst::Assign(Dest::M, Comp::MMinusOne),
            AsmInst::Assign(Dest::A, Comp::M),
            AsmInst::Assign(Dest::D, Comp::M),
            AsmInst::AddrReg(Register::Arg),
            AsmInst::Assign(Dest::A, Comp::M),
            AsmInst::Assign(Dest::M, Comp::D),
        ]);
        // SP = ARG + 1
        self.insts.extend([
            AsmInst::AddrReg(Register::Arg),
            AsmInst::Assign(Dest::D, Comp::MPlusOne),
            AsmInst::AddrReg(Register::Sp),
            AsmInst::Assign(Dest::M, Comp::D),
        ]);
        // Restore the saved registers; LCL must come last since the
        // earlier reads depend on the captured frame base.
        for (offset, register) in [
            (1, Register::That),
            (2, Register::This),
            (3, Register::Arg),
            (4, Register::Lcl),
        ] {
            self.frame_slot_to_d(offset);
            self.insts.extend([
                AsmInst::AddrReg(register),
                AsmInst::Assign(Dest::M, Comp::D),
            ]);
        }
        // goto ret
        self.insts.extend([
            AsmInst::AddrSym(SCRATCH_RET.to_string()),
            AsmInst::Assign(Dest::A, Comp::M),
            AsmInst::Branch(Comp::Zero, Jump::JMP),
        ]);
    }

    /// D = *(frame - offset)
    fn frame_slot_to_d(&mut self, offset: u16) {
        self.insts.extend([
            AsmInst::AddrSym(SCRATCH_FRAME.to_string()),
            AsmInst::Assign(Dest::D, Comp::M),
            AsmInst::AddrImm(offset),
            AsmInst::Assign(Dest::D, Comp::DMinusA),
            AsmInst::Assign(Dest::A, Comp::D),
            AsmInst::Assign(Dest::D, Comp::M),
        ]);
    }

    /// Unconditional jump to a symbolic target
    fn emit_jump(&mut self, target: &str) {
        self.insts.extend([
            AsmInst::AddrSym(target.to_string()),
            AsmInst::Branch(Comp::Zero, Jump::JMP),
        ]);
    }

    /// The per-unit name of a static cell
    fn static_symbol(&self, index: u16) -> String {
        format!("{}.{}", self.unit_name, index)
    }

    /// addr = base + index, for the base-plus-offset segments
    fn base_offset_addr(&mut self, base: Register, index: u16) {
        self.insts.extend([
            AsmInst::AddrImm(index),
            AsmInst::Assign(Dest::D, Comp::A),
            AsmInst::AddrReg(base),
            AsmInst::Assign(Dest::D, Comp::DPlusM),
            AsmInst::AddrSym(SCRATCH_ADDR.to_string()),
            AsmInst::Assign(Dest::M, Comp::D),
        ]);
    }

    /// addr = 5 + index, for the temp segment
    fn temp_addr(&mut self, index: u16) {
        self.insts.extend([
            AsmInst::AddrImm(index),
            AsmInst::Assign(Dest::D, Comp::A),
            AsmInst::AddrImm(TEMP_BASE),
            AsmInst::Assign(Dest::D, Comp::DPlusA),
            AsmInst::AddrSym(SCRATCH_ADDR.to_string()),
            AsmInst::Assign(Dest::M, Comp::D),
        ]);
    }

    fn push_base_offset(&mut self, base: Register, index: u16) {
        self.base_offset_addr(base, index);
        self.push_through_addr();
    }

    fn pop_base_offset(&mut self, base: Register, index: u16) {
        self.base_offset_addr(base, index);
        self.pop_through_addr();
    }

    /// *SP = *addr; SP++
    fn push_through_addr(&mut self) {
        self.insts.extend([
            AsmInst::AddrSym(SCRATCH_ADDR.to_string()),
            AsmInst::Assign(Dest::A, Comp::M),
            AsmInst::Assign(Dest::D, Comp::M),
        ]);
        self.push_d();
    }

    /// SP--; *addr = *SP
    fn pop_through_addr(&mut self) {
        self.pop_to_d();
        self.insts.extend([
            AsmInst::AddrSym(SCRATCH_ADDR.to_string()),
            AsmInst::Assign(Dest::A, Comp::M),
            AsmInst::Assign(Dest::M, Comp::D),
        ]);
    }

    /// *SP = D; SP++
    fn push_d(&mut self) {
        self.insts.extend([
            AsmInst::AddrReg(Register::Sp),
            AsmInst::Assign(Dest::A, Comp::M),
            AsmInst::Assign(Dest::M, Comp::D),
            AsmInst::AddrReg(Register::Sp),
            AsmInst::Assign(Dest::M, Comp::MPlusOne),
        ]);
    }

    /// SP--; D = *SP
    fn pop_to_d(&mut self) {
        self.insts.extend([
            AsmInst::AddrReg(Register::Sp),
            AsmInst::Assign(Dest::M, Comp::MMinusOne),
            AsmInst::AddrReg(Register::Sp),
            AsmInst::Assign(Dest::A, Comp::M),
            AsmInst::Assign(Dest::D, Comp::M),
        ]);
    }

    /// SP--; D = comp of the old top (the arithmetic-op shape)
    fn pop_operand(&mut self, comp: Comp) {
        self.insts.extend([
            AsmInst::AddrReg(Register::Sp),
            AsmInst::Assign(Dest::M, Comp::MMinusOne),
            AsmInst::Assign(Dest::A, Comp::M),
            AsmInst::Assign(Dest::D, comp),
        ]);
    }
}

impl Default for CodeGen {
    fn default() -> Self {
        Self::new()
    }
}

fn pointer_register(
    index: u16,
    location: &SourceLocation,
) -> Result<Register, TranslateError> {
    match index {
        0 => Ok(Register::This),
        1 => Ok(Register::That),
        _ => Err(TranslateError::codegen(
            format!("pointer index out of range: {}", index),
            location,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Machine;
    use pretty_assertions::assert_eq;

    fn emit(commands: &[Command]) -> CodeGen {
        let mut gen = CodeGen::new();
        gen.set_unit_name("Test");
        for command in commands {
            gen.emit_command(command, &SourceLocation::dummy()).unwrap();
        }
        gen
    }

    fn markers(gen: &CodeGen) -> Vec<String> {
        gen.instructions()
            .iter()
            .filter_map(|inst| match inst {
                AsmInst::Marker(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// SP = 256 prelude plus the generated code, ready to execute
    fn runnable(gen: &CodeGen) -> Vec<AsmInst> {
        let mut program = vec![
            AsmInst::AddrImm(256),
            AsmInst::Assign(Dest::D, Comp::A),
            AsmInst::AddrReg(Register::Sp),
            AsmInst::Assign(Dest::M, Comp::D),
        ];
        program.extend(gen.instructions().iter().cloned());
        program
    }

    fn push_constant(index: u16) -> Command {
        Command::Push {
            segment: Segment::Constant,
            index,
        }
    }

    #[test]
    fn test_push_constant_sequence() {
        let gen = emit(&[push_constant(7)]);
        assert_eq!(
            gen.instructions(),
            &[
                AsmInst::Comment("PUSH CONSTANT 7".to_string()),
                AsmInst::AddrImm(7),
                AsmInst::Assign(Dest::D, Comp::A),
                AsmInst::AddrReg(Register::Sp),
                AsmInst::Assign(Dest::A, Comp::M),
                AsmInst::Assign(Dest::M, Comp::D),
                AsmInst::AddrReg(Register::Sp),
                AsmInst::Assign(Dest::M, Comp::MPlusOne),
            ]
        );
    }

    #[test]
    fn test_push_local_sequence() {
        let gen = emit(&[Command::Push {
            segment: Segment::Local,
            index: 2,
        }]);
        assert_eq!(
            gen.instructions(),
            &[
                AsmInst::Comment("PUSH LOCAL 2".to_string()),
                AsmInst::AddrImm(2),
                AsmInst::Assign(Dest::D, Comp::A),
                AsmInst::AddrReg(Register::Lcl),
                AsmInst::Assign(Dest::D, Comp::DPlusM),
                AsmInst::AddrSym("addr".to_string()),
                AsmInst::Assign(Dest::M, Comp::D),
                AsmInst::AddrSym("addr".to_string()),
                AsmInst::Assign(Dest::A, Comp::M),
                AsmInst::Assign(Dest::D, Comp::M),
                AsmInst::AddrReg(Register::Sp),
                AsmInst::Assign(Dest::A, Comp::M),
                AsmInst::Assign(Dest::M, Comp::D),
                AsmInst::AddrReg(Register::Sp),
                AsmInst::Assign(Dest::M, Comp::MPlusOne),
            ]
        );
    }

    #[test]
    fn test_pop_argument_sequence() {
        let gen = emit(&[Command::Pop {
            segment: Segment::Argument,
            index: 1,
        }]);
        assert_eq!(
            gen.instructions(),
            &[
                AsmInst::Comment("POP ARGUMENT 1".to_string()),
                AsmInst::AddrImm(1),
                AsmInst::Assign(Dest::D, Comp::A),
                AsmInst::AddrReg(Register::Arg),
                AsmInst::Assign(Dest::D, Comp::DPlusM),
                AsmInst::AddrSym("addr".to_string()),
                AsmInst::Assign(Dest::M, Comp::D),
                AsmInst::AddrReg(Register::Sp),
                AsmInst::Assign(Dest::M, Comp::MMinusOne),
                AsmInst::AddrReg(Register::Sp),
                AsmInst::Assign(Dest::A, Comp::M),
                AsmInst::Assign(Dest::D, Comp::M),
                AsmInst::AddrSym("addr".to_string()),
                AsmInst::Assign(Dest::A, Comp::M),
                AsmInst::Assign(Dest::M, Comp::D),
            ]
        );
    }

    #[test]
    fn test_static_cells_are_named_by_unit() {
        let gen = emit(&[
            Command::Push {
                segment: Segment::Static,
                index: 3,
            },
            Command::Pop {
                segment: Segment::Static,
                index: 0,
            },
        ]);
        let symbols: Vec<&str> = gen
            .instructions()
            .iter()
            .filter_map(|inst| match inst {
                AsmInst::AddrSym(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(symbols, vec!["Test.3", "Test.0"]);
    }

    #[test]
    fn test_pointer_addresses_the_base_registers() {
        let gen = emit(&[
            Command::Push {
                segment: Segment::Pointer,
                index: 0,
            },
            Command::Pop {
                segment: Segment::Pointer,
                index: 1,
            },
        ]);
        assert!(gen
            .instructions()
            .contains(&AsmInst::AddrReg(Register::This)));
        assert!(gen
            .instructions()
            .contains(&AsmInst::AddrReg(Register::That)));
    }

    #[test]
    fn test_pointer_index_out_of_range() {
        let mut gen = CodeGen::new();
        let location = SourceLocation::new("Test", 4);
        let err = gen
            .emit_command(
                &Command::Push {
                    segment: Segment::Pointer,
                    index: 2,
                },
                &location,
            )
            .unwrap_err();
        assert_eq!(
            format!("{}", err),
            "Code generation error at Test:4: pointer index out of range: 2"
        );
    }

    #[test]
    fn test_pop_constant_is_emitted_unchecked() {
        // Undefined behavior by contract; it must still be
        // structurally valid output.
        let gen = emit(&[Command::Pop {
            segment: Segment::Constant,
            index: 7,
        }]);
        let tail = &gen.instructions()[gen.instructions().len() - 2..];
        assert_eq!(
            tail,
            &[
                AsmInst::AddrImm(7),
                AsmInst::Assign(Dest::M, Comp::D),
            ]
        );
    }

    #[test]
    fn test_comparison_label_pairs_are_distinct() {
        let gen = emit(&[
            Command::Arithmetic(AluOp::Eq),
            Command::Arithmetic(AluOp::Eq),
        ]);
        assert_eq!(markers(&gen), vec!["TRUE_0", "FALSE_0", "TRUE_1", "FALSE_1"]);
    }

    #[test]
    fn test_comparison_counter_spans_operators() {
        let gen = emit(&[
            Command::Arithmetic(AluOp::Eq),
            Command::Arithmetic(AluOp::Gt),
            Command::Arithmetic(AluOp::Lt),
        ]);
        assert_eq!(
            markers(&gen),
            vec!["TRUE_0", "FALSE_0", "TRUE_1", "FALSE_1", "TRUE_2", "FALSE_2"]
        );
    }

    #[test]
    fn test_call_return_labels_count_up() {
        let gen = emit(&[
            Command::Call {
                name: "Lib.sum".to_string(),
                args: 2,
            },
            Command::Call {
                name: "Lib.sum".to_string(),
                args: 2,
            },
        ]);
        assert_eq!(markers(&gen), vec!["Lib.sum$return0", "Lib.sum$return1"]);
    }

    #[test]
    fn test_bootstrap_claims_return_index_zero() {
        let mut gen = CodeGen::new();
        gen.emit_bootstrap();
        gen.emit_command(
            &Command::Call {
                name: "Main.main".to_string(),
                args: 0,
            },
            &SourceLocation::dummy(),
        )
        .unwrap();
        assert_eq!(
            markers(&gen),
            vec!["Sys.init$return0", "Main.main$return1"]
        );
    }

    #[test]
    fn test_function_emits_marker_and_zeroed_locals() {
        let gen = emit(&[Command::Function {
            name: "Main.main".to_string(),
            locals: 2,
        }]);
        assert_eq!(gen.instructions()[1], AsmInst::Marker("Main.main".to_string()));
        let zero_pushes = gen
            .instructions()
            .iter()
            .filter(|inst| **inst == AsmInst::Comment("PUSH CONSTANT 0".to_string()))
            .count();
        assert_eq!(zero_pushes, 2);
    }

    #[test]
    fn test_goto_and_if_goto() {
        let gen = emit(&[
            Command::Label("Main.main$LOOP".to_string()),
            Command::Goto("Main.main$LOOP".to_string()),
            Command::IfGoto("Main.main$END".to_string()),
        ]);
        assert_eq!(markers(&gen), vec!["Main.main$LOOP"]);
        assert!(gen.instructions().contains(&AsmInst::Branch(Comp::Zero, Jump::JMP)));
        assert!(gen.instructions().contains(&AsmInst::Branch(Comp::D, Jump::JNE)));
        assert!(gen
            .instructions()
            .contains(&AsmInst::AddrSym("Main.main$END".to_string())));
    }

    // Execution tests: run generated code on the machine simulator
    // and check RAM effects.

    #[test]
    fn test_add_leaves_sum_on_stack() {
        let gen = emit(&[push_constant(7), push_constant(8), Command::Arithmetic(AluOp::Add)]);
        let machine = Machine::run(&runnable(&gen), 1_000);
        assert_eq!(machine.ram[0], 257); // net delta: +1 +1 -1
        assert_eq!(machine.ram[256], 15);
    }

    #[test]
    fn test_sub_and_neg() {
        let gen = emit(&[
            push_constant(10),
            push_constant(3),
            Command::Arithmetic(AluOp::Sub),
            Command::Arithmetic(AluOp::Neg),
        ]);
        let machine = Machine::run(&runnable(&gen), 1_000);
        assert_eq!(machine.ram[0], 257); // neg has net delta 0
        assert_eq!(machine.ram[256], -7);
    }

    #[test]
    fn test_bitwise_ops() {
        let gen = emit(&[
            push_constant(12),
            push_constant(10),
            Command::Arithmetic(AluOp::And),
            push_constant(1),
            Command::Arithmetic(AluOp::Or),
            Command::Arithmetic(AluOp::Not),
        ]);
        let machine = Machine::run(&runnable(&gen), 1_000);
        assert_eq!(machine.ram[0], 257);
        assert_eq!(machine.ram[256], !(12 & 10 | 1));
    }

    #[test]
    fn test_comparisons_push_all_ones_or_all_zeros() {
        for (op, x, y, expected) in [
            (AluOp::Eq, 3, 3, -1),
            (AluOp::Eq, 3, 4, 0),
            (AluOp::Gt, 5, 4, -1),
            (AluOp::Gt, 4, 5, 0),
            (AluOp::Lt, 4, 5, -1),
            (AluOp::Lt, 5, 4, 0),
        ] {
            let gen = emit(&[push_constant(x), push_constant(y), Command::Arithmetic(op)]);
            let machine = Machine::run(&runnable(&gen), 1_000);
            assert_eq!(machine.ram[0], 257);
            assert_eq!(machine.ram[256], expected, "{:?} {} {}", op, x, y);
        }
    }

    #[test]
    fn test_pop_local_writes_through_base_register() {
        // local base = 300, push constant 10, pop local 0
        let gen = emit(&[
            push_constant(10),
            Command::Pop {
                segment: Segment::Local,
                index: 0,
            },
        ]);
        let mut program = vec![
            AsmInst::AddrImm(300),
            AsmInst::Assign(Dest::D, Comp::A),
            AsmInst::AddrReg(Register::Lcl),
            AsmInst::Assign(Dest::M, Comp::D),
        ];
        program.extend(runnable(&gen));
        let machine = Machine::run(&program, 1_000);
        assert_eq!(machine.ram[300], 10);
        assert_eq!(machine.ram[0], 256); // +1 then -1
    }

    #[test]
    fn test_push_and_pop_temp() {
        let gen = emit(&[
            push_constant(42),
            Command::Pop {
                segment: Segment::Temp,
                index: 3,
            },
            Command::Push {
                segment: Segment::Temp,
                index: 3,
            },
        ]);
        let machine = Machine::run(&runnable(&gen), 1_000);
        assert_eq!(machine.ram[8], 42); // temp base 5 + 3
        assert_eq!(machine.ram[256], 42);
        assert_eq!(machine.ram[0], 257);
    }
}
