use super::{ArithmeticOp, Instruction, Segment};

/// Sink for generated instructions. Only [`Emitter::emit`] is required.
pub trait Emitter {
    fn emit(&mut self, instruction: Instruction);

    fn write_push(&mut self, seg: Segment, index: u16) {
        self.emit(Instruction::Push(seg, index));
    }

    fn write_pop(&mut self, seg: Segment, index: u16) {
        self.emit(Instruction::Pop(seg, index));
    }

    fn write_arithmetic(&mut self, op: ArithmeticOp) {
        self.emit(Instruction::Arithmetic(op));
    }

    fn write_label(&mut self, label: &str) {
        self.emit(Instruction::Label(label.to_string()));
    }

    fn write_goto(&mut self, label: &str) {
        self.emit(Instruction::Goto(label.to_string()));
    }

    fn write_if(&mut self, label: &str) {
        self.emit(Instruction::IfGoto(label.to_string()));
    }

    fn write_function(&mut self, name: &str, n_locals: u16) {
        self.emit(Instruction::Function(name.to_string(), n_locals));
    }

    fn write_call(&mut self, name: &str, n_args: u16) {
        self.emit(Instruction::Call(name.to_string(), n_args));
    }

    fn write_return(&mut self) {
        self.emit(Instruction::Return);
    }
}

impl Emitter for Vec<Instruction> {
    fn emit(&mut self, instruction: Instruction) {
        log::trace!("{}", instruction);
        Vec::push(self, instruction);
    }
}

/// Discards everything, for runs that only want the syntax tree.
impl Emitter for () {
    fn emit(&mut self, _: Instruction) {}
}
