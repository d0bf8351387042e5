use crate::{
    analyzer::Variable,
    codegen::{ArithmeticOp, Emitter, Segment},
    error::{CompileError, ErrorKind},
    lexer::{Keyword, Symbol, TokenKind},
};

use super::Parser;

const MAX_CONSTANT: u16 = 32767;

/// What an identifier in statement or term position refers to, decided by the
/// token that follows it.
#[derive(Clone, Debug, PartialEq)]
pub enum Reference {
    /// `name`
    Variable(Variable),
    /// `name[...]`; the `[` is left current.
    ArrayAccess(Variable),
    /// `name(...)` or `name.sub(...)`; the `(` is left current.
    Call(Callee),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Callee {
    /// `sub(...)`: a method on the current object.
    Implicit(String),
    /// `var.sub(...)`: a method on the object held by `var`.
    Method(Variable, String),
    /// `Class.sub(...)`: a function or constructor.
    Function(String, String),
}

enum BinaryOp {
    Native(ArithmeticOp),
    Builtin(&'static str),
}

fn binary_op(symbol: Symbol) -> Option<BinaryOp> {
    let op = match symbol {
        Symbol::Plus => BinaryOp::Native(ArithmeticOp::Add),
        Symbol::Minus => BinaryOp::Native(ArithmeticOp::Sub),
        Symbol::Ampersand => BinaryOp::Native(ArithmeticOp::And),
        Symbol::Pipe => BinaryOp::Native(ArithmeticOp::Or),
        Symbol::LessThan => BinaryOp::Native(ArithmeticOp::Lt),
        Symbol::GreaterThan => BinaryOp::Native(ArithmeticOp::Gt),
        Symbol::Equal => BinaryOp::Native(ArithmeticOp::Eq),
        Symbol::Star => BinaryOp::Builtin("Math.multiply"),
        Symbol::Slash => BinaryOp::Builtin("Math.divide"),
        _ => return None,
    };
    Some(op)
}

fn unary_op(symbol: Symbol) -> Option<ArithmeticOp> {
    match symbol {
        Symbol::Minus => Some(ArithmeticOp::Neg),
        Symbol::Tilde => Some(ArithmeticOp::Not),
        Symbol::Caret => Some(ArithmeticOp::ShiftLeft),
        Symbol::Hash => Some(ArithmeticOp::ShiftRight),
        _ => None,
    }
}

impl<E: Emitter> Parser<E> {
    fn current_symbol(&self) -> Option<Symbol> {
        match self.tokens.current()?.kind {
            TokenKind::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Reads the identifier at the current token and decides what it names.
    /// Variables must be declared; anything followed by `.` that is not a
    /// variable is taken to be a class name.
    pub(super) fn classify(&mut self) -> Result<Reference, CompileError> {
        let pos = self.tokens.pos();
        let name = self.expect_ident()?;

        let reference = match self.current_symbol() {
            Some(Symbol::LeftParen) => Reference::Call(Callee::Implicit(name)),
            Some(Symbol::Dot) => {
                self.bump();
                let sub = self.expect_ident()?;
                match self.symbols.lookup(&name) {
                    Some(var) => Reference::Call(Callee::Method(var.clone(), sub)),
                    None => Reference::Call(Callee::Function(name, sub)),
                }
            }
            symbol => {
                let var = self
                    .symbols
                    .lookup(&name)
                    .cloned()
                    .ok_or_else(|| CompileError::new(pos, ErrorKind::UndeclaredVariable(name)))?;
                if symbol == Some(Symbol::LeftBracket) {
                    Reference::ArrayAccess(var)
                } else {
                    Reference::Variable(var)
                }
            }
        };
        Ok(reference)
    }

    fn push_var(&mut self, var: &Variable) {
        self.emitter.write_push(var.kind.into(), var.index);
    }

    /// "[" expression "]" following an array variable; leaves the element
    /// address on the stack.
    pub(super) fn parse_element_address(&mut self, var: &Variable) -> Result<(), CompileError> {
        self.push_var(var);
        self.expect(Symbol::LeftBracket)?;
        self.parse_expr()?;
        self.expect(Symbol::RightBracket)?;
        self.emitter.write_arithmetic(ArithmeticOp::Add);
        Ok(())
    }

    /// subroutineCall, starting at the "(" of the argument list.
    pub(super) fn parse_call(&mut self, callee: Callee) -> Result<(), CompileError> {
        let (target, receiver) = match callee {
            Callee::Implicit(sub) => {
                self.emitter.write_push(Segment::Pointer, 0);
                (format!("{}.{}", self.ctx.class_name(), sub), 1)
            }
            Callee::Method(var, sub) => {
                self.push_var(&var);
                (format!("{}.{}", var.ty, sub), 1)
            }
            Callee::Function(class, sub) => (format!("{}.{}", class, sub), 0),
        };

        self.expect(Symbol::LeftParen)?;
        let n_args = self.parse_expr_list()?;
        self.expect(Symbol::RightParen)?;
        self.emitter.write_call(&target, n_args + receiver);
        Ok(())
    }

    /// expressionList = (expression ("," expression)*)?
    fn parse_expr_list(&mut self) -> Result<u16, CompileError> {
        self.open("expressionList");
        let mut n = 0;
        if !self.is_symbol(Symbol::RightParen) {
            loop {
                self.parse_expr()?;
                n += 1;
                if !self.consume(Symbol::Comma) {
                    break;
                }
            }
        }
        self.close("expressionList");
        Ok(n)
    }

    /// expression = term (op term)*
    ///
    /// Operators have no precedence and are applied left to right.
    pub(super) fn parse_expr(&mut self) -> Result<(), CompileError> {
        self.open("expression");
        self.parse_term()?;
        while let Some(op) = self.current_symbol().and_then(binary_op) {
            self.bump();
            self.parse_term()?;
            match op {
                BinaryOp::Native(op) => self.emitter.write_arithmetic(op),
                BinaryOp::Builtin(func) => self.emitter.write_call(func, 2),
            }
        }
        self.close("expression");
        Ok(())
    }

    /// `String.new(len)` followed by one `appendChar` per character.
    fn parse_string(&mut self, s: &str) -> Result<(), CompileError> {
        let pos = self.tokens.pos();
        let len = s.chars().count();
        let n = u16::try_from(len)
            .ok()
            .filter(|&n| n <= MAX_CONSTANT)
            .ok_or_else(|| CompileError::new(pos, ErrorKind::StringTooLong(len)))?;
        self.emitter.write_push(Segment::Constant, n);
        self.emitter.write_call("String.new", 1);
        for c in s.chars() {
            let code = u16::try_from(u32::from(c))
                .ok()
                .filter(|&code| code <= MAX_CONSTANT)
                .ok_or_else(|| CompileError::new(pos, ErrorKind::CharacterOutOfRange(c)))?;
            self.emitter.write_push(Segment::Constant, code);
            self.emitter.write_call("String.appendChar", 2);
        }
        Ok(())
    }

    /// term = integerConstant | stringConstant | keywordConstant
    ///      | varName | varName "[" expression "]" | subroutineCall
    ///      | "(" expression ")" | unaryOp term
    fn parse_term(&mut self) -> Result<(), CompileError> {
        self.nested(|p| {
            p.open("term");
            p.parse_term_body()?;
            p.close("term");
            Ok(())
        })
    }

    fn parse_term_body(&mut self) -> Result<(), CompileError> {
        let Some(kind) = self.tokens.current().map(|t| t.kind.clone()) else {
            return Err(self.expected("a term"));
        };

        match kind {
            TokenKind::IntConst(n) => {
                self.bump();
                self.emitter.write_push(Segment::Constant, n);
            }
            TokenKind::StringConst(s) => {
                self.parse_string(&s)?;
                self.bump();
            }
            TokenKind::Keyword(Keyword::True) => {
                self.bump();
                self.emitter.write_push(Segment::Constant, 0);
                self.emitter.write_arithmetic(ArithmeticOp::Not);
            }
            TokenKind::Keyword(Keyword::False | Keyword::Null) => {
                self.bump();
                self.emitter.write_push(Segment::Constant, 0);
            }
            TokenKind::Keyword(Keyword::This) => {
                self.bump();
                self.emitter.write_push(Segment::Pointer, 0);
            }
            TokenKind::Symbol(Symbol::LeftParen) => {
                self.bump();
                self.parse_expr()?;
                self.expect(Symbol::RightParen)?;
            }
            TokenKind::Symbol(s) => {
                let Some(op) = unary_op(s) else {
                    return Err(self.expected("a term"));
                };
                self.bump();
                self.parse_term()?;
                self.emitter.write_arithmetic(op);
            }
            TokenKind::Identifier(_) => match self.classify()? {
                Reference::Variable(var) => self.push_var(&var),
                Reference::ArrayAccess(var) => {
                    self.parse_element_address(&var)?;
                    self.emitter.write_pop(Segment::Pointer, 1);
                    self.emitter.write_push(Segment::That, 0);
                }
                Reference::Call(callee) => self.parse_call(callee)?,
            },
            _ => return Err(self.expected("a term")),
        }
        Ok(())
    }
}
