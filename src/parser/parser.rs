use crate::{
    analyzer::{StorageClass, SymbolTable},
    codegen::{ArithmeticOp, Emitter, Segment},
    error::{CompileError, ErrorKind},
    lexer::{Keyword, Symbol, Token, TokenKind, TokenStream},
};

use super::{
    context::{EmissionContext, SubroutineKind},
    tree::SyntaxTree,
    Reference,
};

const ALLOC_FUNC: &str = "Memory.alloc";

/// How deep blocks and terms may nest before the input is rejected.
pub const MAX_NESTING: usize = 256;

/// Recursive-descent translator. Every `parse_*` method consumes exactly the
/// tokens of its production and emits the matching instructions as it goes,
/// leaving the token after the production current.
pub struct Parser<E: Emitter> {
    pub(super) tokens: TokenStream,
    pub(super) symbols: SymbolTable,
    pub(super) ctx: EmissionContext,
    pub(super) emitter: E,
    tree: Option<SyntaxTree>,
    depth: usize,
}

impl<E: Emitter> Parser<E> {
    pub fn new(tokens: Vec<Token>, emitter: E) -> Self {
        Self {
            tokens: TokenStream::new(tokens),
            symbols: SymbolTable::new(),
            ctx: EmissionContext::new(),
            emitter,
            tree: None,
            depth: 0,
        }
    }

    /// Also record the parse as nested XML; see [`Parser::take_syntax_tree`].
    pub fn with_syntax_tree(mut self) -> Self {
        self.tree = Some(SyntaxTree::default());
        self
    }

    pub fn take_syntax_tree(&mut self) -> Option<SyntaxTree> {
        self.tree.take()
    }

    /// Compiles the one class the token stream holds.
    pub fn parse(&mut self) -> Result<(), CompileError> {
        self.tokens.advance()?;
        self.parse_class()?;

        if let Some(t) = self.tokens.current() {
            return Err(CompileError::new(
                t.pos,
                ErrorKind::TrailingInput(t.kind.to_string()),
            ));
        }
        Ok(())
    }

    pub fn symbol_table(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn into_emitter(self) -> E {
        self.emitter
    }

    /// Moves past the current token, recording it in the syntax tree.
    pub(super) fn bump(&mut self) {
        if let (Some(tree), Some(token)) = (self.tree.as_mut(), self.tokens.current()) {
            tree.terminal(token);
        }
        self.tokens.step();
    }

    pub(super) fn open(&mut self, node: &str) {
        if let Some(tree) = self.tree.as_mut() {
            tree.open(node);
        }
    }

    pub(super) fn close(&mut self, node: &str) {
        if let Some(tree) = self.tree.as_mut() {
            tree.close(node);
        }
    }

    /// Runs `f` one nesting level deeper, failing once [`MAX_NESTING`] is
    /// reached instead of exhausting the stack.
    pub(super) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, CompileError>,
    ) -> Result<T, CompileError> {
        if self.depth >= MAX_NESTING {
            return Err(CompileError::new(
                self.tokens.pos(),
                ErrorKind::NestingTooDeep(MAX_NESTING),
            ));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    pub(super) fn found(&self) -> String {
        self.tokens
            .current()
            .map(|t| t.kind.to_string())
            .unwrap_or_else(|| "end of input".to_string())
    }

    pub(super) fn expected(&self, expected: &str) -> CompileError {
        CompileError::new(
            self.tokens.pos(),
            ErrorKind::Expected {
                expected: expected.to_string(),
                found: self.found(),
            },
        )
    }

    pub(super) fn is_symbol(&self, symbol: Symbol) -> bool {
        matches!(self.tokens.current(), Some(Token { kind: TokenKind::Symbol(s), .. }) if *s == symbol)
    }

    pub(super) fn current_keyword(&self) -> Option<Keyword> {
        match self.tokens.current()?.kind {
            TokenKind::Keyword(k) => Some(k),
            _ => None,
        }
    }

    pub(super) fn current_ident(&self) -> Option<String> {
        match &self.tokens.current()?.kind {
            TokenKind::Identifier(name) => Some(name.clone()),
            _ => None,
        }
    }

    pub(super) fn consume(&mut self, symbol: Symbol) -> bool {
        if !self.is_symbol(symbol) {
            return false;
        }
        self.bump();
        true
    }

    pub(super) fn expect(&mut self, symbol: Symbol) -> Result<(), CompileError> {
        if !self.consume(symbol) {
            return Err(self.expected(&format!("'{}'", symbol.as_char())));
        }
        Ok(())
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), CompileError> {
        if self.current_keyword() != Some(keyword) {
            return Err(self.expected(&format!("'{}'", keyword.as_str())));
        }
        self.bump();
        Ok(())
    }

    pub(super) fn expect_ident(&mut self) -> Result<String, CompileError> {
        let Some(Token {
            kind: TokenKind::Identifier(name),
            ..
        }) = self.tokens.current()
        else {
            return Err(self.expected("an identifier"));
        };
        let name = name.clone();
        self.bump();
        Ok(name)
    }

    /// type = "int" | "char" | "boolean" | className
    fn parse_type(&mut self) -> Result<String, CompileError> {
        let ty = match self.tokens.current().map(|t| &t.kind) {
            Some(TokenKind::Keyword(k @ (Keyword::Int | Keyword::Char | Keyword::Boolean))) => {
                k.as_str().to_string()
            }
            Some(TokenKind::Identifier(name)) => name.clone(),
            _ => return Err(self.expected("a type")),
        };
        self.bump();
        Ok(ty)
    }

    /// class = "class" className "{" classVarDec* subroutineDec* "}"
    fn parse_class(&mut self) -> Result<(), CompileError> {
        self.open("class");
        self.expect_keyword(Keyword::Class)?;
        let name = self.expect_ident()?;
        self.ctx.start_class(&name);
        self.expect(Symbol::LeftBrace)?;

        while let Some(kind @ (Keyword::Static | Keyword::Field)) = self.current_keyword() {
            self.open("classVarDec");
            self.bump();
            let storage = if kind == Keyword::Static {
                StorageClass::Static
            } else {
                StorageClass::Field
            };
            self.parse_var_names(storage)?;
            self.close("classVarDec");
        }

        while let Some(kind @ (Keyword::Constructor | Keyword::Function | Keyword::Method)) =
            self.current_keyword()
        {
            self.open("subroutineDec");
            self.bump();
            let kind = match kind {
                Keyword::Constructor => SubroutineKind::Constructor,
                Keyword::Method => SubroutineKind::Method,
                _ => SubroutineKind::Function,
            };
            self.parse_subroutine(kind)?;
            self.close("subroutineDec");
        }

        self.expect(Symbol::RightBrace)?;
        self.close("class");
        log::debug!(
            "compiled class {} ({} static, {} field)",
            name,
            self.symbols.var_count(StorageClass::Static),
            self.symbols.var_count(StorageClass::Field)
        );
        Ok(())
    }

    /// Shared tail of classVarDec and varDec:
    /// type varName ("," varName)* ";"
    fn parse_var_names(&mut self, storage: StorageClass) -> Result<(), CompileError> {
        let ty = self.parse_type()?;
        let name = self.expect_ident()?;
        self.symbols.define(&name, &ty, storage);
        while self.consume(Symbol::Comma) {
            let name = self.expect_ident()?;
            self.symbols.define(&name, &ty, storage);
        }
        self.expect(Symbol::SemiColon)
    }

    /// subroutineDec = ("constructor" | "function" | "method") ("void" | type)
    ///                 subroutineName "(" parameterList ")" subroutineBody
    fn parse_subroutine(&mut self, kind: SubroutineKind) -> Result<(), CompileError> {
        let returns_void = if self.current_keyword() == Some(Keyword::Void) {
            self.bump();
            true
        } else {
            self.parse_type()?;
            false
        };
        let name = self.expect_ident()?;

        self.symbols.start_subroutine();
        if kind == SubroutineKind::Method {
            let class_name = self.ctx.class_name().to_string();
            self.symbols.define("this", &class_name, StorageClass::Argument);
        }
        self.ctx.start_subroutine(&name, kind, returns_void);

        self.expect(Symbol::LeftParen)?;
        self.parse_parameter_list()?;
        self.expect(Symbol::RightParen)?;
        self.parse_subroutine_body()?;

        log::debug!("compiled {:?} {}", kind, self.ctx.qualified_name());
        Ok(())
    }

    /// parameterList = ((type varName) ("," type varName)*)?
    fn parse_parameter_list(&mut self) -> Result<(), CompileError> {
        self.open("parameterList");
        if !self.is_symbol(Symbol::RightParen) {
            loop {
                let ty = self.parse_type()?;
                let name = self.expect_ident()?;
                self.symbols.define(&name, &ty, StorageClass::Argument);
                if !self.consume(Symbol::Comma) {
                    break;
                }
            }
        }
        self.close("parameterList");
        Ok(())
    }

    /// subroutineBody = "{" varDec* statements "}"
    fn parse_subroutine_body(&mut self) -> Result<(), CompileError> {
        self.open("subroutineBody");
        self.expect(Symbol::LeftBrace)?;
        while self.current_keyword() == Some(Keyword::Var) {
            self.open("varDec");
            self.bump();
            self.parse_var_names(StorageClass::Local)?;
            self.close("varDec");
        }

        let n_locals = self.symbols.var_count(StorageClass::Local);
        self.emitter.write_function(&self.ctx.qualified_name(), n_locals);
        match self.ctx.subroutine_kind() {
            SubroutineKind::Constructor => {
                let n_fields = self.symbols.var_count(StorageClass::Field);
                self.emitter.write_push(Segment::Constant, n_fields);
                self.emitter.write_call(ALLOC_FUNC, 1);
                self.emitter.write_pop(Segment::Pointer, 0);
            }
            SubroutineKind::Method => {
                self.emitter.write_push(Segment::Argument, 0);
                self.emitter.write_pop(Segment::Pointer, 0);
            }
            SubroutineKind::Function => (),
        }

        self.parse_statements()?;
        self.expect(Symbol::RightBrace)?;
        self.close("subroutineBody");
        Ok(())
    }

    /// statements = (let | if | while | do | return)*
    fn parse_statements(&mut self) -> Result<(), CompileError> {
        self.open("statements");
        loop {
            match self.current_keyword() {
                Some(Keyword::Let) => self.parse_statement("letStatement", Self::parse_let)?,
                Some(Keyword::If) => self.parse_statement("ifStatement", Self::parse_if)?,
                Some(Keyword::While) => {
                    self.parse_statement("whileStatement", Self::parse_while)?
                }
                Some(Keyword::Do) => self.parse_statement("doStatement", Self::parse_do)?,
                Some(Keyword::Return) => {
                    self.parse_statement("returnStatement", Self::parse_return)?
                }
                _ => break,
            }
        }
        self.close("statements");
        Ok(())
    }

    fn parse_statement(
        &mut self,
        node: &str,
        parse: fn(&mut Self) -> Result<(), CompileError>,
    ) -> Result<(), CompileError> {
        self.open(node);
        parse(self)?;
        self.close(node);
        Ok(())
    }

    /// "{" statements "}"
    fn parse_block(&mut self) -> Result<(), CompileError> {
        self.nested(|p| {
            p.expect(Symbol::LeftBrace)?;
            p.parse_statements()?;
            p.expect(Symbol::RightBrace)
        })
    }

    /// "(" expression ")"
    fn parse_condition(&mut self) -> Result<(), CompileError> {
        self.expect(Symbol::LeftParen)?;
        self.parse_expr()?;
        self.expect(Symbol::RightParen)
    }

    /// let = "let" varName ("[" expression "]")? "=" expression ";"
    fn parse_let(&mut self) -> Result<(), CompileError> {
        self.bump();
        let pos = self.tokens.pos();
        let Some(name) = self.current_ident() else {
            return Err(self.expected("a variable name"));
        };

        match self.classify()? {
            Reference::Variable(var) => {
                self.expect(Symbol::Equal)?;
                self.parse_expr()?;
                self.expect(Symbol::SemiColon)?;
                self.emitter.write_pop(var.kind.into(), var.index);
            }
            Reference::ArrayAccess(var) => {
                self.parse_element_address(&var)?;
                self.expect(Symbol::Equal)?;
                self.parse_expr()?;
                self.expect(Symbol::SemiColon)?;
                // The right-hand side may itself rebind `that`, so the value is
                // staged in temp 0 before pointer 1 is set.
                self.emitter.write_pop(Segment::Temp, 0);
                self.emitter.write_pop(Segment::Pointer, 1);
                self.emitter.write_push(Segment::Temp, 0);
                self.emitter.write_pop(Segment::That, 0);
            }
            Reference::Call(_) => {
                return Err(CompileError::new(pos, ErrorKind::NotAssignable(name)));
            }
        }
        Ok(())
    }

    /// if = "if" "(" expression ")" "{" statements "}" ("else" "{" statements "}")?
    fn parse_if(&mut self) -> Result<(), CompileError> {
        self.bump();
        let labels = self.ctx.next_if_labels();

        self.parse_condition()?;
        self.emitter.write_if(&labels.if_true);
        self.emitter.write_goto(&labels.if_false);
        self.emitter.write_label(&labels.if_true);
        self.parse_block()?;

        if self.current_keyword() == Some(Keyword::Else) {
            self.bump();
            self.emitter.write_goto(&labels.end);
            self.emitter.write_label(&labels.if_false);
            self.parse_block()?;
            self.emitter.write_label(&labels.end);
        } else {
            self.emitter.write_label(&labels.if_false);
        }
        Ok(())
    }

    /// while = "while" "(" expression ")" "{" statements "}"
    fn parse_while(&mut self) -> Result<(), CompileError> {
        self.bump();
        let labels = self.ctx.next_while_labels();

        self.emitter.write_label(&labels.exp);
        self.parse_condition()?;
        self.emitter.write_arithmetic(ArithmeticOp::Not);
        self.emitter.write_if(&labels.end);
        self.parse_block()?;
        self.emitter.write_goto(&labels.exp);
        self.emitter.write_label(&labels.end);
        Ok(())
    }

    /// do = "do" subroutineCall ";"
    fn parse_do(&mut self) -> Result<(), CompileError> {
        self.bump();
        if self.current_ident().is_none() {
            return Err(self.expected("a subroutine call"));
        }

        let Reference::Call(callee) = self.classify()? else {
            return Err(self.expected("'(' or '.'"));
        };
        self.parse_call(callee)?;
        self.expect(Symbol::SemiColon)?;
        // Discard the return value.
        self.emitter.write_pop(Segment::Temp, 0);
        Ok(())
    }

    /// return = "return" expression? ";"
    fn parse_return(&mut self) -> Result<(), CompileError> {
        self.bump();
        if self.is_symbol(Symbol::SemiColon) {
            if !self.ctx.returns_void() {
                log::warn!(
                    "{}: {} returns no value",
                    self.tokens.pos(),
                    self.ctx.qualified_name()
                );
            }
            // The calling convention always expects a value on the stack.
            self.emitter.write_push(Segment::Constant, 0);
        } else {
            if self.ctx.returns_void() {
                log::warn!(
                    "{}: void {} returns a value",
                    self.tokens.pos(),
                    self.ctx.qualified_name()
                );
            }
            self.parse_expr()?;
        }
        self.expect(Symbol::SemiColon)?;
        self.emitter.write_return();
        Ok(())
    }
}
