//! Recursive-descent statement parser with a precedence-climbing
//! expression parser.
//!
//! Two error-handling policies coexist, matching the original: inside a
//! single statement, a mismatched `eat()` is fatal to that statement
//! (returns `Err`); at the top level, a failed statement is reported and
//! the parser resynchronizes to the next statement boundary and keeps
//! going, so one bad statement doesn't abort the whole file.

use crate::ast::*;
use crate::diagnostics::Diagnostics;
use crate::token::{OpKind, Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

pub fn parse(tokens: Vec<Token>, diags: &mut Diagnostics) -> Program {
    let mut parser = Parser { tokens, pos: 0 };
    let mut statements = Vec::new();
    while !parser.check(TokenKind::Eof) {
        match parser.parse_statement() {
            Ok(stmt) => statements.push(stmt),
            Err(message) => {
                diags.error(message);
                parser.synchronize();
            }
        }
    }
    Program { statements }
}

fn is_compound_or_simple_assign(op: OpKind) -> bool {
    matches!(
        op,
        OpKind::Assign
            | OpKind::AddAssign
            | OpKind::SubAssign
            | OpKind::MulAssign
            | OpKind::DivAssign
            | OpKind::ModAssign
            | OpKind::AndAssign
            | OpKind::XorAssign
            | OpKind::OrAssign
            | OpKind::ShlAssign
            | OpKind::ShrAssign
    )
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn advance(&mut self) -> &Token {
        let tok = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, kind: TokenKind) -> Result<Token, String> {
        if self.check(kind) {
            Ok(self.advance().clone())
        } else {
            let tok = self.peek();
            Err(format!(
                "expected {kind} but found {} ('{}') at {}:{}",
                tok.kind, tok.lexeme, tok.line, tok.col
            ))
        }
    }

    fn eat_optional_semicolon(&mut self) {
        if self.check(TokenKind::Semicolon) {
            self.advance();
        }
    }

    fn synchronize(&mut self) {
        while !self.check(TokenKind::Eof) {
            if self.check(TokenKind::Semicolon) {
                self.advance();
                return;
            }
            if self.check(TokenKind::RBrace) {
                return;
            }
            self.advance();
        }
    }

    // ---- statements ----

    fn parse_block(&mut self) -> Result<Vec<Stmt>, String> {
        self.eat(TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.check(TokenKind::Eof) {
            stmts.push(self.parse_statement()?);
        }
        self.eat(TokenKind::RBrace)?;
        Ok(stmts)
    }

    fn parse_statement(&mut self) -> Result<Stmt, String> {
        match self.peek().kind {
            TokenKind::LBrace => Ok(Stmt::Block(self.parse_block()?)),
            TokenKind::Struct => self.parse_struct_definition(),
            TokenKind::Extends => self.parse_extends_statement(),
            TokenKind::Constructor => self.parse_constructor_definition(),
            TokenKind::Return => self.parse_return(),
            TokenKind::If => self.parse_if_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Continue => {
                self.advance();
                self.eat(TokenKind::Semicolon)?;
                Ok(Stmt::Continue)
            }
            TokenKind::Break => {
                self.advance();
                self.eat(TokenKind::Semicolon)?;
                Ok(Stmt::Break)
            }
            TokenKind::Static => self.parse_static_definition(),
            TokenKind::Extern => self.parse_extern_statement(),
            TokenKind::Id => self.parse_declaration_or_expr_statement(),
            _ => {
                let expr = self.parse_expr()?;
                self.eat(TokenKind::Semicolon)?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    /// Disambiguates `Type name ...` declarations from expression
    /// statements that merely start with an identifier, by speculatively
    /// parsing a type + name and backtracking if that shape doesn't
    /// continue into `(`, `=` or `;`.
    fn parse_declaration_or_expr_statement(&mut self) -> Result<Stmt, String> {
        let checkpoint = self.pos;
        if let Ok(ty) = self.parse_type() {
            if self.check(TokenKind::Id) {
                let name = self.advance().clone().lexeme;
                if self.check(TokenKind::LParen) {
                    return self.parse_function_definition(ty, name);
                }
                if self.check(TokenKind::Assign) {
                    self.advance();
                    let init = self.parse_expr()?;
                    self.eat(TokenKind::Semicolon)?;
                    return Ok(Stmt::VarDecl { ty, name, init: Some(init) });
                }
                if self.check(TokenKind::Semicolon) {
                    self.advance();
                    return Ok(Stmt::VarDecl { ty, name, init: None });
                }
            }
        }
        self.pos = checkpoint;
        let expr = self.parse_expr()?;
        self.eat(TokenKind::Semicolon)?;
        Ok(Stmt::Expr(expr))
    }

    fn parse_type(&mut self) -> Result<TypeRef, String> {
        let name = self.eat(TokenKind::Id)?.lexeme;
        let mut generic_args = Vec::new();
        if self.check(TokenKind::Lt) {
            self.advance();
            generic_args.push(self.parse_type()?);
            while self.check(TokenKind::Comma) {
                self.advance();
                generic_args.push(self.parse_type()?);
            }
            self.eat(TokenKind::Gt)?;
        }
        let mut pointer_depth = 0;
        while self.check(TokenKind::Mul) {
            self.advance();
            pointer_depth += 1;
        }
        Ok(TypeRef {
            name,
            generic_args,
            pointer_depth,
        })
    }

    fn parse_function_parameters(&mut self) -> Result<Vec<Param>, String> {
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                let ty = self.parse_type()?;
                let name = self.eat(TokenKind::Id)?.lexeme;
                params.push(Param { ty, name });
                if self.check(TokenKind::Comma) {
                    self.advance();
                    continue;
                }
                break;
            }
        }
        Ok(params)
    }

    fn parse_function_definition(&mut self, return_ty: TypeRef, name: String) -> Result<Stmt, String> {
        self.parse_function_definition_with_static(return_ty, name, false)
    }

    fn parse_function_definition_with_static(
        &mut self,
        return_ty: TypeRef,
        name: String,
        is_static: bool,
    ) -> Result<Stmt, String> {
        self.eat(TokenKind::LParen)?;
        let params = self.parse_function_parameters()?;
        self.eat(TokenKind::RParen)?;
        let body = self.parse_function_body()?;
        Ok(Stmt::FunctionDef(FunctionDef {
            name,
            return_ty,
            params,
            body,
            is_static,
            mangled_name: None,
        }))
    }

    /// A block `{ ... }`, or the single-expression form `= expr;`.
    fn parse_function_body(&mut self) -> Result<FunctionBody, String> {
        if self.check(TokenKind::Assign) {
            self.advance();
            let expr = self.parse_expr()?;
            self.eat(TokenKind::Semicolon)?;
            Ok(FunctionBody::Expr(expr))
        } else {
            Ok(FunctionBody::Block(self.parse_block()?))
        }
    }

    fn parse_struct_definition(&mut self) -> Result<Stmt, String> {
        self.eat(TokenKind::Struct)?;
        let name = self.eat(TokenKind::Id)?.lexeme;
        let mut generic_params = Vec::new();
        if self.check(TokenKind::Lt) {
            self.advance();
            generic_params.push(self.eat(TokenKind::Id)?.lexeme);
            while self.check(TokenKind::Comma) {
                self.advance();
                generic_params.push(self.eat(TokenKind::Id)?.lexeme);
            }
            self.eat(TokenKind::Gt)?;
        }
        self.eat(TokenKind::LBrace)?;
        let mut fields = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.check(TokenKind::Eof) {
            let ty = self.parse_type()?;
            let field_name = self.eat(TokenKind::Id)?.lexeme;
            self.eat(TokenKind::Semicolon)?;
            fields.push(StructField { ty, name: field_name });
        }
        self.eat(TokenKind::RBrace)?;
        self.eat_optional_semicolon();
        Ok(Stmt::StructDef(StructDef {
            name,
            generic_params,
            fields,
        }))
    }

    fn parse_constructor_body(&mut self, struct_name: &str) -> Result<ConstructorDef, String> {
        if self.check(TokenKind::Constructor) {
            self.advance();
        }
        self.eat(TokenKind::LParen)?;
        let params = self.parse_function_parameters()?;
        self.eat(TokenKind::RParen)?;
        let body = self.parse_block()?;
        Ok(ConstructorDef {
            struct_name: struct_name.to_string(),
            params,
            body,
            mangled_name: None,
        })
    }

    fn parse_constructor_definition(&mut self) -> Result<Stmt, String> {
        self.eat(TokenKind::Constructor)?;
        let struct_name = self.eat(TokenKind::Id)?.lexeme;
        let def = self.parse_constructor_body(&struct_name)?;
        Ok(Stmt::ConstructorDef(def))
    }

    fn parse_extends_member(&mut self, struct_name: &str) -> Result<ExtendsMember, String> {
        if self.check(TokenKind::Constructor) {
            return self
                .parse_constructor_body(struct_name)
                .map(ExtendsMember::Constructor);
        }
        let ty = self.parse_type()?;
        let name = self.eat(TokenKind::Id)?.lexeme;
        if self.check(TokenKind::LParen) {
            match self.parse_function_definition(ty, name)? {
                Stmt::FunctionDef(f) => Ok(ExtendsMember::Method(f)),
                _ => unreachable!("parse_function_definition always returns FunctionDef"),
            }
        } else {
            self.eat(TokenKind::Semicolon)?;
            Ok(ExtendsMember::Field(StructField { ty, name }))
        }
    }

    /// `extends Name { ... }` or `extends Name::Parent { ... }`. The
    /// `::` separator reuses the token the lexer already scans for
    /// static calls rather than adding a dedicated colon token.
    fn parse_extends_statement(&mut self) -> Result<Stmt, String> {
        self.eat(TokenKind::Extends)?;
        let struct_name = self.eat(TokenKind::Id)?.lexeme;
        let parent = if self.check(TokenKind::StaticCall) {
            self.advance();
            Some(self.eat(TokenKind::Id)?.lexeme)
        } else {
            None
        };
        self.eat(TokenKind::LBrace)?;
        let mut members = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.check(TokenKind::Eof) {
            members.push(self.parse_extends_member(&struct_name)?);
        }
        self.eat(TokenKind::RBrace)?;
        Ok(Stmt::ExtendsStmt(ExtendsStmt {
            struct_name,
            parent,
            members,
        }))
    }

    fn parse_return(&mut self) -> Result<Stmt, String> {
        self.eat(TokenKind::Return)?;
        if self.check(TokenKind::Semicolon) {
            self.advance();
            return Ok(Stmt::Return(None));
        }
        let expr = self.parse_expr()?;
        self.eat(TokenKind::Semicolon)?;
        Ok(Stmt::Return(Some(expr)))
    }

    fn parse_if_statement(&mut self) -> Result<Stmt, String> {
        self.eat(TokenKind::If)?;
        self.eat(TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.eat(TokenKind::RParen)?;
        let then_branch = Box::new(self.parse_statement()?);
        let else_branch = if self.check(TokenKind::Else) {
            self.advance();
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(Stmt::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    fn parse_while_statement(&mut self) -> Result<Stmt, String> {
        self.eat(TokenKind::While)?;
        self.eat(TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.eat(TokenKind::RParen)?;
        let body = Box::new(self.parse_statement()?);
        Ok(Stmt::While { cond, body })
    }

    fn parse_for_statement(&mut self) -> Result<Stmt, String> {
        self.eat(TokenKind::For)?;
        self.eat(TokenKind::LParen)?;
        let init = if self.check(TokenKind::Semicolon) {
            self.advance();
            None
        } else {
            Some(Box::new(self.parse_declaration_or_expr_statement()?))
        };
        let cond = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.eat(TokenKind::Semicolon)?;
        let step = if self.check(TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.eat(TokenKind::RParen)?;
        let body = Box::new(self.parse_statement()?);
        Ok(Stmt::For {
            init,
            cond,
            step,
            body,
        })
    }

    /// Top-level `static ReturnType name(...) {...}`, a function definition
    /// with `isStatic` set (spec §3.2/§4.2.1).
    fn parse_static_definition(&mut self) -> Result<Stmt, String> {
        self.eat(TokenKind::Static)?;
        let return_ty = self.parse_type()?;
        let name = self.eat(TokenKind::Id)?.lexeme;
        self.parse_function_definition_with_static(return_ty, name, true)
    }

    fn parse_extern_statement(&mut self) -> Result<Stmt, String> {
        let tok = self.advance().clone();
        if tok.lexeme == "extern" {
            let name = self.eat(TokenKind::Id)?.lexeme;
            self.eat(TokenKind::Semicolon)?;
            Ok(Stmt::ExternLib(name))
        } else {
            self.eat_optional_semicolon();
            Ok(Stmt::Expr(Expr::ExternRaw(tok.lexeme)))
        }
    }

    // ---- expressions ----

    fn parse_expr(&mut self) -> Result<Expr, String> {
        self.parse_assign_expr()
    }

    fn parse_assign_expr(&mut self) -> Result<Expr, String> {
        let lhs = self.parse_binary_expr(0)?;
        if let Some(op) = OpKind::from_token(&self.peek().kind).filter(|op| is_compound_or_simple_assign(*op)) {
            self.advance();
            let value = self.parse_assign_expr()?;
            return Ok(Expr::Assign {
                op,
                target: Box::new(lhs),
                value: Box::new(value),
            });
        }
        Ok(lhs)
    }

    /// Precedence-climbing: only recurses into the right-hand side when
    /// the next operator binds strictly tighter, which keeps same-precedence
    /// chains left-associative.
    fn parse_binary_expr(&mut self, min_prec: i32) -> Result<Expr, String> {
        let mut lhs = self.parse_unary_expr()?;
        loop {
            let candidate = OpKind::from_token(&self.peek().kind)
                .filter(|op| !is_compound_or_simple_assign(*op))
                .and_then(|op| op.precedence().map(|prec| (op, prec)));
            let (op, prec) = match candidate {
                Some((op, prec)) if prec >= min_prec => (op, prec),
                _ => break,
            };
            self.advance();
            let rhs = self.parse_binary_expr(prec + 1)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_unary_expr(&mut self) -> Result<Expr, String> {
        match self.peek().kind {
            TokenKind::Sub | TokenKind::Add | TokenKind::Not | TokenKind::Complement | TokenKind::Inc | TokenKind::Dec => {
                let op_tok = self.advance().clone();
                let op = OpKind::from_token(&op_tok.kind).expect("unary-capable token maps to an OpKind");
                let operand = self.parse_unary_expr()?;
                Ok(Expr::Unary {
                    op,
                    operand: Box::new(operand),
                })
            }
            _ => self.parse_postfix_expr(),
        }
    }

    fn parse_postfix_expr(&mut self) -> Result<Expr, String> {
        let mut expr = self.parse_primary_expr()?;
        loop {
            if self.check(TokenKind::Dot) {
                self.advance();
                let name = self.eat(TokenKind::Id)?.lexeme;
                if self.check(TokenKind::LParen) {
                    let call = self.parse_call_tail(name)?;
                    expr = Expr::MethodCall {
                        receiver: Box::new(expr),
                        call,
                    };
                } else {
                    expr = Expr::FieldAccess {
                        receiver: Box::new(expr),
                        field: name,
                    };
                }
            } else if self.check(TokenKind::Inc) || self.check(TokenKind::Dec) {
                let op_tok = self.advance().clone();
                let op = OpKind::from_token(&op_tok.kind).expect("postfix token maps to an OpKind");
                expr = Expr::Unary {
                    op,
                    operand: Box::new(expr),
                };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_call_tail(&mut self, name: String) -> Result<Call, String> {
        self.eat(TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            args.push(self.parse_expr()?);
            while self.check(TokenKind::Comma) {
                self.advance();
                args.push(self.parse_expr()?);
            }
        }
        self.eat(TokenKind::RParen)?;
        Ok(Call {
            name,
            args,
            signature: None,
        })
    }

    fn parse_primary_expr(&mut self) -> Result<Expr, String> {
        match self.peek().kind {
            TokenKind::Int => self.parse_int_expr(),
            TokenKind::Float => self.parse_float_expr(),
            TokenKind::Str => self.parse_string_expr(),
            TokenKind::LParen => self.parse_paren_expr(),
            TokenKind::Id => self.parse_identifier_expr(),
            TokenKind::Extern => {
                let tok = self.advance().clone();
                Ok(Expr::ExternRaw(tok.lexeme))
            }
            other => {
                let tok = self.peek();
                Err(format!(
                    "unexpected {other} ('{}') at {}:{}",
                    tok.lexeme, tok.line, tok.col
                ))
            }
        }
    }

    fn parse_int_expr(&mut self) -> Result<Expr, String> {
        let tok = self.eat(TokenKind::Int)?;
        tok.lexeme
            .parse::<i64>()
            .map(Expr::Int)
            .map_err(|e| format!("invalid integer literal '{}': {e}", tok.lexeme))
    }

    fn parse_float_expr(&mut self) -> Result<Expr, String> {
        let tok = self.eat(TokenKind::Float)?;
        tok.lexeme
            .parse::<f64>()
            .map(Expr::Float)
            .map_err(|e| format!("invalid float literal '{}': {e}", tok.lexeme))
    }

    fn parse_string_expr(&mut self) -> Result<Expr, String> {
        let tok = self.eat(TokenKind::Str)?;
        Ok(Expr::Str(tok.lexeme))
    }

    fn parse_paren_expr(&mut self) -> Result<Expr, String> {
        self.eat(TokenKind::LParen)?;
        let expr = self.parse_expr()?;
        self.eat(TokenKind::RParen)?;
        Ok(expr)
    }

    fn parse_identifier_expr(&mut self) -> Result<Expr, String> {
        let name = self.eat(TokenKind::Id)?.lexeme;
        if self.check(TokenKind::LParen) {
            let call = self.parse_call_tail(name)?;
            Ok(Expr::Call(call))
        } else {
            Ok(Expr::Variable {
                name,
                is_field: false,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse_source(src: &str) -> (Program, Diagnostics) {
        let mut diags = Diagnostics::new("t.rill", src);
        let tokens = Lexer::new(src).tokenize(&mut diags).unwrap();
        let program = parse(tokens, &mut diags);
        (program, diags)
    }

    #[test]
    fn parses_variable_declaration_with_initializer() {
        let (program, diags) = parse_source("int x = 1 + 2 * 3;");
        assert!(!diags.has_errors());
        match &program.statements[0] {
            Stmt::VarDecl { ty, name, init } => {
                assert_eq!(ty.name, "int");
                assert_eq!(name, "x");
                assert!(init.is_some());
            }
            other => panic!("expected VarDecl, got {other:?}"),
        }
    }

    #[test]
    fn binary_precedence_is_left_associative_within_a_level() {
        let (program, _) = parse_source("int x = 1 - 2 - 3;");
        if let Stmt::VarDecl { init: Some(Expr::Binary { op, lhs, rhs }), .. } = &program.statements[0] {
            assert_eq!(*op, OpKind::Sub);
            assert!(matches!(**rhs, Expr::Int(3)));
            assert!(matches!(**lhs, Expr::Binary { op: OpKind::Sub, .. }));
        } else {
            panic!("unexpected shape");
        }
    }

    #[test]
    fn parses_generic_type_arguments() {
        let (program, diags) = parse_source("Box<int> b;");
        assert!(!diags.has_errors());
        match &program.statements[0] {
            Stmt::VarDecl { ty, .. } => {
                assert_eq!(ty.name, "Box");
                assert_eq!(ty.generic_args.len(), 1);
                assert_eq!(ty.generic_args[0].name, "int");
            }
            other => panic!("expected VarDecl, got {other:?}"),
        }
    }

    #[test]
    fn parses_function_definition() {
        let (program, diags) = parse_source("int add(int a, int b) { return a + b; }");
        assert!(!diags.has_errors());
        match &program.statements[0] {
            Stmt::FunctionDef(f) => {
                assert_eq!(f.name, "add");
                assert_eq!(f.params.len(), 2);
            }
            other => panic!("expected FunctionDef, got {other:?}"),
        }
    }

    #[test]
    fn parses_static_function_definition() {
        let (program, diags) = parse_source("static int helper(int a) { return a; }");
        assert!(!diags.has_errors());
        match &program.statements[0] {
            Stmt::FunctionDef(f) => {
                assert_eq!(f.name, "helper");
                assert!(f.is_static);
            }
            other => panic!("expected FunctionDef, got {other:?}"),
        }
    }

    #[test]
    fn parses_struct_and_constructor_and_extends() {
        let src = "struct Point { int x; int y; } \
                   constructor Point(int x, int y) { this.x = x; } \
                   extends Point { int norm() { return this.x; } }";
        let (program, diags) = parse_source(src);
        assert!(!diags.has_errors());
        assert!(matches!(program.statements[0], Stmt::StructDef(_)));
        assert!(matches!(program.statements[1], Stmt::ConstructorDef(_)));
        assert!(matches!(program.statements[2], Stmt::ExtendsStmt(_)));
    }

    #[test]
    fn method_call_and_field_access_chain() {
        let (program, diags) = parse_source("int y = p.norm().value;");
        assert!(!diags.has_errors());
        match &program.statements[0] {
            Stmt::VarDecl { init: Some(Expr::FieldAccess { receiver, field }), .. } => {
                assert_eq!(field, "value");
                assert!(matches!(**receiver, Expr::MethodCall { .. }));
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn malformed_statement_is_recovered_and_parsing_continues() {
        let src = "int x = ; int y = 2;";
        let (program, diags) = parse_source(src);
        assert!(diags.has_errors());
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0] {
            Stmt::VarDecl { name, .. } => assert_eq!(name, "y"),
            other => panic!("expected recovered VarDecl, got {other:?}"),
        }
    }

    #[test]
    fn if_else_and_while_and_for() {
        let src = "void f() { if (1) { x = 1; } else { x = 2; } while (1) { x = x + 1; } for (int i = 0; i < 1; i = i + 1) { } }";
        let (program, diags) = parse_source(src);
        assert!(!diags.has_errors());
        assert!(matches!(program.statements[0], Stmt::FunctionDef(_)));
    }
}
