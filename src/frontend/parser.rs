//! Parser for Pascalette
//!
//! LL(1) recursive descent parser. Precedence is encoded in the grammar:
//! `expr` handles `+ -`, `term` handles `* DIV /`, `factor` handles unary
//! signs, literals, parentheses and variables.

use crate::frontend::ast::*;
use crate::frontend::lexer::Lexer;
use crate::frontend::token::{Token, TokenKind};
use crate::utils::{Error, Result, Span};

/// Deepest nesting of parentheses, unary signs, compound statements and
/// procedures the parser accepts
pub const MAX_NESTING: usize = 200;

/// The parser
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    /// Create a new parser from a lexer
    pub fn new(mut lexer: Lexer) -> Result<Self> {
        Ok(Self {
            tokens: lexer.tokenize()?,
            pos: 0,
            depth: 0,
        })
    }

    /// Create a parser from pre-tokenized input
    pub fn from_tokens(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map_or(true, |t| t.kind != TokenKind::Eof) {
            let span = tokens.last().map(|t| t.span).unwrap_or_default();
            tokens.push(Token::eof(Span::new(span.end, span.end, span.line, span.column)));
        }
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    // ==================== Helper Methods ====================

    fn current(&self) -> &Token {
        // from_tokens guarantees a trailing EOF, and advance never moves past it
        &self.tokens[self.pos]
    }

    fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Span of the most recently consumed token
    fn prev_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].span
    }

    fn unexpected(&self, expected: impl Into<String>) -> Error {
        let token = self.current();
        Error::UnexpectedToken {
            expected: expected.into(),
            found: token.kind.to_string(),
            lexeme: token.lexeme.clone(),
            span: token.span,
        }
    }

    /// Consume the current token if it has the expected kind, fail otherwise
    fn digest(&mut self, expected: TokenKind) -> Result<Token> {
        if self.check(expected) {
            let token = self.advance();
            log::trace!("digest {} '{}' at {}", token.kind, token.lexeme, token.span);
            Ok(token)
        } else {
            Err(self.unexpected(expected.to_string()))
        }
    }

    /// Run a recursive rule one nesting level deeper
    fn nested<T>(&mut self, rule: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_NESTING {
            return Err(self.unexpected(format!("at most {} nesting levels", MAX_NESTING)));
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    // ==================== Parsing Methods ====================

    /// program := PROGRAM ID SEMI block DOT
    pub fn parse_program(&mut self) -> Result<Program> {
        let start = self.digest(TokenKind::Program)?.span;
        let name = self.parse_ident()?;
        self.digest(TokenKind::Semi)?;
        let block = self.parse_block()?;
        self.digest(TokenKind::Dot)?;
        let span = start.merge(&self.prev_span());
        self.digest(TokenKind::Eof)?;

        log::debug!("parsed program {}", name.name);
        Ok(Program { name, block, span })
    }

    fn parse_ident(&mut self) -> Result<Ident> {
        let token = self.digest(TokenKind::Id)?;
        Ok(Ident {
            name: token.lexeme,
            span: token.span,
        })
    }

    /// block := declarations compound_statement
    fn parse_block(&mut self) -> Result<Block> {
        let start = self.current().span;
        let declarations = self.parse_declarations()?;
        let compound = self.parse_compound()?;
        Ok(Block {
            declarations,
            compound,
            span: start.merge(&self.prev_span()),
        })
    }

    /// declarations := ( VAR (varDeclGroup SEMI)+ )? ( procDecl )*
    fn parse_declarations(&mut self) -> Result<Vec<Decl>> {
        let mut declarations = Vec::new();

        if self.check(TokenKind::Var) {
            self.digest(TokenKind::Var)?;
            loop {
                let group = self.parse_decl_group()?;
                declarations.extend(group.into_iter().map(|(name, ty)| {
                    Decl::Var(VarDecl {
                        span: name.span,
                        name,
                        ty,
                    })
                }));
                self.digest(TokenKind::Semi)?;
                if !self.check(TokenKind::Id) {
                    break;
                }
            }
        }

        while self.check(TokenKind::Procedure) {
            declarations.push(Decl::Procedure(self.nested(Self::parse_procedure)?));
        }

        Ok(declarations)
    }

    /// varDeclGroup := ID (COMMA ID)* COLON type_spec
    ///
    /// Returns one entry per name, all sharing the group's type.
    fn parse_decl_group(&mut self) -> Result<Vec<(Ident, TypeSpec)>> {
        let mut names = vec![self.parse_ident()?];
        while self.check(TokenKind::Comma) {
            self.digest(TokenKind::Comma)?;
            names.push(self.parse_ident()?);
        }
        self.digest(TokenKind::Colon)?;
        let ty = self.parse_type_spec()?;

        Ok(names.into_iter().map(|name| (name, ty.clone())).collect())
    }

    /// type_spec := INTEGER | REAL | ID
    ///
    /// Any other type name is rejected by the semantic analyzer.
    fn parse_type_spec(&mut self) -> Result<TypeSpec> {
        let kind = self.current_kind();
        match kind {
            TokenKind::Integer | TokenKind::Real | TokenKind::Id => {
                let token = self.digest(kind)?;
                Ok(TypeSpec {
                    name: token.lexeme,
                    span: token.span,
                })
            }
            _ => Err(self.unexpected("type")),
        }
    }

    /// procDecl := PROCEDURE ID ( LPAR formalParams RPAR )? SEMI block SEMI
    fn parse_procedure(&mut self) -> Result<ProcDecl> {
        let start = self.digest(TokenKind::Procedure)?.span;
        let name = self.parse_ident()?;

        let mut params = Vec::new();
        if self.check(TokenKind::LParen) {
            self.digest(TokenKind::LParen)?;
            params = self.parse_formal_params()?;
            self.digest(TokenKind::RParen)?;
        }

        self.digest(TokenKind::Semi)?;
        let body = self.parse_block()?;
        self.digest(TokenKind::Semi)?;

        Ok(ProcDecl {
            name,
            params,
            body,
            span: start.merge(&self.prev_span()),
        })
    }

    /// formalParams := varDeclGroup (SEMI varDeclGroup)*, possibly empty
    fn parse_formal_params(&mut self) -> Result<Vec<Param>> {
        let mut params = Vec::new();
        if !self.check(TokenKind::Id) {
            return Ok(params);
        }

        loop {
            for (name, ty) in self.parse_decl_group()? {
                params.push(Param {
                    span: name.span.merge(&ty.span),
                    name,
                    ty,
                });
            }
            if !self.check(TokenKind::Semi) {
                break;
            }
            self.digest(TokenKind::Semi)?;
        }

        Ok(params)
    }

    /// compound_statement := BEGIN statement_list END
    fn parse_compound(&mut self) -> Result<Compound> {
        let start = self.digest(TokenKind::Begin)?.span;
        let statements = self.parse_statement_list()?;
        self.digest(TokenKind::End)?;
        Ok(Compound {
            statements,
            span: start.merge(&self.prev_span()),
        })
    }

    /// statement_list := statement (SEMI statement)*
    fn parse_statement_list(&mut self) -> Result<Vec<Stmt>> {
        let mut statements = Vec::new();
        statements.extend(self.parse_statement()?);
        while self.check(TokenKind::Semi) {
            self.digest(TokenKind::Semi)?;
            statements.extend(self.parse_statement()?);
        }
        Ok(statements)
    }

    /// statement := compound_statement | assignment_statement | empty
    fn parse_statement(&mut self) -> Result<Option<Stmt>> {
        match self.current_kind() {
            TokenKind::Begin => Ok(Some(Stmt::Compound(self.nested(Self::parse_compound)?))),
            TokenKind::Id => Ok(Some(Stmt::Assign(self.parse_assignment()?))),
            _ => Ok(None),
        }
    }

    /// assignment_statement := variable ASSIGN expr
    fn parse_assignment(&mut self) -> Result<Assignment> {
        let target = self.parse_variable()?;
        self.digest(TokenKind::Assign)?;
        let value = self.parse_expr()?;
        let span = target.span.merge(&value.span());
        Ok(Assignment { target, value, span })
    }

    /// variable := ID
    fn parse_variable(&mut self) -> Result<Variable> {
        let token = self.digest(TokenKind::Id)?;
        Ok(Variable {
            name: token.lexeme,
            span: token.span,
        })
    }

    /// expr := term ((PLUS | MINUS) term)*
    pub fn parse_expr(&mut self) -> Result<Expr> {
        let mut left = self.parse_term()?;

        loop {
            let kind = self.current_kind();
            let op = match kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.digest(kind)?;
            let right = self.parse_term()?;
            left = binary(left, op, right);
        }

        Ok(left)
    }

    /// term := factor ((MUL | DIV | FLOAT_DIV) factor)*
    fn parse_term(&mut self) -> Result<Expr> {
        let mut left = self.parse_factor()?;

        loop {
            let kind = self.current_kind();
            let op = match kind {
                TokenKind::Mul => BinOp::Mul,
                TokenKind::Div => BinOp::IntDiv,
                TokenKind::FloatDiv => BinOp::RealDiv,
                _ => break,
            };
            self.digest(kind)?;
            let right = self.parse_factor()?;
            left = binary(left, op, right);
        }

        Ok(left)
    }

    /// factor := (PLUS | MINUS) factor | INTEGER_CONST | REAL_CONST | LPAR expr RPAR | variable
    fn parse_factor(&mut self) -> Result<Expr> {
        match self.current_kind() {
            TokenKind::Plus | TokenKind::Minus => self.nested(Self::parse_unary),
            kind @ (TokenKind::IntegerConst | TokenKind::RealConst) => {
                let token = self.digest(kind)?;
                let kind = if kind == TokenKind::IntegerConst {
                    LiteralKind::Integer
                } else {
                    LiteralKind::Real
                };
                Ok(Expr::Literal(Literal {
                    kind,
                    text: token.lexeme,
                    span: token.span,
                }))
            }
            TokenKind::LParen => self.nested(|parser| {
                parser.digest(TokenKind::LParen)?;
                let expr = parser.parse_expr()?;
                parser.digest(TokenKind::RParen)?;
                Ok(expr)
            }),
            TokenKind::Id => Ok(Expr::Variable(self.parse_variable()?)),
            _ => Err(self.unexpected("expression")),
        }
    }

    /// (PLUS | MINUS) factor
    fn parse_unary(&mut self) -> Result<Expr> {
        let kind = self.current_kind();
        let op = if kind == TokenKind::Plus { UnOp::Plus } else { UnOp::Neg };
        let start = self.digest(kind)?.span;
        let operand = self.parse_factor()?;
        Ok(Expr::Unary {
            op,
            span: start.merge(&operand.span()),
            operand: Box::new(operand),
        })
    }
}

fn binary(left: Expr, op: BinOp, right: Expr) -> Expr {
    let span = left.span().merge(&right.span());
    Expr::Binary {
        left: Box::new(left),
        op,
        right: Box::new(right),
        span,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Result<Program> {
        let lexer = Lexer::new(source);
        let mut parser = Parser::new(lexer)?;
        parser.parse_program()
    }

    fn parse_expr(source: &str) -> Expr {
        let mut parser = Parser::new(Lexer::new(source)).unwrap();
        parser.parse_expr().unwrap()
    }

    /// Renders an expression fully parenthesized, for shape assertions
    fn shape(expr: &Expr) -> String {
        match expr {
            Expr::Literal(lit) => lit.text.clone(),
            Expr::Variable(var) => var.name.clone(),
            Expr::Binary { left, op, right, .. } => {
                format!("({} {} {})", shape(left), op, shape(right))
            }
            Expr::Unary { op, operand, .. } => format!("{}{}", op, shape(operand)),
        }
    }

    #[test]
    fn test_empty_program() {
        let program = parse("PROGRAM Empty; BEGIN END.").unwrap();
        assert_eq!(program.name.name, "Empty");
        assert!(program.block.declarations.is_empty());
        assert!(program.block.compound.statements.is_empty());
    }

    #[test]
    fn test_precedence() {
        assert_eq!(shape(&parse_expr("a + 3 * 2")), "(a + (3 * 2))");
        assert_eq!(shape(&parse_expr("(a + 3) * 2")), "((a + 3) * 2)");
        assert_eq!(shape(&parse_expr("10 - 4 - 3")), "((10 - 4) - 3)");
        assert_eq!(shape(&parse_expr("7 DIV 2 / 4.0")), "((7 DIV 2) / 4.0)");
    }

    #[test]
    fn test_unary_is_right_recursive() {
        assert_eq!(shape(&parse_expr("--x")), "--x");
        match parse_expr("- - x") {
            Expr::Unary { op: UnOp::Neg, operand, .. } => {
                assert!(matches!(*operand, Expr::Unary { op: UnOp::Neg, .. }));
            }
            other => panic!("expected unary, got {:?}", other),
        }
        assert_eq!(shape(&parse_expr("-2 * +3")), "(-2 * +3)");
    }

    #[test]
    fn test_var_groups_expand() {
        let program = parse("PROGRAM P; VAR a, b : INTEGER; c : real; BEGIN END.").unwrap();
        let decls: Vec<_> = program
            .block
            .declarations
            .iter()
            .map(|d| match d {
                Decl::Var(v) => (v.name.name.clone(), v.ty.name.clone()),
                Decl::Procedure(_) => panic!("unexpected procedure"),
            })
            .collect();
        assert_eq!(
            decls,
            vec![
                ("a".to_string(), "INTEGER".to_string()),
                ("b".to_string(), "INTEGER".to_string()),
                ("c".to_string(), "real".to_string()),
            ]
        );
    }

    #[test]
    fn test_procedure_with_params() {
        let source = "PROGRAM P; VAR x : REAL;
            PROCEDURE Alpha(a : INTEGER; b, c : REAL);
               VAR y : INTEGER;
            BEGIN y := a END;
            PROCEDURE Beta;
            BEGIN END;
            BEGIN x := 1.5 END.";
        let program = parse(source).unwrap();
        assert_eq!(program.block.declarations.len(), 3);

        let Decl::Procedure(alpha) = &program.block.declarations[1] else {
            panic!("expected procedure");
        };
        assert_eq!(alpha.name.name, "Alpha");
        let params: Vec<_> = alpha.params.iter().map(|p| (p.name.name.as_str(), p.ty.name.as_str())).collect();
        assert_eq!(params, vec![("a", "INTEGER"), ("b", "REAL"), ("c", "REAL")]);
        assert_eq!(alpha.body.declarations.len(), 1);
        assert_eq!(alpha.body.compound.statements.len(), 1);

        let Decl::Procedure(beta) = &program.block.declarations[2] else {
            panic!("expected procedure");
        };
        assert!(beta.params.is_empty());
    }

    #[test]
    fn test_empty_statements_are_dropped() {
        let program = parse("PROGRAM P; BEGIN ; a := 1; ; BEGIN END; END.").unwrap();
        let stmts = &program.block.compound.statements;
        assert_eq!(stmts.len(), 2);
        assert!(matches!(stmts[0], Stmt::Assign(_)));
        assert!(matches!(&stmts[1], Stmt::Compound(c) if c.statements.is_empty()));
    }

    #[test]
    fn test_missing_dot() {
        let err = parse("PROGRAM Test; VAR a : INTEGER; BEGIN a := 1 END").unwrap_err();
        match err {
            Error::UnexpectedToken { expected, found, .. } => {
                assert_eq!(expected, "DOT");
                assert_eq!(found, "EOF");
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_semicolon_between_statements() {
        let err = parse("PROGRAM P; BEGIN a := 1 b := 2 END.").unwrap_err();
        match err {
            Error::UnexpectedToken { expected, lexeme, span, .. } => {
                assert_eq!(expected, "END");
                assert_eq!(lexeme, "b");
                assert_eq!(span.column, 25);
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        let err = parse("PROGRAM P; BEGIN END. x").unwrap_err();
        assert!(matches!(err, Error::UnexpectedToken { ref expected, .. } if expected == "EOF"));
    }

    #[test]
    fn test_bad_factor() {
        let err = parse("PROGRAM P; BEGIN a := * 2 END.").unwrap_err();
        assert!(matches!(err, Error::UnexpectedToken { ref expected, .. } if expected == "expression"));
    }

    #[test]
    fn test_bad_type() {
        let err = parse("PROGRAM P; VAR a : 1; BEGIN END.").unwrap_err();
        assert!(matches!(err, Error::UnexpectedToken { ref expected, .. } if expected == "type"));
    }

    #[test]
    fn test_named_type_is_parsed() {
        let program = parse("PROGRAM P; VAR a : Boolean; BEGIN END.").unwrap();
        let Decl::Var(var) = &program.block.declarations[0] else {
            panic!("expected variable");
        };
        assert_eq!(var.ty.name, "Boolean");
        assert_eq!(var.ty.span.column, 20);
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("{}1{}", "(".repeat(depth), ")".repeat(depth));

        assert_eq!(shape(&parse_expr(&nested(MAX_NESTING))), "1");

        let mut parser = Parser::new(Lexer::new(&nested(MAX_NESTING + 1))).unwrap();
        let err = parser.parse_expr().unwrap_err();
        match err {
            Error::UnexpectedToken { found, span, .. } => {
                assert_eq!(found, "LPAR");
                assert_eq!(span.column, MAX_NESTING + 1);
            }
            other => panic!("expected syntax error, got {:?}", other),
        }

        let signs = format!("{}1", "-".repeat(MAX_NESTING + 1));
        let mut parser = Parser::new(Lexer::new(&signs)).unwrap();
        assert!(matches!(parser.parse_expr(), Err(Error::UnexpectedToken { .. })));

        let blocks = format!("PROGRAM P; {}{}.", "BEGIN ".repeat(MAX_NESTING + 2), "END ".repeat(MAX_NESTING + 2));
        assert!(matches!(parse(&blocks), Err(Error::UnexpectedToken { .. })));
    }

    #[test]
    fn test_from_tokens_appends_eof() {
        let mut tokens = Lexer::new("1 + 2").tokenize().unwrap();
        tokens.pop();
        let mut parser = Parser::from_tokens(tokens);
        assert_eq!(shape(&parser.parse_expr().unwrap()), "(1 + 2)");
    }
}
