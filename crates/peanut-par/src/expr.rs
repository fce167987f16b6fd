//! Expression parsing: the precedence ladder and declarations.
//!
//! Levels from loosest to tightest: declaration prefix / `and`-`or` chain,
//! comparisons, additive, multiplicative, unary sign, power, call, atom.
//! All binary levels are left-associative loops; `^` pairs a call on the
//! left with a factor on the right so `-2^2` parses as `-(2^2)`.

use peanut_lex::{Keyword, TokenKind};
use peanut_util::Diagnostic;

use crate::ast::*;
use crate::Parser;

/// Fold two operands into a binary node spanning both.
fn make_binary(left: Node, op: BinOp, right: Node) -> Node {
    Node::BinaryOp(BinaryOpNode {
        pos_start: left.pos_start().clone(),
        pos_end: right.pos_end().clone(),
        left: Box::new(left),
        op,
        right: Box::new(right),
    })
}

/// True when the expression tree carries a literal of the declared type.
///
/// This is the parse-time `strict` check: it looks through binary and unary
/// operators for a literal token of the right kind, and treats everything
/// else (calls, variable reads, array literals) as opaque.
fn contains_literal(node: &Node, declared: DeclaredType) -> bool {
    match node {
        Node::Number(n) => matches!(
            (n.value, declared),
            (NumberLiteral::Int(_), DeclaredType::Int)
                | (NumberLiteral::Float(_), DeclaredType::Float)
        ),
        Node::Str(_) => declared == DeclaredType::String,
        Node::BinaryOp(op) => {
            contains_literal(&op.left, declared) || contains_literal(&op.right, declared)
        }
        Node::UnaryOp(op) => contains_literal(&op.operand, declared),
        _ => false,
    }
}

impl<'a> Parser<'a> {
    /// expression : declaration | comp_expr ((and|or) comp_expr)*
    pub(crate) fn expression(&mut self) -> Result<Node, Diagnostic> {
        match self.current().kind {
            TokenKind::Keyword(Keyword::Var) | TokenKind::Keyword(Keyword::Let) => {
                self.var_assign(false)
            }
            TokenKind::Keyword(Keyword::Scoped) => self.var_assign(true),
            TokenKind::Keyword(Keyword::Strict) => self.strict_assign(),
            _ => self.with_expected(
                "Expected 'var', 'let', 'if', 'for', 'while', 'function', int, float, identifier, '+', '-', '(', '[' or 'not'",
                Self::and_or,
            ),
        }
    }

    /// `var`/`let`/`scoped` declaration. Without `=` the null Number is bound.
    fn var_assign(&mut self, scoped: bool) -> Result<Node, Diagnostic> {
        self.advance(); // declaration keyword

        let name_tok = self.current().clone();
        let Some(name) = name_tok.identifier() else {
            return Err(self.syntax_error("Expected identifier"));
        };
        self.advance();

        let (value, pos_end) = if matches!(self.current().kind, TokenKind::Eq) {
            self.advance();
            let value = self.expression()?;
            let pos_end = value.pos_end().clone();
            (Some(Box::new(value)), pos_end)
        } else {
            (None, name_tok.pos_end.clone())
        };

        let pos_start = name_tok.pos_start;
        Ok(if scoped {
            Node::ScopedAssign(ScopedAssignNode {
                name,
                value,
                pos_start,
                pos_end,
            })
        } else {
            Node::VarAssign(VarAssignNode {
                name,
                value,
                pos_start,
                pos_end,
            })
        })
    }

    /// `strict TYPE NAME = E` with the parse-time type checks.
    fn strict_assign(&mut self) -> Result<Node, Diagnostic> {
        self.advance(); // 'strict'

        // The type name lexes as a plain identifier.
        let declared = self
            .current()
            .identifier()
            .and_then(|sym| DeclaredType::from_str(sym.as_str()))
            .ok_or_else(|| self.syntax_error("Expected Type declaration"))?;
        self.advance();

        let name_tok = self.current().clone();
        let Some(name) = name_tok.identifier() else {
            return Err(self.syntax_error("Expected identifier"));
        };
        if let Some(existing) = self.strict_type_of(name) {
            if existing != declared {
                return Err(
                    self.syntax_error("Cannot assign 'strict' variable to different type!")
                );
            }
        }
        self.advance();

        if !matches!(self.current().kind, TokenKind::Eq) {
            return Err(self.syntax_error("Expected '='"));
        }
        self.advance();

        let value = self.expression()?;
        if !contains_literal(&value, declared) {
            return Err(self.syntax_error(format!("Expected Type '{}'", declared.as_str())));
        }

        Ok(Node::StrictAssign(StrictAssignNode {
            name,
            declared,
            pos_start: name_tok.pos_start,
            pos_end: value.pos_end().clone(),
            value: Box::new(value),
        }))
    }

    /// comp_expr ((and|or) comp_expr)*
    fn and_or(&mut self) -> Result<Node, Diagnostic> {
        let mut left = self.comp_expr()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Keyword(Keyword::And) => BinOp::And,
                TokenKind::Keyword(Keyword::Or) => BinOp::Or,
                _ => break,
            };
            self.advance();
            let right = self.comp_expr()?;
            left = make_binary(left, op, right);
        }
        Ok(left)
    }

    /// not comp_expr | arith_expr ((==|!=|<|>|<=|>=) arith_expr)*
    fn comp_expr(&mut self) -> Result<Node, Diagnostic> {
        if self.current().is_keyword(Keyword::Not) {
            let not_tok = self.current().clone();
            self.advance();
            let operand = self.comp_expr()?;
            return Ok(Node::UnaryOp(UnaryOpNode {
                op: UnOp::Not,
                pos_start: not_tok.pos_start,
                pos_end: operand.pos_end().clone(),
                operand: Box::new(operand),
            }));
        }

        self.with_expected(
            "Expected var, if, function, Int, Float, Identifier, '+', '-', '(', '[', or 'not'",
            Self::comparison,
        )
    }

    fn comparison(&mut self) -> Result<Node, Diagnostic> {
        let mut left = self.arith_expr()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Ee => BinOp::Ee,
                TokenKind::Ne => BinOp::Ne,
                TokenKind::Lt => BinOp::Lt,
                TokenKind::Gt => BinOp::Gt,
                TokenKind::Lte => BinOp::Lte,
                TokenKind::Gte => BinOp::Gte,
                _ => break,
            };
            self.advance();
            let right = self.arith_expr()?;
            left = make_binary(left, op, right);
        }
        Ok(left)
    }

    /// term ((+|-) term)*
    fn arith_expr(&mut self) -> Result<Node, Diagnostic> {
        let mut left = self.term()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.term()?;
            left = make_binary(left, op, right);
        }
        Ok(left)
    }

    /// factor ((*|/|%) factor)*
    fn term(&mut self) -> Result<Node, Diagnostic> {
        let mut left = self.factor()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Mul => BinOp::Mul,
                TokenKind::Div => BinOp::Div,
                TokenKind::Mod => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.factor()?;
            left = make_binary(left, op, right);
        }
        Ok(left)
    }

    /// (+|-) factor | power
    fn factor(&mut self) -> Result<Node, Diagnostic> {
        let op = match self.current().kind {
            TokenKind::Plus => Some(UnOp::Pos),
            TokenKind::Minus => Some(UnOp::Neg),
            _ => None,
        };
        if let Some(op) = op {
            let op_tok = self.current().clone();
            self.advance();
            let operand = self.factor()?;
            return Ok(Node::UnaryOp(UnaryOpNode {
                op,
                pos_start: op_tok.pos_start,
                pos_end: operand.pos_end().clone(),
                operand: Box::new(operand),
            }));
        }
        self.power()
    }

    /// call (^ factor)*
    fn power(&mut self) -> Result<Node, Diagnostic> {
        let mut left = self.call()?;
        while matches!(self.current().kind, TokenKind::Pow) {
            self.advance();
            let right = self.factor()?;
            left = make_binary(left, BinOp::Pow, right);
        }
        Ok(left)
    }

    /// atom ( "(" args ")" )?
    fn call(&mut self) -> Result<Node, Diagnostic> {
        let callee = self.atom()?;

        if !matches!(self.current().kind, TokenKind::LParen) {
            return Ok(callee);
        }
        self.advance();

        let mut args = Vec::new();
        if matches!(self.current().kind, TokenKind::RParen) {
            self.advance();
        } else {
            args.push(self.expression()?);
            while matches!(self.current().kind, TokenKind::Comma) {
                self.advance();
                args.push(self.expression()?);
            }
            if !matches!(self.current().kind, TokenKind::RParen) {
                return Err(self.syntax_error("Expected ',' or ')'"));
            }
            self.advance();
        }

        let pos_start = callee.pos_start().clone();
        let pos_end = args
            .last()
            .map(|arg| arg.pos_end().clone())
            .unwrap_or_else(|| callee.pos_end().clone());
        Ok(Node::Call(CallNode {
            callee: Box::new(callee),
            args,
            pos_start,
            pos_end,
        }))
    }

    /// Literals, identifiers, parenthesized expressions, array literals and
    /// the keyword-introduced expression forms.
    fn atom(&mut self) -> Result<Node, Diagnostic> {
        let token = self.current().clone();
        match &token.kind {
            TokenKind::Int(value) => {
                self.advance();
                Ok(Node::Number(NumberNode {
                    value: NumberLiteral::Int(*value),
                    pos_start: token.pos_start,
                    pos_end: token.pos_end,
                }))
            }
            TokenKind::Float(value) => {
                self.advance();
                Ok(Node::Number(NumberNode {
                    value: NumberLiteral::Float(*value),
                    pos_start: token.pos_start,
                    pos_end: token.pos_end,
                }))
            }
            TokenKind::Str(value) => {
                self.advance();
                Ok(Node::Str(StringNode {
                    value: value.clone(),
                    pos_start: token.pos_start,
                    pos_end: token.pos_end,
                }))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Node::Access(AccessNode {
                    name: *name,
                    pos_start: token.pos_start,
                    pos_end: token.pos_end,
                }))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.expression()?;
                if !matches!(self.current().kind, TokenKind::RParen) {
                    return Err(self.syntax_error("Expected ')'"));
                }
                self.advance();
                Ok(inner)
            }
            TokenKind::LSquare => self.list_expr(),
            TokenKind::Keyword(Keyword::If) => self.if_expr(),
            TokenKind::Keyword(Keyword::For) => self.for_expr(),
            TokenKind::Keyword(Keyword::While) => self.while_expr(),
            TokenKind::Keyword(Keyword::Function) => self.func_def(),
            _ => Err(self.syntax_error(
                "Expected ')', 'var', 'if', 'function', int, float, identifier, '+', '-', '(', '[', or 'not' ",
            )),
        }
    }

    /// `[` (expression ("," expression)*)? `]`
    fn list_expr(&mut self) -> Result<Node, Diagnostic> {
        let pos_start = self.current().pos_start.clone();
        self.advance(); // '['

        let mut elements = Vec::new();
        if matches!(self.current().kind, TokenKind::RSquare) {
            self.advance();
        } else {
            elements.push(self.expression()?);
            while matches!(self.current().kind, TokenKind::Comma) {
                self.advance();
                elements.push(self.expression()?);
            }
            if !matches!(self.current().kind, TokenKind::RSquare) {
                return Err(self.syntax_error("Expected ',' or ']'"));
            }
            self.advance();
        }

        Ok(Node::Array(ArrayNode {
            elements,
            pos_start,
            pos_end: self.current().pos_end.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{parse_one, parse_source};

    fn binary(node: &Node) -> &BinaryOpNode {
        match node {
            Node::BinaryOp(op) => op,
            other => panic!("expected binary op, got {other:?}"),
        }
    }

    #[test]
    fn test_precedence_mul_over_add() {
        // 2 + 3 * 4 parses as 2 + (3 * 4)
        let node = parse_one("2 + 3 * 4");
        let add = binary(&node);
        assert_eq!(add.op, BinOp::Add);
        assert_eq!(binary(&add.right).op, BinOp::Mul);
    }

    #[test]
    fn test_left_associativity() {
        // 10 - 4 - 3 parses as (10 - 4) - 3
        let node = parse_one("10 - 4 - 3");
        let outer = binary(&node);
        assert_eq!(outer.op, BinOp::Sub);
        assert_eq!(binary(&outer.left).op, BinOp::Sub);
    }

    #[test]
    fn test_unary_binds_tighter_than_mul() {
        // -2 * 3 parses as (-2) * 3
        let node = parse_one("-2 * 3");
        let mul = binary(&node);
        assert_eq!(mul.op, BinOp::Mul);
        assert!(matches!(*mul.left, Node::UnaryOp(_)));
    }

    #[test]
    fn test_power_right_operand_is_factor() {
        // 2 ^ -3 accepts a signed right operand
        let node = parse_one("2 ^ -3");
        let pow = binary(&node);
        assert_eq!(pow.op, BinOp::Pow);
        assert!(matches!(*pow.right, Node::UnaryOp(_)));
    }

    #[test]
    fn test_comparison_and_logic() {
        // 1 < 2 and 3 < 4 parses as (1 < 2) and (3 < 4)
        let node = parse_one("1 < 2 and 3 < 4");
        let and = binary(&node);
        assert_eq!(and.op, BinOp::And);
        assert_eq!(binary(&and.left).op, BinOp::Lt);
        assert_eq!(binary(&and.right).op, BinOp::Lt);
    }

    #[test]
    fn test_not_prefix() {
        let node = parse_one("not 1 == 2");
        match node {
            Node::UnaryOp(not) => {
                assert_eq!(not.op, UnOp::Not);
                assert_eq!(binary(&not.operand).op, BinOp::Ee);
            }
            other => panic!("expected unary not, got {other:?}"),
        }
    }

    #[test]
    fn test_var_assign() {
        let node = parse_one("var a = 2 + 3");
        match node {
            Node::VarAssign(assign) => {
                assert_eq!(assign.name.as_str(), "a");
                assert!(assign.value.is_some());
            }
            other => panic!("expected var assign, got {other:?}"),
        }
    }

    #[test]
    fn test_var_without_initializer() {
        let node = parse_one("var a");
        match node {
            Node::VarAssign(assign) => assert!(assign.value.is_none()),
            other => panic!("expected var assign, got {other:?}"),
        }
    }

    #[test]
    fn test_scoped_assign() {
        assert!(matches!(parse_one("scoped s = 1"), Node::ScopedAssign(_)));
    }

    #[test]
    fn test_strict_assign_matching_literal() {
        let node = parse_one("strict int n = 5");
        match node {
            Node::StrictAssign(assign) => {
                assert_eq!(assign.declared, DeclaredType::Int);
                assert_eq!(assign.name.as_str(), "n");
            }
            other => panic!("expected strict assign, got {other:?}"),
        }
    }

    #[test]
    fn test_strict_literal_check_sees_through_operators() {
        assert!(parse_source("strict int n = 1 + 2").is_ok());
        assert!(parse_source("strict float f = -1.5").is_ok());
    }

    #[test]
    fn test_strict_type_mismatch() {
        let err = parse_source("strict int n = \"five\"").unwrap_err();
        assert_eq!(err.details, "Expected Type 'int'");
        let err = parse_source("strict string s = 5").unwrap_err();
        assert_eq!(err.details, "Expected Type 'string'");
    }

    #[test]
    fn test_strict_requires_known_type() {
        let err = parse_source("strict bool b = 1").unwrap_err();
        assert_eq!(err.details, "Expected Type declaration");
    }

    #[test]
    fn test_strict_requires_equals() {
        let err = parse_source("strict int n").unwrap_err();
        assert_eq!(err.details, "Expected '='");
    }

    #[test]
    fn test_call_with_args() {
        let node = parse_one("add(1, 2, 3)");
        match node {
            Node::Call(call) => {
                assert_eq!(call.args.len(), 3);
                assert!(matches!(*call.callee, Node::Access(_)));
            }
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn test_call_missing_close() {
        let err = parse_source("add(1, 2").unwrap_err();
        assert_eq!(err.details, "Expected ',' or ')'");
    }

    #[test]
    fn test_array_literal() {
        let node = parse_one("[1, 2, [3]]");
        match node {
            Node::Array(array) => assert_eq!(array.elements.len(), 3),
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn test_unclosed_paren() {
        let err = parse_source("(1 + 2").unwrap_err();
        assert_eq!(err.details, "Expected ')'");
    }
}
