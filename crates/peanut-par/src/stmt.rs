//! Statement sequences and the keyword-introduced expression forms:
//! `if`/`elif`/`else`, `for`, `while` and `function`.

use peanut_lex::{Keyword, TokenKind};
use peanut_util::Diagnostic;

use crate::ast::*;
use crate::Parser;

impl<'a> Parser<'a> {
    /// A NEWLINE-separated statement sequence, as an array node.
    ///
    /// Used for the program root and for every block body. After the first
    /// statement, each further statement needs at least one NEWLINE before
    /// it; a token run that does not start a statement ends the sequence
    /// (the caller decides whether what follows is legal).
    pub(crate) fn statements(&mut self) -> Result<Node, Diagnostic> {
        let pos_start = self.current().pos_start.clone();
        let mut elements = Vec::new();

        while matches!(self.current().kind, TokenKind::Newline) {
            self.advance();
        }

        elements.push(self.statement()?);

        loop {
            let mut newline_count = 0;
            while matches!(self.current().kind, TokenKind::Newline) {
                self.advance();
                newline_count += 1;
            }
            if newline_count == 0 {
                break;
            }

            let mark = self.mark();
            match self.statement() {
                Ok(statement) => elements.push(statement),
                Err(_) => {
                    self.rewind(mark);
                    break;
                }
            }
        }

        Ok(Node::Array(ArrayNode {
            elements,
            pos_start,
            pos_end: self.current().pos_end.clone(),
        }))
    }

    /// `return [expr]` | `continue` | `break` | expression
    pub(crate) fn statement(&mut self) -> Result<Node, Diagnostic> {
        let pos_start = self.current().pos_start.clone();

        if self.current().is_keyword(Keyword::Return) {
            self.advance();

            // The return expression is optional; backtrack if none follows.
            let mark = self.mark();
            let value = match self.expression() {
                Ok(expr) => Some(Box::new(expr)),
                Err(_) => {
                    self.rewind(mark);
                    None
                }
            };
            return Ok(Node::Return(ReturnNode {
                value,
                pos_start,
                pos_end: self.current().pos_start.clone(),
            }));
        }

        if self.current().is_keyword(Keyword::Continue) {
            self.advance();
            return Ok(Node::Continue(MarkerNode {
                pos_start,
                pos_end: self.current().pos_start.clone(),
            }));
        }

        if self.current().is_keyword(Keyword::Break) {
            self.advance();
            return Ok(Node::Break(MarkerNode {
                pos_start,
                pos_end: self.current().pos_start.clone(),
            }));
        }

        self.with_expected(
            "Expected 'return', 'continue', 'break', 'var', 'if', 'for', 'while', 'function', int, float, identifier, '+', '-', '(', '[' or 'not' ",
            Self::expression,
        )
    }

    /// `if COND then|=> … (elif …)* [else …] [end]`
    pub(crate) fn if_expr(&mut self) -> Result<Node, Diagnostic> {
        let (cases, else_case) = self.if_cases(Keyword::If)?;

        // Span: from the first condition to the else body (or, with no
        // else, the last arm's body).
        let pos_start = cases[0].condition.pos_start().clone();
        let pos_end = else_case
            .as_ref()
            .map(|e| e.body.pos_end().clone())
            .unwrap_or_else(|| cases[cases.len() - 1].body.pos_end().clone());

        Ok(Node::If(IfNode {
            cases,
            else_case: else_case.map(Box::new),
            pos_start,
            pos_end,
        }))
    }

    /// One `if`/`elif` arm plus everything chained behind it.
    fn if_cases(
        &mut self,
        case_keyword: Keyword,
    ) -> Result<(Vec<IfCase>, Option<ElseCase>), Diagnostic> {
        if !self.current().is_keyword(case_keyword) {
            return Err(self.syntax_error(format!("Expected '{}'", case_keyword.as_str())));
        }
        self.advance();

        let condition = self.expression()?;

        if !self.body_marker() {
            return Err(self.syntax_error("Expected 'then' or '=>'"));
        }
        self.advance();

        let mut cases = Vec::new();
        let mut else_case = None;

        if matches!(self.current().kind, TokenKind::Newline) {
            self.advance();

            let body = self.statements()?;
            cases.push(IfCase {
                condition,
                body,
                is_block: true,
            });

            if self.current().is_keyword(Keyword::End) {
                self.advance();
            } else {
                let (more_cases, chained_else) = self.elif_or_else()?;
                cases.extend(more_cases);
                else_case = chained_else;
            }
        } else {
            let body = self.statement()?;
            cases.push(IfCase {
                condition,
                body,
                is_block: false,
            });

            let (more_cases, chained_else) = self.elif_or_else()?;
            cases.extend(more_cases);
            else_case = chained_else;
        }

        Ok((cases, else_case))
    }

    /// The `elif` chain or `else` arm following an `if` arm, if any.
    fn elif_or_else(&mut self) -> Result<(Vec<IfCase>, Option<ElseCase>), Diagnostic> {
        if self.current().is_keyword(Keyword::Elif) {
            return self.if_cases(Keyword::Elif);
        }

        let mut else_case = None;
        if self.current().is_keyword(Keyword::Else) {
            self.advance();

            if matches!(self.current().kind, TokenKind::Newline) {
                self.advance();
                let body = self.statements()?;
                if !self.current().is_keyword(Keyword::End) {
                    return Err(self.syntax_error("Expected 'end'"));
                }
                self.advance();
                else_case = Some(ElseCase {
                    body,
                    is_block: true,
                });
            } else {
                let body = self.statement()?;
                else_case = Some(ElseCase {
                    body,
                    is_block: false,
                });
            }
        }

        Ok((Vec::new(), else_case))
    }

    /// `for NAME = START until END [step STEP] then|=> BODY [end]`
    pub(crate) fn for_expr(&mut self) -> Result<Node, Diagnostic> {
        self.advance(); // 'for'

        let name_tok = self.current().clone();
        let Some(var_name) = name_tok.identifier() else {
            return Err(self.syntax_error("Expected identifier"));
        };
        self.advance();

        if !matches!(self.current().kind, TokenKind::Eq) {
            return Err(self.syntax_error("Expected '='"));
        }
        self.advance();

        let start = self.expression()?;

        if !self.current().is_keyword(Keyword::Until) {
            return Err(self.syntax_error("Expected 'until'"));
        }
        self.advance();

        let end = self.expression()?;

        let step = if self.current().is_keyword(Keyword::Step) {
            self.advance();
            Some(Box::new(self.expression()?))
        } else {
            None
        };

        if !self.body_marker() {
            return Err(self.syntax_error("Expected 'then' or '=>'"));
        }
        self.advance();

        let (body, is_block) = self.loop_body()?;

        Ok(Node::For(ForNode {
            var_name,
            start: Box::new(start),
            end: Box::new(end),
            step,
            pos_start: name_tok.pos_start,
            pos_end: body.pos_end().clone(),
            body: Box::new(body),
            is_block,
        }))
    }

    /// `while COND then|=> BODY [end]`
    pub(crate) fn while_expr(&mut self) -> Result<Node, Diagnostic> {
        self.advance(); // 'while'

        let condition = self.expression()?;

        if !self.body_marker() {
            return Err(self.syntax_error("Expected 'then' or '=>'"));
        }
        self.advance();

        let (body, is_block) = self.loop_body()?;

        Ok(Node::While(WhileNode {
            pos_start: condition.pos_start().clone(),
            pos_end: body.pos_end().clone(),
            condition: Box::new(condition),
            body: Box::new(body),
            is_block,
        }))
    }

    /// `function [NAME] ( params ) => expr` or the block form ending in `end`.
    pub(crate) fn func_def(&mut self) -> Result<Node, Diagnostic> {
        self.advance(); // 'function'

        let name_tok = self.current().clone();
        let name = match name_tok.identifier() {
            Some(name) => {
                self.advance();
                if !matches!(self.current().kind, TokenKind::LParen) {
                    return Err(self.syntax_error("Expected '('"));
                }
                Some(name)
            }
            None => {
                if !matches!(self.current().kind, TokenKind::LParen) {
                    return Err(self.syntax_error("Expected identifier or '('"));
                }
                None
            }
        };
        self.advance(); // '('

        let mut params: Vec<Param> = Vec::new();
        let mut first_param_pos = None;
        match self.current().identifier() {
            Some(first) => {
                first_param_pos = Some(self.current().pos_start.clone());
                self.advance();
                params.push(Param {
                    name: first,
                    default: self.param_default()?,
                });

                while matches!(self.current().kind, TokenKind::Comma) {
                    self.advance();
                    let Some(param_name) = self.current().identifier() else {
                        return Err(self.syntax_error("Expected identifier"));
                    };
                    self.advance();
                    let default = self.param_default()?;

                    // Defaults apply to trailing parameters only.
                    if default.is_none() && params.iter().any(|p| p.default.is_some()) {
                        return Err(self.syntax_error("Expected '='"));
                    }
                    params.push(Param {
                        name: param_name,
                        default,
                    });
                }

                if !matches!(self.current().kind, TokenKind::RParen) {
                    return Err(self.syntax_error("Expected ',' '=' or ')'"));
                }
            }
            None => {
                if !matches!(self.current().kind, TokenKind::RParen) {
                    return Err(self.syntax_error("Expected identifier or ')'"));
                }
            }
        }
        self.advance(); // ')'

        // Span starts at the name, else at the first parameter, else just
        // before the body.
        let pos_start = if name.is_some() {
            name_tok.pos_start
        } else if let Some(pos) = first_param_pos {
            pos
        } else {
            self.current().pos_start.clone()
        };

        if matches!(self.current().kind, TokenKind::Arrow) {
            self.advance();
            let body = self.expression()?;
            return Ok(Node::FuncDef(FuncDefNode {
                name,
                params,
                pos_start,
                pos_end: body.pos_end().clone(),
                body: Box::new(body),
                auto_return: true,
            }));
        }

        if !matches!(self.current().kind, TokenKind::Newline) {
            return Err(self.syntax_error("Expected '=>' or NEWLINE"));
        }
        self.advance();

        let body = self.statements()?;

        if !self.current().is_keyword(Keyword::End) {
            return Err(self.syntax_error("Expected 'end'"));
        }
        self.advance();

        Ok(Node::FuncDef(FuncDefNode {
            name,
            params,
            pos_start,
            pos_end: body.pos_end().clone(),
            body: Box::new(body),
            auto_return: false,
        }))
    }

    /// An optional `= LITERAL` default for the parameter just consumed.
    fn param_default(&mut self) -> Result<Option<peanut_lex::Token>, Diagnostic> {
        if !matches!(self.current().kind, TokenKind::Eq) {
            return Ok(None);
        }
        self.advance();

        let token = self.current().clone();
        if !matches!(
            token.kind,
            TokenKind::Int(_) | TokenKind::Float(_) | TokenKind::Str(_)
        ) {
            return Err(self.syntax_error("Expected int, float, or string"));
        }
        self.advance();
        Ok(Some(token))
    }

    /// True when the current token opens a loop/branch body.
    fn body_marker(&self) -> bool {
        self.current().is_keyword(Keyword::Then) || matches!(self.current().kind, TokenKind::Arrow)
    }

    /// A loop body: block form after a NEWLINE (closed by `end`), inline
    /// form otherwise.
    fn loop_body(&mut self) -> Result<(Node, bool), Diagnostic> {
        if matches!(self.current().kind, TokenKind::Newline) {
            self.advance();

            let body = self.statements()?;
            if !self.current().is_keyword(Keyword::End) {
                return Err(self.syntax_error("Expected 'end'"));
            }
            self.advance();
            return Ok((body, true));
        }

        let body = self.statement()?;
        Ok((body, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{parse_one, parse_source, parse_statements};

    #[test]
    fn test_return_with_and_without_value() {
        let with = parse_one("return 1 + 2");
        assert!(matches!(with, Node::Return(ReturnNode { value: Some(_), .. })));

        let without = parse_one("return");
        assert!(matches!(without, Node::Return(ReturnNode { value: None, .. })));
    }

    #[test]
    fn test_continue_and_break() {
        assert!(matches!(parse_one("continue"), Node::Continue(_)));
        assert!(matches!(parse_one("break"), Node::Break(_)));
    }

    #[test]
    fn test_inline_if() {
        let node = parse_one("if 1 then 2");
        match node {
            Node::If(if_node) => {
                assert_eq!(if_node.cases.len(), 1);
                assert!(!if_node.cases[0].is_block);
                assert!(if_node.else_case.is_none());
            }
            other => panic!("expected if, got {other:?}"),
        }
    }

    #[test]
    fn test_if_elif_else_inline() {
        let node = parse_one("if a == 1 => 10 elif a == 2 => 20 else 30");
        match node {
            Node::If(if_node) => {
                assert_eq!(if_node.cases.len(), 2);
                let else_case = if_node.else_case.expect("should have else");
                assert!(!else_case.is_block);
            }
            other => panic!("expected if, got {other:?}"),
        }
    }

    #[test]
    fn test_block_if() {
        let node = parse_one("if 1 then\n  2\nend");
        match node {
            Node::If(if_node) => assert!(if_node.cases[0].is_block),
            other => panic!("expected if, got {other:?}"),
        }

        // With no elif/else behind it, the chain may simply end; the block
        // closes at the end of input without an explicit `end`.
        assert!(parse_source("if 1 then\n  2\n").is_ok());

        // An `else` block, by contrast, must be closed.
        let err = parse_source("if 1 then\n  2\nelse\n  3\n").unwrap_err();
        assert_eq!(err.details, "Expected 'end'");
    }

    #[test]
    fn test_block_if_with_elif_and_else() {
        let node = parse_one("if a then\n 1\nelif b then\n 2\nelse\n 3\nend");
        match node {
            Node::If(if_node) => {
                assert_eq!(if_node.cases.len(), 2);
                assert!(if_node.cases.iter().all(|c| c.is_block));
                assert!(if_node.else_case.expect("else").is_block);
            }
            other => panic!("expected if, got {other:?}"),
        }
    }

    #[test]
    fn test_inline_for() {
        let node = parse_one("for i = 0 until 3 => print(i)");
        match node {
            Node::For(for_node) => {
                assert_eq!(for_node.var_name.as_str(), "i");
                assert!(for_node.step.is_none());
                assert!(!for_node.is_block);
            }
            other => panic!("expected for, got {other:?}"),
        }
    }

    #[test]
    fn test_for_with_step_block() {
        let node = parse_one("for i = 10 until 0 step -2 then\n  print(i)\nend");
        match node {
            Node::For(for_node) => {
                assert!(for_node.step.is_some());
                assert!(for_node.is_block);
            }
            other => panic!("expected for, got {other:?}"),
        }
    }

    #[test]
    fn test_for_requires_until() {
        let err = parse_source("for i = 0 to 3 => i").unwrap_err();
        assert_eq!(err.details, "Expected 'until'");
    }

    #[test]
    fn test_while_inline_and_block() {
        assert!(matches!(
            parse_one("while x < 3 => var x = x + 1"),
            Node::While(WhileNode { is_block: false, .. })
        ));
        assert!(matches!(
            parse_one("while 1 then\n  break\nend"),
            Node::While(WhileNode { is_block: true, .. })
        ));
    }

    #[test]
    fn test_arrow_function_auto_returns() {
        let node = parse_one("function add(a, b) => a + b");
        match node {
            Node::FuncDef(def) => {
                assert_eq!(def.name.unwrap().as_str(), "add");
                assert_eq!(def.params.len(), 2);
                assert!(def.auto_return);
            }
            other => panic!("expected function, got {other:?}"),
        }
    }

    #[test]
    fn test_block_function() {
        let node = parse_one("function f()\n  return 1\nend");
        match node {
            Node::FuncDef(def) => {
                assert!(!def.auto_return);
                assert!(def.params.is_empty());
            }
            other => panic!("expected function, got {other:?}"),
        }
    }

    #[test]
    fn test_anonymous_function() {
        let node = parse_one("function (x) => x");
        match node {
            Node::FuncDef(def) => assert!(def.name.is_none()),
            other => panic!("expected function, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_are_trailing_literals() {
        let node = parse_one("function f(a, b = 3, c = \"hi\") => a");
        match node {
            Node::FuncDef(def) => {
                assert!(def.params[0].default.is_none());
                assert!(def.params[1].default.is_some());
                assert!(def.params[2].default.is_some());
            }
            other => panic!("expected function, got {other:?}"),
        }
    }

    #[test]
    fn test_default_then_plain_param_is_error() {
        let err = parse_source("function f(a = 1, b) => a").unwrap_err();
        assert_eq!(err.details, "Expected '='");
    }

    #[test]
    fn test_default_must_be_literal() {
        let err = parse_source("function f(a = b) => a").unwrap_err();
        assert_eq!(err.details, "Expected int, float, or string");
    }

    #[test]
    fn test_function_requires_paren() {
        let err = parse_source("function f => 1").unwrap_err();
        assert_eq!(err.details, "Expected '('");
    }

    #[test]
    fn test_statement_sequences_in_blocks() {
        let statements = parse_statements("var a = 1\nfunction f()\n  var b = 2\n  return b\nend\nf()");
        assert_eq!(statements.len(), 3);
    }
}
