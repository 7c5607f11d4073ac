/*
    This module parses grammar programs

    The parser is a recursive descent over the tokens of the scanner. It
    never builds nodes itself, every recognized rule is handed to the
    matching function in `actions`.
*/

pub mod actions;
pub mod lexer;

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use log::{debug, error};
use thiserror::Error;

use crate::ast::{
    BinaryOperator, GrammarDefinition, Id, LanguageExpression, LanguageKind, Production,
    ProductionRhsRule, ProductionSet, Sentence, Symbol, SymbolSet, UnaryOperator,
};
use crate::compiler::CompilerState;
use crate::error_handling::*;
use lexer::{Scanner, Token, TokenKind};

#[derive(Debug, Error, PartialEq)]
pub enum SyntaxErrorType {
    #[error("Expected {expected}, found `{found}`")]
    UnexpectedToken { expected: &'static str, found: String },
    #[error("Expected {expected}, found the end of the input")]
    UnexpectedEndOfInput { expected: &'static str },
    // The scanner couldn't make sense of some characters
    #[error("Unknown lexeme `{0}`")]
    UnknownLexeme(String),
    // A right-hand side holds at most two symbols
    #[error("Too many symbols on the right-hand side, found `{0}` after two")]
    TooManyRhsSymbols(String),
    // Symbol sets and production sets can't be joined with each other
    #[error("Cannot join a symbol set with a production set")]
    MixedSetUnion,
    // Parentheses and unary operators nested past `MAX_NESTING_DEPTH`
    #[error("Language expression nested deeper than {0} levels")]
    NestingTooDeep(usize),
}

impl ErrorType for SyntaxErrorType {}

pub type SyntaxError = Error<SyntaxErrorType>;

type Result<T> = std::result::Result<T, SyntaxError>;

// Bounds the recursion of the expression parser, and with it the recursion
// of rendering the tree afterwards
pub const MAX_NESTING_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntacticAnalysisStatus {
    Accept,
    Reject,
}

struct Parser<'s> {
    scanner: Scanner<'s>,
    // Tokens read from the scanner but not consumed yet
    lookahead: VecDeque<Token>,
    file: PathBuf,
    // Open parentheses and unary operators around the current expression
    depth: usize,
}

impl<'s> Parser<'s> {
    fn new(scanner: Scanner<'s>, file: &Path) -> Self {
        Parser {
            scanner,
            lookahead: VecDeque::new(),
            file: file.to_path_buf(),
            depth: 0,
        }
    }

    fn peek(&mut self, n: usize) -> Option<TokenKind> {
        while self.lookahead.len() <= n {
            let token = self.scanner.next()?;
            self.lookahead.push_back(token);
        }
        self.lookahead.get(n).map(|token| token.kind)
    }

    fn next_token(&mut self) -> Option<Token> {
        self.peek(0)?;
        self.lookahead.pop_front()
    }

    // Consumes the next token if it is of the given kind
    fn accept(&mut self, kind: TokenKind) -> bool {
        if self.peek(0) == Some(kind) {
            self.lookahead.pop_front();
            return true;
        }
        false
    }

    fn error(&self, line: usize, error: SyntaxErrorType) -> SyntaxError {
        SyntaxError::new(self.file.clone(), line, error)
    }

    fn unexpected(&self, token: Token, expected: &'static str) -> SyntaxError {
        let error = match token.kind {
            TokenKind::Unknown => SyntaxErrorType::UnknownLexeme(token.lexeme),
            _ => SyntaxErrorType::UnexpectedToken {
                expected,
                found: token.lexeme,
            },
        };
        self.error(token.line, error)
    }

    fn end_of_input(&self, expected: &'static str) -> SyntaxError {
        self.error(self.scanner.line(), SyntaxErrorType::UnexpectedEndOfInput { expected })
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token> {
        match self.next_token() {
            Some(token) if token.kind == kind => Ok(token),
            Some(token) => Err(self.unexpected(token, expected)),
            None => Err(self.end_of_input(expected)),
        }
    }

    fn id(&mut self) -> Result<Id> {
        let token = self.expect(TokenKind::Id, "an identifier")?;
        Ok(Id::from(token.lexeme))
    }

    fn symbol(&mut self) -> Result<Symbol> {
        let token = self.expect(TokenKind::Symbol, "a symbol")?;
        Ok(Symbol::from(token.lexeme))
    }

    fn program(&mut self, state: &mut CompilerState) -> Result<()> {
        let mut sentences = actions::sentence_array_new(self.sentence()?);
        while self.peek(0).is_some() {
            sentences = actions::sentence_array_push(sentences, self.sentence()?);
        }

        // The scanner is exhausted here, so this is the context the input
        // ended in
        actions::program(state, sentences, self.scanner.context());
        Ok(())
    }

    fn sentence(&mut self) -> Result<Sentence> {
        let sentence = match self.peek(0) {
            None => return Err(self.end_of_input("a sentence")),
            Some(TokenKind::Grammar) => {
                self.next_token();
                actions::grammar_definition_sentence(self.grammar_definition()?)
            }
            Some(_) => {
                let id = self.id()?;
                self.expect(TokenKind::Equals, "`=`")?;
                self.binding(id)?
            }
        };

        self.expect(TokenKind::Semicolon, "`;`")?;
        Ok(sentence)
    }

    fn grammar_definition(&mut self) -> Result<GrammarDefinition> {
        let grammar = self.id()?;
        self.expect(TokenKind::Equals, "`=`")?;
        self.expect(TokenKind::OpenParenthesis, "`(`")?;
        let terminals = self.id()?;
        self.expect(TokenKind::Comma, "`,`")?;
        let non_terminals = self.id()?;
        self.expect(TokenKind::Comma, "`,`")?;
        let productions = self.id()?;
        self.expect(TokenKind::Comma, "`,`")?;
        let initial_symbol = self.id()?;
        self.expect(TokenKind::CloseParenthesis, "`)`")?;

        Ok(actions::grammar_definition(
            grammar,
            terminals,
            non_terminals,
            productions,
            initial_symbol,
        ))
    }

    // `{ S -> ...` starts a production set, any other `{` a symbol set
    fn production_set_ahead(&mut self) -> bool {
        self.peek(0) == Some(TokenKind::OpenBrace)
            && self.peek(1) == Some(TokenKind::Symbol)
            && self.peek(2) == Some(TokenKind::Arrow)
    }

    fn binding(&mut self, id: Id) -> Result<Sentence> {
        if self.production_set_ahead() {
            let productions = self.production_sets()?;
            let binding = actions::production_set_binding(id, productions);
            return Ok(actions::production_set_binding_sentence(binding));
        }

        if self.peek(0) == Some(TokenKind::OpenBrace) {
            let symbols = self.symbol_sets()?;
            let binding = actions::symbol_set_binding(id, symbols);
            return Ok(actions::symbol_set_binding_sentence(binding));
        }

        let expression = self.language_expression()?;
        Ok(actions::language_binding_sentence(actions::language_binding(id, expression)))
    }

    fn symbol_sets(&mut self) -> Result<SymbolSet> {
        let mut symbols = self.symbol_set()?;
        while let Some(line) = self.accept_pipe() {
            if self.production_set_ahead() {
                return Err(self.error(line, SyntaxErrorType::MixedSetUnion));
            }
            symbols = actions::symbol_set_union(symbols, self.symbol_set()?);
        }
        Ok(symbols)
    }

    fn production_sets(&mut self) -> Result<ProductionSet> {
        let mut productions = self.production_set()?;
        while let Some(line) = self.accept_pipe() {
            if self.peek(0) == Some(TokenKind::OpenBrace) && !self.production_set_ahead() {
                return Err(self.error(line, SyntaxErrorType::MixedSetUnion));
            }
            productions = actions::production_set_union(productions, self.production_set()?);
        }
        Ok(productions)
    }

    // Line of the consumed `|`, if there was one
    fn accept_pipe(&mut self) -> Option<usize> {
        if self.peek(0) == Some(TokenKind::Pipe) {
            return self.lookahead.pop_front().map(|token| token.line);
        }
        None
    }

    fn symbol_set(&mut self) -> Result<SymbolSet> {
        self.expect(TokenKind::OpenBrace, "`{`")?;
        let mut symbols = actions::symbol_set_new(self.symbol()?);
        while self.accept(TokenKind::Comma) {
            // Trailing comma
            if self.accept(TokenKind::CloseBrace) {
                return Ok(symbols);
            }
            symbols = actions::symbol_set_add(symbols, self.symbol()?);
        }
        self.expect(TokenKind::CloseBrace, "`,` or `}`")?;
        Ok(symbols)
    }

    fn production_set(&mut self) -> Result<ProductionSet> {
        self.expect(TokenKind::OpenBrace, "`{`")?;
        let mut productions = actions::production_set_new(self.production()?);
        while self.accept(TokenKind::Comma) {
            if self.accept(TokenKind::CloseBrace) {
                return Ok(productions);
            }
            productions = actions::production_set_add(productions, self.production()?);
        }
        self.expect(TokenKind::CloseBrace, "`,` or `}`")?;
        Ok(productions)
    }

    fn production(&mut self) -> Result<Production> {
        let lhs = self.symbol()?;
        self.expect(TokenKind::Arrow, "`->`")?;

        let mut rules = actions::rhs_rule_set_new(self.rhs_rule()?);
        while self.accept(TokenKind::Pipe) {
            rules = actions::rhs_rule_set_add(rules, self.rhs_rule()?);
        }
        Ok(actions::production(lhs, rules))
    }

    fn rhs_rule(&mut self) -> Result<ProductionRhsRule> {
        let token = match self.next_token() {
            Some(token) => token,
            None => return Err(self.end_of_input("a symbol or `λ`")),
        };

        match token.kind {
            TokenKind::Lambda => Ok(actions::rhs_rule_lambda()),
            TokenKind::Symbol => {
                let first = Symbol::from(token.lexeme);
                if self.peek(0) != Some(TokenKind::Symbol) {
                    return Ok(actions::rhs_rule_symbol(first));
                }

                let second = self.symbol()?;
                if self.peek(0) == Some(TokenKind::Symbol) {
                    if let Some(extra) = self.next_token() {
                        let error = SyntaxErrorType::TooManyRhsSymbols(extra.lexeme);
                        return Err(self.error(extra.line, error));
                    }
                }
                Ok(actions::rhs_rule_symbol_symbol(first, second))
            }
            _ => Err(self.unexpected(token, "a symbol or `λ`")),
        }
    }

    fn language_expression(&mut self) -> Result<LanguageExpression> {
        let mut left = self.term()?;
        loop {
            let operator = match self.peek(0) {
                Some(TokenKind::Pipe) => BinaryOperator::Union,
                Some(TokenKind::Minus) => BinaryOperator::Minus,
                _ => return Ok(left),
            };
            self.next_token();
            let right = self.term()?;
            left = actions::binary_language_expression(left, right, operator);
        }
    }

    fn term(&mut self) -> Result<LanguageExpression> {
        let mut left = self.factor()?;
        while self.accept(TokenKind::Ampersand) {
            let right = self.factor()?;
            left = actions::binary_language_expression(left, right, BinaryOperator::Intersect);
        }
        Ok(left)
    }

    fn factor(&mut self) -> Result<LanguageExpression> {
        let mut left = self.unary()?;
        while self.accept(TokenKind::Dot) {
            let right = self.unary()?;
            left = actions::binary_language_expression(left, right, BinaryOperator::Concat);
        }
        Ok(left)
    }

    // Runs `parse` one nesting level deeper, `line` being where the level opens
    fn nested<T>(&mut self, line: usize, parse: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error(line, SyntaxErrorType::NestingTooDeep(MAX_NESTING_DEPTH)));
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn unary(&mut self) -> Result<LanguageExpression> {
        let operator = match self.peek(0) {
            Some(TokenKind::Tilde) => UnaryOperator::Complement,
            Some(TokenKind::Caret) => UnaryOperator::Reverse,
            _ => return self.primary(),
        };
        let line = match self.next_token() {
            Some(token) => token.line,
            None => self.scanner.line(),
        };
        let operand = self.nested(line, Self::unary)?;
        Ok(actions::unary_language_expression(operand, operator))
    }

    fn primary(&mut self) -> Result<LanguageExpression> {
        let token = match self.next_token() {
            Some(token) => token,
            None => return Err(self.end_of_input("a language")),
        };

        match token.kind {
            // `L(g)`, a plain `L` is a language named L
            TokenKind::Id
                if token.lexeme == "L" && self.peek(0) == Some(TokenKind::OpenParenthesis) =>
            {
                self.next_token();
                let grammar = self.id()?;
                self.expect(TokenKind::CloseParenthesis, "`)`")?;
                let language = actions::language(grammar, LanguageKind::Grammar);
                Ok(actions::simple_language_expression(language))
            }
            TokenKind::Id => {
                let language = actions::language(Id::from(token.lexeme), LanguageKind::Language);
                Ok(actions::simple_language_expression(language))
            }
            TokenKind::OpenParenthesis => {
                let expression = self.nested(token.line, Self::language_expression)?;
                self.expect(TokenKind::CloseParenthesis, "`)`")?;
                Ok(expression)
            }
            _ => Err(self.unexpected(token, "a language")),
        }
    }
}

/// Parses the whole token stream, leaving the program in `state`. Accepts
/// only when the input parsed and the semantic actions reported success.
pub fn parse(state: &mut CompilerState, scanner: Scanner, file: &Path) -> SyntacticAnalysisStatus {
    debug!("Parsing...");
    let mut parser = Parser::new(scanner, file);
    let result = parser.program(state);
    debug!("Parsing is done.");

    match result {
        Ok(()) if state.succeed => SyntacticAnalysisStatus::Accept,
        Ok(()) => SyntacticAnalysisStatus::Reject,
        Err(error) => {
            error!("{}", error);
            SyntacticAnalysisStatus::Reject
        }
    }
}
