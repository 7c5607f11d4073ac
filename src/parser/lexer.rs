use std::fmt::Display;
use std::iter::Peekable;
use std::str::Chars;

use itertools::{Itertools, PeekingNext};
use log::debug;

/// Lexical context of the scanner. Contexts nest, the scanner keeps a stack
/// of them and the top one decides how lexemes are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    Default,
    // Between `Grammar` and the closing `;`
    GrammarDefinition,
    // Between `{` and `}`, where words are grammar symbols
    SetBody,
    MultilineComment,
}

impl Context {
    pub fn id(self) -> u32 {
        match self {
            Context::Default => 0,
            Context::GrammarDefinition => 1,
            Context::SetBody => 2,
            Context::MultilineComment => 3,
        }
    }
}

impl Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Context::Default => "default",
            Context::GrammarDefinition => "grammar definition",
            Context::SetBody => "set body",
            Context::MultilineComment => "multi-line comment",
        };
        write!(f, "{} ({})", name, self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[rustfmt::skip]
pub enum TokenKind {
    Grammar, Id, Symbol, Lambda,
    Arrow, Equals, Comma, Semicolon,
    OpenParenthesis, CloseParenthesis, OpenBrace, CloseBrace,
    Pipe, Ampersand, Minus, Dot, Tilde, Caret,
    Unknown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    // 1-based
    pub line: usize,
    // Context the lexeme was read in
    pub context: Context,
}

impl Token {
    /// Length of the lexeme in bytes
    pub fn len(&self) -> usize {
        self.lexeme.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexeme.is_empty()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '\''
}

// Reads a double-quoted lexeme, the open quote already consumed. Returns the
// content without quotes, or `Err` with the partial content when the quote
// isn't closed on the same line
pub fn lex_quoted(chars: &mut impl PeekingNext<Item = char>) -> Result<String, String> {
    let content: String = chars.peeking_take_while(|&c| c != '"' && c != '\n').collect();

    // Check if there is a close quote and consume it if there is
    if chars.peeking_next(|&c| c == '"').is_none() {
        return Err(content);
    }

    Ok(content)
}

pub fn lex_word(first: char, chars: &mut impl PeekingNext<Item = char>) -> String {
    let mut word = first.to_string();
    word.extend(chars.peeking_take_while(|&c| is_word_char(c)));
    word
}

fn log_lexeme(action: &str, lexeme: &str, context: Context, line: usize) {
    debug!(
        "{}: {} (context = {}, length = {}, line = {})",
        action,
        lexeme.escape_debug(),
        context.id(),
        lexeme.len(),
        line
    );
}

pub struct Scanner<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    contexts: Vec<Context>,
    log_ignored_lexemes: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str, log_ignored_lexemes: bool) -> Self {
        Scanner {
            chars: source.chars().peekable(),
            line: 1,
            contexts: Vec::new(),
            log_ignored_lexemes,
        }
    }

    pub fn context(&self) -> Context {
        self.contexts.last().copied().unwrap_or(Context::Default)
    }

    // Line of the next unread character
    pub fn line(&self) -> usize {
        self.line
    }

    fn ignored(&self, action: &str, lexeme: &str, context: Context, line: usize) {
        if self.log_ignored_lexemes {
            log_lexeme(action, lexeme, context, line);
        }
    }

    fn skip_whitespace(&mut self, line: usize) {
        let whitespace: String = self.chars.peeking_take_while(|c| c.is_whitespace()).collect();
        self.line += whitespace.matches('\n').count();
        self.ignored("ignored", &whitespace, self.context(), line);
    }

    // Consumes comment text up to and including `*/`, or up to the end of
    // the input
    fn skip_comment_body(&mut self, line: usize) {
        let mut body = String::new();
        let mut closed = false;

        while let Some(c) = self.chars.next() {
            if c == '*' && self.chars.peeking_next(|&c| c == '/').is_some() {
                closed = true;
                break;
            }
            if c == '\n' {
                self.line += 1;
            }
            body.push(c);
        }

        self.ignored("ignored", &body, Context::MultilineComment, line);
        if closed {
            self.contexts.pop();
            self.ignored("end_multiline_comment", "*/", Context::MultilineComment, self.line);
        }
    }

    fn word(&mut self, first: char, context: Context) -> (TokenKind, String) {
        let word = lex_word(first, &mut self.chars);
        let kind = match context {
            Context::SetBody => TokenKind::Symbol,
            Context::Default if word == "Grammar" => {
                self.contexts.push(Context::GrammarDefinition);
                TokenKind::Grammar
            }
            _ => TokenKind::Id,
        };
        (kind, word)
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            let c = *self.chars.peek()?;
            let line = self.line;
            let context = self.context();

            if context == Context::MultilineComment {
                self.skip_comment_body(line);
                continue;
            }

            if c.is_whitespace() {
                self.skip_whitespace(line);
                continue;
            }

            self.chars.next();
            let single = |kind: TokenKind| (kind, c.to_string());
            let (kind, lexeme) = match c {
                '/' if self.chars.peeking_next(|&c| c == '*').is_some() => {
                    self.contexts.push(Context::MultilineComment);
                    self.ignored("begin_multiline_comment", "/*", context, line);
                    continue;
                }
                '/' if self.chars.peeking_next(|&c| c == '/').is_some() => {
                    let comment: String = self.chars.peeking_take_while(|&c| c != '\n').collect();
                    self.ignored("single_line_comment", &comment, context, line);
                    continue;
                }
                '{' => {
                    self.contexts.push(Context::SetBody);
                    single(TokenKind::OpenBrace)
                }
                '}' => {
                    if context == Context::SetBody {
                        self.contexts.pop();
                    }
                    single(TokenKind::CloseBrace)
                }
                ';' => {
                    if context == Context::GrammarDefinition {
                        self.contexts.pop();
                    }
                    single(TokenKind::Semicolon)
                }
                '-' if context == Context::SetBody => {
                    match self.chars.peeking_next(|&c| c == '>') {
                        Some(_) => (TokenKind::Arrow, "->".to_string()),
                        None => single(TokenKind::Unknown),
                    }
                }
                '\\' | 'λ' if context == Context::SetBody => single(TokenKind::Lambda),
                '"' if context == Context::SetBody => match lex_quoted(&mut self.chars) {
                    Ok(symbol) => (TokenKind::Symbol, symbol),
                    Err(partial) => (TokenKind::Unknown, format!("\"{}", partial)),
                },
                '=' => single(TokenKind::Equals),
                ',' => single(TokenKind::Comma),
                '(' => single(TokenKind::OpenParenthesis),
                ')' => single(TokenKind::CloseParenthesis),
                '|' => single(TokenKind::Pipe),
                '&' => single(TokenKind::Ampersand),
                '-' => single(TokenKind::Minus),
                '.' => single(TokenKind::Dot),
                '~' => single(TokenKind::Tilde),
                '^' => single(TokenKind::Caret),
                c if is_word_char(c) => self.word(c, context),
                _ => single(TokenKind::Unknown),
            };

            let action = format!("{:?}", kind).to_lowercase();
            log_lexeme(&action, &lexeme, context, line);

            return Some(Token {
                kind,
                lexeme,
                line,
                context,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::iter::zip;
    use std::sync::Mutex;

    use log::{LevelFilter, Log, Metadata, Record};

    use super::*;
    use TokenKind::*;

    // Keeps the messages logged by this module, from every test of the crate
    struct Capture;

    static CAPTURED: Mutex<Vec<String>> = Mutex::new(Vec::new());
    static CAPTURE: Capture = Capture;

    impl Log for Capture {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.target() == module_path!().trim_end_matches("::tests")
        }

        fn log(&self, record: &Record) {
            if self.enabled(record.metadata()) {
                if let Ok(mut captured) = CAPTURED.lock() {
                    captured.push(record.args().to_string());
                }
            }
        }

        fn flush(&self) {}
    }

    fn captured_containing(text: &str) -> usize {
        let captured = CAPTURED.lock().unwrap();
        captured.iter().filter(|line| line.contains(text)).count()
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        Scanner::new(source, true).map(|token| token.kind).collect_vec()
    }

    fn lexemes(source: &str) -> Vec<String> {
        Scanner::new(source, true).map(|token| token.lexeme).collect_vec()
    }

    #[test]
    fn lex_quoted_symbol() {
        let lines = vec!["alpha\" bravo", "\"", "unclosed", "broken\nline\""];
        // (result from the function, rest of the iterator)
        let answers = vec![
            (Ok("alpha".to_string()), " bravo"),
            (Ok("".to_string()), ""),
            (Err("unclosed".to_string()), ""),
            (Err("broken".to_string()), "\nline\""),
        ];

        for (line, (answer, rest)) in zip(lines, answers) {
            let mut chars = line.chars().peekable();
            assert_eq!(lex_quoted(&mut chars), answer);
            assert_eq!(chars.collect::<String>(), rest);
        }
    }

    #[test]
    fn lex_grammar_definition() {
        let mut scanner = Scanner::new("Grammar g = (T, N, P, S);", true);

        let grammar = scanner.next().unwrap();
        assert_eq!(grammar.kind, Grammar);
        assert_eq!(grammar.context, Context::Default);
        assert_eq!(scanner.context(), Context::GrammarDefinition);

        let rest = scanner.by_ref().map(|token| token.kind).collect_vec();
        assert_eq!(
            rest,
            vec![
                Id, Equals, OpenParenthesis, Id, Comma, Id, Comma, Id, Comma, Id,
                CloseParenthesis, Semicolon
            ]
        );
        assert_eq!(scanner.context(), Context::Default);
    }

    #[test]
    fn lex_set_body() {
        assert_eq!(
            kinds("P = { S -> a S | \\, A -> λ };"),
            vec![
                Id, Equals, OpenBrace, Symbol, Arrow, Symbol, Symbol, Pipe, Lambda, Comma,
                Symbol, Arrow, Lambda, CloseBrace, Semicolon
            ]
        );
        assert_eq!(
            lexemes("T = { a, \"+\", b_1 };"),
            vec!["T", "=", "{", "a", ",", "+", ",", "b_1", "}", ";"]
        );
    }

    #[test]
    fn words_outside_sets_are_ids() {
        assert_eq!(
            kinds("L = ~L(g) - (A . ^B) & C | D;"),
            vec![
                Id, Equals, Tilde, Id, OpenParenthesis, Id, CloseParenthesis, Minus,
                OpenParenthesis, Id, Dot, Caret, Id, CloseParenthesis, Ampersand, Id, Pipe, Id,
                Semicolon
            ]
        );
        // Only the default context knows the keyword
        assert_eq!(kinds("{ Grammar }"), vec![OpenBrace, Symbol, CloseBrace]);
    }

    #[test]
    fn skips_comments_and_counts_lines() {
        let source = "// heading\nT = { a }; /* spans\ntwo lines */\n\nN = { S };";
        let tokens = Scanner::new(source, true).collect_vec();

        assert_eq!(tokens.len(), 12);
        assert_eq!(tokens[0].line, 2);
        assert_eq!(tokens[6].lexeme, "N");
        assert_eq!(tokens[6].line, 5);
    }

    #[test]
    fn unterminated_comment_keeps_context() {
        let mut scanner = Scanner::new("T = { a }; /* never closed", false);
        assert_eq!(scanner.by_ref().count(), 6);
        assert_eq!(scanner.context(), Context::MultilineComment);
    }

    #[test]
    fn unknown_lexemes() {
        let tokens = Scanner::new("T = { a - b, \"c };\n# x", true).collect_vec();
        let unknown = tokens
            .iter()
            .filter(|token| token.kind == Unknown)
            .map(|token| token.lexeme.as_str())
            .collect_vec();

        assert_eq!(unknown, vec!["-", "\"c };", "#"]);
    }

    #[test]
    fn ignored_lexemes_are_logged_on_request() {
        // Fails if another logger is already installed, which is fine as long
        // as it is this one
        let _ = log::set_logger(&CAPTURE);
        log::set_max_level(LevelFilter::Debug);

        let source = "/* quiet comment */ quiet_id // quiet line";
        let tokens = Scanner::new(source, false).collect_vec();
        assert_eq!(tokens.len(), 1);
        assert_eq!(captured_containing("quiet comment"), 0);
        assert_eq!(captured_containing("quiet line"), 0);
        assert_eq!(captured_containing("id: quiet_id (context = 0, length = 8, line = 1)"), 1);

        let tokens = Scanner::new("/* loud comment */ loud_id // loud line", true).collect_vec();
        assert_eq!(tokens.len(), 1);
        assert_eq!(captured_containing("ignored:  loud comment  (context = 3"), 1);
        assert_eq!(captured_containing("single_line_comment:  loud line"), 1);
    }

    #[test]
    fn tokens_carry_length_and_context() {
        let tokens = Scanner::new("Grammar grammar_one", true).collect_vec();
        assert_eq!(tokens[1].len(), 11);
        assert_eq!(tokens[1].context, Context::GrammarDefinition);
    }
}
