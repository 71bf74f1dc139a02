//! Line-oriented lexical state machine shared by every pattern-based strategy.
//!
//! The lexer tracks whether the scanner is in ordinary code, inside a block
//! comment, or inside a string literal, carrying that state across lines.
//! Each scanned line comes back as two views that are byte-aligned with the
//! raw line:
//!
//! * `code`: comments and string bodies replaced by spaces. Recogniser
//!   patterns run against this view, so they only ever see `Normal` text.
//! * `text`: comments replaced by spaces, strings intact. Used to recover
//!   import specifiers and signatures from match offsets.

/// Where the scanner currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexState {
    Normal,
    InBlockComment { depth: usize },
    InString { rule: usize },
    /// Inside a `/.../` regular expression literal. Never spans lines.
    InRegex { in_class: bool },
}

/// How a string delimiter decides whether it opens a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteKind {
    Plain,
    /// `'x'` or `'\n'` open a literal; `'a` (a Rust lifetime or label) does not.
    CharLiteral,
}

#[derive(Debug, Clone, Copy)]
pub struct StringRule {
    pub open: &'static str,
    pub close: &'static str,
    pub escapes: bool,
    pub multiline: bool,
    pub kind: QuoteKind,
}

impl StringRule {
    /// Single-line literal with backslash escapes.
    pub const fn plain(open: &'static str, close: &'static str) -> Self {
        Self {
            open,
            close,
            escapes: true,
            multiline: false,
            kind: QuoteKind::Plain,
        }
    }

    /// Literal that may span lines, with backslash escapes.
    pub const fn multiline(open: &'static str, close: &'static str) -> Self {
        Self {
            open,
            close,
            escapes: true,
            multiline: true,
            kind: QuoteKind::Plain,
        }
    }

    /// Literal that may span lines and has no escapes.
    pub const fn raw(open: &'static str, close: &'static str) -> Self {
        Self {
            open,
            close,
            escapes: false,
            multiline: true,
            kind: QuoteKind::Plain,
        }
    }

    pub const fn char_literal() -> Self {
        Self {
            open: "'",
            close: "'",
            escapes: true,
            multiline: false,
            kind: QuoteKind::CharLiteral,
        }
    }
}

/// The comment and string syntax of one language.
#[derive(Debug, Clone, Copy)]
pub struct Delimiters {
    pub line_comments: &'static [&'static str],
    pub block_comment: Option<(&'static str, &'static str)>,
    pub nested_comments: bool,
    /// `/.../` literals in expression position (JavaScript and TypeScript).
    pub regex_literals: bool,
    /// Checked in order, so longer openers (`"""`) must precede shorter ones.
    pub strings: &'static [StringRule],
}

/// One scanned line.
#[derive(Debug, Clone)]
pub struct LexedLine<'a> {
    pub number: usize,
    pub raw: &'a str,
    pub code: String,
    pub text: String,
}

impl LexedLine<'_> {
    /// True when nothing but whitespace remains once comments and strings are blanked.
    pub fn is_blank(&self) -> bool {
        self.code.trim().is_empty()
    }
}

pub struct Lexer<'d> {
    delimiters: &'d Delimiters,
    state: LexState,
}

impl<'d> Lexer<'d> {
    pub fn new(delimiters: &'d Delimiters) -> Self {
        Self {
            delimiters,
            state: LexState::Normal,
        }
    }

    /// State carried into the next line.
    pub fn state(&self) -> LexState {
        self.state
    }

    pub fn scan_line<'a>(&mut self, number: usize, raw: &'a str) -> LexedLine<'a> {
        let mut code = String::with_capacity(raw.len());
        let mut text = String::with_capacity(raw.len());
        let mut i = 0;

        while i < raw.len() {
            let rest = &raw[i..];
            match self.state {
                LexState::Normal => {
                    if self
                        .delimiters
                        .line_comments
                        .iter()
                        .any(|marker| rest.starts_with(marker))
                    {
                        blank(&mut code, rest);
                        blank(&mut text, rest);
                        break;
                    }
                    if let Some((open, _)) = self.delimiters.block_comment {
                        if rest.starts_with(open) {
                            self.state = LexState::InBlockComment { depth: 1 };
                            blank(&mut code, open);
                            blank(&mut text, open);
                            i += open.len();
                            continue;
                        }
                    }
                    if self.delimiters.regex_literals
                        && rest.starts_with('/')
                        && regex_may_start(&code)
                    {
                        code.push('/');
                        text.push('/');
                        self.state = LexState::InRegex { in_class: false };
                        i += 1;
                        continue;
                    }
                    if let Some((rule, len)) = self.string_opening(raw, i) {
                        code.push_str(&rest[..len]);
                        text.push_str(&rest[..len]);
                        self.state = LexState::InString { rule };
                        i += len;
                        continue;
                    }
                    let ch = first_char(rest);
                    code.push(ch);
                    text.push(ch);
                    i += ch.len_utf8();
                }
                LexState::InBlockComment { depth } => {
                    let Some((open, close)) = self.delimiters.block_comment else {
                        self.state = LexState::Normal;
                        continue;
                    };
                    if self.delimiters.nested_comments && rest.starts_with(open) {
                        self.state = LexState::InBlockComment { depth: depth + 1 };
                        blank(&mut code, open);
                        blank(&mut text, open);
                        i += open.len();
                    } else if rest.starts_with(close) {
                        self.state = if depth > 1 {
                            LexState::InBlockComment { depth: depth - 1 }
                        } else {
                            LexState::Normal
                        };
                        blank(&mut code, close);
                        blank(&mut text, close);
                        i += close.len();
                    } else {
                        let ch = first_char(rest);
                        blank_char(&mut code, ch);
                        blank_char(&mut text, ch);
                        i += ch.len_utf8();
                    }
                }
                LexState::InRegex { in_class } => {
                    let ch = first_char(rest);
                    if ch == '\\' {
                        let len = 1 + rest[1..].chars().next().map_or(0, char::len_utf8);
                        blank(&mut code, &rest[..len]);
                        text.push_str(&rest[..len]);
                        i += len;
                        continue;
                    }
                    match ch {
                        '/' if !in_class => {
                            code.push('/');
                            self.state = LexState::Normal;
                        }
                        '[' => {
                            blank_char(&mut code, ch);
                            self.state = LexState::InRegex { in_class: true };
                        }
                        ']' => {
                            blank_char(&mut code, ch);
                            self.state = LexState::InRegex { in_class: false };
                        }
                        _ => blank_char(&mut code, ch),
                    }
                    text.push(ch);
                    i += ch.len_utf8();
                }
                LexState::InString { rule } => {
                    let string = self.delimiters.strings[rule];
                    if string.escapes && rest.starts_with('\\') {
                        let len = 1 + rest[1..].chars().next().map_or(0, char::len_utf8);
                        blank(&mut code, &rest[..len]);
                        text.push_str(&rest[..len]);
                        i += len;
                    } else if rest.starts_with(string.close) {
                        code.push_str(string.close);
                        text.push_str(string.close);
                        self.state = LexState::Normal;
                        i += string.close.len();
                    } else {
                        let ch = first_char(rest);
                        blank_char(&mut code, ch);
                        text.push(ch);
                        i += ch.len_utf8();
                    }
                }
            }
        }

        // Unterminated single-line literals end with the line.
        match self.state {
            LexState::InString { rule } if !self.delimiters.strings[rule].multiline => {
                self.state = LexState::Normal;
            }
            LexState::InRegex { .. } => self.state = LexState::Normal,
            _ => {}
        }

        LexedLine {
            number,
            raw,
            code,
            text,
        }
    }

    /// Which string rule opens at byte `i` of `line`, and the opener's length.
    fn string_opening(&self, line: &str, i: usize) -> Option<(usize, usize)> {
        let rest = &line[i..];
        for (idx, rule) in self.delimiters.strings.iter().enumerate() {
            if !rest.starts_with(rule.open) {
                continue;
            }
            // Prefixed openers such as `r"` must not be the tail of an identifier.
            if rule.open.starts_with(|c: char| c.is_ascii_alphabetic())
                && line[..i].chars().next_back().is_some_and(is_ident_char)
            {
                continue;
            }
            match rule.kind {
                QuoteKind::Plain => return Some((idx, rule.open.len())),
                QuoteKind::CharLiteral => {
                    let mut after = rest[rule.open.len()..].chars();
                    return match (after.next(), after.next()) {
                        (Some('\\'), _) => Some((idx, rule.open.len())),
                        (Some(c), Some('\'')) if c != '\'' => Some((idx, rule.open.len())),
                        _ => None,
                    };
                }
            }
        }
        None
    }
}

/// Keywords after which a `/` starts an expression rather than dividing.
const REGEX_PRECEDING_WORDS: &[&str] = &[
    "return", "typeof", "instanceof", "in", "of", "new", "delete", "void", "throw", "case",
    "do", "else", "yield", "await",
];

/// Whether a `/` following `before` (the code view so far) opens a regex
/// literal: at the start of a line, after an operator or opening
/// punctuation, or after a keyword such as `return`.
fn regex_may_start(before: &str) -> bool {
    let trimmed = before.trim_end();
    let Some(last) = trimmed.chars().next_back() else {
        return true;
    };
    if is_ident_char(last) {
        let word_start = trimmed
            .char_indices()
            .rev()
            .find(|(_, c)| !is_ident_char(*c))
            .map_or(0, |(pos, c)| pos + c.len_utf8());
        return REGEX_PRECEDING_WORDS.contains(&&trimmed[word_start..]);
    }
    matches!(
        last,
        '(' | ',' | '=' | ':' | '[' | '!' | '&' | '|' | '?' | '{' | '}' | ';' | '+' | '-'
            | '*' | '%' | '<' | '>' | '~' | '^'
    )
}

fn first_char(s: &str) -> char {
    s.chars().next().unwrap_or(' ')
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Push one space per byte so the views stay byte-aligned with the raw line.
fn blank(out: &mut String, s: &str) {
    out.extend(std::iter::repeat(' ').take(s.len()));
}

fn blank_char(out: &mut String, c: char) {
    out.extend(std::iter::repeat(' ').take(c.len_utf8()));
}
