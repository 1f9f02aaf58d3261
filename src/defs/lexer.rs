//! Tokenizer for definition files.

/// Token kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TokenKind<'src> {
    /// `(`
    Open,
    /// `)`
    Close,
    /// `:`
    Colon,
    /// Any run of other non-blank characters: numbers, names, keywords.
    Word(&'src str),
    Eof,
}

/// Token with the 1-based line it started on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Token<'src> {
    pub kind: TokenKind<'src>,
    pub line: usize,
}

/// Definition file lexer. `#` comments run to the end of the line.
pub(crate) struct Lexer<'src> {
    source: &'src str,
    pos: usize,
    line: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos).copied()
    }

    /// Skip blanks and comments, counting newlines.
    fn skip_trivia(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                b' ' | b'\t' | b'\r' => self.pos += 1,
                b'#' => {
                    while let Some(c) = self.peek() {
                        if c == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    pub fn next_token(&mut self) -> Token<'src> {
        self.skip_trivia();
        let line = self.line;
        let Some(b) = self.peek() else {
            return Token {
                kind: TokenKind::Eof,
                line,
            };
        };

        let kind = match b {
            b'(' => {
                self.pos += 1;
                TokenKind::Open
            }
            b')' => {
                self.pos += 1;
                TokenKind::Close
            }
            b':' => {
                self.pos += 1;
                TokenKind::Colon
            }
            _ => {
                let start = self.pos;
                while let Some(c) = self.peek() {
                    if c.is_ascii_whitespace() || matches!(c, b'(' | b')' | b':' | b'#') {
                        break;
                    }
                    // multi-byte UTF-8 sequences never contain these ASCII bytes
                    self.pos += 1;
                }
                TokenKind::Word(&self.source[start..self.pos])
            }
        };
        Token { kind, line }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        (token.kind != TokenKind::Eof).then_some(token)
    }
}
