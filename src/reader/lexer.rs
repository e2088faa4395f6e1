use logos::{Logos, SpannedIter};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct Token {
    pub(super) kind: TokenKind,
    pub(super) span: logos::Span,
}

/// Tokens of a single physical line
pub(super) struct TokenIter<'a> {
    iter: SpannedIter<'a, LogosTokenKind>,
}

impl<'a> TokenIter<'a> {
    pub(super) fn new(line: &'a str) -> Self {
        Self {
            iter: LogosTokenKind::lexer(line).spanned(),
        }
    }
}

impl<'a> Iterator for TokenIter<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        match self.iter.next() {
            Some((Ok(kind), span)) => {
                let (kind, span) = match kind {
                    LogosTokenKind::QuotedString => {
                        (TokenKind::Quoted, (span.start + 1)..(span.end - 1))
                    }
                    LogosTokenKind::Word => (TokenKind::Word, span),
                    LogosTokenKind::NetName => (TokenKind::NetName, span),
                    LogosTokenKind::NodeName => (TokenKind::NodeName, span),
                    LogosTokenKind::End => (TokenKind::End, span),
                    LogosTokenKind::FileType => (TokenKind::FileType, span),
                    LogosTokenKind::WS => unreachable!(),
                };
                Some(Token { kind, span })
            }
            Some((Err(_), span)) => Some(Token {
                kind: TokenKind::Error,
                span,
            }),
            None => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum TokenKind {
    Word,
    Quoted,
    NetName,
    NodeName,
    End,
    FileType,
    Error,
}

impl TokenKind {
    /// Keywords only mean something to the pstxnet reader, elsewhere they are plain text.
    pub(super) fn is_text(self) -> bool {
        !matches!(self, TokenKind::Error)
    }
}

#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq)]
enum LogosTokenKind {
    #[token("NET_NAME")]
    NetName,
    #[token("NODE_NAME")]
    NodeName,
    #[token("END.")]
    End,
    #[token("FILE_TYPE")]
    FileType,
    #[regex(r"'[^'\n]*'")]
    QuotedString,
    #[regex(r"[^ \t\r\f\n']+")]
    Word,
    #[regex(r"[ \t\r\f]+", logos::skip)]
    WS,
}
