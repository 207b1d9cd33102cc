//! Token stream over raw command-line words.
//!
//! Words are classified lazily, one at a time, as they are requested. The
//! stream supports one-token lookahead (`peek`) and arbitrary push-back
//! (`push`, stack discipline), so the parse driver never has to re-tokenize.

use std::collections::VecDeque;
use std::fmt;

/// Classification of a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `--name` or `--name=value`.
    Long,
    /// `-x`, `-abc`, `-Dvalue`.
    Short,
    /// A value attached to a flag (`--name=value`, `-Dvalue`), split off by
    /// the parser.
    Value,
    /// A positional word.
    Arg,
    /// The literal `--`.
    EndOfOptions,
    /// No words left.
    Eol,
}

/// An immutable `(kind, text)` pair.
///
/// For flag tokens the text is the raw word, dashes included, so that it can
/// be handed back verbatim as unmanaged input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn value(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Value, text)
    }

    pub fn eol() -> Self {
        Self::new(TokenKind::Eol, "")
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn is_eol(&self) -> bool {
        self.kind == TokenKind::Eol
    }

    pub fn is_flag(&self) -> bool {
        matches!(self.kind, TokenKind::Long | TokenKind::Short)
    }

    /// Whether the token can be taken as a positional word or a flag value.
    pub fn is_positional(&self) -> bool {
        matches!(self.kind, TokenKind::Arg | TokenKind::Value)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eol => f.write_str("<EOL>"),
            _ => f.write_str(&self.text),
        }
    }
}

/// Ordered, resumable sequence of tokens.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    words: VecDeque<String>,
    pushed: Vec<Token>,
    history: Vec<Token>,
    options_ended: bool,
    positional_only: bool,
}

impl TokenStream {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Consume and return the next token.
    ///
    /// The most recently pushed-back token is returned first; otherwise the
    /// next word is classified. Once exhausted, an end-of-stream token is
    /// returned on every call.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Token {
        let token = match self.pushed.pop() {
            Some(token) => token,
            None => {
                let Some(word) = self.words.pop_front() else {
                    return Token::eol();
                };
                let token = self.classify(word);
                if token.kind == TokenKind::EndOfOptions {
                    self.options_ended = true;
                }
                token
            }
        };
        self.history.push(token.clone());
        token
    }

    /// Return the next token without consuming it.
    pub fn peek(&self) -> Token {
        if let Some(token) = self.pushed.last() {
            return token.clone();
        }
        match self.words.front() {
            Some(word) => self.classify(word.clone()),
            None => Token::eol(),
        }
    }

    /// Return a token to the front of the stream.
    ///
    /// Pushing back the token that was consumed last also removes it from the
    /// history, so the history only lists tokens that are still consumed.
    pub fn push(&mut self, token: Token) {
        if self.history.last() == Some(&token) {
            self.history.pop();
        }
        self.pushed.push(token);
    }

    /// Every token consumed so far, in order.
    pub fn history(&self) -> &[Token] {
        &self.history
    }

    pub fn is_eol(&self) -> bool {
        self.pushed.is_empty() && self.words.is_empty()
    }

    /// Classify every word not yet classified as positional, until
    /// [`TokenStream::release_positional`] is called. Used by strict
    /// (non-interspersed) ordering.
    pub fn force_positional(&mut self) {
        self.positional_only = true;
    }

    pub fn release_positional(&mut self) {
        self.positional_only = false;
    }

    /// Whether `--` has been consumed.
    pub fn options_ended(&self) -> bool {
        self.options_ended
    }

    fn classify(&self, word: String) -> Token {
        let kind = if self.options_ended || self.positional_only {
            TokenKind::Arg
        } else if word == "--" {
            TokenKind::EndOfOptions
        } else if word.starts_with("--") {
            TokenKind::Long
        } else if word.len() > 1 && word.starts_with('-') {
            TokenKind::Short
        } else {
            TokenKind::Arg
        };
        Token::new(kind, word)
    }
}
