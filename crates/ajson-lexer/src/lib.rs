//! ajson-lexer — analyse lexicale JSON (flux tiré)
//!
//! Faits saillants :
//! - [`Lexer::scan`] : un token par appel, curseur interne ; passé la fin du
//!   buffer, renvoie indéfiniment un token `Eof` de span vide
//! - les blancs sont des tokens à part entière (un par octet) : c'est le
//!   parser qui les saute, pas le lexer
//! - chaînes : échappements `\" \\ \/ \b \f \n \r \t` et `\uXXXX`
//!   (exactement quatre chiffres hexadécimaux) validés mais non décodés
//! - nombres : balayage glouton de `- . e E + -` et des chiffres, **aucune
//!   conversion** — seuls deux drapeaux lexicaux (`has_dash`, `is_float`)
//!   sont relevés pour le choix de voie du parser
//! - erreurs typées [`LexError`] avec offset d'octet
//!
//! Exemple éclair :
//! ```
//! use ajson_lexer::{Lexer, TokenKind};
//!
//! let mut lx = Lexer::new(b"[1, true]");
//! let tok = lx.scan().unwrap();
//! assert_eq!(tok.kind, TokenKind::ArrayStart);
//! ```

#![deny(missing_docs)]

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/* ─────────────────────────── Spans ─────────────────────────── */

/// Plage d'octets demi-ouverte `[start, end)` dans le buffer d'entrée.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Span {
    /// Début inclus.
    pub start: usize,
    /// Fin exclue.
    pub end: usize,
}

impl Span {
    /// Crée un span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Longueur en octets.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Vrai si le span est vide.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/* ─────────────────────────── Tokens ─────────────────────────── */

/// Genre de token JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TokenKind {
    /// Un octet blanc (espace, tabulation, CR, LF).
    WhiteSpace,
    /// Chaîne entre guillemets, guillemets compris dans le span.
    String,
    /// Littéral numérique, non converti.
    Number {
        /// `-` de tête relevé (voie signée si entier).
        has_dash: bool,
        /// `.`, `e` ou `E` relevé (voie flottante).
        is_float: bool,
    },
    /// `true` ou `false`.
    Bool,
    /// `null`.
    Null,
    /// Fin de buffer (span vide, renvoyé indéfiniment).
    Eof,
    /// `{`
    ObjectStart,
    /// `}`
    ObjectEnd,
    /// `[`
    ArrayStart,
    /// `]`
    ArrayEnd,
    /// `,`
    Comma,
    /// `:`
    Colon,
}

/// Token : genre + plage d'octets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Token {
    /// Genre du token.
    pub kind: TokenKind,
    /// Plage `[start, end)` dans le buffer.
    pub span: Span,
}

/* ─────────────────────────── Erreurs ─────────────────────────── */

/// Genre d'erreur lexicale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    /// Guillemet fermant jamais atteint.
    #[error("unterminated string")]
    UnterminatedString,
    /// Caractère d'échappement non reconnu après `\`.
    #[error("invalid escape character")]
    InvalidEscape,
    /// `\u` non suivi de quatre chiffres hexadécimaux.
    #[error("invalid hex string")]
    InvalidUnicodeEscape,
    /// Épellation inexacte de `true`, `false` ou `null`.
    #[error("invalid literal spelling")]
    InvalidLiteral,
    /// Octet qui ne commence aucun token.
    #[error("unexpected byte {0:#04x}")]
    UnexpectedByte(u8),
}

/// Erreur lexicale avec l'offset de l'octet fautif.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} at byte {offset}")]
pub struct LexError {
    /// Offset d'octet du curseur au moment de l'échec.
    pub offset: usize,
    /// Genre d'erreur.
    pub kind: LexErrorKind,
}

type LResult<T> = Result<T, LexError>;

/* ─────────────────────────── Lexer ─────────────────────────── */

/// Analyseur lexical JSON.
///
/// Seul état : le curseur de balayage. Chaque appel à [`Lexer::scan`]
/// consomme exactement un token ; les tokens émis sont contigus et sans
/// trou sur le contenu non blanc.
pub struct Lexer<'a> {
    bytes: &'a [u8],
    /// Position courante en octets.
    cur: usize,
}

impl<'a> Lexer<'a> {
    /// Crée un lexer sur un buffer.
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, cur: 0 }
    }

    /// Replace le curseur au début du buffer, pour re-lexer la même entrée.
    pub fn reset(&mut self) {
        self.cur = 0;
    }

    /// Balaye et renvoie le prochain token.
    pub fn scan(&mut self) -> LResult<Token> {
        let start = self.cur;

        let Some(&c) = self.bytes.get(self.cur) else {
            return Ok(Token { kind: TokenKind::Eof, span: Span::new(start, start) });
        };

        match c {
            b'{' => Ok(self.single(start, TokenKind::ObjectStart)),
            b'}' => Ok(self.single(start, TokenKind::ObjectEnd)),
            b'[' => Ok(self.single(start, TokenKind::ArrayStart)),
            b']' => Ok(self.single(start, TokenKind::ArrayEnd)),
            b',' => Ok(self.single(start, TokenKind::Comma)),
            b':' => Ok(self.single(start, TokenKind::Colon)),
            b' ' | b'\t' | b'\n' | b'\r' => Ok(self.single(start, TokenKind::WhiteSpace)),
            b'"' => self.scan_string(start),
            b't' | b'f' => self.scan_bool(start),
            b'n' => self.scan_null(start),
            _ => self.scan_number(start),
        }
    }

    /* ────────── Primitives internes ────────── */

    fn single(&mut self, start: usize, kind: TokenKind) -> Token {
        self.cur += 1;
        Token { kind, span: Span::new(start, self.cur) }
    }

    #[inline]
    fn err(&self, offset: usize, kind: LexErrorKind) -> LexError {
        LexError { offset, kind }
    }

    /* ────────── Balayages composés ────────── */

    fn scan_string(&mut self, start: usize) -> LResult<Token> {
        // passe le guillemet ouvrant
        self.cur += 1;

        while self.cur < self.bytes.len() {
            match self.bytes[self.cur] {
                b'\\' => {
                    self.cur += 1;
                    let esc = *self
                        .bytes
                        .get(self.cur)
                        .ok_or_else(|| self.err(start, LexErrorKind::UnterminatedString))?;
                    match esc {
                        b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' => self.cur += 1,
                        b'u' => {
                            // exactement quatre chiffres hexadécimaux
                            let hex = self
                                .bytes
                                .get(self.cur + 1..self.cur + 5)
                                .ok_or_else(|| self.err(self.cur, LexErrorKind::InvalidUnicodeEscape))?;
                            if !hex.iter().all(u8::is_ascii_hexdigit) {
                                return Err(self.err(self.cur, LexErrorKind::InvalidUnicodeEscape));
                            }
                            self.cur += 5;
                        }
                        _ => return Err(self.err(self.cur, LexErrorKind::InvalidEscape)),
                    }
                }
                b'"' => {
                    // le guillemet fermant appartient au span
                    self.cur += 1;
                    return Ok(Token { kind: TokenKind::String, span: Span::new(start, self.cur) });
                }
                _ => self.cur += 1,
            }
        }
        Err(self.err(start, LexErrorKind::UnterminatedString))
    }

    fn scan_bool(&mut self, start: usize) -> LResult<Token> {
        let rest = &self.bytes[self.cur..];
        if rest.starts_with(b"true") {
            self.cur += 4;
        } else if rest.starts_with(b"false") {
            self.cur += 5;
        } else {
            return Err(self.err(start, LexErrorKind::InvalidLiteral));
        }
        Ok(Token { kind: TokenKind::Bool, span: Span::new(start, self.cur) })
    }

    fn scan_null(&mut self, start: usize) -> LResult<Token> {
        if !self.bytes[self.cur..].starts_with(b"null") {
            return Err(self.err(start, LexErrorKind::InvalidLiteral));
        }
        self.cur += 4;
        Ok(Token { kind: TokenKind::Null, span: Span::new(start, self.cur) })
    }

    fn scan_number(&mut self, start: usize) -> LResult<Token> {
        let mut has_dash = false;

        match self.bytes[self.cur] {
            b'-' => {
                has_dash = true;
                self.cur += 1;
            }
            b'0'..=b'9' => self.cur += 1,
            other => return Err(self.err(self.cur, LexErrorKind::UnexpectedByte(other))),
        }

        let mut is_float = false;
        while let Some(&b) = self.bytes.get(self.cur) {
            match b {
                b'.' | b'e' | b'E' => {
                    is_float = true;
                    self.cur += 1;
                }
                b'0'..=b'9' | b'+' | b'-' => self.cur += 1,
                _ => break,
            }
        }

        Ok(Token {
            kind: TokenKind::Number { has_dash, is_float },
            span: Span::new(start, self.cur),
        })
    }
}

/* ─────────────────────────── Tests ─────────────────────────── */

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scan_all(src: &[u8]) -> Vec<Token> {
        let mut lx = Lexer::new(src);
        let mut out = Vec::new();
        loop {
            let t = lx.scan().unwrap();
            let end = t.kind == TokenKind::Eof;
            out.push(t);
            if end {
                break;
            }
        }
        out
    }

    fn kinds(src: &[u8]) -> Vec<TokenKind> {
        scan_all(src).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn structural_tokens() {
        assert_eq!(
            kinds(b"{}[],:"),
            vec![
                TokenKind::ObjectStart,
                TokenKind::ObjectEnd,
                TokenKind::ArrayStart,
                TokenKind::ArrayEnd,
                TokenKind::Comma,
                TokenKind::Colon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn whitespace_one_token_per_byte() {
        assert_eq!(
            kinds(b" \t\r\n"),
            vec![
                TokenKind::WhiteSpace,
                TokenKind::WhiteSpace,
                TokenKind::WhiteSpace,
                TokenKind::WhiteSpace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_span_includes_quotes() {
        let toks = scan_all(b"\"hello\"");
        assert_eq!(toks[0].kind, TokenKind::String);
        assert_eq!(toks[0].span, Span::new(0, 7));
    }

    #[test]
    fn string_escapes_are_validated_not_decoded() {
        let toks = scan_all(r#""a\n\t\"\\\/ካ""#.as_bytes());
        assert_eq!(toks[0].kind, TokenKind::String);
        assert_eq!(toks[0].span.start, 0);
    }

    #[test]
    fn string_bad_escape() {
        let mut lx = Lexer::new(br#""a\q""#);
        let err = lx.scan().unwrap_err();
        assert_eq!(err.kind, LexErrorKind::InvalidEscape);
        assert_eq!(err.offset, 3);
    }

    #[test]
    fn string_bad_unicode_escape() {
        let mut lx = Lexer::new(br#""\uzzzz""#);
        let err = lx.scan().unwrap_err();
        assert_eq!(err.kind, LexErrorKind::InvalidUnicodeEscape);
    }

    #[test]
    fn string_short_unicode_escape() {
        let mut lx = Lexer::new(br#""\u12"#);
        let err = lx.scan().unwrap_err();
        assert_eq!(err.kind, LexErrorKind::InvalidUnicodeEscape);
    }

    #[test]
    fn string_unterminated() {
        let mut lx = Lexer::new(b"\"abc");
        let err = lx.scan().unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedString);
        assert_eq!(err.offset, 0);
    }

    #[test]
    fn bool_and_null_exact_spelling() {
        assert_eq!(kinds(b"true"), vec![TokenKind::Bool, TokenKind::Eof]);
        assert_eq!(kinds(b"false"), vec![TokenKind::Bool, TokenKind::Eof]);
        assert_eq!(kinds(b"null"), vec![TokenKind::Null, TokenKind::Eof]);

        for bad in [&b"tru"[..], b"ture", b"fals", b"nul", b"nulL"] {
            let mut lx = Lexer::new(bad);
            assert_eq!(lx.scan().unwrap_err().kind, LexErrorKind::InvalidLiteral, "{bad:?}");
        }
    }

    #[test]
    fn number_flags() {
        let toks = scan_all(b"123");
        assert_eq!(toks[0].kind, TokenKind::Number { has_dash: false, is_float: false });

        let toks = scan_all(b"-123");
        assert_eq!(toks[0].kind, TokenKind::Number { has_dash: true, is_float: false });

        for float in [&b"1.5"[..], b"1e3", b"1E3", b"-2.5e-2"] {
            let toks = scan_all(float);
            assert!(
                matches!(toks[0].kind, TokenKind::Number { is_float: true, .. }),
                "{float:?}"
            );
        }
    }

    #[test]
    fn number_scan_is_greedy_not_converting() {
        // le lexer accepte la forme, la conversion est l'affaire du parser
        let toks = scan_all(b"1.2.3");
        assert_eq!(toks[0].span, Span::new(0, 5));
    }

    #[test]
    fn unexpected_byte() {
        let mut lx = Lexer::new(b"@");
        let err = lx.scan().unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnexpectedByte(b'@'));
        assert_eq!(err.offset, 0);
    }

    #[test]
    fn eof_is_idempotent_and_empty() {
        let mut lx = Lexer::new(b"1");
        lx.scan().unwrap();
        for _ in 0..3 {
            let t = lx.scan().unwrap();
            assert_eq!(t.kind, TokenKind::Eof);
            assert!(t.span.is_empty());
        }
    }

    #[test]
    fn spans_are_contiguous() {
        let src = b"{\"a\":[1,true]} ";
        let toks = scan_all(src);
        let mut expect = 0;
        for t in &toks {
            if t.kind == TokenKind::Eof {
                break;
            }
            assert_eq!(t.span.start, expect);
            expect = t.span.end;
        }
        assert_eq!(expect, src.len());
    }

    #[test]
    fn reset_rewinds() {
        let mut lx = Lexer::new(b"null");
        assert_eq!(lx.scan().unwrap().kind, TokenKind::Null);
        assert_eq!(lx.scan().unwrap().kind, TokenKind::Eof);
        lx.reset();
        assert_eq!(lx.scan().unwrap().kind, TokenKind::Null);
    }
}
