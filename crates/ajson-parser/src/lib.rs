//! ajson-parser — descente récursive sur le flux de tokens
//!
//! Branches :
//! - `ajson-lexer` pour la tokenisation
//! - `ajson-ast` pour l'AST cible
//!
//! Grammaire (essentiel) :
//! ```text
//! document  := ws* value? ws*
//! value     := object | array | STRING | NUMBER | BOOL | NULL
//! object    := "{" ws* ( pair ( ws* "," ws* pair )* )? ws* "}"
//! pair      := STRING ws* ":" ws* value
//! array     := "[" ws* ( value ( ws* "," ws* value )* )? ws* "]"
//! ```
//!
//! Règles au-delà de la grammaire :
//! - tableaux homogènes : le premier élément fixe le [`Kind`] exigé des
//!   suivants (`[]` reste sans contrainte)
//! - clés d'objet uniques : un doublon est un échec de parse, pas un
//!   « dernier écrit gagne »
//! - voie numérique choisie d'après les drapeaux lexicaux : flottante si
//!   `.`/`e`/`E`, sinon signée si `-` de tête, sinon non signée ; un
//!   débordement de conversion échoue le parse
//! - garde de profondeur explicite ([`ParserOptions::max_depth`]) contre
//!   l'épuisement de pile sur entrée pathologique
//! - toute violation avorte le parse entier, aucun AST partiel
//!
//! [`Kind`]: ajson_ast::Kind

#![deny(missing_docs)]

use ajson_ast::{Kind, Number, Object, Value};
use ajson_lexer::{LexError, Lexer, Span, Token, TokenKind};
use log::{debug, trace};
use thiserror::Error;

/* ─────────────────────────── Options ─────────────────────────── */

/// Options du parser.
#[derive(Debug, Clone, Copy)]
pub struct ParserOptions {
    /// Profondeur d'imbrication maximale (anti-épuisement de pile).
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self { max_depth: 128 }
    }
}

/* ─────────────────────────── Erreurs ─────────────────────────── */

/// Erreur de parse.
///
/// Les échecs lexicaux remontent tels quels via [`ParseError::Lex`] ; tout
/// le reste est syntaxique ou numérique, avec l'offset d'octet quand il est
/// disponible.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Échec du lexer.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// Token qui ne peut pas commencer une valeur.
    #[error("invalid json syntax at byte {offset}")]
    UnexpectedToken {
        /// Offset du token fautif.
        offset: usize,
    },
    /// Fin d'entrée au milieu d'une construction.
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// Après un élément de tableau, ni `]` ni `,`.
    #[error("invalid token after element at byte {offset}")]
    AfterElement {
        /// Offset du token fautif.
        offset: usize,
    },
    /// Élément de tableau d'un [`Kind`] différent du premier.
    #[error("inconsistent array value type at byte {offset}: expected {expected}, found {found}")]
    InhomogeneousArray {
        /// Offset du premier token de l'élément fautif.
        offset: usize,
        /// Kind fixé par le premier élément.
        expected: Kind,
        /// Kind de l'élément refusé.
        found: Kind,
    },
    /// Clé d'objet qui n'est pas une chaîne.
    #[error("invalid key token at byte {offset}")]
    InvalidKey {
        /// Offset du token fautif.
        offset: usize,
    },
    /// `:` manquant après une clé.
    #[error("missing colon after key at byte {offset}")]
    MissingColon {
        /// Offset du token trouvé à la place.
        offset: usize,
    },
    /// Clé déjà présente dans le même objet.
    #[error("duplicated key {key:?}")]
    DuplicatedKey {
        /// La clé en double.
        key: String,
    },
    /// Après une valeur d'objet, ni `}` ni `,`.
    #[error("invalid token after value at byte {offset}")]
    AfterValue {
        /// Offset du token fautif.
        offset: usize,
    },
    /// Littéral numérique inconvertible dans sa voie (forme invalide ou
    /// débordement).
    #[error("invalid number literal at bytes {start}..{end}")]
    InvalidNumber {
        /// Début du littéral.
        start: usize,
        /// Fin (exclue) du littéral.
        end: usize,
    },
    /// Octets non UTF-8 dans une chaîne ou une clé.
    #[error("invalid utf-8 in string at byte {offset}")]
    InvalidUtf8 {
        /// Offset du guillemet ouvrant.
        offset: usize,
    },
    /// Contenu non blanc après la valeur racine.
    #[error("trailing token at byte {offset}")]
    TrailingToken {
        /// Offset du token excédentaire.
        offset: usize,
    },
    /// Imbrication au-delà de [`ParserOptions::max_depth`].
    #[error("nesting depth exceeds {max}")]
    TooDeep {
        /// La limite configurée.
        max: usize,
    },
}

type PResult<T> = Result<T, ParseError>;

/* ─────────────────────────── Parser ─────────────────────────── */

/// Parse un document JSON complet.
///
/// Renvoie `Ok(None)` pour une entrée vide (ou ne contenant que des
/// blancs). Raccourci pour [`Parser::new`] + [`Parser::parse`].
pub fn parse(bytes: &[u8]) -> PResult<Option<Value>> {
    Parser::new(bytes).parse()
}

/// Parseur JSON par descente récursive.
///
/// Une instance possède le curseur mutable du lexer : des parses
/// indépendants demandent des instances indépendantes (ou un nouvel appel à
/// [`Parser::parse`], qui repart du début du buffer).
pub struct Parser<'a> {
    bytes: &'a [u8],
    lx: Lexer<'a>,
    opts: ParserOptions,
}

impl<'a> Parser<'a> {
    /// Crée un parser avec les options par défaut.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self::with_options(bytes, ParserOptions::default())
    }

    /// Crée un parser avec [`ParserOptions`].
    #[must_use]
    pub fn with_options(bytes: &'a [u8], opts: ParserOptions) -> Self {
        Self { bytes, lx: Lexer::new(bytes), opts }
    }

    /// Parse le document entier.
    ///
    /// `Ok(None)` sur entrée vide ; erreur si du contenu non blanc subsiste
    /// après la valeur racine. Le curseur est replacé au début à chaque
    /// appel.
    pub fn parse(&mut self) -> PResult<Option<Value>> {
        self.lx.reset();
        trace!("parse: {} bytes", self.bytes.len());

        let tk = self.next_meaningful()?;
        if tk.kind == TokenKind::Eof {
            return Ok(None);
        }

        let value = self.parse_value(tk, 0).inspect_err(|e| debug!("parse failed: {e}"))?;

        let after = self.next_meaningful()?;
        if after.kind != TokenKind::Eof {
            return Err(ParseError::TrailingToken { offset: after.span.start });
        }

        trace!("parse: ok, root is {}", value.kind());
        Ok(Some(value))
    }

    /* ────────── Descente ────────── */

    fn parse_value(&mut self, tk: Token, depth: usize) -> PResult<Value> {
        match tk.kind {
            TokenKind::String => self.string_literal(tk.span),
            TokenKind::Number { has_dash, is_float } => {
                self.number_literal(tk.span, has_dash, is_float)
            }
            TokenKind::Bool => Ok(Value::Bool(self.bytes[tk.span.start] == b't')),
            TokenKind::Null => Ok(Value::Null),
            TokenKind::ArrayStart => self.parse_array(depth + 1),
            TokenKind::ObjectStart => self.parse_object(depth + 1),
            TokenKind::Eof => Err(ParseError::UnexpectedEof),
            _ => Err(ParseError::UnexpectedToken { offset: tk.span.start }),
        }
    }

    fn parse_array(&mut self, depth: usize) -> PResult<Value> {
        // une imbrication de `max_depth` conteneurs exactement est acceptée
        if depth > self.opts.max_depth {
            return Err(ParseError::TooDeep { max: self.opts.max_depth });
        }
        let mut values: Vec<Value> = Vec::new();

        let mut tk = self.next_meaningful()?;
        if tk.kind == TokenKind::ArrayEnd {
            return Ok(Value::Array(values));
        }

        loop {
            let elem_offset = tk.span.start;
            let value = self.parse_value(tk, depth)?;

            // le premier élément fixe le kind exigé des suivants
            if let Some(first) = values.first() {
                if first.kind() != value.kind() {
                    return Err(ParseError::InhomogeneousArray {
                        offset: elem_offset,
                        expected: first.kind(),
                        found: value.kind(),
                    });
                }
            }
            values.push(value);

            let then = self.next_meaningful()?;
            match then.kind {
                TokenKind::ArrayEnd => break,
                TokenKind::Comma => tk = self.next_meaningful()?,
                _ => return Err(ParseError::AfterElement { offset: then.span.start }),
            }
        }

        Ok(Value::Array(values))
    }

    fn parse_object(&mut self, depth: usize) -> PResult<Value> {
        if depth > self.opts.max_depth {
            return Err(ParseError::TooDeep { max: self.opts.max_depth });
        }
        let mut object = Object::new();

        let mut key_tok = self.next_meaningful()?;
        if key_tok.kind == TokenKind::ObjectEnd {
            return Ok(Value::Object(object));
        }

        loop {
            if key_tok.kind != TokenKind::String {
                return Err(ParseError::InvalidKey { offset: key_tok.span.start });
            }
            let key = self.string_text(key_tok.span)?;

            let colon = self.next_meaningful()?;
            if colon.kind != TokenKind::Colon {
                return Err(ParseError::MissingColon { offset: colon.span.start });
            }

            let val_tok = self.next_meaningful()?;
            let value = self.parse_value(val_tok, depth)?;

            if object.contains_key(&key) {
                return Err(ParseError::DuplicatedKey { key });
            }
            object.insert(key, value);

            let then = self.next_meaningful()?;
            match then.kind {
                TokenKind::ObjectEnd => break,
                TokenKind::Comma => key_tok = self.next_meaningful()?,
                _ => return Err(ParseError::AfterValue { offset: then.span.start }),
            }
        }

        Ok(Value::Object(object))
    }

    /* ────────── Littéraux ────────── */

    /// Texte intérieur d'un token chaîne : guillemets retirés, octets
    /// conservés tels quels (échappements validés par le lexer, non
    /// décodés ici).
    fn string_text(&self, span: Span) -> PResult<String> {
        let interior = &self.bytes[span.start + 1..span.end - 1];
        let text = core::str::from_utf8(interior)
            .map_err(|_| ParseError::InvalidUtf8 { offset: span.start })?;
        Ok(text.to_owned())
    }

    fn string_literal(&self, span: Span) -> PResult<Value> {
        Ok(Value::String(self.string_text(span)?))
    }

    /// Sélection de voie d'après les drapeaux lexicaux, puis conversion du
    /// texte exact du littéral dans cette voie.
    fn number_literal(&self, span: Span, has_dash: bool, is_float: bool) -> PResult<Value> {
        let invalid = ParseError::InvalidNumber { start: span.start, end: span.end };
        let raw = &self.bytes[span.start..span.end];
        let text = core::str::from_utf8(raw).map_err(|_| invalid.clone())?;

        let number = if is_float {
            Number::Float(text.parse::<f64>().map_err(|_| invalid)?)
        } else if has_dash {
            Number::Int(text.parse::<i64>().map_err(|_| invalid)?)
        } else {
            Number::Uint(text.parse::<u64>().map_err(|_| invalid)?)
        };
        Ok(Value::Number(number))
    }

    /* ────────── Flux de tokens ────────── */

    /// Prochain token non blanc.
    fn next_meaningful(&mut self) -> PResult<Token> {
        loop {
            let tk = self.lx.scan()?;
            if tk.kind != TokenKind::WhiteSpace {
                return Ok(tk);
            }
        }
    }
}

/* ─────────────────────────── Tests ─────────────────────────── */

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn must(src: &[u8]) -> Value {
        parse(src).unwrap().unwrap()
    }

    #[test]
    fn empty_input_is_no_value() {
        assert_eq!(parse(b"").unwrap(), None);
        assert_eq!(parse(b"  \t\n").unwrap(), None);
    }

    #[test]
    fn literal_lanes() {
        assert_eq!(must(b"123"), Value::Number(Number::Uint(123)));
        assert_eq!(must(b"-123"), Value::Number(Number::Int(-123)));
        assert_eq!(must(b"1.5"), Value::Number(Number::Float(1.5)));
        assert_eq!(must(b"1e3"), Value::Number(Number::Float(1000.0)));
        assert_eq!(must(b"-2.5"), Value::Number(Number::Float(-2.5)));
        assert_eq!(must(b"0"), Value::Number(Number::Uint(0)));
    }

    #[test]
    fn literal_others() {
        assert_eq!(must(b"true"), Value::Bool(true));
        assert_eq!(must(b"false"), Value::Bool(false));
        assert_eq!(must(b"null"), Value::Null);
        assert_eq!(must(b"\"abc\""), Value::String("abc".into()));
        assert_eq!(must(b"\"\""), Value::String(String::new()));
    }

    #[test]
    fn string_keeps_escapes_undecoded() {
        assert_eq!(must(r#""a\nbé""#.as_bytes()), Value::String(r"a\nbé".into()));
    }

    #[test]
    fn number_overflow_fails() {
        // u64::MAX + 1
        let err = parse(b"18446744073709551616").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { start: 0, .. }));
        // i64::MIN - 1
        let err = parse(b"-9223372036854775809").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { .. }));
    }

    #[test]
    fn number_garbage_fails() {
        for bad in [&b"1.2.3"[..], b"1e", b"-", b"1e++2"] {
            assert!(
                matches!(parse(bad), Err(ParseError::InvalidNumber { .. })),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn array_basics() {
        assert_eq!(must(b"[]"), Value::Array(vec![]));
        assert_eq!(
            must(b"[1, 2, 3]"),
            Value::Array(vec![
                Value::Number(Number::Uint(1)),
                Value::Number(Number::Uint(2)),
                Value::Number(Number::Uint(3)),
            ])
        );
    }

    #[test]
    fn array_homogeneity() {
        let err = parse(b"[1, \"a\"]").unwrap_err();
        assert_eq!(
            err,
            ParseError::InhomogeneousArray {
                offset: 4,
                expected: Kind::Number,
                found: Kind::String
            }
        );
        // les trois voies numériques partagent le même kind
        assert!(parse(b"[1, -2, 3.5]").is_ok());
        // tableaux imbriqués homogènes entre eux
        assert!(parse(b"[[1], [\"a\"]]").is_ok());
    }

    #[test]
    fn array_bad_separator() {
        assert!(matches!(parse(b"[1 2]"), Err(ParseError::AfterElement { offset: 3 })));
        assert!(matches!(parse(b"[1,]"), Err(ParseError::UnexpectedToken { .. })));
        assert!(matches!(parse(b"[1,"), Err(ParseError::UnexpectedEof)));
    }

    #[test]
    fn object_basics() {
        assert_eq!(must(b"{}"), Value::Object(Object::new()));

        let v = must(br#"{"a": 1, "b": 2}"#);
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj.get("a"), Some(&Value::Number(Number::Uint(1))));
        assert_eq!(obj.get("b"), Some(&Value::Number(Number::Uint(2))));
    }

    #[test]
    fn object_duplicate_key() {
        let err = parse(br#"{"a": 1, "a": 2}"#).unwrap_err();
        assert_eq!(err, ParseError::DuplicatedKey { key: "a".into() });
    }

    #[test]
    fn object_malformed() {
        assert!(matches!(parse(br#"{"a" 1}"#), Err(ParseError::MissingColon { .. })));
        assert!(matches!(parse(b"{1: 2}"), Err(ParseError::InvalidKey { .. })));
        assert!(matches!(parse(br#"{"a": 1 "b": 2}"#), Err(ParseError::AfterValue { .. })));
    }

    #[test]
    fn mixture_document() {
        let src = br#"
        {
          "str": "s",
          "num": 123,
          "bool": true,
          "null": null,
          "array": [-1, 0, 1],
          "sub": {"hello": "world", "empty": {}}
        }"#;
        let v = must(src);
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), 6);
        assert_eq!(obj.get("str").unwrap().as_str(), Some("s"));
        assert_eq!(obj.get("num").unwrap().as_number(), Some(Number::Uint(123)));
        assert_eq!(obj.get("bool").unwrap().as_bool(), Some(true));
        assert!(obj.get("null").unwrap().is_null());
        assert_eq!(
            obj.get("array").unwrap().as_array().unwrap(),
            &[
                Value::Number(Number::Int(-1)),
                Value::Number(Number::Uint(0)),
                Value::Number(Number::Uint(1)),
            ]
        );
        assert_eq!(v.get("sub").unwrap().get("hello").unwrap().as_str(), Some("world"));
    }

    #[test]
    fn trailing_content_rejected() {
        assert!(matches!(parse(b"1 2"), Err(ParseError::TrailingToken { offset: 2 })));
        assert!(matches!(parse(b"{} []"), Err(ParseError::TrailingToken { .. })));
    }

    #[test]
    fn lex_errors_propagate() {
        assert!(matches!(parse(br#""a\q""#), Err(ParseError::Lex(_))));
        assert!(matches!(parse(b"\"abc"), Err(ParseError::Lex(_))));
        assert!(matches!(parse(b"tru"), Err(ParseError::Lex(_))));
    }

    #[test]
    fn invalid_utf8_in_string() {
        assert!(matches!(parse(b"\"\xff\""), Err(ParseError::InvalidUtf8 { offset: 0 })));
    }

    #[test]
    fn depth_guard() {
        let deep = format!("{}1{}", "[".repeat(20), "]".repeat(20));
        let mut p = Parser::with_options(deep.as_bytes(), ParserOptions { max_depth: 8 });
        assert_eq!(p.parse(), Err(ParseError::TooDeep { max: 8 }));

        // exactement à la limite : accepté ; un niveau de plus : refusé
        let at_limit = format!("{}1{}", "[".repeat(8), "]".repeat(8));
        let mut p = Parser::with_options(at_limit.as_bytes(), ParserOptions { max_depth: 8 });
        assert!(p.parse().is_ok());

        let beyond = format!("{}1{}", "[".repeat(9), "]".repeat(9));
        let mut p = Parser::with_options(beyond.as_bytes(), ParserOptions { max_depth: 8 });
        assert_eq!(p.parse(), Err(ParseError::TooDeep { max: 8 }));

        // les conteneurs vides comptent aussi
        let empties = format!("{}{}", "[".repeat(9), "]".repeat(9));
        let mut p = Parser::with_options(empties.as_bytes(), ParserOptions { max_depth: 8 });
        assert_eq!(p.parse(), Err(ParseError::TooDeep { max: 8 }));
    }

    #[test]
    fn parser_is_reusable() {
        let mut p = Parser::new(b"[1]");
        let first = p.parse().unwrap();
        let second = p.parse().unwrap();
        assert_eq!(first, second);
    }

    mod lane_laws {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn digits_take_unsigned_lane(n in any::<u64>()) {
                let v = parse(n.to_string().as_bytes()).unwrap().unwrap();
                prop_assert_eq!(v, Value::Number(Number::Uint(n)));
            }

            #[test]
            fn dash_digits_take_signed_lane(n in i64::MIN..0i64) {
                let v = parse(n.to_string().as_bytes()).unwrap().unwrap();
                prop_assert_eq!(v, Value::Number(Number::Int(n)));
            }

            #[test]
            fn dot_or_exponent_takes_float_lane(n in any::<u32>(), dash in any::<bool>()) {
                let sign = if dash { "-" } else { "" };
                for text in [format!("{sign}{n}.0"), format!("{sign}{n}e0")] {
                    let v = parse(text.as_bytes()).unwrap().unwrap();
                    prop_assert!(matches!(v, Value::Number(Number::Float(_))), "{}", text);
                }
            }
        }
    }
}
