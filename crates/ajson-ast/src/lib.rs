//! ajson-ast — AST JSON typé
//!
//! Ce crate définit les structures de données produites par `ajson-parser`
//! et consommées par `ajson-decode` et `ajson-walk` :
//!
//! - [`Value`] : somme fermée sur {Number, Null, String, Bool, Object, Array}
//! - [`Number`] : une voie active parmi f64 / i64 / u64, choisie au parsing
//!   d'après la forme lexicale du littéral, jamais re-dérivée ensuite
//! - [`Object`] : entrées ordonnées (ordre de déclaration), clés uniques
//! - [`Kind`] : discriminant léger pour les diagnostics et l'invariant
//!   d'homogénéité des tableaux
//!
//! Les chaînes conservent les octets bruts entre guillemets : les séquences
//! d'échappement sont validées lexicalement mais **jamais décodées** ici.
//!
//! # Features
//! - `std` (par défaut) : tag homogène du workspace
//! - `serde` : (dé)sérialisation de l'AST
//!
//! # Exemple
//! ```rust
//! use ajson_ast::{Number, Value};
//!
//! let v = Value::Number(Number::Uint(999));
//! assert_eq!(v.as_number().unwrap().as_f64(), 999.0);
//! ```

#![deny(missing_docs)]

use core::fmt;

use indexmap::IndexMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/* ─────────────────────────── Kind ─────────────────────────── */

/// Discriminant d'un nœud [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Kind {
    /// Nombre (une des trois voies numériques).
    Number,
    /// `null`.
    Null,
    /// Chaîne (octets bruts entre guillemets).
    String,
    /// `true` ou `false`.
    Bool,
    /// Objet `{...}`.
    Object,
    /// Tableau `[...]`.
    Array,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Kind::Number => "number",
            Kind::Null => "null",
            Kind::String => "string",
            Kind::Bool => "bool",
            Kind::Object => "object",
            Kind::Array => "array",
        };
        f.write_str(s)
    }
}

/* ─────────────────────────── Number ─────────────────────────── */

/// Nombre JSON à voie unique.
///
/// La voie est choisie une seule fois, au parsing, d'après la forme lexicale
/// du littéral : présence de `.`/`e`/`E` → [`Number::Float`] ; sinon un `-`
/// de tête → [`Number::Int`] ; sinon → [`Number::Uint`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Number {
    /// Voie flottante (littéral contenant `.`, `e` ou `E`).
    Float(f64),
    /// Voie signée (littéral entier avec `-` de tête).
    Int(i64),
    /// Voie non signée (littéral entier sans signe).
    Uint(u64),
}

impl Number {
    /// Lit la valeur comme `i64`, sans jamais échouer.
    ///
    /// Voie non signée : réinterprétation en complément à deux. Voie
    /// flottante : troncature vers zéro (saturée hors bornes). L'appelant
    /// est censé connaître la voie correcte via un schéma externe ; pour une
    /// conversion garantie, vérifier les bornes avant l'appel.
    #[must_use]
    pub fn as_i64(self) -> i64 {
        match self {
            Number::Int(i) => i,
            Number::Uint(u) => u as i64,
            Number::Float(f) => f as i64,
        }
    }

    /// Lit la valeur comme `u64`, sans jamais échouer.
    ///
    /// Voie signée : réinterprétation en complément à deux (`-1` donne
    /// `u64::MAX`). Voie flottante : troncature vers zéro (saturée hors
    /// bornes, négatifs → 0).
    #[must_use]
    pub fn as_u64(self) -> u64 {
        match self {
            Number::Int(i) => i as u64,
            Number::Uint(u) => u,
            Number::Float(f) => f as u64,
        }
    }

    /// Lit la valeur comme `f64`, sans jamais échouer.
    ///
    /// Élargissement depuis i64/u64 avec l'arrondi usuel au-delà de 2^53.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Uint(u) => u as f64,
            Number::Float(f) => f,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Float(v) => write!(f, "{v}"),
            Number::Int(v) => write!(f, "{v}"),
            Number::Uint(v) => write!(f, "{v}"),
        }
    }
}

/* ─────────────────────────── Object ─────────────────────────── */

/// Objet JSON : entrées ordonnées (ordre d'insertion), clés uniques.
///
/// L'unicité est garantie par le parser ; [`Object::insert`] signale une clé
/// déjà présente sans l'écraser, ce qui permet au parser de refuser les
/// doublons plutôt que d'appliquer un « dernier écrit gagne ».
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Object {
    entries: IndexMap<String, Value>,
}

impl Object {
    /// Objet vide.
    #[must_use]
    pub fn new() -> Self {
        Self { entries: IndexMap::new() }
    }

    /// Insère `value` sous `key`. Renvoie `false` (sans écraser) si la clé
    /// existe déjà.
    pub fn insert(&mut self, key: String, value: Value) -> bool {
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, value);
        true
    }

    /// Valeur associée à `key`, si présente.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Vrai si `key` est présente.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Nombre d'entrées.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Vrai si l'objet est vide.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Itère sur les paires `(clé, valeur)` dans l'ordre d'insertion.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/* ─────────────────────────── Value ─────────────────────────── */

/// Nœud de l'AST JSON.
///
/// Construit une seule fois par le parser, possédé par l'appelant, jamais
/// muté ensuite : décodeur et walker ne font que le lire.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    /// Nombre à voie unique.
    Number(Number),
    /// `null`.
    Null,
    /// Octets bruts entre les guillemets, échappements non décodés.
    String(String),
    /// Booléen.
    Bool(bool),
    /// Objet ordonné.
    Object(Object),
    /// Tableau homogène (tous les éléments partagent le même [`Kind`]).
    Array(Vec<Value>),
}

impl Value {
    /// Discriminant du nœud.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Value::Number(_) => Kind::Number,
            Value::Null => Kind::Null,
            Value::String(_) => Kind::String,
            Value::Bool(_) => Kind::Bool,
            Value::Object(_) => Kind::Object,
            Value::Array(_) => Kind::Array,
        }
    }

    /// Vrai si le nœud est un booléen.
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Vrai si le nœud est `null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Vrai si le nœud est un nombre.
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Vrai si le nœud est une chaîne.
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Vrai si le nœud est un tableau.
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Vrai si le nœud est un objet.
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Le booléen, si le nœud en est un.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Le nombre, si le nœud en est un.
    #[must_use]
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Le texte brut de la chaîne, si le nœud en est une.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// L'objet, si le nœud en est un.
    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Les éléments du tableau, si le nœud en est un.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(vs) => Some(vs),
            _ => None,
        }
    }

    /// Descente directe : `self["key"]` si le nœud est un objet.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|o| o.get(key))
    }
}

impl fmt::Display for Value {
    /// Rendu JSON compact, pour les diagnostics.
    ///
    /// Les intérieurs de chaînes sont réémis tels quels (échappements non
    /// décodés) ; ce n'est pas un sérialiseur de fidélité.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Null => f.write_str("null"),
            Value::String(s) => write!(f, "\"{s}\""),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Object(o) => {
                f.write_str("{")?;
                for (i, (k, v)) in o.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "\"{k}\":{v}")?;
                }
                f.write_str("}")
            }
            Value::Array(vs) => {
                f.write_str("[")?;
                for (i, v) in vs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/* ─────────────────────────── Tests ─────────────────────────── */
