//! ajson-decode — projection de l'AST sur des destinations typées
//!
//! Le décodeur applique un [`Value`] sur une destination mutable déjà
//! typée. Pas de réflexion : la destination implémente [`Decode`], et les
//! structures déclarent leurs associations nom-de-clé → champ via
//! [`decode_fields`] (l'équivalent explicite des tags de champ).
//!
//! Répartition par kind de valeur :
//! - nombre → écrit via l'accesseur de voie correspondant au type du champ
//!   (signé / non signé / flottant)
//! - chaîne → champ texte directement ; champ d'octets par copie brute
//!   ([`Bytes`], [`FixedBytes`]) sans échec de bornes
//! - `null` → remet la destination à sa représentation zéro/absente
//!   (c'est ainsi que `null` s'applique à un champ [`Option`])
//! - tableau → récursif élément par élément ; [`Vec`] grandit au besoin,
//!   `[T; N]` ignore l'excédent et laisse la queue intacte
//! - objet → parcourt les associations déclarées ; une clé absente du JSON
//!   saute le champ ; une association [`embedded`] décode dans le **même**
//!   espace de clés
//!
//! Un croisement kind/destination non pris en charge est un défaut de
//! schéma, pas un problème de données : il **panique** avec un message
//! descriptif. Seule l'absence de valeur emprunte la voie [`DecodeError`].
//!
//! # Exemple
//! ```
//! use ajson_ast::{Number, Value};
//! use ajson_decode::decode;
//!
//! let mut n: u64 = 0;
//! decode(Some(&Value::Number(Number::Uint(7))), &mut n).unwrap();
//! assert_eq!(n, 7);
//! ```

#![deny(missing_docs)]

use ajson_ast::Value;
use thiserror::Error;

/* ─────────────────────────── Erreurs ─────────────────────────── */

/// Erreur de décodage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Aucune valeur à décoder (entrée vide côté parse).
    #[error("value is absent")]
    AbsentValue,
}

type DResult = Result<(), DecodeError>;

/* ─────────────────────────── Trait ─────────────────────────── */

/// Destination de décodage.
///
/// L'exigence « la destination doit être une référence mutable » du modèle
/// d'origine est portée par la signature : `&mut self`.
pub trait Decode {
    /// Applique `value` sur `self`.
    ///
    /// # Panics
    /// Si le kind de `value` n'a pas de sens pour cette destination
    /// (défaut de schéma, voir la doc du crate).
    fn decode(&mut self, value: &Value) -> DResult;
}

/// Point d'entrée : applique `value` sur `dest`.
///
/// `None` (document vide) échoue avec [`DecodeError::AbsentValue`].
pub fn decode<T: Decode + ?Sized>(value: Option<&Value>, dest: &mut T) -> DResult {
    let value = value.ok_or(DecodeError::AbsentValue)?;
    dest.decode(value)
}

/* ─────────────────────────── Scalaires ─────────────────────────── */

macro_rules! impl_decode_signed {
    ($($t:ty),* $(,)?) => {$(
        impl Decode for $t {
            fn decode(&mut self, value: &Value) -> DResult {
                match value {
                    Value::Number(n) => *self = n.as_i64() as $t,
                    Value::Null => *self = 0,
                    other => panic!(
                        "cannot decode {} into a signed integer destination",
                        other.kind()
                    ),
                }
                Ok(())
            }
        }
    )*};
}

macro_rules! impl_decode_unsigned {
    ($($t:ty),* $(,)?) => {$(
        impl Decode for $t {
            fn decode(&mut self, value: &Value) -> DResult {
                match value {
                    Value::Number(n) => *self = n.as_u64() as $t,
                    Value::Null => *self = 0,
                    other => panic!(
                        "cannot decode {} into an unsigned integer destination",
                        other.kind()
                    ),
                }
                Ok(())
            }
        }
    )*};
}

macro_rules! impl_decode_float {
    ($($t:ty),* $(,)?) => {$(
        impl Decode for $t {
            fn decode(&mut self, value: &Value) -> DResult {
                match value {
                    Value::Number(n) => *self = n.as_f64() as $t,
                    Value::Null => *self = 0.0,
                    other => panic!("cannot decode {} into a float destination", other.kind()),
                }
                Ok(())
            }
        }
    )*};
}

impl_decode_signed!(i8, i16, i32, i64, isize);
impl_decode_unsigned!(u8, u16, u32, u64, usize);
impl_decode_float!(f32, f64);

impl Decode for bool {
    fn decode(&mut self, value: &Value) -> DResult {
        match value {
            Value::Bool(b) => *self = *b,
            Value::Null => *self = false,
            other => panic!("cannot decode {} into a bool destination", other.kind()),
        }
        Ok(())
    }
}

impl Decode for String {
    fn decode(&mut self, value: &Value) -> DResult {
        match value {
            Value::String(s) => {
                self.clear();
                self.push_str(s);
            }
            Value::Null => self.clear(),
            other => panic!("cannot decode {} into a text destination", other.kind()),
        }
        Ok(())
    }
}

/* ─────────────────────────── Octets bruts ─────────────────────────── */

/// Destination d'octets extensible : une chaîne JSON y est copiée
/// brute (octets intérieurs, échappements non décodés), en remplaçant le
/// contenu précédent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bytes(pub Vec<u8>);

impl Decode for Bytes {
    fn decode(&mut self, value: &Value) -> DResult {
        match value {
            Value::String(s) => {
                self.0.clear();
                self.0.extend_from_slice(s.as_bytes());
            }
            Value::Null => self.0.clear(),
            other => panic!("cannot decode {} into a byte-buffer destination", other.kind()),
        }
        Ok(())
    }
}

/// Destination d'octets à capacité fixe : copie brute tronquée à `N`
/// octets ; une entrée plus courte laisse la queue intacte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedBytes<const N: usize>(pub [u8; N]);

impl<const N: usize> Default for FixedBytes<N> {
    fn default() -> Self {
        Self([0; N])
    }
}

impl<const N: usize> Decode for FixedBytes<N> {
    fn decode(&mut self, value: &Value) -> DResult {
        match value {
            Value::String(s) => {
                let bytes = s.as_bytes();
                let n = bytes.len().min(N);
                self.0[..n].copy_from_slice(&bytes[..n]);
            }
            Value::Null => self.0 = [0; N],
            other => panic!("cannot decode {} into a byte-array destination", other.kind()),
        }
        Ok(())
    }
}

/* ─────────────────────────── Conteneurs ─────────────────────────── */

impl<T: Decode + Default> Decode for Option<T> {
    fn decode(&mut self, value: &Value) -> DResult {
        if value.is_null() {
            *self = None;
            return Ok(());
        }
        let mut inner = self.take().unwrap_or_default();
        inner.decode(value)?;
        *self = Some(inner);
        Ok(())
    }
}

impl<T: Decode + Default> Decode for Vec<T> {
    fn decode(&mut self, value: &Value) -> DResult {
        match value {
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if let Some(slot) = self.get_mut(i) {
                        slot.decode(item)?;
                    } else {
                        let mut slot = T::default();
                        slot.decode(item)?;
                        self.push(slot);
                    }
                }
                Ok(())
            }
            Value::Null => {
                self.clear();
                Ok(())
            }
            other => panic!("cannot decode {} into a sequence destination", other.kind()),
        }
    }
}

impl<T: Decode + Default, const N: usize> Decode for [T; N] {
    fn decode(&mut self, value: &Value) -> DResult {
        match value {
            // zip tronque l'excédent et laisse la queue intacte
            Value::Array(items) => {
                for (slot, item) in self.iter_mut().zip(items) {
                    slot.decode(item)?;
                }
                Ok(())
            }
            Value::Null => {
                for slot in self.iter_mut() {
                    *slot = T::default();
                }
                Ok(())
            }
            other => panic!("cannot decode {} into a fixed-array destination", other.kind()),
        }
    }
}

/* ─────────────────────────── Structures ─────────────────────────── */

/// Association nom-de-clé → champ pour [`decode_fields`].
pub struct Field<'a> {
    /// `None` pour un champ aplati ([`embedded`]).
    tag: Option<&'a str>,
    slot: &'a mut dyn Decode,
}

/// Lie le champ `slot` à la clé JSON `tag`.
pub fn field<'a>(tag: &'a str, slot: &'a mut dyn Decode) -> Field<'a> {
    Field { tag: Some(tag), slot }
}

/// Lie `slot` à l'objet courant lui-même : ses propres associations sont
/// résolues dans le **même** espace de clés (champ aplati, pas un
/// sous-objet).
pub fn embedded(slot: &mut dyn Decode) -> Field<'_> {
    Field { tag: None, slot }
}

/// Décode un objet JSON champ par champ.
///
/// Une clé absente de l'objet saute son association (destination
/// inchangée) ; les champs non listés sont ignorés. `null` remet chaque
/// champ lié à sa représentation zéro/absente.
///
/// # Panics
/// Si `value` n'est ni un objet ni `null` (défaut de schéma).
pub fn decode_fields(value: &Value, fields: &mut [Field<'_>]) -> DResult {
    match value {
        Value::Object(object) => {
            for binding in fields.iter_mut() {
                match binding.tag {
                    Some(tag) => {
                        if let Some(v) = object.get(tag) {
                            binding.slot.decode(v)?;
                        }
                    }
                    None => binding.slot.decode(value)?,
                }
            }
            Ok(())
        }
        Value::Null => {
            for binding in fields.iter_mut() {
                binding.slot.decode(&Value::Null)?;
            }
            Ok(())
        }
        other => panic!("cannot decode {} into a struct destination", other.kind()),
    }
}

/* ─────────────────────────── Tests ─────────────────────────── */
