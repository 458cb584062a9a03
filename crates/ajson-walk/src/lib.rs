//! ajson-walk — contrats structurels sur l'AST, sans décodage
//!
//! Le [`Walker`] déclare puis vérifie des attentes sur un [`Value`] :
//! champs requis ou optionnels, prédicats de valeur, descente par chemin.
//! Il est indépendant du décodeur et se compose volontiers **avant** lui :
//! valider la forme, puis projeter.
//!
//! Chaque couche d'AST visitée est une *frame* : ses champs requis (dans
//! l'ordre de déclaration), ses validateurs, ses validateurs optionnels, et
//! au plus un validateur « littéral » rattaché quand aucun champ n'a encore
//! été déclaré (pour valider un non-objet ou un tableau entier). Les frames
//! vivent dans une pile explicite : [`Walker::path`] empile,
//! [`Walker::end_path`] dépile en remontant l'erreur éventuelle au parent,
//! et [`Walker::walk`] exécute toutes les frames dans l'ordre de
//! déclaration, première erreur gagnante.
//!
//! # Exemple
//! ```
//! use ajson_parser::parse;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let doc = parse(br#"{"name": "ajson", "ok": true}"#)?.unwrap();
//! ajson_walk::Walker::new(&doc)
//!     .field("name")
//!     .validate(|v| match v.as_str() {
//!         Some(_) => Ok(()),
//!         None => Err("name should be a string".into()),
//!     })
//!     .optional("ok", ajson_walk::validators::should_equal_true())
//!     .walk()?;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

use ajson_ast::{Kind, Value};
use thiserror::Error;

pub mod validators;

/* ─────────────────────────── Erreurs ─────────────────────────── */

/// Erreur applicative opaque renvoyée par un validateur.
pub type ValidatorError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Prédicat de valeur enregistré sur une frame.
pub type Validator = Box<dyn Fn(&Value) -> Result<(), ValidatorError>>;

/// Échec d'une traversée.
#[derive(Debug, Error)]
pub enum WalkError {
    /// Champ requis absent (premier manquant, ordre de déclaration).
    #[error("field not exist: {0}")]
    FieldNotExist(String),
    /// Descente dans une clé absente ou dans un nœud non-objet.
    #[error("path {path:?} doesn't exist in node type {kind}")]
    PathNotExist {
        /// La clé demandée.
        path: String,
        /// Kind du nœud où la descente a échoué.
        kind: Kind,
    },
    /// Erreur renvoyée par un validateur (opaque, définie par l'appelant).
    #[error("{0}")]
    Validator(ValidatorError),
}

/* ─────────────────────────── Frames ─────────────────────────── */

/// Contexte de traversée d'une couche d'AST.
struct Frame<'v> {
    value: &'v Value,
    /// Champs requis, ordre de déclaration, avec leur validateur éventuel.
    required: Vec<(String, Option<Validator>)>,
    /// Validateurs optionnels : exécutés seulement si la clé est présente.
    optional: Vec<(String, Validator)>,
    /// Validateur littéral : au plus un, pour une frame sans champ déclaré.
    literal: Option<Validator>,
    /// Erreur enregistrée à la construction (descente ratée), remontée au
    /// parent par `end_path` et rapportée par `walk`.
    err: Option<WalkError>,
}

impl<'v> Frame<'v> {
    fn new(value: &'v Value) -> Self {
        Self { value, required: Vec::new(), optional: Vec::new(), literal: None, err: None }
    }

    /// Exécute la frame : première erreur gagnante.
    fn run(mut self) -> Result<(), WalkError> {
        if let Some(err) = self.err.take() {
            return Err(err);
        }

        let Value::Object(object) = self.value else {
            // frame non-objet : seul le validateur littéral s'applique
            if let Some(validator) = &self.literal {
                validator(self.value).map_err(WalkError::Validator)?;
            }
            return Ok(());
        };

        // (1) existence des champs requis, ordre de déclaration
        for (name, _) in &self.required {
            if !object.contains_key(name) {
                return Err(WalkError::FieldNotExist(name.clone()));
            }
        }

        // (2) validateurs optionnels dont la clé est présente
        for (name, validator) in &self.optional {
            if let Some(value) = object.get(name) {
                validator(value).map_err(WalkError::Validator)?;
            }
        }

        // (3) validateurs des champs requis
        for (name, validator) in &self.required {
            if let (Some(validator), Some(value)) = (validator, object.get(name)) {
                validator(value).map_err(WalkError::Validator)?;
            }
        }

        Ok(())
    }
}

/* ─────────────────────────── Walker ─────────────────────────── */

/// Bâtisseur chaînable de contrats structurels.
///
/// Les frames s'exécutent à [`Walker::walk`] dans leur ordre de création ;
/// en cas de succès, la valeur racine est rendue inchangée.
pub struct Walker<'v> {
    frames: Vec<Frame<'v>>,
    /// Pile d'indices dans `frames` ; le sommet est la frame courante.
    stack: Vec<usize>,
}

impl<'v> Walker<'v> {
    /// Crée un walker enraciné sur `value`.
    #[must_use]
    pub fn new(value: &'v Value) -> Self {
        Self { frames: vec![Frame::new(value)], stack: vec![0] }
    }

    fn current(&mut self) -> &mut Frame<'v> {
        let idx = self.stack.last().copied().unwrap_or(0);
        &mut self.frames[idx]
    }

    /// Déclare `name` requis sur la frame courante. Le champ devient la
    /// cible implicite du prochain [`Walker::validate`].
    #[must_use]
    pub fn field(mut self, name: &str) -> Self {
        self.current().required.push((name.to_owned(), None));
        self
    }

    /// Rattache `validator` au dernier champ déclaré par [`Walker::field`]
    /// sur la frame courante (en remplaçant l'éventuel précédent). Si aucun
    /// champ n'a encore été déclaré ici, devient le validateur littéral de
    /// la frame.
    #[must_use]
    pub fn validate(
        mut self,
        validator: impl Fn(&Value) -> Result<(), ValidatorError> + 'static,
    ) -> Self {
        let frame = self.current();
        match frame.required.last_mut() {
            Some((_, slot)) => *slot = Some(Box::new(validator)),
            None => frame.literal = Some(Box::new(validator)),
        }
        self
    }

    /// Raccourci : [`Walker::field`] puis [`Walker::validate`].
    #[must_use]
    pub fn validate_key(
        self,
        name: &str,
        validator: impl Fn(&Value) -> Result<(), ValidatorError> + 'static,
    ) -> Self {
        self.field(name).validate(validator)
    }

    /// Rattache `validator` à `name`, exécuté seulement si la clé est
    /// présente : un champ optionnel absent n'est jamais une erreur.
    #[must_use]
    pub fn optional(
        mut self,
        name: &str,
        validator: impl Fn(&Value) -> Result<(), ValidatorError> + 'static,
    ) -> Self {
        self.current().optional.push((name.to_owned(), Box::new(validator)));
        self
    }

    /// Descend dans la valeur fille `name`, en empilant une nouvelle frame.
    ///
    /// Si la frame courante n'est pas un objet, ou si `name` est absente,
    /// l'échec est enregistré sur la frame empilée et rapporté à
    /// [`Walker::walk`] — la chaîne d'appels reste utilisable entre-temps.
    #[must_use]
    pub fn path(mut self, name: &str) -> Self {
        let parent = self.current().value;
        let (value, err) = match parent {
            Value::Object(object) => match object.get(name) {
                Some(child) => (child, None),
                None => (
                    parent,
                    Some(WalkError::PathNotExist { path: name.to_owned(), kind: Kind::Object }),
                ),
            },
            other => (
                parent,
                Some(WalkError::PathNotExist { path: name.to_owned(), kind: other.kind() }),
            ),
        };

        let mut frame = Frame::new(value);
        frame.err = err;
        self.frames.push(frame);
        self.stack.push(self.frames.len() - 1);
        self
    }

    /// Remonte à la frame parente, en lui propageant l'erreur enregistrée
    /// dans la frame fille le cas échéant. Sans effet sur la racine.
    #[must_use]
    pub fn end_path(mut self) -> Self {
        if self.stack.len() > 1 {
            let child = self.stack.pop().unwrap_or(0);
            if let Some(err) = self.frames[child].err.take() {
                let parent = self.current();
                if parent.err.is_none() {
                    parent.err = Some(err);
                }
            }
        }
        self
    }

    /// Exécute toutes les frames dans l'ordre de déclaration.
    ///
    /// Frame objet : (1) existence des champs requis — le premier manquant,
    /// dans l'ordre de déclaration, fait l'erreur ; (2) validateurs
    /// optionnels dont la clé est présente ; (3) validateurs des champs
    /// requis. Frame non-objet : validateur littéral s'il existe. S'arrête
    /// à la première erreur ; en cas de succès, rend la racine inchangée.
    pub fn walk(self) -> Result<&'v Value, WalkError> {
        let root = self.frames[0].value;
        for frame in self.frames {
            frame.run()?;
        }
        Ok(root)
    }
}

/* ─────────────────────────── Tests ─────────────────────────── */
