//! Validateurs prêts à l'emploi pour [`Walker`](crate::Walker).
//!
//! Chacun renvoie une fermeture à passer à `validate` / `validate_key` /
//! `optional`. Les messages embarquent le rendu compact de la valeur
//! fautive.

use ajson_ast::Value;

use crate::ValidatorError;

/// La valeur doit être le booléen `true`.
pub fn should_equal_true() -> impl Fn(&Value) -> Result<(), ValidatorError> {
    |value: &Value| match value.as_bool() {
        Some(true) => Ok(()),
        Some(false) => Err("value should be true".into()),
        None => Err(format!("value should be a bool type: {value}").into()),
    }
}

/// La valeur doit être le booléen `false`.
pub fn should_equal_false() -> impl Fn(&Value) -> Result<(), ValidatorError> {
    |value: &Value| match value.as_bool() {
        Some(false) => Ok(()),
        Some(true) => Err("value should be false".into()),
        None => Err(format!("value should be a bool type: {value}").into()),
    }
}

/// La valeur doit être une chaîne égale à `expected` (texte brut, sans
/// décodage d'échappements).
pub fn should_equal_string(expected: impl Into<String>) -> impl Fn(&Value) -> Result<(), ValidatorError> {
    let expected = expected.into();
    move |value: &Value| match value.as_str() {
        Some(actual) if actual == expected => Ok(()),
        Some(actual) => {
            Err(format!("value is {actual:?}, not equal with expected value {expected:?}").into())
        }
        None => Err(format!("value should be a string type: {value}").into()),
    }
}

/// La valeur doit être une chaîne différente de `expected`.
pub fn should_not_equal_string(expected: impl Into<String>) -> impl Fn(&Value) -> Result<(), ValidatorError> {
    let expected = expected.into();
    move |value: &Value| match value.as_str() {
        Some(actual) if actual == expected => {
            Err(format!("value is {expected:?}, equal with expected value").into())
        }
        Some(_) => Ok(()),
        None => Err(format!("value should be a string type: {value}").into()),
    }
}

/// La valeur doit être `null`.
pub fn should_equal_null() -> impl Fn(&Value) -> Result<(), ValidatorError> {
    |value: &Value| {
        if value.is_null() {
            Ok(())
        } else {
            Err(format!("value should be a null type: {value}").into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ajson_ast::Number;

    #[test]
    fn booleans() {
        assert!(should_equal_true()(&Value::Bool(true)).is_ok());
        assert!(should_equal_true()(&Value::Bool(false)).is_err());
        assert!(should_equal_true()(&Value::Null).is_err());
        assert!(should_equal_false()(&Value::Bool(false)).is_ok());
        assert!(should_equal_false()(&Value::Bool(true)).is_err());
    }

    #[test]
    fn strings() {
        let v = Value::String("abc".into());
        assert!(should_equal_string("abc")(&v).is_ok());
        assert!(should_equal_string("xyz")(&v).is_err());
        assert!(should_not_equal_string("xyz")(&v).is_ok());
        assert!(should_not_equal_string("abc")(&v).is_err());
        assert!(should_equal_string("abc")(&Value::Number(Number::Uint(1))).is_err());
    }

    #[test]
    fn null() {
        assert!(should_equal_null()(&Value::Null).is_ok());
        assert!(should_equal_null()(&Value::Bool(false)).is_err());
    }
}
