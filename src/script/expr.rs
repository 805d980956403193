use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

/// Failure modes of the concatenation evaluator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    #[error("Expresión vacía.")]
    Empty,
    #[error("La variable {0} no existe o no es string.")]
    BadVariable(String),
    #[error("Token no permitido en expresión: {0}")]
    BadToken(String),
}

static LITERAL_RE: OnceLock<Regex> = OnceLock::new();
static IDENT_RE: OnceLock<Regex> = OnceLock::new();

fn literal_re() -> &'static Regex {
    LITERAL_RE.get_or_init(|| Regex::new(r#"^"([^"]*)"$"#).unwrap())
}

fn ident_re() -> &'static Regex {
    IDENT_RE.get_or_init(|| Regex::new(r"^[a-zA-Z_$][\w$]*$").unwrap())
}

/// Evaluate a `set` expression: `+`-separated segments, each either a
/// double-quoted string literal or an identifier bound to a string in
/// `vars`, concatenated in order.
pub fn eval_expr_concat(expr: &str, vars: &HashMap<String, Value>) -> Result<String, ExprError> {
    let parts: Vec<&str> = expr
        .split('+')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() {
        return Err(ExprError::Empty);
    }

    let mut out = String::new();
    for part in parts {
        if let Some(caps) = literal_re().captures(part) {
            out.push_str(&caps[1]);
            continue;
        }
        if ident_re().is_match(part) {
            match vars.get(part) {
                Some(Value::String(s)) => out.push_str(s),
                _ => return Err(ExprError::BadVariable(part.to_string())),
            }
            continue;
        }
        return Err(ExprError::BadToken(part.to_string()));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn literal_plus_variable() {
        let v = vars(&[("b", json!("c"))]);
        assert_eq!(eval_expr_concat("\"a\" + b", &v).unwrap(), "ac");
    }

    #[test]
    fn literals_only() {
        let v = HashMap::new();
        assert_eq!(eval_expr_concat("\"ho\" + \"la\"", &v).unwrap(), "hola");
        assert_eq!(eval_expr_concat("\"\"", &v).unwrap(), "");
    }

    #[test]
    fn missing_variable_names_it() {
        let err = eval_expr_concat("\"a\" + b", &HashMap::new()).unwrap_err();
        assert_eq!(err, ExprError::BadVariable("b".into()));
        assert_eq!(err.to_string(), "La variable b no existe o no es string.");
    }

    #[test]
    fn non_string_binding_rejected() {
        let v = vars(&[("n", json!(42))]);
        assert_eq!(
            eval_expr_concat("n", &v).unwrap_err(),
            ExprError::BadVariable("n".into())
        );
    }

    #[test]
    fn empty_expression_rejected() {
        assert_eq!(eval_expr_concat("", &HashMap::new()).unwrap_err(), ExprError::Empty);
        assert_eq!(
            eval_expr_concat(" + + ", &HashMap::new()).unwrap_err(),
            ExprError::Empty
        );
    }

    #[test]
    fn stray_token_rejected() {
        let err = eval_expr_concat("\"a\" + 3x", &HashMap::new()).unwrap_err();
        assert_eq!(err, ExprError::BadToken("3x".into()));
        assert_eq!(err.to_string(), "Token no permitido en expresión: 3x");
    }
}
