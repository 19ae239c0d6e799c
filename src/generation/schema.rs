//! zod schema synthesis for endpoint parameters.
//!
//! Each parameter becomes one `key: validator` entry of the raw shape passed to
//! `server.tool(...)`. Keys follow the parameter order of the descriptor.

use tracing::warn;

use crate::core::{BaseType, ParamType, Parameter};
use crate::generation::sanitizers::Binding;
use crate::generation::typescript::{Expr, Prop, PropKey};

fn zod() -> Expr {
    Expr::ident("z")
}

/// Validator for a scalar base type
fn base_validator(base: &BaseType) -> Expr {
    match base {
        BaseType::String => zod().method("string", vec![]),
        BaseType::Integer => zod().method("number", vec![]).method("int", vec![]),
        BaseType::Number => zod().method("number", vec![]),
        BaseType::Boolean => zod().method("boolean", vec![]),
        BaseType::Object => zod().method(
            "record",
            vec![zod().method("string", vec![]), zod().method("any", vec![])],
        ),
        BaseType::Unknown(_) => zod().method("any", vec![]),
    }
}

/// Validator for a full parameter type, wrapping arrays in `z.array(...)`
pub fn type_validator(param_type: &ParamType) -> Expr {
    let base = base_validator(&param_type.base);
    if param_type.is_array {
        zod().method("array", vec![base])
    } else {
        base
    }
}

/// Validator for one parameter, including its description and optionality
pub fn param_validator(param: &Parameter) -> Expr {
    if let BaseType::Unknown(raw) = &param.param_type.base {
        warn!(
            param = %param.name,
            param_type = %raw,
            "Unknown parameter type, falling back to z.any()"
        );
    }

    let mut validator = type_validator(&param.param_type);

    if let Some(description) = param.description.as_deref().filter(|d| !d.is_empty()) {
        validator = validator.method("describe", vec![Expr::str(description)]);
    }

    if !param.is_required() {
        validator = validator.method("optional", vec![]);
    }

    validator
}

/// Shape entries for a parameter list, keyed by sanitized names
pub fn schema_entries(params: &[Parameter]) -> Vec<Prop> {
    params
        .iter()
        .map(|param| {
            let binding = Binding::for_param(param);
            Prop::Pair(PropKey::Auto(binding.safe), param_validator(param))
        })
        .collect()
}

/// The raw shape object literal
pub fn schema_object(params: &[Parameter]) -> Expr {
    Expr::object_multiline(schema_entries(params))
}
