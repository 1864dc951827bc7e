use crate::body::{AttributeValue, DEFAULT_OPERATION, OperationTemplate, TransformationBody};
use crate::compiler::CompileError;
use serde_json::Value;

/// Parse a raw transformation body into its template sequence.
///
/// Two grammars share the entry point. Anything that decodes as JSON must
/// be the explicit grammar (a list of `[opType, {attr: value}]` entries);
/// anything else is the shorthand grammar (`""`, `"whatever"` or
/// `"prefix;OpType"`). Parsing happens once per batch, the result is
/// shared read-only across every task.
pub fn parse_body(raw: &str) -> Result<TransformationBody, CompileError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(decoded) => parse_explicit(decoded),
        Err(_) => Ok(parse_shorthand(raw)),
    }
}

/// Shorthand grammar. The segment before the separator is accepted but
/// never interpreted; with no separator the whole string is ignored and
/// the operation type falls back to `ReplicateAndRegister`. The template
/// carries no attributes: `TargetSE` comes from the task itself at
/// compile time, not through substitution.
fn parse_shorthand(raw: &str) -> TransformationBody {
    let op_type = match raw.rsplit_once(';') {
        Some((_prefix, op_type)) => op_type,
        None => DEFAULT_OPERATION,
    };
    TransformationBody::SingleOperation(OperationTemplate::new(op_type))
}

/// Explicit grammar: an ordered JSON list of 2-element entries.
fn parse_explicit(decoded: Value) -> Result<TransformationBody, CompileError> {
    let Value::Array(entries) = decoded else {
        return Err(CompileError::MalformedBody(
            "explicit body must be a list of operation entries".to_string(),
        ));
    };

    let mut templates = Vec::with_capacity(entries.len());
    for entry in entries {
        templates.push(parse_entry(entry)?);
    }
    Ok(TransformationBody::MultiOperation(templates))
}

fn parse_entry(entry: Value) -> Result<OperationTemplate, CompileError> {
    let Value::Array(pair) = entry else {
        return Err(CompileError::MalformedBody(
            "operation entry must be a [type, attributes] pair".to_string(),
        ));
    };
    let [op_type, attributes] = <[Value; 2]>::try_from(pair).map_err(|_| {
        CompileError::MalformedBody("operation entry must have exactly 2 elements".to_string())
    })?;

    let Value::String(op_type) = op_type else {
        return Err(CompileError::MalformedBody(
            "operation type must be a string".to_string(),
        ));
    };
    let Value::Object(attributes) = attributes else {
        return Err(CompileError::MalformedBody(
            "operation attributes must be a mapping".to_string(),
        ));
    };

    let mut template = OperationTemplate::new(op_type);
    // serde_json preserves insertion order here; resolution order and the
    // first-failure guarantee depend on it.
    for (key, value) in attributes {
        let classified = match value {
            Value::String(s) => AttributeValue::classify(&s),
            Value::Number(n) => AttributeValue::Literal(n.to_string()),
            Value::Bool(b) => AttributeValue::Literal(b.to_string()),
            other => {
                return Err(CompileError::MalformedBody(format!(
                    "attribute `{}` has unsupported value: {}",
                    key, other
                )));
            }
        };
        template.attributes.push((key, classified));
    }
    Ok(template)
}
