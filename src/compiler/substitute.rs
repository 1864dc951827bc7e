use crate::body::AttributeValue;
use crate::compiler::CompileError;
use crate::runtime::task::TransformationTask;

/// Resolve one templated attribute value against one task.
///
/// Literals pass through unchanged. A `TaskRef` reads the named field off
/// the task; a field that is absent (or not representable as a string)
/// fails that task's compilation. No nesting, no caching: field values
/// legitimately differ per task.
pub fn resolve(value: &AttributeValue, task: &TransformationTask) -> Result<String, CompileError> {
    match value {
        AttributeValue::Literal(literal) => Ok(literal.clone()),
        AttributeValue::TaskRef(field) => task
            .field(field)
            .ok_or_else(|| CompileError::UnresolvedSubstitution(field.clone())),
    }
}
