pub mod builder;

use serde::{Serialize, Deserialize};

/// Operation type used when the shorthand body does not name one.
pub const DEFAULT_OPERATION: &str = "ReplicateAndRegister";

/// Prefix marking an attribute value as a per-task field reference.
pub const TASK_REF_PREFIX: &str = "TASK:";

/// 模板属性值：要么是字面量，要么是对任务字段的引用
/// A value of `"TASK:TargetSE"` in the explicit grammar becomes
/// `TaskRef("TargetSE")` and is resolved against each task at compile time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum AttributeValue {
    Literal(String),
    TaskRef(String),
}

impl AttributeValue {
    /// Classify a raw string from the body: values starting with `TASK:`
    /// reference the named task field, everything else is a literal.
    pub fn classify(raw: &str) -> Self {
        match raw.strip_prefix(TASK_REF_PREFIX) {
            Some(field) => AttributeValue::TaskRef(field.to_string()),
            None => AttributeValue::Literal(raw.to_string()),
        }
    }
}

/// One operation entry of a parsed body. Attribute order is the insertion
/// order of the source mapping; the compiler resolves attributes in this
/// order so the first failing substitution is deterministic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperationTemplate {
    pub op_type: String,
    pub attributes: Vec<(String, AttributeValue)>,
}

impl OperationTemplate {
    pub fn new(op_type: impl Into<String>) -> Self {
        Self {
            op_type: op_type.into(),
            attributes: Vec::new(),
        }
    }
}

/// 解析后的 transformation body (两种语法各自一个变体)
/// Read-only after parsing: one body is shared by every task in a batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum TransformationBody {
    /// Shorthand grammar (`""` or `"prefix;OpType"`). The single template
    /// carries no `TargetSE`; the compiler injects it from the task itself.
    SingleOperation(OperationTemplate),
    /// Explicit grammar: a JSON list of `[opType, {attr: value}]` entries.
    MultiOperation(Vec<OperationTemplate>),
}

impl TransformationBody {
    pub fn templates(&self) -> &[OperationTemplate] {
        match self {
            TransformationBody::SingleOperation(template) => std::slice::from_ref(template),
            TransformationBody::MultiOperation(templates) => templates,
        }
    }

    /// Number of operations every compiled request will carry.
    pub fn len(&self) -> usize {
        self.templates().len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates().is_empty()
    }
}
