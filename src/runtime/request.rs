use serde::{Serialize, Deserialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// 编译产物：可提交的请求对象 (每个任务一个)
/// Owns an ordered sequence of operations plus the batch-level identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Request {
    pub request_id: Uuid,
    /// `{transformationID:08}_{taskID:08}`, the submission display name.
    pub request_name: String,
    pub owner_dn: String,
    pub owner_group: String,
    pub operations: Vec<Operation>,
}

impl Request {
    pub fn new(
        request_name: impl Into<String>,
        owner_dn: impl Into<String>,
        owner_group: impl Into<String>,
    ) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            request_name: request_name.into(),
            owner_dn: owner_dn.into(),
            owner_group: owner_group.into(),
            operations: Vec::new(),
        }
    }

    pub fn add_operation(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    /// Number of operations, which equals the body's template count.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// One typed unit of work within a request. Attribute order is assignment
/// order; file order is the owning task's `InputData` order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Operation {
    pub op_type: String,
    pub attributes: Map<String, Value>,
    pub files: Vec<OperationFile>,
}

impl Operation {
    pub fn new(op_type: impl Into<String>) -> Self {
        Self {
            op_type: op_type.into(),
            attributes: Map::new(),
            files: Vec::new(),
        }
    }

    pub fn set_attribute(&mut self, key: &str, value: impl Into<String>) {
        self.attributes
            .insert(key.to_string(), Value::String(value.into()));
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(|v| v.as_str())
    }

    pub fn add_file(&mut self, file: OperationFile) {
        self.files.push(file);
    }

    /// Number of file entries, one per input datum of the owning task.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// One input datum of an operation, identified by its logical file name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperationFile {
    pub lfn: String,
}

impl OperationFile {
    pub fn new(lfn: impl Into<String>) -> Self {
        Self { lfn: lfn.into() }
    }
}
