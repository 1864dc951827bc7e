use crate::runtime::request::Request;
use serde::{Serialize, Deserialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

pub type TaskId = u64;

/// 一批待编译的任务，taskID -> task
pub type TaskMap = BTreeMap<TaskId, TransformationTask>;

/// One unit of work tied to a transformation, as handed over by the
/// scheduler. Unknown keys land in `fields` so the body can reference any
/// of them with `TASK:<name>` without this type changing shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformationTask {
    #[serde(rename = "TransformationID")]
    pub transformation_id: u64,

    /// Default destination storage element, used directly by shorthand
    /// bodies and reachable as `TASK:TargetSE` from explicit ones.
    #[serde(rename = "TargetSE")]
    pub target_se: String,

    /// Opaque logical file names; one file entry per element, duplicates
    /// kept, order preserved.
    #[serde(rename = "InputData", default)]
    pub input_data: Vec<String>,

    #[serde(flatten)]
    pub fields: HashMap<String, Value>,

    /// Compiled request, attached by the engine on success only.
    #[serde(skip)]
    pub task_object: Option<Request>,
}

impl TransformationTask {
    pub fn new(
        transformation_id: u64,
        target_se: impl Into<String>,
        input_data: Vec<String>,
    ) -> Self {
        Self {
            transformation_id,
            target_se: target_se.into(),
            input_data,
            fields: HashMap::new(),
            task_object: None,
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Uniform field view for substitution. The typed fields answer under
    /// their wire names; everything else comes from the flattened map.
    /// Returns `None` for absent fields and for values that are not
    /// representable as a string.
    pub fn field(&self, name: &str) -> Option<String> {
        match name {
            "TargetSE" => Some(self.target_se.clone()),
            "TransformationID" => Some(self.transformation_id.to_string()),
            _ => self.fields.get(name).and_then(field_as_string),
        }
    }
}

fn field_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
