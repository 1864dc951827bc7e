use crate::body::{AttributeValue, OperationTemplate, TransformationBody};
use serde_json::{Map, Value, json};

/// Fluent builder for explicit multi-operation bodies.
/// Produces either the parsed form or its JSON wire encoding.
pub struct BodyBuilder {
    templates: Vec<OperationTemplate>,
}

impl BodyBuilder {
    pub fn new() -> Self {
        Self {
            templates: Vec::new(),
        }
    }

    pub fn operation(self, op_type: &str) -> OperationBuilder {
        OperationBuilder {
            body_builder: self,
            template: OperationTemplate::new(op_type),
        }
    }

    pub fn build(self) -> TransformationBody {
        TransformationBody::MultiOperation(self.templates)
    }

    /// Encode as the explicit JSON grammar accepted by `parse_body`.
    pub fn encode(self) -> String {
        let entries: Vec<Value> = self
            .templates
            .into_iter()
            .map(|template| {
                let mut attrs = Map::new();
                for (key, value) in template.attributes {
                    let raw = match value {
                        AttributeValue::Literal(s) => s,
                        AttributeValue::TaskRef(field) => format!("TASK:{}", field),
                    };
                    attrs.insert(key, Value::String(raw));
                }
                json!([template.op_type, attrs])
            })
            .collect();
        Value::Array(entries).to_string()
    }
}

impl Default for BodyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct OperationBuilder {
    body_builder: BodyBuilder,
    template: OperationTemplate,
}

impl OperationBuilder {
    /// Literal attribute value, copied onto every compiled operation as-is.
    pub fn attr(mut self, key: &str, value: &str) -> Self {
        self.template
            .attributes
            .push((key.to_string(), AttributeValue::Literal(value.to_string())));
        self
    }

    /// Attribute resolved per task from the named task field.
    pub fn task_ref(mut self, key: &str, field: &str) -> Self {
        self.template
            .attributes
            .push((key.to_string(), AttributeValue::TaskRef(field.to_string())));
        self
    }

    pub fn build(mut self) -> BodyBuilder {
        self.body_builder.templates.push(self.template);
        self.body_builder
    }
}
