use crate::body::{OperationTemplate, TransformationBody};
use crate::compiler::CompileError;
use crate::compiler::substitute;
use crate::runtime::request::{Operation, OperationFile, Request};
use crate::runtime::task::{TaskId, TransformationTask};

/// Compiles one task at a time against a body parsed once per batch.
/// Either returns a fully populated request or fails; no partial request
/// ever escapes.
pub struct RequestCompiler {
    body: TransformationBody,
    owner_dn: String,
    owner_group: String,
}

impl RequestCompiler {
    pub fn new(body: TransformationBody, owner_dn: &str, owner_group: &str) -> Self {
        Self {
            body,
            owner_dn: owner_dn.to_string(),
            owner_group: owner_group.to_string(),
        }
    }

    pub fn body(&self) -> &TransformationBody {
        &self.body
    }

    pub fn compile(
        &self,
        task_id: TaskId,
        task: &TransformationTask,
    ) -> Result<Request, CompileError> {
        if task.input_data.is_empty() {
            return Err(CompileError::EmptyInputData);
        }

        let mut request = Request::new(
            format!("{:08}_{:08}", task.transformation_id, task_id),
            &self.owner_dn,
            &self.owner_group,
        );

        match &self.body {
            TransformationBody::SingleOperation(template) => {
                let mut operation = Operation::new(&template.op_type);
                // Shorthand bodies take the destination from the task
                // itself, ahead of any other attribute assignment.
                operation.set_attribute("TargetSE", &task.target_se);
                self.apply_attributes(&mut operation, template, task)?;
                attach_files(&mut operation, task);
                request.add_operation(operation);
            }
            TransformationBody::MultiOperation(templates) => {
                for template in templates {
                    let mut operation = Operation::new(&template.op_type);
                    self.apply_attributes(&mut operation, template, task)?;
                    attach_files(&mut operation, task);
                    request.add_operation(operation);
                }
            }
        }

        Ok(request)
    }

    /// Template order, then attribute-insertion order; the first failing
    /// substitution aborts this task's compilation.
    fn apply_attributes(
        &self,
        operation: &mut Operation,
        template: &OperationTemplate,
        task: &TransformationTask,
    ) -> Result<(), CompileError> {
        for (key, value) in &template.attributes {
            let resolved = substitute::resolve(value, task)?;
            operation.set_attribute(key, resolved);
        }
        Ok(())
    }
}

/// One file per input datum, insertion order, no deduplication.
fn attach_files(operation: &mut Operation, task: &TransformationTask) {
    for lfn in &task.input_data {
        operation.add_file(OperationFile::new(lfn));
    }
}
