use crate::compiler::CompileError;
use crate::compiler::core::RequestCompiler;
use crate::compiler::parser::parse_body;
use crate::runtime::task::TaskMap;
use tracing::{error, info};

/// Turn a batch of tasks into submittable requests.
///
/// The body is parsed once and shared across the batch. Each task is then
/// compiled independently: on success the request is attached as the
/// task's `task_object` and the task is kept; on failure the task is
/// dropped from the returned mapping with a logged diagnostic, and the
/// batch carries on. Only an unparseable body (or an empty batch) fails
/// the call itself, with no task touched. Callers tell the two outcomes
/// apart by comparing submitted and returned task-ID sets.
pub fn prepare_transformation_tasks(
    raw_body: &str,
    tasks: TaskMap,
    owner: &str,
    owner_group: &str,
    owner_dn: &str,
) -> Result<TaskMap, CompileError> {
    if tasks.is_empty() {
        return Err(CompileError::NoTasks);
    }

    let body = parse_body(raw_body)?;
    let compiler = RequestCompiler::new(body, owner_dn, owner_group);

    let submitted = tasks.len();
    let mut prepared = TaskMap::new();
    for (task_id, mut task) in tasks {
        match compiler.compile(task_id, &task) {
            Ok(request) => {
                // Attach only once the request is known-valid.
                task.task_object = Some(request);
                prepared.insert(task_id, task);
            }
            Err(e) => {
                error!(
                    task_id,
                    transformation_id = task.transformation_id,
                    error = %e,
                    "Not possible to create request for task, dropping it from the batch"
                );
            }
        }
    }

    info!(
        owner,
        owner_group,
        submitted,
        prepared = prepared.len(),
        "Prepared transformation tasks"
    );
    Ok(prepared)
}
