use anyhow::{Context as AnyhowContext, Result};
use clap::{Parser, Subcommand};
use reqforge::body::{AttributeValue, TransformationBody};
use reqforge::compiler::loader::load_tasks_from_yaml;
use reqforge::compiler::parser::parse_body;
use reqforge::runtime::preparer::prepare_transformation_tasks;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a task batch into submittable requests
    Compile {
        /// Transformation body, inline or @path/to/file
        #[arg(long, short)]
        body: String,

        /// Path to the task batch YAML file
        #[arg(long, short)]
        tasks: PathBuf,

        /// Owner identity (logged, not stored on requests)
        #[arg(long, default_value = "")]
        owner: String,

        #[arg(long, default_value = "")]
        owner_group: String,

        #[arg(long, default_value = "")]
        owner_dn: String,
    },

    /// Parse a transformation body and print its template sequence
    Inspect {
        /// Transformation body, inline or @path/to/file
        #[arg(long, short)]
        body: String,
    },
}

fn read_body_arg(body: &str) -> Result<String> {
    if let Some(path) = body.strip_prefix('@') {
        fs::read_to_string(path).with_context(|| format!("Failed to read body file from {}", path))
    } else {
        Ok(body.to_string())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            body,
            tasks,
            owner,
            owner_group,
            owner_dn,
        } => {
            let raw_body = read_body_arg(&body)?;
            let task_dict = load_tasks_from_yaml(tasks.to_str().unwrap())?;
            let submitted_ids: Vec<_> = task_dict.keys().copied().collect();

            let prepared =
                prepare_transformation_tasks(&raw_body, task_dict, &owner, &owner_group, &owner_dn)?;

            for task_id in &submitted_ids {
                if !prepared.contains_key(task_id) {
                    warn!(task_id, "Task dropped from batch");
                }
            }

            let requests: BTreeMap<_, _> = prepared
                .iter()
                .filter_map(|(task_id, task)| task.task_object.as_ref().map(|r| (task_id, r)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&requests)?);
            info!(
                prepared = prepared.len(),
                submitted = submitted_ids.len(),
                "Compilation finished"
            );
        }

        Commands::Inspect { body } => {
            let raw_body = read_body_arg(&body)?;
            let parsed = parse_body(&raw_body)?;

            let grammar = match &parsed {
                TransformationBody::SingleOperation(_) => "shorthand",
                TransformationBody::MultiOperation(_) => "explicit",
            };
            println!("grammar: {}", grammar);

            for (index, template) in parsed.templates().iter().enumerate() {
                println!("[{}] {}", index, template.op_type);
                for (key, value) in &template.attributes {
                    match value {
                        AttributeValue::Literal(literal) => {
                            println!("    {} = {:?}", key, literal);
                        }
                        AttributeValue::TaskRef(field) => {
                            println!("    {} <- task field {:?}", key, field);
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
