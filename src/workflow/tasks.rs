use super::GenerationContext;
use crate::cli::TasksArgs;
use crate::conventions::{GENERATE_ALL_TASK, TASK_GROUP};
use crate::graph::TaskSpec;
use crate::util::display_path;
use anyhow::{anyhow, Result};

/// List steps in the order `run` would execute them.
pub fn run_tasks(args: &TasksArgs) -> Result<()> {
    let ctx = GenerationContext::load(&args.project)?;
    let (_, graph) = ctx.resolve_graph()?;
    let order = graph
        .execution_order(GENERATE_ALL_TASK)
        .ok_or_else(|| anyhow!("graph has no {GENERATE_ALL_TASK} step"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&order)?);
        return Ok(());
    }

    println!("{TASK_GROUP} tasks");
    for task in order {
        println!("{}", format_task_line(task, ctx.project_dir()));
    }
    Ok(())
}

fn format_task_line(task: &TaskSpec, project_dir: &std::path::Path) -> String {
    let mut line = format!("{} [{}] - {}", task.id, task.kind, task.description);
    if let Some(spec) = &task.spec_path {
        line.push_str(&format!(
            "\n    spec: {}",
            display_path(spec, project_dir.parent())
        ));
    }
    if !task.depends_on.is_empty() {
        let deps: Vec<&str> = task.depends_on.iter().map(String::as_str).collect();
        line.push_str(&format!("\n    depends on: {}", deps.join(", ")));
    }
    line
}
