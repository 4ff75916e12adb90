//! taskmatch CLI: operator interface to the assignment engine.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use taskmatch::assign::TaskOutcome;
use taskmatch::config::Config;
use taskmatch::engine::Engine;
use taskmatch::service::AssignmentService;
use taskmatch::snapshot::Snapshot;
use taskmatch::telemetry::{TelemetryConfig, init_telemetry};

#[derive(Parser)]
#[command(name = "taskmatch", about = "Skill-based task assignment")]
struct Cli {
    /// Snapshot file holding workers and projects
    #[arg(long, global = true, default_value = "taskmatch.json")]
    snapshot: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rank workers for one task
    Rank {
        /// Project ID
        #[arg(long)]
        project: String,
        /// Task ID
        #[arg(long)]
        task: String,
        /// Maximum candidates to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Auto-assign a project's unassigned tasks
    Assign {
        /// Project ID
        #[arg(long)]
        project: String,
        /// Write the updated snapshot back to disk
        #[arg(long)]
        write: bool,
        /// Print the batch report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show assigned task counts per worker
    Workload,
    /// List a worker's tasks across all projects
    Tasks {
        /// Worker ID
        #[arg(long)]
        worker: String,
    },
    /// Show dashboard totals
    Summary,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env()?;

    let guard = init_telemetry(TelemetryConfig {
        endpoint: config.otel_endpoint.clone(),
        service_name: "taskmatch".to_string(),
        log_level: config.log_level.clone(),
    })?;

    let engine = load_engine(&cli.snapshot, &config)?;

    let result = match cli.command {
        Command::Rank {
            project,
            task,
            limit,
        } => cmd_rank(&engine, &project, &task, limit),
        Command::Assign {
            project,
            write,
            json,
        } => cmd_assign(engine, &project, write.then_some(cli.snapshot.as_path()), json).await,
        Command::Workload => cmd_workload(&engine),
        Command::Tasks { worker } => cmd_tasks(&engine, &worker),
        Command::Summary => cmd_summary(&engine),
    };

    guard.force_flush();
    result
}

fn load_engine(path: &Path, config: &Config) -> anyhow::Result<Engine> {
    if !path.exists() {
        anyhow::bail!("snapshot file not found: {}", path.display());
    }
    let policy = config.policy()?;
    let engine = Snapshot::load(path)?.into_engine(policy)?;
    Ok(engine)
}

fn cmd_rank(engine: &Engine, project: &str, task: &str, limit: usize) -> anyhow::Result<()> {
    let ranked = engine.recommend(project, task)?;
    let task = engine.get_task(project, task)?;

    println!("Task:    {} ({})", task.title, task.id);
    println!("Skills:  {}", display_list(&task.skills));
    if let Some(assignee) = task.assignee() {
        println!("Current: {assignee}");
    }
    println!();

    if ranked.is_empty() {
        println!("No workers in snapshot.");
        return Ok(());
    }

    println!(
        "{:<4}  {:<10}  {:<20}  {:<6}  {:<5}  {:<6}  {:<4}  MATCH",
        "#", "ID", "NAME", "SCORE", "RATIO", "FACTOR", "LOAD"
    );
    println!("{}", "-".repeat(80));

    for (rank, candidate) in ranked.iter().take(limit).enumerate() {
        let s = &candidate.score;
        println!(
            "{:<4}  {:<10}  {:<20}  {:<6.3}  {:<5.2}  {:<6.3}  {:<4}  {}",
            rank + 1,
            candidate.worker.id,
            truncate(&candidate.worker.name, 20),
            s.score,
            s.match_ratio,
            s.workload_factor,
            s.workload,
            if s.has_match {
                format!("yes ({})", s.match_count)
            } else {
                "no".to_string()
            }
        );
    }

    if ranked.len() > limit {
        println!("\n{} more candidate(s) not shown", ranked.len() - limit);
    }
    Ok(())
}

async fn cmd_assign(
    engine: Engine,
    project: &str,
    write_to: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let service = AssignmentService::new(engine);
    let report = service.auto_assign(project).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{:<36}  {:<24}  DETAIL", "TASK", "OUTCOME");
        println!("{}", "-".repeat(90));
        for entry in &report.outcomes {
            let detail = match &entry.outcome {
                TaskOutcome::Assigned {
                    worker_id,
                    worker_name,
                    score,
                } => format!("{worker_name} ({worker_id}) score {score:.3}"),
                TaskOutcome::AlreadyAssigned { worker_id } => format!("kept {worker_id}"),
                TaskOutcome::NoQualifiedCandidate { best_score } => match best_score {
                    Some(score) => format!("best score {score:.3}"),
                    None => "no workers".to_string(),
                },
            };
            println!("{:<36}  {:<24}  {}", entry.task_id, entry.outcome.label(), detail);
        }
        println!(
            "\n{} assigned, {} already assigned, {} without a qualified candidate",
            report.assigned, report.already_assigned, report.unqualified
        );
    }

    if let Some(path) = write_to {
        service.snapshot().await.save(path)?;
        println!("Snapshot written to {}", path.display());
    }
    Ok(())
}

fn cmd_workload(engine: &Engine) -> anyhow::Result<()> {
    let workload = engine.workload();

    println!("{:<10}  {:<24}  TASKS", "ID", "NAME");
    println!("{}", "-".repeat(44));
    for worker in engine.directory().workers() {
        println!(
            "{:<10}  {:<24}  {}",
            worker.id,
            truncate(&worker.name, 24),
            workload.get(&worker.id)
        );
    }

    // Assignees the directory no longer knows about.
    for (id, count) in workload.sorted() {
        if engine.directory().get(id).is_none() {
            println!("{:<10}  {:<24}  {}", id, "(unknown)", count);
        }
    }
    Ok(())
}

fn cmd_tasks(engine: &Engine, worker_id: &str) -> anyhow::Result<()> {
    let Some(worker) = engine.directory().get(worker_id) else {
        anyhow::bail!("no worker with id '{worker_id}'");
    };
    let tasks = engine.tasks_for_worker(worker_id);

    if tasks.is_empty() {
        println!("No tasks assigned to {}.", worker.name);
        return Ok(());
    }

    println!("{:<36}  {:<12}  {:<30}  SKILLS", "TASK", "STATUS", "TITLE");
    println!("{}", "-".repeat(100));
    for task in &tasks {
        println!(
            "{:<36}  {:<12}  {:<30}  {}",
            task.id,
            task.status,
            truncate(&task.title, 30),
            display_list(&task.skills)
        );
    }
    println!("\n{} task(s)", tasks.len());
    Ok(())
}

fn cmd_summary(engine: &Engine) -> anyhow::Result<()> {
    let s = engine.summary();
    println!(
        "Projects:     {} ({} active, {} completed)",
        s.total_projects, s.active_projects, s.completed_projects
    );
    println!("Tasks:        {}", s.total_tasks);
    println!("  Not started: {}", s.not_started);
    println!("  In progress: {}", s.in_progress);
    println!("  Completed:   {}", s.completed);
    println!("Unassigned:   {}", s.unassigned);
    Ok(())
}

fn display_list(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        s.chars().take(max).collect()
    } else {
        s.to_string()
    }
}
