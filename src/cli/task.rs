//! tt task command implementations.

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::ViewArgs;
use crate::config::{self, Config};
use crate::error::{Error, Result};
use crate::output::{emit_success, format_task_line, short_id, HumanOutput, OutputOptions};
use crate::reorder::{drop_target, DropPosition};
use crate::storage::FileStore;
use crate::store::TaskStore;
use crate::task::{Priority, PriorityFilter, Task};

/// Global options shared by every command
pub struct Env {
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

impl Env {
    fn output(&self) -> OutputOptions {
        OutputOptions {
            json: self.json,
            quiet: self.quiet,
        }
    }
}

pub struct AddOptions {
    pub title: String,
    pub description: String,
    pub priority: Option<String>,
}

pub struct EditOptions {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
}

pub struct DeleteOptions {
    pub id: String,
}

pub struct ListOptions {
    pub view: ViewArgs,
}

pub struct ShowOptions {
    pub id: String,
}

pub struct MoveOptions {
    pub from: usize,
    pub to: usize,
    pub view: ViewArgs,
}

pub struct DropOptions {
    pub dragged: usize,
    pub target: usize,
    pub before: bool,
    pub view: ViewArgs,
}

#[derive(Serialize)]
struct TaskDeleteOutput {
    id: String,
}

#[derive(Serialize)]
struct TaskListOutput {
    total: usize,
    priority: PriorityFilter,
    search: String,
    tasks: Vec<Task>,
}

#[derive(Serialize)]
struct TaskMoveOutput {
    moved: bool,
    from: usize,
    to: usize,
    tasks: Vec<Task>,
}

struct TaskContext {
    store: TaskStore<FileStore>,
    config: Config,
}

pub fn run_add(env: Env, options: AddOptions) -> Result<()> {
    let mut ctx = load_context(&env)?;
    let title = require_title(&options.title)?;
    let priority = match options.priority.as_deref() {
        Some(value) => value.parse::<Priority>()?,
        None => ctx.config.defaults.priority,
    };

    let task = ctx
        .store
        .create(title, options.description.trim(), priority);

    let mut human = HumanOutput::new("Task created");
    push_task_summary(&mut human, &task);
    push_storage_warnings(&mut human, &ctx.store);

    emit_success(env.output(), "add", &task, Some(&human))
}

pub fn run_edit(env: Env, options: EditOptions) -> Result<()> {
    let mut ctx = load_context(&env)?;
    let id = ctx.store.resolve_id(&options.id)?;
    let mut task = ctx
        .store
        .get(&id)
        .cloned()
        .ok_or_else(|| Error::TaskNotFound(id.clone()))?;

    if options.title.is_none() && options.description.is_none() && options.priority.is_none() {
        return Err(Error::InvalidArgument(
            "nothing to edit; pass --title, --description or --priority".to_string(),
        ));
    }
    if let Some(title) = options.title.as_deref() {
        task.title = require_title(title)?.to_string();
    }
    if let Some(description) = options.description.as_deref() {
        task.description = description.trim().to_string();
    }
    if let Some(priority) = options.priority.as_deref() {
        task.priority = priority.parse()?;
    }

    ctx.store.edit(task.clone());

    let mut human = HumanOutput::new("Task updated");
    push_task_summary(&mut human, &task);
    push_storage_warnings(&mut human, &ctx.store);

    emit_success(env.output(), "edit", &task, Some(&human))
}

pub fn run_delete(env: Env, options: DeleteOptions) -> Result<()> {
    let mut ctx = load_context(&env)?;
    let id = ctx.store.resolve_id(&options.id)?;
    ctx.store.delete(&id);

    let mut human = HumanOutput::new("Task deleted");
    human.push_summary("ID", id.clone());
    push_storage_warnings(&mut human, &ctx.store);

    emit_success(env.output(), "delete", &TaskDeleteOutput { id }, Some(&human))
}

pub fn run_list(env: Env, options: ListOptions) -> Result<()> {
    let mut ctx = load_context(&env)?;
    apply_view(&mut ctx.store, &options.view)?;
    let tasks = ctx.store.visible();

    let mut human = HumanOutput::new("Tasks");
    human.push_summary("Total", tasks.len().to_string());
    if ctx.store.priority_filter() != PriorityFilter::All {
        human.push_summary("Priority", ctx.store.priority_filter().to_string());
    }
    if !ctx.store.search_query().is_empty() {
        human.push_summary("Search", ctx.store.search_query());
    }
    if tasks.is_empty() {
        human.push_detail("No tasks found. Create a new task with `tt add`.");
    }
    for (position, task) in tasks.iter().enumerate() {
        human.push_detail(format_task_line(position, task));
    }
    push_storage_warnings(&mut human, &ctx.store);

    let output = TaskListOutput {
        total: tasks.len(),
        priority: ctx.store.priority_filter(),
        search: ctx.store.search_query().to_string(),
        tasks,
    };

    emit_success(env.output(), "list", &output, Some(&human))
}

pub fn run_show(env: Env, options: ShowOptions) -> Result<()> {
    let ctx = load_context(&env)?;
    let id = ctx.store.resolve_id(&options.id)?;
    let task = ctx
        .store
        .get(&id)
        .cloned()
        .ok_or_else(|| Error::TaskNotFound(id.clone()))?;

    let mut human = HumanOutput::new(task.title.clone());
    push_task_summary(&mut human, &task);
    if !task.description.is_empty() {
        human.push_detail(task.description.clone());
    }
    push_storage_warnings(&mut human, &ctx.store);

    emit_success(env.output(), "show", &task, Some(&human))
}

pub fn run_move(env: Env, options: MoveOptions) -> Result<()> {
    let mut ctx = load_context(&env)?;
    apply_view(&mut ctx.store, &options.view)?;
    ensure_displayed(&ctx.store, options.from)?;
    ensure_displayed(&ctx.store, options.to)?;

    let moved = options.from != options.to
        && ctx.store.reorder_displayed(options.from, options.to)?;
    emit_move(&env, "move", &ctx.store, moved, options.from, options.to)
}

pub fn run_drop(env: Env, options: DropOptions) -> Result<()> {
    let mut ctx = load_context(&env)?;
    apply_view(&mut ctx.store, &options.view)?;
    ensure_displayed(&ctx.store, options.dragged)?;
    ensure_displayed(&ctx.store, options.target)?;

    let position = if options.before {
        DropPosition::Before
    } else {
        DropPosition::After
    };
    let (to, moved) = match drop_target(options.dragged, options.target, position) {
        Some(to) => (to, ctx.store.reorder_displayed(options.dragged, to)?),
        None => (options.dragged, false),
    };
    emit_move(&env, "drop", &ctx.store, moved, options.dragged, to)
}

fn emit_move(
    env: &Env,
    command: &str,
    store: &TaskStore<FileStore>,
    moved: bool,
    from: usize,
    to: usize,
) -> Result<()> {
    let tasks = store.visible();

    let mut human = HumanOutput::new(if moved { "Task moved" } else { "Nothing to move" });
    human.push_summary("From", from.to_string());
    human.push_summary("To", to.to_string());
    for (position, task) in tasks.iter().enumerate() {
        human.push_detail(format_task_line(position, task));
    }
    push_storage_warnings(&mut human, store);

    let output = TaskMoveOutput {
        moved,
        from,
        to,
        tasks,
    };
    emit_success(env.output(), command, &output, Some(&human))
}

fn load_context(env: &Env) -> Result<TaskContext> {
    let config = match env.config.as_deref() {
        Some(path) => Config::load(path)?,
        None => match config::default_config_path() {
            Ok(path) => Config::load_or_default(&path)?,
            Err(_) => Config::default(),
        },
    };
    let data_dir = config.data_dir(env.data_dir.as_deref())?;
    let store = TaskStore::open(FileStore::new(data_dir), config.storage.key.clone());
    Ok(TaskContext { store, config })
}

fn apply_view(store: &mut TaskStore<FileStore>, view: &ViewArgs) -> Result<()> {
    store.set_priority_filter(view.priority.parse()?);
    store.set_search_query(view.search.clone());
    Ok(())
}

fn ensure_displayed(store: &TaskStore<FileStore>, index: usize) -> Result<()> {
    let len = store.visible().len();
    if index >= len {
        return Err(Error::InvalidIndex { index, len });
    }
    Ok(())
}

fn require_title(title: &str) -> Result<&str> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument("title cannot be empty".to_string()));
    }
    Ok(trimmed)
}

fn push_storage_warnings(human: &mut HumanOutput, store: &TaskStore<FileStore>) {
    for warning in store.storage_warnings() {
        human.push_warning(warning.clone());
    }
}

fn push_task_summary(human: &mut HumanOutput, task: &Task) {
    human.push_summary("ID", short_id(&task.id).to_string());
    human.push_summary("Title", task.title.clone());
    human.push_summary("Priority", task.priority.to_string());
    human.push_summary("Created", task.created_at.to_rfc3339());
}
