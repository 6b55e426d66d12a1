// Line-oriented presentation layer over a TaskStore
//
// Parses one command per line, translates row numbers from the last rendered
// view into task ids, and renders the list, counts and filter bar.

use crate::config::Config;
use crate::error::ValidationError;
use crate::filter::FilterMode;
use crate::models::{Priority, Task, TaskId};
use crate::store::TaskStore;
use colored::{ColoredString, Colorize};
use std::fmt::Write;
use thiserror::Error;
use tracing::debug;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const USAGE: &str = "\
Commands:
  add <text> [-d|--due <date>] [-p|--priority <high|medium|low>]
                  words after `--` are always text: add -p low -- learn -p
  done <n>        toggle completion of row n
  star <n>        toggle the important flag of row n
  delete <n>      remove row n
  filter <all|active|completed>
  list            show the current view
  counts          show totals
  help            show this message
  quit            end the session";

/// A command the shell could not carry out
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    #[error("Unknown command: {0} (try `help`)")]
    UnknownCommand(String),

    #[error("`{command}` needs {arg}")]
    MissingArgument { command: &'static str, arg: &'static str },

    #[error("Not a row number: {0}")]
    BadRow(String),

    #[error("No such row: {0}")]
    NoSuchRow(usize),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// One parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { text: String, due: String, priority: String },
    ToggleCompleted(usize),
    ToggleImportant(usize),
    Delete(usize),
    Filter(FilterMode),
    List,
    Counts,
    Help,
    Quit,
}

impl Command {
    /// Parse a line; blank lines and `#` comments yield `None`
    pub fn parse(line: &str) -> Result<Option<Self>, ShellError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };
        let rest: Vec<&str> = words.collect();

        let command = match head.to_lowercase().as_str() {
            "add" => Self::parse_add(&rest)?,
            "done" | "toggle" => Command::ToggleCompleted(Self::parse_row("done", &rest)?),
            "star" | "important" => Command::ToggleImportant(Self::parse_row("star", &rest)?),
            "delete" | "rm" => Command::Delete(Self::parse_row("delete", &rest)?),
            "filter" => {
                let mode = rest.first().ok_or(ShellError::MissingArgument {
                    command: "filter",
                    arg: "a mode",
                })?;
                Command::Filter(mode.parse()?)
            }
            "list" | "ls" => Command::List,
            "counts" => Command::Counts,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(ShellError::UnknownCommand(other.to_string())),
        };

        Ok(Some(command))
    }

    fn parse_add(args: &[&str]) -> Result<Self, ShellError> {
        let mut text = Vec::new();
        let mut due = String::new();
        let mut priority = String::new();

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match *arg {
                "--" => {
                    text.extend(iter.by_ref().copied());
                    break;
                }
                "--due" | "-d" => {
                    due = iter
                        .next()
                        .ok_or(ShellError::MissingArgument {
                            command: "add",
                            arg: "a date after --due",
                        })?
                        .to_string();
                }
                "--priority" | "-p" => {
                    priority = iter
                        .next()
                        .ok_or(ShellError::MissingArgument {
                            command: "add",
                            arg: "a priority after --priority",
                        })?
                        .to_string();
                }
                word => text.push(word),
            }
        }

        Ok(Command::Add {
            text: text.join(" "),
            due,
            priority,
        })
    }

    fn parse_row(command: &'static str, args: &[&str]) -> Result<usize, ShellError> {
        let raw = args.first().ok_or(ShellError::MissingArgument {
            command,
            arg: "a row number",
        })?;
        raw.parse().map_err(|_| ShellError::BadRow(raw.to_string()))
    }
}

/// What the caller should do after a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print this and keep reading
    Continue(String),
    Quit,
}

/// One interactive session: the store plus the last rendered view
pub struct Session {
    store: TaskStore,
    default_priority: Priority,
    color: bool,
    json: bool,
    view: Vec<TaskId>,
}

impl Session {
    pub fn new(config: &Config, json: bool) -> Self {
        Self {
            store: TaskStore::with_filter(config.default_filter),
            default_priority: config.default_priority,
            color: config.color,
            json,
            view: Vec::new(),
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Parse and execute a line; failures come back as alert text
    pub fn run_line(&mut self, line: &str) -> Outcome {
        let result = Command::parse(line).and_then(|cmd| match cmd {
            Some(cmd) => self.execute(cmd),
            None => Ok(Outcome::Continue(String::new())),
        });

        match result {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!(error = %e, line, "Command rejected");
                Outcome::Continue(self.alert(&e.to_string()))
            }
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<Outcome, ShellError> {
        match command {
            Command::Add { text, due, priority } => {
                // Blank text reports EmptyText even when the priority is also bad
                if text.trim().is_empty() {
                    return Err(ValidationError::EmptyText.into());
                }
                let priority = match priority.trim() {
                    "" => self.default_priority,
                    raw => raw.parse()?,
                };
                self.store.add_task(&text, Some(&due), Some(priority))?;
            }
            Command::ToggleCompleted(row) => {
                let id = self.resolve(row)?;
                self.store.toggle_completed(id);
            }
            Command::ToggleImportant(row) => {
                let id = self.resolve(row)?;
                self.store.toggle_important(id);
            }
            Command::Delete(row) => {
                let id = self.resolve(row)?;
                self.store.delete_task(id);
            }
            Command::Filter(mode) => self.store.set_filter(mode),
            Command::List => {}
            Command::Counts => return Ok(Outcome::Continue(self.render_counts())),
            Command::Help => return Ok(Outcome::Continue(USAGE.to_string())),
            Command::Quit => return Ok(Outcome::Quit),
        }

        Ok(Outcome::Continue(self.render()))
    }

    /// Render the current view and remember its row order
    pub fn render(&mut self) -> String {
        let tasks = self.store.list_tasks();
        self.view = tasks.iter().map(|t| t.id).collect();

        if self.json {
            let value = serde_json::json!({
                "filter": self.store.filter(),
                "counts": self.store.counts(),
                "tasks": tasks,
            });
            return format!("{:#}", value);
        }

        let mut out = String::new();
        let _ = writeln!(out, "{}", self.paint(&format!("Task List v{}", VERSION), |s| s.bold()));
        let _ = writeln!(out, "{}", self.render_counts());
        let _ = writeln!(out, "{}", self.render_filter_bar());

        if tasks.is_empty() {
            let _ = write!(out, "{}", self.paint("No tasks", |s| s.dimmed()));
        } else {
            let rows: Vec<String> = tasks
                .iter()
                .enumerate()
                .map(|(i, task)| self.render_row(i + 1, task))
                .collect();
            out.push_str(&rows.join("\n"));
        }

        out
    }

    fn render_counts(&self) -> String {
        let counts = self.store.counts();
        if self.json {
            return serde_json::json!(counts).to_string();
        }
        format!(
            "All: {}  Active: {}  Completed: {}",
            counts.total, counts.active, counts.completed
        )
    }

    fn render_filter_bar(&self) -> String {
        let current = self.store.filter();
        FilterMode::ALL_MODES
            .iter()
            .map(|mode| {
                if *mode == current {
                    self.paint(&format!("[{}]", mode), |s| s.cyan().bold())
                } else {
                    mode.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn render_row(&self, row: usize, task: &Task) -> String {
        let check = if task.completed { "[x]" } else { "[ ]" };
        let text = if task.completed {
            self.paint(&task.text, |s| s.strikethrough().dimmed())
        } else {
            task.text.clone()
        };
        let star = if task.important {
            format!(" {}", self.paint("★", |s| s.red().bold()))
        } else {
            String::new()
        };
        let due = task.due_date.as_deref().unwrap_or("unset");
        let priority = match task.priority {
            Priority::High => self.paint("High", |s| s.red()),
            Priority::Medium => self.paint("Medium", |s| s.cyan()),
            Priority::Low => "Low".to_string(),
        };

        format!(
            "{}. {} {}{} (due: {}, priority: {})",
            row, check, text, star, due, priority
        )
    }

    fn alert(&self, message: &str) -> String {
        if self.json {
            return serde_json::json!({ "error": message }).to_string();
        }
        self.paint(&format!("! {}", message), |s| s.yellow().bold())
    }

    fn paint(&self, s: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.color { style(s).to_string() } else { s.to_string() }
    }

    fn resolve(&self, row: usize) -> Result<TaskId, ShellError> {
        row.checked_sub(1)
            .and_then(|i| self.view.get(i))
            .copied()
            .ok_or(ShellError::NoSuchRow(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        let config = Config {
            color: false,
            ..Config::default()
        };
        Session::new(&config, false)
    }

    fn output(outcome: Outcome) -> String {
        match outcome {
            Outcome::Continue(s) => s,
            Outcome::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn test_parse_add() {
        let cmd = Command::parse("add Buy milk --due 2025-12-31 --priority high").unwrap();
        assert_eq!(
            cmd,
            Some(Command::Add {
                text: "Buy milk".to_string(),
                due: "2025-12-31".to_string(),
                priority: "high".to_string(),
            })
        );

        let cmd = Command::parse("add -p low call mom").unwrap();
        assert_eq!(
            cmd,
            Some(Command::Add {
                text: "call mom".to_string(),
                due: String::new(),
                priority: "low".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_add_separator_keeps_flag_words_as_text() {
        let cmd = Command::parse("add -p low -- learn the -p flag").unwrap();
        assert_eq!(
            cmd,
            Some(Command::Add {
                text: "learn the -p flag".to_string(),
                due: String::new(),
                priority: "low".to_string(),
            })
        );

        let cmd = Command::parse("add -- use -d option").unwrap();
        assert_eq!(
            cmd,
            Some(Command::Add {
                text: "use -d option".to_string(),
                due: String::new(),
                priority: String::new(),
            })
        );
    }

    #[test]
    fn test_parse_add_missing_flag_value() {
        assert!(matches!(
            Command::parse("add x --due"),
            Err(ShellError::MissingArgument { command: "add", .. })
        ));
    }

    #[test]
    fn test_parse_rows_and_aliases() {
        assert_eq!(Command::parse("done 2").unwrap(), Some(Command::ToggleCompleted(2)));
        assert_eq!(Command::parse("toggle 1").unwrap(), Some(Command::ToggleCompleted(1)));
        assert_eq!(Command::parse("star 3").unwrap(), Some(Command::ToggleImportant(3)));
        assert_eq!(Command::parse("rm 1").unwrap(), Some(Command::Delete(1)));
        assert_eq!(Command::parse("LS").unwrap(), Some(Command::List));
        assert_eq!(Command::parse("exit").unwrap(), Some(Command::Quit));
        assert_eq!(
            Command::parse("filter active").unwrap(),
            Some(Command::Filter(FilterMode::Active))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Command::parse("done x"),
            Err(ShellError::BadRow("x".to_string()))
        );
        assert!(matches!(
            Command::parse("delete"),
            Err(ShellError::MissingArgument { command: "delete", .. })
        ));
        assert_eq!(
            Command::parse("frobnicate"),
            Err(ShellError::UnknownCommand("frobnicate".to_string()))
        );
        assert!(matches!(
            Command::parse("filter done"),
            Err(ShellError::Validation(ValidationError::UnknownFilter(_)))
        ));
    }

    #[test]
    fn test_parse_blank_and_comment() {
        assert_eq!(Command::parse("").unwrap(), None);
        assert_eq!(Command::parse("   ").unwrap(), None);
        assert_eq!(Command::parse("# note").unwrap(), None);
    }

    #[test]
    fn test_empty_view_render() {
        let mut session = session();
        let out = session.render();
        assert_eq!(
            out,
            format!(
                "Task List v{}\nAll: 0  Active: 0  Completed: 0\n[All] Active Completed\nNo tasks",
                VERSION
            )
        );
    }

    #[test]
    fn test_add_renders_row() {
        let mut session = session();
        let out = output(session.run_line("add Buy milk --due 2025-12-31 --priority 高"));

        assert!(out.contains("1. [ ] Buy milk (due: 2025-12-31, priority: High)"));
        assert!(out.contains("All: 1  Active: 1  Completed: 0"));
    }

    #[test]
    fn test_add_empty_alerts() {
        let mut session = session();
        let out = output(session.run_line("add"));
        assert_eq!(out, "! Please enter a task.");

        let out = output(session.run_line("add    --due 2025-01-01"));
        assert_eq!(out, "! Please enter a task.");
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_add_uses_configured_default_priority() {
        let config = Config {
            color: false,
            default_priority: Priority::Low,
            ..Config::default()
        };
        let mut session = Session::new(&config, false);
        let out = output(session.run_line("add chores"));

        assert!(out.contains("(due: unset, priority: Low)"));
    }

    #[test]
    fn test_add_priority_checks() {
        let mut session = session();

        assert_eq!(
            output(session.run_line("add --priority urgent")),
            "! Please enter a task."
        );
        assert_eq!(
            output(session.run_line("add chores --priority urgent")),
            "! Unknown priority: \"urgent\" (expected high, medium or low)"
        );
        assert!(session.store().is_empty());

        let out = output(session.run_line("add chores -p h"));
        assert!(out.contains("(due: unset, priority: High)"));
    }

    #[test]
    fn test_toggle_and_star_rows() {
        let mut session = session();
        session.run_line("add A");
        session.run_line("add B");

        let out = output(session.run_line("done 1"));
        assert!(out.contains("1. [x] A"));
        assert!(out.contains("All: 2  Active: 1  Completed: 1"));

        let out = output(session.run_line("star 2"));
        assert!(out.contains("2. [ ] B ★"));

        let out = output(session.run_line("star 2"));
        assert!(!out.contains('★'));
    }

    #[test]
    fn test_filter_view_and_rows() {
        let mut session = session();
        session.run_line("add open task");
        session.run_line("add finished task");
        session.run_line("done 2");

        let out = output(session.run_line("filter active"));
        assert!(out.contains("All [Active] Completed"));
        assert!(out.contains("1. [ ] open task"));
        assert!(!out.contains("finished task"));

        let out = output(session.run_line("filter completed"));
        assert!(out.contains("1. [x] finished task"));
        assert!(!out.contains("open task"));

        // Row 1 now addresses the completed task
        session.run_line("delete 1");
        let out = output(session.run_line("filter all"));
        assert!(out.contains("1. [ ] open task"));
        assert!(!out.contains("finished task"));
    }

    #[test]
    fn test_out_of_range_row() {
        let mut session = session();
        session.run_line("add A");

        assert_eq!(output(session.run_line("done 0")), "! No such row: 0");
        assert_eq!(output(session.run_line("done 5")), "! No such row: 5");
        assert_eq!(session.store().counts().completed, 0);
    }

    #[test]
    fn test_delete_then_empty() {
        let mut session = session();
        session.run_line("add Y");
        let out = output(session.run_line("delete 1"));

        assert!(out.ends_with("No tasks"));
        assert!(out.contains("All: 0  Active: 0  Completed: 0"));
    }

    #[test]
    fn test_counts_and_help() {
        let mut session = session();
        session.run_line("add A");

        assert_eq!(output(session.run_line("counts")), "All: 1  Active: 1  Completed: 0");
        assert!(output(session.run_line("help")).starts_with("Commands:"));
        assert_eq!(session.run_line("quit"), Outcome::Quit);
    }

    #[test]
    fn test_json_render() {
        let mut session = Session::new(&Config::default(), true);
        let out = output(session.run_line("add Buy milk --due 2025-12-31 --priority high"));

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["filter"], "all");
        assert_eq!(value["counts"]["total"], 1);
        assert_eq!(value["tasks"][0]["text"], "Buy milk");
        assert_eq!(value["tasks"][0]["dueDate"], "2025-12-31");
        assert_eq!(value["tasks"][0]["priority"], "high");

        let out = output(session.run_line("add"));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["error"], "Please enter a task.");
    }

    #[test]
    fn test_session_starts_on_configured_filter() {
        let config = Config {
            color: false,
            default_filter: FilterMode::Active,
            ..Config::default()
        };
        let mut session = Session::new(&config, false);
        assert!(session.render().contains("All [Active] Completed"));
    }
}
