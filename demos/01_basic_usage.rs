//! Demo 01: Basic Usage
//!
//! This demo adds a few tasks, toggles flags, filters the view and prints the
//! running counts using the TaskStore API directly.
//!
//! Run with: cargo run --example 01_basic_usage

use eyre::Result;
use tasklist::{FilterMode, Priority, TaskStore, ValidationError};

fn main() -> Result<()> {
    println!("Tasklist Basic Usage Demo");
    println!("=========================\n");

    let mut store = TaskStore::new();

    // ADD: three tasks with different priorities
    println!("1. ADD - Adding tasks...");
    let milk = store.add_task("Buy milk", Some("2025-12-31"), Some(Priority::High))?;
    let report = store.add_task("Write report", None, None)?;
    let plants = store.add_from_form("Water plants", "", "low")?;
    for task in store.list_tasks() {
        println!("   - {} (priority: {}, due: {})", task.text, task.priority, task.due_date.as_deref().unwrap_or("unset"));
    }
    println!();

    // VALIDATION: blank text is rejected without touching the list
    println!("2. VALIDATE - Adding a blank task...");
    match store.add_task("   ", None, None) {
        Err(ValidationError::EmptyText) => println!("   Rejected: {}", ValidationError::EmptyText),
        other => println!("   Unexpected result: {:?}", other),
    }
    println!("   Total is still {}\n", store.counts().total);

    // TOGGLE: complete one task, star another
    println!("3. TOGGLE - Completing '{}' and starring '{}'...", milk.text, report.text);
    store.toggle_completed(milk.id);
    store.toggle_important(report.id);
    println!();

    // FILTER: show each view
    println!("4. FILTER - Views by completion status...");
    for mode in FilterMode::ALL_MODES {
        store.set_filter(mode);
        let names: Vec<&str> = store.list_tasks().into_iter().map(|t| t.text.as_str()).collect();
        println!("   {:<9} {:?}", mode, names);
    }
    store.set_filter(FilterMode::All);
    println!();

    // DELETE: remove a task, then again (no-op)
    println!("5. DELETE - Removing '{}' twice...", plants.text);
    println!("   First delete removed: {}", store.delete_task(plants.id));
    println!("   Second delete removed: {}\n", store.delete_task(plants.id));

    let counts = store.counts();
    println!(
        "Counts: all {}, active {}, completed {}",
        counts.total, counts.active, counts.completed
    );

    println!("\nDemo complete!");
    Ok(())
}
