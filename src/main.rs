use std::path::PathBuf;

use chrono::{Datelike, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use dayboard::config::DayboardConfig;
use dayboard::core::mood::{Drawing, Mood};
use dayboard::core::month::MonthView;
use dayboard::core::task::{Priority, PriorityFilter, StatusFilter};
use dayboard::storage::Storage;
use dayboard::store::calendar::EventPatch;
use dayboard::store::todo::TaskPatch;
use dayboard::store::{CalendarStore, MoodStore, StoreError, TodoStore};
use dayboard::widget::{DataSource, QuoteWidget, WeatherWidget};

#[derive(Parser)]
#[command(name = "dayboard", version, about = "A personal dashboard of tasks, moods, and calendar events")]
struct Cli {
    /// Override the data directory.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show the dashboard: quote, weather, and previews of every list.
    Dashboard,
    /// Manage the task list.
    Todo {
        #[command(subcommand)]
        command: TodoCommand,
    },
    /// Manage the mood journal.
    Mood {
        #[command(subcommand)]
        command: MoodCommand,
    },
    /// Manage calendar events.
    Calendar {
        #[command(subcommand)]
        command: CalendarCommand,
    },
    /// Show the daily quote.
    Quote {
        /// Fetch a new quote instead of the cached one.
        #[arg(long)]
        refresh: bool,
    },
    /// Show the current weather.
    Weather {
        /// Fetch a new reading instead of the cached one.
        #[arg(long)]
        refresh: bool,
    },
}

#[derive(Subcommand)]
enum TodoCommand {
    /// Add a task.
    Add {
        title: String,
        #[arg(short, long, default_value = "medium", value_parser = parse_priority)]
        priority: Priority,
    },
    /// List tasks, optionally filtered.
    List {
        #[arg(long, default_value = "all", value_parser = parse_status_filter)]
        status: StatusFilter,
        #[arg(long, default_value = "all", value_parser = parse_priority_filter)]
        priority: PriorityFilter,
    },
    /// Flip a task between pending and completed.
    Toggle { id: Uuid },
    /// Edit a task's title and/or priority.
    Edit {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, value_parser = parse_priority)]
        priority: Option<Priority>,
    },
    /// Delete a task.
    Remove { id: Uuid },
    /// Delete all completed tasks.
    ClearCompleted,
}

#[derive(Subcommand)]
enum MoodCommand {
    /// Record a mood, optionally with a drawing snapshot from a PNG file.
    Save {
        #[arg(value_parser = parse_mood)]
        mood: Mood,
        #[arg(long)]
        drawing: Option<PathBuf>,
    },
    /// List journal entries, newest first.
    List,
    /// Delete an entry.
    Remove { id: Uuid },
    /// Export an entry's drawing as a PNG file.
    Export {
        id: Uuid,
        /// Directory to write into; defaults to the current directory.
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

#[derive(Subcommand)]
enum CalendarCommand {
    /// Add an event on a date.
    Add {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
        title: String,
        #[arg(long, value_parser = parse_time)]
        time: Option<NaiveTime>,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Show a month grid with event markers.
    Month {
        /// Month to show as YYYY-MM; defaults to the current month.
        #[arg(long, value_parser = parse_month)]
        month: Option<NaiveDate>,
    },
    /// List the events on one day.
    Day {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },
    /// List upcoming events from today.
    Upcoming {
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// Edit an event.
    Edit {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(long, value_parser = parse_time)]
        time: Option<NaiveTime>,
    },
    /// Delete an event.
    Remove { id: Uuid },
}

fn parse_priority(s: &str) -> Result<Priority, StoreError> {
    Priority::from_name(s).ok_or_else(|| StoreError::UnknownPriority(s.to_string()))
}

fn parse_priority_filter(s: &str) -> Result<PriorityFilter, StoreError> {
    if s.eq_ignore_ascii_case("all") {
        return Ok(PriorityFilter::All);
    }
    parse_priority(s).map(PriorityFilter::Only)
}

fn parse_status_filter(s: &str) -> Result<StatusFilter, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "all" => Ok(StatusFilter::All),
        "completed" => Ok(StatusFilter::Completed),
        "pending" => Ok(StatusFilter::Pending),
        other => Err(format!(
            "unknown status '{other}' (all, completed, pending)"
        )),
    }
}

fn parse_mood(s: &str) -> Result<Mood, StoreError> {
    Mood::from_name(s).ok_or_else(|| StoreError::UnknownMood(s.to_string()))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{s}' (expected YYYY-MM-DD)"))
}

fn parse_time(s: &str) -> Result<NaiveTime, String> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| format!("invalid time '{s}' (expected HH:MM)"))
}

fn parse_month(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .map_err(|_| format!("invalid month '{s}' (expected YYYY-MM)"))
}

/// Informational notice for values that did not come from a live provider.
fn source_note(source: DataSource) -> &'static str {
    match source {
        DataSource::Provider(_) => "",
        DataSource::Cache => " (cached)",
        DataSource::Fallback => " (offline)",
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let spec = if cli.verbose { "debug" } else { "warn" };
    flexi_logger::Logger::try_with_env_or_str(spec)?.start()?;

    let mut config = DayboardConfig::load();
    if let Some(data_dir) = cli.data_dir.clone() {
        config.data_dir = data_dir;
    }
    config.ensure_dirs()?;
    let storage = Storage::new(&config.data_dir);

    match cli.command.unwrap_or(Command::Dashboard) {
        Command::Dashboard => dashboard(storage, &config).await,
        Command::Todo { command } => todo(storage, command)?,
        Command::Mood { command } => mood(storage, command)?,
        Command::Calendar { command } => calendar(storage, command)?,
        Command::Quote { refresh } => {
            let mut widget = QuoteWidget::new(storage);
            let today = chrono::Local::now().date_naive();
            let fetched = if refresh {
                widget.refresh(today).await
            } else {
                widget.current(today).await
            };
            println!("\"{}\"", fetched.value.content);
            println!("  — {}{}", fetched.value.author, source_note(fetched.source));
        }
        Command::Weather { refresh } => {
            let widget = WeatherWidget::new(storage, &config);
            let now = Utc::now();
            let fetched = if refresh {
                widget.refresh(now).await
            } else {
                widget.current(now).await
            };
            let w = &fetched.value;
            println!(
                "{} {}°C {}, {}% humidity — {}{}",
                w.icon(),
                w.temperature,
                w.condition,
                w.humidity,
                w.location,
                source_note(fetched.source)
            );
        }
    }

    Ok(())
}

async fn dashboard(storage: Storage, config: &DayboardConfig) {
    let today = chrono::Local::now().date_naive();

    let mut quote_widget = QuoteWidget::new(storage.clone());
    let quote = quote_widget.current(today).await;
    println!("\"{}\" — {}{}", quote.value.content, quote.value.author, source_note(quote.source));

    let weather_widget = WeatherWidget::new(storage.clone(), config);
    let weather = weather_widget.current(Utc::now()).await;
    let w = &weather.value;
    println!(
        "{} {}°C {}, {}% humidity — {}{}",
        w.icon(),
        w.temperature,
        w.condition,
        w.humidity,
        w.location,
        source_note(weather.source)
    );

    let todos = TodoStore::load(storage.clone());
    println!();
    println!(
        "Tasks ({} of {} completed):",
        todos.completed_count(),
        todos.total_count()
    );
    for task in todos.recent(3) {
        let mark = if task.completed { "x" } else { " " };
        println!("  [{}] {} ({})", mark, task.title, task.priority.as_str());
    }

    let moods = MoodStore::load(storage.clone());
    println!();
    println!("Recent moods:");
    for entry in moods.recent(3) {
        println!(
            "  {} {} — {}",
            entry.mood.emoji(),
            entry.mood.as_str(),
            entry.timestamp.format("%Y-%m-%d")
        );
    }

    let events = CalendarStore::load(storage);
    println!();
    println!("Upcoming events:");
    for event in events.upcoming(today, 5) {
        println!("  {} {} — {}", event.date, event.time_label(), event.title);
    }
}

fn todo(storage: Storage, command: TodoCommand) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = TodoStore::load(storage);
    match command {
        TodoCommand::Add { title, priority } => {
            let task = store.add(&title, priority)?;
            println!("Added task '{}' ({})", task.title, task.id);
        }
        TodoCommand::List { status, priority } => {
            for task in store.view(status, priority) {
                let mark = if task.completed { "x" } else { " " };
                println!(
                    "[{}] {}  {} ({})  {}",
                    mark,
                    task.id,
                    task.title,
                    task.priority.as_str(),
                    task.created.format("%Y-%m-%d")
                );
            }
            println!(
                "{} of {} completed",
                store.completed_count(),
                store.total_count()
            );
        }
        TodoCommand::Toggle { id } => {
            if store.toggle(id) {
                println!("Toggled task {}", id);
            } else {
                println!("No task with id {}", id);
            }
        }
        TodoCommand::Edit { id, title, priority } => {
            if store.update(id, TaskPatch { title, priority })? {
                println!("Updated task {}", id);
            } else {
                println!("No task with id {}", id);
            }
        }
        TodoCommand::Remove { id } => {
            if store.remove(id) {
                println!("Removed task {}", id);
            } else {
                println!("No task with id {}", id);
            }
        }
        TodoCommand::ClearCompleted => {
            let removed = store.clear_completed();
            println!("{} completed tasks removed", removed);
        }
    }
    Ok(())
}

fn mood(storage: Storage, command: MoodCommand) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = MoodStore::load(storage);
    match command {
        MoodCommand::Save { mood, drawing } => {
            let drawing = match drawing {
                Some(path) => Drawing::from_png_bytes(&std::fs::read(path)?),
                None => Drawing::from_png_bytes(&[]),
            };
            let entry = store.save_entry(mood, drawing);
            println!(
                "Recorded {} {} mood ({})",
                entry.mood.emoji(),
                entry.mood.as_str(),
                entry.id
            );
        }
        MoodCommand::List => {
            for entry in store.entries() {
                println!(
                    "{}  {} {} — {}",
                    entry.id,
                    entry.mood.emoji(),
                    entry.mood.as_str(),
                    entry.timestamp.format("%Y-%m-%d %H:%M")
                );
            }
        }
        MoodCommand::Remove { id } => {
            if store.remove(id) {
                println!("Removed entry {}", id);
            } else {
                println!("No entry with id {}", id);
            }
        }
        MoodCommand::Export { id, dir } => match store.find(id) {
            Some(entry) => {
                let entry = entry.clone();
                let path = store.export_drawing(&entry, &dir)?;
                println!("Wrote {}", path.display());
            }
            None => println!("No entry with id {}", id),
        },
    }
    Ok(())
}

fn calendar(storage: Storage, command: CalendarCommand) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = CalendarStore::load(storage);
    match command {
        CalendarCommand::Add {
            date,
            title,
            time,
            description,
        } => {
            let event = store.add(date, &title, time, &description)?;
            println!("Added event '{}' on {} ({})", event.title, event.date, event.id);
        }
        CalendarCommand::Month { month } => {
            let view = match month {
                Some(first) => MonthView::containing(first),
                None => MonthView::default(),
            };
            print_month(&view, &store);
        }
        CalendarCommand::Day { date } => {
            let events = store.events_on(date);
            if events.is_empty() {
                println!("No events on {}", date);
            }
            for event in events {
                println!("{}  {}  {}", event.id, event.time_label(), event.title);
                if !event.description.is_empty() {
                    println!("    {}", event.description);
                }
            }
        }
        CalendarCommand::Upcoming { limit } => {
            let today = chrono::Local::now().date_naive();
            let upcoming = store.upcoming(today, limit);
            if upcoming.is_empty() {
                println!("No upcoming events");
            }
            for event in upcoming {
                println!(
                    "{}  {} {}  {}",
                    event.id,
                    event.date,
                    event.time_label(),
                    event.title
                );
            }
        }
        CalendarCommand::Edit {
            id,
            title,
            description,
            date,
            time,
        } => {
            let patch = EventPatch {
                title,
                description,
                date,
                time: time.map(Some),
            };
            if store.update(id, patch)? {
                println!("Updated event {}", id);
            } else {
                println!("No event with id {}", id);
            }
        }
        CalendarCommand::Remove { id } => {
            if store.remove(id) {
                println!("Removed event {}", id);
            } else {
                println!("No event with id {}", id);
            }
        }
    }
    Ok(())
}

fn print_month(view: &MonthView, store: &CalendarStore) {
    println!("{:^27}", view.label());
    println!(" Su  Mo  Tu  We  Th  Fr  Sa");
    let mut column = view.leading_blanks();
    let mut line = "    ".repeat(column as usize);
    for date in view.dates() {
        let marker = if store.events_on(date).is_empty() {
            ' '
        } else {
            '*'
        };
        line.push_str(&format!("{:>3}{}", date.day(), marker));
        column += 1;
        if column == 7 {
            println!("{}", line.trim_end());
            line.clear();
            column = 0;
        }
    }
    if !line.trim().is_empty() {
        println!("{}", line.trim_end());
    }
}
