use chrono::{DateTime, Utc};
use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use shoebox::api::{self, CmdMessage, ConfigAction, FsApi, MessageLevel, PhotoFilter, ShoeboxPaths};
use shoebox::commands::helpers::fmt_size;
use shoebox::config::{ShoeboxConfig, CONFIG_KEYS};
use shoebox::error::{Result, ShoeboxError};
use shoebox::index::{DisplayIndex, DisplayPhoto};
use shoebox::model::{Persistence, PhotoSource};
use shoebox::telemetry::init_tracing;
use std::path::PathBuf;
use std::time::Duration as StdDuration;
use tracing::debug;
use unicode_width::UnicodeWidthStr;

mod args;
use args::{Cli, Commands};

const HOME_ENV: &str = "SHOEBOX_HOME";

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: FsApi,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let mut ctx = init_context()?;

    // The trash sweep piggybacks on every invocation once it is due.
    if !matches!(cli.command, Some(Commands::Cleanup) | Some(Commands::Watch)) {
        let result = ctx.api.cleanup_if_due()?;
        print_messages(&result.messages);
    }

    match cli.command {
        Some(Commands::Add { files, camera }) => handle_add(&mut ctx, files, camera),
        Some(Commands::List {
            deleted,
            uploads,
            camera,
            all,
        }) => handle_list(&ctx, list_filter(deleted, uploads, camera, all)),
        Some(Commands::View { selectors }) => handle_view(&ctx, selectors),
        Some(Commands::Delete { selectors }) => handle_delete(&mut ctx, selectors),
        Some(Commands::Restore { selectors }) => handle_restore(&mut ctx, selectors),
        Some(Commands::Purge { selectors, yes }) => handle_purge(&mut ctx, selectors, yes),
        Some(Commands::Cleanup) => handle_cleanup(&mut ctx),
        Some(Commands::Sync) => handle_sync(&mut ctx),
        Some(Commands::Watch) => handle_watch(&mut ctx),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        None => handle_list(&ctx, PhotoFilter::Active),
    }
}

fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    let proj_dirs = ProjectDirs::from("com", "shoebox", "shoebox").ok_or_else(|| {
        ShoeboxError::Config(format!(
            "Could not determine a data directory; set {}",
            HOME_ENV
        ))
    })?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

fn init_context() -> Result<AppContext> {
    let paths = ShoeboxPaths {
        data_dir: data_dir()?,
    };
    debug!(data_dir = %paths.data_dir.display(), "opening gallery");
    let api = api::open(paths)?;
    if api.gallery().is_offline() {
        print_messages(&[CmdMessage::warning(
            "Backing store unreachable, working from the local snapshot.",
        )]);
    }
    Ok(AppContext { api })
}

fn list_filter(deleted: bool, uploads: bool, camera: bool, all: bool) -> PhotoFilter {
    if deleted {
        PhotoFilter::Deleted
    } else if uploads {
        PhotoFilter::Uploads
    } else if camera {
        PhotoFilter::Camera
    } else if all {
        PhotoFilter::All
    } else {
        PhotoFilter::Active
    }
}

fn handle_add(ctx: &mut AppContext, files: Vec<PathBuf>, camera: bool) -> Result<()> {
    let source = if camera {
        PhotoSource::Camera
    } else {
        PhotoSource::Upload
    };
    let result = ctx.api.add_photos(&files, source)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &AppContext, filter: PhotoFilter) -> Result<()> {
    let result = ctx.api.list_photos(filter)?;
    print_photos(&result.listed_photos);
    print_messages(&result.messages);
    Ok(())
}

fn handle_view(ctx: &AppContext, selectors: Vec<String>) -> Result<()> {
    let result = ctx.api.view_photos(&selectors)?;
    print_full_photos(&result.listed_photos);
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, selectors: Vec<String>) -> Result<()> {
    let result = ctx.api.delete_photos(&selectors)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_restore(ctx: &mut AppContext, selectors: Vec<String>) -> Result<()> {
    let result = ctx.api.restore_photos(&selectors)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_purge(ctx: &mut AppContext, selectors: Vec<String>, yes: bool) -> Result<()> {
    if !yes {
        let result = ctx.api.purge_preview(&selectors)?;
        print_messages(&result.messages);
        print_photos(&result.listed_photos);
        return Ok(());
    }
    let result = ctx.api.purge_photos(&selectors)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_cleanup(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.cleanup()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_sync(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.sync()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_watch(ctx: &mut AppContext) -> Result<()> {
    let interval = ctx.api.gallery().settings().cleanup_interval;
    println!(
        "{}",
        format!(
            "Cleaning the trash every {} hour(s). Ctrl-C to stop.",
            interval.num_hours()
        )
        .dimmed()
    );

    loop {
        let result = ctx.api.cleanup_if_due()?;
        print_messages(&result.messages);

        let now = Utc::now();
        let next = match ctx.api.gallery().last_cleanup() {
            Some(last) => last.checked_add_signed(interval).unwrap_or(DateTime::<Utc>::MAX_UTC),
            None => now,
        };
        let wait = (next - now)
            .to_std()
            .unwrap_or(StdDuration::ZERO)
            .max(StdDuration::from_secs(1));
        debug!(seconds = wait.as_secs(), "next cleanup");
        std::thread::sleep(wait);
    }
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let result = ctx.api.config(action)?;
    if let Some(config) = &result.config {
        if result.messages.is_empty() {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn print_config(config: &ShoeboxConfig) {
    for key in CONFIG_KEYS {
        let value = config.get(key).unwrap_or_default();
        let shown = if value.is_empty() {
            "(unset)".dimmed().to_string()
        } else {
            value
        };
        println!("{} = {}", key, shown);
    }
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

fn print_full_photos(photos: &[DisplayPhoto]) {
    for (i, dp) in photos.iter().enumerate() {
        if i > 0 {
            println!("\n--------------------------------\n");
        }
        let photo = &dp.photo;
        println!("{} {}", dp.index.to_string().yellow(), photo.name.bold());
        println!("  id:      {}", photo.id);
        println!("  source:  {}", photo.source);
        println!("  status:  {}", photo.status);
        println!("  size:    {}", fmt_size(photo.size));
        println!("  added:   {}", photo.added_at.to_rfc3339());
        if let Some(at) = photo.deleted_at {
            println!("  deleted: {}", at.to_rfc3339());
        }
        if let Some(days) = dp.days_left {
            println!("  removed in {} day(s)", days);
        }
        let stored = match photo.persistence {
            Persistence::Remote => "backing store",
            Persistence::Local => "local only",
        };
        println!("  stored:  {}", stored);
        println!("  url:     {}", photo.url);
    }
}

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const SIZE_WIDTH: usize = 10;
const LOCAL_MARKER: &str = "◌";

fn print_photos(photos: &[DisplayPhoto]) {
    if photos.is_empty() {
        println!("No photos found.");
        return;
    }

    for dp in photos {
        let idx_str = format!("{}. ", dp.index);
        let idx_colored = match dp.index {
            DisplayIndex::Deleted(_) => idx_str.red(),
            DisplayIndex::Regular(_) => idx_str.normal(),
        };

        let marker = match dp.photo.persistence {
            Persistence::Local => format!("{} ", LOCAL_MARKER),
            Persistence::Remote => "  ".to_string(),
        };

        let right = match dp.days_left {
            Some(days) => format!("{:>width$}", format!("{}d left", days), width = TIME_WIDTH),
            None => format_time_ago(dp.photo.added_at),
        };
        let size = format!("{:>width$}", fmt_size(dp.photo.size), width = SIZE_WIDTH);

        let fixed_width = 4 + idx_str.width() + marker.width() + SIZE_WIDTH + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let label = match dp.photo.source {
            PhotoSource::Camera => format!("{} [camera]", dp.photo.name),
            PhotoSource::Upload => dp.photo.name.clone(),
        };
        let name_display = truncate_to_width(&label, available);
        let padding = available.saturating_sub(name_display.width());

        println!(
            "    {}{}{}{}{}{}",
            idx_colored,
            name_display,
            " ".repeat(padding),
            marker,
            size.dimmed(),
            right.dimmed()
        );
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
