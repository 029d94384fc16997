//! Interactive session: one timer screen driven by line commands on stdin.
//!
//! Records live in memory for the lifetime of the session only.

use std::sync::Arc;

use chrono::NaiveDate;
use clap::Args;
use healthytime_core::collab::sign_in;
use healthytime_core::meal::Language;
use healthytime_core::{
    daily_breakdown, format_mm_ss, weekly_totals, Clock, Config, DailyTally, ImagePicker,
    ImageRequest, MealLog, MealType, NavCommand, NavigationStack, Navigator, PickOutcome, Route,
    SessionSink, Snapshot, SystemClock, TimerController, MAX_STATS_DAYS,
};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Args)]
pub struct SessionArgs {
    /// Host the Home screen variant (daily total and meal count only)
    #[arg(long)]
    pub home: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    Stop,
    Toggle,
    Status,
    List,
    SetType { id: String, meal_type: MealType },
    /// `uri: None` models a cancelled picker.
    Image { id: String, uri: Option<String> },
    Delete { id: String },
    Confirm,
    Cancel,
    Stats { days: Option<u32> },
    Day(NaiveDate),
    Go(Route),
    Back,
    Login,
    Help,
    Quit,
}

impl SessionCommand {
    /// Commands that only read the screen's records.
    fn is_query(&self) -> bool {
        matches!(self, Self::List | Self::Stats { .. } | Self::Day(_))
    }
}

const HELP: &str = "\
commands:
  start | stop | toggle       control the meal timer
  status                      show the timer
  list                        show this session's meal records
  type <id> <meal>            change a record's meal type
  image <id> <uri>|--cancel   attach a photo (or cancel the picker)
  delete <id>, confirm|cancel remove a record (two steps)
  stats [days]                per-day totals
  day <YYYY-MM-DD>            per-meal breakdown for one day
  login | go <route> | back   navigation
  help | quit";

pub fn parse_command(line: &str) -> Result<SessionCommand, Box<dyn std::error::Error>> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Err("empty command".into());
    };
    let rest: Vec<&str> = parts.collect();
    let arg = |i: usize, name: &str| -> Result<String, Box<dyn std::error::Error>> {
        rest.get(i)
            .map(|s| s.to_string())
            .ok_or_else(|| format!("missing <{name}> for '{head}'").into())
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "start" => SessionCommand::Start,
        "stop" => SessionCommand::Stop,
        "toggle" => SessionCommand::Toggle,
        "status" => SessionCommand::Status,
        "list" | "ls" => SessionCommand::List,
        "type" => SessionCommand::SetType {
            id: arg(0, "id")?,
            meal_type: arg(1, "meal")?.parse()?,
        },
        "image" => {
            let id = arg(0, "id")?;
            let target = rest_after_words(line, 2);
            if target.is_empty() {
                return Err(format!("missing <uri> for '{head}'").into());
            }
            let uri = (target != "--cancel").then(|| target.to_string());
            SessionCommand::Image { id, uri }
        }
        "delete" | "rm" => SessionCommand::Delete { id: arg(0, "id")? },
        "confirm" => SessionCommand::Confirm,
        "cancel" => SessionCommand::Cancel,
        "stats" => {
            let days: Option<u32> = rest.first().map(|d| d.parse()).transpose()?;
            if let Some(days) = days.filter(|d| !(1..=MAX_STATS_DAYS).contains(d)) {
                return Err(
                    format!("days must be between 1 and {MAX_STATS_DAYS}, got {days}").into(),
                );
            }
            SessionCommand::Stats { days }
        }
        "day" => SessionCommand::Day(NaiveDate::parse_from_str(&arg(0, "date")?, "%Y-%m-%d")?),
        "go" => SessionCommand::Go(arg(0, "route")?.parse()?),
        "back" => SessionCommand::Back,
        "login" => SessionCommand::Login,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" | "q" => SessionCommand::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')").into()),
    };
    Ok(command)
}

/// The remainder of `line` after its first `n` words, kept verbatim apart
/// from surrounding whitespace.
fn rest_after_words(line: &str, n: usize) -> &str {
    let mut rest = line.trim_start();
    for _ in 0..n {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        rest = rest[end..].trim_start();
    }
    rest.trim_end()
}

/// Picker stand-in: the uri was typed on the command line.
struct TypedPicker(Option<String>);

impl ImagePicker for TypedPicker {
    fn pick(&mut self, request: &ImageRequest) -> PickOutcome {
        tracing::debug!(?request, "image requested");
        match self.0.take() {
            Some(uri) => PickOutcome::Picked(uri),
            None => PickOutcome::Cancelled,
        }
    }
}

/// Settings a screen needs to render and handle record commands.
pub struct ScreenContext {
    pub language: Language,
    pub image_request: ImageRequest,
    pub stats_days: u32,
    pub today: NaiveDate,
}

/// What each screen variant does with the commands beyond the timer itself.
pub trait Screen: SessionSink + Send + 'static {
    fn summary(&self, ctx: &ScreenContext) -> String;

    /// Read-only commands (see [`SessionCommand::is_query`]).
    fn query(&self, command: SessionCommand, ctx: &ScreenContext) -> String;

    fn handle(&mut self, command: SessionCommand, ctx: &ScreenContext) -> String;
}

const RECORD_SCREEN_ONLY: &str = "only available on the record screen (run without --home)";

impl Screen for DailyTally {
    fn summary(&self, _ctx: &ScreenContext) -> String {
        format!(
            "meals today: {}  total: {}",
            self.meal_count,
            format_mm_ss(self.total_secs)
        )
    }

    fn query(&self, _command: SessionCommand, _ctx: &ScreenContext) -> String {
        RECORD_SCREEN_ONLY.to_string()
    }

    fn handle(&mut self, _command: SessionCommand, _ctx: &ScreenContext) -> String {
        RECORD_SCREEN_ONLY.to_string()
    }
}

impl Screen for MealLog {
    fn summary(&self, _ctx: &ScreenContext) -> String {
        format!("{} record(s)", self.len())
    }

    fn query(&self, command: SessionCommand, ctx: &ScreenContext) -> String {
        match command {
            SessionCommand::List => render_records(self, ctx.language),
            SessionCommand::Stats { days } => {
                let days = days.unwrap_or(ctx.stats_days);
                weekly_totals(self.records(), ctx.today, days)
                    .iter()
                    .map(|t| format!("{:>5}  {}", t.label(), format_mm_ss(t.total_secs)))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            SessionCommand::Day(date) => {
                let breakdown = daily_breakdown(self.records(), date);
                if breakdown.is_empty() {
                    return format!("no meals on {date}");
                }
                breakdown
                    .iter()
                    .map(|t| {
                        format!(
                            "{:<10}  {}",
                            t.meal_type.label(ctx.language),
                            format_mm_ss(t.total_secs)
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            other => format!("unsupported here: {other:?}"),
        }
    }

    fn handle(&mut self, command: SessionCommand, ctx: &ScreenContext) -> String {
        match command {
            SessionCommand::SetType { id, meal_type } => {
                if self.set_meal_type(&id, meal_type) {
                    format!("{id}: {}", meal_type.label(ctx.language))
                } else {
                    format!("no record {id}")
                }
            }
            SessionCommand::Image { id, uri } => {
                let mut picker = TypedPicker(uri);
                if self.pick_image(&id, &mut picker, &ctx.image_request) {
                    format!("{id}: image attached")
                } else {
                    format!("{id}: no change")
                }
            }
            SessionCommand::Delete { id } => {
                if self.request_delete(&id) {
                    format!("delete {id}? this cannot be undone ('confirm' or 'cancel')")
                } else {
                    format!("no record {id}")
                }
            }
            SessionCommand::Confirm => match self.confirm_delete() {
                Some(removed) => format!("deleted {}", removed.id),
                None => "nothing to confirm".to_string(),
            },
            SessionCommand::Cancel => {
                self.cancel_delete();
                "cancelled".to_string()
            }
            other if other.is_query() => self.query(other, ctx),
            other => format!("unsupported here: {other:?}"),
        }
    }
}

fn render_records(log: &MealLog, language: Language) -> String {
    if log.is_empty() {
        return "no records".to_string();
    }
    log.records()
        .iter()
        .map(|r| {
            let mut line = format!(
                "{}  {}  {:<10}  {}",
                r.id,
                r.start_time.format("%H:%M"),
                r.meal_type.label(language),
                format_mm_ss(r.duration)
            );
            if let Some(uri) = &r.image_uri {
                line.push_str("  image=");
                line.push_str(uri);
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_status(snapshot: &Snapshot) -> String {
    let label = if snapshot.recording() { "recording" } else { "idle" };
    format!("{label} {}", snapshot.elapsed_display)
}

pub fn run(args: SessionArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        if args.home {
            run_screen(DailyTally::new(), Route::Home, &config).await
        } else {
            run_screen(MealLog::new(), Route::Record, &config).await
        }
    })
}

async fn run_screen<S: Screen>(
    sink: S,
    screen_route: Route,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let controller = TimerController::with_tick_interval(sink, Arc::clone(&clock), config.tick_interval());
    let mut navigator = NavigationStack::new(Route::Main);
    navigator.dispatch(NavCommand::Navigate(screen_route));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("error: {e}");
                continue;
            }
        };

        let output = match command {
            SessionCommand::Quit => break,
            SessionCommand::Help => HELP.to_string(),
            SessionCommand::Start => {
                if controller.start().await {
                    "recording".to_string()
                } else {
                    "already recording".to_string()
                }
            }
            SessionCommand::Stop => match controller.stop().await {
                Some(session) => format!("stopped after {}", format_mm_ss(session.duration_secs)),
                None => "not recording".to_string(),
            },
            SessionCommand::Toggle => match controller.toggle().await {
                Some(session) => format!("stopped after {}", format_mm_ss(session.duration_secs)),
                None => render_status(&controller.snapshot()),
            },
            SessionCommand::Status => {
                let ctx = screen_context(config, clock.as_ref());
                let summary = controller.read_sink(|s| s.summary(&ctx)).await;
                format!("{}  {summary}", render_status(&controller.snapshot()))
            }
            SessionCommand::Login => {
                sign_in(&mut navigator);
                format!("at {}", navigator.current())
            }
            SessionCommand::Go(route) => {
                navigator.dispatch(NavCommand::Navigate(route));
                format!("at {}", navigator.current())
            }
            SessionCommand::Back => format!("at {}", navigator.back()),
            other if other.is_query() => {
                let ctx = screen_context(config, clock.as_ref());
                controller.read_sink(|s| s.query(other, &ctx)).await
            }
            other => {
                let ctx = screen_context(config, clock.as_ref());
                controller.with_sink(|s| s.handle(other, &ctx)).await
            }
        };
        println!("{output}");
    }

    if controller.snapshot().recording() {
        tracing::warn!("session ended while recording; the open meal is discarded");
    }
    Ok(())
}

fn screen_context(config: &Config, clock: &dyn Clock) -> ScreenContext {
    ScreenContext {
        language: config.display.language,
        image_request: config.image_request(),
        stats_days: config.stats.days,
        today: clock.now().date_naive(),
    }
}
