//! Command execution.
//!
//! Interactive timers run the engine and the terminal loop side by side on
//! the current thread; the session recorder runs as a spawned task.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Local;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::commands::{
    BreatheArgs, NotificationsArgs, PomodoroArgs, StatsArgs, TaskAction, TasksArgs,
};
use super::controls::Control;
use super::display::Display;
use crate::config::{Settings, NOTIFICATIONS_FILE_NAME};
use crate::notification::{Notification, NotificationCenter};
use crate::sound::try_create_player;
use crate::stats::{DailyStats, WeeklySummary};
use crate::store::{level_for_points, JsonStore, StoreError, TaskId};
use crate::timer::{
    BreathingTimer, EffectExecutor, PomodoroTimer, SessionRecorder, TaskRef, TimerCommand,
    TimerEngine, TimerEvent,
};
use crate::types::BreathingPattern;

/// Capacity of the command channel.
const COMMAND_BUFFER: usize = 16;

// ============================================================================
// Shared wiring
// ============================================================================

/// Persistent collaborators opened from the data directory.
struct Services {
    data_dir: PathBuf,
    store: Arc<JsonStore>,
    center: Arc<NotificationCenter>,
}

impl Services {
    fn open(settings: &Settings) -> Result<Self> {
        let data_dir = settings.data_dir()?;
        let store = JsonStore::open(&data_dir)
            .with_context(|| format!("falha ao abrir os dados em {}", data_dir.display()))?;
        let center = open_center(&data_dir)?;
        debug!("Using data directory {}", data_dir.display());

        Ok(Self {
            data_dir,
            store: Arc::new(store),
            center: Arc::new(center),
        })
    }

    /// Executor notifying the center, with sound unless disabled.
    fn executor(&self, settings: &Settings, no_sound: bool) -> EffectExecutor {
        let executor = EffectExecutor::new(self.center.clone());
        if no_sound || !settings.sound.enabled {
            debug!("Sound disabled");
            return executor;
        }
        match try_create_player() {
            Some(player) => executor.with_sound(Box::new(player), settings.sound.source()),
            None => executor,
        }
    }
}

fn open_center(data_dir: &std::path::Path) -> Result<NotificationCenter> {
    let path = data_dir.join(NOTIFICATIONS_FILE_NAME);
    NotificationCenter::open(&path)
        .with_context(|| format!("falha ao abrir as notificações em {}", path.display()))
}

/// How the terminal loop reacts to the timer.
struct Session {
    /// Task attached to every start command
    task: Option<TaskRef>,
    /// Leave the loop when the timer reports completion
    exit_on_complete: bool,
    /// Offer the skip control
    with_skip: bool,
}

/// Terminal loop: renders events and notices, forwards typed controls.
///
/// Returns true if the timer reported completion.
async fn drive<C>(
    session: Session,
    commands: mpsc::Sender<TimerCommand<C>>,
    mut events: mpsc::UnboundedReceiver<TimerEvent>,
    notices: &mut mpsc::UnboundedReceiver<Notification>,
) -> bool {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut completed = false;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(TimerEvent::Completed(snapshot)) => {
                    completed = true;
                    Display::show_snapshot(&snapshot);
                    if session.exit_on_complete {
                        break;
                    }
                }
                Some(event) => Display::show_snapshot(event.snapshot()),
                None => break,
            },
            Some(notification) = notices.recv() => Display::show_notification(&notification),
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) if line.trim().is_empty() => {}
                Ok(Some(line)) => match Control::parse(&line) {
                    Some(Control::Quit) => break,
                    Some(Control::Help) => Display::show_controls(session.with_skip),
                    Some(control) => {
                        if let Some(command) = control.to_command(session.task.clone()) {
                            if commands.send(command).await.is_err() {
                                break;
                            }
                        }
                    }
                    None => Display::show_unknown_control(&line),
                },
                Ok(None) => {
                    debug!("Stdin closed; controls disabled");
                    stdin_open = false;
                }
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    stdin_open = false;
                }
            },
            result = &mut ctrl_c => {
                if let Err(e) = result {
                    warn!("Failed to listen for Ctrl-C: {}", e);
                }
                break;
            }
        }
    }

    // The engine may already be gone after a completion.
    let _ = commands.send(TimerCommand::Shutdown).await;
    completed
}

fn drain_notices(notices: &mut mpsc::UnboundedReceiver<Notification>) {
    while let Ok(notification) = notices.try_recv() {
        Display::show_notification(&notification);
    }
}

// ============================================================================
// Pomodoro
// ============================================================================

/// Runs an interactive Pomodoro timer until the user quits.
pub async fn run_pomodoro(args: &PomodoroArgs, settings: &Settings) -> Result<()> {
    let config = args.apply_to(settings.pomodoro.clone());
    let timer = PomodoroTimer::new(config).context("configuração do Pomodoro inválida")?;
    let services = Services::open(settings)?;
    let task = resolve_task(args, &services.store)?;
    let mut notices = services.center.subscribe();

    let (recorder, recorder_handle) =
        SessionRecorder::new(services.store.clone(), services.center.clone());
    let recorder_task = tokio::spawn(recorder.run());

    let executor = services
        .executor(settings, args.no_sound)
        .with_recorder(recorder_handle);
    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let engine = TimerEngine::new(timer, executor, event_tx);

    command_tx
        .send(TimerCommand::Start { task: task.clone() })
        .await
        .context("falha ao iniciar o timer")?;

    info!("Pomodoro started");
    if let Some(task) = &task {
        println!("Tarefa: {}", task.title);
    }
    Display::show_controls(true);
    let session = Session {
        task,
        exit_on_complete: false,
        with_skip: true,
    };
    let (timer, _) = tokio::join!(
        engine.run(command_rx),
        drive(session, command_tx, event_rx, &mut notices)
    );

    // The engine dropped its recorder handle, so the recorder drains and ends.
    recorder_task
        .await
        .context("o gravador de sessões falhou")?;
    drain_notices(&mut notices);

    Display::show_finished(&timer.snapshot());
    info!(
        "Pomodoro finished after {} cycle(s), data in {}",
        timer.completed_cycles(),
        services.data_dir.display()
    );
    Ok(())
}

/// Turns `--task` into a task reference.
///
/// A numeric value must name an entry in the task list; anything else is
/// a free-text task.
fn resolve_task(args: &PomodoroArgs, store: &JsonStore) -> Result<Option<TaskRef>> {
    let Some(text) = &args.task else {
        return Ok(None);
    };
    let Some(id) = args.task_id() else {
        return Ok(Some(TaskRef::named(text.clone())));
    };

    let state = store.snapshot();
    let task = state.task(id).ok_or(StoreError::UnknownTask(id.0))?;
    if task.completed {
        warn!("Task {} is already marked as done", id);
    }
    Ok(Some(TaskRef::from(task)))
}

// ============================================================================
// Breathing
// ============================================================================

/// Runs a guided breathing session until it completes or the user quits.
pub async fn run_breathe(args: &BreatheArgs, settings: &Settings) -> Result<()> {
    let default = settings.default_breathing_pattern()?;
    let pattern = args.resolve(default)?;
    let timer = BreathingTimer::new(pattern.clone()).context("padrão de respiração inválido")?;
    let services = Services::open(settings)?;
    let mut notices = services.center.subscribe();

    let executor = services
        .executor(settings, args.no_sound)
        .with_ledger(services.store.clone());
    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let engine = TimerEngine::new(timer, executor, event_tx);

    command_tx
        .send(TimerCommand::Start { task: None })
        .await
        .context("falha ao iniciar o exercício")?;

    info!("Breathing session started with pattern {}", pattern.id);
    println!(
        "{} ({}-{}-{}, {} ciclos)",
        pattern.name, pattern.inhale, pattern.hold, pattern.exhale, pattern.cycles
    );
    Display::show_controls(false);
    let session = Session {
        task: None,
        exit_on_complete: true,
        with_skip: false,
    };
    let (timer, completed) = tokio::join!(
        engine.run(command_rx),
        drive(session, command_tx, event_rx, &mut notices)
    );
    drain_notices(&mut notices);

    if completed {
        println!();
        let points = services.store.snapshot().magic_points;
        Display::show_points(points, level_for_points(points));
    } else {
        Display::show_finished(&timer.snapshot());
    }
    Ok(())
}

// ============================================================================
// Non-interactive commands
// ============================================================================

/// Lists the built-in breathing patterns.
pub fn show_patterns(settings: &Settings) {
    let patterns = BreathingPattern::builtin();
    Display::show_patterns(&patterns, &settings.breathing_pattern);
}

/// Prints today's statistics, or the current week's with `--week`.
pub fn show_stats(args: &StatsArgs, settings: &Settings) -> Result<()> {
    let data_dir = settings.data_dir()?;
    let store = JsonStore::open(&data_dir)
        .with_context(|| format!("falha ao abrir os dados em {}", data_dir.display()))?;
    let state = store.snapshot();
    let today = Local::now().date_naive();

    if args.week {
        let summary = WeeklySummary::for_week_of(&state, today, settings.goals, &Local);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            Display::show_weekly(&summary);
        }
    } else {
        let stats = DailyStats::for_date(&state, today, &Local);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            Display::show_daily(&stats);
        }
    }
    Ok(())
}

/// Lists notifications or applies one of the management actions.
pub fn manage_notifications(args: &NotificationsArgs, settings: &Settings) -> Result<()> {
    let data_dir = settings.data_dir()?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("falha ao criar {}", data_dir.display()))?;
    let center = open_center(&data_dir)?;

    if let Some(id) = &args.read {
        let found = center
            .mark_read(id)
            .context("falha ao marcar a notificação como lida")?;
        if !found {
            bail!("notificação '{}' não encontrada", id);
        }
        Display::show_done("Notificação marcada como lida");
    } else if let Some(id) = &args.remove {
        let found = center
            .remove(id)
            .context("falha ao remover a notificação")?;
        if !found {
            bail!("notificação '{}' não encontrada", id);
        }
        Display::show_done("Notificação removida");
    } else if args.read_all {
        center
            .mark_all_read()
            .context("falha ao marcar as notificações como lidas")?;
        Display::show_done("Todas as notificações marcadas como lidas");
    } else if args.clear {
        center.clear().context("falha ao apagar as notificações")?;
        Display::show_done("Notificações apagadas");
    } else {
        Display::show_notifications(&center.list(), center.unread_count());
    }
    Ok(())
}

/// Lists the task list or applies one of the task actions.
pub fn manage_tasks(args: &TasksArgs, settings: &Settings) -> Result<()> {
    let data_dir = settings.data_dir()?;
    let store = JsonStore::open(&data_dir)
        .with_context(|| format!("falha ao abrir os dados em {}", data_dir.display()))?;

    match &args.action {
        Some(TaskAction::Add { text }) => {
            let task = store.add_task(text).context("falha ao adicionar a tarefa")?;
            Display::show_done(&format!("Tarefa {} adicionada", task.id));
        }
        Some(TaskAction::Toggle { id }) => {
            let task = store
                .toggle_task(TaskId(*id))
                .context("falha ao atualizar a tarefa")?;
            let state = if task.completed { "concluída" } else { "pendente" };
            Display::show_done(&format!("Tarefa {} marcada como {}", task.id, state));
        }
        Some(TaskAction::Remove { id }) => {
            let task = store
                .remove_task(TaskId(*id))
                .context("falha ao remover a tarefa")?;
            Display::show_done(&format!("Tarefa {} removida", task.id));
        }
        None => Display::show_tasks(&store.tasks()),
    }
    Ok(())
}
