//! Display utilities for the Foco CLI.
//!
//! `format_*` functions build the text; `show_*` functions print it. The
//! live countdown is redrawn in place on a single line.

use std::io::Write;

use chrono::Datelike;

use super::controls::Control;
use crate::notification::{Notification, NotificationKind};
use crate::stats::{DailyStats, WeeklySummary};
use crate::store::Task;
use crate::types::{BreathingPattern, TimerSnapshot};

/// Weekday labels, Monday first.
const WEEKDAYS: [&str; 7] = ["seg", "ter", "qua", "qui", "sex", "sáb", "dom"];

/// Width of the goal progress bars.
const BAR_WIDTH: usize = 20;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    // ------------------------------------------------------------------------
    // Live timer
    // ------------------------------------------------------------------------

    /// Redraws the countdown line.
    pub fn show_snapshot(snapshot: &TimerSnapshot) {
        let mut stdout = std::io::stdout().lock();
        let _ = write!(stdout, "\r\x1b[2K{}", Self::format_snapshot(snapshot));
        let _ = stdout.flush();
    }

    /// Formats a snapshot as one status line.
    pub fn format_snapshot(snapshot: &TimerSnapshot) -> String {
        let (minutes, seconds) = Self::format_time(snapshot.remaining_seconds);
        let marker = if snapshot.running { ">" } else { "||" };
        let mut line = format!(
            "{} {}  {:02}:{:02}",
            marker, snapshot.label, minutes, seconds
        );

        match snapshot.total_cycles {
            Some(total) => {
                line.push_str(&format!("  ciclo {}/{}", snapshot.completed_cycles, total));
            }
            None => {
                line.push_str(&format!("  pomodoros: {}", snapshot.completed_cycles));
            }
        }
        if let Some(interruptions) = snapshot.interruption_count.filter(|&n| n > 0) {
            line.push_str(&format!("  interrupções: {}", interruptions));
        }
        line
    }

    /// Prints a notification on its own line, above the countdown.
    pub fn show_notification(notification: &Notification) {
        println!("\r\x1b[2K{}", Self::format_notification(notification));
    }

    /// Formats a notification as one line.
    pub fn format_notification(notification: &Notification) -> String {
        format!(
            "{} {}: {}",
            Self::kind_marker(notification.kind),
            notification.title,
            notification.message
        )
    }

    /// Prints the available controls.
    pub fn show_controls(with_skip: bool) {
        println!("\r\x1b[2K{}", Self::format_controls(with_skip));
    }

    /// Formats the control help line.
    pub fn format_controls(with_skip: bool) -> String {
        let parts: Vec<String> = Control::ALL
            .iter()
            .filter(|c| with_skip || **c != Control::Skip)
            .map(|c| format!("[{}] {}", c.key(), c.description()))
            .collect();
        format!("Comandos (digite e tecle Enter): {}", parts.join("  "))
    }

    /// Notes an unrecognized control.
    pub fn show_unknown_control(input: &str) {
        println!("\r\x1b[2KComando desconhecido: '{}' (? para ajuda)", input.trim());
    }

    /// Ends the countdown line and prints a final summary.
    pub fn show_finished(snapshot: &TimerSnapshot) {
        println!();
        match snapshot.focus_seconds {
            Some(focus) => {
                let (minutes, seconds) = Self::format_time(focus);
                println!(
                    "Pomodoros concluídos: {}  Tempo de foco: {}:{:02}",
                    snapshot.completed_cycles, minutes, seconds
                );
            }
            None => println!("Ciclos concluídos: {}", snapshot.completed_cycles),
        }
    }

    /// Shows the magic point total after a breathing session.
    pub fn show_points(points: u64, level: u64) {
        println!("Pontos Mágicos: {}  Nível: {}", points, level);
    }

    // ------------------------------------------------------------------------
    // Patterns
    // ------------------------------------------------------------------------

    /// Lists breathing patterns.
    pub fn show_patterns(patterns: &[BreathingPattern], default_id: &str) {
        println!("Padrões de respiração");
        println!("─────────────────────────────");
        for pattern in patterns {
            println!("{}", Self::format_pattern(pattern, pattern.id == default_id));
        }
    }

    /// Formats one pattern as a line.
    pub fn format_pattern(pattern: &BreathingPattern, is_default: bool) -> String {
        format!(
            "{} {:<12} {:>2}-{}-{} x{:<2}  {}",
            if is_default { "*" } else { " " },
            pattern.id,
            pattern.inhale,
            pattern.hold,
            pattern.exhale,
            pattern.cycles,
            pattern.description
        )
    }

    // ------------------------------------------------------------------------
    // Stats
    // ------------------------------------------------------------------------

    /// Shows today's statistics.
    pub fn show_daily(stats: &DailyStats) {
        println!("{}", Self::format_daily(stats));
    }

    /// Formats daily statistics.
    pub fn format_daily(stats: &DailyStats) -> String {
        let (hours, minutes) = stats.focus_time();
        let mut out = String::new();
        out.push_str("Estatísticas de hoje\n");
        out.push_str("─────────────────────────────\n");
        out.push_str(&format!(
            "Sessões: {} ({} concluídas, {}%)\n",
            stats.sessions, stats.completed_sessions, stats.completion_rate
        ));
        out.push_str(&format!("Tempo de foco: {}h {:02}min\n", hours, minutes));
        out.push_str(&format!("Interrupções: {}\n", stats.interruptions));
        out.push_str(&format!("Respirações: {}", stats.breathing_sessions));
        out
    }

    /// Shows the weekly summary.
    pub fn show_weekly(summary: &WeeklySummary) {
        println!("{}", Self::format_weekly(summary));
    }

    /// Formats the weekly summary.
    pub fn format_weekly(summary: &WeeklySummary) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Semana de {}\n",
            summary.week_start.format("%d/%m/%Y")
        ));
        out.push_str("─────────────────────────────\n");
        for (label, day) in WEEKDAYS.iter().zip(&summary.days) {
            out.push_str(&format!(
                "{:<4} {:>4} min  {} sessões  {} respirações\n",
                label, day.focus_minutes, day.completed_sessions, day.breathing_sessions
            ));
        }
        out.push_str(&format!(
            "Foco:        {} {:>3}% ({}/{} min)\n",
            Self::progress_bar(summary.focus_goal_progress),
            summary.focus_goal_progress,
            summary.focus_minutes,
            summary.goals.focus_minutes
        ));
        out.push_str(&format!(
            "Respiração:  {} {:>3}% ({}/{})\n",
            Self::progress_bar(summary.breathing_goal_progress),
            summary.breathing_goal_progress,
            summary.breathing_sessions,
            summary.goals.breathing_sessions
        ));
        out.push_str(&format!(
            "Sequência:   {} {}\n",
            summary.streak_days,
            if summary.streak_days == 1 { "dia" } else { "dias" }
        ));
        if let Some(best_day) = summary.best_day {
            let label = WEEKDAYS[best_day.weekday().num_days_from_monday() as usize];
            out.push_str(&format!(
                "Melhor dia:  {} {} ({} min)\n",
                label,
                best_day.format("%d/%m"),
                summary.best_day_minutes
            ));
        }
        out.push_str(&format!(
            "Pontos Mágicos: {}  Nível: {}",
            summary.magic_points, summary.level
        ));
        if summary.goals_met() {
            out.push_str("\nMetas da semana alcançadas!");
        }
        out
    }

    // ------------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------------

    /// Lists the task list, pending tasks marked with an empty box.
    pub fn show_tasks(tasks: &[Task]) {
        if tasks.is_empty() {
            println!("Nenhuma tarefa");
            return;
        }
        let pending = tasks.iter().filter(|t| !t.completed).count();
        println!("Tarefas ({} pendentes)", pending);
        println!("─────────────────────────────");
        for task in tasks {
            println!("{}", Self::format_task(task));
        }
    }

    pub fn format_task(task: &Task) -> String {
        format!(
            "[{}] {:>3}  {}",
            if task.completed { "x" } else { " " },
            task.id.0,
            task.text
        )
    }

    // ------------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------------

    /// Lists stored notifications.
    pub fn show_notifications(notifications: &[Notification], unread: usize) {
        if notifications.is_empty() {
            println!("Nenhuma notificação");
            return;
        }
        println!("Notificações ({} não lidas)", unread);
        println!("─────────────────────────────");
        for notification in notifications {
            println!(
                "{} {} {}  {}",
                if notification.read { " " } else { "•" },
                notification.id,
                notification.created_at.format("%d/%m %H:%M"),
                Self::format_notification(notification)
            );
        }
    }

    /// Shows a one-line confirmation.
    pub fn show_done(message: &str) {
        println!("* {}", message);
    }

    /// Shows an error message, with a hint when one is known.
    pub fn show_error(message: &str, suggestion: Option<&str>) {
        eprintln!("Erro: {}", message);
        if let Some(suggestion) = suggestion {
            eprintln!("Dica: {}", suggestion);
        }
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    /// Formats seconds as (minutes, seconds).
    fn format_time(total_seconds: u32) -> (u32, u32) {
        (total_seconds / 60, total_seconds % 60)
    }

    fn kind_marker(kind: NotificationKind) -> &'static str {
        match kind {
            NotificationKind::Success => "*",
            NotificationKind::Warning => "!",
            NotificationKind::Info => "i",
            NotificationKind::Reminder => ">",
            NotificationKind::Error => "x",
        }
    }

    fn progress_bar(percent: u32) -> String {
        let filled = (percent.min(100) as usize * BAR_WIDTH) / 100;
        format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
    }
}

// ============================================================================
// Tests
// ============================================================================
