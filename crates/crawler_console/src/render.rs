use std::fmt::Write;

use chrono::Local;
use crawler_core::{AppViewModel, CollectionKind, Notice, NoticeLevel, PanelView};

pub fn notice_line(notice: &Notice) -> String {
    let level = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    };
    format!("[{}] {level}: {}", Local::now().format("%H:%M:%S"), notice.text)
}

pub fn status_line(view: &AppViewModel) -> String {
    let mut line = format!("crawler {}", view.run_state);
    if let Some(platform) = view.active_platform {
        let _ = write!(line, " ({platform})");
    }
    if view.command_in_flight {
        line.push_str(", command pending");
    }
    if view.unconfirmed {
        line.push_str(", unconfirmed");
    }
    if view.failed_polls > 0 {
        let _ = write!(line, ", {} failed poll(s)", view.failed_polls);
    }
    if let Some(at) = &view.last_status_at {
        let _ = write!(line, ", last status {at}");
    }
    line
}

pub fn full_view(view: &AppViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", status_line(view));
    for panel in &view.panels {
        render_panel(&mut out, panel);
    }
    out
}

fn render_panel(out: &mut String, panel: &PanelView) {
    let mut flags = Vec::new();
    if !panel.loaded {
        flags.push("not loaded");
    }
    if panel.unsaved {
        flags.push("unsaved");
    }
    if panel.saving {
        flags.push("saving");
    }
    if !panel.editable {
        flags.push("locked");
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags.join(", "))
    };
    let _ = writeln!(out, "\n{}{}", panel.platform.label(), flags);

    let width = panel.params.iter().map(|row| row.key.len()).max().unwrap_or(0);
    for row in &panel.params {
        let pending = if row.pending { " *" } else { "" };
        let _ = writeln!(
            out,
            "  {:width$}  {:>10}  [{} .. {}]{}",
            row.key, row.display, row.min, row.max, pending
        );
    }

    for collection in &panel.collections {
        let kind = match collection.kind {
            CollectionKind::Search => "search",
            CollectionKind::Exclusion => "exclude",
            CollectionKind::Unclassified => "unclassified",
        };
        let _ = writeln!(
            out,
            "  {} ({kind}, {}): {}",
            collection.name,
            collection.items.len(),
            collection.items.join(", ")
        );
    }
    let _ = writeln!(
        out,
        "  keywords: {} search, {} exclusion",
        panel.search_total, panel.exclusion_total
    );

    if let Some(stats) = panel.statistics {
        let _ = writeln!(
            out,
            "  stats: {} total, {} qualified, {} pending analysis, {} pending expansions",
            stats.total, stats.qualified, stats.pending_analysis, stats.pending_expansions
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crawler_core::{update, AppState, Msg, PanelConfig, Platform, StatusReport};

    #[test]
    fn idle_status_line() {
        let view = AppState::new().view();
        assert_eq!(status_line(&view), "crawler idle");
    }

    #[test]
    fn running_status_line_shows_timestamp() {
        let (state, _) = update(
            AppState::new(),
            Msg::StatusPolled(Ok(StatusReport {
                running: true,
                timestamp: Some("12:00".to_string()),
            })),
        );
        assert_eq!(status_line(&state.view()), "crawler running, last status 12:00");
    }

    #[test]
    fn full_view_lists_parameters_and_keywords() {
        let (state, _) = update(
            AppState::new(),
            Msg::ConfigLoaded {
                platform: Platform::GitHub,
                result: Ok(PanelConfig::defaults(Platform::GitHub)),
            },
        );
        let (state, _) = update(
            state,
            Msg::SliderMoved {
                platform: Platform::GitHub,
                key: "min_stars".to_string(),
                value: 250.0,
            },
        );
        let text = full_view(&state.view());
        assert!(text.contains("YouTube Discovery [not loaded]"));
        assert!(text.contains("\nGitHub Discovery\n"));
        let row = text
            .lines()
            .find(|line| line.trim_start().starts_with("min_stars"))
            .unwrap();
        assert!(row.contains("250"));
        assert!(row.ends_with(" *"));
        assert!(text.contains("priority_high (search, 5): Sora AI, Kling AI"));
        assert!(text.contains("keywords: 15 search, 10 exclusion"));
    }

    #[test]
    fn notice_line_names_level() {
        let line = notice_line(&Notice::warning("careful"));
        assert!(line.ends_with("warning: careful"));
    }
}
