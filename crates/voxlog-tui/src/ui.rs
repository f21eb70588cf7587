use std::collections::VecDeque;
use std::sync::Mutex;

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs, Wrap};
use ratatui::Frame;
use voxlog_core::ListenState;

use crate::app::{App, Focus, Tab};

pub fn draw(frame: &mut Frame, app: &App) {
    let [tabs_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_tabs(frame, app, tabs_area);

    match app.tab {
        Tab::Session => draw_session(frame, app, main_area),
        Tab::Diagnostics => draw_lines(
            frame,
            &app.diagnostics,
            0,
            true,
            "Diagnostics",
            main_area,
        ),
    }

    draw_status(frame, app, status_area);

    if let Some(notice) = app.state.notice.as_deref() {
        draw_notice(frame, notice);
    }
}

fn draw_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles = vec!["Session", "Diagnostics"];
    let selected = match app.tab {
        Tab::Session => 0,
        Tab::Diagnostics => 1,
    };
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("voxlog (F1=switch)"))
        .select(selected)
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, area);
}

fn draw_session(frame: &mut Frame, app: &App, area: Rect) {
    let [log_area, controls_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(8)]).areas(area);

    let title = if app.log_auto_scroll {
        "Transcript (auto-scroll)"
    } else {
        "Transcript (PgUp/PgDn=scroll, End=bottom)"
    };
    draw_lines(
        frame,
        &app.transcript,
        app.log_scroll,
        app.log_auto_scroll,
        title,
        log_area,
    );

    let [voices_area, fields_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(controls_area);
    draw_voices(frame, app, voices_area);
    draw_fields(frame, app, fields_area);
}

fn focus_style(app: &App, focus: Focus) -> Style {
    if app.focus == focus {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn draw_voices(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(app, Focus::Voices))
        .title("Voices");

    if !app.state.can_speak {
        let para = Paragraph::new("Speech synthesis unavailable").block(block);
        frame.render_widget(para, area);
        return;
    }

    let visible = area.height.saturating_sub(2) as usize;
    let skip = (app.selected_voice + 1).saturating_sub(visible);

    let items: Vec<ListItem> = app
        .state
        .voices
        .iter()
        .enumerate()
        .skip(skip)
        .map(|(i, voice)| {
            let marker = if i == app.selected_voice { ">" } else { " " };
            let style = if i == app.selected_voice {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if voice.is_default {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", marker)),
                Span::styled(voice.label.as_str(), style),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn draw_fields(frame: &mut Frame, app: &App, area: Rect) {
    let [numbers_area, text_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(area);
    let [pitch_area, rate_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(numbers_area);

    let pitch = Paragraph::new(format!("{:.1}", app.pitch)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(app, Focus::Pitch))
            .title("Pitch"),
    );
    frame.render_widget(pitch, pitch_area);

    let rate = Paragraph::new(format!("{:.1}", app.rate)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(app, Focus::Rate))
            .title("Rate"),
    );
    frame.render_widget(rate, rate_area);

    let cursor = if app.focus == Focus::Text { "_" } else { "" };
    let text = Paragraph::new(format!("{}{}", app.text, cursor))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_style(app, Focus::Text))
                .title("Say (Enter)"),
        );
    frame.render_widget(text, text_area);
}

fn draw_lines(
    frame: &mut Frame,
    lines: &Mutex<VecDeque<String>>,
    scroll: usize,
    auto_scroll: bool,
    title: &str,
    area: Rect,
) {
    let lines = match lines.lock() {
        Ok(lines) => lines,
        Err(poisoned) => poisoned.into_inner(),
    };
    let total = lines.len();

    let visible_height = area.height.saturating_sub(2) as usize; // account for borders
    let scroll = if auto_scroll {
        0
    } else {
        scroll.min(total.saturating_sub(visible_height))
    };
    let end = total.saturating_sub(scroll);
    let start = end.saturating_sub(visible_height);

    let items: Vec<ListItem> = lines
        .iter()
        .skip(start)
        .take(end - start)
        .map(|s| ListItem::new(s.as_str()))
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let listening = if !app.state.can_listen {
        Span::styled("recognition unavailable", Style::default().fg(Color::DarkGray))
    } else {
        match app.state.listen_state {
            ListenState::Listening => Span::styled("● listening", Style::default().fg(Color::Green)),
            ListenState::Stopped => Span::styled("○ stopped", Style::default().fg(Color::Red)),
        }
    };
    let line = Line::from(vec![
        listening,
        Span::raw("  F2=listen F3=stop F5=voices Tab=focus Esc=quit"),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_notice(frame: &mut Frame, notice: &str) {
    let [area] = Layout::horizontal([Constraint::Percentage(60)])
        .flex(Flex::Center)
        .areas(frame.area());
    let [area] = Layout::vertical([Constraint::Length(5)])
        .flex(Flex::Center)
        .areas(area);

    frame.render_widget(Clear, area);
    let para = Paragraph::new(notice)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title("Notice (Enter to dismiss)"),
        );
    frame.render_widget(para, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::App;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;
    use std::sync::Arc;
    use voxlog_core::tui_types::{SessionState, VoiceOption};

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area();
        let mut text = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                text.push_str(buf.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "));
            }
            text.push('\n');
        }
        text
    }

    fn make_app() -> App {
        App::new(
            Arc::new(Mutex::new(VecDeque::new())),
            Arc::new(Mutex::new(VecDeque::new())),
        )
    }

    fn render(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_session_renders_voice_labels() {
        let mut app = make_app();
        app.update_state(SessionState {
            can_speak: true,
            voices: vec![
                VoiceOption {
                    label: "Alice (en-US) — DEFAULT".into(),
                    name: "Alice".into(),
                    lang: "en-US".into(),
                    is_default: true,
                },
                VoiceOption {
                    label: "Bernard (fr-FR)".into(),
                    name: "Bernard".into(),
                    lang: "fr-FR".into(),
                    is_default: false,
                },
            ],
            ..Default::default()
        });

        let text = render(&app, 100, 24);
        assert!(text.contains("Alice (en-US)"), "missing Alice:\n{}", text);
        assert!(text.contains("DEFAULT"), "missing default marker:\n{}", text);
        assert!(text.contains("Bernard (fr-FR)"), "missing Bernard:\n{}", text);
    }

    #[test]
    fn test_session_shows_synthesis_unavailable() {
        let app = make_app();
        let text = render(&app, 100, 24);
        assert!(text.contains("Speech synthesis unavailable"), "got:\n{}", text);
        assert!(text.contains("recognition unavailable"), "got:\n{}", text);
    }

    #[test]
    fn test_transcript_auto_scrolls_to_latest() {
        let transcript = Arc::new(Mutex::new(VecDeque::new()));
        {
            let mut buf = transcript.lock().unwrap();
            for i in 0..50 {
                buf.push_back(format!("phrase number {} (0.9)", i));
            }
        }
        let app = App::new(Arc::clone(&transcript), Arc::new(Mutex::new(VecDeque::new())));

        let text = render(&app, 80, 24);
        assert!(text.contains("phrase number 49"), "latest line missing:\n{}", text);
        assert!(!text.contains("phrase number 0 "), "oldest line shown:\n{}", text);
    }

    #[test]
    fn test_diagnostics_tab_renders_lines() {
        let diagnostics = Arc::new(Mutex::new(VecDeque::new()));
        diagnostics
            .lock()
            .unwrap()
            .push_back("   0.412s WARN  platform: engine unavailable".to_string());
        let mut app = App::new(Arc::new(Mutex::new(VecDeque::new())), diagnostics);
        app.tab = Tab::Diagnostics;

        let text = render(&app, 80, 20);
        assert!(text.contains("engine unavailable"), "got:\n{}", text);
    }

    #[test]
    fn test_notice_is_drawn_on_top() {
        let mut app = make_app();
        app.update_state(SessionState {
            notice: Some("Could not start listening".to_string()),
            ..Default::default()
        });
        let text = render(&app, 80, 24);
        assert!(text.contains("Could not start listening"), "got:\n{}", text);
    }

    #[test]
    fn test_listening_indicator() {
        let mut app = make_app();
        app.update_state(SessionState {
            can_listen: true,
            listen_state: ListenState::Listening,
            ..Default::default()
        });
        let text = render(&app, 80, 24);
        assert!(text.contains("listening"), "got:\n{}", text);
    }
}
