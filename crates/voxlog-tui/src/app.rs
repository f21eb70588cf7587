use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crossterm::event::{KeyCode, KeyEvent};
use voxlog_core::tui_types::{SessionState, UiCommand};

pub const PITCH_RANGE: (f32, f32) = (0.0, 2.0);
pub const RATE_RANGE: (f32, f32) = (0.1, 10.0);
const STEP: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Session,
    Diagnostics,
}

/// Which control on the session tab receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Text,
    Voices,
    Pitch,
    Rate,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Text => Focus::Voices,
            Focus::Voices => Focus::Pitch,
            Focus::Pitch => Focus::Rate,
            Focus::Rate => Focus::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    None,
    Quit,
    Command(UiCommand),
}

pub struct App {
    pub tab: Tab,
    pub focus: Focus,
    pub state: SessionState,
    pub text: String,
    pub selected_voice: usize,
    pub pitch: f32,
    pub rate: f32,
    pub should_quit: bool,
    pub transcript: Arc<Mutex<VecDeque<String>>>,
    pub diagnostics: Arc<Mutex<VecDeque<String>>>,
    pub log_scroll: usize,
    pub log_auto_scroll: bool,
}

impl App {
    pub fn new(
        transcript: Arc<Mutex<VecDeque<String>>>,
        diagnostics: Arc<Mutex<VecDeque<String>>>,
    ) -> Self {
        Self {
            tab: Tab::Session,
            focus: Focus::Text,
            state: SessionState::default(),
            text: String::new(),
            selected_voice: 0,
            pitch: 1.0,
            rate: 1.0,
            should_quit: false,
            transcript,
            diagnostics,
            log_scroll: 0,
            log_auto_scroll: true,
        }
    }

    /// Starting pitch and rate, clamped to the input ranges.
    pub fn with_voice_settings(mut self, pitch: f32, rate: f32) -> Self {
        self.pitch = pitch.clamp(PITCH_RANGE.0, PITCH_RANGE.1);
        self.rate = rate.clamp(RATE_RANGE.0, RATE_RANGE.1);
        self
    }

    /// Take a new session snapshot. When the voice catalog changes, the
    /// selection follows the same voice by name and language; if that voice
    /// is gone it falls back to the platform default.
    pub fn update_state(&mut self, new_state: SessionState) {
        if new_state.voices != self.state.voices {
            let kept = self.state.voices.get(self.selected_voice).and_then(|old| {
                new_state
                    .voices
                    .iter()
                    .position(|v| v.name == old.name && v.lang == old.lang)
            });
            self.selected_voice = kept.or(new_state.default_voice).unwrap_or(0);
        }
        self.state = new_state;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        // A pending notice blocks everything else.
        if self.state.notice.is_some() {
            return match key.code {
                KeyCode::Enter | KeyCode::Esc => AppAction::Command(UiCommand::DismissNotice),
                _ => AppAction::None,
            };
        }

        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
                return AppAction::Quit;
            }
            KeyCode::F(1) => {
                self.tab = match self.tab {
                    Tab::Session => Tab::Diagnostics,
                    Tab::Diagnostics => Tab::Session,
                };
                return AppAction::None;
            }
            KeyCode::F(2) => return AppAction::Command(UiCommand::StartListening),
            KeyCode::F(3) => return AppAction::Command(UiCommand::StopListening),
            KeyCode::F(5) => return AppAction::Command(UiCommand::RefreshVoices),
            KeyCode::PageUp => {
                self.log_scroll = self.log_scroll.saturating_add(5);
                self.log_auto_scroll = false;
                return AppAction::None;
            }
            KeyCode::PageDown => {
                self.log_scroll = self.log_scroll.saturating_sub(5);
                if self.log_scroll == 0 {
                    self.log_auto_scroll = true;
                }
                return AppAction::None;
            }
            KeyCode::End => {
                self.log_scroll = 0;
                self.log_auto_scroll = true;
                return AppAction::None;
            }
            _ => {}
        }

        if self.tab != Tab::Session {
            return AppAction::None;
        }

        if key.code == KeyCode::Tab {
            self.focus = self.focus.next();
            return AppAction::None;
        }

        match self.focus {
            Focus::Text => self.handle_text_key(key),
            Focus::Voices => self.handle_voices_key(key),
            Focus::Pitch => {
                self.pitch = step(self.pitch, key, PITCH_RANGE);
                AppAction::None
            }
            Focus::Rate => {
                self.rate = step(self.rate, key, RATE_RANGE);
                AppAction::None
            }
        }
    }

    fn handle_text_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char(c) => {
                self.text.push(c);
                AppAction::None
            }
            KeyCode::Backspace => {
                self.text.pop();
                AppAction::None
            }
            KeyCode::Enter => AppAction::Command(UiCommand::Speak {
                text: self.text.clone(),
                voice_index: self.selected_voice,
                pitch: self.pitch,
                rate: self.rate,
            }),
            _ => AppAction::None,
        }
    }

    fn handle_voices_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Up => {
                self.selected_voice = self.selected_voice.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_voice + 1 < self.state.voices.len() {
                    self.selected_voice += 1;
                }
            }
            _ => {}
        }
        AppAction::None
    }
}

fn step(value: f32, key: KeyEvent, (min, max): (f32, f32)) -> f32 {
    let delta = match key.code {
        KeyCode::Right | KeyCode::Up => STEP,
        KeyCode::Left | KeyCode::Down => -STEP,
        _ => return value,
    };
    (((value + delta) * 10.0).round() / 10.0).clamp(min, max)
}
