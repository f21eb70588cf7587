use crate::types::{ListenState, VoiceDescriptor};

/// A voice as shown in the selection list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VoiceOption {
    pub label: String,
    pub name: String,
    pub lang: String,
    pub is_default: bool,
}

impl From<&VoiceDescriptor> for VoiceOption {
    fn from(voice: &VoiceDescriptor) -> Self {
        let mut label = format!("{} ({})", voice.name, voice.lang);
        if voice.is_default {
            label.push_str(" — DEFAULT");
        }
        Self {
            label,
            name: voice.name.clone(),
            lang: voice.lang.clone(),
            is_default: voice.is_default,
        }
    }
}

/// Session snapshot broadcast to the TUI via watch channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub can_listen: bool,
    pub can_speak: bool,
    pub listen_state: ListenState,
    pub voices: Vec<VoiceOption>,
    /// Position of the platform default voice in `voices`.
    pub default_voice: Option<usize>,
    /// Oldest undismissed notice; the UI blocks on it until dismissed.
    pub notice: Option<String>,
}

/// Commands sent from TUI → session host via mpsc channel.
#[derive(Debug, Clone, PartialEq)]
pub enum UiCommand {
    StartListening,
    StopListening,
    Speak {
        text: String,
        voice_index: usize,
        pitch: f32,
        rate: f32,
    },
    RefreshVoices,
    DismissNotice,
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_state_default() {
        let state = SessionState::default();
        assert!(!state.can_listen);
        assert!(!state.can_speak);
        assert_eq!(state.listen_state, ListenState::Stopped);
        assert!(state.voices.is_empty());
        assert!(state.notice.is_none());
    }

    #[test]
    fn test_voice_option_label_marks_default() {
        let voice = VoiceDescriptor {
            name: "Samantha".to_string(),
            lang: "en-US".to_string(),
            is_default: true,
        };
        let option = VoiceOption::from(&voice);
        assert_eq!(option.label, "Samantha (en-US) — DEFAULT");
        assert!(option.is_default);
    }

    #[test]
    fn test_voice_option_label_plain() {
        let voice = VoiceDescriptor {
            name: "Thomas".to_string(),
            lang: "fr-FR".to_string(),
            is_default: false,
        };
        assert_eq!(VoiceOption::from(&voice).label, "Thomas (fr-FR)");
    }

    #[test]
    fn test_ui_command_clone_eq() {
        let cmd = UiCommand::Speak {
            text: "hello".to_string(),
            voice_index: 1,
            pitch: 1.0,
            rate: 1.5,
        };
        assert_eq!(cmd.clone(), cmd);
    }
}
