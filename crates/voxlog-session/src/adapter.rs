use crate::log_sink::LogSink;
use crate::voice_list::VoiceList;
use std::collections::VecDeque;
use tokio::sync::mpsc;
use voxlog_core::{
    Capability, ListenState, RecognitionEvent, RecognitionMessage, RecognitionResult,
    SessionError, SessionId, SessionState, SynthesisEvent, UiCommand, UtteranceRequest,
};
use voxlog_engine::{Recognizer, SpeechPlatform, Synthesizer};

pub const LISTENING_ENTRY: &str = "Listening ...";
pub const NO_MATCH_ENTRY: &str = "((( I did not recognise that )))";
pub const END_ENTRY: &str = "((( I stopped listening )))";
pub const ERROR_ENTRY: &str = "((( Error occurred in recognition )))";
pub const SYNTHESIS_ERROR_ENTRY: &str = "((( Error occurred in speech synthesis )))";

/// Glue between the host's speech engines and the transcript log.
///
/// Every method runs to completion without waiting on the engines. Engine
/// callbacks arrive as events on the receivers created in [`new`](Self::new)
/// and must be fed back through [`handle_recognition_message`] and
/// [`handle_synthesis_event`] (or [`drain_events`]) on the same timeline as
/// the UI operations. Recognition messages stamped with an earlier session
/// than the current one are discarded.
///
/// Failures never escape: a missing capability turns the matching
/// operations into no-ops, and an engine error becomes a queued notice.
///
/// [`handle_recognition_message`]: Self::handle_recognition_message
/// [`handle_synthesis_event`]: Self::handle_synthesis_event
/// [`drain_events`]: Self::drain_events
pub struct SpeechSessionAdapter {
    recognizer: Option<Box<dyn Recognizer>>,
    synthesizer: Option<Box<dyn Synthesizer>>,
    recognition_rx: Option<mpsc::UnboundedReceiver<RecognitionMessage>>,
    synthesis_rx: Option<mpsc::UnboundedReceiver<SynthesisEvent>>,
    listen_state: ListenState,
    /// Id of the latest session the recognizer accepted.
    session: SessionId,
    /// Index of the next unread entry in the recognizer's result sequence.
    cursor: usize,
    voices: VoiceList,
    sinks: Vec<Box<dyn LogSink>>,
    notices: VecDeque<String>,
}

impl SpeechSessionAdapter {
    pub fn new(platform: SpeechPlatform, sinks: Vec<Box<dyn LogSink>>) -> Self {
        let SpeechPlatform {
            mut recognizer,
            mut synthesizer,
        } = platform;

        let recognition_rx = recognizer.as_mut().map(|r| {
            let (tx, rx) = mpsc::unbounded_channel();
            r.set_event_sender(tx);
            rx
        });
        let synthesis_rx = synthesizer.as_mut().map(|s| {
            let (tx, rx) = mpsc::unbounded_channel();
            s.set_event_sender(tx);
            rx
        });

        let mut adapter = Self {
            recognizer,
            synthesizer,
            recognition_rx,
            synthesis_rx,
            listen_state: ListenState::Stopped,
            session: 0,
            cursor: 0,
            voices: VoiceList::default(),
            sinks,
            notices: VecDeque::new(),
        };

        if !adapter.can_listen() {
            adapter.report_unsupported(Capability::Recognition);
        }
        if adapter.can_speak() {
            // Some engines enumerate lazily; VoicesChanged covers the rest.
            adapter.refresh_voice_list();
        } else {
            adapter.report_unsupported(Capability::Synthesis);
        }

        adapter
    }

    pub fn can_listen(&self) -> bool {
        self.recognizer.is_some()
    }

    pub fn can_speak(&self) -> bool {
        self.synthesizer.is_some()
    }

    pub fn listen_state(&self) -> ListenState {
        self.listen_state
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn voices(&self) -> &VoiceList {
        &self.voices
    }

    pub fn take_recognition_receiver(
        &mut self,
    ) -> Option<mpsc::UnboundedReceiver<RecognitionMessage>> {
        self.recognition_rx.take()
    }

    pub fn take_synthesis_receiver(&mut self) -> Option<mpsc::UnboundedReceiver<SynthesisEvent>> {
        self.synthesis_rx.take()
    }

    pub fn start_listening(&mut self) {
        let Some(recognizer) = self.recognizer.as_mut() else {
            tracing::debug!("start_listening ignored: recognition unavailable");
            return;
        };

        self.cursor = 0;
        let session = self.session + 1;
        match recognizer.start(session) {
            Ok(()) => {
                self.session = session;
                self.listen_state = ListenState::Listening;
                tracing::info!(engine = %recognizer.name(), session, "listening");
                self.log(LISTENING_ENTRY);
            }
            Err(e) => self.fail("start listening", e.into()),
        }
    }

    pub fn stop_listening(&mut self) {
        let Some(recognizer) = self.recognizer.as_mut() else {
            tracing::debug!("stop_listening ignored: recognition unavailable");
            return;
        };

        match recognizer.stop() {
            Ok(()) => self.listen_state = ListenState::Stopped,
            Err(e) => self.fail("stop listening", e.into()),
        }
    }

    /// Consume the entry at the cursor from the full accumulated sequence.
    ///
    /// The cursor is only trusted, never reconciled: if the engine ever
    /// reordered or trimmed its history, entries would be skipped or repeated.
    pub fn on_recognition_result(&mut self, results: &[RecognitionResult]) {
        if self.listen_state != ListenState::Listening {
            tracing::debug!(len = results.len(), "result dropped: not listening");
            return;
        }
        let Some(result) = results.get(self.cursor) else {
            tracing::warn!(
                cursor = self.cursor,
                len = results.len(),
                "no recognition result at cursor"
            );
            return;
        };
        let Some(top) = result.top() else {
            tracing::warn!(cursor = self.cursor, "recognition result has no alternatives");
            return;
        };

        let entry = format!("{} ({})", top.transcript, top.confidence);
        self.cursor += 1;
        self.log(&entry);
    }

    pub fn on_recognition_no_match(&mut self) {
        self.log(NO_MATCH_ENTRY);
    }

    /// The session ended, either on request or on the engine's own initiative.
    /// Listening resumes only on an explicit `start_listening`.
    pub fn on_recognition_end(&mut self) {
        self.listen_state = ListenState::Stopped;
        self.log(END_ENTRY);
    }

    pub fn on_recognition_error(&mut self, code: &str) {
        tracing::warn!(code, "recognition error");
        self.log(&format!("{ERROR_ENTRY} {code}"));
    }

    pub fn refresh_voice_list(&mut self) {
        let Some(synthesizer) = self.synthesizer.as_ref() else {
            return;
        };
        let voices = synthesizer.voices();
        tracing::debug!(count = voices.len(), "voice list refreshed");
        self.voices.replace(voices);
    }

    /// Queue `text` for playback with the voice at `voice_index`.
    ///
    /// Pitch and rate are handed over untouched. An index outside the cached
    /// list leaves the voice to the synthesizer's default.
    pub fn speak(&mut self, text: &str, voice_index: usize, pitch: f32, rate: f32) {
        if !self.can_speak() {
            tracing::debug!("speak ignored: synthesis unavailable");
            return;
        }
        if text.is_empty() {
            return;
        }

        self.log(&format!("speaking: {text}"));

        let voice = self.voices.get(voice_index).cloned();
        if voice.is_none() && !self.voices.is_empty() {
            tracing::warn!(voice_index, voices = self.voices.len(), "voice index out of range");
        }
        let request = UtteranceRequest {
            text: text.to_string(),
            voice_index,
            voice,
            pitch,
            rate,
        };

        let Some(synthesizer) = self.synthesizer.as_mut() else {
            return;
        };
        if let Err(e) = synthesizer.speak(request) {
            self.fail("speak", e.into());
        }
    }

    /// Dispatch a recognizer message. Leftovers from an earlier session, such
    /// as the `End` of a session stopped just before a restart, are dropped.
    pub fn handle_recognition_message(&mut self, message: RecognitionMessage) {
        if message.session != self.session {
            tracing::debug!(
                session = message.session,
                current = self.session,
                event = ?message.event,
                "stale recognition event dropped"
            );
            return;
        }
        self.handle_recognition_event(message.event);
    }

    /// Dispatch an event of the current session.
    pub fn handle_recognition_event(&mut self, event: RecognitionEvent) {
        match event {
            RecognitionEvent::Result(results) => self.on_recognition_result(&results),
            RecognitionEvent::NoMatch => self.on_recognition_no_match(),
            RecognitionEvent::End => self.on_recognition_end(),
            RecognitionEvent::Error(code) => self.on_recognition_error(&code),
        }
    }

    pub fn handle_synthesis_event(&mut self, event: SynthesisEvent) {
        match event {
            SynthesisEvent::VoicesChanged => self.refresh_voice_list(),
            SynthesisEvent::Error(code) => {
                tracing::warn!(code = %code, "synthesis error");
                self.log(&format!("{SYNTHESIS_ERROR_ENTRY} {code}"));
            }
        }
    }

    /// Apply a UI command. `Quit` is the host's business and ignored here.
    pub fn handle_command(&mut self, command: UiCommand) {
        match command {
            UiCommand::StartListening => self.start_listening(),
            UiCommand::StopListening => self.stop_listening(),
            UiCommand::Speak {
                text,
                voice_index,
                pitch,
                rate,
            } => self.speak(&text, voice_index, pitch, rate),
            UiCommand::RefreshVoices => self.refresh_voice_list(),
            UiCommand::DismissNotice => self.dismiss_notice(),
            UiCommand::Quit => {}
        }
    }

    /// Process every engine event already queued, oldest first. Receivers
    /// taken by a host are not drained here.
    pub fn drain_events(&mut self) {
        while let Some(message) = self.next_recognition_message() {
            self.handle_recognition_message(message);
        }
        while let Some(event) = self.next_synthesis_event() {
            self.handle_synthesis_event(event);
        }
    }

    fn next_recognition_message(&mut self) -> Option<RecognitionMessage> {
        self.recognition_rx.as_mut()?.try_recv().ok()
    }

    fn next_synthesis_event(&mut self) -> Option<SynthesisEvent> {
        self.synthesis_rx.as_mut()?.try_recv().ok()
    }

    pub fn current_notice(&self) -> Option<&str> {
        self.notices.front().map(|s| s.as_str())
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.pop_front();
    }

    pub fn snapshot(&self) -> SessionState {
        SessionState {
            can_listen: self.can_listen(),
            can_speak: self.can_speak(),
            listen_state: self.listen_state,
            voices: self.voices.options(),
            default_voice: self.voices.default_index(),
            notice: self.notices.front().cloned(),
        }
    }

    fn report_unsupported(&mut self, capability: Capability) {
        let err = SessionError::PlatformUnsupported(capability);
        tracing::warn!("{err}");
        self.log(&err.to_string());
    }

    fn fail(&mut self, operation: &str, err: SessionError) {
        tracing::error!(operation, "{err}");
        self.notices.push_back(format!("Could not {operation}: {err}"));
    }

    fn log(&mut self, entry: &str) {
        for sink in &mut self.sinks {
            if let Err(e) = sink.append(entry) {
                tracing::error!(sink = %sink.name(), "log append failed: {e}");
            }
        }
    }
}
