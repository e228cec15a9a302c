//! Story narration control.
//!
//! The actual text-to-speech engine is platform-provided; this module
//! owns the state around it and turns raw engine callbacks into the
//! three observer signals the presentation layer consumes.

/// Platform text-to-speech engine (external collaborator).
pub trait SpeechBackend {
    fn speak(&mut self, text: &str);
    fn pause(&mut self);
    fn resume(&mut self);
    fn cancel(&mut self);
}

/// Signals delivered to whoever watches a narration.
pub trait NarrationObserver {
    /// Reading progressed to `fraction` of the text, in `0.0..=1.0`.
    fn on_progress(&mut self, fraction: f64);
    /// The whole text was read. Fired at most once per `read_aloud`.
    fn on_completed(&mut self);
    /// Narration was cancelled before finishing.
    fn on_stopped(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrationState {
    Idle,
    Reading,
    Paused,
}

/// Drives a speech backend and tracks reading progress.
pub struct Narrator<B> {
    backend: B,
    state: NarrationState,
    text_len: usize,
    progress: f64,
    completed_fired: bool,
}

impl<B: SpeechBackend> Narrator<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: NarrationState::Idle,
            text_len: 0,
            progress: 0.0,
            completed_fired: false,
        }
    }

    #[must_use]
    pub fn state(&self) -> NarrationState {
        self.state
    }

    /// Fraction of the current text read so far.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    #[must_use]
    pub fn is_reading(&self) -> bool {
        self.state == NarrationState::Reading
    }

    /// Begin reading `text` from the top, cancelling any narration in
    /// flight. Empty text is ignored.
    pub fn read_aloud(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.state != NarrationState::Idle {
            self.backend.cancel();
        }
        self.text_len = text.chars().count();
        self.progress = 0.0;
        self.completed_fired = false;
        self.state = NarrationState::Reading;
        self.backend.speak(text);
    }

    /// Pause an active narration; a later `resume` picks up where the
    /// engine left off.
    pub fn pause(&mut self) {
        if self.state == NarrationState::Reading {
            self.backend.pause();
            self.state = NarrationState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == NarrationState::Paused {
            self.backend.resume();
            self.state = NarrationState::Reading;
        }
    }

    /// Cancel narration and reset progress to zero.
    pub fn stop(&mut self, observer: &mut impl NarrationObserver) {
        if self.state == NarrationState::Idle {
            return;
        }
        self.backend.cancel();
        self.state = NarrationState::Idle;
        self.progress = 0.0;
        observer.on_stopped();
    }

    /// Engine callback: the reader reached `char_index` in the text.
    pub fn boundary(&mut self, char_index: usize, observer: &mut impl NarrationObserver) {
        if self.state != NarrationState::Reading || self.text_len == 0 {
            return;
        }
        #[allow(clippy::cast_precision_loss)]
        let fraction = (char_index as f64 / self.text_len as f64).min(1.0);
        self.progress = fraction;
        observer.on_progress(fraction);
    }

    /// Engine callback: the utterance finished.
    pub fn finished(&mut self, observer: &mut impl NarrationObserver) {
        if self.state == NarrationState::Idle || self.completed_fired {
            return;
        }
        self.progress = 1.0;
        self.state = NarrationState::Idle;
        self.completed_fired = true;
        observer.on_progress(1.0);
        observer.on_completed();
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct ScriptedBackend {
        calls: Vec<&'static str>,
    }

    impl SpeechBackend for ScriptedBackend {
        fn speak(&mut self, _text: &str) {
            self.calls.push("speak");
        }
        fn pause(&mut self) {
            self.calls.push("pause");
        }
        fn resume(&mut self) {
            self.calls.push("resume");
        }
        fn cancel(&mut self) {
            self.calls.push("cancel");
        }
    }

    #[derive(Default)]
    struct Recorder {
        progress: Vec<f64>,
        completed: u32,
        stopped: u32,
    }

    impl NarrationObserver for Recorder {
        fn on_progress(&mut self, fraction: f64) {
            self.progress.push(fraction);
        }
        fn on_completed(&mut self) {
            self.completed += 1;
        }
        fn on_stopped(&mut self) {
            self.stopped += 1;
        }
    }

    #[test]
    fn boundaries_become_progress_fractions() {
        let mut narrator = Narrator::new(ScriptedBackend::default());
        let mut recorder = Recorder::default();

        narrator.read_aloud("once upon a time");
        narrator.boundary(4, &mut recorder);
        narrator.boundary(8, &mut recorder);
        narrator.finished(&mut recorder);

        assert_eq!(recorder.progress.len(), 3);
        assert!(recorder.progress[0] < recorder.progress[1]);
        assert_eq!(recorder.progress[2], 1.0);
        assert_eq!(recorder.completed, 1);
        assert_eq!(recorder.stopped, 0);
    }

    #[test]
    fn completion_fires_exactly_once() {
        let mut narrator = Narrator::new(ScriptedBackend::default());
        let mut recorder = Recorder::default();

        narrator.read_aloud("short story");
        narrator.finished(&mut recorder);
        narrator.finished(&mut recorder);
        assert_eq!(recorder.completed, 1);
    }

    #[test]
    fn stop_cancels_and_resets_progress() {
        let mut narrator = Narrator::new(ScriptedBackend::default());
        let mut recorder = Recorder::default();

        narrator.read_aloud("a long story about a dragon");
        narrator.boundary(10, &mut recorder);
        narrator.stop(&mut recorder);

        assert_eq!(recorder.stopped, 1);
        assert_eq!(narrator.progress(), 0.0);
        assert_eq!(narrator.state(), NarrationState::Idle);
        // Late engine callbacks after a stop are ignored.
        narrator.boundary(20, &mut recorder);
        narrator.finished(&mut recorder);
        assert_eq!(recorder.completed, 0);
    }

    #[test]
    fn pause_and_resume_track_state() {
        let mut narrator = Narrator::new(ScriptedBackend::default());

        narrator.read_aloud("story");
        narrator.pause();
        assert_eq!(narrator.state(), NarrationState::Paused);
        narrator.resume();
        assert!(narrator.is_reading());
    }

    #[test]
    fn empty_text_is_ignored() {
        let mut narrator = Narrator::new(ScriptedBackend::default());
        narrator.read_aloud("");
        assert_eq!(narrator.state(), NarrationState::Idle);
    }
}
