//! Story session state and orchestration.
//!
//! [`StoryState`] is an immutable snapshot of everything the shell renders:
//! the loaded image, the generated story and analysis, the chat transcript,
//! and the in-flight flags. [`StorySession`] drives the state through a
//! provider and an audio sink, applying the fallback contract so that
//! provider failures surface as fixed strings instead of errors.

use tracing::warn;

use crate::audio::NarrationProvider;
use crate::chat::{CHAT_FALLBACK, ChatProvider};
use crate::image::ImageData;
use crate::message::Message;
use crate::playback::{AudioSink, PlaybackHandle};
use crate::story::StoryProvider;

/// Snapshot of a story session.
///
/// Transitions return a new snapshot; the previous one stays valid, so the
/// shell can render a stale view while an operation is in flight.
#[derive(Debug, Clone, Default)]
pub struct StoryState {
    image: Option<ImageData>,
    story: String,
    analysis: String,
    generating: bool,
    narrating: bool,
    transcript: Vec<Message>,
}

impl StoryState {
    /// An empty session with nothing loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The loaded image, if any.
    #[must_use]
    pub const fn image(&self) -> Option<&ImageData> {
        self.image.as_ref()
    }

    /// The generated story passage.
    #[must_use]
    pub fn story(&self) -> &str {
        &self.story
    }

    /// The generated technical analysis.
    #[must_use]
    pub fn analysis(&self) -> &str {
        &self.analysis
    }

    /// Whether a generation request is in flight.
    #[must_use]
    pub const fn is_generating(&self) -> bool {
        self.generating
    }

    /// Whether narration audio is playing or being synthesized.
    #[must_use]
    pub const fn is_narrating(&self) -> bool {
        self.narrating
    }

    /// The chat transcript, oldest turn first.
    #[must_use]
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Whether a story has been generated.
    #[must_use]
    pub fn has_story(&self) -> bool {
        !self.story.is_empty()
    }

    /// Load a new image, discarding the previous story, analysis, and chat.
    #[must_use]
    pub fn with_image(self, image: ImageData) -> Self {
        Self {
            image: Some(image),
            generating: self.generating,
            ..Self::default()
        }
    }

    /// Mark a generation request as started.
    #[must_use]
    pub fn begin_generation(mut self) -> Self {
        self.generating = true;
        self
    }

    /// Record a completed generation.
    #[must_use]
    pub fn finish_generation(mut self, story: String, analysis: String) -> Self {
        self.story = story;
        self.analysis = analysis;
        self.generating = false;
        self
    }

    /// Clear the in-flight flag after a failed generation.
    #[must_use]
    pub fn abort_generation(mut self) -> Self {
        self.generating = false;
        self
    }

    /// Mark narration as active.
    #[must_use]
    pub fn begin_narration(mut self) -> Self {
        self.narrating = true;
        self
    }

    /// Mark narration as stopped or finished.
    #[must_use]
    pub fn end_narration(mut self) -> Self {
        self.narrating = false;
        self
    }

    /// Append a completed chat turn to the transcript.
    #[must_use]
    pub fn with_turn(mut self, question: &str, answer: &str) -> Self {
        self.transcript.push(Message::user(question));
        self.transcript.push(Message::model(answer));
        self
    }

    /// The story context block prepended to every chat question.
    #[must_use]
    pub fn chat_context(&self) -> String {
        format!(
            "Image Analysis: {}\n\nOpening Passage: {}",
            self.analysis, self.story
        )
    }
}

/// Drives a story session against a provider and an audio sink.
///
/// The provider supplies generation, chat, and narration; the sink plays
/// decoded narration audio. All provider failures are logged and absorbed
/// into the fallback contract so the session never surfaces an error to
/// the shell.
#[derive(Debug)]
pub struct StorySession<P, S> {
    provider: P,
    sink: S,
    state: StoryState,
    playback: Option<PlaybackHandle>,
}

impl<P, S> StorySession<P, S>
where
    P: StoryProvider + ChatProvider + NarrationProvider,
    S: AudioSink,
{
    /// Create a session with an empty state.
    pub fn new(provider: P, sink: S) -> Self {
        Self {
            provider,
            sink,
            state: StoryState::new(),
            playback: None,
        }
    }

    /// The current state snapshot.
    pub const fn state(&self) -> &StoryState {
        &self.state
    }

    /// The underlying provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// The underlying audio sink.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Load an image, discarding any previous story and chat. Any playing
    /// narration is stopped.
    pub fn load_image(&mut self, image: ImageData) {
        self.stop_narration();
        self.state = self.state.clone().with_image(image);
    }

    /// Generate the story and analysis for the loaded image.
    ///
    /// Does nothing when no image is loaded. On failure the in-flight flag
    /// is cleared and the previous story is kept.
    pub async fn generate(&mut self) {
        let Some(image) = self.state.image().cloned() else {
            return;
        };

        self.state = self.state.clone().begin_generation();
        match self.provider.analyze_and_write(&image).await {
            Ok(parts) => {
                self.state = self
                    .state
                    .clone()
                    .finish_generation(parts.story, parts.analysis);
            }
            Err(error) => {
                warn!(%error, "story generation failed");
                self.state = self.state.clone().abort_generation();
            }
        }
    }

    /// Ask a question about the story world.
    ///
    /// The question is wrapped with the story context and sent with an
    /// empty history; each turn stands alone and the transcript is kept
    /// only for display. Failures return the fixed fallback reply. An
    /// empty or whitespace question returns an empty string and records
    /// nothing.
    pub async fn ask(&mut self, question: &str) -> String {
        let question = question.trim();
        if question.is_empty() {
            return String::new();
        }

        let prompt = format!(
            "Context: {}\n\nUser Question: {question}",
            self.state.chat_context()
        );

        let answer = match self.provider.chat(&[], &prompt).await {
            Ok(answer) => answer,
            Err(error) => {
                warn!(%error, "chat turn failed");
                CHAT_FALLBACK.to_owned()
            }
        };

        self.state = self.state.clone().with_turn(question, &answer);
        answer
    }

    /// Toggle narration of the current story.
    ///
    /// Starts synthesis and playback when idle; stops playback when active.
    /// Does nothing when no story has been generated. Synthesis or decode
    /// failures, and a provider response with no audio, leave the session
    /// silent with the narration flag cleared.
    pub async fn narrate(&mut self) {
        if self.state.is_narrating() {
            self.stop_narration();
            return;
        }
        if !self.state.has_story() {
            return;
        }

        self.state = self.state.clone().begin_narration();
        let story = self.state.story().to_owned();

        let clip = match self.provider.narrate(&story).await {
            Ok(Some(clip)) => clip,
            Ok(None) => {
                warn!("narration response carried no audio");
                self.state = self.state.clone().end_narration();
                return;
            }
            Err(error) => {
                warn!(%error, "narration synthesis failed");
                self.state = self.state.clone().end_narration();
                return;
            }
        };

        let buffer = match clip.decode() {
            Ok(buffer) => buffer,
            Err(error) => {
                warn!(%error, "narration audio decode failed");
                self.state = self.state.clone().end_narration();
                return;
            }
        };

        match self.sink.play(buffer) {
            Ok(handle) => self.playback = Some(handle),
            Err(error) => {
                warn!(%error, "narration playback failed");
                self.state = self.state.clone().end_narration();
            }
        }
    }

    /// Stop any playing narration and release its audio resource.
    pub fn stop_narration(&mut self) {
        if let Some(mut handle) = self.playback.take() {
            handle.stop();
        }
        if self.state.is_narrating() {
            self.state = self.state.clone().end_narration();
        }
    }

    /// Clear the narration flag if playback has finished on its own.
    pub fn poll_narration(&mut self) {
        if let Some(handle) = self.playback.as_mut()
            && handle.is_finished()
        {
            self.playback = None;
            self.state = self.state.clone().end_narration();
        }
    }

    /// Wait for the current narration to finish, then clear the flag.
    pub async fn finish_narration(&mut self) {
        if let Some(handle) = self.playback.take() {
            handle.wait().await;
            self.state = self.state.clone().end_narration();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::image::{ImageData, ImageFormat};

    fn image() -> ImageData {
        ImageData::from_base64("aGVsbG8=", ImageFormat::Png)
    }

    #[test]
    fn new_image_discards_story_and_chat() {
        let state = StoryState::new()
            .with_image(image())
            .finish_generation("story".into(), "analysis".into())
            .with_turn("q", "a");

        let state = state.with_image(image());
        assert!(state.story().is_empty());
        assert!(state.analysis().is_empty());
        assert!(state.transcript().is_empty());
        assert!(state.image().is_some());
    }

    #[test]
    fn chat_context_format() {
        let state = StoryState::new()
            .with_image(image())
            .finish_generation("Once upon a time.".into(), "Wide shot.".into());

        assert_eq!(
            state.chat_context(),
            "Image Analysis: Wide shot.\n\nOpening Passage: Once upon a time."
        );
    }

    #[test]
    fn generation_flags() {
        let state = StoryState::new().with_image(image()).begin_generation();
        assert!(state.is_generating());

        let done = state.clone().finish_generation("s".into(), "a".into());
        assert!(!done.is_generating());
        assert!(done.has_story());

        let aborted = state.abort_generation();
        assert!(!aborted.is_generating());
        assert!(!aborted.has_story());
    }

    #[test]
    fn transcript_records_turn_order() {
        let state = StoryState::new().with_turn("question", "answer");
        let transcript = state.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].text, "question");
        assert_eq!(transcript[1].text, "answer");
    }
}
