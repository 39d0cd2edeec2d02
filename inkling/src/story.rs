//! Story generation contract: prompt, response splitting, fallbacks.
//!
//! The analyze-and-write operation asks the model for a story passage and a
//! technical analysis in one response, separated by a literal `---`.
//! [`StoryParts::from_response`] implements the parsing contract, including
//! the fixed fallback strings used when either side is absent.

use async_trait::async_trait;

use crate::error::Result;
use crate::image::ImageData;

/// Instructional prompt sent with the uploaded image.
pub const STORY_PROMPT: &str = "Analyze this image's mood, setting, and characters. Then, write a single, atmospheric opening paragraph (about 100-150 words) for a story set in this world. \n  The tone should be immersive and literary. Start directly with the story text. After the story, add a separator \"---\" and then provide a brief technical analysis of the scene's mood and key elements for my creative context.";

/// Fallback story text when the response carries no story.
pub const STORY_FALLBACK: &str = "The image remained silent.";

/// Fallback analysis text when the response carries no analysis.
pub const ANALYSIS_FALLBACK: &str = "No specific analysis available.";

/// Delimiter separating the story passage from the technical analysis.
pub const STORY_DELIMITER: &str = "---";

/// A generated story passage and its technical analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryParts {
    /// The atmospheric opening passage.
    pub story: String,
    /// The technical analysis of the scene.
    pub analysis: String,
}

impl StoryParts {
    /// Split a raw model response into story and analysis.
    ///
    /// The text is split on the first occurrence of `---`; the part before
    /// is the story, the part after is the analysis, both trimmed. A missing
    /// delimiter or an empty-after-trim side substitutes the fixed fallback
    /// string for that side.
    #[must_use]
    pub fn from_response(text: &str) -> Self {
        let (story, analysis) = match text.split_once(STORY_DELIMITER) {
            Some((before, after)) => (before.trim(), after.trim()),
            None => ("", ""),
        };

        Self {
            story: if story.is_empty() {
                STORY_FALLBACK.to_owned()
            } else {
                story.to_owned()
            },
            analysis: if analysis.is_empty() {
                ANALYSIS_FALLBACK.to_owned()
            } else {
                analysis.to_owned()
            },
        }
    }
}

/// Provider of the analyze-and-write operation.
#[async_trait]
pub trait StoryProvider: Send + Sync {
    /// Analyze an image and write a story opening with a technical analysis.
    async fn analyze_and_write(&self, image: &ImageData) -> Result<StoryParts>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_delimiter() {
        let parts = StoryParts::from_response("Once upon a time.---Mood: eerie.");
        assert_eq!(parts.story, "Once upon a time.");
        assert_eq!(parts.analysis, "Mood: eerie.");
    }

    #[test]
    fn trims_both_sides() {
        let parts = StoryParts::from_response("  A story.  \n---\n  The analysis.  ");
        assert_eq!(parts.story, "A story.");
        assert_eq!(parts.analysis, "The analysis.");
    }

    #[test]
    fn splits_on_first_delimiter_only() {
        let parts = StoryParts::from_response("Story---Analysis---with dashes");
        assert_eq!(parts.story, "Story");
        assert_eq!(parts.analysis, "Analysis---with dashes");
    }

    #[test]
    fn missing_delimiter_yields_both_fallbacks() {
        let parts = StoryParts::from_response("Just some prose with no separator.");
        assert_eq!(parts.story, STORY_FALLBACK);
        assert_eq!(parts.analysis, ANALYSIS_FALLBACK);
    }

    #[test]
    fn empty_response_yields_both_fallbacks() {
        let parts = StoryParts::from_response("");
        assert_eq!(parts.story, STORY_FALLBACK);
        assert_eq!(parts.analysis, ANALYSIS_FALLBACK);
    }

    #[test]
    fn empty_story_side_falls_back() {
        let parts = StoryParts::from_response("---Mood: bright.");
        assert_eq!(parts.story, STORY_FALLBACK);
        assert_eq!(parts.analysis, "Mood: bright.");
    }

    #[test]
    fn empty_analysis_side_falls_back() {
        let parts = StoryParts::from_response("The fog rolled in.---   ");
        assert_eq!(parts.story, "The fog rolled in.");
        assert_eq!(parts.analysis, ANALYSIS_FALLBACK);
    }
}
