//! Post-processing chain applied to each page's OCR text.
//!
//! A chain is an ordered list of [`Stage`]s. Each stage receives the
//! previous stage's output. Pure stages cannot fail; remote stages may,
//! and then fall back to their own input so the chain always completes.

mod cleanup;
mod correction;
mod digits;

pub use cleanup::{WhitespaceCleanup, clean_text};
pub use correction::{CORRECTION_INSTRUCTION, LlmCorrector, Pricing, UsageSnapshot};
pub use digits::{DigitNormalization, normalize_digits};

use tracing::{debug, warn};

use crate::error::CorrectionError;

/// Tag identifying what a stage does; used for replace-by-kind registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    WhitespaceCleanup,
    DigitNormalization,
    LlmCorrection,
    Custom,
}

/// A deterministic `text -> text` transform.
pub trait TextTransform: Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> StageKind {
        StageKind::Custom
    }

    fn apply(&self, text: &str) -> String;
}

/// A transform backed by a remote call.
pub trait RemoteTransform: Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> StageKind;

    fn try_apply(&self, text: &str) -> Result<String, CorrectionError>;

    /// Output used when `try_apply` fails.
    fn fallback(&self, input: &str) -> String {
        input.to_string()
    }

    /// Cumulative usage, for transforms that meter their calls.
    fn usage(&self) -> Option<UsageSnapshot> {
        None
    }
}

/// One stage of a [`PostProcessingChain`].
pub enum Stage {
    Pure(Box<dyn TextTransform>),
    Remote(Box<dyn RemoteTransform>),
}

impl Stage {
    pub fn pure(transform: impl TextTransform + 'static) -> Self {
        Self::Pure(Box::new(transform))
    }

    pub fn remote(transform: impl RemoteTransform + 'static) -> Self {
        Self::Remote(Box::new(transform))
    }

    /// Wrap a plain function as a custom pure stage.
    pub fn custom<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self::Pure(Box::new(FnTransform {
            name: name.into(),
            f,
        }))
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Pure(t) => t.name(),
            Self::Remote(t) => t.name(),
        }
    }

    pub fn kind(&self) -> StageKind {
        match self {
            Self::Pure(t) => t.kind(),
            Self::Remote(t) => t.kind(),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Run the stage. Remote failures are logged and yield the fallback.
    pub fn run(&self, text: &str) -> String {
        match self {
            Self::Pure(t) => t.apply(text),
            Self::Remote(t) => match t.try_apply(text) {
                Ok(output) => output,
                Err(e) => {
                    warn!("Stage '{}' failed, keeping its input: {}", t.name(), e);
                    t.fallback(text)
                }
            },
        }
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("name", &self.name())
            .field("kind", &self.kind())
            .field("remote", &self.is_remote())
            .finish()
    }
}

struct FnTransform<F> {
    name: String,
    f: F,
}

impl<F> TextTransform for FnTransform<F>
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, text: &str) -> String {
        (self.f)(text)
    }
}

/// Ordered list of stages, executed strictly in registration order.
#[derive(Debug, Default)]
pub struct PostProcessingChain {
    stages: Vec<Stage>,
}

impl PostProcessingChain {
    /// Empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Chain with the two mandatory deterministic stages.
    pub fn with_defaults() -> Self {
        let mut chain = Self::new();
        chain.push(Stage::pure(WhitespaceCleanup));
        chain.push(Stage::pure(DigitNormalization));
        chain
    }

    /// Append a stage. An LLM correction stage replaces any earlier one.
    pub fn push(&mut self, stage: Stage) {
        if stage.kind() == StageKind::LlmCorrection {
            self.remove_kind(StageKind::LlmCorrection);
        }
        self.stages.push(stage);
    }

    /// Remove every stage of `stage.kind()` and append `stage`.
    pub fn replace_kind(&mut self, stage: Stage) {
        self.remove_kind(stage.kind());
        self.stages.push(stage);
    }

    /// Register the LLM correction stage, replacing any earlier one.
    pub fn set_llm_corrector(&mut self, corrector: LlmCorrector) {
        self.replace_kind(Stage::remote(corrector));
    }

    /// Remove all stages of a kind; returns how many were removed.
    pub fn remove_kind(&mut self, kind: StageKind) -> usize {
        let before = self.stages.len();
        self.stages.retain(|s| s.kind() != kind);
        before - self.stages.len()
    }

    pub fn contains(&self, kind: StageKind) -> bool {
        self.stages.iter().any(|s| s.kind() == kind)
    }

    /// The registered LLM corrector, if any.
    pub fn llm_corrector(&self) -> Option<&dyn RemoteTransform> {
        self.stages.iter().find_map(|s| match s {
            Stage::Remote(t) if t.kind() == StageKind::LlmCorrection => Some(t.as_ref()),
            _ => None,
        })
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(Stage::name).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage in order over `text`.
    pub fn apply(&self, text: &str) -> String {
        let mut current = text.to_string();

        for stage in &self.stages {
            let output = stage.run(&current);
            debug!(
                "Stage '{}': {} -> {} chars",
                stage.name(),
                current.chars().count(),
                output.chars().count()
            );
            current = output;
        }

        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Broken;

    impl RemoteTransform for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn kind(&self) -> StageKind {
            StageKind::LlmCorrection
        }

        fn try_apply(&self, _text: &str) -> Result<String, CorrectionError> {
            Err(CorrectionError::Transport("connection refused".into()))
        }
    }

    struct Upper;

    impl RemoteTransform for Upper {
        fn name(&self) -> &str {
            "upper"
        }

        fn kind(&self) -> StageKind {
            StageKind::LlmCorrection
        }

        fn try_apply(&self, text: &str) -> Result<String, CorrectionError> {
            Ok(text.to_uppercase())
        }
    }

    #[test]
    fn test_stages_run_in_order() {
        let mut chain = PostProcessingChain::new();
        chain.push(Stage::custom("append-a", |t| format!("{t}a")));
        chain.push(Stage::custom("append-b", |t| format!("{t}b")));

        assert_eq!(chain.apply("x"), "xab");
        assert_eq!(chain.stage_names(), vec!["append-a", "append-b"]);
    }

    #[test]
    fn test_defaults() {
        let chain = PostProcessingChain::with_defaults();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.apply("  ราคา   ๑๒๓  บาท \n"), "ราคา 123 บาท");
    }

    #[test]
    fn test_remote_failure_falls_back_to_input() {
        let mut chain = PostProcessingChain::new();
        chain.push(Stage::custom("tag", |t| format!("[{t}]")));
        chain.push(Stage::remote(Broken));

        assert_eq!(chain.apply("text"), "[text]");
    }

    #[test]
    fn test_replace_kind_keeps_single_llm_stage() {
        let mut chain = PostProcessingChain::with_defaults();
        chain.replace_kind(Stage::remote(Broken));
        chain.replace_kind(Stage::remote(Upper));

        assert_eq!(chain.len(), 3);
        assert_eq!(chain.llm_corrector().map(|t| t.name()), Some("upper"));
        assert_eq!(chain.apply(" abc "), "ABC");
    }

    #[test]
    fn test_push_keeps_single_llm_stage() {
        let mut chain = PostProcessingChain::with_defaults();
        chain.replace_kind(Stage::remote(Broken));
        chain.push(Stage::remote(Upper));
        chain.push(Stage::custom("tag", |t| format!("[{t}]")));

        assert_eq!(
            chain.stage_names(),
            vec!["whitespace_cleanup", "digit_normalization", "upper", "tag"]
        );
        assert_eq!(chain.apply(" abc "), "[ABC]");
    }

    #[test]
    fn test_custom_stages_accumulate() {
        let mut chain = PostProcessingChain::new();
        chain.push(Stage::custom("one", |t| format!("{t}1")));
        chain.push(Stage::custom("two", |t| format!("{t}2")));

        assert_eq!(chain.len(), 2);
        assert_eq!(chain.apply("x"), "x12");
    }

    #[test]
    fn test_remove_kind() {
        let mut chain = PostProcessingChain::with_defaults();
        chain.push(Stage::remote(Upper));

        assert_eq!(chain.remove_kind(StageKind::LlmCorrection), 1);
        assert!(!chain.contains(StageKind::LlmCorrection));
        assert!(chain.contains(StageKind::WhitespaceCleanup));
    }
}
