//! Create-post workflow
//!
//! One `CreateSession` per create flow. The session owns the draft and walks a
//! single state enum; each network phase is split into a begin/complete pair
//! so every transition and guard is observable without I/O, with async driver
//! methods wiring the pairs to the API clients.
//!
//! Known simplifications, kept deliberately: there is no cancellation, so a
//! slow generation outcome is applied even if the prompt was edited while the
//! call was in flight, and editing the prompt does not clear a previously
//! generated photo.

use thiserror::Error;
use tracing::{debug, info};

use crate::api::{ImageGenerator, Post, PostPublisher};
use crate::catalog;

/// Workflow states. Exactly one is active at a time; `Generating` and
/// `Submitting` are the busy states during which no other operation may start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateState {
    Idle,
    Generating,
    Ready,
    Submitting,
    Done,
}

impl CreateState {
    pub fn is_busy(self) -> bool {
        matches!(self, CreateState::Generating | CreateState::Submitting)
    }
}

/// Workflow errors. `Validation` is detected locally before any network call;
/// `Generation` and `Submission` wrap the opaque failure message from the
/// respective service; `InvalidTransition` rejects operations that the current
/// state does not permit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Image generation failed: {0}")]
    Generation(String),
    #[error("Publish failed: {0}")]
    Submission(String),
    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),
}

/// The in-progress, not-yet-published content unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub author_name: String,
    pub prompt: String,
    pub photo: Option<String>,
}

/// Payload for the publish call, assembled by `begin_submission`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub prompt: String,
    pub photo: String,
}

/// Hook fired exactly once when a post reaches the gallery; the surrounding
/// shell uses it to navigate back to the community showcase.
pub type PublishedHook = Box<dyn FnMut(&Post) + Send>;

/// Owns one draft and drives it through generation and publication.
pub struct CreateSession {
    state: CreateState,
    draft: Draft,
    published_id: Option<String>,
    on_published: Option<PublishedHook>,
}

impl CreateSession {
    pub fn new() -> Self {
        Self {
            state: CreateState::Idle,
            draft: Draft::default(),
            published_id: None,
            on_published: None,
        }
    }

    /// Register the navigation hook fired once on successful publication.
    pub fn on_published(&mut self, hook: PublishedHook) {
        self.on_published = Some(hook);
    }

    pub fn state(&self) -> CreateState {
        self.state
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Identifier of the stored record, set when the session reaches `Done`.
    pub fn published_id(&self) -> Option<&str> {
        self.published_id.as_deref()
    }

    fn ensure_interactive(&self, operation: &str) -> Result<(), CreateError> {
        if self.state.is_busy() {
            return Err(CreateError::InvalidTransition(format!(
                "Cannot {} while {:?} is in progress",
                operation, self.state
            )));
        }
        if self.state == CreateState::Done {
            return Err(CreateError::InvalidTransition(format!(
                "Cannot {} after the post was published",
                operation
            )));
        }
        Ok(())
    }

    /// Update the author name. Allowed whenever no call is in flight.
    pub fn set_author_name(&mut self, value: &str) -> Result<(), CreateError> {
        self.ensure_interactive("edit the draft")?;
        self.draft.author_name = value.to_string();
        Ok(())
    }

    /// Update the prompt. A photo obtained earlier stays on the draft.
    pub fn set_prompt(&mut self, value: &str) -> Result<(), CreateError> {
        self.ensure_interactive("edit the draft")?;
        self.draft.prompt = value.to_string();
        Ok(())
    }

    /// Replace the prompt with a catalog pick distinct from the current one.
    /// No network effect.
    pub fn surprise_me(&mut self) -> Result<&str, CreateError> {
        self.ensure_interactive("pick a surprise prompt")?;
        let picked = catalog::surprise_prompt(&self.draft.prompt);
        debug!("Surprise prompt picked: {}", picked);
        self.draft.prompt = picked.to_string();
        Ok(picked)
    }

    /// First half of generation: validate the draft and enter `Generating`.
    /// Returns the trimmed prompt to send to the generation service.
    pub fn begin_generation(&mut self) -> Result<String, CreateError> {
        self.ensure_interactive("start generation")?;
        let prompt = self.draft.prompt.trim();
        if prompt.is_empty() {
            return Err(CreateError::Validation("prompt required".to_string()));
        }
        debug!("Entering Generating");
        self.state = CreateState::Generating;
        Ok(prompt.to_string())
    }

    /// Second half of generation: apply the settled outcome.
    ///
    /// Success stores the photo URL and enters `Ready`. Failure returns the
    /// session to its pre-call state (`Idle`, or `Ready` when a photo from an
    /// earlier generation exists) and reports the message exactly once.
    pub fn complete_generation(
        &mut self,
        outcome: Result<String, String>,
    ) -> Result<(), CreateError> {
        if self.state != CreateState::Generating {
            return Err(CreateError::InvalidTransition(format!(
                "No generation in flight (state {:?})",
                self.state
            )));
        }
        match outcome {
            Ok(photo) => {
                info!("Image generated ({} chars)", photo.len());
                self.draft.photo = Some(photo);
                self.state = CreateState::Ready;
                Ok(())
            }
            Err(message) => {
                self.state = if self.draft.photo.is_some() {
                    CreateState::Ready
                } else {
                    CreateState::Idle
                };
                Err(CreateError::Generation(message))
            }
        }
    }

    /// First half of submission: validate the draft and enter `Submitting`.
    /// Requires a non-empty trimmed prompt and a generated photo.
    pub fn begin_submission(&mut self) -> Result<Submission, CreateError> {
        self.ensure_interactive("start submission")?;
        let prompt = self.draft.prompt.trim();
        let photo = self.draft.photo.as_deref().unwrap_or("");
        if prompt.is_empty() || photo.is_empty() {
            return Err(CreateError::Validation(
                "prompt and image required".to_string(),
            ));
        }
        debug!("Entering Submitting");
        self.state = CreateState::Submitting;
        Ok(Submission {
            name: self.draft.author_name.trim().to_string(),
            prompt: prompt.to_string(),
            photo: photo.to_string(),
        })
    }

    /// Second half of submission: apply the settled outcome.
    ///
    /// Success enters the terminal `Done` state and fires the navigation hook
    /// exactly once. Failure returns to `Ready` without touching the photo.
    pub fn complete_submission(
        &mut self,
        outcome: Result<Post, String>,
    ) -> Result<(), CreateError> {
        if self.state != CreateState::Submitting {
            return Err(CreateError::InvalidTransition(format!(
                "No submission in flight (state {:?})",
                self.state
            )));
        }
        match outcome {
            Ok(post) => {
                info!(post_id = %post.id, "Post published to the gallery");
                self.published_id = Some(post.id.clone());
                self.state = CreateState::Done;
                if let Some(hook) = self.on_published.as_mut() {
                    hook(&post);
                }
                Ok(())
            }
            Err(message) => {
                self.state = CreateState::Ready;
                Err(CreateError::Submission(message))
            }
        }
    }

    /// Run the full generation phase against a generation client.
    pub async fn generate(&mut self, client: &dyn ImageGenerator) -> Result<(), CreateError> {
        let prompt = self.begin_generation()?;
        let outcome = client.generate_image(&prompt).await;
        self.complete_generation(outcome)
    }

    /// Run the full submission phase against a publisher client.
    pub async fn publish(&mut self, client: &dyn PostPublisher) -> Result<(), CreateError> {
        let submission = self.begin_submission()?;
        let outcome = client
            .publish_post(&submission.name, &submission.prompt, &submission.photo)
            .await;
        self.complete_submission(outcome)
    }
}

impl Default for CreateSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SURPRISE_PROMPTS;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StubGenerator {
        outcome: Result<String, String>,
        calls: AtomicUsize,
    }

    impl StubGenerator {
        fn succeeding(photo: &str) -> Self {
            Self {
                outcome: Ok(photo.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                outcome: Err(message.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ImageGenerator for StubGenerator {
        async fn generate_image(&self, _prompt: &str) -> Result<String, String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    struct StubPublisher {
        outcome: Result<Post, String>,
        calls: AtomicUsize,
    }

    impl StubPublisher {
        fn succeeding() -> Self {
            Self {
                outcome: Ok(sample_post()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                outcome: Err(message.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PostPublisher for StubPublisher {
        async fn publish_post(
            &self,
            _name: &str,
            _prompt: &str,
            _photo: &str,
        ) -> Result<Post, String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    fn sample_post() -> Post {
        Post {
            id: "post-1".to_string(),
            name: "Ann".to_string(),
            prompt: "a cat".to_string(),
            photo: "http://x/img.png".to_string(),
            created_at: Some("2026-01-01T00:00:00Z".to_string()),
        }
    }

    fn ready_session() -> CreateSession {
        let mut session = CreateSession::new();
        session.set_author_name("Ann").unwrap();
        session.set_prompt("a cat").unwrap();
        session.begin_generation().unwrap();
        session
            .complete_generation(Ok("http://x/img.png".to_string()))
            .unwrap();
        session
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = CreateSession::new();
        assert_eq!(session.state(), CreateState::Idle);
        assert!(session.draft().photo.is_none());
        assert!(session.published_id().is_none());
    }

    #[test]
    fn test_field_updates_are_idempotent() {
        let mut once = CreateSession::new();
        once.set_author_name("Ann").unwrap();

        let mut twice = CreateSession::new();
        twice.set_author_name("Ann").unwrap();
        twice.set_author_name("Ann").unwrap();

        assert_eq!(once.draft(), twice.draft());
    }

    #[test]
    fn test_surprise_me_picks_distinct_catalog_prompt() {
        let mut session = CreateSession::new();
        session.set_prompt(SURPRISE_PROMPTS[0]).unwrap();
        for _ in 0..10 {
            let before = session.draft().prompt.clone();
            let picked = session.surprise_me().unwrap().to_string();
            assert_ne!(picked, before);
            assert!(SURPRISE_PROMPTS.contains(&picked.as_str()));
            assert_eq!(session.draft().prompt, picked);
        }
    }

    #[tokio::test]
    async fn test_generation_requires_prompt() {
        let mut session = CreateSession::new();
        session.set_prompt("   ").unwrap();
        let generator = StubGenerator::succeeding("http://x/img.png");

        let result = session.generate(&generator).await;

        assert_eq!(
            result,
            Err(CreateError::Validation("prompt required".to_string()))
        );
        assert_eq!(session.state(), CreateState::Idle);
        assert_eq!(generator.call_count(), 0);
    }

    #[test]
    fn test_generation_success_transitions_idle_generating_ready() {
        let mut session = CreateSession::new();
        session.set_prompt("a cat").unwrap();

        let prompt = session.begin_generation().unwrap();
        assert_eq!(prompt, "a cat");
        assert_eq!(session.state(), CreateState::Generating);

        session
            .complete_generation(Ok("http://x/img.png".to_string()))
            .unwrap();
        assert_eq!(session.state(), CreateState::Ready);
        assert_eq!(session.draft().photo.as_deref(), Some("http://x/img.png"));
    }

    #[test]
    fn test_begin_generation_trims_prompt() {
        let mut session = CreateSession::new();
        session.set_prompt("  a cat  ").unwrap();
        assert_eq!(session.begin_generation().unwrap(), "a cat");
    }

    #[tokio::test]
    async fn test_generation_failure_surfaced_once_and_returns_to_idle() {
        let mut session = CreateSession::new();
        session.set_prompt("a cat").unwrap();
        let generator = StubGenerator::failing("rate limited");

        let result = session.generate(&generator).await;

        assert_eq!(
            result,
            Err(CreateError::Generation("rate limited".to_string()))
        );
        assert_eq!(session.state(), CreateState::Idle);
        assert!(session.draft().photo.is_none());
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_generation_failure_with_prior_photo_returns_to_ready() {
        let mut session = ready_session();
        let generator = StubGenerator::failing("rate limited");

        let result = session.generate(&generator).await;

        assert!(matches!(result, Err(CreateError::Generation(_))));
        assert_eq!(session.state(), CreateState::Ready);
        assert_eq!(session.draft().photo.as_deref(), Some("http://x/img.png"));
    }

    #[test]
    fn test_busy_state_rejects_all_operations() {
        let mut session = CreateSession::new();
        session.set_prompt("a cat").unwrap();
        session.begin_generation().unwrap();

        assert!(matches!(
            session.begin_generation(),
            Err(CreateError::InvalidTransition(_))
        ));
        assert!(matches!(
            session.begin_submission(),
            Err(CreateError::InvalidTransition(_))
        ));
        assert!(matches!(
            session.set_prompt("another"),
            Err(CreateError::InvalidTransition(_))
        ));
        assert!(matches!(
            session.surprise_me(),
            Err(CreateError::InvalidTransition(_))
        ));
        assert_eq!(session.state(), CreateState::Generating);
    }

    #[tokio::test]
    async fn test_submission_requires_photo() {
        let mut session = CreateSession::new();
        session.set_author_name("Ann").unwrap();
        session.set_prompt("a cat").unwrap();
        let publisher = StubPublisher::succeeding();

        let result = session.publish(&publisher).await;

        assert_eq!(
            result,
            Err(CreateError::Validation(
                "prompt and image required".to_string()
            ))
        );
        assert_eq!(session.state(), CreateState::Idle);
        assert_eq!(publisher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_submission_success_fires_navigation_exactly_once() {
        let mut session = ready_session();
        let navigations = Arc::new(AtomicUsize::new(0));
        let counter = navigations.clone();
        session.on_published(Box::new(move |_post| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        let publisher = StubPublisher::succeeding();

        session.publish(&publisher).await.unwrap();

        assert_eq!(session.state(), CreateState::Done);
        assert_eq!(session.published_id(), Some("post-1"));
        assert_eq!(navigations.load(Ordering::SeqCst), 1);
        assert_eq!(publisher.call_count(), 1);
    }

    #[tokio::test]
    async fn test_submission_failure_returns_to_ready_and_keeps_photo() {
        let mut session = ready_session();
        let publisher = StubPublisher::failing("storage unavailable");

        let result = session.publish(&publisher).await;

        assert_eq!(
            result,
            Err(CreateError::Submission("storage unavailable".to_string()))
        );
        assert_eq!(session.state(), CreateState::Ready);
        assert_eq!(session.draft().photo.as_deref(), Some("http://x/img.png"));
        assert!(session.published_id().is_none());
    }

    #[test]
    fn test_submission_payload_uses_trimmed_fields() {
        let mut session = CreateSession::new();
        session.set_author_name("  Ann  ").unwrap();
        session.set_prompt("  a cat  ").unwrap();
        session.begin_generation().unwrap();
        session
            .complete_generation(Ok("http://x/img.png".to_string()))
            .unwrap();

        let submission = session.begin_submission().unwrap();
        assert_eq!(submission.name, "Ann");
        assert_eq!(submission.prompt, "a cat");
        assert_eq!(submission.photo, "http://x/img.png");
    }

    #[test]
    fn test_complete_without_begin_is_rejected() {
        let mut session = CreateSession::new();
        assert!(matches!(
            session.complete_generation(Ok("http://x/img.png".to_string())),
            Err(CreateError::InvalidTransition(_))
        ));
        assert!(matches!(
            session.complete_submission(Ok(sample_post())),
            Err(CreateError::InvalidTransition(_))
        ));
    }

    #[test]
    fn test_done_is_terminal() {
        let mut session = ready_session();
        session.begin_submission().unwrap();
        session.complete_submission(Ok(sample_post())).unwrap();

        assert!(matches!(
            session.set_prompt("another"),
            Err(CreateError::InvalidTransition(_))
        ));
        assert!(matches!(
            session.begin_generation(),
            Err(CreateError::InvalidTransition(_))
        ));
        assert!(matches!(
            session.begin_submission(),
            Err(CreateError::InvalidTransition(_))
        ));
    }

    #[test]
    fn test_prompt_edit_keeps_existing_photo() {
        let mut session = ready_session();
        session.set_prompt("something else entirely").unwrap();
        assert_eq!(session.draft().photo.as_deref(), Some("http://x/img.png"));
        assert_eq!(session.state(), CreateState::Ready);
    }
}
