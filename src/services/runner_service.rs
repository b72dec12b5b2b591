use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::models::answer::Answers;
use crate::models::question::{Question, QuestionType};
use crate::models::quiz::Quiz;
use crate::models::response::Response;
use crate::services::response_service::ResponseService;
use crate::services::template_service::TemplateService;
use crate::storage::{keys, load_json, save_json, SharedStore};

/// How a `fields` question decides it may be left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequiredFieldsPolicy {
    /// Passes when nothing is required or at least one required field has a value.
    #[default]
    AnyRequired,
    /// Passes only when every required field has a value.
    AllRequired,
}

/// Steps an end user through one quiz.
///
/// The step index is always within `[0, question_count)`. Step and answers are
/// written back after every change and picked up again by [`QuizRunner::start`]
/// for the same quiz; progress left by another quiz is discarded.
pub struct QuizRunner {
    store: SharedStore,
    responses: ResponseService,
    quiz: Quiz,
    step: usize,
    answers: Answers,
    policy: RequiredFieldsPolicy,
}

impl QuizRunner {
    pub fn start(store: SharedStore, quiz: Quiz) -> Result<Self> {
        if quiz.questions.is_empty() {
            return Err(Error::BadRequest(format!("Quiz {} has no questions", quiz.id)));
        }

        let resumes = load_json::<String>(store.as_ref(), keys::RUNNER_QUIZ_ID).as_deref() == Some(quiz.id.as_str());
        let (step, answers) = if resumes {
            let last = quiz.questions.len() - 1;
            let step = load_json::<usize>(store.as_ref(), keys::RUNNER_STEP)
                .unwrap_or(0)
                .min(last);
            let answers = match load_json::<BTreeMap<String, String>>(store.as_ref(), keys::RUNNER_ANSWERS) {
                Some(flat) => Answers::restore(&quiz, &flat),
                None => Answers::for_quiz(&quiz),
            };
            (step, answers)
        } else {
            (0, Answers::for_quiz(&quiz))
        };

        let runner = Self {
            responses: ResponseService::new(store.clone()),
            store,
            quiz,
            step,
            answers,
            policy: RequiredFieldsPolicy::default(),
        };
        runner.persist()?;
        Ok(runner)
    }

    /// Runs the first committed quiz, if there is one.
    pub fn from_active(store: SharedStore) -> Result<Option<Self>> {
        match TemplateService::new(store.clone()).active() {
            Some(quiz) => Self::start(store, quiz).map(Some),
            None => Ok(None),
        }
    }

    pub fn with_policy(mut self, policy: RequiredFieldsPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn question_count(&self) -> usize {
        self.quiz.questions.len()
    }

    pub fn current_question(&self) -> &Question {
        &self.quiz.questions[self.step]
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn is_first(&self) -> bool {
        self.step == 0
    }

    pub fn is_last(&self) -> bool {
        self.step + 1 == self.question_count()
    }

    /// Percentage of the quiz reached, counting the current step.
    pub fn progress(&self) -> f64 {
        (self.step + 1) as f64 / self.question_count() as f64 * 100.0
    }

    pub fn set_answer(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        self.answers.set(&self.quiz, key, value)?;
        self.persist_answers()
    }

    /// Whether the current step's required answers are present.
    pub fn can_proceed(&self) -> bool {
        let question = self.current_question();
        match question.question_type {
            QuestionType::Fields => {
                let mut required = question
                    .field_specs()
                    .iter()
                    .filter(|spec| spec.required)
                    .map(|spec| self.answers.is_filled(&spec.name))
                    .peekable();
                if required.peek().is_none() {
                    return true;
                }
                match self.policy {
                    RequiredFieldsPolicy::AnyRequired => required.any(|filled| filled),
                    RequiredFieldsPolicy::AllRequired => required.all(|filled| filled),
                }
            }
            QuestionType::Radio => question
                .field
                .as_deref()
                .and_then(|key| self.answers.value(key))
                .is_some_and(|value| !value.is_empty()),
            QuestionType::Text | QuestionType::Textarea => true,
        }
    }

    /// Moves forward one step. Returns `false` on the last step or when blocked.
    pub fn next(&mut self) -> Result<bool> {
        if self.is_last() || !self.can_proceed() {
            return Ok(false);
        }
        self.step += 1;
        self.persist_step()?;
        Ok(true)
    }

    /// Moves back one step without validating. Returns `false` on the first step.
    pub fn prev(&mut self) -> Result<bool> {
        if self.is_first() {
            return Ok(false);
        }
        self.step -= 1;
        self.persist_step()?;
        Ok(true)
    }

    /// Stores the answers as a response and starts over.
    ///
    /// `Ok(None)` means submission is not available yet: not on the last step,
    /// or the last step's required answers are missing.
    pub fn submit(&mut self) -> Result<Option<Response>> {
        if !self.is_last() || !self.can_proceed() {
            return Ok(None);
        }

        let response = self.responses.append(self.answers.to_json_map())?;
        tracing::info!(quiz_id = %self.quiz.id, response_id = response.id, "Quiz completed");

        self.step = 0;
        self.answers = Answers::for_quiz(&self.quiz);
        self.persist()?;
        Ok(Some(response))
    }

    fn persist(&self) -> Result<()> {
        save_json(self.store.as_ref(), keys::RUNNER_QUIZ_ID, &self.quiz.id)?;
        self.persist_step()?;
        self.persist_answers()
    }

    fn persist_step(&self) -> Result<()> {
        save_json(self.store.as_ref(), keys::RUNNER_STEP, &self.step)
    }

    fn persist_answers(&self) -> Result<()> {
        save_json(self.store.as_ref(), keys::RUNNER_ANSWERS, &self.answers.to_flat())
    }
}
