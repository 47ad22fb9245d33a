//! Quiz session - walking through a quiz one slide at a time.
//!
//! A session only tracks the flow through the slides. Awarding points is
//! the progress store's job once the session reports [`SessionStep::Finished`].

use crate::catalog::{Quiz, QuizSlide};

/// Errors raised while answering a quiz.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    /// Tried to move on without picking an answer
    #[error("please select an answer")]
    NoAnswerSelected,

    /// The slide already has an answer; results are showing
    #[error("an answer was already selected for this question")]
    AnswerAlreadySelected,

    /// The option index does not exist on this slide
    #[error("option {index} is out of range (slide has {count} options)")]
    OptionOutOfRange {
        /// Requested option
        index: usize,
        /// Options on the slide
        count: usize,
    },
}

/// What the learner sees after picking an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerFeedback {
    /// The option that was picked
    pub selected: usize,

    /// The right option
    pub correct: usize,
}

impl AnswerFeedback {
    /// Whether the pick was right.
    pub fn is_correct(&self) -> bool {
        self.selected == self.correct
    }
}

/// Result of moving past a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStep {
    /// Moved to the slide at this index
    Advanced {
        /// New slide index
        slide: usize,
    },
    /// Last slide answered
    Finished {
        /// Slides answered correctly
        correct_answers: usize,
        /// Slides in the quiz
        total: usize,
    },
}

/// An in-progress run through one quiz.
#[derive(Debug, Clone)]
pub struct QuizSession<'a> {
    quiz: &'a Quiz,
    slide: usize,
    selected: Option<usize>,
    correct_answers: usize,
}

impl<'a> QuizSession<'a> {
    /// Start at the first slide.
    pub fn new(quiz: &'a Quiz) -> Self {
        Self {
            quiz,
            slide: 0,
            selected: None,
            correct_answers: 0,
        }
    }

    /// The quiz being answered.
    pub fn quiz(&self) -> &'a Quiz {
        self.quiz
    }

    /// Index of the slide being shown.
    pub fn slide_index(&self) -> usize {
        self.slide
    }

    /// Number of slides in the quiz.
    pub fn slide_count(&self) -> usize {
        self.quiz.slides.len()
    }

    /// The slide being shown, if the quiz has any.
    pub fn current_slide(&self) -> Option<&'a QuizSlide> {
        self.quiz.slides.get(self.slide)
    }

    /// Option picked on the current slide.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Whether the current slide is the last one.
    pub fn is_last_slide(&self) -> bool {
        self.slide + 1 >= self.slide_count()
    }

    /// Fraction of slides reached so far, counting the current one.
    pub fn progress(&self) -> f32 {
        if self.slide_count() == 0 {
            return 1.0;
        }
        (self.slide + 1) as f32 / self.slide_count() as f32
    }

    /// Pick an option on the current slide. Only the first pick counts.
    pub fn select_answer(&mut self, index: usize) -> Result<AnswerFeedback, QuizError> {
        if self.selected.is_some() {
            return Err(QuizError::AnswerAlreadySelected);
        }
        let slide = self
            .current_slide()
            .ok_or(QuizError::OptionOutOfRange { index, count: 0 })?;
        if index >= slide.options.len() {
            return Err(QuizError::OptionOutOfRange {
                index,
                count: slide.options.len(),
            });
        }

        self.selected = Some(index);
        if index == slide.correct {
            self.correct_answers += 1;
        }

        Ok(AnswerFeedback {
            selected: index,
            correct: slide.correct,
        })
    }

    /// Move past the current slide.
    pub fn next(&mut self) -> Result<SessionStep, QuizError> {
        if self.selected.is_none() {
            return Err(QuizError::NoAnswerSelected);
        }

        if self.is_last_slide() {
            return Ok(SessionStep::Finished {
                correct_answers: self.correct_answers,
                total: self.slide_count(),
            });
        }

        self.slide += 1;
        self.selected = None;
        Ok(SessionStep::Advanced { slide: self.slide })
    }
}
