use rand::{seq::SliceRandom, Rng};

use crate::api::{Question, QuizSet};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

/// One run through a quiz, with answers shuffled once at the start
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QuizAttempt {
    questions: Vec<Question>,
    selected: Vec<Option<usize>>,
    submitted: bool,
}

impl QuizAttempt {
    pub fn new<R: Rng + ?Sized>(quiz: &QuizSet, rng: &mut R) -> QuizAttempt {
        let questions = quiz
            .questions
            .iter()
            .cloned()
            .map(|mut q| {
                q.answers.shuffle(rng);
                q
            })
            .collect::<Vec<_>>();
        QuizAttempt {
            selected: vec![None; questions.len()],
            questions,
            submitted: false,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn selected(&self, question: usize) -> Option<usize> {
        self.selected.get(question).copied().flatten()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn answered(&self) -> usize {
        self.selected.iter().filter(|s| s.is_some()).count()
    }

    /// Has no effect once submitted or when out of range
    pub fn select(&mut self, question: usize, answer: usize) {
        if self.submitted {
            return;
        }
        let in_range = self
            .questions
            .get(question)
            .map(|q| answer < q.answers.len())
            .unwrap_or(false);
        if in_range {
            self.selected[question] = Some(answer);
        }
    }

    pub fn submit(&mut self) -> Score {
        self.submitted = true;
        self.score()
    }

    pub fn is_correct(&self, question: usize) -> bool {
        match (self.questions.get(question), self.selected(question)) {
            (Some(q), Some(a)) => q.answers[a].correct,
            _ => false,
        }
    }

    pub fn score(&self) -> Score {
        Score {
            correct: (0..self.questions.len())
                .filter(|q| self.is_correct(*q))
                .count(),
            total: self.questions.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Answer;
    use rand::{rngs::StdRng, SeedableRng};

    fn quiz() -> QuizSet {
        QuizSet {
            id: Some(1),
            title: String::from("Capitals"),
            description: String::new(),
            questions: ["Hà Nội", "Paris", "Tokyo"]
                .iter()
                .map(|right| Question {
                    text: format!("Which is {right}?"),
                    answers: [*right, "Berlin", "Lima", "Oslo"]
                        .iter()
                        .map(|a| Answer {
                            text: String::from(*a),
                            correct: a == right,
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn shuffle_keeps_the_answers() {
        let quiz = quiz();
        let attempt = QuizAttempt::new(&quiz, &mut StdRng::seed_from_u64(7));
        for (orig, shuffled) in quiz.questions.iter().zip(attempt.questions()) {
            let mut a = orig.answers.clone();
            let mut b = shuffled.answers.clone();
            a.sort_by(|x, y| x.text.cmp(&y.text));
            b.sort_by(|x, y| x.text.cmp(&y.text));
            assert_eq!(a, b);
        }
    }

    #[test]
    fn scoring() {
        let mut attempt = QuizAttempt::new(&quiz(), &mut StdRng::seed_from_u64(1));
        let right = |q: &Question| q.answers.iter().position(|a| a.correct).unwrap();
        let wrong = |q: &Question| q.answers.iter().position(|a| !a.correct).unwrap();
        let picks = attempt
            .questions()
            .iter()
            .enumerate()
            .map(|(i, q)| if i == 1 { wrong(q) } else { right(q) })
            .collect::<Vec<_>>();
        for (q, a) in picks.into_iter().enumerate() {
            attempt.select(q, a);
        }
        attempt.select(0, 99);
        assert_eq!(attempt.answered(), 3);
        assert_eq!(attempt.submit(), Score { correct: 2, total: 3 });
        attempt.select(1, 0);
        assert_eq!(attempt.score().correct, 2, "frozen after submit");
    }
}
