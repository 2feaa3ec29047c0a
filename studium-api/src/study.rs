use serde::{de::DeserializeOwned, Serialize};

use crate::{EntityType, Error, Time};

/// Something listed under its own REST collection
pub trait Resource: Clone + DeserializeOwned + Serialize {
    const COLLECTION: &'static str;
    const ENTITY: EntityType;

    fn id(&self) -> Option<i64>;
    fn title(&self) -> &str;
}

/// A resource created through multipart forms, and that can be generated
pub trait StudySet: Resource {
    /// Name of the multipart part carrying the JSON blob
    const FORM_PART: &'static str;

    fn item_count(&self) -> usize;
    fn validate(&self) -> Result<(), Error>;
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<Time>,
}

impl Resource for BlogPost {
    const COLLECTION: &'static str = "blogs";
    const ENTITY: EntityType = EntityType::Blog;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "flashcards")]
    pub cards: Vec<Flashcard>,
}

impl Resource for FlashcardSet {
    const COLLECTION: &'static str = "flashcards";
    const ENTITY: EntityType = EntityType::FlashcardSet;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }
}

impl StudySet for FlashcardSet {
    const FORM_PART: &'static str = "flashcardSet";

    fn item_count(&self) -> usize {
        self.cards.len()
    }

    fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.title)?;
        if self.title.trim().is_empty() {
            return Err(Error::Invalid(String::from("Vui lòng nhập tiêu đề")));
        }
        if self
            .cards
            .iter()
            .any(|c| c.front.trim().is_empty() || c.back.trim().is_empty())
        {
            return Err(Error::Invalid(String::from(
                "Mỗi thẻ cần có cả mặt trước và mặt sau",
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    #[serde(alias = "content")]
    pub text: String,
    #[serde(default, alias = "isCorrect")]
    pub correct: bool,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Question {
    #[serde(alias = "content")]
    pub text: String,
    pub answers: Vec<Answer>,
}

impl Question {
    pub fn correct_answers(&self) -> impl Iterator<Item = &Answer> {
        self.answers.iter().filter(|a| a.correct)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Resource for QuizSet {
    const COLLECTION: &'static str = "quizzes";
    const ENTITY: EntityType = EntityType::QuizSet;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }
}

impl StudySet for QuizSet {
    const FORM_PART: &'static str = "quizSet";

    fn item_count(&self) -> usize {
        self.questions.len()
    }

    fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.title)?;
        if self.title.trim().is_empty() {
            return Err(Error::Invalid(String::from("Vui lòng nhập tiêu đề")));
        }
        for (i, q) in self.questions.iter().enumerate() {
            if q.answers.len() < 2 {
                return Err(Error::Invalid(format!(
                    "Câu hỏi {} cần ít nhất 2 đáp án",
                    i + 1
                )));
            }
            if q.correct_answers().next().is_none() {
                return Err(Error::Invalid(format!(
                    "Câu hỏi {} chưa có đáp án đúng",
                    i + 1
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: &[bool]) -> Question {
        Question {
            text: String::from("2 + 2?"),
            answers: correct
                .iter()
                .enumerate()
                .map(|(i, c)| Answer {
                    text: i.to_string(),
                    correct: *c,
                })
                .collect(),
        }
    }

    #[test]
    fn quiz_needs_a_correct_answer() {
        let mut q = QuizSet {
            id: None,
            title: String::from("Maths"),
            description: String::new(),
            questions: vec![question(&[false, false])],
        };
        assert!(q.validate().is_err());
        q.questions = vec![question(&[false, true])];
        assert_eq!(q.validate(), Ok(()));
    }

    #[test]
    fn flashcards_alias() {
        let s: FlashcardSet = serde_json::from_str(
            r#"{"id":3,"title":"Verbs","flashcards":[{"front":"go","back":"đi"}]}"#,
        )
        .unwrap();
        assert_eq!(s.item_count(), 1);
        assert_eq!(s.validate(), Ok(()));
    }

    #[test]
    fn answer_is_correct_alias() {
        let a: Answer = serde_json::from_str(r#"{"content":"4","isCorrect":true}"#).unwrap();
        assert!(a.correct);
    }
}
