use std::{fmt, str::FromStr};

use crate::Error;

/// Polymorphic subject a comment or rating attaches to
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum EntityType {
    Blog,
    FlashcardSet,
    QuizSet,
}

impl EntityType {
    pub fn path_segment(&self) -> &'static str {
        match self {
            EntityType::Blog => "blog",
            EntityType::FlashcardSet => "flashcard",
            EntityType::QuizSet => "quiz",
        }
    }
}

impl FromStr for EntityType {
    type Err = Error;

    fn from_str(s: &str) -> Result<EntityType, Error> {
        match s {
            "blog" => Ok(EntityType::Blog),
            "flashcard" => Ok(EntityType::FlashcardSet),
            "quiz" => Ok(EntityType::QuizSet),
            _ => Err(Error::Invalid(format!("unknown entity type {s:?}"))),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct EntityRef {
    pub kind: EntityType,
    pub id: i64,
}

impl EntityRef {
    pub fn new(kind: EntityType, id: i64) -> EntityRef {
        EntityRef { kind, id }
    }

    /// `{entityType}/{entityId}`, as used under `/interactions/`
    pub fn path(&self) -> String {
        format!("{}/{}", self.kind.path_segment(), self.id)
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.path_segment(), self.id)
    }
}

impl FromStr for EntityRef {
    type Err = Error;

    /// Parses the `kind:id` form printed by `Display`
    fn from_str(s: &str) -> Result<EntityRef, Error> {
        let (kind, id) = s
            .split_once(':')
            .ok_or_else(|| Error::Invalid(format!("expected kind:id, got {s:?}")))?;
        let id = id
            .parse()
            .map_err(|_| Error::Invalid(format!("invalid entity id {id:?}")))?;
        Ok(EntityRef::new(kind.parse()?, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_parses_back() {
        let e = EntityRef::new(EntityType::QuizSet, 17);
        assert_eq!(e.to_string().parse::<EntityRef>(), Ok(e));
        assert_eq!(e.path(), "quiz/17");
    }

    #[test]
    fn rejects_garbage() {
        assert!("blog".parse::<EntityRef>().is_err());
        assert!("video:1".parse::<EntityRef>().is_err());
        assert!("blog:x".parse::<EntityRef>().is_err());
    }
}
