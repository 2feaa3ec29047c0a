use crate::Error;

pub const MAX_RATING: u8 = 5;

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRating {
    pub rating_value: u8,
}

impl NewRating {
    pub fn new(rating_value: u8) -> Result<NewRating, Error> {
        if rating_value == 0 || rating_value > MAX_RATING {
            return Err(Error::Invalid(format!(
                "rating must be between 1 and {MAX_RATING}"
            )));
        }
        Ok(NewRating { rating_value })
    }
}

/// The current user's rating of an entity
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub rating_value: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    #[serde(default, alias = "averageRating")]
    pub average: f64,
    #[serde(default, alias = "totalRatings")]
    pub count: u64,
}
