//! Review persistence
//!
//! Reviews are keyed by `(restaurant_id, review_id)` so one range scan lists
//! a restaurant's reviews.

use redb::ReadableTable;
use shared::models::{Review, ReviewCreate};
use shared::util;

use crate::auth::CurrentUser;
use crate::db::{Db, REVIEWS_TABLE, StoreError};
use crate::utils::AppError;

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("Rating must be between 1 and 5")]
    InvalidRating,

    #[error("Dish name is required")]
    MissingDish,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ReviewError> for AppError {
    fn from(e: ReviewError) -> Self {
        match e {
            ReviewError::InvalidRating => {
                AppError::Validation("Rating must be between 1 and 5".to_string())
            }
            ReviewError::MissingDish => AppError::Validation("Dish name is required".to_string()),
            ReviewError::Store(inner) => inner.into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ReviewStore {
    db: Db,
}

impl ReviewStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub fn create(
        &self,
        restaurant_id: &str,
        author: &CurrentUser,
        data: ReviewCreate,
    ) -> Result<Review, ReviewError> {
        if !(1..=5).contains(&data.rating) {
            return Err(ReviewError::InvalidRating);
        }
        if data.dish.trim().is_empty() {
            return Err(ReviewError::MissingDish);
        }

        let review = Review {
            id: util::new_id(),
            restaurant_id: restaurant_id.to_string(),
            user_id: author.id.clone(),
            reviewer_name: author.name.clone(),
            dish: data.dish,
            rating: data.rating,
            comment: data.comment,
            created_at: util::now_millis(),
        };

        let txn = self.db.begin_write().map_err(StoreError::from)?;
        {
            let mut table = txn.open_table(REVIEWS_TABLE).map_err(StoreError::from)?;
            let value = serde_json::to_vec(&review).map_err(StoreError::from)?;
            table
                .insert((restaurant_id, review.id.as_str()), value.as_slice())
                .map_err(StoreError::from)?;
        }
        txn.commit().map_err(StoreError::from)?;

        Ok(review)
    }

    /// All reviews for one restaurant, newest first.
    pub fn list_for_restaurant(&self, restaurant_id: &str) -> Result<Vec<Review>, ReviewError> {
        let read_txn = self.db.begin_read().map_err(StoreError::from)?;
        let table = read_txn.open_table(REVIEWS_TABLE).map_err(StoreError::from)?;

        let mut reviews = Vec::new();
        let range_start = (restaurant_id, "");
        let range_end = (restaurant_id, "\u{10FFFF}");
        for result in table
            .range(range_start..=range_end)
            .map_err(StoreError::from)?
        {
            let (_key, value) = result.map_err(StoreError::from)?;
            let review: Review = serde_json::from_slice(value.value()).map_err(StoreError::from)?;
            reviews.push(review);
        }

        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }
}
