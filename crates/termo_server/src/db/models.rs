//! Database models.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;

use crate::db::schema;

/// User profile database model.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::users)]
pub struct User {
    id: i64,
    name: String,
    score: i32,
    created_at: NaiveDateTime,
}

/// Insertable user model for creating new users.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::users)]
pub struct NewUser {
    name: String,
}

/// Game session database model (words and attempts live in their own tables).
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::games)]
pub struct GameRow {
    id: i64,
    user_id: i64,
    is_active: bool,
    created_at: NaiveDateTime,
}

/// Insertable game model.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::games)]
pub struct NewGame {
    user_id: i64,
}

/// Insertable secret-word model; `idx` fixes the session order.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::game_words)]
pub struct NewGameWord {
    game_id: i64,
    word: String,
    idx: i32,
}

/// Insertable attempt model; `idx` is the submission position and is unique
/// per game, which is what serializes concurrent appends.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::game_attempts)]
pub struct NewGameAttempt {
    game_id: i64,
    attempt: String,
    idx: i32,
}
