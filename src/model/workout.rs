//! Workout session entity
//!
//! Record layout: id, user_id, start_time, end_time, exercises,
//! total_calories, validated, form_score.

use std::io::{Read, Write};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::Result;

/// A single workout session for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: String,
    pub user_id: String,
    /// Unix seconds
    pub start_time: i64,
    /// Unix seconds; 0 until the session completes
    pub end_time: i64,
    pub exercises: Vec<String>,
    pub total_calories: i32,
    pub validated: bool,
    pub form_score: f32,
}

impl WorkoutSession {
    /// Begin a session now, minting an id from time + a random suffix
    pub fn start(user_id: impl Into<String>) -> Self {
        let now = chrono::Utc::now().timestamp();
        let suffix: u32 = rand::thread_rng().gen_range(0..1000);
        Self {
            id: format!("WORKOUT_{}_{}", now, suffix),
            user_id: user_id.into(),
            start_time: now,
            end_time: 0,
            exercises: Vec::new(),
            total_calories: 0,
            validated: false,
            form_score: 0.0,
        }
    }

    pub fn encode<W: Write>(&self, w: &mut W) -> Result<()> {
        codec::write_string(w, &self.id)?;
        codec::write_string(w, &self.user_id)?;
        codec::write_i64(w, self.start_time)?;
        codec::write_i64(w, self.end_time)?;
        codec::write_string_list(w, &self.exercises)?;
        codec::write_i32(w, self.total_calories)?;
        codec::write_bool(w, self.validated)?;
        codec::write_f32(w, self.form_score)?;
        Ok(())
    }

    pub fn decode<R: Read>(r: &mut R) -> Result<Self> {
        Ok(Self {
            id: codec::read_string(r)?,
            user_id: codec::read_string(r)?,
            start_time: codec::read_i64(r)?,
            end_time: codec::read_i64(r)?,
            exercises: codec::read_string_list(r)?,
            total_calories: codec::read_i32(r)?,
            validated: codec::read_bool(r)?,
            form_score: codec::read_f32(r)?,
        })
    }
}
