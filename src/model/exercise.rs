//! Exercise entity
//!
//! Record layout: id, name, type, difficulty, description, target_muscles,
//! calories_per_minute, prerequisites, next_exercises, created_at.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::{Result, StoreError};

/// Exercise category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExerciseType {
    Strength = 0,
    Cardio = 1,
    Flexibility = 2,
    Balance = 3,
    Core = 4,
}

impl ExerciseType {
    pub fn from_i32(value: i32) -> Result<Self> {
        match value {
            0 => Ok(ExerciseType::Strength),
            1 => Ok(ExerciseType::Cardio),
            2 => Ok(ExerciseType::Flexibility),
            3 => Ok(ExerciseType::Balance),
            4 => Ok(ExerciseType::Core),
            other => Err(StoreError::Corrupt(format!(
                "unknown exercise type discriminant: {}",
                other
            ))),
        }
    }
}

/// Exercise difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner = 0,
    Intermediate = 1,
    Advanced = 2,
    Expert = 3,
}

impl Difficulty {
    pub fn from_i32(value: i32) -> Result<Self> {
        match value {
            0 => Ok(Difficulty::Beginner),
            1 => Ok(Difficulty::Intermediate),
            2 => Ok(Difficulty::Advanced),
            3 => Ok(Difficulty::Expert),
            other => Err(StoreError::Corrupt(format!(
                "unknown difficulty discriminant: {}",
                other
            ))),
        }
    }
}

/// A single exercise in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub kind: ExerciseType,
    pub difficulty: Difficulty,
    pub description: String,
    pub target_muscles: Vec<String>,
    pub calories_per_minute: i32,
    /// Exercise ids that must be completed before this one
    pub prerequisites: Vec<String>,
    /// Exercise ids this one unlocks
    pub next_exercises: Vec<String>,
    /// Unix seconds
    pub created_at: i64,
}

impl Exercise {
    /// Create an exercise with default fields; callers fill in the rest
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: ExerciseType::Strength,
            difficulty: Difficulty::Beginner,
            description: String::new(),
            target_muscles: Vec::new(),
            calories_per_minute: 0,
            prerequisites: Vec::new(),
            next_exercises: Vec::new(),
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    pub fn encode<W: Write>(&self, w: &mut W) -> Result<()> {
        codec::write_string(w, &self.id)?;
        codec::write_string(w, &self.name)?;
        codec::write_i32(w, self.kind as i32)?;
        codec::write_i32(w, self.difficulty as i32)?;
        codec::write_string(w, &self.description)?;
        codec::write_string_list(w, &self.target_muscles)?;
        codec::write_i32(w, self.calories_per_minute)?;
        codec::write_string_list(w, &self.prerequisites)?;
        codec::write_string_list(w, &self.next_exercises)?;
        codec::write_i64(w, self.created_at)?;
        Ok(())
    }

    pub fn decode<R: Read>(r: &mut R) -> Result<Self> {
        Ok(Self {
            id: codec::read_string(r)?,
            name: codec::read_string(r)?,
            kind: ExerciseType::from_i32(codec::read_i32(r)?)?,
            difficulty: Difficulty::from_i32(codec::read_i32(r)?)?,
            description: codec::read_string(r)?,
            target_muscles: codec::read_string_list(r)?,
            calories_per_minute: codec::read_i32(r)?,
            prerequisites: codec::read_string_list(r)?,
            next_exercises: codec::read_string_list(r)?,
            created_at: codec::read_i64(r)?,
        })
    }
}
