//! Quest entity
//!
//! Record layout: id, title, description, priority, difficulty,
//! required_exercises, rewards, deadline, completed.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::Result;

/// A quest: a goal built from required exercises with reward labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: i32,
    pub difficulty: i32,
    pub required_exercises: Vec<String>,
    /// Reward labels, e.g. "100 XP"
    pub rewards: Vec<String>,
    /// Unix seconds; 0 means no deadline
    pub deadline: i64,
    pub completed: bool,
}

impl Quest {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            priority: 1,
            difficulty: 1,
            required_exercises: Vec::new(),
            rewards: Vec::new(),
            deadline: 0,
            completed: false,
        }
    }

    pub fn encode<W: Write>(&self, w: &mut W) -> Result<()> {
        codec::write_string(w, &self.id)?;
        codec::write_string(w, &self.title)?;
        codec::write_string(w, &self.description)?;
        codec::write_i32(w, self.priority)?;
        codec::write_i32(w, self.difficulty)?;
        codec::write_string_list(w, &self.required_exercises)?;
        codec::write_string_list(w, &self.rewards)?;
        codec::write_i64(w, self.deadline)?;
        codec::write_bool(w, self.completed)?;
        Ok(())
    }

    pub fn decode<R: Read>(r: &mut R) -> Result<Self> {
        Ok(Self {
            id: codec::read_string(r)?,
            title: codec::read_string(r)?,
            description: codec::read_string(r)?,
            priority: codec::read_i32(r)?,
            difficulty: codec::read_i32(r)?,
            required_exercises: codec::read_string_list(r)?,
            rewards: codec::read_string_list(r)?,
            deadline: codec::read_i64(r)?,
            completed: codec::read_bool(r)?,
        })
    }
}
