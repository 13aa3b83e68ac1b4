//! User entity
//!
//! Record layout: id, username, email, password_hash, fitness_level,
//! experience_points, completed_exercises, achievements, created_at,
//! last_login.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::Result;

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    /// Unique at creation time only, enforced through the email index
    pub email: String,
    /// Weak, non-cryptographic hash. Not a password store.
    pub password_hash: String,
    pub fitness_level: i32,
    pub experience_points: i32,
    pub completed_exercises: Vec<String>,
    pub achievements: Vec<String>,
    /// Unix seconds
    pub created_at: i64,
    /// Unix seconds
    pub last_login: i64,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            id: id.into(),
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            fitness_level: 1,
            experience_points: 0,
            completed_exercises: Vec::new(),
            achievements: Vec::new(),
            created_at: now,
            last_login: now,
        }
    }

    pub fn encode<W: Write>(&self, w: &mut W) -> Result<()> {
        codec::write_string(w, &self.id)?;
        codec::write_string(w, &self.username)?;
        codec::write_string(w, &self.email)?;
        codec::write_string(w, &self.password_hash)?;
        codec::write_i32(w, self.fitness_level)?;
        codec::write_i32(w, self.experience_points)?;
        codec::write_string_list(w, &self.completed_exercises)?;
        codec::write_string_list(w, &self.achievements)?;
        codec::write_i64(w, self.created_at)?;
        codec::write_i64(w, self.last_login)?;
        Ok(())
    }

    pub fn decode<R: Read>(r: &mut R) -> Result<Self> {
        Ok(Self {
            id: codec::read_string(r)?,
            username: codec::read_string(r)?,
            email: codec::read_string(r)?,
            password_hash: codec::read_string(r)?,
            fitness_level: codec::read_i32(r)?,
            experience_points: codec::read_i32(r)?,
            completed_exercises: codec::read_string_list(r)?,
            achievements: codec::read_string_list(r)?,
            created_at: codec::read_i64(r)?,
            last_login: codec::read_i64(r)?,
        })
    }
}
