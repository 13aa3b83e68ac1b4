//! Flat index records
//!
//! The three auxiliary structures the store keeps alongside its trees:
//! the email→user lookup, the exercise prerequisite graph, and the
//! priority-ordered quest queue.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::Result;
use super::Quest;

/// One email→user-id mapping. Uniqueness is enforced procedurally at user
/// creation, not by this structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailEntry {
    pub email: String,
    pub user_id: String,
}

impl EmailEntry {
    pub fn encode<W: Write>(&self, w: &mut W) -> Result<()> {
        codec::write_string(w, &self.email)?;
        codec::write_string(w, &self.user_id)?;
        Ok(())
    }

    pub fn decode<R: Read>(r: &mut R) -> Result<Self> {
        Ok(Self {
            email: codec::read_string(r)?,
            user_id: codec::read_string(r)?,
        })
    }
}

/// A directed prerequisite edge between two exercise ids. Endpoints are not
/// validated against the exercise tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub weight: i32,
}

impl GraphEdge {
    pub fn encode<W: Write>(&self, w: &mut W) -> Result<()> {
        codec::write_string(w, &self.from)?;
        codec::write_string(w, &self.to)?;
        codec::write_i32(w, self.weight)?;
        Ok(())
    }

    pub fn decode<R: Read>(r: &mut R) -> Result<Self> {
        Ok(Self {
            from: codec::read_string(r)?,
            to: codec::read_string(r)?,
            weight: codec::read_i32(r)?,
        })
    }
}

/// One entry in the priority-ordered quest queue: a quest snapshot, its
/// priority at insertion, and the insertion time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub quest: Quest,
    pub priority: i32,
    /// Unix seconds
    pub enqueued_at: i64,
}

impl QueueEntry {
    pub fn encode<W: Write>(&self, w: &mut W) -> Result<()> {
        self.quest.encode(w)?;
        codec::write_i32(w, self.priority)?;
        codec::write_i64(w, self.enqueued_at)?;
        Ok(())
    }

    pub fn decode<R: Read>(r: &mut R) -> Result<Self> {
        Ok(Self {
            quest: Quest::decode(r)?,
            priority: codec::read_i32(r)?,
            enqueued_at: codec::read_i64(r)?,
        })
    }
}
