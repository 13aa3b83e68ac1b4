//! PersistentStore Module
//!
//! The domain store that coordinates all collections.
//!
//! ## Responsibilities
//! - Own the four ordered trees (exercises, users, workouts, quests) and the
//!   three flat indexes (email lookup, prerequisite graph, quest queue)
//! - Load every snapshot on open; seed sample data into an empty store
//! - Re-serialize all seven snapshot files after every mutation
//!
//! ## Concurrency Model
//!
//! Single-writer, run-to-completion. Nothing in here suspends, yields, or
//! locks; all I/O is synchronous. Two overlapping mutations racing on the
//! same files can tear a snapshot, so every caller must go through one
//! mutual-exclusion boundary. That boundary is [`SharedStore`], not an
//! internal lock.

mod handle;

pub use handle::SharedStore;

use std::collections::hash_map::DefaultHasher;
use std::fs::{self, File};
use std::hash::{Hash, Hasher};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::Rng;
use serde::Serialize;

use crate::codec;
use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::model::{
    Difficulty, EmailEntry, Exercise, ExerciseType, GraphEdge, Quest, QueueEntry, User,
    WorkoutSession,
};
use crate::tree::OrderedTree;

/// Collection sizes across the whole store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub exercises: usize,
    pub users: usize,
    pub workouts: usize,
    pub quests: usize,
    pub email_index: usize,
    pub graph_edges: usize,
    pub quest_queue: usize,
}

/// The file-persisted fitness domain store
pub struct PersistentStore {
    config: Config,

    exercises: OrderedTree<String, Exercise>,
    users: OrderedTree<String, User>,
    workouts: OrderedTree<String, WorkoutSession>,
    quests: OrderedTree<String, Quest>,

    /// email → user id; uniqueness enforced at user creation only
    email_index: Vec<EmailEntry>,

    /// Directed prerequisite edges; endpoints never validated
    graph_edges: Vec<GraphEdge>,

    /// Kept sorted descending by priority after every insertion
    quest_queue: Vec<QueueEntry>,
}

impl PersistentStore {
    // =========================================================================
    // Snapshot File Names
    // =========================================================================
    const EXERCISES_FILE: &'static str = "exercises.dat";
    const USERS_FILE: &'static str = "users.dat";
    const WORKOUTS_FILE: &'static str = "workouts.dat";
    const QUESTS_FILE: &'static str = "quests.dat";
    const EMAIL_INDEX_FILE: &'static str = "email_index.dat";
    const GRAPH_FILE: &'static str = "graph.dat";
    const PRIORITY_QUEUE_FILE: &'static str = "priority_queue.dat";

    const ALL_FILES: [&'static str; 7] = [
        Self::EXERCISES_FILE,
        Self::USERS_FILE,
        Self::WORKOUTS_FILE,
        Self::QUESTS_FILE,
        Self::EMAIL_INDEX_FILE,
        Self::GRAPH_FILE,
        Self::PRIORITY_QUEUE_FILE,
    ];

    /// Open or create a store with the given config
    ///
    /// On startup:
    /// 1. Create the data directory if it doesn't exist
    /// 2. Load all seven snapshot files (missing file = empty collection)
    /// 3. Seed sample data if the user collection came up empty
    pub fn open(config: Config) -> Result<Self> {
        fs::create_dir_all(&config.data_dir)?;

        let mut store = Self {
            config,
            exercises: OrderedTree::new(),
            users: OrderedTree::new(),
            workouts: OrderedTree::new(),
            quests: OrderedTree::new(),
            email_index: Vec::new(),
            graph_edges: Vec::new(),
            quest_queue: Vec::new(),
        };

        store.load_all();

        if store.users.is_empty() {
            store.seed_sample_data();
        }

        Ok(store)
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Re-serialize every collection to its snapshot file
    pub fn save_all(&self) -> Result<()> {
        self.exercises
            .save_to_file(&self.file_path(Self::EXERCISES_FILE), |w, key, value| {
                codec::write_string(w, key)?;
                value.encode(w)
            })?;
        self.users
            .save_to_file(&self.file_path(Self::USERS_FILE), |w, key, value| {
                codec::write_string(w, key)?;
                value.encode(w)
            })?;
        self.workouts
            .save_to_file(&self.file_path(Self::WORKOUTS_FILE), |w, key, value| {
                codec::write_string(w, key)?;
                value.encode(w)
            })?;
        self.quests
            .save_to_file(&self.file_path(Self::QUESTS_FILE), |w, key, value| {
                codec::write_string(w, key)?;
                value.encode(w)
            })?;

        save_list(
            &self.file_path(Self::EMAIL_INDEX_FILE),
            &self.email_index,
            |w, entry| entry.encode(w),
        )?;
        save_list(
            &self.file_path(Self::GRAPH_FILE),
            &self.graph_edges,
            |w, edge| edge.encode(w),
        )?;
        save_list(
            &self.file_path(Self::PRIORITY_QUEUE_FILE),
            &self.quest_queue,
            |w, entry| entry.encode(w),
        )?;

        Ok(())
    }

    /// Load every collection from its snapshot file. Failures leave the
    /// affected collection empty and never abort the open.
    pub fn load_all(&mut self) {
        if let Err(e) = self
            .exercises
            .load_from_file(&self.file_path(Self::EXERCISES_FILE), |r| {
                let key = codec::read_string(r)?;
                let value = Exercise::decode(r)?;
                Ok((key, value))
            })
        {
            tracing::warn!("failed to load exercises snapshot: {e}");
        }
        if let Err(e) = self
            .users
            .load_from_file(&self.file_path(Self::USERS_FILE), |r| {
                let key = codec::read_string(r)?;
                let value = User::decode(r)?;
                Ok((key, value))
            })
        {
            tracing::warn!("failed to load users snapshot: {e}");
        }
        if let Err(e) = self
            .workouts
            .load_from_file(&self.file_path(Self::WORKOUTS_FILE), |r| {
                let key = codec::read_string(r)?;
                let value = WorkoutSession::decode(r)?;
                Ok((key, value))
            })
        {
            tracing::warn!("failed to load workouts snapshot: {e}");
        }
        if let Err(e) = self
            .quests
            .load_from_file(&self.file_path(Self::QUESTS_FILE), |r| {
                let key = codec::read_string(r)?;
                let value = Quest::decode(r)?;
                Ok((key, value))
            })
        {
            tracing::warn!("failed to load quests snapshot: {e}");
        }

        self.email_index = load_list(&self.file_path(Self::EMAIL_INDEX_FILE), EmailEntry::decode);
        self.graph_edges = load_list(&self.file_path(Self::GRAPH_FILE), GraphEdge::decode);
        self.quest_queue = load_list(
            &self.file_path(Self::PRIORITY_QUEUE_FILE),
            QueueEntry::decode,
        );
    }

    /// Snapshot after a mutation. A failed save is logged and the mutation
    /// stands; the on-disk snapshot simply goes stale until the next save
    /// succeeds.
    fn persist(&self) {
        if let Err(e) = self.save_all() {
            tracing::warn!("failed to persist snapshot: {e}");
        }
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Register a user. Fails with `AlreadyExists` if the email is taken.
    /// Returns the minted user id.
    pub fn create_user(&mut self, username: &str, email: &str, password: &str) -> Result<String> {
        if self.email_index.iter().any(|entry| entry.email == email) {
            return Err(StoreError::AlreadyExists(email.to_string()));
        }

        let id = mint_id("USER", 10_000);
        let user = User::new(&id, username, email, hash_password(password));

        self.users.insert(id.clone(), user);
        self.email_index.push(EmailEntry {
            email: email.to_string(),
            user_id: id.clone(),
        });

        self.persist();
        Ok(id)
    }

    pub fn get_user(&self, user_id: &str) -> Result<User> {
        self.users.search(&user_id.to_string())
    }

    /// Linear scan of the email index
    pub fn get_user_by_email(&self, email: &str) -> Result<User> {
        let entry = self
            .email_index
            .iter()
            .find(|entry| entry.email == email)
            .ok_or(StoreError::NotFound)?;
        self.users.search(&entry.user_id)
    }

    /// Upsert a user under its existing id
    pub fn update_user(&mut self, user: User) {
        self.users.insert(user.id.clone(), user);
        self.persist();
    }

    // =========================================================================
    // Exercises
    // =========================================================================

    /// Insert an exercise and one graph edge per listed prerequisite.
    /// Prerequisite ids are not validated against the catalog.
    pub fn add_exercise(&mut self, exercise: Exercise) {
        for prereq in &exercise.prerequisites {
            self.graph_edges.push(GraphEdge {
                from: prereq.clone(),
                to: exercise.id.clone(),
                weight: 1,
            });
        }
        self.exercises.insert(exercise.id.clone(), exercise);
        self.persist();
    }

    pub fn get_exercise(&self, exercise_id: &str) -> Result<Exercise> {
        self.exercises.search(&exercise_id.to_string())
    }

    pub fn get_all_exercises(&self) -> Vec<Exercise> {
        self.exercises
            .get_all_keys()
            .into_iter()
            .filter_map(|key| self.exercises.search(&key).ok())
            .collect()
    }

    /// The full prerequisite edge list
    pub fn get_exercise_graph(&self) -> &[GraphEdge] {
        &self.graph_edges
    }

    // =========================================================================
    // Workouts
    // =========================================================================

    /// Begin a session for a user; returns the minted session id.
    /// The user id is not validated.
    pub fn start_workout(&mut self, user_id: &str) -> String {
        let session = WorkoutSession::start(user_id);
        let id = session.id.clone();
        self.workouts.insert(id.clone(), session);

        self.persist();
        id
    }

    /// Stamp an end time on a session and upsert it under the same id
    pub fn complete_workout(&mut self, workout_id: &str) -> Result<()> {
        let mut session = self.workouts.search(&workout_id.to_string())?;
        session.end_time = chrono::Utc::now().timestamp();
        self.workouts.insert(workout_id.to_string(), session);

        self.persist();
        Ok(())
    }

    pub fn get_workout(&self, workout_id: &str) -> Result<WorkoutSession> {
        self.workouts.search(&workout_id.to_string())
    }

    // =========================================================================
    // Quests
    // =========================================================================

    /// Insert a quest and enqueue it, then re-sort the queue descending by
    /// priority.
    pub fn add_quest(&mut self, quest: Quest) {
        self.quest_queue.push(QueueEntry {
            quest: quest.clone(),
            priority: quest.priority,
            enqueued_at: chrono::Utc::now().timestamp(),
        });
        self.quests.insert(quest.id.clone(), quest);
        self.quest_queue
            .sort_by(|a, b| b.priority.cmp(&a.priority));

        self.persist();
    }

    /// Remove and return the quest at the tail of the descending-sorted
    /// queue, i.e. the LOWEST remaining priority.
    // TODO: confirm with product whether the tail pop is intended; "next
    // quest" reads like it should take the head (highest priority) instead.
    pub fn get_next_quest(&mut self) -> Result<Quest> {
        let entry = self.quest_queue.pop().ok_or(StoreError::QueueEmpty)?;

        self.persist();
        Ok(entry.quest)
    }

    pub fn get_quest(&self, quest_id: &str) -> Result<Quest> {
        self.quests.search(&quest_id.to_string())
    }

    pub fn get_all_quests(&self) -> Vec<Quest> {
        self.quests
            .get_all_keys()
            .into_iter()
            .filter_map(|key| self.quests.search(&key).ok())
            .collect()
    }

    // =========================================================================
    // Maintenance
    // =========================================================================

    /// Collection sizes for diagnostics
    pub fn get_stats(&self) -> StoreStats {
        StoreStats {
            exercises: self.exercises.len(),
            users: self.users.len(),
            workouts: self.workouts.len(),
            quests: self.quests.len(),
            email_index: self.email_index.len(),
            graph_edges: self.graph_edges.len(),
            quest_queue: self.quest_queue.len(),
        }
    }

    /// Empty every collection, delete all snapshot files, and re-seed
    pub fn clear_all_data(&mut self) {
        self.exercises.clear();
        self.users.clear();
        self.workouts.clear();
        self.quests.clear();
        self.email_index.clear();
        self.graph_edges.clear();
        self.quest_queue.clear();

        for name in Self::ALL_FILES {
            let path = self.file_path(name);
            if path.exists() {
                if let Err(e) = fs::remove_file(&path) {
                    tracing::warn!(file = name, "failed to delete snapshot: {e}");
                }
            }
        }

        self.seed_sample_data();
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn file_path(&self, name: &str) -> PathBuf {
        self.config.data_dir.join(name)
    }

    /// Built-in starter content for a fresh store: a two-exercise
    /// prerequisite chain, an admin user, and a daily quest.
    fn seed_sample_data(&mut self) {
        tracing::info!("seeding sample data into empty store");

        let mut pushup = Exercise::new("EX001", "Push-up");
        pushup.kind = ExerciseType::Strength;
        pushup.difficulty = Difficulty::Beginner;
        pushup.calories_per_minute = 8;
        pushup.next_exercises = vec!["EX002".to_string()];
        self.exercises.insert(pushup.id.clone(), pushup);

        let mut squat = Exercise::new("EX002", "Squat");
        squat.kind = ExerciseType::Strength;
        squat.difficulty = Difficulty::Beginner;
        squat.calories_per_minute = 7;
        squat.prerequisites = vec!["EX001".to_string()];
        self.exercises.insert(squat.id.clone(), squat);

        let mut admin = User::new("ADMIN001", "Admin", "admin@fitnessquest.com", "hashed_password");
        admin.fitness_level = 10;
        self.email_index.push(EmailEntry {
            email: admin.email.clone(),
            user_id: admin.id.clone(),
        });
        self.users.insert(admin.id.clone(), admin);

        self.graph_edges.push(GraphEdge {
            from: "EX001".to_string(),
            to: "EX002".to_string(),
            weight: 1,
        });

        let mut daily = Quest::new("Q001", "Daily Challenge");
        daily.description = "Complete basic exercises".to_string();
        daily.priority = 1;
        daily.required_exercises = vec!["EX001".to_string(), "EX002".to_string()];
        daily.rewards = vec!["100 XP".to_string()];
        self.quest_queue.push(QueueEntry {
            quest: daily.clone(),
            priority: daily.priority,
            enqueued_at: chrono::Utc::now().timestamp(),
        });
        self.quests.insert(daily.id.clone(), daily);

        self.persist();
    }
}

// =============================================================================
// Flat List Snapshots
// =============================================================================

/// Write a flat index to `path`: u64 count + records, via tmp-and-rename
fn save_list<T, F>(path: &Path, items: &[T], mut encode: F) -> Result<()>
where
    F: FnMut(&mut BufWriter<File>, &T) -> Result<()>,
{
    let tmp = path.with_extension("tmp");
    let mut writer = BufWriter::new(File::create(&tmp)?);

    codec::write_u64(&mut writer, items.len() as u64)?;
    for item in items {
        encode(&mut writer, item)?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| StoreError::Io(e.into_error()))?;
    file.sync_all()?;
    drop(file);
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Read a flat index back. Missing, unreadable, or corrupt files all
/// degrade to an empty list.
fn load_list<T, F>(path: &Path, mut decode: F) -> Vec<T>
where
    F: FnMut(&mut BufReader<File>) -> Result<T>,
{
    if !path.exists() {
        return Vec::new();
    }
    let mut reader = match File::open(path) {
        Ok(file) => BufReader::new(file),
        Err(e) => {
            tracing::warn!(path = %path.display(), "cannot open index snapshot, starting empty: {e}");
            return Vec::new();
        }
    };

    let count = match codec::read_u64(&mut reader) {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!(path = %path.display(), "unreadable index header, starting empty: {e}");
            return Vec::new();
        }
    };
    if count > codec::MAX_INDEX_RECORDS {
        tracing::warn!(
            path = %path.display(),
            count,
            "index record count exceeds sanity bound, starting empty"
        );
        return Vec::new();
    }

    let mut items = Vec::with_capacity(count as usize);
    for _ in 0..count {
        match decode(&mut reader) {
            Ok(item) => items.push(item),
            Err(e) => {
                tracing::warn!(path = %path.display(), "corrupt index record, starting empty: {e}");
                return Vec::new();
            }
        }
    }
    items
}

// =============================================================================
// Id Minting & Hashing
// =============================================================================

/// Mint `PREFIX_<unix-seconds>_<random suffix>` ids
fn mint_id(prefix: &str, modulus: u32) -> String {
    let now = chrono::Utc::now().timestamp();
    let suffix: u32 = rand::thread_rng().gen_range(0..modulus);
    format!("{}_{}_{}", prefix, now, suffix)
}

/// Non-cryptographic password hash; see `User::password_hash`
fn hash_password(password: &str) -> String {
    let mut hasher = DefaultHasher::new();
    password.hash(&mut hasher);
    hasher.finish().to_string()
}
