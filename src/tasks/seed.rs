//! Baseline data for the task tracker: the status vocabulary, synthetic
//! users, and synthetic tasks assigned at random.

use std::collections::HashSet;

use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::info;

use crate::error::TaskDbError;
use crate::postgres::{PgProvider, SqlParam, Tx};

use super::model::TaskStatus;

pub const DEFAULT_SEED_USERS: usize = 25;
pub const DEFAULT_SEED_TASKS: usize = 120;

const INSERT_STATUS: &str = "INSERT INTO status (name) VALUES ($1) ON CONFLICT (name) DO NOTHING";
const INSERT_USER: &str =
    "INSERT INTO users (fullname, email) VALUES ($1, $2) ON CONFLICT (email) DO NOTHING";
const INSERT_TASK: &str =
    "INSERT INTO tasks (title, description, status_id, user_id) VALUES ($1, $2, $3, $4)";
const SELECT_USER_IDS: &str = "SELECT id FROM users ORDER BY id";
const SELECT_STATUS_IDS: &str = "SELECT id FROM status ORDER BY id";

const FIRST_NAMES: &[&str] = &[
    "Olena", "Taras", "Iryna", "Andrii", "Maria", "Dmytro", "Sofia", "Bohdan", "Kateryna",
    "Mykola", "Anna", "Petro", "Daria", "Oleh", "Yulia", "Roman", "Nadia", "Ivan",
];
const LAST_NAMES: &[&str] = &[
    "Shevchenko", "Kovalenko", "Bondarenko", "Tkachenko", "Kravchenko", "Melnyk", "Boyko",
    "Koval", "Oliynyk", "Lysenko", "Marchenko", "Savchenko", "Rudenko", "Moroz",
];
const EMAIL_DOMAINS: &[&str] = &["gmail.com", "example.com", "example.org", "ukr.net"];
const WORDS: &[&str] = &[
    "review", "draft", "budget", "report", "release", "client", "invoice", "schedule",
    "meeting", "design", "backlog", "deploy", "migrate", "survey", "update", "notes",
    "contract", "roadmap", "metrics", "feedback", "prepare", "archive", "quarterly", "team",
    "security", "audit", "summary", "plan", "support", "training",
];

/// How much synthetic data to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedOptions {
    pub users: usize,
    pub tasks: usize,
    /// Fixed RNG seed for reproducible data; random when `None`.
    pub rng_seed: Option<u64>,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            users: DEFAULT_SEED_USERS,
            tasks: DEFAULT_SEED_TASKS,
            rng_seed: None,
        }
    }
}

impl SeedOptions {
    fn rng(&self) -> ChaCha8Rng {
        let seed = self.rng_seed.unwrap_or_else(|| rand::rng().random());
        ChaCha8Rng::seed_from_u64(seed)
    }
}

/// Rows actually inserted by [`seed`]; conflicts are skipped, not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub statuses: u64,
    pub users: u64,
    pub tasks: u64,
}

/// Populate statuses, users and tasks in a single transaction.
///
/// Statuses and users are idempotent on their unique names/emails; tasks
/// are always added.
///
/// # Errors
/// Returns `TaskDbError::SeedError` if tasks are requested while no users
/// exist, or any execution error; either way nothing is kept.
pub async fn seed(provider: &PgProvider, options: &SeedOptions) -> Result<SeedReport, TaskDbError> {
    let options = options.clone();
    let report = provider
        .scoped(move |tx| {
            Box::pin(async move {
                let mut rng = options.rng();
                let statuses = seed_statuses(tx).await?;
                let users = seed_users(tx, options.users, &mut rng).await?;
                let tasks = seed_tasks(tx, options.tasks, &mut rng).await?;
                Ok(SeedReport {
                    statuses,
                    users,
                    tasks,
                })
            })
        })
        .await?;
    info!(
        "seed done: {} statuses, {} users, {} tasks",
        report.statuses, report.users, report.tasks
    );
    Ok(report)
}

/// Insert the fixed status vocabulary, skipping names already present.
///
/// # Errors
/// Propagates any execution error.
pub async fn seed_statuses(tx: &Tx<'_>) -> Result<u64, TaskDbError> {
    let mut inserted = 0;
    for status in TaskStatus::ALL {
        inserted += tx.execute(INSERT_STATUS, &[SqlParam::from(status.as_str())]).await?;
    }
    Ok(inserted)
}

/// Insert `count` synthetic users, skipping emails already present.
///
/// # Errors
/// Propagates any execution error.
pub async fn seed_users<R: Rng>(
    tx: &Tx<'_>,
    count: usize,
    rng: &mut R,
) -> Result<u64, TaskDbError> {
    let mut inserted = 0;
    for (fullname, email) in fake_users(count, rng) {
        inserted += tx
            .execute(INSERT_USER, &[SqlParam::from(fullname), SqlParam::from(email)])
            .await?;
    }
    Ok(inserted)
}

/// Insert `count` synthetic tasks with a random status and owner.
///
/// # Errors
/// Returns `TaskDbError::SeedError` if there are no users or statuses to
/// pick from, or any execution error.
pub async fn seed_tasks<R: Rng>(
    tx: &Tx<'_>,
    count: usize,
    rng: &mut R,
) -> Result<u64, TaskDbError> {
    if count == 0 {
        return Ok(0);
    }
    let user_ids: Vec<i32> = tx.fetch_all(SELECT_USER_IDS, &[]).await?;
    let status_ids: Vec<i32> = tx.fetch_all(SELECT_STATUS_IDS, &[]).await?;

    let mut inserted = 0;
    for _ in 0..count {
        let (Some(&user_id), Some(&status_id)) = (user_ids.choose(rng), status_ids.choose(rng))
        else {
            return Err(TaskDbError::SeedError(
                "tasks need at least one user and one status".to_string(),
            ));
        };
        let params: [SqlParam; 4] = [
            fake_title(rng).into(),
            fake_paragraph(rng, 3).into(),
            status_id.into(),
            user_id.into(),
        ];
        inserted += tx.execute(INSERT_TASK, &params).await?;
    }
    Ok(inserted)
}

/// `count` distinct `(fullname, email)` pairs.
pub fn fake_users<R: Rng>(count: usize, rng: &mut R) -> Vec<(String, String)> {
    let mut seen = HashSet::with_capacity(count);
    let mut users = Vec::with_capacity(count);
    while users.len() < count {
        let first = pick(FIRST_NAMES, rng);
        let last = pick(LAST_NAMES, rng);
        let domain = pick(EMAIL_DOMAINS, rng);
        let tag: u32 = rng.random_range(1..10_000);
        let email = format!(
            "{}.{}{tag}@{domain}",
            first.to_lowercase(),
            last.to_lowercase()
        );
        if seen.insert(email.clone()) {
            users.push((format!("{first} {last}"), email));
        }
    }
    users
}

/// Four capitalized words, no trailing period.
pub fn fake_title<R: Rng>(rng: &mut R) -> String {
    capitalize(&fake_words(rng, 4))
}

pub fn fake_paragraph<R: Rng>(rng: &mut R, sentences: usize) -> String {
    (0..sentences)
        .map(|_| {
            let len = rng.random_range(5..10);
            format!("{}.", capitalize(&fake_words(rng, len)))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn fake_words<R: Rng>(rng: &mut R, count: usize) -> String {
    (0..count)
        .map(|_| pick(WORDS, rng))
        .collect::<Vec<_>>()
        .join(" ")
}

fn pick<R: Rng>(items: &[&'static str], rng: &mut R) -> &'static str {
    items.choose(rng).copied().unwrap_or_default()
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
