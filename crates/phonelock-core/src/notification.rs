//! Notification records, the bounded lock-screen log, and the content
//! generator.
//!
//! The generator is pure given an entropy source: catalog, probability,
//! timestamp and RNG are all injected.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::AppProfile;

/// One generated notification. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: Uuid,
    pub app_name: String,
    pub icon_class: String,
    pub glyph: String,
    pub sender: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeliveryMode {
    Direct,
    Group,
}

const LINKEDIN_POSTS: &[&str] = &[
    "Landed a summer internship!",
    "New project: interactive installation.",
    "We’re hiring campus ambassadors.",
    "Portfolio update: new case study.",
    "Accepted an offer — excited to start!",
];

const LINKEDIN_COMPANIES: &[&str] = &[
    "Google",
    "Microsoft",
    "Campus IT",
    "Design Club",
    "StartUp Lab",
    "Coffee Roasters",
    "City Museum",
];

/// Generate one notification from the catalog.
///
/// Returns `None` only when the catalog (or the chosen sender pool) is
/// empty.
pub fn generate(
    catalog: &[AppProfile],
    group_probability: f64,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> Option<NotificationRecord> {
    let app = catalog.choose(rng)?;
    let mode = if rng.gen_bool(group_probability.clamp(0.0, 1.0)) && app.has_groups() {
        DeliveryMode::Group
    } else {
        DeliveryMode::Direct
    };
    let sender = match mode {
        DeliveryMode::Group => app.groups.choose(rng)?,
        DeliveryMode::Direct => app.contacts.choose(rng)?,
    }
    .clone();
    let message = compose_message(&app.key, &sender, mode, rng);
    Some(NotificationRecord {
        id: Uuid::new_v4(),
        app_name: app.display_name.clone(),
        icon_class: app.icon_class.clone(),
        glyph: app.glyph.clone(),
        sender,
        message,
        created_at: now,
    })
}

fn compose_message(app_key: &str, sender: &str, mode: DeliveryMode, rng: &mut impl Rng) -> String {
    let n: u32 = rng.gen_range(1..=5);
    let unread = match mode {
        DeliveryMode::Group => format!("{n} new messages in {sender}."),
        DeliveryMode::Direct => format!("You have {n} new messages."),
    };
    match app_key {
        "instagram" => match mode {
            DeliveryMode::Group => unread,
            DeliveryMode::Direct => match rng.gen_range(0..4) {
                0 => format!("{sender} mentioned you in their story."),
                1 => format!("{sender} tagged you in a post."),
                2 => format!("{sender} sent you a message."),
                _ => unread,
            },
        },
        "tiktok" => match mode {
            DeliveryMode::Group => unread,
            DeliveryMode::Direct => match rng.gen_range(0..3) {
                0 => format!("{sender} mentioned you in a comment."),
                1 => format!("{sender} sent you a message."),
                _ => unread,
            },
        },
        "x" => match mode {
            DeliveryMode::Group => unread,
            DeliveryMode::Direct => match rng.gen_range(0..3) {
                0 => format!("{sender} mentioned you in a post."),
                1 => format!("{sender} sent you a message."),
                _ => unread,
            },
        },
        "discord" => match mode {
            DeliveryMode::Group => unread,
            DeliveryMode::Direct => match rng.gen_range(0..3) {
                0 => format!("{sender} mentioned you."),
                1 => format!("{sender} sent you a message."),
                _ => unread,
            },
        },
        "snapchat" => match mode {
            DeliveryMode::Group => format!("New Snaps in {sender}."),
            DeliveryMode::Direct => match rng.gen_range(0..3) {
                0 => format!("{sender} snapped you."),
                1 => format!("{sender} sent you a Snap."),
                _ => format!("{sender} sent you a message."),
            },
        },
        "linkedin" => match rng.gen_range(0..3) {
            0 => {
                let post = LINKEDIN_POSTS.choose(rng).copied().unwrap_or_default();
                format!("{sender} posted \"{post}\".")
            }
            1 => format!("{sender} sent you a connection request."),
            _ => {
                let company = LINKEDIN_COMPANIES.choose(rng).copied().unwrap_or_default();
                format!("{sender} also works at {company}, send them a connection.")
            }
        },
        _ => match mode {
            DeliveryMode::Group => unread,
            DeliveryMode::Direct => format!("{sender} sent you a message."),
        },
    }
}

/// Bounded, most-recent-first notification log.
///
/// Oldest entries are evicted on overflow; the whole log is cleared when
/// the session unlocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationLog {
    entries: VecDeque<NotificationRecord>,
    capacity: usize,
}

impl NotificationLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Prepend a record, evicting the oldest entries past capacity.
    pub fn push(&mut self, record: NotificationRecord) {
        self.entries.push_front(record);
        while self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Most-recent-first iteration.
    pub fn iter(&self) -> impl Iterator<Item = &NotificationRecord> {
        self.entries.iter()
    }
}
