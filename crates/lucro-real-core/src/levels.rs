use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelTier {
    pub level: u8,
    pub title: &'static str,
    pub points: u32,
}

/// Ascending by `points`; the first tier starts at zero.
pub const BUSINESS_LEVELS: &[LevelTier] = &[
    LevelTier { level: 1, title: "Empresário Perdido", points: 0 },
    LevelTier { level: 2, title: "Empresário Curioso", points: 100 },
    LevelTier { level: 3, title: "Empresário Consciente", points: 300 },
    LevelTier { level: 4, title: "Empresário Organizado", points: 600 },
    LevelTier { level: 5, title: "Empresário Estratégico", points: 1000 },
    LevelTier { level: 6, title: "Empresário Lucrativo", points: 1500 },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLevel {
    pub level: u8,
    pub title: String,
    pub points: u32,
    /// Points needed to reach the next tier; `None` at the top.
    pub next_level_points: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelInput {
    pub points: u32,
}

/// Highest tier whose threshold `points` has reached.
pub fn business_level(points: u32) -> UserLevel {
    let idx = BUSINESS_LEVELS
        .iter()
        .rposition(|tier| points >= tier.points)
        .unwrap_or(0);
    let tier = BUSINESS_LEVELS[idx];
    UserLevel {
        level: tier.level,
        title: tier.title.to_string(),
        points,
        next_level_points: BUSINESS_LEVELS.get(idx + 1).map(|next| next.points),
    }
}
