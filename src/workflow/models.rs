use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Production stage of a task, in board-column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    Briefed,
    #[serde(rename = "In Production")]
    InProduction,
    #[serde(rename = "In Editing")]
    InEditing,
    #[serde(rename = "Ready to Launch")]
    ReadyToLaunch,
    Launched,
    Iterating,
}

impl Stage {
    /// Every stage, left to right.
    pub const ALL: [Stage; 6] = [
        Self::Briefed,
        Self::InProduction,
        Self::InEditing,
        Self::ReadyToLaunch,
        Self::Launched,
        Self::Iterating,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Briefed => "Briefed",
            Self::InProduction => "In Production",
            Self::InEditing => "In Editing",
            Self::ReadyToLaunch => "Ready to Launch",
            Self::Launched => "Launched",
            Self::Iterating => "Iterating",
        }
    }

    /// Column index, 0-based.
    pub fn position(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    /// Accepts display labels in any case plus snake/kebab slugs
    /// (`in_production`, `ready-to-launch`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '_' | '-' => ' ',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        match normalized.as_str() {
            "briefed" => Ok(Self::Briefed),
            "in production" => Ok(Self::InProduction),
            "in editing" => Ok(Self::InEditing),
            "ready to launch" => Ok(Self::ReadyToLaunch),
            "launched" => Ok(Self::Launched),
            "iterating" => Ok(Self::Iterating),
            _ => Err(format!("Invalid stage: {}", s)),
        }
    }
}

/// A production work item as served by the workflow webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub name: String,
    #[serde(alias = "status")]
    pub stage: Stage,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub market_awareness: Option<String>,
    #[serde(default)]
    pub angle: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One scene of an ad-block version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub scene: u32,
    pub script: String,
    #[serde(default)]
    pub visual: Option<String>,
    #[serde(default)]
    pub audio: Option<String>,
    #[serde(default)]
    pub text_overlay: Option<String>,
    #[serde(default)]
    pub screenshot_url: Option<String>,
}

/// Scenes sharing a version label ("V1", "Hook B", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdBlockGroup {
    pub version: String,
    #[serde(default)]
    pub scenes: Vec<Scene>,
}

/// Body of the status-persist webhook call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusUpdate {
    pub id: i64,
    pub status: Stage,
}
