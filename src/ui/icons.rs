//! Shared UI icons.

use console::Emoji;

// Outcome indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");

// Board indicators
pub static COLUMN: Emoji<'_, '_> = Emoji("📋 ", "#");
pub static CARD: Emoji<'_, '_> = Emoji("🎬 ", "-");
pub static DRAGGING: Emoji<'_, '_> = Emoji("✋ ", "[DRAG]");
pub static SCENE: Emoji<'_, '_> = Emoji("🎞️  ", ">");
