use derive_more::IntoIterator;
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

use crate::roll::card::{Card, CardSlot};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RollEvent {
    RollStarted,
    StepDrawn { step: u32, character: String },
    RollCompleted { card: Card },
    ConfettiLaunched { pieces: usize },
    SlotRerolled { slot: CardSlot, name: String },
}

impl RollEvent {
    pub fn emoji(&self) -> &'static str {
        match self {
            RollEvent::RollStarted => "🎰",
            RollEvent::StepDrawn { .. } => "🎲",
            RollEvent::RollCompleted { .. } => "🏁",
            RollEvent::ConfettiLaunched { .. } => "🎉",
            RollEvent::SlotRerolled { .. } => "🔁",
        }
    }

    /// Quiet events are kept in the log but not emitted through the `log`
    /// facade; the 25 intermediate frames of a roll would drown everything
    /// else out.
    pub fn is_quiet(&self) -> bool {
        matches!(self, RollEvent::StepDrawn { .. })
    }

    pub fn pretty_print(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
        match self {
            RollEvent::RollStarted => write!(f, "Roll started"),
            RollEvent::StepDrawn { step, character } => {
                write!(f, "Step {step}: {character}")
            }
            RollEvent::RollCompleted { card } => {
                write!(f, "Landed on ")?;
                card.pretty_print(f)
            }
            RollEvent::ConfettiLaunched { pieces } => {
                write!(f, "Confetti launched ({pieces} pieces)")
            }
            RollEvent::SlotRerolled { slot, name } => {
                match slot {
                    CardSlot::Character => write!(f, "Character rerolled")?,
                    CardSlot::Accessory(index) => write!(f, "Accessory {} rerolled", index + 1)?,
                }
                write!(f, ": {name}")
            }
        }
    }

    pub fn emit(&self) {
        let mut buf = String::new();

        let emoji = format_emoji(self.emoji(), 2);
        buf.push_str(&emoji);
        buf.push(' ');

        self.pretty_print(&mut buf).ok();
        log::info!("{}", buf);
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, IntoIterator)]
#[serde(transparent)]
pub struct RollLog {
    entries: Vec<RollEvent>,
}

impl RollLog {
    pub fn record(&mut self, event: RollEvent) {
        if !event.is_quiet() {
            event.emit();
        }
        self.entries.push(event);
    }

    pub fn entries(&self) -> &[RollEvent] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn save(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, &self)?;
        Ok(())
    }
}

fn emoji_emoji_presentation(s: &str) -> String {
    if s.chars().any(|c| c == '\u{FE0F}' || c == '\u{200D}') {
        s.to_string()
    } else {
        format!("{s}\u{FE0F}")
    }
}

fn pad_cells(s: &str, field_cells: usize) -> String {
    let w = s.width();
    let pad = field_cells.saturating_sub(w);
    format!("{s}{}", " ".repeat(pad))
}

fn format_emoji(emoji: &str, field_cells: usize) -> String {
    let e = emoji_emoji_presentation(emoji);
    pad_cells(&e, field_cells)
}
