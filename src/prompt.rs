//! System preamble assembly.

use chrono::NaiveDateTime;

use crate::memory::render::preamble_summary;
use crate::memory::MemorySnapshot;
use crate::style::Style;

/// Behavioural rules included with every style.
pub const SYSTEM_RULES: &str = "If the user provides numbers or expressions, you must compute the result before responding. \
     Mathematical hints override roleplay behavior. \
     Never use mocking, sarcastic, or dismissive language toward the user. \
     Always be polite, patient, and friendly.";

const AUTO_MODE_NOTE: &str = "Auto mode is enabled. Respond in a human way: natural phrasing, varied rhythm, and warm tone. \
     Avoid robotic templates. Be respectful, emotionally steady, and genuinely friendly.";

/// Timestamp format used in the preamble: `MM/DD/YYYY HH:MM:SS`.
pub const DATETIME_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

/// Build the system message content for one model call.
pub fn build_preamble(
    style: Style,
    auto_mode: bool,
    memory: &MemorySnapshot,
    now: NaiveDateTime,
) -> String {
    let mut parts = vec![style.prompt()];
    if auto_mode {
        parts.push(AUTO_MODE_NOTE);
    }
    parts.push(SYSTEM_RULES);

    format!(
        "{} Current local date and time: {}. {}",
        parts.join(" "),
        now.format(DATETIME_FORMAT),
        preamble_summary(memory)
    )
}
