//! Equivalence of two extracted regions after normalization.

use crate::normalize::normalize;
use htmlsync_types::report::FirstDifference;

/// Characters of context shown on each side of the first difference.
pub const CONTEXT_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    InSync {
        chars: usize,
    },
    OutOfSync {
        standalone_chars: usize,
        firmware_chars: usize,
        /// `None` when one normalized region is a strict prefix of the other.
        first_difference: Option<FirstDifference>,
    },
}

impl Comparison {
    pub fn is_in_sync(&self) -> bool {
        matches!(self, Comparison::InSync { .. })
    }
}

/// Normalize both regions and compare them.
pub fn compare(standalone: &str, firmware: &str) -> Comparison {
    let standalone = normalize(standalone);
    let firmware = normalize(firmware);
    compare_normalized(&standalone, &firmware)
}

/// Compare two already-normalized regions.
pub fn compare_normalized(standalone: &str, firmware: &str) -> Comparison {
    if standalone == firmware {
        return Comparison::InSync {
            chars: standalone.chars().count(),
        };
    }

    Comparison::OutOfSync {
        standalone_chars: standalone.chars().count(),
        firmware_chars: firmware.chars().count(),
        first_difference: first_difference(standalone, firmware),
    }
}

/// First differing character index within the shared length, with surrounding context.
pub fn first_difference(standalone: &str, firmware: &str) -> Option<FirstDifference> {
    let position = standalone
        .chars()
        .zip(firmware.chars())
        .position(|(a, b)| a != b)?;

    Some(FirstDifference {
        position: position as u64,
        standalone_context: context_window(standalone, position),
        firmware_context: context_window(firmware, position),
    })
}

fn context_window(text: &str, position: usize) -> String {
    let start = position.saturating_sub(CONTEXT_CHARS);
    text.chars()
        .skip(start)
        .take(position + CONTEXT_CHARS - start)
        .collect()
}
