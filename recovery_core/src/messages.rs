//! Narrative messages keyed on days clean.

/// `(first_day, message)` pairs in ascending order of `first_day`
const RECOVERY_MESSAGES: [(u32, &str); 9] = [
    (0, "Your journey starts now. Every hour without nicotine counts."),
    (1, "Nicotine is leaving your body and oxygen levels are climbing."),
    (3, "Cravings peak around now. They pass within minutes, so ride them out."),
    (7, "One week down. Taste and smell are already sharper."),
    (14, "Circulation is improving and breathing is getting easier."),
    (30, "A month clean. Your brain's reward system is rebalancing."),
    (90, "Three months in. New habits are becoming second nature."),
    (180, "Half a year free. Your lungs and heart keep repairing."),
    (365, "A full year without nicotine. Your long-term health risks keep falling."),
];

/// Message for the bucket containing `days`
pub fn recovery_message(days: u32) -> &'static str {
    RECOVERY_MESSAGES
        .iter()
        .rev()
        .find(|(start, _)| *start <= days)
        .map(|(_, message)| *message)
        .unwrap_or(RECOVERY_MESSAGES[0].1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buckets_ascending() {
        for pair in RECOVERY_MESSAGES.windows(2) {
            assert!(pair[0].0 < pair[1].0);
        }
        assert_eq!(RECOVERY_MESSAGES[0].0, 0);
    }

    #[test]
    fn test_message_lookup() {
        assert!(recovery_message(0).starts_with("Your journey starts"));
        assert!(recovery_message(2).starts_with("Nicotine is leaving"));
        assert!(recovery_message(7).starts_with("One week down"));
        assert!(recovery_message(29).starts_with("Circulation"));
        assert!(recovery_message(30).starts_with("A month clean"));
        assert!(recovery_message(10_000).starts_with("A full year"));
    }
}
