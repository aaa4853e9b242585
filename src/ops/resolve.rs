use crate::model::{Schedule, ScheduledPrompt};

/// The prompt in effect at `current_frame`: the entry with the greatest
/// frame not after it. A prompt holds until a later one's frame is reached.
///
/// Recomputed from scratch on every call so it can never drift from the
/// schedule it reads.
pub fn resolve_active(schedule: &Schedule, current_frame: u32) -> Option<ScheduledPrompt> {
    schedule.nearest_at_or_before(current_frame)
}

/// Frame of the active prompt, if any
pub fn active_frame(schedule: &Schedule, current_frame: u32) -> Option<u32> {
    resolve_active(schedule, current_frame).map(|p| p.frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(entries: &[(u32, &str)]) -> Schedule {
        entries.iter().map(|(f, t)| (*f, *t)).collect()
    }

    #[test]
    fn nothing_scheduled_means_nothing_active() {
        assert_eq!(resolve_active(&Schedule::new(), 100), None);
    }

    #[test]
    fn prompt_holds_until_the_next_one() {
        let s = schedule(&[(0, "A"), (50, "B")]);
        assert_eq!(resolve_active(&s, 0).unwrap().text, "A");
        assert_eq!(resolve_active(&s, 49).unwrap().text, "A");
        assert_eq!(resolve_active(&s, 50).unwrap().text, "B");
        assert_eq!(resolve_active(&s, 239).unwrap().text, "B");
    }

    #[test]
    fn before_the_first_prompt_nothing_is_active() {
        let s = schedule(&[(20, "late start")]);
        assert_eq!(active_frame(&s, 19), None);
        assert_eq!(active_frame(&s, 20), Some(20));
    }

    #[test]
    fn active_frame_is_monotonic() {
        let s = schedule(&[(0, "a"), (7, "b"), (33, "c"), (34, "d"), (200, "e")]);
        let mut last: Option<u32> = None;
        for f in 0..240 {
            let now = active_frame(&s, f);
            if let (Some(prev), Some(cur)) = (last, now) {
                assert!(cur >= prev, "frame {f}: {cur} < {prev}");
            }
            if now.is_some() {
                last = now;
            }
        }
    }
}
