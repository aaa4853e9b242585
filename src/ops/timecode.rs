use crate::model::TimelineConfig;

/// `SS:FF` timecode for a frame at `fps`
pub fn timecode(frame: u32, fps: u32) -> String {
    let fps = fps.max(1);
    format!("{:02}:{:02}", frame / fps, frame % fps)
}

/// Whole seconds covered by the timeline
pub fn total_seconds(max_frames: u32, fps: u32) -> u32 {
    max_frames / fps.max(1)
}

/// Seconds with one decimal, for hover readouts: `2.5s`
pub fn seconds_label(frame: u32, fps: u32) -> String {
    format!("{:.1}s", frame as f64 / fps.max(1) as f64)
}

/// `00:05 / 10s  Frame 125 / 240`
pub fn frame_readout(frame: u32, timeline: &TimelineConfig) -> String {
    format!(
        "{} / {}s  Frame {} / {}",
        timecode(frame, timeline.fps),
        total_seconds(timeline.max_frames, timeline.fps),
        frame,
        timeline.max_frames
    )
}

/// Tick frames from 0 through `max_frames` inclusive, every `interval` frames
pub fn ruler_ticks(max_frames: u32, interval: u32) -> Vec<u32> {
    let interval = interval.max(1);
    (0..=max_frames).step_by(interval as usize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timecode_splits_seconds_and_frames() {
        assert_eq!(timecode(0, 24), "00:00");
        assert_eq!(timecode(23, 24), "00:23");
        assert_eq!(timecode(24, 24), "01:00");
        assert_eq!(timecode(125, 24), "05:05");
    }

    #[test]
    fn readout() {
        let tl = TimelineConfig::default();
        assert_eq!(frame_readout(125, &tl), "05:05 / 10s  Frame 125 / 240");
    }

    #[test]
    fn seconds_label_rounds_to_tenths() {
        assert_eq!(seconds_label(60, 24), "2.5s");
        assert_eq!(seconds_label(0, 24), "0.0s");
    }

    #[test]
    fn zero_fps_does_not_divide_by_zero() {
        assert_eq!(timecode(5, 0), "05:00");
        assert_eq!(total_seconds(240, 0), 240);
    }

    #[test]
    fn ticks_include_both_ends() {
        assert_eq!(ruler_ticks(30, 10), vec![0, 10, 20, 30]);
        assert_eq!(ruler_ticks(25, 10), vec![0, 10, 20]);
        assert_eq!(ruler_ticks(240, 10).len(), 25);
    }
}
