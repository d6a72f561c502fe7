use super::{CountListener, Landmark, LandmarkKind, MotionCounter, Pose};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

const MIN_CONFIDENCE: f32 = 0.4;
const COOLDOWN: Duration = Duration::from_millis(1500);
const MIN_HOLD: Duration = Duration::from_millis(300);
const LIFT_TIMEOUT: Duration = Duration::from_millis(8000);

/// Standing heights measured during calibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeelRaiseBaseline {
    pub left_heel_y: f32,
    pub right_heel_y: f32,
    pub left_eye_y: f32,
    pub right_eye_y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeelRaiseThresholds {
    /// Fraction of the left heel baseline a heel must rise to count as raised.
    pub raise_ratio: f32,
    /// Fraction of the left heel baseline within which a heel counts as back down.
    pub return_ratio: f32,
    /// Pixels both eyes must rise to back up a single raised heel.
    pub eye_raise: f32,
}

impl Default for HeelRaiseThresholds {
    fn default() -> Self {
        Self {
            raise_ratio: 0.01,
            return_ratio: 0.12,
            eye_raise: 8.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeelRaiseState {
    Idle,
    Lifted { since: Duration },
}

pub struct HeelRaiseCounter {
    max_count: u32,
    baseline: HeelRaiseBaseline,
    thresholds: HeelRaiseThresholds,
    state: HeelRaiseState,
    count: u32,
    last_count_at: Option<Duration>,
    listener: Option<CountListener>,
    started: Instant,
}

impl HeelRaiseCounter {
    pub fn new(
        max_count: u32,
        baseline: HeelRaiseBaseline,
        thresholds: HeelRaiseThresholds,
    ) -> Self {
        Self {
            max_count,
            baseline,
            thresholds,
            state: HeelRaiseState::Idle,
            count: 0,
            last_count_at: None,
            listener: None,
            started: Instant::now(),
        }
    }

    pub fn state(&self) -> HeelRaiseState {
        self.state
    }

    fn confident(pose: &Pose, kind: LandmarkKind) -> Option<&Landmark> {
        pose.landmark(kind)
            .filter(|landmark| landmark.in_frame_likelihood >= MIN_CONFIDENCE)
    }

    fn cooled_down(&self, now: Duration) -> bool {
        self.last_count_at
            .map_or(true, |last| now.saturating_sub(last) > COOLDOWN)
    }

    /// Feeds one frame observed at `now`, measured from any fixed origin.
    pub fn on_pose_at(&mut self, pose: &Pose, now: Duration) {
        if self.count >= self.max_count {
            return;
        }
        let (Some(left_heel), Some(right_heel), Some(left_eye), Some(right_eye)) = (
            Self::confident(pose, LandmarkKind::LeftHeel),
            Self::confident(pose, LandmarkKind::RightHeel),
            Self::confident(pose, LandmarkKind::LeftEye),
            Self::confident(pose, LandmarkKind::RightEye),
        ) else {
            return;
        };

        let HeelRaiseBaseline {
            left_heel_y,
            right_heel_y,
            left_eye_y,
            right_eye_y,
        } = self.baseline;
        let raise_threshold = left_heel_y * self.thresholds.raise_ratio;
        let return_threshold = left_heel_y * self.thresholds.return_ratio;

        let left_diff = left_heel_y - left_heel.y;
        let right_diff = right_heel_y - right_heel.y;
        let left_eye_diff = left_eye_y - left_eye.y;
        let right_eye_diff = right_eye_y - right_eye.y;

        let both_heels_raised = left_diff > raise_threshold && right_diff > raise_threshold;
        let one_heel_raised = left_diff > raise_threshold || right_diff > raise_threshold;
        let both_eyes_raised = left_eye_diff > self.thresholds.eye_raise
            && right_eye_diff > self.thresholds.eye_raise;
        let both_returned = (left_heel.y - left_heel_y).abs() < return_threshold
            && (right_heel.y - right_heel_y).abs() < return_threshold;

        match self.state {
            HeelRaiseState::Idle => {
                if (both_heels_raised || (one_heel_raised && both_eyes_raised))
                    && self.cooled_down(now)
                {
                    self.state = HeelRaiseState::Lifted { since: now };
                    tracing::debug!("Heels lifted");
                }
            }
            HeelRaiseState::Lifted { since } => {
                let held = now.saturating_sub(since);
                if both_returned {
                    if held > MIN_HOLD {
                        if self.cooled_down(now) {
                            self.count += 1;
                            self.last_count_at = Some(now);
                            if let Some(listener) = self.listener.as_mut() {
                                listener(self.count);
                            }
                            tracing::debug!(count = self.count, "Heel raise counted");
                        } else {
                            tracing::debug!("Heel raise ignored during cooldown");
                        }
                        self.state = HeelRaiseState::Idle;
                    }
                } else if held > LIFT_TIMEOUT {
                    self.state = HeelRaiseState::Idle;
                    tracing::debug!("Heels lifted too long, back to idle");
                }
            }
        }

        tracing::debug!(
            state = ?self.state,
            left_heel = left_heel.y,
            right_heel = right_heel.y,
            left_diff,
            right_diff,
            raise_threshold,
            return_threshold,
            "Heel raise frame"
        );
    }
}

impl MotionCounter for HeelRaiseCounter {
    fn set_count_listener(&mut self, listener: Option<CountListener>) {
        self.listener = listener;
    }

    fn on_pose_detected(&mut self, pose: &Pose) {
        let now = self.started.elapsed();
        self.on_pose_at(pose, now);
    }

    fn reset(&mut self) {
        self.count = 0;
        self.state = HeelRaiseState::Idle;
        self.last_count_at = None;
        tracing::debug!("Heel raise counter reset");
    }

    fn count(&self) -> u32 {
        self.count
    }
}
