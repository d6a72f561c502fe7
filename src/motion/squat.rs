use super::{CountListener, Landmark, LandmarkKind, MotionCounter, Pose};

/// Hip-to-knee gap below which the pose counts as squatting.
const SQUAT_THRESHOLD: f64 = 110.0;
const REARM_FACTOR: f64 = 1.35;

const ARM_ANGLE_TARGET: f64 = 80.0;
const MAX_ARM_DEVIATION: f64 = 45.0;

const REQUIRED_LANDMARKS: [LandmarkKind; 10] = [
    LandmarkKind::LeftHip,
    LandmarkKind::LeftKnee,
    LandmarkKind::RightHip,
    LandmarkKind::RightKnee,
    LandmarkKind::LeftShoulder,
    LandmarkKind::LeftElbow,
    LandmarkKind::LeftWrist,
    LandmarkKind::RightShoulder,
    LandmarkKind::RightElbow,
    LandmarkKind::RightWrist,
];

pub struct SquatCounter {
    max_count: u32,
    count: u32,
    was_squatting: bool,
    fully_stood: bool,
    listener: Option<CountListener>,
}

impl SquatCounter {
    pub fn new(max_count: u32) -> Self {
        Self {
            max_count,
            count: 0,
            was_squatting: false,
            fully_stood: true,
            listener: None,
        }
    }

    fn arms_in_front(pose: &Pose) -> bool {
        let (
            Some(left_hip),
            Some(right_hip),
            Some(left_shoulder),
            Some(left_elbow),
            Some(right_shoulder),
            Some(right_elbow),
        ) = (
            pose.landmark(LandmarkKind::LeftHip),
            pose.landmark(LandmarkKind::RightHip),
            pose.landmark(LandmarkKind::LeftShoulder),
            pose.landmark(LandmarkKind::LeftElbow),
            pose.landmark(LandmarkKind::RightShoulder),
            pose.landmark(LandmarkKind::RightElbow),
        )
        else {
            return false;
        };

        let spine_mid = (
            (f64::from(left_hip.x) + f64::from(right_hip.x)) / 2.0,
            (f64::from(left_hip.y) + f64::from(right_hip.y)) / 2.0,
        );
        let left_angle = Self::shoulder_angle(spine_mid, left_shoulder, left_elbow);
        let right_angle = Self::shoulder_angle(spine_mid, right_shoulder, right_elbow);

        (left_angle - ARM_ANGLE_TARGET).abs() < MAX_ARM_DEVIATION
            && (right_angle - ARM_ANGLE_TARGET).abs() < MAX_ARM_DEVIATION
    }

    /// Angle at the shoulder between the spine midpoint and the elbow, in degrees.
    fn shoulder_angle(spine_mid: (f64, f64), shoulder: &Landmark, elbow: &Landmark) -> f64 {
        let (sx, sy) = (f64::from(shoulder.x), f64::from(shoulder.y));
        let angle = (f64::atan2(f64::from(elbow.y) - sy, f64::from(elbow.x) - sx)
            - f64::atan2(spine_mid.1 - sy, spine_mid.0 - sx))
        .to_degrees();
        if angle > 180.0 {
            360.0 - angle
        } else {
            angle
        }
    }

    fn hip_to_knee_gap(pose: &Pose, hip: LandmarkKind, knee: LandmarkKind) -> Option<f64> {
        let hip = pose.landmark(hip)?;
        let knee = pose.landmark(knee)?;
        Some(f64::from((hip.y - knee.y).abs()))
    }
}

impl MotionCounter for SquatCounter {
    fn set_count_listener(&mut self, listener: Option<CountListener>) {
        self.listener = listener;
    }

    fn on_pose_detected(&mut self, pose: &Pose) {
        if self.count >= self.max_count {
            return;
        }
        if !REQUIRED_LANDMARKS
            .iter()
            .all(|kind| pose.landmark(*kind).is_some())
        {
            return;
        }
        let (Some(left_gap), Some(right_gap)) = (
            Self::hip_to_knee_gap(pose, LandmarkKind::LeftHip, LandmarkKind::LeftKnee),
            Self::hip_to_knee_gap(pose, LandmarkKind::RightHip, LandmarkKind::RightKnee),
        ) else {
            return;
        };
        let average_gap = (left_gap + right_gap) / 2.0;

        let is_squatting = average_gap < SQUAT_THRESHOLD;
        let arms_extended = Self::arms_in_front(pose);

        if !self.was_squatting && is_squatting && self.fully_stood && arms_extended {
            self.count += 1;
            if let Some(listener) = self.listener.as_mut() {
                listener(self.count);
            }
            self.fully_stood = false;
        }

        if average_gap > SQUAT_THRESHOLD * REARM_FACTOR {
            self.fully_stood = true;
        }

        self.was_squatting = is_squatting;

        let arms = if arms_extended { "OK" } else { "Bad" };
        tracing::debug!(count = self.count, average_gap, arms, "Squat frame");
    }

    fn reset(&mut self) {
        self.count = 0;
        self.was_squatting = false;
        self.fully_stood = true;
    }

    fn count(&self) -> u32 {
        self.count
    }
}
