mod coordinate_mapper;
mod heel_raise;
mod squat;

pub use coordinate_mapper::CoordinateMapper;
pub use heel_raise::{HeelRaiseBaseline, HeelRaiseCounter, HeelRaiseState, HeelRaiseThresholds};
pub use squat::SquatCounter;

use serde::{Deserialize, Serialize};

/// Body landmarks in the order the pose detector numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LandmarkKind {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    LeftMouth = 9,
    RightMouth = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl LandmarkKind {
    pub fn index(self) -> u8 {
        self as u8
    }
}

/// Image-space position, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub kind: LandmarkKind,
    pub x: f32,
    pub y: f32,
    pub in_frame_likelihood: f32,
}

impl Landmark {
    pub fn new(kind: LandmarkKind, x: f32, y: f32, in_frame_likelihood: f32) -> Self {
        Self {
            kind,
            x,
            y,
            in_frame_likelihood,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    landmarks: Vec<Landmark>,
}

impl Pose {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn landmark(&self, kind: LandmarkKind) -> Option<&Landmark> {
        self.landmarks.iter().find(|landmark| landmark.kind == kind)
    }
}

/// One line of a pose replay file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    pub timestamp_ms: u64,
    #[serde(flatten)]
    pub pose: Pose,
}

/// Called with the new count every time a rep is counted.
pub type CountListener = Box<dyn FnMut(u32) + Send>;

pub trait MotionCounter {
    fn set_count_listener(&mut self, listener: Option<CountListener>);
    fn on_pose_detected(&mut self, pose: &Pose);
    fn reset(&mut self);
    fn count(&self) -> u32;
}
