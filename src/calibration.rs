use crate::motion::{HeelRaiseBaseline, LandmarkKind, Pose};
use std::collections::BTreeMap;

const MIN_CONFIDENCE: f32 = 0.4;
const GUIDE_BOX_MARGIN: f32 = 0.08;

pub const TARGET_SAMPLES: usize = 100;
pub const MIN_SAMPLES: usize = 30;

const CONFIDENCE_LANDMARKS: [LandmarkKind; 10] = [
    LandmarkKind::LeftShoulder,
    LandmarkKind::RightShoulder,
    LandmarkKind::LeftHip,
    LandmarkKind::RightHip,
    LandmarkKind::LeftKnee,
    LandmarkKind::RightKnee,
    LandmarkKind::LeftAnkle,
    LandmarkKind::RightAnkle,
    LandmarkKind::LeftHeel,
    LandmarkKind::RightHeel,
];

const GUIDE_BOX_LANDMARKS: [LandmarkKind; 4] = [
    LandmarkKind::LeftShoulder,
    LandmarkKind::RightShoulder,
    LandmarkKind::LeftHip,
    LandmarkKind::RightHip,
];

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum CalibrationError {
    #[error("Not enough calibration poses ({collected}/{required})")]
    InsufficientData { collected: usize, required: usize },
}

pub fn is_high_confidence_pose(pose: &Pose) -> bool {
    for kind in CONFIDENCE_LANDMARKS {
        match pose.landmark(kind) {
            Some(landmark) if landmark.in_frame_likelihood >= MIN_CONFIDENCE => {}
            other => {
                tracing::warn!(
                    landmark = ?kind,
                    likelihood = ?other.map(|landmark| landmark.in_frame_likelihood),
                    "Landmark confidence too low"
                );
                return false;
            }
        }
    }
    true
}

/// Whether shoulders and hips sit inside the frame minus an 8% margin on each side.
pub fn is_in_guide_box(pose: &Pose, frame_width: f32, frame_height: f32) -> bool {
    let margin_x = frame_width * GUIDE_BOX_MARGIN;
    let margin_y = frame_height * GUIDE_BOX_MARGIN;
    let x_range = margin_x..=frame_width - margin_x;
    let y_range = margin_y..=frame_height - margin_y;
    GUIDE_BOX_LANDMARKS.iter().all(|kind| {
        pose.landmark(*kind)
            .is_some_and(|landmark| x_range.contains(&landmark.x) && y_range.contains(&landmark.y))
    })
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    Some(if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    })
}

/// Median standing position of every landmark seen during calibration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Baseline {
    medians: BTreeMap<LandmarkKind, (f64, f64)>,
}

impl Baseline {
    pub fn median(&self, kind: LandmarkKind) -> Option<(f64, f64)> {
        self.medians.get(&kind).copied()
    }

    fn median_y(&self, kind: LandmarkKind) -> Option<f32> {
        self.median(kind).map(|(_, y)| y as f32)
    }

    pub fn heel_raise_baseline(&self) -> Option<HeelRaiseBaseline> {
        Some(HeelRaiseBaseline {
            left_heel_y: self.median_y(LandmarkKind::LeftHeel)?,
            right_heel_y: self.median_y(LandmarkKind::RightHeel)?,
            left_eye_y: self.median_y(LandmarkKind::LeftEye)?,
            right_eye_y: self.median_y(LandmarkKind::RightEye)?,
        })
    }

    /// Flat map keyed by landmark index (`"29_y"`) plus named heel and eye heights.
    pub fn values(&self) -> BTreeMap<String, f64> {
        let mut values = BTreeMap::new();
        for (kind, (x, y)) in &self.medians {
            values.insert(format!("{}_x", kind.index()), *x);
            values.insert(format!("{}_y", kind.index()), *y);
            let named = match kind {
                LandmarkKind::LeftHeel => "left_heel_y",
                LandmarkKind::RightHeel => "right_heel_y",
                LandmarkKind::LeftEye => "left_eye_y",
                LandmarkKind::RightEye => "right_eye_y",
                _ => continue,
            };
            values.insert(named.to_owned(), *y);
        }
        values
    }
}

pub fn calibrate_baseline(poses: &[Pose]) -> Result<Baseline, CalibrationError> {
    if poses.len() < MIN_SAMPLES {
        return Err(CalibrationError::InsufficientData {
            collected: poses.len(),
            required: MIN_SAMPLES,
        });
    }
    let mut samples: BTreeMap<LandmarkKind, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for landmark in poses.iter().flat_map(Pose::landmarks) {
        let (xs, ys) = samples.entry(landmark.kind).or_default();
        xs.push(f64::from(landmark.x));
        ys.push(f64::from(landmark.y));
    }
    let medians = samples
        .into_iter()
        .filter_map(|(kind, (mut xs, mut ys))| Some((kind, (median(&mut xs)?, median(&mut ys)?))))
        .collect();
    Ok(Baseline { medians })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    Accepted { collected: usize, percent: u8 },
    LowConfidence,
    OutOfBox,
    LowConfidenceOutOfBox,
}

/// Collects confident, well-framed poses until [`TARGET_SAMPLES`] are in.
#[derive(Debug, Clone)]
pub struct CalibrationSession {
    frame_width: f32,
    frame_height: f32,
    poses: Vec<Pose>,
}

impl CalibrationSession {
    pub fn new(frame_width: f32, frame_height: f32) -> Self {
        Self {
            frame_width,
            frame_height,
            poses: Vec::with_capacity(TARGET_SAMPLES),
        }
    }

    pub fn push(&mut self, pose: Pose) -> SampleOutcome {
        let in_box = is_in_guide_box(&pose, self.frame_width, self.frame_height);
        let confident = is_high_confidence_pose(&pose);
        match (confident, in_box) {
            (true, true) => {
                self.poses.push(pose);
                let collected = self.poses.len();
                let percent = (collected.min(TARGET_SAMPLES) * 100 / TARGET_SAMPLES) as u8;
                tracing::debug!(collected, percent, "Calibration progress");
                SampleOutcome::Accepted { collected, percent }
            }
            (false, false) => {
                tracing::warn!("Ignoring pose: low confidence and outside the guide box");
                SampleOutcome::LowConfidenceOutOfBox
            }
            (false, true) => {
                tracing::warn!("Ignoring pose: low confidence");
                SampleOutcome::LowConfidence
            }
            (true, false) => {
                tracing::warn!("Ignoring pose: outside the guide box");
                SampleOutcome::OutOfBox
            }
        }
    }

    pub fn collected(&self) -> usize {
        self.poses.len()
    }

    pub fn is_complete(&self) -> bool {
        self.poses.len() >= TARGET_SAMPLES
    }

    pub fn finish(&self) -> Result<Baseline, CalibrationError> {
        calibrate_baseline(&self.poses)
    }
}
