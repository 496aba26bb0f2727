use serde::{Deserialize, Serialize};

/// Body landmarks in the 33-point MediaPipe pose vocabulary.
///
/// Discriminants match the landmark index emitted by the model, so a
/// landmark list can be ingested positionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Joint {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
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

impl Joint {
    pub const COUNT: usize = 33;

    pub const ALL: [Joint; Joint::COUNT] = [
        Joint::Nose,
        Joint::LeftEyeInner,
        Joint::LeftEye,
        Joint::LeftEyeOuter,
        Joint::RightEyeInner,
        Joint::RightEye,
        Joint::RightEyeOuter,
        Joint::LeftEar,
        Joint::RightEar,
        Joint::MouthLeft,
        Joint::MouthRight,
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftWrist,
        Joint::RightWrist,
        Joint::LeftPinky,
        Joint::RightPinky,
        Joint::LeftIndex,
        Joint::RightIndex,
        Joint::LeftThumb,
        Joint::RightThumb,
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftKnee,
        Joint::RightKnee,
        Joint::LeftAnkle,
        Joint::RightAnkle,
        Joint::LeftHeel,
        Joint::RightHeel,
        Joint::LeftFootIndex,
        Joint::RightFootIndex,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Joint> {
        Joint::ALL.get(index).copied()
    }
}

/// A left/right pair of the same landmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointPair {
    pub left: Joint,
    pub right: Joint,
}

pub const SHOULDERS: JointPair = JointPair { left: Joint::LeftShoulder, right: Joint::RightShoulder };
pub const ELBOWS: JointPair = JointPair { left: Joint::LeftElbow, right: Joint::RightElbow };
pub const WRISTS: JointPair = JointPair { left: Joint::LeftWrist, right: Joint::RightWrist };
pub const HIPS: JointPair = JointPair { left: Joint::LeftHip, right: Joint::RightHip };
pub const KNEES: JointPair = JointPair { left: Joint::LeftKnee, right: Joint::RightKnee };
pub const ANKLES: JointPair = JointPair { left: Joint::LeftAnkle, right: Joint::RightAnkle };
pub const EARS: JointPair = JointPair { left: Joint::LeftEar, right: Joint::RightEar };
