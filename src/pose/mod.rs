pub mod frame;
pub mod joint;

pub use frame::{
    IngestOptions, JointSample, Landmark, PoseFrame, PoseFrameBuilder, YAxis,
    DEFAULT_VISIBILITY_THRESHOLD,
};
pub use joint::{Joint, JointPair};
