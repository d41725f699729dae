//! Platform-agnostic core - shared between the browser dashboard and the CLI

pub mod interpolator;
pub mod link;
pub mod log;
pub mod parser;
pub mod pose;
pub mod trace;

pub use interpolator::{PoseInterpolator, DEFAULT_LOOKBACK, DEFAULT_SMOOTHING_RATE};
pub use link::{
    outgoing_line, ConnectionId, ConnectionManager, LinkAction, LinkEvent, LinkUpdate,
    ReconnectPolicy, DEFAULT_RECONNECT_DELAY,
};
pub use log::MessageLog;
pub use parser::{parse_frame, FeedEvent, MoveMode, Movement};
pub use pose::{
    ArmGeometry, ArmPoints, Camera, Joint, JointTransforms, Point3, PoseUpdate, RobotPose,
};
pub use trace::{JointTrace, TraceSample, TRACE_WINDOW_SECS};
