//! Arm pose model: joint angles, partial updates, and the joint-to-visual mapping
//!
//! Angles are degrees. The conceptual range is [0, 180] but nothing here
//! enforces it; the backend owns validation.

use serde::{Deserialize, Serialize};

/// One rotational degree of freedom of the arm
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Joint {
    Base,
    Shoulder,
    Elbow,
}

impl Joint {
    pub const ALL: [Joint; 3] = [Joint::Base, Joint::Shoulder, Joint::Elbow];

    /// Field name used on the wire (`hombro`/`codo` come from the backend)
    pub fn wire_name(self) -> &'static str {
        match self {
            Joint::Base => "base",
            Joint::Shoulder => "hombro",
            Joint::Elbow => "codo",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|j| j.wire_name() == name)
    }

    pub fn label(self) -> &'static str {
        match self {
            Joint::Base => "base",
            Joint::Shoulder => "shoulder",
            Joint::Elbow => "elbow",
        }
    }
}

/// Joint-angle triple, shaped like the backend's `/robot/state` body
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RobotPose {
    pub base: f64,
    #[serde(rename = "hombro")]
    pub shoulder: f64,
    #[serde(rename = "codo")]
    pub elbow: f64,
}

impl RobotPose {
    pub fn new(base: f64, shoulder: f64, elbow: f64) -> Self {
        Self { base, shoulder, elbow }
    }

    pub fn get(&self, joint: Joint) -> f64 {
        match joint {
            Joint::Base => self.base,
            Joint::Shoulder => self.shoulder,
            Joint::Elbow => self.elbow,
        }
    }

    pub fn set(&mut self, joint: Joint, value: f64) {
        match joint {
            Joint::Base => self.base = value,
            Joint::Shoulder => self.shoulder = value,
            Joint::Elbow => self.elbow = value,
        }
    }

    /// Move each joint a fraction `t` of the way toward `target`.
    /// `t` is expected in [0, 1]; callers clamp.
    pub fn blend_toward(&self, target: &RobotPose, t: f64) -> RobotPose {
        let mut out = *self;
        for joint in Joint::ALL {
            let from = self.get(joint);
            out.set(joint, from + (target.get(joint) - from) * t);
        }
        out
    }

    /// Largest per-joint distance to `other`
    pub fn max_abs_diff(&self, other: &RobotPose) -> f64 {
        Joint::ALL
            .into_iter()
            .map(|j| (self.get(j) - other.get(j)).abs())
            .fold(0.0, f64::max)
    }

    pub fn transforms(&self) -> JointTransforms {
        JointTransforms::from_pose(self)
    }
}

/// Partial pose: only present joints overwrite the target
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PoseUpdate {
    pub base: Option<f64>,
    pub shoulder: Option<f64>,
    pub elbow: Option<f64>,
}

impl PoseUpdate {
    pub fn get(&self, joint: Joint) -> Option<f64> {
        match joint {
            Joint::Base => self.base,
            Joint::Shoulder => self.shoulder,
            Joint::Elbow => self.elbow,
        }
    }

    pub fn set(&mut self, joint: Joint, value: f64) {
        match joint {
            Joint::Base => self.base = Some(value),
            Joint::Shoulder => self.shoulder = Some(value),
            Joint::Elbow => self.elbow = Some(value),
        }
    }

    pub fn is_empty(&self) -> bool {
        Joint::ALL.into_iter().all(|j| self.get(j).is_none())
    }

    /// Overwrite the present joints of `pose`. Returns true if anything changed.
    pub fn apply_to(&self, pose: &mut RobotPose) -> bool {
        let mut changed = false;
        for joint in Joint::ALL {
            if let Some(value) = self.get(joint) {
                if pose.get(joint) != value {
                    pose.set(joint, value);
                    changed = true;
                }
            }
        }
        changed
    }
}

impl From<RobotPose> for PoseUpdate {
    fn from(pose: RobotPose) -> Self {
        Self {
            base: Some(pose.base),
            shoulder: Some(pose.shoulder),
            elbow: Some(pose.elbow),
        }
    }
}

/// Joint angles converted to the rotations applied to the arm model (radians).
///
/// Base is a yaw about the vertical axis. Shoulder and elbow are pitches with
/// 90° as the upright rest position: `-(angle - 90)`, so 0° and 180° lie flat
/// in opposite directions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointTransforms {
    pub base_yaw: f64,
    pub shoulder_pitch: f64,
    pub elbow_pitch: f64,
}

impl JointTransforms {
    pub fn from_pose(pose: &RobotPose) -> Self {
        Self {
            base_yaw: pose.base.to_radians(),
            shoulder_pitch: upright_pitch(pose.shoulder),
            elbow_pitch: upright_pitch(pose.elbow),
        }
    }
}

fn upright_pitch(degrees: f64) -> f64 {
    -(degrees - 90.0).to_radians()
}

/// Point in model space: x right, y up, z toward the viewer
pub type Point3 = [f64; 3];

/// Segment lengths of the drawn arm model
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArmGeometry {
    pub base_height: f64,
    pub upper_arm: f64,
    pub forearm: f64,
}

impl Default for ArmGeometry {
    fn default() -> Self {
        Self {
            base_height: 1.5,
            upper_arm: 4.5,
            forearm: 3.8,
        }
    }
}

/// Joint positions produced by [`ArmGeometry::forward`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArmPoints {
    pub base: Point3,
    pub shoulder: Point3,
    pub elbow: Point3,
    pub wrist: Point3,
}

impl ArmGeometry {
    /// Forward kinematics. The elbow pitch is relative to the upper arm.
    pub fn forward(&self, t: &JointTransforms) -> ArmPoints {
        let shoulder = [0.0, self.base_height, 0.0];
        let elbow = add(shoulder, pitch_dir(t.shoulder_pitch, self.upper_arm));
        let wrist = add(elbow, pitch_dir(t.shoulder_pitch + t.elbow_pitch, self.forearm));
        ArmPoints {
            base: [0.0, 0.0, 0.0],
            shoulder,
            elbow: yaw(elbow, t.base_yaw),
            wrist: yaw(wrist, t.base_yaw),
        }
    }

    pub fn reach(&self) -> f64 {
        self.base_height + self.upper_arm + self.forearm
    }
}

// Unit +y rotated about x by `pitch`, scaled
fn pitch_dir(pitch: f64, len: f64) -> Point3 {
    [0.0, pitch.cos() * len, pitch.sin() * len]
}

fn yaw(p: Point3, angle: f64) -> Point3 {
    let (s, c) = angle.sin_cos();
    [p[0] * c + p[2] * s, p[1], -p[0] * s + p[2] * c]
}

fn add(a: Point3, b: Point3) -> Point3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

/// Fixed orthographic camera
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    yaw: f64,
    pitch: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(35.0, 20.0)
    }
}

impl Camera {
    /// `yaw_deg` turns the scene about the vertical axis, `pitch_deg` tilts it
    /// toward the viewer so the floor is visible.
    pub fn new(yaw_deg: f64, pitch_deg: f64) -> Self {
        Self {
            yaw: yaw_deg.to_radians(),
            pitch: pitch_deg.to_radians(),
        }
    }

    /// Model point to view-plane coordinates (x right, y up)
    pub fn project(&self, p: Point3) -> [f64; 2] {
        let (sy, cy) = self.yaw.sin_cos();
        let x = p[0] * cy + p[2] * sy;
        let z = -p[0] * sy + p[2] * cy;
        let (sp, cp) = self.pitch.sin_cos();
        [x, p[1] * cp - z * sp]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: Point3, b: Point3) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < EPS)
    }

    #[test]
    fn partial_update_touches_only_present_joints() {
        let mut pose = RobotPose::new(10.0, 20.0, 30.0);
        let update = PoseUpdate { base: Some(45.0), ..Default::default() };
        assert!(update.apply_to(&mut pose));
        assert_eq!(pose, RobotPose::new(45.0, 20.0, 30.0));
    }

    #[test]
    fn empty_update_is_noop() {
        let mut pose = RobotPose::new(1.0, 2.0, 3.0);
        let update = PoseUpdate::default();
        assert!(update.is_empty());
        assert!(!update.apply_to(&mut pose));
        assert_eq!(pose, RobotPose::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn serializes_with_backend_field_names() {
        let json = serde_json::to_value(RobotPose::new(90.0, 0.0, 180.0)).unwrap();
        assert_eq!(json, serde_json::json!({"base": 90.0, "hombro": 0.0, "codo": 180.0}));
        let back: RobotPose = serde_json::from_str(r#"{"base":1,"hombro":2,"codo":3}"#).unwrap();
        assert_eq!(back, RobotPose::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn ninety_degrees_is_upright() {
        let t = RobotPose::new(0.0, 90.0, 90.0).transforms();
        assert_eq!(t.shoulder_pitch, 0.0);
        assert_eq!(t.elbow_pitch, 0.0);

        let geometry = ArmGeometry::default();
        let points = geometry.forward(&t);
        assert!(close(points.wrist, [0.0, geometry.reach(), 0.0]));
    }

    #[test]
    fn extremes_point_in_opposite_horizontal_directions() {
        let zero = RobotPose::new(0.0, 0.0, 90.0).transforms();
        let full = RobotPose::new(0.0, 180.0, 90.0).transforms();
        assert!((zero.shoulder_pitch - std::f64::consts::FRAC_PI_2).abs() < EPS);
        assert!((full.shoulder_pitch + std::f64::consts::FRAC_PI_2).abs() < EPS);

        let geometry = ArmGeometry::default();
        let a = geometry.forward(&zero);
        let b = geometry.forward(&full);
        assert!(close(a.elbow, [0.0, 1.5, 4.5]));
        assert!(close(b.elbow, [0.0, 1.5, -4.5]));
    }

    #[test]
    fn base_yaw_rotates_about_vertical() {
        let t = RobotPose::new(90.0, 0.0, 90.0).transforms();
        let points = ArmGeometry::default().forward(&t);
        // Upper arm lay along +z; a quarter turn moves it onto +x
        assert!(close(points.elbow, [4.5, 1.5, 0.0]));
        assert!((points.wrist[1] - 1.5).abs() < EPS);
    }

    #[test]
    fn joint_wire_names_round_trip() {
        for joint in Joint::ALL {
            assert_eq!(Joint::from_wire_name(joint.wire_name()), Some(joint));
        }
        assert_eq!(Joint::from_wire_name("shoulder"), None);
    }

    fn close_2d(a: [f64; 2], b: [f64; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-9 && (a[1] - b[1]).abs() < 1e-9
    }

    #[test]
    fn straight_on_camera_is_identity_on_xy() {
        let cam = Camera::new(0.0, 0.0);
        assert!(close_2d(cam.project([1.5, 2.0, 7.0]), [1.5, 2.0]));
    }

    #[test]
    fn tilt_pushes_near_points_down() {
        let cam = Camera::new(0.0, 30.0);
        let near = cam.project([0.0, 0.0, 1.0]);
        let far = cam.project([0.0, 0.0, -1.0]);
        assert!(near[1] < 0.0);
        assert!(far[1] > 0.0);
        assert!(close_2d(cam.project([0.0, 0.0, 0.0]), [0.0, 0.0]));
    }

    #[test]
    fn yaw_keeps_height() {
        let cam = Camera::new(90.0, 0.0);
        let p = cam.project([0.0, 3.0, 2.0]);
        assert!(close_2d(p, [2.0, 3.0]));
    }

    #[test]
    fn upright_arm_projects_above_origin() {
        let cam = Camera::default();
        let geometry = ArmGeometry::default();
        let points = geometry.forward(&RobotPose::new(0.0, 90.0, 90.0).transforms());
        let wrist = cam.project(points.wrist);
        assert!(wrist[1] > cam.project(points.elbow)[1]);
        assert!(wrist[1] > 0.0);
    }
}
