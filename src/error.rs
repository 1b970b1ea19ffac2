use thiserror::Error;

/// A control value that does not name a camera button or the back button
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error("control value is empty")]
    Empty,
    #[error("unrecognised control value {0:?}")]
    Unrecognised(String),
}

/// Structural problems in imported scene data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("node {node} lists child {child}, which does not exist")]
    MissingChild { node: usize, child: usize },
    #[error("node {0} has more than one parent")]
    MultipleParents(usize),
    #[error("node hierarchy contains a cycle through node {0}")]
    Cycle(usize),
    #[error("scene root {0} does not exist")]
    MissingRoot(usize),
    #[error("animation track targets node {0}, which does not exist")]
    MissingNode(usize),
    #[error("animation track has no keyframes")]
    EmptyTrack,
    #[error("animation track has {times} keyframe times but {values} values")]
    KeyframeMismatch { times: usize, values: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_error_messages() {
        assert_eq!(ControlError::Empty.to_string(), "control value is empty");
        assert_eq!(
            ControlError::Unrecognised("forward".into()).to_string(),
            "unrecognised control value \"forward\""
        );
    }

    #[test]
    fn test_scene_error_messages() {
        let err = SceneError::KeyframeMismatch { times: 3, values: 4 };
        assert_eq!(err.to_string(), "animation track has 3 keyframe times but 4 values");
        assert!(SceneError::MissingChild { node: 1, child: 9 }.to_string().contains("child 9"));
    }
}
