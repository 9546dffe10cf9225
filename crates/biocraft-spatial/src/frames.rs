//! Named reference-frame graph.
//!
//! [`FrameTree`] stores the pose of each child frame within its parent
//! (e.g. `"glabella"` → `"craft"` → `"tool_tip"`) and answers "where is frame
//! B expressed in frame A" by composing the chain of [`Transform`]s between
//! them.  Edges may be walked in either direction; walking an edge backwards
//! uses [`Transform::inverse`].
//!
//! # Example
//!
//! ```rust
//! use biocraft_spatial::frames::FrameTree;
//! use biocraft_spatial::transform::Transform;
//! use biocraft_spatial::rotation::Rotation;
//! use biocraft_types::Vec3;
//!
//! let mut tree = FrameTree::new();
//! tree.set_transform("glabella", "craft",
//!     Transform::new(Rotation::identity(), Vec3::new(0.0, -200.0, -50.0)));
//! tree.set_transform("craft", "tool_tip",
//!     Transform::new(Rotation::identity(), Vec3::new(0.0, 0.0, 15.0)));
//!
//! let t = tree.lookup("glabella", "tool_tip").unwrap();
//! assert!((t.translation.z - (-35.0)).abs() < 1e-9);
//!
//! // Reverse lookups invert the chain.
//! let back = tree.lookup("tool_tip", "glabella").unwrap();
//! assert!((back.translation.y - 200.0).abs() < 1e-9);
//! ```

use std::collections::{HashMap, HashSet, VecDeque};

use biocraft_types::Vec3;
use tracing::debug;

use crate::transform::Transform;

/// Directed graph of named frames; `edges[parent][child]` = T_parent_child.
#[derive(Debug, Default)]
pub struct FrameTree {
    edges: HashMap<String, HashMap<String, Transform>>,
    /// `parents[child]` lists every frame holding an edge to `child`.
    parents: HashMap<String, HashSet<String>>,
}

impl FrameTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the pose of `child_frame` within `parent_frame`.
    pub fn set_transform(&mut self, parent_frame: &str, child_frame: &str, transform: Transform) {
        debug!(parent = parent_frame, child = child_frame, ?transform, "frame edge set");
        self.edges
            .entry(parent_frame.to_string())
            .or_default()
            .insert(child_frame.to_string(), transform);
        self.parents
            .entry(child_frame.to_string())
            .or_default()
            .insert(parent_frame.to_string());
    }

    /// Remove the edge `parent_frame` → `child_frame`, returning its transform.
    pub fn remove_transform(&mut self, parent_frame: &str, child_frame: &str) -> Option<Transform> {
        let children = self.edges.get_mut(parent_frame)?;
        let removed = children.remove(child_frame)?;
        if children.is_empty() {
            self.edges.remove(parent_frame);
        }
        if let Some(set) = self.parents.get_mut(child_frame) {
            set.remove(parent_frame);
            if set.is_empty() {
                self.parents.remove(child_frame);
            }
        }
        debug!(parent = parent_frame, child = child_frame, "frame edge removed");
        Some(removed)
    }

    /// `true` when `frame` appears in any edge.
    pub fn contains(&self, frame: &str) -> bool {
        self.edges.contains_key(frame) || self.parents.contains_key(frame)
    }

    /// Pose of `local_frame` within `reference_frame`: the transform that maps
    /// points expressed in `local_frame` into `reference_frame`.
    ///
    /// Returns `None` if the frames are not connected.
    pub fn lookup(&self, reference_frame: &str, local_frame: &str) -> Option<Transform> {
        if reference_frame == local_frame {
            return Some(Transform::identity());
        }

        // BFS; each queue item carries T_reference_current.
        let mut queue: VecDeque<(&str, Transform)> = VecDeque::new();
        let mut visited: HashSet<&str> = HashSet::new();

        queue.push_back((reference_frame, Transform::identity()));
        visited.insert(reference_frame);

        while let Some((current, accumulated)) = queue.pop_front() {
            for (next, step) in self.neighbours(current) {
                if !visited.insert(next) {
                    continue;
                }
                let composed = accumulated.compose(&step);
                if next == local_frame {
                    return Some(composed);
                }
                queue.push_back((next, composed));
            }
        }

        None
    }

    /// Express `p_local`, given in `local_frame`, in `reference_frame`.
    pub fn map_point(
        &self,
        reference_frame: &str,
        local_frame: &str,
        p_local: Vec3,
    ) -> Option<Vec3> {
        self.lookup(reference_frame, local_frame)
            .map(|t| t.transform_point(p_local))
    }

    /// Frames reachable in one step from `frame`, with T_frame_next.
    fn neighbours<'a>(&'a self, frame: &str) -> Vec<(&'a str, Transform)> {
        let forward = self
            .edges
            .get(frame)
            .into_iter()
            .flatten()
            .map(|(child, tf)| (child.as_str(), *tf));
        let backward = self
            .parents
            .get(frame)
            .into_iter()
            .flatten()
            .filter_map(|parent| {
                let tf = self.edges.get(parent)?.get(frame)?;
                Some((parent.as_str(), tf.inverse()))
            });
        forward.chain(backward).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::Rotation;
    use biocraft_types::AngleUnit;

    fn shift(x: f64, y: f64, z: f64) -> Transform {
        Transform::new(Rotation::identity(), Vec3::new(x, y, z))
    }

    fn yaw_deg(deg: f64) -> Rotation {
        Rotation::from_euler(0.0, 0.0, deg, AngleUnit::Degrees).unwrap()
    }

    #[test]
    fn lookup_same_frame_returns_identity() {
        let tree = FrameTree::new();
        assert_eq!(tree.lookup("glabella", "glabella"), Some(Transform::identity()));
    }

    #[test]
    fn lookup_direct_edge() {
        let mut tree = FrameTree::new();
        tree.set_transform("glabella", "craft", shift(1.0, 0.0, 0.0));
        let t = tree.lookup("glabella", "craft").unwrap();
        assert!((t.translation.x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn lookup_composes_chain() {
        let mut tree = FrameTree::new();
        tree.set_transform("world", "craft", shift(1.0, 0.0, 0.0));
        tree.set_transform("craft", "tool", shift(0.5, 0.0, 0.0));
        let t = tree.lookup("world", "tool").unwrap();
        assert!((t.translation.x - 1.5).abs() < 1e-9);
    }

    #[test]
    fn lookup_respects_rotation_in_chain() {
        // craft sits at the origin yawed 90°; tool is 1 mm along craft +X.
        let mut tree = FrameTree::new();
        tree.set_transform("world", "craft", Transform::new(yaw_deg(90.0), Vec3::zero()));
        tree.set_transform("craft", "tool", shift(1.0, 0.0, 0.0));
        let t = tree.lookup("world", "tool").unwrap();
        assert!(t.translation.approx_eq(Vec3::new(0.0, 1.0, 0.0), 1e-9), "{t:?}");
    }

    #[test]
    fn reverse_lookup_is_inverse_of_forward() {
        let mut tree = FrameTree::new();
        let craft = Transform::new(yaw_deg(30.0), Vec3::new(4.0, 5.0, 6.0));
        let tool = Transform::new(yaw_deg(-75.0), Vec3::new(0.0, 0.0, 9.0));
        tree.set_transform("world", "craft", craft);
        tree.set_transform("craft", "tool", tool);

        let forward = tree.lookup("world", "tool").unwrap();
        let reverse = tree.lookup("tool", "world").unwrap();
        let p = Vec3::new(12.0, -3.0, 40.0);
        assert!(reverse.transform_point(forward.transform_point(p)).approx_eq(p, 1e-9));
        assert!(reverse.rotation.approx_eq(&forward.rotation.inverse(), 1e-9));
    }

    #[test]
    fn lookup_through_shared_parent() {
        // Two siblings of the same parent are connected through it.
        let mut tree = FrameTree::new();
        tree.set_transform("world", "left_marker", shift(-10.0, 0.0, 0.0));
        tree.set_transform("world", "right_marker", shift(10.0, 0.0, 0.0));
        let p = tree
            .map_point("left_marker", "right_marker", Vec3::zero())
            .unwrap();
        assert!(p.approx_eq(Vec3::new(20.0, 0.0, 0.0), 1e-9));
    }

    #[test]
    fn lookup_no_path_returns_none() {
        let mut tree = FrameTree::new();
        tree.set_transform("world", "craft", shift(1.0, 0.0, 0.0));
        tree.set_transform("island", "reef", shift(1.0, 0.0, 0.0));
        assert!(tree.lookup("world", "reef").is_none());
        assert!(tree.lookup("world", "ghost_frame").is_none());
    }

    #[test]
    fn set_transform_overrides_previous() {
        let mut tree = FrameTree::new();
        tree.set_transform("world", "sensor", shift(1.0, 0.0, 0.0));
        tree.set_transform("world", "sensor", shift(5.0, 0.0, 0.0));
        let t = tree.lookup("world", "sensor").unwrap();
        assert!((t.translation.x - 5.0).abs() < 1e-9);
    }

    #[test]
    fn remove_transform_disconnects_frames() {
        let mut tree = FrameTree::new();
        tree.set_transform("world", "craft", shift(1.0, 0.0, 0.0));
        assert!(tree.contains("craft"));
        assert!(tree.remove_transform("world", "craft").is_some());
        assert!(tree.lookup("world", "craft").is_none());
        assert!(tree.lookup("craft", "world").is_none());
        assert!(tree.remove_transform("world", "craft").is_none());
        assert!(!tree.contains("craft"));
        assert!(!tree.contains("world"));
    }

    #[test]
    fn remove_transform_keeps_frames_with_other_edges() {
        let mut tree = FrameTree::new();
        tree.set_transform("world", "craft", shift(1.0, 0.0, 0.0));
        tree.set_transform("world", "table", shift(0.0, 2.0, 0.0));
        tree.set_transform("bench", "craft", shift(0.0, 0.0, 3.0));

        tree.remove_transform("world", "craft");
        assert!(tree.contains("world"));
        assert!(tree.contains("craft"));
        assert!(tree.lookup("craft", "bench").is_some());

        tree.remove_transform("bench", "craft");
        assert!(!tree.contains("craft"));
        assert!(!tree.contains("bench"));
        assert!(tree.lookup("world", "table").is_some());
    }
}
