//! Node deduplication over a bucketed bounding box

use std::collections::HashMap;

use nalgebra::Point3;

use crate::constants::{BBOX_SEGMENTS, NODE_TOLERANCE};
use crate::elements::Node;
use crate::geometry::BoundingBox;

/// Collects element end points into unique nodes.
///
/// The bounding box is cut into `BBOX_SEGMENTS` cells per axis. Two points
/// are the same node only when they fall in the same cell and lie closer
/// than `NODE_TOLERANCE`; near misses across a cell boundary stay separate.
#[derive(Debug, Clone)]
pub struct NodeRegistry {
    bbox: BoundingBox,
    nodes: Vec<Node>,
    buckets: HashMap<[usize; 3], Vec<usize>>,
}

impl NodeRegistry {
    pub fn new(bbox: BoundingBox) -> Self {
        Self {
            bbox,
            nodes: Vec::new(),
            buckets: HashMap::new(),
        }
    }

    /// Registry over nodes that were already bucketed against `bbox`
    pub fn from_nodes(bbox: BoundingBox, nodes: Vec<Node>) -> Self {
        let mut buckets: HashMap<[usize; 3], Vec<usize>> = HashMap::new();
        for (i, node) in nodes.iter().enumerate() {
            buckets.entry(node.bucket).or_default().push(i);
        }
        Self { bbox, nodes, buckets }
    }

    /// Cell indices of `p`, clamped to [0, BBOX_SEGMENTS]
    pub fn bucket_of(&self, p: &Point3<f64>) -> [usize; 3] {
        let extent = self.bbox.extent();
        let mut ijk = [0usize; 3];
        for axis in 0..3 {
            let cell = extent[axis] / BBOX_SEGMENTS as f64;
            if cell <= 0.0 {
                continue;
            }
            let idx = ((p[axis] - self.bbox.min[axis]) / cell).floor();
            ijk[axis] = idx.clamp(0.0, BBOX_SEGMENTS as f64) as usize;
        }
        ijk
    }

    /// Index of an existing node at `p`
    pub fn find(&self, p: &Point3<f64>) -> Option<usize> {
        self.buckets
            .get(&self.bucket_of(p))?
            .iter()
            .copied()
            .find(|&i| self.nodes[i].distance_to(p) < NODE_TOLERANCE)
    }

    /// Index of the node at `p`, creating it with the next id if needed
    pub fn find_or_insert(&mut self, p: &Point3<f64>) -> usize {
        if let Some(i) = self.find(p) {
            return i;
        }
        let id = self.nodes.len();
        let bucket = self.bucket_of(p);
        self.nodes.push(Node::new(*p, id, bucket));
        self.buckets.entry(bucket).or_default().push(id);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }
}
