// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Endpoint clustering and joint misalignment detection
//!
//! Every segment contributes two endpoints. Endpoints within
//! [`JOINT_CLUSTER_TOLERANCE`] of each other are connected, and clusters are
//! the connected components of that graph, so a chain of near points forms
//! one cluster even when its extremes are further apart. A cluster of two or
//! more endpoints whose widest pair exceeds [`JOINT_GAP_THRESHOLD`] is a
//! misaligned joint; otherwise it is closed.

use plan_lite_core::{ElementType, Point2D, Segment, SegmentEnd, SegmentId};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt;
use tracing::debug;

/// Endpoints closer than this (inches) belong to the same joint
pub const JOINT_CLUSTER_TOLERANCE: f64 = 1.0;

/// Joints wider than this (inches) are reported as misaligned
pub const JOINT_GAP_THRESHOLD: f64 = 0.25;

/// One end of one segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Endpoint {
    pub segment: SegmentId,
    pub end: SegmentEnd,
    pub element: ElementType,
    pub point: Point2D,
}

/// A connected group of nearby endpoints
#[derive(Debug, Clone)]
pub struct JointCluster {
    /// Mean of the member points
    pub center: Point2D,
    pub endpoints: SmallVec<[Endpoint; 4]>,
    /// Largest distance between any two members
    pub max_pair_distance: f64,
}

impl JointCluster {
    /// Two or more endpoints meet here
    pub fn is_joint(&self) -> bool {
        self.endpoints.len() >= 2
    }

    pub fn is_misaligned(&self) -> bool {
        self.is_joint() && self.max_pair_distance > JOINT_GAP_THRESHOLD
    }

    pub fn is_closed(&self) -> bool {
        self.is_joint() && self.max_pair_distance <= JOINT_GAP_THRESHOLD
    }
}

fn endpoints_of(segments: &[Segment]) -> Vec<Endpoint> {
    let mut endpoints = Vec::with_capacity(segments.len() * 2);
    for s in segments {
        for end in [SegmentEnd::Start, SegmentEnd::End] {
            endpoints.push(Endpoint {
                segment: s.id,
                end,
                element: s.element_type(),
                point: s.point(end),
            });
        }
    }
    endpoints
}

/// Group all segment endpoints into clusters.
///
/// Clusters come out in order of their first endpoint in `segments`.
pub fn build_endpoint_clusters(segments: &[Segment]) -> Vec<JointCluster> {
    let endpoints = endpoints_of(segments);
    let tol_sq = JOINT_CLUSTER_TOLERANCE * JOINT_CLUSTER_TOLERANCE;
    let mut visited = vec![false; endpoints.len()];
    let mut clusters = Vec::new();
    let mut stack = Vec::new();

    for seed in 0..endpoints.len() {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;
        stack.push(seed);

        let mut members: SmallVec<[Endpoint; 4]> = SmallVec::new();
        while let Some(idx) = stack.pop() {
            let ep = endpoints[idx];
            members.push(ep);
            for (j, other) in endpoints.iter().enumerate() {
                if !visited[j] && ep.point.distance_squared_to(&other.point) <= tol_sq {
                    visited[j] = true;
                    stack.push(j);
                }
            }
        }

        clusters.push(summarize(members));
    }

    clusters
}

fn summarize(endpoints: SmallVec<[Endpoint; 4]>) -> JointCluster {
    let n = endpoints.len() as f64;
    let (sx, sy) = endpoints
        .iter()
        .fold((0.0, 0.0), |(sx, sy), ep| (sx + ep.point.x, sy + ep.point.y));

    let mut max_pair_distance: f64 = 0.0;
    for (i, a) in endpoints.iter().enumerate() {
        for b in &endpoints[i + 1..] {
            max_pair_distance = max_pair_distance.max(a.point.distance_to(&b.point));
        }
    }

    JointCluster {
        center: Point2D::new(sx / n, sy / n),
        endpoints,
        max_pair_distance,
    }
}

/// Clusters whose corners get a fill polygon
pub fn closed_clusters(clusters: &[JointCluster]) -> impl Iterator<Item = &JointCluster> {
    clusters.iter().filter(|c| c.is_closed())
}

/// Endpoint coordinate rounded to thousandths of an inch.
///
/// Displays as `"x,y"` with trailing zeros dropped: `"120,0.5"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JointKey {
    x: i64,
    y: i64,
}

impl JointKey {
    pub fn from_point(p: &Point2D) -> Self {
        Self {
            x: (p.x * 1000.0).round() as i64,
            y: (p.y * 1000.0).round() as i64,
        }
    }
}

impl fmt::Display for JointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x as f64 / 1000.0, self.y as f64 / 1000.0)
    }
}

/// A misaligned joint
#[derive(Debug, Clone)]
pub struct JointIssue {
    /// Cluster centroid
    pub center: Point2D,
    /// Widest distance between two of the joint's endpoints
    pub gap: f64,
    pub endpoints: SmallVec<[Endpoint; 4]>,
}

/// Misaligned joints, addressable by any member endpoint's [`JointKey`]
#[derive(Debug, Clone, Default)]
pub struct JointIssues {
    issues: Vec<JointIssue>,
    by_key: FxHashMap<JointKey, usize>,
}

impl JointIssues {
    /// Issue touching the endpoint with this key
    pub fn get(&self, key: &JointKey) -> Option<&JointIssue> {
        self.by_key.get(key).map(|&i| &self.issues[i])
    }

    /// Issue touching an endpoint at `p`
    pub fn get_at(&self, p: &Point2D) -> Option<&JointIssue> {
        self.get(&JointKey::from_point(p))
    }

    /// Each issue once
    pub fn iter(&self) -> impl Iterator<Item = &JointIssue> {
        self.issues.iter()
    }

    /// Every endpoint key with the issue it belongs to
    pub fn entries(&self) -> impl Iterator<Item = (&JointKey, &JointIssue)> {
        self.by_key.iter().map(|(k, &i)| (k, &self.issues[i]))
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issue whose centre is nearest to `p`, within `max_distance`
    pub fn nearest_issue(&self, p: &Point2D, max_distance: f64) -> Option<&JointIssue> {
        let mut best: Option<(f64, &JointIssue)> = None;
        for issue in &self.issues {
            let d = issue.center.distance_to(p);
            if d <= max_distance && best.map_or(true, |(bd, _)| d < bd) {
                best = Some((d, issue));
            }
        }
        best.map(|(_, issue)| issue)
    }
}

/// Collect the misaligned joints among `clusters`
pub fn joint_issues(clusters: &[JointCluster]) -> JointIssues {
    let mut issues = JointIssues::default();
    for cluster in clusters.iter().filter(|c| c.is_misaligned()) {
        let index = issues.issues.len();
        issues.issues.push(JointIssue {
            center: cluster.center,
            gap: cluster.max_pair_distance,
            endpoints: cluster.endpoints.clone(),
        });
        for ep in &cluster.endpoints {
            issues.by_key.insert(JointKey::from_point(&ep.point), index);
        }
    }
    issues
}

/// Recompute joint issues for a whole plan
pub fn compute_joints(segments: &[Segment]) -> JointIssues {
    let clusters = build_endpoint_clusters(segments);
    let issues = joint_issues(&clusters);
    debug!(
        clusters = clusters.len(),
        issues = issues.len(),
        "Recomputed joints"
    );
    issues
}
