//! Squared-error regression trees used as boosting stages

use serde::{Deserialize, Serialize};

/// Smallest split gain worth keeping
const MIN_GAIN: f64 = 1e-12;

/// Growth limits for a single tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

/// Tree node stored in a flat arena; children are indices into it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct Split {
    feature: usize,
    threshold: f64,
    gain: f64,
}

/// Binary regression tree; the root is node 0.
///
/// Children always sit after their parent in the arena, which deserialization
/// enforces so that traversal terminates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TreeNodes")]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

#[derive(Deserialize)]
struct TreeNodes {
    nodes: Vec<Node>,
}

impl TryFrom<TreeNodes> for RegressionTree {
    type Error = String;

    fn try_from(raw: TreeNodes) -> Result<Self, Self::Error> {
        if raw.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (index, node) in raw.nodes.iter().enumerate() {
            match node {
                Node::Leaf { value } if !value.is_finite() => {
                    return Err(format!("leaf {} has a non-finite value", index));
                }
                Node::Split {
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    if threshold.is_nan() {
                        return Err(format!("split {} has a NaN threshold", index));
                    }
                    for child in [*left, *right] {
                        if child <= index || child >= raw.nodes.len() {
                            return Err(format!(
                                "split {} points to node {} outside {}..{}",
                                index,
                                child,
                                index + 1,
                                raw.nodes.len()
                            ));
                        }
                    }
                }
                Node::Leaf { .. } => {}
            }
        }
        Ok(Self { nodes: raw.nodes })
    }
}

impl RegressionTree {
    /// Fit a tree to `targets`.
    ///
    /// Splits are chosen greedily over every feature and every midpoint
    /// between distinct sorted values, maximising the reduction in squared
    /// error. Each accepted split adds its gain to `importance[feature]`.
    pub fn fit(
        rows: &[Vec<f64>],
        targets: &[f64],
        params: &TreeParams,
        importance: &mut [f64],
    ) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        let indices: Vec<usize> = (0..rows.len().min(targets.len())).collect();
        if indices.is_empty() {
            tree.nodes.push(Node::Leaf { value: 0.0 });
        } else {
            tree.grow(rows, targets, indices, 0, params, importance);
        }
        tree
    }

    fn grow(
        &mut self,
        rows: &[Vec<f64>],
        targets: &[f64],
        indices: Vec<usize>,
        depth: usize,
        params: &TreeParams,
        importance: &mut [f64],
    ) -> usize {
        let n = indices.len();
        let mean = indices.iter().map(|&i| targets[i]).sum::<f64>() / n as f64;

        let node = self.nodes.len();
        self.nodes.push(Node::Leaf { value: mean });

        if depth >= params.max_depth || n < params.min_samples_split {
            return node;
        }

        let Some(split) = best_split(rows, targets, &indices, params.min_samples_leaf) else {
            return node;
        };

        if let Some(slot) = importance.get_mut(split.feature) {
            *slot += split.gain;
        }

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| rows[i][split.feature] <= split.threshold);

        let left = self.grow(rows, targets, left_idx, depth + 1, params, importance);
        let right = self.grow(rows, targets, right_idx, depth + 1, params, importance);

        self.nodes[node] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        node
    }

    /// Predict one row; NaN if the walk does not reach a leaf
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        let mut index = 0;
        for _ in 0..self.nodes.len() {
            match self.nodes.get(index) {
                Some(Node::Leaf { value }) => return *value,
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = row.get(*feature).copied().unwrap_or(f64::NAN);
                    index = if x <= *threshold { *left } else { *right };
                }
                None => return f64::NAN,
            }
        }
        f64::NAN
    }

    /// Highest feature index any split reads
    pub fn max_feature(&self) -> Option<usize> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                Node::Split { feature, .. } => Some(*feature),
                Node::Leaf { .. } => None,
            })
            .max()
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }

    /// Depth of the deepest leaf, counting the root as depth 0
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], index: usize) -> usize {
            match nodes.get(index) {
                Some(Node::Split { left, right, .. }) => {
                    1 + walk(nodes, *left).max(walk(nodes, *right))
                }
                _ => 0,
            }
        }
        walk(&self.nodes, 0)
    }
}

fn best_split(
    rows: &[Vec<f64>],
    targets: &[f64],
    indices: &[usize],
    min_samples_leaf: usize,
) -> Option<Split> {
    let n = indices.len();
    let n_features = rows[indices[0]].len();
    let total: f64 = indices.iter().map(|&i| targets[i]).sum();
    let parent_score = total * total / n as f64;
    let min_leaf = min_samples_leaf.max(1);

    let mut best: Option<Split> = None;
    let mut column: Vec<(f64, f64)> = Vec::with_capacity(n);

    for feature in 0..n_features {
        column.clear();
        column.extend(indices.iter().map(|&i| (rows[i][feature], targets[i])));
        column.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut left_sum = 0.0;
        for k in 0..n - 1 {
            left_sum += column[k].1;
            let (lo, hi) = (column[k].0, column[k + 1].0);
            let left_n = k + 1;
            let right_n = n - left_n;
            if lo == hi || left_n < min_leaf || right_n < min_leaf {
                continue;
            }

            let right_sum = total - left_sum;
            let gain = left_sum * left_sum / left_n as f64 + right_sum * right_sum / right_n as f64
                - parent_score;
            if gain <= MIN_GAIN || best.map_or(false, |b| gain <= b.gain) {
                continue;
            }

            let mut threshold = lo + (hi - lo) / 2.0;
            if threshold >= hi {
                threshold = lo;
            }
            best = Some(Split {
                feature,
                threshold,
                gain,
            });
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(max_depth: usize) -> TreeParams {
        TreeParams {
            max_depth,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }

    #[test]
    fn test_step_function_is_split_once() {
        let rows: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
        let targets: Vec<f64> = (0..10).map(|i| if i < 5 { 1.0 } else { 3.0 }).collect();
        let mut importance = vec![0.0];

        let tree = RegressionTree::fit(&rows, &targets, &params(3), &mut importance);

        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.predict_row(&[2.0]), 1.0);
        assert_eq!(tree.predict_row(&[7.0]), 3.0);
        assert_eq!(tree.predict_row(&[4.5]), 1.0);
        assert!(importance[0] > 0.0);
    }

    #[test]
    fn test_depth_limit() {
        let rows: Vec<Vec<f64>> = (0..64).map(|i| vec![i as f64]).collect();
        let targets: Vec<f64> = (0..64).map(|i| (i * i) as f64).collect();
        let mut importance = vec![0.0];

        let tree = RegressionTree::fit(&rows, &targets, &params(2), &mut importance);

        assert!(tree.depth() <= 2);
        assert!(tree.n_leaves() <= 4);
    }

    #[test]
    fn test_single_row_is_a_leaf() {
        let mut importance = vec![0.0, 0.0];
        let tree = RegressionTree::fit(&[vec![1.0, 2.0]], &[5.0], &params(6), &mut importance);

        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.predict_row(&[100.0, -3.0]), 5.0);
        assert_eq!(importance, vec![0.0, 0.0]);
    }

    #[test]
    fn test_constant_target_is_not_split() {
        let rows: Vec<Vec<f64>> = (0..8).map(|i| vec![i as f64]).collect();
        let mut importance = vec![0.0];
        let tree = RegressionTree::fit(&rows, &[2.0; 8], &params(6), &mut importance);

        assert_eq!(tree.n_leaves(), 1);
    }

    #[test]
    fn test_picks_informative_feature() {
        let rows: Vec<Vec<f64>> = (0..20)
            .map(|i| vec![(i % 3) as f64, i as f64])
            .collect();
        let targets: Vec<f64> = (0..20).map(|i| if i >= 10 { 10.0 } else { 0.0 }).collect();
        let mut importance = vec![0.0, 0.0];

        RegressionTree::fit(&rows, &targets, &params(1), &mut importance);

        assert!(importance[1] > importance[0]);
    }

    #[test]
    fn test_fitted_tree_survives_serde() {
        let rows: Vec<Vec<f64>> = (0..16).map(|i| vec![i as f64, (i % 4) as f64]).collect();
        let targets: Vec<f64> = (0..16).map(|i| (i * 3 % 7) as f64).collect();
        let mut importance = vec![0.0, 0.0];
        let tree = RegressionTree::fit(&rows, &targets, &params(3), &mut importance);

        let json = serde_json::to_string(&tree).unwrap();
        let decoded: RegressionTree = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, tree);
    }

    #[test]
    fn test_rejects_backward_and_dangling_children() {
        for raw in [
            r#"{"nodes": []}"#,
            r#"{"nodes": [{"type": "split", "feature": 0, "threshold": 1.0, "left": 0, "right": 0}]}"#,
            r#"{"nodes": [{"type": "split", "feature": 0, "threshold": 1.0, "left": 1, "right": 5}, {"type": "leaf", "value": 1.0}]}"#,
        ] {
            assert!(serde_json::from_str::<RegressionTree>(raw).is_err(), "{}", raw);
        }
    }

    #[test]
    fn test_cyclic_walk_is_bounded() {
        let tree = RegressionTree {
            nodes: vec![Node::Split {
                feature: 0,
                threshold: 1.0,
                left: 0,
                right: 0,
            }],
        };
        assert!(tree.predict_row(&[0.0]).is_nan());
    }
}
