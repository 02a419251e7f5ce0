//! Leaf-wise regression tree used as the weak learner of the ensemble.

use crate::features::FeatureVector;
use std::collections::BTreeMap;

const HESSIAN_EPSILON: f64 = 1e-9;
const MIN_GAIN: f64 = 1e-9;
const TIE_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// A binary regression tree. Rows with `value <= threshold` go left.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    pub fn predict(&self, features: &FeatureVector) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if features.get(*feature) <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    pub fn split_features(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .filter_map(|n| match n {
                Node::Split { feature, .. } => Some(*feature),
                Node::Leaf { .. } => None,
            })
            .collect()
    }
}

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GrowthLimits {
    pub max_leaves: usize,
    pub min_examples_per_leaf: usize,
    pub learning_rate: f64,
}

/// First- and second-order statistics of the loss for every training row.
pub(crate) struct GradientSet<'a> {
    pub features: &'a [FeatureVector],
    pub gradients: &'a [f64],
    pub hessians: &'a [f64],
}

impl GradientSet<'_> {
    fn sums(&self, rows: &[usize]) -> (f64, f64) {
        rows.iter().fold((0.0, 0.0), |(g, h), &r| {
            (g + self.gradients[r], h + self.hessians[r])
        })
    }
}

#[derive(Debug, Clone)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

/// Non-zero `(value, row)` entries of one leaf, per feature, sorted by
/// value then row.
type Columns = BTreeMap<usize, Vec<(f64, usize)>>;

struct OpenLeaf {
    node: usize,
    rows: Vec<usize>,
    columns: Columns,
    best: Option<SplitCandidate>,
}

/// Values sharing one feature value inside a leaf, aggregated.
struct ValueGroup {
    value: f64,
    gradient: f64,
    hessian: f64,
    count: usize,
}

/// Grow one tree best-first: keep splitting the leaf with the largest gain
/// until `max_leaves` is reached or no leaf has an admissible split.
///
/// `usage` counts how often each feature has been split on so far; among
/// equal-gain candidates the least used feature wins, then the lowest index.
pub(crate) fn grow(
    data: &GradientSet<'_>,
    limits: &GrowthLimits,
    usage: &mut [usize],
) -> RegressionTree {
    let all_rows: Vec<usize> = (0..data.gradients.len()).collect();
    let root_columns = sorted_columns(data, &all_rows);
    let mut goes_left = vec![false; all_rows.len()];
    let mut nodes = vec![Node::Leaf { value: 0.0 }];
    let root_best = best_split(data, &all_rows, &root_columns, limits, usage);
    let mut open = vec![OpenLeaf {
        node: 0,
        rows: all_rows,
        columns: root_columns,
        best: root_best,
    }];

    while open.len() < limits.max_leaves {
        let mut chosen: Option<(usize, f64)> = None;
        for (idx, leaf) in open.iter().enumerate() {
            if let Some(candidate) = &leaf.best {
                if chosen.map_or(true, |(_, gain)| candidate.gain > gain + TIE_TOLERANCE) {
                    chosen = Some((idx, candidate.gain));
                }
            }
        }

        let Some((leaf_idx, _)) = chosen else { break };
        let leaf = open.remove(leaf_idx);
        let Some(split) = leaf.best else { break };
        usage[split.feature] += 1;

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = leaf
            .rows
            .into_iter()
            .partition(|&r| data.features[r].get(split.feature) <= split.threshold);
        for &r in &left_rows {
            goes_left[r] = true;
        }
        for &r in &right_rows {
            goes_left[r] = false;
        }
        let (left_columns, right_columns) = partition_columns(leaf.columns, &goes_left);

        let left_node = nodes.len();
        nodes.push(Node::Leaf { value: 0.0 });
        let right_node = nodes.len();
        nodes.push(Node::Leaf { value: 0.0 });
        nodes[leaf.node] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left: left_node,
            right: right_node,
        };

        let left_best = best_split(data, &left_rows, &left_columns, limits, usage);
        let right_best = best_split(data, &right_rows, &right_columns, limits, usage);
        open.insert(
            leaf_idx,
            OpenLeaf {
                node: right_node,
                rows: right_rows,
                columns: right_columns,
                best: right_best,
            },
        );
        open.insert(
            leaf_idx,
            OpenLeaf {
                node: left_node,
                rows: left_rows,
                columns: left_columns,
                best: left_best,
            },
        );
    }

    for leaf in &open {
        let (g, h) = data.sums(&leaf.rows);
        nodes[leaf.node] = Node::Leaf {
            value: limits.learning_rate * g / (h + HESSIAN_EPSILON),
        };
    }

    RegressionTree { nodes }
}

/// Gather and sort the non-zero entries of `rows`. Done once per tree; leaves
/// below the root inherit their columns through [`partition_columns`].
fn sorted_columns(data: &GradientSet<'_>, rows: &[usize]) -> Columns {
    let mut columns = Columns::new();
    for &row in rows {
        for &(feature, value) in data.features[row].entries() {
            columns.entry(feature).or_default().push((value, row));
        }
    }
    for entries in columns.values_mut() {
        entries.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    }
    columns
}

/// Split a leaf's columns between its children. Relative order is kept, so
/// both sides stay sorted.
fn partition_columns(columns: Columns, goes_left: &[bool]) -> (Columns, Columns) {
    let mut left = Columns::new();
    let mut right = Columns::new();
    for (feature, entries) in columns {
        let (l, r): (Vec<_>, Vec<_>) = entries.into_iter().partition(|&(_, row)| goes_left[row]);
        if !l.is_empty() {
            left.insert(feature, l);
        }
        if !r.is_empty() {
            right.insert(feature, r);
        }
    }
    (left, right)
}

fn score(g: f64, h: f64) -> f64 {
    g * g / (h + HESSIAN_EPSILON)
}

/// Find the best split of `rows` from the leaf's sorted non-zero columns.
fn best_split(
    data: &GradientSet<'_>,
    rows: &[usize],
    columns: &Columns,
    limits: &GrowthLimits,
    usage: &[usize],
) -> Option<SplitCandidate> {
    if rows.len() < 2 * limits.min_examples_per_leaf {
        return None;
    }

    let (total_g, total_h) = data.sums(rows);
    let parent = score(total_g, total_h);

    let mut best: Option<SplitCandidate> = None;

    for (&feature, entries) in columns {
        let groups = group_values(data, entries, rows.len(), total_g, total_h);

        let mut left_g = 0.0;
        let mut left_h = 0.0;
        let mut left_count = 0;

        for pair in groups.windows(2) {
            left_g += pair[0].gradient;
            left_h += pair[0].hessian;
            left_count += pair[0].count;
            let right_count = rows.len() - left_count;

            if left_count < limits.min_examples_per_leaf
                || right_count < limits.min_examples_per_leaf
            {
                continue;
            }

            let gain = score(left_g, left_h) + score(total_g - left_g, total_h - left_h) - parent;
            if gain <= MIN_GAIN {
                continue;
            }

            let better = match &best {
                None => true,
                Some(current) => {
                    gain > current.gain + TIE_TOLERANCE
                        || ((gain - current.gain).abs() <= TIE_TOLERANCE
                            && usage[feature] < usage[current.feature])
                }
            };

            if better {
                best = Some(SplitCandidate {
                    feature,
                    threshold: (pair[0].value + pair[1].value) / 2.0,
                    gain,
                });
            }
        }
    }

    best
}

/// Collapse sorted non-zero entries into per-value groups, inserting the
/// implicit zero group for rows that do not carry the feature.
fn group_values(
    data: &GradientSet<'_>,
    entries: &[(f64, usize)],
    row_count: usize,
    total_g: f64,
    total_h: f64,
) -> Vec<ValueGroup> {
    let mut groups: Vec<ValueGroup> = Vec::new();
    let mut non_zero_g = 0.0;
    let mut non_zero_h = 0.0;

    for &(value, row) in entries {
        let (g, h) = (data.gradients[row], data.hessians[row]);
        non_zero_g += g;
        non_zero_h += h;
        match groups.last_mut() {
            Some(last) if last.value == value => {
                last.gradient += g;
                last.hessian += h;
                last.count += 1;
            }
            _ => groups.push(ValueGroup {
                value,
                gradient: g,
                hessian: h,
                count: 1,
            }),
        }
    }

    let zero_count = row_count - entries.len();
    if zero_count > 0 {
        let zero = ValueGroup {
            value: 0.0,
            gradient: total_g - non_zero_g,
            hessian: total_h - non_zero_h,
            count: zero_count,
        };
        let position = groups.partition_point(|g| g.value < 0.0);
        groups.insert(position, zero);
    }

    groups
}
