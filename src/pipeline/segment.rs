//! Quartile segmentation of scaled CLTV scores
//!
//! Customers are ranked by score and cut into four equal-frequency bins
//! labelled D (lowest) to A (highest). The cut is computed here rather than
//! borrowed from a quantile routine so that ties and small populations have
//! a defined outcome:
//!
//! * Customers sharing a score always share a segment. A tie group is placed
//!   by its mid-rank: the mean of the 0-based sorted positions it occupies.
//!   The bin is `floor(mid_rank * 4 / n)`. Ties can make bins unequal in
//!   size.
//! * If that cut leaves any of the four bins empty (a large tie group can
//!   swallow a quartile, or push the lowest scores out of D), or there are
//!   fewer than four distinct scores, the quantile cut is abandoned. Each
//!   distinct score then becomes its own rank, spread from D to A by
//!   `round(rank * 3 / (distinct - 1))`. A single distinct score puts every
//!   customer in D. A [`SegmentationWarning`] names which case applied.
//!
//! Both rules are monotone: a higher score never receives a lower segment,
//! and the lowest score is always in D.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

/// Number of ordinal segments
pub const SEGMENT_COUNT: usize = 4;

/// Ordinal CLTV segment, ordered D < C < B < A
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Segment {
    D,
    C,
    B,
    A,
}

impl Segment {
    /// All segments from lowest to highest
    pub const ALL: [Segment; SEGMENT_COUNT] = [Segment::D, Segment::C, Segment::B, Segment::A];

    /// Segment for a 0-based bin index, lowest first. Indices past the top
    /// bin saturate to `A`.
    pub fn from_rank(rank: usize) -> Self {
        Self::ALL[rank.min(SEGMENT_COUNT - 1)]
    }

    /// 0-based bin index, D = 0
    pub fn rank(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Segment::D => "D",
            Segment::C => "C",
            Segment::B => "B",
            Segment::A => "A",
        };
        write!(f, "{}", label)
    }
}

impl std::str::FromStr for Segment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "D" => Ok(Segment::D),
            "C" => Ok(Segment::C),
            "B" => Ok(Segment::B),
            "A" => Ok(Segment::A),
            _ => Err(format!("Unknown segment: '{}'. Use A, B, C or D.", s)),
        }
    }
}

/// Non-fatal conditions raised while segmenting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SegmentationWarning {
    /// Too few distinct scores for a full quartile split; segments were collapsed
    InsufficientDistinctValues { distinct: usize, required: usize },
    /// Ties left quartile bins empty; segments were assigned by distinct rank
    TiedQuantileBins { distinct: usize, occupied_bins: usize },
}

impl fmt::Display for SegmentationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentationWarning::InsufficientDistinctValues { distinct, required } => write!(
                f,
                "only {} distinct scaled CLTV value(s), {} needed for a full split; \
                 each distinct value was given its own segment",
                distinct, required
            ),
            SegmentationWarning::TiedQuantileBins {
                distinct,
                occupied_bins,
            } => write!(
                f,
                "ties among {} distinct scaled CLTV values filled only {} of {} quartile bins; \
                 segments were assigned by distinct value rank",
                distinct, occupied_bins, SEGMENT_COUNT
            ),
        }
    }
}

/// Segment labels aligned with the input scores
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    pub segments: Vec<Segment>,
    pub distinct_values: usize,
    pub warning: Option<SegmentationWarning>,
}

/// Bin for the `rank`-th of `distinct` values when each value is its own
/// segment: lowest in D, highest in A, the rest spread evenly between.
fn distinct_rank_bin(rank: usize, distinct: usize) -> usize {
    if distinct <= 1 {
        0
    } else {
        (rank as f64 * (SEGMENT_COUNT - 1) as f64 / (distinct - 1) as f64).round() as usize
    }
}

/// Assign a segment to every score. Output order matches input order.
pub fn assign_segments(scores: &[f64]) -> Segmentation {
    let n = scores.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| match scores[a].total_cmp(&scores[b]) {
        Ordering::Equal => a.cmp(&b),
        other => other,
    });

    // Runs of equal scores as [start, end) ranges over sorted positions
    let mut groups: Vec<(usize, usize)> = Vec::new();
    let mut start = 0;
    for pos in 1..=n {
        if pos == n || scores[order[pos]] != scores[order[start]] {
            groups.push((start, pos));
            start = pos;
        }
    }

    let distinct = groups.len();
    let mut segments = vec![Segment::D; n];
    if distinct == 0 {
        return Segmentation {
            segments,
            distinct_values: 0,
            warning: None,
        };
    }

    let mut warning = None;
    let mut group_bins = Vec::new();

    if distinct >= SEGMENT_COUNT {
        group_bins = groups
            .iter()
            .map(|&(start, end)| {
                let mid_rank = (start + end - 1) as f64 / 2.0;
                (mid_rank * SEGMENT_COUNT as f64 / n as f64).floor() as usize
            })
            .collect();

        // Bins are non-decreasing over groups, so counting changes finds the occupied ones
        let occupied_bins = 1 + group_bins.windows(2).filter(|w| w[0] != w[1]).count();
        if occupied_bins < SEGMENT_COUNT {
            group_bins.clear();
            warning = Some(SegmentationWarning::TiedQuantileBins {
                distinct,
                occupied_bins,
            });
        }
    } else {
        warning = Some(SegmentationWarning::InsufficientDistinctValues {
            distinct,
            required: SEGMENT_COUNT,
        });
    }

    if group_bins.is_empty() {
        group_bins = (0..distinct).map(|rank| distinct_rank_bin(rank, distinct)).collect();
    }

    for (&(start, end), &bin) in groups.iter().zip(group_bins.iter()) {
        let segment = Segment::from_rank(bin);
        for &idx in &order[start..end] {
            segments[idx] = segment;
        }
    }

    Segmentation {
        segments,
        distinct_values: distinct,
        warning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(scores: &[f64]) -> String {
        assign_segments(scores)
            .segments
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_segment_ordering() {
        assert!(Segment::D < Segment::C);
        assert!(Segment::C < Segment::B);
        assert!(Segment::B < Segment::A);
        assert_eq!(Segment::from_rank(0), Segment::D);
        assert_eq!(Segment::from_rank(7), Segment::A);
        assert_eq!(Segment::B.rank(), 2);
    }

    #[test]
    fn test_segment_from_str() {
        assert_eq!("a".parse::<Segment>().unwrap(), Segment::A);
        assert!("E".parse::<Segment>().is_err());
    }

    #[test]
    fn test_eight_distinct_scores_two_per_bin() {
        let scores = [0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 1.0];
        assert_eq!(labels(&scores), "DDCCBBAA");
        assert!(assign_segments(&scores).warning.is_none());
    }

    #[test]
    fn test_unsorted_input_keeps_alignment() {
        let scores = [1.0, 0.0, 0.5, 0.25];
        assert_eq!(labels(&scores), "ADBC");
    }

    #[test]
    fn test_ties_share_a_segment() {
        // Positions 1..=4 hold 0.2, mid-rank 2.5 -> floor(2.5 * 4 / 8) = 1
        let scores = [0.0, 0.2, 0.2, 0.2, 0.2, 0.5, 0.7, 1.0];
        let result = assign_segments(&scores);

        assert_eq!(labels(&scores), "DCCCCBAA");
        assert_eq!(result.distinct_values, 5);
        assert!(result.warning.is_none());
    }

    #[test]
    fn test_ties_with_all_bins_occupied_keep_quantile_cut() {
        // Four tied at 0 (mid-rank 1.5 of 10 -> bin 0), then distinct values
        let scores = [0.0, 0.0, 0.0, 0.0, 0.2, 0.3, 0.5, 0.6, 0.8, 1.0];
        let result = assign_segments(&scores);

        assert_eq!(labels(&scores), "DDDDCBBBAA");
        assert!(result.warning.is_none());
    }

    #[test]
    fn test_large_tie_group_falls_back_to_distinct_rank() {
        // 97 customers tied at the bottom; the quantile cut would put them
        // all in C and leave D and B empty
        let mut scores = vec![0.0; 97];
        scores.extend([0.3, 0.6, 1.0]);
        let result = assign_segments(&scores);

        let count = |seg: Segment| result.segments.iter().filter(|&&s| s == seg).count();
        assert_eq!(count(Segment::D), 97);
        assert_eq!(count(Segment::C), 1);
        assert_eq!(count(Segment::B), 1);
        assert_eq!(count(Segment::A), 1);
        assert_eq!(result.segments[97], Segment::C);
        assert_eq!(result.segments[98], Segment::B);
        assert_eq!(result.segments[99], Segment::A);
        assert_eq!(
            result.warning,
            Some(SegmentationWarning::TiedQuantileBins {
                distinct: 4,
                occupied_bins: 2
            })
        );
    }

    #[test]
    fn test_large_top_tie_group_keeps_lowest_in_d() {
        // Nine tied at the top land in B by mid-rank, leaving A empty
        let mut scores = vec![0.0, 0.1, 0.2, 0.4];
        scores.extend([1.0; 9]);
        let result = assign_segments(&scores);

        assert_eq!(result.segments[0], Segment::D);
        assert!(result.segments[4..].iter().all(|&s| s == Segment::A));
        assert!(matches!(
            result.warning,
            Some(SegmentationWarning::TiedQuantileBins { distinct: 5, .. })
        ));
    }

    #[test]
    fn test_lowest_score_always_d() {
        for ties in 1..40 {
            let mut scores = vec![0.0; ties];
            scores.extend([0.25, 0.5, 0.75, 1.0]);
            let result = assign_segments(&scores);
            assert_eq!(result.segments[0], Segment::D, "ties={}", ties);
            assert_eq!(*result.segments.last().unwrap(), Segment::A, "ties={}", ties);
        }
    }

    #[test]
    fn test_three_distinct_values_collapse() {
        let result = assign_segments(&[0.2, 0.0, 1.0]);

        assert_eq!(
            result.segments,
            vec![Segment::B, Segment::D, Segment::A]
        );
        assert_eq!(
            result.warning,
            Some(SegmentationWarning::InsufficientDistinctValues {
                distinct: 3,
                required: SEGMENT_COUNT
            })
        );
    }

    #[test]
    fn test_two_distinct_values_use_extremes() {
        assert_eq!(labels(&[0.0, 1.0, 1.0, 0.0, 0.0]), "DAADD");
    }

    #[test]
    fn test_all_equal_scores_all_d() {
        let result = assign_segments(&[0.0; 5]);

        assert!(result.segments.iter().all(|&s| s == Segment::D));
        assert_eq!(result.distinct_values, 1);
        assert!(result.warning.is_some());
    }

    #[test]
    fn test_empty_scores() {
        let result = assign_segments(&[]);
        assert!(result.segments.is_empty());
        assert!(result.warning.is_none());
    }

    #[test]
    fn test_monotone_over_random_like_scores() {
        let scores: Vec<f64> = (0..97).map(|i| ((i * 37) % 23) as f64 / 22.0).collect();
        let result = assign_segments(&scores);

        for i in 0..scores.len() {
            for j in 0..scores.len() {
                if scores[i] > scores[j] {
                    assert!(result.segments[i] >= result.segments[j]);
                }
            }
        }
    }
}
