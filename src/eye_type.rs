//! Eye shape classification.
//!
//! Eye spaces of four to seven points are identified by their neighbor-count
//! signature: for each member, the number of other members orthogonally
//! adjacent to it, sorted ascending and written after an `E`. The signature
//! is looked up in a fixed catalog which covers every polyomino of those
//! sizes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::TERRITORIAL_EYE_SIZE;
use crate::location::Location;

/// Size class of an eye space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EyeType {
    FalseEye,
    E1,
    E2,
    E3,
    E4,
    E5,
    E6,
    E7,
    Territorial,
}

impl EyeType {
    /// Type for a (true) eye space of `size` points.
    pub fn for_size(size: usize) -> EyeType {
        match size {
            0 | 1 => EyeType::E1,
            2 => EyeType::E2,
            3 => EyeType::E3,
            4 => EyeType::E4,
            5 => EyeType::E5,
            6 => EyeType::E6,
            7 => EyeType::E7,
            _ => EyeType::Territorial,
        }
    }

    pub fn is_big_eye(self) -> bool {
        matches!(self, EyeType::E4 | EyeType::E5 | EyeType::E6 | EyeType::E7)
    }
}

impl fmt::Display for EyeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EyeType::FalseEye => "false eye",
            EyeType::E1 => "E1",
            EyeType::E2 => "E2",
            EyeType::E3 => "E3",
            EyeType::E4 => "E4",
            EyeType::E5 => "E5",
            EyeType::E6 => "E6",
            EyeType::E7 => "E7",
            EyeType::Territorial => "territorial",
        };
        f.write_str(name)
    }
}

/// Life-and-death value of an eye shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EyeStatus {
    /// One eye at most; the opponent can kill by playing inside.
    Nakade,
    /// Two eyes if the owner plays the vital point first, one otherwise.
    Unsettled,
    /// Two eyes however the opponent plays inside.
    Alive,
}

impl EyeStatus {
    /// Number of eyes the shape is worth.
    pub fn eye_value(self) -> f32 {
        match self {
            EyeStatus::Nakade => 1.0,
            EyeStatus::Unsettled => 1.5,
            EyeStatus::Alive => 2.0,
        }
    }
}

/// Catalog entry for a four to seven point eye shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BigEyeShape {
    pub signature: &'static str,
    pub name: &'static str,
    pub status: EyeStatus,
    /// Neighbor count of the vital point, for unsettled shapes.
    pub vital_count: Option<u8>,
}

const fn shape(
    signature: &'static str,
    name: &'static str,
    status: EyeStatus,
    vital_count: Option<u8>,
) -> BigEyeShape {
    BigEyeShape {
        signature,
        name,
        status,
        vital_count,
    }
}

use EyeStatus::{Alive, Nakade, Unsettled};

/// Every four to seven point eye shape by signature.
pub static BIG_EYE_CATALOG: &[BigEyeShape] = &[
    // Four points
    shape("E1122", "straight or bent four", Alive, None),
    shape("E1113", "pyramid four", Unsettled, Some(3)),
    shape("E2222", "square four", Nakade, None),
    // Five points
    shape("E11222", "straight or bent five", Alive, None),
    shape("E11123", "bent five with arm", Alive, None),
    shape("E11114", "crossed five", Unsettled, Some(4)),
    shape("E12223", "bulky five", Unsettled, Some(3)),
    // Six points
    shape("E112224", "rabbity six", Unsettled, Some(4)),
    shape("E111124", "six with cross", Alive, None),
    shape("E111133", "six with two forks", Alive, None),
    shape("E111223", "branched six", Alive, None),
    shape("E112222", "open six", Alive, None),
    shape("E112233", "six with block", Alive, None),
    shape("E122223", "bulky six with tail", Alive, None),
    shape("E222233", "rectangular six", Alive, None),
    // Seven points
    shape("E1111224", "seven with cross", Alive, None),
    shape("E1111233", "seven with two forks", Alive, None),
    shape("E1112223", "branched seven", Alive, None),
    shape("E1112234", "seven with fork and cross", Alive, None),
    shape("E1112333", "seven with triple fork", Alive, None),
    shape("E1122222", "open seven", Alive, None),
    shape("E1122224", "seven with crossed bend", Alive, None),
    shape("E1122233", "seven with block", Alive, None),
    shape("E1222223", "bulky seven with tail", Alive, None),
    shape("E1222234", "bulky seven with cross", Alive, None),
    shape("E1222333", "thick seven", Alive, None),
    shape("E2222224", "square seven with cross", Alive, None),
];

/// Look up a signature in [`BIG_EYE_CATALOG`].
pub fn lookup_big_eye(signature: &str) -> Option<&'static BigEyeShape> {
    BIG_EYE_CATALOG.iter().find(|s| s.signature == signature)
}

/// For each member, the number of other members orthogonally adjacent to it.
pub fn neighbor_counts(members: &[Location]) -> Vec<u8> {
    members
        .iter()
        .map(|&a| {
            members
                .iter()
                .filter(|&&b| {
                    let dr = (i32::from(a.row) - i32::from(b.row)).abs();
                    let dc = (i32::from(a.col) - i32::from(b.col)).abs();
                    dr + dc == 1
                })
                .count() as u8
        })
        .collect()
}

/// Signature `"E"` followed by the sorted neighbor counts.
pub fn signature(members: &[Location]) -> String {
    let mut counts = neighbor_counts(members);
    counts.sort_unstable();
    let mut sig = String::with_capacity(counts.len() + 1);
    sig.push('E');
    for c in counts {
        sig.push(char::from(b'0' + c));
    }
    sig
}

/// Outcome of classifying a true eye space by shape alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeClass {
    pub eye_type: EyeType,
    pub status: EyeStatus,
    /// Signature for four to seven point eyes.
    pub signature: Option<String>,
    pub vital_point: Option<Location>,
}

/// Classify an eye space by size and shape. False-eye detection needs the
/// board and happens before this.
///
/// The result depends only on the set of members, not their order.
pub fn classify_shape(members: &[Location]) -> ShapeClass {
    let eye_type = if members.len() >= TERRITORIAL_EYE_SIZE {
        EyeType::Territorial
    } else {
        EyeType::for_size(members.len())
    };

    match eye_type {
        EyeType::E1 | EyeType::E2 => ShapeClass {
            eye_type,
            status: Nakade,
            signature: None,
            vital_point: None,
        },
        EyeType::E3 => ShapeClass {
            eye_type,
            status: Unsettled,
            signature: None,
            vital_point: vital_with_count(members, 2),
        },
        EyeType::Territorial | EyeType::FalseEye => ShapeClass {
            eye_type,
            status: Alive,
            signature: None,
            vital_point: None,
        },
        _ => {
            let sig = signature(members);
            match lookup_big_eye(&sig) {
                Some(entry) => ShapeClass {
                    eye_type,
                    status: entry.status,
                    vital_point: entry.vital_count.and_then(|c| vital_with_count(members, c)),
                    signature: Some(sig),
                },
                // Only reachable for disconnected member sets.
                None => ShapeClass {
                    eye_type,
                    status: Nakade,
                    signature: Some(sig),
                    vital_point: None,
                },
            }
        }
    }
}

/// The smallest member with exactly `count` member neighbors.
fn vital_with_count(members: &[Location], count: u8) -> Option<Location> {
    members
        .iter()
        .zip(neighbor_counts(members))
        .filter(|&(_, c)| c == count)
        .map(|(&loc, _)| loc)
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locs(points: &[(u8, u8)]) -> Vec<Location> {
        points.iter().map(|&(r, c)| Location::new(r, c)).collect()
    }

    #[test]
    fn test_small_eyes() {
        assert_eq!(classify_shape(&locs(&[(1, 1)])).eye_type, EyeType::E1);
        assert_eq!(classify_shape(&locs(&[(1, 1)])).status, EyeStatus::Nakade);
        assert_eq!(classify_shape(&locs(&[(1, 1), (1, 2)])).eye_type, EyeType::E2);

        let three = classify_shape(&locs(&[(2, 1), (2, 2), (2, 3)]));
        assert_eq!(three.eye_type, EyeType::E3);
        assert_eq!(three.status, EyeStatus::Unsettled);
        assert_eq!(three.vital_point, Some(Location::new(2, 2)));
    }

    #[test]
    fn test_four_point_signatures() {
        let straight = locs(&[(1, 1), (1, 2), (1, 3), (1, 4)]);
        assert_eq!(signature(&straight), "E1122");
        assert_eq!(classify_shape(&straight).status, EyeStatus::Alive);

        let pyramid = locs(&[(2, 1), (2, 2), (2, 3), (1, 2)]);
        let class = classify_shape(&pyramid);
        assert_eq!(class.signature.as_deref(), Some("E1113"));
        assert_eq!(class.status, EyeStatus::Unsettled);
        assert_eq!(class.vital_point, Some(Location::new(2, 2)));

        let square = locs(&[(1, 1), (1, 2), (2, 1), (2, 2)]);
        assert_eq!(classify_shape(&square).status, EyeStatus::Nakade);
    }

    #[test]
    fn test_bulky_five_and_rabbity_six() {
        let bulky = locs(&[(1, 1), (1, 2), (2, 1), (2, 2), (2, 3)]);
        let class = classify_shape(&bulky);
        assert_eq!(class.signature.as_deref(), Some("E12223"));
        assert_eq!(class.vital_point, Some(Location::new(2, 2)));

        let rabbity = locs(&[(2, 2), (1, 2), (3, 2), (2, 1), (2, 3), (3, 3)]);
        let class = classify_shape(&rabbity);
        assert_eq!(class.eye_type, EyeType::E6);
        assert_eq!(class.signature.as_deref(), Some("E112224"));
        assert_eq!(class.status, EyeStatus::Unsettled);
        assert_eq!(class.vital_point, Some(Location::new(2, 2)));
    }

    #[test]
    fn test_classification_ignores_member_order() {
        let mut members = locs(&[(3, 3), (3, 4), (4, 3), (4, 4), (4, 5)]);
        let forward = classify_shape(&members);
        members.reverse();
        assert_eq!(classify_shape(&members), forward);
        members.swap(0, 3);
        assert_eq!(classify_shape(&members), forward);
    }

    #[test]
    fn test_territorial() {
        let row: Vec<Location> = (1..=8).map(|c| Location::new(1, c)).collect();
        let class = classify_shape(&row);
        assert_eq!(class.eye_type, EyeType::Territorial);
        assert_eq!(class.status, EyeStatus::Alive);
    }

    #[test]
    fn test_catalog_signatures_are_unique_and_sized() {
        for (i, entry) in BIG_EYE_CATALOG.iter().enumerate() {
            let digits: u32 = entry.signature[1..].chars().filter_map(|c| c.to_digit(10)).sum();
            let size = entry.signature.len() - 1;
            assert!((4..=7).contains(&size));
            // Each adjacency is counted from both ends.
            assert_eq!(digits % 2, 0, "{}", entry.signature);
            assert!(digits as usize >= 2 * (size - 1));
            assert!(BIG_EYE_CATALOG[i + 1..].iter().all(|e| e.signature != entry.signature));
        }
    }
}
