use core::fmt;

/// Chebyshev distance between a probe and the ghost, clamped to four buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum DistanceBucket {
    Zero = 0,
    One = 1,
    Two = 2,
    Far = 3,
}

impl DistanceBucket {
    pub const ALL: [DistanceBucket; 4] = [
        DistanceBucket::Zero,
        DistanceBucket::One,
        DistanceBucket::Two,
        DistanceBucket::Far,
    ];

    pub const fn from_distance(distance: usize) -> Self {
        match distance {
            0 => DistanceBucket::Zero,
            1 => DistanceBucket::One,
            2 => DistanceBucket::Two,
            _ => DistanceBucket::Far,
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(DistanceBucket::Zero),
            1 => Some(DistanceBucket::One),
            2 => Some(DistanceBucket::Two),
            3 => Some(DistanceBucket::Far),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DistanceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DistanceBucket::Zero => "0",
            DistanceBucket::One => "1",
            DistanceBucket::Two => "2",
            DistanceBucket::Far => ">2",
        };
        f.write_str(label)
    }
}
