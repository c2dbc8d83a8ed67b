//! Linguistic set names for every controller variable.
//!
//! All variables share the same five membership shapes, so a set is fully
//! identified by its ordinal index `0..5`.  These enums give the indices
//! readable names at the call sites that build rule tables and tests.

/// Number of linguistic sets per variable.
pub const SET_COUNT: usize = 5;

/// Common behaviour of the per-variable set enums.
pub trait LinguisticSet: Copy + Sized + 'static {
    /// Every set, in index order.
    const ALL: [Self; SET_COUNT];

    /// Ordinal index of this set (`0..SET_COUNT`).
    fn index(self) -> usize;

    /// Set with the given ordinal index, or `None` when out of range.
    fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

macro_rules! linguistic_set {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl LinguisticSet for $name {
            const ALL: [Self; SET_COUNT] = [$($name::$variant),+];

            fn index(self) -> usize {
                self as usize
            }
        }
    };
}

linguistic_set!(
    /// Where the target sits horizontally in the image.
    LateralPosition { FarLeft, Left, Center, Right, FarRight }
);

linguistic_set!(
    /// How fast the target drifts horizontally in the image.
    LateralRate { RapidLeft, Left, NoChange, Right, RapidRight }
);

linguistic_set!(
    /// Apparent size of the target; larger means closer.
    Distance { VerySmall, Small, Medium, Large, VeryLarge }
);

linguistic_set!(
    /// How fast the target approaches or recedes.
    DistanceRate { RapidClosingIn, ClosingIn, Steady, MovingAway, RapidMovingAway }
);

linguistic_set!(
    /// Commanded turn rate (turning left is negative on this axis).
    AngularVelocity { BigTurnLeft, TurnLeft, NoChange, TurnRight, BigTurnRight }
);

linguistic_set!(
    /// Commanded forward speed.
    LinearVelocity { VerySlow, Slow, Nominal, Fast, VeryFast }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_declaration_order() {
        assert_eq!(LateralPosition::FarLeft.index(), 0);
        assert_eq!(LateralRate::NoChange.index(), 2);
        assert_eq!(DistanceRate::RapidMovingAway.index(), 4);
        assert_eq!(AngularVelocity::TurnRight.index(), 3);
        for (i, set) in LinearVelocity::ALL.iter().enumerate() {
            assert_eq!(set.index(), i);
        }
    }

    #[test]
    fn from_index_round_trips() {
        assert_eq!(Distance::from_index(1), Some(Distance::Small));
        assert_eq!(Distance::from_index(SET_COUNT), None);
        for set in AngularVelocity::ALL {
            assert_eq!(AngularVelocity::from_index(set.index()), Some(set));
        }
    }
}
