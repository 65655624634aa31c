//! Newtype IDs for type-safe entity references.
//!
//! Every table keys its rows with a `SERIAL` integer. Wrapping each one in its
//! own type means a `VenueId` can never be passed where a `ReservationId` is
//! expected, which matters here because several routes carry a bare `{id}`
//! whose meaning depends on the path (`/reservation/{id}/create` takes a venue).

/// Defines an `i32` newtype ID.
///
/// The generated type is `Copy`, orders and hashes like its inner value,
/// serializes transparently and, with the `postgres` feature, maps to `INT4`.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[cfg_attr(feature = "postgres", derive(::sqlx::Type))]
        #[cfg_attr(feature = "postgres", sqlx(transparent))]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Wrap a raw database key.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// The raw database key.
            #[must_use]
            pub const fn as_i32(self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Primary key of the `users` table.
    UserId
);
define_id!(
    /// Primary key of the `venue` table.
    VenueId
);
define_id!(
    /// Primary key of the `reservation` table.
    ReservationId
);
define_id!(
    /// Primary key of the `review` table.
    ReviewId
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_bare_integer() {
        assert_eq!(VenueId::new(42).to_string(), "42");
    }

    #[test]
    fn test_from_str_trims_whitespace() {
        let id: ReservationId = " 7 ".parse().unwrap();
        assert_eq!(id, ReservationId::new(7));
        assert!("seven".parse::<ReservationId>().is_err());
    }

    #[test]
    fn test_serde_is_transparent() {
        let json = serde_json::to_string(&UserId::new(3)).unwrap();
        assert_eq!(json, "3");
        let back: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_i32(), 3);
    }
}
