//! # Native Enums
//!
//! Enums passed by value across the flat API. All of them are 32-bit signed
//! integers on the C side.

use crate::errors::UnknownEnumValue;
use serde::{Deserialize, Serialize};

macro_rules! native_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident = $value:literal,)+ }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[repr(i32)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value,)+
        }

        impl $name {
            /// Raw value as passed across the C ABI.
            #[must_use]
            pub const fn raw(self) -> i32 {
                self as i32
            }
        }

        impl TryFrom<i32> for $name {
            type Error = UnknownEnumValue;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok(Self::$variant),)+
                    _ => Err(UnknownEnumValue {
                        enum_name: stringify!($name),
                        value,
                    }),
                }
            }
        }
    };
}

native_enum!(
    /// Which slice of a leaderboard to download.
    LeaderboardDataRequest {
        /// Absolute rank range.
        Global = 0,
        /// Range relative to the current user's rank.
        GlobalAroundUser = 1,
        /// The current user's friends only.
        Friends = 2,
        /// An explicit list of users.
        Users = 3,
    }
);

native_enum!(
    /// How a leaderboard score should be displayed.
    LeaderboardDisplayType {
        None = 0,
        Numeric = 1,
        TimeSeconds = 2,
        TimeMilliSeconds = 3,
    }
);

native_enum!(
    /// Ordering of a leaderboard.
    LeaderboardSortMethod {
        None = 0,
        Ascending = 1,
        Descending = 2,
    }
);

native_enum!(
    /// How an uploaded score interacts with the user's existing one.
    LeaderboardUploadScoreMethod {
        None = 0,
        /// Keep whichever score is better according to the sort method.
        KeepBest = 1,
        /// Always replace the existing score.
        ForceUpdate = 2,
    }
);

native_enum!(
    /// Physical controller family reported by the input interface.
    SteamInputType {
        Unknown = 0,
        SteamController = 1,
        XBox360Controller = 2,
        XBoxOneController = 3,
        GenericGamepad = 4,
        PS4Controller = 5,
        AppleMFiController = 6,
        AndroidController = 7,
        SwitchJoyConPair = 8,
        SwitchJoyConSingle = 9,
        SwitchProController = 10,
        MobileTouch = 11,
        PS3Controller = 12,
        PS5Controller = 13,
        SteamDeckController = 14,
    }
);

native_enum!(
    /// Keyboard layout for the floating gamepad text input.
    FloatingGamepadTextInputMode {
        SingleLine = 0,
        MultipleLines = 1,
        Email = 2,
        Numeric = 3,
    }
);

native_enum!(
    /// Result of `SteamAPI_InitFlat`.
    SteamApiInitResult {
        Ok = 0,
        /// Catch-all failure; the error message says more.
        FailedGeneric = 1,
        /// The Steam client is not running or could not be reached.
        NoSteamClient = 2,
        /// The Steam client is older than the SDK this binding targets.
        VersionMismatch = 3,
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_values_match_flat_api() {
        assert_eq!(LeaderboardDataRequest::GlobalAroundUser.raw(), 1);
        assert_eq!(LeaderboardUploadScoreMethod::ForceUpdate.raw(), 2);
        assert_eq!(SteamInputType::SteamDeckController.raw(), 14);
        assert_eq!(SteamApiInitResult::VersionMismatch.raw(), 3);
    }

    #[test]
    fn test_try_from_known_value() {
        assert_eq!(
            SteamInputType::try_from(5),
            Ok(SteamInputType::PS4Controller)
        );
        assert_eq!(SteamApiInitResult::try_from(0), Ok(SteamApiInitResult::Ok));
    }

    #[test]
    fn test_try_from_unknown_value() {
        let err = FloatingGamepadTextInputMode::try_from(7).unwrap_err();
        assert_eq!(err.enum_name, "FloatingGamepadTextInputMode");
        assert_eq!(err.value, 7);
    }
}
