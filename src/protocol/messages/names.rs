//! Symbolic names for the raw code bytes carried in payloads.
//!
//! Payload structs keep the raw byte so that codes unknown to this build still
//! round-trip unchanged; these helpers are for logs and display only.

use std::fmt;

macro_rules! named_code {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $value:literal => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const fn from_u8(value: u8) -> Option<Self> {
                match value {
                    $($value => Some(Self::$variant),)+
                    _ => None,
                }
            }

            pub const fn to_u8(self) -> u8 {
                match self {
                    $(Self::$variant => $value),+
                }
            }

            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            /// Label for a raw code, falling back to hex for unnamed values.
            pub fn describe(value: u8) -> String {
                Self::from_u8(value)
                    .map(|code| code.label().to_string())
                    .unwrap_or_else(|| format!("{value:#04x}"))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

named_code!(
    /// Vehicle flight/drive mode
    FlightMode {
        Manual = 0 => "MANUAL",
        Guided = 2 => "GUIDED",
        Auto = 3 => "AUTO",
        Hold = 4 => "HOLD",
        Rtl = 5 => "RTL",
    }
);

named_code!(
    SystemStatus {
        Standby = 0 => "standby",
        Active = 1 => "active",
        Mission = 2 => "mission",
        Error = 3 => "error",
    }
);

named_code!(
    GpsFixType {
        NoGps = 0 => "no GPS",
        NoFix = 1 => "no fix",
        Fix2d = 2 => "2D",
        Fix3d = 3 => "3D",
        Dgps = 4 => "DGPS",
        RtkFloat = 5 => "RTK float",
        RtkFixed = 6 => "RTK fixed",
    }
);

named_code!(
    /// What the vehicle does on reaching a waypoint
    WaypointAction {
        Pass = 0 => "pass",
        Hold = 1 => "hold",
        Photo = 2 => "photo",
        Land = 3 => "land",
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(FlightMode::from_u8(2), Some(FlightMode::Guided));
        assert_eq!(FlightMode::Rtl.to_u8(), 5);
        assert_eq!(GpsFixType::from_u8(3), Some(GpsFixType::Fix3d));
        assert_eq!(WaypointAction::Land.label(), "land");
    }

    #[test]
    fn test_unnamed_codes_fall_back_to_hex() {
        assert_eq!(FlightMode::from_u8(1), None);
        assert_eq!(FlightMode::describe(1), "0x01");
        assert_eq!(SystemStatus::describe(3), "error");
    }
}
