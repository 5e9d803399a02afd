use proptest::prelude::*;

use super::*;
use crate::protocol::error::PayloadError;
use crate::protocol::MessageType;

fn round_trip<T: PayloadCodec + PartialEq + std::fmt::Debug>(message: T) {
    let bytes = message.encode();
    assert_eq!(bytes.len(), T::SIZE);
    assert_eq!(T::decode(&bytes).unwrap(), message);
}

#[test]
fn test_heartbeat_layout() {
    let heartbeat = Heartbeat {
        timestamp: 1000,
        armed: true,
        mode: 2,
        system_status: 1,
        online: true,
    };
    assert_eq!(heartbeat.encode(), vec![0xE8, 0x03, 0x00, 0x00, 0x01, 0x02, 0x01, 0x01]);
    round_trip(heartbeat);
}

#[test]
fn test_payload_sizes() {
    assert_eq!(Heartbeat::SIZE, 8);
    assert_eq!(Attitude::SIZE, 28);
    assert_eq!(Motion::SIZE, 16);
    assert_eq!(GpsFix::SIZE, 28);
    assert_eq!(Battery::SIZE, 16);
    assert_eq!(GcsHeartbeat::SIZE, 8);
    assert_eq!(ArmCommand::SIZE, 8);
    assert_eq!(SetMode::SIZE, 8);
    assert_eq!(RcOverride::SIZE, 20);
    assert_eq!(SetWaypoint::SIZE, 40);
}

#[test]
fn test_encoded_length_matches_declared_size() {
    fn check<T: PayloadCodec>(message: T) {
        assert_eq!(
            message.encode().len(),
            T::SIZE,
            "{} writes a different length than it declares",
            T::MESSAGE_TYPE
        );
    }

    check(Heartbeat {
        timestamp: 0,
        armed: false,
        mode: 0,
        system_status: 0,
        online: false,
    });
    check(Attitude {
        timestamp: 0,
        roll: 0.0,
        pitch: 0.0,
        yaw: 0.0,
        roll_speed: 0.0,
        pitch_speed: 0.0,
        yaw_speed: 0.0,
    });
    check(Motion {
        timestamp: 0,
        ground_speed: 0.0,
        vertical_speed: 0.0,
        heading: 0.0,
    });
    check(GpsFix {
        timestamp: 0,
        latitude: 0.0,
        longitude: 0.0,
        altitude: 0.0,
        fix_type: 0,
        satellites: 0,
        hdop: 0,
    });
    check(Battery {
        timestamp: 0,
        voltage: 0.0,
        current: 0.0,
        percent: 0,
        charging: false,
        remaining_min: 0,
    });
    check(GcsHeartbeat {
        timestamp: 0,
        status: 0,
    });
    check(ArmCommand {
        timestamp: 0,
        arm: false,
        force: false,
    });
    check(SetMode {
        timestamp: 0,
        mode: 0,
    });
    check(RcOverride {
        timestamp: 0,
        channels: [0; 8],
    });
    check(SetWaypoint {
        timestamp: 0,
        waypoint_id: 0,
        waypoint_count: 0,
        latitude: 0.0,
        longitude: 0.0,
        altitude: 0.0,
        speed: 0.0,
        hold_time: 0,
        action: 0,
    });
}

#[test]
fn test_waypoint_rejects_short_payload() {
    assert_eq!(
        SetWaypoint::decode(&[0u8; 36]),
        Err(PayloadError::SizeMismatch {
            message_type: MessageType::SetWaypoint,
            expected: 40,
            actual: 36,
        })
    );
    assert!(SetWaypoint::decode(&[0u8; 40]).is_ok());
}

#[test]
fn test_gps_fix_round_trip() {
    round_trip(GpsFix {
        timestamp: 1_700_000,
        latitude: 24.163162,
        longitude: 120.646854,
        altitude: 150.5,
        fix_type: 3,
        satellites: 14,
        hdop: 80,
    });
}

#[test]
fn test_waypoint_layout_pads_with_zeros() {
    let waypoint = SetWaypoint {
        timestamp: 42,
        waypoint_id: 0,
        waypoint_count: 5,
        latitude: 24.163162,
        longitude: 120.646854,
        altitude: 50.0,
        speed: 5.0,
        hold_time: 0,
        action: 1,
    };
    let bytes = waypoint.encode();
    assert_eq!(bytes[36], 1);
    assert_eq!(&bytes[37..], &[0, 0, 0]);
    assert_eq!(&bytes[4..8], &[0, 0, 5, 0]);
    round_trip(waypoint);
}

#[test]
fn test_padding_is_ignored_on_decode() {
    let mut bytes = SetMode {
        timestamp: 7,
        mode: 5,
    }
    .encode();
    bytes[5..].copy_from_slice(&[0xAA, 0xBB, 0xCC]);
    let decoded = SetMode::decode(&bytes).unwrap();
    assert_eq!(decoded, SetMode { timestamp: 7, mode: 5 });
}

#[test]
fn test_nonzero_bool_bytes_decode_as_true() {
    let bytes = [0, 0, 0, 0, 0x7F, 0, 0, 0x02];
    let heartbeat = Heartbeat::decode(&bytes).unwrap();
    assert!(heartbeat.armed);
    assert!(heartbeat.online);
}

#[test]
fn test_short_and_long_buffers_are_rejected() {
    let bytes = Attitude {
        timestamp: 1,
        roll: 0.1,
        pitch: 0.2,
        yaw: 0.3,
        roll_speed: 0.0,
        pitch_speed: 0.0,
        yaw_speed: 0.0,
    }
    .encode();

    assert_eq!(
        Attitude::decode(&bytes[..27]),
        Err(PayloadError::SizeMismatch {
            message_type: MessageType::Attitude,
            expected: 28,
            actual: 27,
        })
    );

    let mut long = bytes.clone();
    long.push(0);
    assert!(matches!(
        Attitude::decode(&long),
        Err(PayloadError::SizeMismatch { actual: 29, .. })
    ));
    assert!(Attitude::decode(&[]).is_err());
}

#[test]
fn test_display_uses_degrees_and_names() {
    let attitude = Attitude {
        timestamp: 0,
        roll: (-5.2f32).to_radians(),
        pitch: 3.1f32.to_radians(),
        yaw: 180f32.to_radians(),
        roll_speed: 0.01,
        pitch_speed: -0.02,
        yaw_speed: 0.05,
    };
    assert_eq!(attitude.to_string(), "attitude: roll=-5.2°, pitch=3.1°, yaw=180.0°");

    let heartbeat = Heartbeat {
        timestamp: 0,
        armed: false,
        mode: 5,
        system_status: 0,
        online: true,
    };
    assert_eq!(
        heartbeat.to_string(),
        "heartbeat: armed=false, mode=RTL, status=standby, online=true"
    );
}

proptest! {
    #[test]
    fn heartbeat_round_trip(timestamp: u32, armed: bool, mode: u8, system_status: u8, online: bool) {
        round_trip(Heartbeat { timestamp, armed, mode, system_status, online });
    }

    #[test]
    fn attitude_round_trip(
        timestamp: u32,
        angles in prop::array::uniform3(-std::f32::consts::PI..std::f32::consts::PI),
        rates in prop::array::uniform3(-10.0f32..10.0),
    ) {
        round_trip(Attitude {
            timestamp,
            roll: angles[0],
            pitch: angles[1],
            yaw: angles[2],
            roll_speed: rates[0],
            pitch_speed: rates[1],
            yaw_speed: rates[2],
        });
    }

    #[test]
    fn motion_round_trip(timestamp: u32, ground_speed in 0.0f32..50.0, vertical_speed in -10.0f32..10.0, heading in 0.0f32..6.3) {
        round_trip(Motion { timestamp, ground_speed, vertical_speed, heading });
    }

    #[test]
    fn gps_round_trip(
        timestamp: u32,
        latitude in -90.0f64..90.0,
        longitude in -180.0f64..180.0,
        altitude in -500.0f32..10_000.0,
        fix_type: u8,
        satellites: u8,
        hdop: u16,
    ) {
        round_trip(GpsFix { timestamp, latitude, longitude, altitude, fix_type, satellites, hdop });
    }

    #[test]
    fn battery_round_trip(timestamp: u32, voltage in 0.0f32..60.0, current in -20.0f32..200.0, percent in 0u8..=100, charging: bool, remaining_min: u16) {
        round_trip(Battery { timestamp, voltage, current, percent, charging, remaining_min });
    }

    #[test]
    fn command_round_trips(timestamp: u32, status: u8, arm: bool, force: bool, mode: u8, channels: [u16; 8]) {
        round_trip(GcsHeartbeat { timestamp, status });
        round_trip(ArmCommand { timestamp, arm, force });
        round_trip(SetMode { timestamp, mode });
        round_trip(RcOverride { timestamp, channels });
    }

    #[test]
    fn waypoint_round_trip(
        timestamp: u32,
        waypoint_id: u16,
        waypoint_count: u16,
        latitude in -90.0f64..90.0,
        longitude in -180.0f64..180.0,
        altitude in 0.0f32..500.0,
        speed in 0.0f32..30.0,
        hold_time: u32,
        action: u8,
    ) {
        round_trip(SetWaypoint {
            timestamp, waypoint_id, waypoint_count, latitude, longitude, altitude, speed, hold_time, action,
        });
    }
}
