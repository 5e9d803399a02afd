//! Forwards autopilot MAVLink telemetry onto the GCS link.
//!
//! | MAVLink       | Link message |
//! |---------------|--------------|
//! | HEARTBEAT     | Heartbeat    |
//! | ATTITUDE      | Attitude     |
//! | GPS_RAW_INT   | Gps          |
//! | VFR_HUD       | Motion       |
//! | SYS_STATUS    | Battery      |
//!
//! Heartbeats from GCS or companion components on the same MAVLink network
//! are skipped; only the autopilot's own heartbeat describes the vehicle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use mavlink::common::{MavAutopilot, MavMessage, MavModeFlag, MavType};
use mavlink::MavConnection;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::link::UdpLink;
use crate::protocol::messages::{Attitude, Battery, GpsFix, Heartbeat, Motion};
use crate::protocol::{DeviceId, Message};
use crate::util;

const CHANNEL_CAPACITY: usize = 64;

/// Convert one MAVLink message, stamping it with `timestamp` (ms).
///
/// Returns `None` for messages the link has no counterpart for.
pub fn to_link_message(message: &MavMessage, timestamp: u32) -> Option<Message> {
    let converted = match message {
        MavMessage::HEARTBEAT(data)
            if data.mavtype == MavType::MAV_TYPE_GCS
                || data.autopilot == MavAutopilot::MAV_AUTOPILOT_INVALID =>
        {
            return None
        }
        MavMessage::HEARTBEAT(data) => Message::Heartbeat(Heartbeat {
            timestamp,
            armed: data
                .base_mode
                .contains(MavModeFlag::MAV_MODE_FLAG_SAFETY_ARMED),
            mode: (data.custom_mode & 0xFF) as u8,
            system_status: data.system_status as u8,
            online: true,
        }),
        MavMessage::ATTITUDE(data) => Message::Attitude(Attitude {
            timestamp,
            roll: data.roll,
            pitch: data.pitch,
            yaw: data.yaw,
            roll_speed: data.rollspeed,
            pitch_speed: data.pitchspeed,
            yaw_speed: data.yawspeed,
        }),
        MavMessage::GPS_RAW_INT(data) => Message::Gps(GpsFix {
            timestamp,
            latitude: f64::from(data.lat) / 1e7,
            longitude: f64::from(data.lon) / 1e7,
            altitude: data.alt as f32 / 1000.0,
            fix_type: data.fix_type as u8,
            satellites: data.satellites_visible,
            // eph is HDOP * 100, the same scale the link uses
            hdop: data.eph,
        }),
        MavMessage::VFR_HUD(data) => Message::Motion(Motion {
            timestamp,
            ground_speed: data.groundspeed,
            vertical_speed: data.climb,
            heading: f32::from(data.heading).to_radians(),
        }),
        MavMessage::SYS_STATUS(data) => Message::Battery(Battery {
            timestamp,
            voltage: f32::from(data.voltage_battery) / 1000.0,
            current: f32::from(data.current_battery) / 100.0,
            percent: data.battery_remaining.max(0) as u8,
            charging: false,
            remaining_min: 0,
        }),
        _ => return None,
    };
    Some(converted)
}

pub struct MavlinkBridge {
    connection_string: String,
    link: Arc<UdpLink>,
    target: DeviceId,
    running: Arc<AtomicBool>,
}

impl MavlinkBridge {
    pub fn new(connection_string: String, link: Arc<UdpLink>, target: DeviceId) -> Self {
        Self {
            connection_string,
            link,
            target,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn start(&self) -> Result<()> {
        info!("Connecting to autopilot at {}", self.connection_string);
        let connection = mavlink::connect::<MavMessage>(&self.connection_string)
            .with_context(|| format!("Failed to connect to {}", self.connection_string))?;

        self.running.store(true, Ordering::SeqCst);
        let (tx, mut rx) = mpsc::channel(CHANNEL_CAPACITY);
        let running = Arc::clone(&self.running);

        // MAVLink reads block, so they live on their own thread
        std::thread::Builder::new()
            .name("mavlink-reader".to_string())
            .spawn(move || {
                while running.load(Ordering::SeqCst) {
                    match connection.recv() {
                        Ok((_header, message)) => {
                            let Some(message) = to_link_message(&message, util::timestamp_ms())
                            else {
                                continue;
                            };
                            if tx.blocking_send(message).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            debug!("MAVLink read error: {:?}", e);
                            std::thread::sleep(std::time::Duration::from_millis(10));
                        }
                    }
                }
                info!("MAVLink reader stopped");
            })
            .context("Failed to spawn MAVLink reader thread")?;

        while let Some(message) = rx.recv().await {
            if let Err(e) = self.link.send(self.target, &message).await {
                warn!("Failed to forward {}: {:#}", message.message_type(), e);
            }
        }

        if self.running.load(Ordering::SeqCst) {
            error!("MAVLink reader exited unexpectedly");
        }
        Ok(())
    }

    pub async fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}
