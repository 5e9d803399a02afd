use super::*;
use crate::protocol::messages::{ArmCommand, Heartbeat};
use anyhow::Result;
use std::time::Duration;
use tokio::time::timeout;

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

async fn link(device: DeviceId) -> Result<UdpLink> {
    UdpLink::bind(device, "127.0.0.1:0".parse()?).await
}

fn heartbeat(timestamp: u32) -> Message {
    Message::Heartbeat(Heartbeat {
        timestamp,
        armed: false,
        mode: 4,
        system_status: 0,
        online: true,
    })
}

#[tokio::test]
async fn test_send_and_receive() -> Result<()> {
    let gcs = link(DeviceId::Gcs).await?;
    let uav = link(DeviceId::Uav).await?.with_peer(gcs.local_addr()?);

    uav.send(DeviceId::Gcs, &heartbeat(1000)).await?;

    let received = timeout(RECV_TIMEOUT, gcs.recv()).await??;
    assert_eq!(received.envelope.source, DeviceId::Uav);
    assert_eq!(received.envelope.target, DeviceId::Gcs);
    assert_eq!(received.envelope.message, heartbeat(1000));
    assert_eq!(received.from, uav.local_addr()?);

    assert_eq!(uav.stats().snapshot().sent, 1);
    assert_eq!(gcs.stats().snapshot().received, 1);
    Ok(())
}

#[tokio::test]
async fn test_send_without_peer_fails() -> Result<()> {
    let uav = link(DeviceId::Uav).await?;
    assert!(uav.send(DeviceId::Gcs, &heartbeat(1)).await.is_err());
    assert_eq!(uav.stats().snapshot().sent, 0);
    Ok(())
}

#[tokio::test]
async fn test_bad_frames_are_counted_and_skipped() -> Result<()> {
    let gcs = link(DeviceId::Gcs).await?;
    let raw = UdpSocket::bind("127.0.0.1:0").await?;
    let gcs_addr = gcs.local_addr()?;

    let good = encode_frame(DeviceId::Uav, DeviceId::Gcs, &heartbeat(7))?;
    let mut corrupted = good.clone();
    corrupted[10] ^= 0xFF;

    raw.send_to(&good[..4], gcs_addr).await?;
    raw.send_to(&corrupted, gcs_addr).await?;
    raw.send_to(&[0x00; 12], gcs_addr).await?;
    raw.send_to(&good, gcs_addr).await?;

    let received = timeout(RECV_TIMEOUT, gcs.recv()).await??;
    assert_eq!(received.envelope.message, heartbeat(7));

    let stats = gcs.stats().snapshot();
    assert_eq!(stats.truncated, 1);
    assert_eq!(stats.checksum, 1);
    assert_eq!(stats.framing, 1);
    assert_eq!(stats.corrupted(), 3);
    assert_eq!(stats.received, 1);
    Ok(())
}

#[tokio::test]
async fn test_frames_for_other_devices_are_ignored() -> Result<()> {
    let ugv = link(DeviceId::Ugv).await?;
    let gcs = link(DeviceId::Gcs).await?.with_peer(ugv.local_addr()?);

    let arm = Message::ArmCommand(ArmCommand {
        timestamp: 5,
        arm: true,
        force: false,
    });
    gcs.send(DeviceId::Uav, &arm).await?;
    gcs.send(DeviceId::Broadcast, &arm).await?;

    let received = timeout(RECV_TIMEOUT, ugv.recv()).await??;
    assert_eq!(received.envelope.target, DeviceId::Broadcast);
    assert_eq!(received.envelope.message, arm);
    assert_eq!(ugv.stats().snapshot().not_for_us, 1);
    Ok(())
}

#[test]
fn test_snapshot_classes() {
    let stats = LinkStats::default();
    stats.record_dropped(&FrameError::UnknownType(0x0999).into());
    stats.record_dropped(&FrameError::VersionMismatch(2).into());
    stats.record_dropped(
        &FrameError::Checksum {
            received: 1,
            computed: 2,
        }
        .into(),
    );

    let snapshot = stats.snapshot();
    assert_eq!(snapshot.skewed(), 2);
    assert_eq!(snapshot.corrupted(), 1);
}
