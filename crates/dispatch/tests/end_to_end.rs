//! End-to-end dispatch against a live local receiver.

use std::collections::HashMap;

use fileferry_dispatch::{DispatchConfig, DispatchPool};
use tempfile::TempDir;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;

/// One folder, one worker, two files: the full sender path down to the
/// exact bytes on the wire.
#[tokio::test]
async fn single_worker_scenario() {
    let folder = TempDir::new().unwrap();
    std::fs::write(folder.path().join("a.txt"), b"xyz").unwrap();
    std::fs::write(folder.path().join("b.bin"), b"").unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Each connection carries exactly one frame and is closed by the
    // sender; read every connection to EOF and parse the raw bytes.
    let receiver = tokio::spawn(async move {
        let mut frames = HashMap::new();
        for _ in 0..2 {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            stream.read_to_end(&mut raw).await.unwrap();

            let name_len = i32::from_be_bytes(raw[0..4].try_into().unwrap());
            assert!(name_len > 0);
            let name_end = 4 + name_len as usize;
            let name = String::from_utf8(raw[4..name_end].to_vec()).unwrap();
            let size = i64::from_be_bytes(raw[name_end..name_end + 8].try_into().unwrap());
            let payload = raw[name_end + 8..].to_vec();
            assert_eq!(payload.len() as i64, size, "payload length matches header");

            frames.insert(name, payload);
        }
        frames
    });

    let config = DispatchConfig {
        workers: 1,
        receiver_host: "127.0.0.1".into(),
        receiver_port: addr.port(),
        folders: vec![folder.path().to_path_buf()],
    };
    let report = DispatchPool::new(config).unwrap().dispatch().await;

    assert!(!report.timed_out);
    assert_eq!(report.workers.len(), 1);
    assert_eq!(report.workers[0].sent, 2);
    assert_eq!(report.workers[0].skipped, 0);

    let frames = receiver.await.unwrap();
    assert_eq!(frames["a.txt"], b"xyz");
    assert_eq!(frames["b.bin"], b"");
}

/// A broken file in one folder never disturbs the other folder's
/// worker, and a zero-length file still produces a valid frame.
#[cfg(unix)]
#[tokio::test]
async fn failures_stay_local_to_their_file() {
    let d0 = TempDir::new().unwrap();
    let d1 = TempDir::new().unwrap();
    std::os::unix::fs::symlink("/gone", d0.path().join("dangling.lnk")).unwrap();
    std::fs::write(d0.path().join("after.txt"), b"survives").unwrap();
    std::fs::write(d1.path().join("empty.bin"), b"").unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let receiver = tokio::spawn(async move {
        let mut frames = HashMap::new();
        for _ in 0..2 {
            let (stream, _) = listener.accept().await.unwrap();
            let mut reader = tokio::io::BufReader::new(stream);
            let header = fileferry_wire::read_header(&mut reader).await.unwrap();
            let mut payload = Vec::new();
            fileferry_wire::read_payload(&mut reader, &mut payload, header.file_size)
                .await
                .unwrap();
            frames.insert(header.file_name, payload);
        }
        frames
    });

    let config = DispatchConfig {
        workers: 2,
        receiver_host: "127.0.0.1".into(),
        receiver_port: addr.port(),
        folders: vec![d0.path().to_path_buf(), d1.path().to_path_buf()],
    };
    let report = DispatchPool::new(config).unwrap().dispatch().await;

    assert!(!report.timed_out);
    assert_eq!(report.workers.iter().map(|w| w.sent).sum::<usize>(), 2);
    assert_eq!(report.workers.iter().map(|w| w.skipped).sum::<usize>(), 1);

    let frames = receiver.await.unwrap();
    assert_eq!(frames["after.txt"], b"survives");
    assert_eq!(frames["empty.bin"], b"");
}
