// Copyright 2022 Ingemar Hedvall
// SPDX-License-Identifier: MIT
use std::time::Duration;

use asap3_client::{Client, ClientConfig, Parameter};
use asap3_codec::DataType;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

async fn read_frame(stream: &mut tokio::net::TcpStream) -> Vec<u8> {
    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await.unwrap();
    let length = u16::from_be_bytes(len_buf);
    let mut rest = vec![0u8; length as usize - 2];
    stream.read_exact(&mut rest).await.unwrap();
    let mut body = len_buf.to_vec();
    body.extend_from_slice(&rest);
    body
}

fn ok_response_for(frame: &[u8]) -> Vec<u8> {
    let cmd_code = u16::from_be_bytes([frame[2], frame[3]]);
    let mut body = Vec::new();
    body.extend_from_slice(&cmd_code.to_be_bytes());
    body.extend_from_slice(&asap3_proto::StatusCode::Ok.code().to_be_bytes());
    let length = body.len() as u16 + 2 + 2;
    body.extend_from_slice(&[0, 0]);
    let sum = (length as u32 + asap3_codec::checksum(&body) as u32) as u16;
    let n = body.len();
    body[n - 2..].copy_from_slice(&sum.to_be_bytes());
    let mut out = length.to_be_bytes().to_vec();
    out.extend_from_slice(&body);
    out
}

fn measurements_field(frame: &[u8]) -> u16 {
    // [LUN:u16][SampleRate:u16][Measurements:u16] starts right after cmd (no
    // status on a request frame): offset 4.
    u16::from_be_bytes([frame[8], frame[9]])
}

#[tokio::test]
async fn subscribes_in_chunks_of_fifty_with_a_leading_reset() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        // reset + three batches (50, 50, 1) = 4 telegrams total.
        let mut measurements = Vec::new();
        for _ in 0..4 {
            let frame = read_frame(&mut stream).await;
            measurements.push(measurements_field(&frame));
            stream.write_all(&ok_response_for(&frame)).await.unwrap();
        }
        measurements
    });

    let config = ClientConfig {
        host: addr.ip().to_string(),
        port: addr.port(),
        ..ClientConfig::default()
    };
    let (client, reactor_task, dispatcher_task) = Client::connect(config);

    let parameters: Vec<Parameter> = (1..=101)
        .map(|i| Parameter::new(format!("p{i}"), DataType::Float32, false))
        .collect();
    client.set_parameter_list(parameters);

    let subscribed = tokio::time::timeout(Duration::from_secs(5), client.start_subscription())
        .await
        .expect("subscription did not complete in time")
        .expect("subscription request failed");
    assert!(subscribed);

    let measurements = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server task did not finish in time")
        .expect("server task panicked");

    assert_eq!(measurements, vec![0, 50, 50, 1]);

    reactor_task.abort();
    dispatcher_task.abort();
}
