// Copyright 2022 Ingemar Hedvall
// SPDX-License-Identifier: MIT
use std::time::Duration;

use asap3_proto::{init_request, DispatchOutcome, StatusCode, Telegram};
use asap3_sender::{connect, ServerAddr};
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

fn ack_response(cmd_code: u16) -> Vec<u8> {
    build_response(cmd_code, StatusCode::Ack.code(), &[])
}

fn ok_response(cmd_code: u16) -> Vec<u8> {
    build_response(cmd_code, StatusCode::Ok.code(), &[])
}

fn build_response(cmd_code: u16, status_code: u16, payload: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&cmd_code.to_be_bytes());
    body.extend_from_slice(&status_code.to_be_bytes());
    body.extend_from_slice(payload);
    let length = body.len() as u16 + 2 + 2;
    body.extend_from_slice(&[0, 0]);
    let sum = (length as u32 + asap3_codec::checksum(&body) as u32) as u16;
    let n = body.len();
    body[n - 2..].copy_from_slice(&sum.to_be_bytes());
    let mut frame = length.to_be_bytes().to_vec();
    frame.extend_from_slice(&body);
    frame
}

#[tokio::test]
async fn ack_prolongs_and_ok_completes_the_telegram() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_frame(&mut stream).await;
        let cmd_code = u16::from_be_bytes([request[2], request[3]]);

        stream.write_all(&ack_response(cmd_code)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        stream.write_all(&ok_response(cmd_code)).await.unwrap();
    });

    let (sender, handle) = connect(ServerAddr::new(addr.ip().to_string(), addr.port()));
    let (reactor_task, dispatcher_task) = sender.run();

    let (telegram, rx) = Telegram::new(init_request());
    handle.send(telegram).await.unwrap();

    let outcome = tokio::time::timeout(Duration::from_secs(5), rx)
        .await
        .expect("dispatch did not complete in time")
        .expect("sender half was not dropped");

    match outcome {
        DispatchOutcome::Response(response) => {
            assert_eq!(response.status(), StatusCode::Ok);
        }
        DispatchOutcome::Failed(err) => panic!("expected a response, got {err:?}"),
    }

    drop(handle);
    server.await.unwrap();
    reactor_task.abort();
    dispatcher_task.abort();
}

#[tokio::test]
async fn not_processed_fails_the_telegram_and_forces_a_reconnect() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (mut first_stream, _) = listener.accept().await.unwrap();
        let request = read_frame(&mut first_stream).await;
        let cmd_code = u16::from_be_bytes([request[2], request[3]]);
        first_stream
            .write_all(&build_response(cmd_code, StatusCode::NotProcessed.code(), &[]))
            .await
            .unwrap();

        // The reactor must tear the connection down and reconnect, proving
        // the dispatcher actually signaled it rather than leaving the old
        // socket live.
        let (mut second_stream, _) = listener.accept().await.unwrap();
        let request = read_frame(&mut second_stream).await;
        let cmd_code = u16::from_be_bytes([request[2], request[3]]);
        second_stream.write_all(&ok_response(cmd_code)).await.unwrap();
    });

    let (sender, handle) = connect(ServerAddr::new(addr.ip().to_string(), addr.port()));
    let (reactor_task, dispatcher_task) = sender.run();

    let (telegram, rx) = Telegram::new(init_request());
    handle.send(telegram).await.unwrap();

    let outcome = tokio::time::timeout(Duration::from_secs(5), rx)
        .await
        .expect("dispatch did not complete in time")
        .expect("sender half was not dropped");

    match outcome {
        DispatchOutcome::Failed(_) => {}
        DispatchOutcome::Response(response) => panic!("expected a failure, got {response:?}"),
    }

    // The reactor's RETRY_WAIT backoff is 5 seconds, so give the reconnect
    // and second round-trip plenty of room.
    let (telegram, rx) = Telegram::new(init_request());
    handle.send(telegram).await.unwrap();
    let outcome = tokio::time::timeout(Duration::from_secs(10), rx)
        .await
        .expect("second dispatch did not complete in time")
        .expect("sender half was not dropped");
    assert!(matches!(outcome, DispatchOutcome::Response(_)));

    drop(handle);
    server.await.unwrap();
    reactor_task.abort();
    dispatcher_task.abort();
}

#[tokio::test]
async fn repeat_cmd_causes_byte_identical_retransmission() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let first = read_frame(&mut stream).await;
        let cmd_code = u16::from_be_bytes([first[2], first[3]]);

        stream
            .write_all(&build_response(cmd_code, StatusCode::RepeatCmd.code(), &[]))
            .await
            .unwrap();

        let second = read_frame(&mut stream).await;
        assert_eq!(first, second, "retransmission must be byte-identical");

        stream.write_all(&ok_response(cmd_code)).await.unwrap();
    });

    let (sender, handle) = connect(ServerAddr::new(addr.ip().to_string(), addr.port()));
    let (reactor_task, dispatcher_task) = sender.run();

    let (telegram, rx) = Telegram::new(init_request());
    handle.send(telegram).await.unwrap();

    let outcome = tokio::time::timeout(Duration::from_secs(5), rx)
        .await
        .expect("dispatch did not complete in time")
        .expect("sender half was not dropped");

    assert!(matches!(outcome, DispatchOutcome::Response(_)));

    drop(handle);
    server.await.unwrap();
    reactor_task.abort();
    dispatcher_task.abort();
}
