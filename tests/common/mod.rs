//! Minimal HTTP responder shared by integration tests

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::TcpListener;

pub const PRIMARY_BODY: &str = r#"{"ip":"8.8.8.8","version":"IPv4","city":"Mountain View","region":"California","country_name":"United States","country_code":"US","latitude":37.42301,"longitude":-122.083352,"timezone":"America/Los_Angeles","asn":"AS15169","org":"GOOGLE"}"#;

pub const FALLBACK_BODY: &str = r#"{"status":"success","country":"United States","countryCode":"US","regionName":"Virginia","city":"Ashburn","lat":39.03,"lon":-77.5,"timezone":"America/New_York","isp":"Google LLC","as":"AS15169 Google LLC","query":"8.8.8.8","proxy":false,"hosting":true}"#;

/// Serve `body` with `status` to every connection; returns the base URL
pub fn serve(status: u16, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
    let addr = listener.local_addr().expect("local addr");

    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let reason = match status {
                200 => "OK",
                429 => "Too Many Requests",
                _ => "Error",
            };
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });

    format!("http://{addr}")
}
