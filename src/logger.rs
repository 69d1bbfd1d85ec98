use crate::config::Config;
use chrono::Local;
use hyper::{Method, Uri, Version};
use std::net::SocketAddr;

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    println!("======================================");
    println!("Async server started successfully");
    println!("Listening on: http://{addr}");
    println!("Home page: {}", config.resources.home_page);
    if let Some(workers) = config.server.workers {
        println!("Worker threads: {workers}");
    }
    println!("Using Tokio runtime for concurrency");
    println!("======================================\n");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    println!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_accept_error(err: &std::io::Error) {
    eprintln!("[Error] Failed to accept connection: {err}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    eprintln!("[Error] Failed to serve connection: {err:?}");
}

pub fn log_request(method: &Method, uri: &Uri, version: Version) {
    println!(
        "[{}] [Request] {method} {uri} {version:?}",
        Local::now().format("%d/%b/%Y:%H:%M:%S %z")
    );
}

pub fn log_bind_failed(addr: &SocketAddr, err: &std::io::Error) {
    eprintln!("[Error] Failed to bind {addr}: {err}");
}
