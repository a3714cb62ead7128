use cbc::SendError;
use crossbeam_channel as cbc;
use log::warn;
use serde::Deserialize;
use socket2::Socket;

use std::error;
use std::io;
use std::str;

use super::sock;

/// Largest JSON-encoded message a single datagram may carry. The encoder
/// side drops anything bigger instead of truncating it on the wire.
pub const MAX_MESSAGE_SIZE: usize = 1024;

pub enum RxError<T> {
    IoError(io::Error),
    ChannelSendError(SendError<T>),
}

impl<T> From<io::Error> for RxError<T> {
    fn from(e: io::Error) -> Self {
        RxError::IoError(e)
    }
}

impl<T> From<SendError<T>> for RxError<T> {
    fn from(e: SendError<T>) -> Self {
        RxError::ChannelSendError(e)
    }
}

/// Drains `ch` and broadcasts each value as a JSON datagram. Returns Ok
/// when the channel's senders are gone.
pub fn tx<T: serde::Serialize>(port: u16, ch: cbc::Receiver<T>, localhost: bool) -> io::Result<()> {
    let (s, addr) = sock::new_tx(port, localhost)?;
    loop {
        let data = match ch.recv() {
            Ok(data) => data,
            Err(_) => return Ok(()),
        };
        let serialized = serde_json::to_string(&data).unwrap();
        if serialized.len() > MAX_MESSAGE_SIZE {
            warn!(
                "dropping oversized message ({} bytes, limit {})",
                serialized.len(),
                MAX_MESSAGE_SIZE
            );
            continue;
        }
        if let Err(e) = s.send_to(serialized.as_bytes(), &addr) {
            warn!("Unable to send packet, {}", e);
        }
    }
}

pub fn rx<T: serde::de::DeserializeOwned>(port: u16, ch: cbc::Sender<T>) -> Result<(), RxError<T>> {
    let s = sock::new_rx(port)?;

    let mut buf = [0; MAX_MESSAGE_SIZE];

    loop {
        match parse_packet(&s, &mut buf) {
            Ok(d) => ch.send(d)?,
            Err(e) => warn!("Received bad package got error: {}", e),
        }
    }
}

fn parse_packet<'a, T: Deserialize<'a>>(
    s: &'_ Socket,
    buf: &'a mut [u8; MAX_MESSAGE_SIZE],
) -> Result<T, Box<dyn error::Error>> {
    let n = s.recv(buf)?;
    let msg = str::from_utf8(&buf[..n])?;
    serde_json::from_str::<T>(msg).map_err(|e| e.into())
}
