//! Line-oriented TCP command transport.
//!
//! Each client gets a reader thread. Request lines are forwarded to a single
//! owner (see [`serve`]) together with a reply channel, so commands against
//! the same map never run concurrently.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use sim_runtime::{ErrorKind, Response};
use tracing::{info, warn};

use crate::service::CommandService;

/// Longest request line a client may send, newline excluded.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

#[derive(Debug)]
pub struct CommandRequest {
    pub line: String,
    pub reply: Sender<Response>,
}

/// Bind the command port and start accepting clients. Returns the bound
/// address, which differs from `bind_addr` when port 0 was requested.
pub fn spawn_command_listener(
    bind_addr: SocketAddr,
) -> io::Result<(SocketAddr, Receiver<CommandRequest>)> {
    let listener = TcpListener::bind(bind_addr)?;
    let local_addr = listener.local_addr()?;
    listener.set_nonblocking(true)?;
    let (sender, receiver) = unbounded::<CommandRequest>();

    thread::spawn(move || loop {
        match listener.accept() {
            Ok((stream, addr)) => {
                info!(
                    target: "circle_map::server",
                    %addr,
                    "client.connected"
                );
                let sender = sender.clone();
                thread::spawn(move || handle_client(stream, addr, sender));
            }
            Err(ref err) if err.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(Duration::from_millis(50));
            }
            Err(err) => {
                warn!(
                    target: "circle_map::server",
                    error = %err,
                    "client.accept_failed"
                );
                thread::sleep(Duration::from_millis(200));
            }
        }
    });

    Ok((local_addr, receiver))
}

/// Apply requests in arrival order until every sender is gone.
pub fn serve(service: &mut CommandService, requests: Receiver<CommandRequest>) {
    while let Ok(request) = requests.recv() {
        let response = service.handle_line(&request.line);
        if request.reply.send(response).is_err() {
            warn!(
                target: "circle_map::server",
                "command.reply_dropped"
            );
        }
    }
}

fn handle_client(stream: TcpStream, addr: SocketAddr, sender: Sender<CommandRequest>) {
    if let Err(err) = stream.set_nonblocking(false) {
        warn!(
            target: "circle_map::server",
            %addr,
            error = %err,
            "client.blocking_mode_failed"
        );
    }
    let mut writer = match stream.try_clone() {
        Ok(writer) => writer,
        Err(err) => {
            warn!(target: "circle_map::server", %addr, error = %err, "client.clone_failed");
            return;
        }
    };
    let mut reader = BufReader::new(stream);
    loop {
        let response = match read_request(&mut reader) {
            Ok(Request::Eof) => break,
            Ok(Request::Line(line)) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                dispatch(&sender, trimmed)
            }
            Ok(Request::Rejected(message)) => {
                warn!(target: "circle_map::server", %addr, reason = %message, "client.line_rejected");
                Response::error(ErrorKind::InvalidInput, message)
            }
            Err(err) => {
                warn!(target: "circle_map::server", %addr, error = %err, "client.read_failed");
                break;
            }
        };
        let stop = !response.is_ok() && owner_gone(&response);
        if let Err(err) = writeln!(writer, "{}", response.to_line()) {
            warn!(target: "circle_map::server", %addr, error = %err, "client.write_failed");
            break;
        }
        if stop {
            break;
        }
    }
    info!(target: "circle_map::server", %addr, "client.disconnected");
}

enum Request {
    Line(String),
    /// Line was unusable and has been skipped; the message goes back to the client.
    Rejected(String),
    Eof,
}

/// Read one line, buffering at most `MAX_LINE_BYTES`.
fn read_request<R: BufRead>(reader: &mut R) -> io::Result<Request> {
    let mut buf = Vec::new();
    let read = reader
        .by_ref()
        .take(MAX_LINE_BYTES as u64 + 1)
        .read_until(b'\n', &mut buf)?;
    if read == 0 {
        return Ok(Request::Eof);
    }
    if buf.last() != Some(&b'\n') && buf.len() > MAX_LINE_BYTES {
        skip_line(reader)?;
        return Ok(Request::Rejected(format!(
            "request line exceeds {MAX_LINE_BYTES} bytes"
        )));
    }
    match String::from_utf8(buf) {
        Ok(line) => Ok(Request::Line(line)),
        Err(_) => Ok(Request::Rejected("request line is not valid utf-8".to_string())),
    }
}

/// Discard input up to and including the next newline.
fn skip_line<R: BufRead>(reader: &mut R) -> io::Result<()> {
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            return Ok(());
        }
        match available.iter().position(|&b| b == b'\n') {
            Some(pos) => {
                reader.consume(pos + 1);
                return Ok(());
            }
            None => {
                let len = available.len();
                reader.consume(len);
            }
        }
    }
}

const OWNER_GONE: &str = "command loop is not running";

fn dispatch(sender: &Sender<CommandRequest>, line: &str) -> Response {
    let (reply, replies) = bounded(1);
    let request = CommandRequest {
        line: line.to_string(),
        reply,
    };
    if sender.send(request).is_err() {
        return Response::error(ErrorKind::Internal, OWNER_GONE);
    }
    replies
        .recv()
        .unwrap_or_else(|_| Response::error(ErrorKind::Internal, OWNER_GONE))
}

fn owner_gone(response: &Response) -> bool {
    matches!(response, Response::Error { kind: ErrorKind::Internal, message } if message == OWNER_GONE)
}
