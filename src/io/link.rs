use std::io::ErrorKind;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use log::{debug, error, info, warn};
use tungstenite::Message;
use tungstenite::stream::MaybeTlsStream;

use crate::model::{Command, ConnectionStatus, EngineMessage};

/// How long a socket read may block before outbound commands get a turn
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Error type for the command channel
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("not connected to the engine")]
    NotConnected,
    #[error("engine link closed")]
    Closed,
}

/// Where commands for the engine go. Sends are fire-and-forget: `Ok` means
/// the command was handed off, not that the engine acted on it.
pub trait CommandSink {
    fn send(&mut self, command: &Command) -> Result<(), TransportError>;
}

/// Events delivered from the link thread, in arrival order.
#[derive(Debug)]
pub enum LinkEvent {
    Status(ConnectionStatus),
    Message(EngineMessage),
    /// A command was accepted by `send` but the socket write failed later
    CommandFailed { command: &'static str, error: String },
}

struct Channel {
    outbound: mpsc::Sender<Command>,
    events: mpsc::Receiver<LinkEvent>,
    stop: Arc<AtomicBool>,
}

/// WebSocket connection to the generation engine.
///
/// One background thread per connection owns the socket; commands and
/// events cross over `mpsc` channels. Call [`EngineLink::poll`] every tick.
pub struct EngineLink {
    url: String,
    channel: Option<Channel>,
    status: ConnectionStatus,
    /// Events produced locally (e.g. by `disconnect`) ahead of the next poll
    pending: Vec<LinkEvent>,
}

impl EngineLink {
    pub fn new(url: impl Into<String>) -> Self {
        EngineLink {
            url: url.into(),
            channel: None,
            status: ConnectionStatus::Disconnected,
            pending: Vec::new(),
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// Start connecting in the background. No-op if already connected or
    /// connecting.
    pub fn connect(&mut self) {
        if self.channel.is_some() {
            return;
        }
        let (out_tx, out_rx) = mpsc::channel();
        let (ev_tx, ev_rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let url = self.url.clone();
        let thread_stop = Arc::clone(&stop);
        thread::spawn(move || run_link(&url, out_rx, ev_tx, thread_stop));
        self.channel = Some(Channel {
            outbound: out_tx,
            events: ev_rx,
            stop,
        });
        info!("connecting to {}", self.url);
    }

    /// Close the connection (or cancel a pending one). The `Disconnected`
    /// status is delivered by the next `poll`.
    pub fn disconnect(&mut self) {
        if let Some(channel) = self.channel.take() {
            channel.stop.store(true, Ordering::Relaxed);
            info!("disconnecting from {}", self.url);
            self.pending
                .push(LinkEvent::Status(ConnectionStatus::Disconnected));
        }
    }

    /// Non-blocking poll for pending link events, in arrival order.
    pub fn poll(&mut self) -> Vec<LinkEvent> {
        let mut events = std::mem::take(&mut self.pending);
        let mut closed = false;
        if let Some(channel) = &self.channel {
            loop {
                match channel.events.try_recv() {
                    Ok(evt) => events.push(evt),
                    Err(mpsc::TryRecvError::Empty) => break,
                    Err(mpsc::TryRecvError::Disconnected) => {
                        closed = true;
                        break;
                    }
                }
            }
        }
        if closed {
            // Thread is gone; make sure the last word is "disconnected".
            self.channel = None;
            let already = matches!(
                events.last(),
                Some(LinkEvent::Status(ConnectionStatus::Disconnected))
            );
            if !already {
                events.push(LinkEvent::Status(ConnectionStatus::Disconnected));
            }
        }
        for evt in &events {
            if let LinkEvent::Status(status) = evt {
                self.status = *status;
            }
        }
        events
    }
}

impl Drop for EngineLink {
    fn drop(&mut self) {
        if let Some(channel) = &self.channel {
            channel.stop.store(true, Ordering::Relaxed);
        }
    }
}

impl CommandSink for EngineLink {
    fn send(&mut self, command: &Command) -> Result<(), TransportError> {
        if !self.status.is_ready() {
            return Err(TransportError::NotConnected);
        }
        let channel = self.channel.as_ref().ok_or(TransportError::NotConnected)?;
        channel
            .outbound
            .send(command.clone())
            .map_err(|_| TransportError::Closed)
    }
}

/// Parse one inbound text frame
pub fn decode_message(text: &str) -> Result<EngineMessage, serde_json::Error> {
    serde_json::from_str(text)
}

fn is_timeout(err: &tungstenite::Error) -> bool {
    matches!(
        err,
        tungstenite::Error::Io(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
    )
}

fn run_link(
    url: &str,
    outbound: mpsc::Receiver<Command>,
    events: mpsc::Sender<LinkEvent>,
    stop: Arc<AtomicBool>,
) {
    let _ = events.send(LinkEvent::Status(ConnectionStatus::Connecting));

    let mut socket = match tungstenite::connect(url) {
        Ok((socket, _response)) => socket,
        Err(e) => {
            error!("could not connect to {}: {}", url, e);
            let _ = events.send(LinkEvent::Status(ConnectionStatus::Disconnected));
            return;
        }
    };
    if let MaybeTlsStream::Plain(stream) = socket.get_ref()
        && let Err(e) = stream.set_read_timeout(Some(POLL_INTERVAL))
    {
        warn!("could not set read timeout: {}", e);
    }
    if stop.load(Ordering::Relaxed) {
        let _ = socket.close(None);
        return;
    }
    info!("connected to {}", url);
    let _ = events.send(LinkEvent::Status(ConnectionStatus::Ready));

    loop {
        if stop.load(Ordering::Relaxed) {
            let _ = socket.close(None);
            let _ = socket.flush();
            break;
        }

        while let Ok(command) = outbound.try_recv() {
            debug!("-> {}", command.to_json());
            if let Err(e) = socket.send(Message::Text(command.to_json())) {
                error!("failed to send {}: {}", command.name(), e);
                let _ = events.send(LinkEvent::CommandFailed {
                    command: command.name(),
                    error: e.to_string(),
                });
            }
        }

        match socket.read() {
            Ok(Message::Text(text)) => match decode_message(&text) {
                Ok(message) => {
                    if events.send(LinkEvent::Message(message)).is_err() {
                        // Receiver dropped: nobody is listening any more.
                        let _ = socket.close(None);
                        break;
                    }
                }
                Err(e) => warn!("dropping unreadable engine message: {}", e),
            },
            Ok(Message::Close(frame)) => {
                info!("engine closed the connection: {:?}", frame);
                break;
            }
            Ok(_) => {}
            Err(e) if is_timeout(&e) => {}
            Err(e) => {
                warn!("engine link error: {}", e);
                break;
            }
        }
    }

    let _ = events.send(LinkEvent::Status(ConnectionStatus::Disconnected));
}
