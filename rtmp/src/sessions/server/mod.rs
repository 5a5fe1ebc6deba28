mod command;
mod config;
mod errors;
mod events;
mod info;
mod publish_mode;
mod state;


use self::command::SessionCommand;
use crate::connection::{Connection, InboundMessage};
use crate::handshake::{Handshake, HandshakeStage};
use crate::messages::{PeerBandwidthLimitType, RtmpMessage};
use crate::transport::Socket;
use rtmp_ingest_amf0::{Amf0Object, Amf0Value, ObjectEncoding};

pub use self::config::ServerSessionConfig;
pub use self::errors::{RequestError, ServerSessionError};
pub use self::events::{SessionEvent, SessionObserver, TracingObserver};
pub use self::info::{ConnectInfo, PlayInfo, PublishInfo, SessionInfo};
pub use self::publish_mode::PublishMode;
pub use self::state::{SessionState, StreamRole};

/// The server side of a single RTMP connection, from the handshake until the client has either
/// started publishing or asked to play a stream.
///
/// The session owns the connection and drives it synchronously: every call blocks on the
/// underlying socket.  Protocol control messages are handled by the connection itself, so the
/// session only ever sees command messages, which it answers in the order they arrive.
///
/// Once negotiation completes the connection can be taken back with `into_connection()` and
/// handed to whatever relays the media that follows.
///
/// Any error ends the session.  `serve()` closes the connection before returning one, since
/// the only recovery RTMP offers is for the client to reconnect.
pub struct ServerSession<S: Socket, O: SessionObserver = TracingObserver> {
    connection: Connection<S>,
    handshake: Handshake,
    config: ServerSessionConfig,
    state: SessionState,
    info: SessionInfo,
    observer: O,
}

impl<S: Socket> ServerSession<S, TracingObserver> {
    /// Creates a session that reports its events through `tracing`
    pub fn new(socket: S, config: ServerSessionConfig) -> Self {
        ServerSession::with_observer(socket, config, TracingObserver)
    }
}

impl<S: Socket, O: SessionObserver> ServerSession<S, O> {
    pub fn with_observer(socket: S, config: ServerSessionConfig, observer: O) -> Self {
        ServerSession {
            connection: Connection::new(socket),
            handshake: Handshake::new(),
            config,
            state: SessionState::AwaitingConnect,
            info: SessionInfo::default(),
            observer,
        }
    }

    /// Performs the handshake and negotiates until the client publishes or plays.
    ///
    /// On failure the observer is told about the error and the connection is closed before the
    /// error is returned.
    pub fn serve(&mut self) -> Result<StreamRole, ServerSessionError> {
        let result = match self.handshake() {
            Ok(()) => self.negotiate(),
            Err(error) => Err(error),
        };

        if let Err(error) = &result {
            self.observer.on_event(&SessionEvent::ErrorRaised {
                message: error.to_string(),
            });

            if let Err(close_error) = self.connection.close() {
                tracing::debug!(error = %close_error, "Failed to close connection");
            }
        }

        result
    }

    pub fn handshake(&mut self) -> Result<(), ServerSessionError> {
        if let Err(error) = self.handshake.perform(self.connection.channel_mut()) {
            tracing::debug!(stage = ?self.handshake.stage(), "Handshake failed");
            return Err(error.into());
        }

        self.observer.on_event(&SessionEvent::HandshakeCompleted);
        Ok(())
    }

    /// Processes messages until the client has either published or started playing
    pub fn negotiate(&mut self) -> Result<StreamRole, ServerSessionError> {
        loop {
            if let SessionState::Negotiated(role) = self.state {
                return Ok(role);
            }

            self.process_next_message()?;
        }
    }

    /// Reads and handles a single message.  Anything other than a command is logged and
    /// dropped.
    pub fn process_next_message(&mut self) -> Result<(), ServerSessionError> {
        let inbound = self.connection.read_message()?;
        match inbound.payload.to_rtmp_message()? {
            RtmpMessage::Command { encoding, values } => self.handle_command(&inbound, encoding, values),
            other => {
                tracing::trace!(
                    type_id = other.get_message_type_id(),
                    stream_id = inbound.payload.message_stream_id,
                    "Ignoring non-command message"
                );

                Ok(())
            }
        }
    }

    pub fn info(&self) -> &SessionInfo {
        &self.info
    }

    pub fn handshake_stage(&self) -> HandshakeStage {
        self.handshake.stage()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_publisher(&self) -> bool {
        self.info.is_publisher
    }

    pub fn connection(&self) -> &Connection<S> {
        &self.connection
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_connection(self) -> Connection<S> {
        self.connection
    }

    fn handle_command(
        &mut self,
        inbound: &InboundMessage,
        encoding: ObjectEncoding,
        values: Vec<Amf0Value>,
    ) -> Result<(), ServerSessionError> {
        let mut values = values.into_iter();
        let name = match values.next() {
            Some(Amf0Value::Utf8String(name)) => name,
            Some(value) => return Err(RequestError::UnexpectedCommandNameType { value }.into()),
            None => return Err(RequestError::MissingCommandName.into()),
        };

        let transaction_id = match values.next() {
            Some(Amf0Value::Number(number)) => Some(number),
            _ => None,
        };

        let command_object = values.next().unwrap_or(Amf0Value::Null);
        let arguments: Vec<Amf0Value> = values.collect();

        self.observer.on_event(&SessionEvent::CommandReceived {
            command: name.clone(),
            transaction_id: transaction_id.unwrap_or_default(),
            stream_id: inbound.payload.message_stream_id,
        });

        tracing::trace!(command = %name, encoding = ?encoding, "Dispatching command");

        let responder = Responder {
            csid: inbound.csid,
            stream_id: inbound.payload.message_stream_id,
        };

        match SessionCommand::from_name(&name) {
            Some(SessionCommand::Connect) => self.handle_connect(responder, transaction_id, command_object),
            Some(SessionCommand::CreateStream) => self.handle_create_stream(responder, transaction_id),
            Some(SessionCommand::Publish) => self.handle_publish(responder, transaction_id, arguments),
            Some(SessionCommand::Play) => self.handle_play(responder, transaction_id, arguments),
            Some(SessionCommand::FcPublish) | Some(SessionCommand::ReleaseStream) => Ok(()),
            Some(SessionCommand::FcUnpublish) | Some(SessionCommand::DeleteStream) => {
                tracing::debug!(command = %name, "Ignoring command");
                Ok(())
            }

            None => {
                self.observer.on_event(&SessionEvent::UnsupportedCommand { name });
                Ok(())
            }
        }
    }

    fn handle_connect(
        &mut self,
        responder: Responder,
        transaction_id: Option<f64>,
        command_object: Amf0Value,
    ) -> Result<(), ServerSessionError> {
        if self.state != SessionState::AwaitingConnect {
            return Err(RequestError::AlreadyConnected.into());
        }

        let transaction_id = match transaction_id {
            Some(id) if id == 1.0 => id,
            received => return Err(RequestError::InvalidTransactionId { received }.into()),
        };

        let connect_info = match command_object {
            Amf0Value::Object(properties) => ConnectInfo::from_properties(&properties),
            _ => ConnectInfo::default(),
        };

        let object_encoding = connect_info.object_encoding;
        self.info.transaction_id = transaction_id;
        self.info.connect_info = Some(connect_info);

        self.connection.send_window_ack_size(self.config.window_ack_size)?;
        self.connection
            .send_set_peer_bandwidth(self.config.peer_bandwidth, PeerBandwidthLimitType::Dynamic)?;
        self.connection.send_set_chunk_size(self.config.chunk_size)?;

        let mut properties = Amf0Object::new();
        properties.insert("fmsVer".to_string(), self.config.fms_version.clone().into());
        properties.insert("capabilities".to_string(), (self.config.capabilities as f64).into());

        let mut information = status_object("NetConnection.Connect.Success", "Connection succeeded.");
        information.insert("objectEncoding".to_string(), object_encoding.into());

        self.send_response(
            responder,
            "_result",
            vec![
                Amf0Value::Utf8String("_result".to_string()),
                Amf0Value::Number(transaction_id),
                Amf0Value::Object(properties),
                Amf0Value::Object(information),
            ],
        )?;

        self.state = SessionState::Connected;
        Ok(())
    }

    fn handle_create_stream(
        &mut self,
        responder: Responder,
        transaction_id: Option<f64>,
    ) -> Result<(), ServerSessionError> {
        if self.state == SessionState::AwaitingConnect {
            return Err(RequestError::NotConnected {
                command: SessionCommand::CreateStream.name().to_string(),
            }
            .into());
        }

        let transaction_id = transaction_id.unwrap_or_default();
        self.info.transaction_id = transaction_id;

        self.send_response(
            responder,
            "_result",
            vec![
                Amf0Value::Utf8String("_result".to_string()),
                Amf0Value::Number(transaction_id),
                Amf0Value::Null,
                Amf0Value::Number(self.config.stream_id as f64),
            ],
        )?;

        if self.state == SessionState::Connected {
            self.state = SessionState::StreamCreated;
        }

        Ok(())
    }

    fn handle_publish(
        &mut self,
        responder: Responder,
        transaction_id: Option<f64>,
        arguments: Vec<Amf0Value>,
    ) -> Result<(), ServerSessionError> {
        let command = SessionCommand::Publish;
        self.ensure_stream_created(command)?;

        let mut arguments = arguments.into_iter();
        let stream_name = match arguments.next() {
            Some(Amf0Value::Utf8String(name)) => name,
            _ => return Err(missing_stream_name(command)),
        };

        let mode = match arguments.next() {
            Some(Amf0Value::Utf8String(mode)) => match PublishMode::from_name(&mode) {
                Some(mode) => mode,
                None => return Err(RequestError::InvalidPublishMode { mode }.into()),
            },

            _ => PublishMode::default(),
        };

        self.info.transaction_id = transaction_id.unwrap_or_default();
        self.info.publish_info = Some(PublishInfo { stream_name, mode });

        self.send_response(
            responder,
            "onStatus",
            on_status(status_object("NetStream.Publish.Start", "Start publishing.")),
        )?;

        self.info.is_publisher = true;
        self.complete_negotiation(StreamRole::Publisher);
        Ok(())
    }

    fn handle_play(
        &mut self,
        responder: Responder,
        transaction_id: Option<f64>,
        arguments: Vec<Amf0Value>,
    ) -> Result<(), ServerSessionError> {
        let command = SessionCommand::Play;
        self.ensure_stream_created(command)?;

        let stream_name = match arguments.into_iter().next() {
            Some(Amf0Value::Utf8String(name)) => name,
            _ => return Err(missing_stream_name(command)),
        };

        self.info.transaction_id = transaction_id.unwrap_or_default();
        self.info.play_info = Some(PlayInfo { stream_name });

        self.connection.send_stream_begin(self.config.stream_id)?;
        self.send_response(
            responder,
            "onStatus",
            on_status(status_object("NetStream.Play.Start", "Start live.")),
        )?;

        self.info.is_publisher = false;
        self.complete_negotiation(StreamRole::Player);
        Ok(())
    }

    fn ensure_stream_created(&self, command: SessionCommand) -> Result<(), RequestError> {
        let command = command.name().to_string();
        match self.state {
            SessionState::StreamCreated => Ok(()),
            SessionState::AwaitingConnect => Err(RequestError::NotConnected { command }),
            SessionState::Connected => Err(RequestError::NoStreamCreated { command }),
            SessionState::Negotiated(_) => Err(RequestError::AlreadyNegotiated { command }),
        }
    }

    fn complete_negotiation(&mut self, role: StreamRole) {
        self.info.done = true;
        self.state = SessionState::Negotiated(role);
        self.observer.on_event(&SessionEvent::NegotiationCompleted { role });
    }

    /// Writes a command reply where the request came from and flushes everything queued so far
    fn send_response(
        &mut self,
        responder: Responder,
        command: &str,
        values: Vec<Amf0Value>,
    ) -> Result<(), ServerSessionError> {
        let message = RtmpMessage::Command {
            encoding: ObjectEncoding::Amf0,
            values,
        };

        self.connection.send_message(message, responder.csid, responder.stream_id)?;
        self.connection.flush()?;

        self.observer.on_event(&SessionEvent::ResponseSent {
            command: command.to_string(),
            chunk_stream_id: responder.csid,
            stream_id: responder.stream_id,
        });

        Ok(())
    }
}

/// Where the reply to a command goes
#[derive(Clone, Copy)]
struct Responder {
    csid: u32,
    stream_id: u32,
}

fn status_object(code: &str, description: &str) -> Amf0Object {
    let mut properties = Amf0Object::new();
    properties.insert("level".to_string(), "status".into());
    properties.insert("code".to_string(), code.into());
    properties.insert("description".to_string(), description.into());
    properties
}

fn on_status(information: Amf0Object) -> Vec<Amf0Value> {
    vec![
        Amf0Value::Utf8String("onStatus".to_string()),
        Amf0Value::Number(0.0),
        Amf0Value::Null,
        Amf0Value::Object(information),
    ]
}

fn missing_stream_name(command: SessionCommand) -> ServerSessionError {
    RequestError::MissingStreamName {
        command: command.name().to_string(),
    }
    .into()
}
