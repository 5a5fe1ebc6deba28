/// The commands a server session recognizes by name
#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub enum SessionCommand {
    Connect,
    CreateStream,
    Publish,
    Play,
    FcPublish,
    ReleaseStream,
    FcUnpublish,
    DeleteStream,
}

impl SessionCommand {
    pub fn from_name(name: &str) -> Option<SessionCommand> {
        match name {
            "connect" => Some(SessionCommand::Connect),
            "createStream" => Some(SessionCommand::CreateStream),
            "publish" => Some(SessionCommand::Publish),
            "play" => Some(SessionCommand::Play),
            "FCPublish" => Some(SessionCommand::FcPublish),
            "releaseStream" => Some(SessionCommand::ReleaseStream),
            "FCUnpublish" => Some(SessionCommand::FcUnpublish),
            "deleteStream" => Some(SessionCommand::DeleteStream),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SessionCommand::Connect => "connect",
            SessionCommand::CreateStream => "createStream",
            SessionCommand::Publish => "publish",
            SessionCommand::Play => "play",
            SessionCommand::FcPublish => "FCPublish",
            SessionCommand::ReleaseStream => "releaseStream",
            SessionCommand::FcUnpublish => "FCUnpublish",
            SessionCommand::DeleteStream => "deleteStream",
        }
    }
}
