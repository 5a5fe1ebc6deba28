/// The type of publishing being performed or requested
#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub enum PublishMode {
    /// Live data is being published without recording it in a file
    Live,

    /// The stream is intended to be published to a file
    Record,

    /// The stream is published and the data is intended to be appended to a file
    Append,
}

impl PublishMode {
    pub fn from_name(name: &str) -> Option<PublishMode> {
        match name {
            "live" => Some(PublishMode::Live),
            "record" => Some(PublishMode::Record),
            "append" => Some(PublishMode::Append),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PublishMode::Live => "live",
            PublishMode::Record => "record",
            PublishMode::Append => "append",
        }
    }
}

impl Default for PublishMode {
    fn default() -> Self {
        PublishMode::Live
    }
}
