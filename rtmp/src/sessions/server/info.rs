use super::PublishMode;
use rtmp_ingest_amf0::{Amf0Object, Amf0Value};

/// What the client said about itself when connecting
#[derive(Debug, PartialEq, Clone, Default)]
pub struct ConnectInfo {
    /// The RTMP application, without any trailing slash
    pub app: String,
    pub flash_version: String,
    pub tc_url: String,
    pub object_encoding: f64,
}

impl ConnectInfo {
    /// Missing or mistyped properties are left at their defaults
    pub fn from_properties(properties: &Amf0Object) -> ConnectInfo {
        let text = |key: &str| {
            properties
                .get(key)
                .and_then(Amf0Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let mut app = text("app");
        if app.ends_with('/') {
            app.pop();
        }

        let object_encoding = match properties.get("objectEncoding") {
            Some(Amf0Value::Number(number)) => *number,
            _ => 0.0,
        };

        ConnectInfo {
            app,
            flash_version: text("flashVer"),
            tc_url: text("tcUrl"),
            object_encoding,
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct PublishInfo {
    pub stream_name: String,
    pub mode: PublishMode,
}

#[derive(Debug, PartialEq, Clone)]
pub struct PlayInfo {
    pub stream_name: String,
}

/// Everything negotiated over the course of a server session
#[derive(Debug, PartialEq, Clone, Default)]
pub struct SessionInfo {
    /// Transaction id of the last command that carried one
    pub transaction_id: f64,
    pub connect_info: Option<ConnectInfo>,
    pub publish_info: Option<PublishInfo>,
    pub play_info: Option<PlayInfo>,
    pub is_publisher: bool,

    /// Set once the client has published or started playing
    pub done: bool,
}

impl SessionInfo {
    pub fn stream_name(&self) -> Option<&str> {
        match (&self.publish_info, &self.play_info) {
            (Some(publish), _) => Some(&publish.stream_name),
            (None, Some(play)) => Some(&play.stream_name),
            (None, None) => None,
        }
    }

    /// The connect url joined with the stream name, e.g. `rtmp://host/live/mystream`
    pub fn stream_url(&self) -> Option<String> {
        let connect_info = self.connect_info.as_ref()?;
        let stream_name = self.stream_name()?;
        Some(format!("{}/{}", connect_info.tc_url, stream_name))
    }
}
