/// What the client negotiated to do with its stream
#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub enum StreamRole {
    Publisher,
    Player,
}

/// How far negotiation has progressed.  Each state is only left in the forward direction.
#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub enum SessionState {
    AwaitingConnect,
    Connected,
    StreamCreated,
    Negotiated(StreamRole),
}
