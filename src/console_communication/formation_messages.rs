#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Vector3 {
    #[prost(double, tag = "1")]
    pub x: f64,
    #[prost(double, tag = "2")]
    pub y: f64,
    #[prost(double, tag = "3")]
    pub z: f64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PoseEnvelope {
    #[prost(oneof = "PoseShape", tags = "1, 2")]
    pub shape: Option<PoseShape>,
}

/// Pose broadcast by a leader that identifies itself.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FramedPose {
    #[prost(double, repeated, tag = "1")]
    pub matrix: Vec<f64>,
    #[prost(message, optional, tag = "2")]
    pub velocity: Option<Vector3>,
    #[prost(int64, tag = "3")]
    pub source: i64,
}

/// Pose without a source id, as sent by older leaders.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LegacyPose {
    #[prost(double, repeated, tag = "1")]
    pub matrix: Vec<f64>,
    #[prost(message, optional, tag = "2")]
    pub velocity: Option<Vector3>,
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum PoseShape {
    #[prost(message, tag = "1")]
    Framed(FramedPose),
    #[prost(message, tag = "2")]
    Legacy(LegacyPose),
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CommandEnvelope {
    #[prost(oneof = "CommandShape", tags = "1, 2")]
    pub shape: Option<CommandShape>,
}

/// Addressee list plus the already split argument tokens.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TokenCommand {
    #[prost(string, tag = "1")]
    pub addressees: String,
    #[prost(string, repeated, tag = "2")]
    pub args: Vec<String>,
}

/// Addressee list plus one `;`-joined payload string, as sent by older leaders.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawCommand {
    #[prost(string, tag = "1")]
    pub addressees: String,
    #[prost(string, tag = "2")]
    pub payload: String,
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum CommandShape {
    #[prost(message, tag = "1")]
    Tokens(TokenCommand),
    #[prost(message, tag = "2")]
    Raw(RawCommand),
}
