use super::command::Addressees;
use super::formation_messages::{
    CommandEnvelope, CommandShape, FramedPose, LegacyPose, PoseEnvelope, PoseShape, RawCommand,
    TokenCommand, Vector3,
};
use crate::flight_control::common::{Vec3D, WorldMatrix, WORLD_MATRIX_LEN};
use prost::Message;
use strum_macros::Display;

/// Reference frame broadcast by the leader once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseFrame {
    pub matrix: WorldMatrix,
    pub velocity: Vec3D<f64>,
    /// Grid identity of the sender.
    pub source: i64,
}

/// A decoded pose broadcast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LeaderUpdate {
    Framed(PoseFrame),
    /// Legacy shape without a source id; never treated as a self-loop.
    Anonymous { matrix: WorldMatrix, velocity: Vec3D<f64> },
}

/// A decoded command broadcast.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedCommand {
    pub addressees: Addressees,
    pub args: Vec<String>,
}

#[derive(Debug, Display)]
pub enum CodecError {
    Decode(prost::DecodeError),
    MissingShape,
    MatrixShape(usize),
}

impl std::error::Error for CodecError {}

impl From<prost::DecodeError> for CodecError {
    fn from(value: prost::DecodeError) -> Self { CodecError::Decode(value) }
}

impl From<Vec3D<f64>> for Vector3 {
    fn from(value: Vec3D<f64>) -> Self { Self { x: value.x(), y: value.y(), z: value.z() } }
}

impl From<Vector3> for Vec3D<f64> {
    fn from(value: Vector3) -> Self { Vec3D::new(value.x, value.y, value.z) }
}

pub fn encode_pose(frame: &PoseFrame) -> Vec<u8> {
    PoseEnvelope {
        shape: Some(PoseShape::Framed(FramedPose {
            matrix: frame.matrix.to_array().to_vec(),
            velocity: Some(frame.velocity.into()),
            source: frame.source,
        })),
    }
    .encode_to_vec()
}

pub fn encode_legacy_pose(matrix: &WorldMatrix, velocity: Vec3D<f64>) -> Vec<u8> {
    PoseEnvelope {
        shape: Some(PoseShape::Legacy(LegacyPose {
            matrix: matrix.to_array().to_vec(),
            velocity: Some(velocity.into()),
        })),
    }
    .encode_to_vec()
}

pub fn decode_pose(bytes: &[u8]) -> Result<LeaderUpdate, CodecError> {
    match PoseEnvelope::decode(bytes)?.shape {
        Some(PoseShape::Framed(pose)) => Ok(LeaderUpdate::Framed(PoseFrame {
            matrix: decode_matrix(&pose.matrix)?,
            velocity: pose.velocity.map(Vec3D::from).unwrap_or_default(),
            source: pose.source,
        })),
        Some(PoseShape::Legacy(pose)) => Ok(LeaderUpdate::Anonymous {
            matrix: decode_matrix(&pose.matrix)?,
            velocity: pose.velocity.map(Vec3D::from).unwrap_or_default(),
        }),
        None => Err(CodecError::MissingShape),
    }
}

pub fn encode_command(addressees: &str, args: &[String]) -> Vec<u8> {
    CommandEnvelope {
        shape: Some(CommandShape::Tokens(TokenCommand {
            addressees: addressees.to_string(),
            args: args.to_vec(),
        })),
    }
    .encode_to_vec()
}

pub fn encode_raw_command(addressees: &str, payload: &str) -> Vec<u8> {
    CommandEnvelope {
        shape: Some(CommandShape::Raw(RawCommand {
            addressees: addressees.to_string(),
            payload: payload.to_string(),
        })),
    }
    .encode_to_vec()
}

/// Decodes a command broadcast. The raw shape is split on `;` with empty tokens dropped.
pub fn decode_command(bytes: &[u8]) -> Result<RoutedCommand, CodecError> {
    match CommandEnvelope::decode(bytes)?.shape {
        Some(CommandShape::Tokens(cmd)) => Ok(RoutedCommand {
            addressees: Addressees::parse(&cmd.addressees),
            args: cmd.args,
        }),
        Some(CommandShape::Raw(cmd)) => Ok(RoutedCommand {
            addressees: Addressees::parse(&cmd.addressees),
            args: cmd
                .payload
                .split(';')
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect(),
        }),
        None => Err(CodecError::MissingShape),
    }
}

fn decode_matrix(values: &[f64]) -> Result<WorldMatrix, CodecError> {
    let array: &[f64; WORLD_MATRIX_LEN] =
        values.try_into().map_err(|_| CodecError::MatrixShape(values.len()))?;
    Ok(WorldMatrix::from_array(array))
}
