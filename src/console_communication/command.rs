//! Command strings: splitting, addressee lists and the verb tables of both roles.
//!
//! Parsers return `None` for anything malformed (wrong argument count, non-numeric
//! component, forbidden config name). Callers drop such commands whole; the channel has
//! no way to report a rejection back to the sender.

use crate::flight_control::common::Vec3D;

/// Character separating the verb from its arguments inside one command string.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CommandSeparator {
    Semicolon,
    Whitespace,
}

impl CommandSeparator {
    pub fn from_space_flag(space_separators: bool) -> Self {
        if space_separators { CommandSeparator::Whitespace } else { CommandSeparator::Semicolon }
    }

    pub fn as_char(self) -> char {
        match self {
            CommandSeparator::Semicolon => ';',
            CommandSeparator::Whitespace => ' ',
        }
    }

    /// Splits a command into tokens.
    ///
    /// The semicolon form keeps empty tokens so `setoffset;;5;` can leave components
    /// blank. The whitespace form collapses runs of whitespace.
    pub fn split(self, input: &str) -> Vec<String> {
        let input = input.trim();
        if input.is_empty() {
            return Vec::new();
        }
        match self {
            CommandSeparator::Semicolon => input.split(';').map(|t| t.trim().to_string()).collect(),
            CommandSeparator::Whitespace => input.split_whitespace().map(str::to_string).collect(),
        }
    }

    /// Config names may not contain whitespace (it separates the fields of a stored
    /// config line) nor the active separator.
    pub fn is_valid_name(self, name: &str) -> bool {
        !name.is_empty() && !name.contains(char::is_whitespace) && !name.contains(self.as_char())
    }
}

/// Receivers a broadcast command is meant for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Addressees {
    All,
    Only(Vec<String>),
}

impl Addressees {
    /// Parses a `;`-delimited addressee list; an empty list addresses everyone.
    pub fn parse(list: &str) -> Self {
        let ids: Vec<String> =
            list.split(';').map(str::trim).filter(|id| !id.is_empty()).map(str::to_string).collect();
        if ids.is_empty() { Addressees::All } else { Addressees::Only(ids) }
    }

    pub fn includes(&self, id: &str) -> bool {
        match self {
            Addressees::All => true,
            Addressees::Only(ids) => ids.iter().any(|candidate| candidate == id),
        }
    }
}

/// Verbs understood by a follower.
#[derive(Debug, Clone, PartialEq)]
pub enum FollowerCommand {
    /// Overwrites the offset components that are `Some`.
    SetOffset([Option<f64>; 3]),
    AddOffset(Vec3D<f64>),
    Stop,
    Start,
    StartHere,
    Reset,
    /// Stores the offset under the given name, or the current config when `None`.
    Save(Option<String>),
    SaveHere(Option<String>),
    Load(String),
    Action(String),
    Clear,
}

impl FollowerCommand {
    pub fn parse(args: &[String], separator: CommandSeparator) -> Option<Self> {
        let (verb, rest) = args.split_first()?;
        let command = match verb.as_str() {
            "setoffset" => {
                let [x, y, z] = three(rest)?;
                FollowerCommand::SetOffset([
                    parse_optional_component(x)?,
                    parse_optional_component(y)?,
                    parse_optional_component(z)?,
                ])
            }
            "addoffset" => {
                let [x, y, z] = three(rest)?;
                FollowerCommand::AddOffset(Vec3D::new(
                    parse_component(x)?,
                    parse_component(y)?,
                    parse_component(z)?,
                ))
            }
            "stop" => FollowerCommand::Stop,
            "start" => FollowerCommand::Start,
            "starthere" => FollowerCommand::StartHere,
            "reset" => FollowerCommand::Reset,
            "save" => FollowerCommand::Save(config_name(rest, separator)?),
            "savehere" => FollowerCommand::SaveHere(config_name(rest, separator)?),
            "load" => FollowerCommand::Load(non_empty(rest.first()?)?),
            "action" => FollowerCommand::Action(non_empty(rest.first()?)?),
            "clear" => FollowerCommand::Clear,
            _ => return None,
        };
        Some(command)
    }
}

/// Verbs the leader handles itself.
#[derive(Debug, Clone, PartialEq)]
pub enum LeaderCommand {
    Stop,
    Start,
    Reset,
    Scan,
    Find(String),
}

/// What the leader does with one line of console input.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleInput {
    /// `<addressees>:<payload>`, forwarded as a broadcast.
    Addressed { addressees: String, payload: String },
    Local(LeaderCommand),
    /// An unknown bare verb, relayed verbatim to all followers.
    Relay(String),
}

impl ConsoleInput {
    pub fn parse(argument: &str, separator: CommandSeparator) -> Option<Self> {
        if argument.trim().is_empty() {
            return None;
        }
        if let Some((addressees, payload)) = argument.split_once(':') {
            return Some(ConsoleInput::Addressed {
                addressees: addressees.to_string(),
                payload: payload.to_string(),
            });
        }

        let args = separator.split(argument);
        let (verb, rest) = args.split_first()?;
        let command = match verb.as_str() {
            "stop" => LeaderCommand::Stop,
            "start" => LeaderCommand::Start,
            "reset" => LeaderCommand::Reset,
            "scan" => LeaderCommand::Scan,
            "find" => LeaderCommand::Find(non_empty(rest.first()?)?),
            _ => return Some(ConsoleInput::Relay(argument.to_string())),
        };
        Some(ConsoleInput::Local(command))
    }
}

fn three(rest: &[String]) -> Option<[&String; 3]> {
    match rest {
        [x, y, z] => Some([x, y, z]),
        _ => None,
    }
}

fn parse_component(token: &str) -> Option<f64> {
    token.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// `Some(None)` for a blank token, `None` for an unparsable one.
fn parse_optional_component(token: &str) -> Option<Option<f64>> {
    if token.trim().is_empty() { Some(None) } else { parse_component(token).map(Some) }
}

fn non_empty(token: &str) -> Option<String> {
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Optional config name argument: absent or blank selects the current config.
fn config_name(rest: &[String], separator: CommandSeparator) -> Option<Option<String>> {
    match rest.first().map(|name| name.trim()) {
        None | Some("") => Some(None),
        Some(name) if separator.is_valid_name(name) => Some(Some(name.to_string())),
        Some(_) => None,
    }
}
