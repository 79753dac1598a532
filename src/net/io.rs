//! I/O 支持：网定义的 JSON 与 RON 序列化接口。
use std::fs;
use std::path::Path;

use ron::ser::PrettyConfig;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::net::core::Net;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("ron error: {0}")]
    Ron(#[from] ron::Error),
    #[error("ron parse error: {0}")]
    RonParse(#[from] ron::error::SpannedError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("net is malformed: incidence matrices do not match its places and transitions")]
    Malformed,
}

/// On-disk encodings understood by [`read_net`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Ron,
}

impl Format {
    /// Picks the encoding from a file extension, defaulting to JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("ron") => Format::Ron,
            _ => Format::Json,
        }
    }
}

pub fn to_json_string<T: Serialize>(value: &T) -> Result<String, IoError> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn from_json_str<T: DeserializeOwned>(s: &str) -> Result<T, IoError> {
    Ok(serde_json::from_str(s)?)
}

pub fn to_ron_string<T: Serialize>(value: &T) -> Result<String, IoError> {
    let pretty = PrettyConfig::default().new_line("\n".to_string());
    Ok(ron::ser::to_string_pretty(value, pretty)?)
}

pub fn from_ron_str<T: DeserializeOwned>(s: &str) -> Result<T, IoError> {
    Ok(ron::from_str(s)?)
}

pub fn write_net<P: AsRef<Path>>(path: P, net: &Net, format: Format) -> Result<(), IoError> {
    let content = match format {
        Format::Json => to_json_string(net)?,
        Format::Ron => to_ron_string(net)?,
    };
    fs::write(path, content)?;
    Ok(())
}

/// Reads a net and rejects one whose matrices disagree with its place and
/// transition lists.
pub fn read_net<P: AsRef<Path>>(path: P, format: Format) -> Result<Net, IoError> {
    let content = fs::read_to_string(path)?;
    let net: Net = match format {
        Format::Json => from_json_str(&content)?,
        Format::Ron => from_ron_str(&content)?,
    };
    if !net.is_well_formed() {
        return Err(IoError::Malformed);
    }
    Ok(net)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::structure::{Place, Transition};

    fn sample() -> Net {
        let mut net = Net::empty();
        let p = net.add_place(Place::new("p", 2));
        let t = net.add_transition(Transition::new("t"));
        net.set_input_weight(p, t, 1);
        net
    }

    #[test]
    fn json_and_ron_preserve_the_net() {
        let net = sample();

        let json: Net = from_json_str(&to_json_string(&net).unwrap()).unwrap();
        let ron: Net = from_ron_str(&to_ron_string(&net).unwrap()).unwrap();

        for decoded in [json, ron] {
            assert_eq!(decoded.places, net.places);
            assert_eq!(decoded.pre, net.pre);
            assert_eq!(decoded.initial_marking(), net.initial_marking());
        }
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(Format::from_path(Path::new("net.RON")), Format::Ron);
        assert_eq!(Format::from_path(Path::new("net.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("net")), Format::Json);
    }
}
