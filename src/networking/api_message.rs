use serde::Serialize;
use std::convert::TryInto;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::networking::error::{NetworkError, Result};

/// Width of the command name field.
pub const COMMAND_LENGTH: usize = 12;
/// Command name plus the two length fields.
pub const HEADER_SIZE: usize = COMMAND_LENGTH + 4 + 4;

/// Upper bound of payload plus extra accepted by `read_envelope`.
pub const MAX_ENVELOPE_DATA_SIZE: usize = 64 * 1024 * 1024;

pub const RESPONSE_STATUS_SUCCESS: u8 = 1;
pub const RESPONSE_STATUS_FAILURE: u8 = 0;

/// A framed request. See the module docs of `networking` for the layout.
#[derive(Debug, PartialEq, Clone)]
pub struct CommandEnvelope {
    pub command_name: [u8; COMMAND_LENGTH],
    pub payload: Vec<u8>,
    pub extra: Vec<u8>,
}

/// Pads a command name to the fixed width of the envelope.
pub fn command_to_bytes(command: &str) -> Result<[u8; COMMAND_LENGTH]> {
    let bytes = command.as_bytes();
    if bytes.is_empty() || bytes.len() > COMMAND_LENGTH {
        return Err(NetworkError::MalformedEnvelope(format!(
            "command name {:?} does not fit in {} bytes",
            command, COMMAND_LENGTH
        )));
    }
    let mut command_name = [0u8; COMMAND_LENGTH];
    command_name[..bytes.len()].copy_from_slice(bytes);
    Ok(command_name)
}

/// Reverse of `command_to_bytes`, trailing zero padding is dropped.
pub fn bytes_to_command(bytes: &[u8]) -> String {
    let end = bytes
        .iter()
        .rposition(|byte| *byte != 0)
        .map_or(0, |pos| pos + 1);
    String::from_utf8_lossy(&bytes[..end]).to_string()
}

impl CommandEnvelope {
    pub fn new(command: &str, payload: Vec<u8>, extra: Vec<u8>) -> Result<CommandEnvelope> {
        Ok(CommandEnvelope {
            command_name: command_to_bytes(command)?,
            payload,
            extra,
        })
    }
    pub fn command_name(&self) -> &[u8; COMMAND_LENGTH] {
        &self.command_name
    }
    pub fn command_name_as_str(&self) -> String {
        bytes_to_command(&self.command_name)
    }
    pub fn payload(&self) -> &Vec<u8> {
        &self.payload
    }
    pub fn extra(&self) -> &Vec<u8> {
        &self.extra
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut vbytes: Vec<u8> =
            Vec::with_capacity(HEADER_SIZE + self.payload.len() + self.extra.len());
        vbytes.extend(&self.command_name);
        vbytes.extend(&(self.payload.len() as u32).to_le_bytes());
        vbytes.extend(&(self.extra.len() as u32).to_le_bytes());
        vbytes.extend(&self.payload);
        if !self.extra.is_empty() {
            vbytes.extend(&self.extra);
        }
        vbytes
    }

    pub fn deserialize(bytes: &[u8]) -> Result<CommandEnvelope> {
        let (command_name, payload_length, extra_length) = parse_header(bytes)?;
        let payload_end = HEADER_SIZE + payload_length;
        let extra_end = payload_end + extra_length;
        if bytes.len() < extra_end {
            return Err(NetworkError::MalformedEnvelope(format!(
                "envelope declares {} bytes of data but only {} are present",
                payload_length + extra_length,
                bytes.len() - HEADER_SIZE
            )));
        }
        Ok(CommandEnvelope {
            command_name,
            payload: bytes[HEADER_SIZE..payload_end].to_vec(),
            extra: bytes[payload_end..extra_end].to_vec(),
        })
    }
}

fn parse_header(bytes: &[u8]) -> Result<([u8; COMMAND_LENGTH], usize, usize)> {
    if bytes.len() < HEADER_SIZE {
        return Err(NetworkError::MalformedEnvelope(format!(
            "got {} bytes, header needs {}",
            bytes.len(),
            HEADER_SIZE
        )));
    }
    let command_name: [u8; COMMAND_LENGTH] = bytes[0..COMMAND_LENGTH]
        .try_into()
        .map_err(|_| NetworkError::MalformedEnvelope(String::from("command name")))?;
    let payload_length = u32::from_le_bytes(
        bytes[COMMAND_LENGTH..COMMAND_LENGTH + 4]
            .try_into()
            .map_err(|_| NetworkError::MalformedEnvelope(String::from("payload length")))?,
    );
    let extra_length = u32::from_le_bytes(
        bytes[COMMAND_LENGTH + 4..HEADER_SIZE]
            .try_into()
            .map_err(|_| NetworkError::MalformedEnvelope(String::from("extra length")))?,
    );
    Ok((command_name, payload_length as usize, extra_length as usize))
}

/// Reads exactly one envelope from a stream. The lengths in the header tell
/// how much to read, so the stream can stay open for the response.
pub async fn read_envelope<R>(reader: &mut R) -> Result<CommandEnvelope>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; HEADER_SIZE];
    reader
        .read_exact(&mut header)
        .await
        .map_err(|err| NetworkError::MalformedEnvelope(err.to_string()))?;
    let (command_name, payload_length, extra_length) = parse_header(&header)?;
    if payload_length + extra_length > MAX_ENVELOPE_DATA_SIZE {
        return Err(NetworkError::MalformedEnvelope(format!(
            "envelope declares {} bytes of data, the limit is {}",
            payload_length + extra_length,
            MAX_ENVELOPE_DATA_SIZE
        )));
    }

    let mut payload = vec![0u8; payload_length];
    let mut extra = vec![0u8; extra_length];
    reader
        .read_exact(&mut payload)
        .await
        .map_err(|err| NetworkError::MalformedEnvelope(err.to_string()))?;
    reader
        .read_exact(&mut extra)
        .await
        .map_err(|err| NetworkError::MalformedEnvelope(err.to_string()))?;

    Ok(CommandEnvelope {
        command_name,
        payload,
        extra,
    })
}

/// What a peer writes back on a wait-response request.
#[derive(Debug, PartialEq, Clone)]
pub struct ResponseEnvelope {
    pub status: u8,
    pub body: Vec<u8>,
}

impl ResponseEnvelope {
    pub fn success<T: Serialize>(value: &T) -> Result<ResponseEnvelope> {
        Ok(ResponseEnvelope {
            status: RESPONSE_STATUS_SUCCESS,
            body: bincode::serialize(value)?,
        })
    }

    /// A success with nothing to return, e.g. the answer to `addnode`.
    pub fn empty_success() -> ResponseEnvelope {
        ResponseEnvelope {
            status: RESPONSE_STATUS_SUCCESS,
            body: vec![],
        }
    }

    pub fn failure(message: &str) -> ResponseEnvelope {
        ResponseEnvelope {
            status: RESPONSE_STATUS_FAILURE,
            body: message.as_bytes().to_vec(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RESPONSE_STATUS_SUCCESS
    }

    pub fn parse(bytes: &[u8]) -> Result<ResponseEnvelope> {
        match bytes.split_first() {
            Some((status, body)) => Ok(ResponseEnvelope {
                status: *status,
                body: body.to_vec(),
            }),
            None => Err(NetworkError::NoResponse),
        }
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut vbytes: Vec<u8> = vec![self.status];
        vbytes.extend(&self.body);
        vbytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_serialize() {
        let envelope = CommandEnvelope::new(
            "getblock",
            String::from("SOMEDATA").into_bytes(),
            vec![],
        )
        .unwrap();
        let serialized = envelope.serialize();

        assert_eq!(serialized.len(), HEADER_SIZE + 8);
        assert_eq!(&serialized[0..8], b"getblock");
        assert_eq!(&serialized[8..12], &[0, 0, 0, 0]);
        assert_eq!(&serialized[12..16], &8u32.to_le_bytes());
        assert_eq!(&serialized[16..20], &0u32.to_le_bytes());

        let deserialized = CommandEnvelope::deserialize(&serialized).unwrap();
        assert_eq!(envelope, deserialized);
        assert_eq!(deserialized.command_name_as_str(), "getblock");
    }

    #[test]
    fn test_envelope_with_extra() {
        let envelope =
            CommandEnvelope::new("txsqlrequest", vec![1, 2, 3], b"secret".to_vec()).unwrap();
        let serialized = envelope.serialize();
        assert_eq!(&serialized[16..20], &6u32.to_le_bytes());
        assert_eq!(&serialized[serialized.len() - 6..], b"secret");

        let deserialized = CommandEnvelope::deserialize(&serialized).unwrap();
        assert_eq!(deserialized.command_name_as_str(), "txsqlrequest");
        assert_eq!(deserialized.payload(), &vec![1, 2, 3]);
        assert_eq!(deserialized.extra(), &b"secret".to_vec());
    }

    #[test]
    fn test_envelope_empty_payload() {
        let envelope = CommandEnvelope::new("getfblocks", vec![], vec![]).unwrap();
        let serialized = envelope.serialize();
        assert_eq!(serialized.len(), HEADER_SIZE);
        assert_eq!(CommandEnvelope::deserialize(&serialized).unwrap(), envelope);
    }

    #[test]
    fn test_envelope_rejects_short_input() {
        let serialized = CommandEnvelope::new("tx", vec![9; 4], vec![])
            .unwrap()
            .serialize();
        assert!(matches!(
            CommandEnvelope::deserialize(&serialized[..HEADER_SIZE - 1]),
            Err(NetworkError::MalformedEnvelope(_))
        ));
        assert!(matches!(
            CommandEnvelope::deserialize(&serialized[..serialized.len() - 1]),
            Err(NetworkError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn test_command_name_width() {
        assert!(command_to_bytes("txcurrequest").is_ok());
        assert!(command_to_bytes("txcurrequests").is_err());
        assert!(command_to_bytes("").is_err());
        assert_eq!(bytes_to_command(&command_to_bytes("inv").unwrap()), "inv");
    }

    #[tokio::test]
    async fn test_read_envelope_from_stream() {
        let envelope = CommandEnvelope::new("addnode", vec![7; 40], b"token".to_vec()).unwrap();
        let mut stream = envelope.serialize();
        stream.extend(b"trailing bytes are left unread");

        let mut reader = &stream[..];
        let read = read_envelope(&mut reader).await.unwrap();
        assert_eq!(read, envelope);
        assert_eq!(reader, &b"trailing bytes are left unread"[..]);
    }

    #[tokio::test]
    async fn test_read_envelope_rejects_oversized_lengths() {
        let mut stream = command_to_bytes("block").unwrap().to_vec();
        stream.extend(&u32::MAX.to_le_bytes());
        stream.extend(&u32::MAX.to_le_bytes());
        stream.extend(&[0u8; 64]);

        let mut reader = &stream[..];
        match read_envelope(&mut reader).await {
            Err(NetworkError::MalformedEnvelope(message)) => assert!(message.contains("limit")),
            other => panic!("expected malformed envelope, got {:?}", other),
        }
        // nothing past the header was consumed
        assert_eq!(reader.len(), 64);

        let mut stream = command_to_bytes("block").unwrap().to_vec();
        stream.extend(&((MAX_ENVELOPE_DATA_SIZE as u32) + 1).to_le_bytes());
        stream.extend(&0u32.to_le_bytes());
        let mut reader = &stream[..];
        assert!(read_envelope(&mut reader).await.is_err());
    }

    #[test]
    fn test_response_envelope() {
        let response = ResponseEnvelope::success(&vec![1u8, 2, 3]).unwrap();
        let parsed = ResponseEnvelope::parse(&response.serialize()).unwrap();
        assert!(parsed.is_success());
        let body: Vec<u8> = bincode::deserialize(&parsed.body).unwrap();
        assert_eq!(body, vec![1, 2, 3]);

        let parsed =
            ResponseEnvelope::parse(&ResponseEnvelope::failure("boom").serialize()).unwrap();
        assert!(!parsed.is_success());
        assert_eq!(parsed.body, b"boom".to_vec());

        assert!(matches!(
            ResponseEnvelope::parse(&[]),
            Err(NetworkError::NoResponse)
        ));
    }
}
