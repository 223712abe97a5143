use super::error::LineError;
use super::layout;
use crate::frame::CanFrame;
use crate::source::FrameEvent;

/// Result of reading one log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Blank,
    Skipped(&'static str),
    Frame(FrameEvent),
}

enum FrameToken {
    Frame(CanFrame),
    Unsupported(&'static str),
}

/// Parse one candump line: `(secs.micros) iface ID#DATA [flags]` or `ID#DATA`.
pub fn parse_line(line: &str) -> Result<LineOutcome, LineError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(layout::COMMENT_PREFIX) {
        return Ok(LineOutcome::Blank);
    }

    let mut tokens = line.split_whitespace().peekable();
    let mut ts_micros = None;
    if let Some(token) = tokens.next_if(|t| t.starts_with(layout::TIMESTAMP_OPEN)) {
        ts_micros = Some(parse_timestamp(token)?);
    }
    let interface = tokens
        .next_if(|t| !t.contains(layout::FRAME_SEPARATOR))
        .map(str::to_string);
    let token = tokens.next().ok_or(LineError::MissingSeparator)?;

    match parse_frame_token(token)? {
        FrameToken::Frame(frame) => Ok(LineOutcome::Frame(FrameEvent {
            ts_micros,
            interface,
            frame,
        })),
        FrameToken::Unsupported(kind) => Ok(LineOutcome::Skipped(kind)),
    }
}

/// Parse a single `ID#DATA` token into a classic frame.
///
/// # Examples
/// ```
/// use canfix_core::parse_frame_text;
///
/// let frame = parse_frame_text("701#0005")?;
/// assert_eq!(frame.id(), 0x701);
/// assert_eq!(frame.data(), &[0x00, 0x05]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_frame_text(text: &str) -> Result<CanFrame, LineError> {
    match parse_frame_token(text.trim())? {
        FrameToken::Frame(frame) => Ok(frame),
        FrameToken::Unsupported(kind) => Err(LineError::Unsupported(kind)),
    }
}

fn parse_frame_token(token: &str) -> Result<FrameToken, LineError> {
    let (id, data) = token
        .split_once(layout::FRAME_SEPARATOR)
        .ok_or(LineError::MissingSeparator)?;

    if data.starts_with(layout::FRAME_SEPARATOR) {
        return Ok(FrameToken::Unsupported("CAN FD frame"));
    }
    match id.len() {
        layout::STANDARD_ID_DIGITS => {}
        layout::EXTENDED_ID_DIGITS => return Ok(FrameToken::Unsupported("extended identifier")),
        _ => return Err(LineError::InvalidId(id.to_string())),
    }
    if data.starts_with(layout::REMOTE_FRAME_MARKER) {
        return Ok(FrameToken::Unsupported("remote frame"));
    }

    let id = u32::from_str_radix(id, 16).map_err(|_| LineError::InvalidId(id.to_string()))?;
    let bytes = parse_hex_data(data)?;
    Ok(FrameToken::Frame(CanFrame::new(id, &bytes)?))
}

fn parse_hex_data(data: &str) -> Result<Vec<u8>, LineError> {
    let digits: String = data
        .chars()
        .filter(|c| *c != layout::DATA_BYTE_SEPARATOR)
        .collect();
    if digits.len() % 2 != 0 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(LineError::InvalidData(data.to_string()));
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| LineError::InvalidData(data.to_string()))
        })
        .collect()
}

/// Convert `(1661789611.150752)` to microseconds since the epoch.
pub fn parse_timestamp(token: &str) -> Result<i64, LineError> {
    let invalid = || LineError::InvalidTimestamp(token.to_string());
    let inner = token
        .strip_prefix(layout::TIMESTAMP_OPEN)
        .and_then(|t| t.strip_suffix(layout::TIMESTAMP_CLOSE))
        .ok_or_else(invalid)?;
    let (secs, fraction) = inner.split_once('.').unwrap_or((inner, ""));
    if fraction.len() > layout::TIMESTAMP_FRACTION_DIGITS
        || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }
    let secs: i64 = secs.parse().map_err(|_| invalid())?;
    let mut micros: i64 = if fraction.is_empty() {
        0
    } else {
        fraction.parse().map_err(|_| invalid())?
    };
    for _ in fraction.len()..layout::TIMESTAMP_FRACTION_DIGITS {
        micros *= 10;
    }
    secs.checked_mul(1_000_000)
        .and_then(|s| s.checked_add(micros))
        .ok_or_else(invalid)
}
