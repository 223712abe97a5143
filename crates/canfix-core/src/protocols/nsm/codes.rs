//! Control code registry.
//!
//! Names are for diagnostics only; protocol decisions use the numeric code.

pub const NODE_IDENTIFICATION: u8 = 0;
pub const BIT_RATE_SET: u8 = 1;
pub const NODE_ID_SET: u8 = 2;
pub const DISABLE_PARAMETER: u8 = 3;
pub const ENABLE_PARAMETER: u8 = 4;
pub const NODE_REPORT: u8 = 5;
pub const NODE_STATUS: u8 = 6;
pub const UPDATE_FIRMWARE: u8 = 7;
pub const CONNECTION_REQUEST: u8 = 8;
pub const NODE_CONFIGURATION_SET: u8 = 9;
pub const NODE_CONFIGURATION_QUERY: u8 = 10;
pub const NODE_DESCRIPTION: u8 = 11;
pub const PARAMETER_SET_BASE: u8 = 12;

/// First code past the reserved block.
pub const FIRST_USER_DEFINED: u8 = 128;

const NAMES: [&str; 20] = [
    "Node Identification",
    "Bit Rate Set",
    "Node ID Set",
    "Disable Parameter",
    "Enable Parameter",
    "Node Report",
    "Node Status",
    "Update Firmware",
    "Connection Request",
    "Node Configuration Set",
    "Node Configuration Query",
    "Node Description",
    "Parameter Set 0",
    "Parameter Set 32",
    "Parameter Set 64",
    "Parameter Set 96",
    "Parameter Set 128",
    "Parameter Set 160",
    "Parameter Set 192",
    "Parameter Set 224",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCodeClass {
    Defined,
    Reserved,
    UserDefined,
}

pub fn classify(code: u8) -> ControlCodeClass {
    if (code as usize) < NAMES.len() {
        ControlCodeClass::Defined
    } else if code < FIRST_USER_DEFINED {
        ControlCodeClass::Reserved
    } else {
        ControlCodeClass::UserDefined
    }
}

/// Table name for a defined code, `None` otherwise.
pub fn name(code: u8) -> Option<&'static str> {
    NAMES.get(code as usize).copied()
}

/// Human-readable name of any control code.
///
/// # Examples
/// ```
/// use canfix_core::describe;
///
/// assert_eq!(describe(1), "Bit Rate Set");
/// assert_eq!(describe(50), "Reserved NSM 50");
/// assert_eq!(describe(200), "User Defined NSM 200");
/// ```
pub fn describe(code: u8) -> String {
    match classify(code) {
        ControlCodeClass::Defined => name(code).unwrap_or_default().to_string(),
        ControlCodeClass::Reserved => format!("Reserved NSM {code}"),
        ControlCodeClass::UserDefined => format!("User Defined NSM {code}"),
    }
}
