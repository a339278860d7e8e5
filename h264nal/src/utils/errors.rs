#[macro_export]
macro_rules! log_or_err {
    ($state:expr, $level:expr, $err:expr $(,)?) => {{
        if $level <= $state.fail_level {
            return Err($err);
        } else {
            match $level {
                ::log::Level::Error => ::log::error!("{}", $err),
                ::log::Level::Warn => ::log::warn!("{}", $err),
                ::log::Level::Info => ::log::info!("{}", $err),
                ::log::Level::Debug => ::log::debug!("{}", $err),
                ::log::Level::Trace => ::log::trace!("{}", $err),
            }
        }
    }};
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum EmitError {
    #[error("Value {value:#X} does not fit in {width} bits")]
    InvalidWidth { width: u32, value: u64 },

    #[error("Exp-Golomb code number {0} exceeds the 32-bit range")]
    InvalidFieldValue(u64),

    #[error("Bit buffer is not byte aligned: {0} bits")]
    NotByteAligned(u64),
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum NalWriterError {
    #[error("{operation} is not allowed while the NAL unit is {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    #[error("NAL unit has already been flushed")]
    AlreadyFlushed,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParameterSetError {
    #[error("{field} = {value} is out of range: {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: i64,
        reason: &'static str,
    },

    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(&'static str),
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConformanceWarning {
    #[error("nal_ref_idc must not be 0 for a {0} NAL unit")]
    ZeroRefIdcOnParameterSet(&'static str),

    #[error("profile_idc {0} is not a known H.264 profile")]
    UnknownProfile(u8),

    #[error("level_idc {0} is not listed in Table A-1")]
    UnknownLevel(u8),
}
