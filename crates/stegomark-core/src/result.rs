use crate::error::StegoError;

pub type Result<E> = std::result::Result<E, StegoError>;
