pub mod codec;
pub mod init;
pub mod resolve;
pub mod sign;
pub mod verify;
