pub mod navigation;
pub mod qr;
pub mod storage;
pub mod upload;
pub mod validation;
