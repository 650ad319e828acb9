//! Services around the watermark engine: files, codec, fonts, temp storage.

pub mod codec;
pub mod files;
pub mod font;
pub mod temp;
