pub mod png_codec;

pub use png_codec::{decode_png, encode_png, load_png, save_png, Compression};
