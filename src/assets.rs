pub mod background;
pub mod decode;
pub mod fonts;
