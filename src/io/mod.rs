//! The line-oriented transport underneath the [`Client`](crate::Client).

mod buffer;
pub use buffer::LineBuffer;

mod stream;
pub use stream::Stream;
