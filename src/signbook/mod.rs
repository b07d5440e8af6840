//! Speech-to-sign lookup: maps text to sign images with carousel paging.

mod gallery;

pub use gallery::{Carousel, Gallery};
