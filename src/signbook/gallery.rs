//! Sign image lookup and carousel navigation.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;

/// Maps characters to displayable sign images on disk.
///
/// Each character resolves to `<image_dir>/<lowercase char>.jpg`; a missing
/// image is a non-fatal miss, not an error.
pub struct Gallery {
    image_dir: PathBuf,
}

impl Gallery {
    pub fn new(image_dir: impl Into<PathBuf>) -> Self {
        Self { image_dir: image_dir.into() }
    }

    /// Resolve the sign image for one character, if one exists.
    pub fn image_for(&self, symbol: char) -> Option<PathBuf> {
        let path = self.image_dir.join(format!("{}.jpg", symbol.to_ascii_lowercase()));
        path.exists().then_some(path)
    }

    /// Resolve sign images for every character of a phrase, skipping
    /// characters with no image.
    pub fn images_for_phrase(&self, text: &str) -> Vec<PathBuf> {
        text.chars()
            .filter_map(|c| {
                let image = self.image_for(c);
                if image.is_none() && !c.is_whitespace() {
                    debug!("No sign image for '{}'", c);
                }
                image
            })
            .collect()
    }
}

/// Explicit navigation state for paging through a set of sign images.
///
/// Navigation wraps around in both directions.
pub struct Carousel {
    images: Vec<PathBuf>,
    index: usize,
}

impl Carousel {
    /// # Errors
    /// Returns an error for an empty image list; callers are expected to
    /// handle "no images" before constructing a carousel.
    pub fn new(images: Vec<PathBuf>) -> Result<Self> {
        if images.is_empty() {
            anyhow::bail!("Cannot page through an empty image list");
        }
        Ok(Self { images, index: 0 })
    }

    /// The image currently shown.
    pub fn current(&self) -> &Path {
        &self.images[self.index]
    }

    /// One-based position and total count, for an "Image i/n" caption.
    pub fn position(&self) -> (usize, usize) {
        (self.index + 1, self.images.len())
    }

    /// Advance to the next image, wrapping to the first after the last.
    pub fn next(&mut self) -> &Path {
        self.index = (self.index + 1) % self.images.len();
        self.current()
    }

    /// Go back to the previous image, wrapping to the last before the first.
    pub fn prev(&mut self) -> &Path {
        self.index = (self.index + self.images.len() - 1) % self.images.len();
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Creates a scratch image directory that cleans up after itself.
    struct ScratchDir {
        path: PathBuf,
    }

    impl ScratchDir {
        fn new(name: &str, symbols: &[char]) -> Self {
            let path = std::env::temp_dir().join(format!("signbook-{}-{}", name, std::process::id()));
            fs::create_dir_all(&path).unwrap();
            for symbol in symbols {
                fs::write(path.join(format!("{}.jpg", symbol)), b"jpg").unwrap();
            }
            Self { path }
        }
    }

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.path);
        }
    }

    #[test]
    fn misses_are_skipped_not_fatal() {
        let dir = ScratchDir::new("misses", &['a', 'b']);
        let gallery = Gallery::new(&dir.path);

        assert!(gallery.image_for('a').is_some());
        assert!(gallery.image_for('z').is_none());

        // 'z', '!' and the space have no image; 'A' resolves case-insensitively.
        let images = gallery.images_for_phrase("Ab z!");
        assert_eq!(images.len(), 2);
    }

    #[test]
    fn phrase_with_no_images_resolves_to_empty() {
        let dir = ScratchDir::new("empty", &[]);
        let gallery = Gallery::new(&dir.path);
        assert!(gallery.images_for_phrase("xyz").is_empty());
    }

    #[test]
    fn carousel_wraps_in_both_directions() {
        let images: Vec<PathBuf> = ["a.jpg", "b.jpg", "c.jpg"].iter().map(PathBuf::from).collect();
        let mut carousel = Carousel::new(images).unwrap();

        assert_eq!(carousel.position(), (1, 3));
        assert_eq!(carousel.next(), Path::new("b.jpg"));
        assert_eq!(carousel.next(), Path::new("c.jpg"));
        assert_eq!(carousel.next(), Path::new("a.jpg"));

        assert_eq!(carousel.prev(), Path::new("c.jpg"));
        assert_eq!(carousel.position(), (3, 3));
    }

    #[test]
    fn empty_carousel_is_rejected() {
        assert!(Carousel::new(Vec::new()).is_err());
    }
}
